use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use upload_engine::SimulationSettings;
use upload_logging::upload_info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Loads simulation settings from a RON file. Missing fields keep their defaults.
pub fn load_settings(path: &Path) -> Result<SimulationSettings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    upload_info!("Loaded simulation settings from {:?}", path);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;
    use upload_engine::SimulationSettings;

    use super::{load_settings, ConfigError};

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sim.ron");
        fs::write(&path, "(tick_interval_ms: 50, failure_rate: 0.1, seed: Some(3))").unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.tick_interval_ms, 50);
        assert_eq!(settings.failure_rate, 0.1);
        assert_eq!(settings.seed, Some(3));
        assert_eq!(
            settings.processing_min_ms,
            SimulationSettings::default().processing_min_ms
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let err = load_settings(&temp.path().join("absent.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.ron");
        fs::write(&path, "(tick_interval_ms: \"fast\")").unwrap();
        let err = load_settings(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
