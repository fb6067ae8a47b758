use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use upload_core::Category;
use upload_engine::SimulationSettings;
use upload_logging::LogDestination;

/// Simulated upload pipeline for fraud-analysis data files.
#[derive(Parser, Debug)]
#[command(name = "upload_app")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Category the files are uploaded under (transactions, invoices, emails)
    #[arg(short, long, default_value = "transactions")]
    pub category: Category,

    /// RON file with simulation settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible timing and record counts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Probability of a synthetic failure per upload tick
    #[arg(long)]
    pub failure_rate: Option<f64>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Retry files that failed once, then report
    #[arg(long)]
    pub retry_failed: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
    Off,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
            LogTarget::Off => LogDestination::Off,
        }
    }
}

impl Cli {
    /// Command-line flags win over the config file.
    pub fn apply_overrides(&self, settings: &mut SimulationSettings) {
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(rate) = self.failure_rate {
            settings.failure_rate = rate;
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use upload_core::Category;
    use upload_engine::SimulationSettings;

    use super::{Cli, LogTarget};

    #[test]
    fn parses_category_and_overrides() {
        let cli = Cli::try_parse_from([
            "upload_app",
            "--category",
            "invoices",
            "--seed",
            "9",
            "--failure-rate",
            "0.25",
            "--log",
            "off",
            "scan.png",
        ])
        .unwrap();
        assert_eq!(cli.category, Category::Invoices);
        assert_eq!(cli.log, LogTarget::Off);
        assert_eq!(cli.files.len(), 1);

        let mut settings = SimulationSettings::default();
        cli.apply_overrides(&mut settings);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.failure_rate, 0.25);
    }

    #[test]
    fn rejects_unknown_category() {
        assert!(Cli::try_parse_from(["upload_app", "-c", "receipts", "a.csv"]).is_err());
    }

    #[test]
    fn requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["upload_app"]).is_err());
    }
}
