use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use upload_core::{wants_preview, Category};
use upload_engine::IncomingFile;
use upload_logging::upload_warn;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0:?} is not a regular file")]
    NotAFile(PathBuf),
}

/// MIME type by extension; the content itself is never inspected.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => "text/csv",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xls") => "application/vnd.ms-excel",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        Some("eml") => "message/rfc822",
        _ => "application/octet-stream",
    }
}

/// Reads a file's metadata, and its bytes only when it will get a preview.
pub fn load(path: &Path, category: Category) -> Result<IncomingFile, FileError> {
    let io_err = |source| FileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let meta = fs::metadata(path).map_err(io_err)?;
    if !meta.is_file() {
        return Err(FileError::NotAFile(path.to_path_buf()));
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    if !category.accepts(&name) {
        upload_warn!(
            "{} is not a usual {} format (expected {})",
            name,
            category,
            category.accepted_extensions().join(", ")
        );
    }

    let mime_type = guess_mime(path);
    if wants_preview(mime_type) {
        let content = fs::read(path).map_err(io_err)?;
        Ok(IncomingFile::new(name, mime_type, content))
    } else {
        Ok(IncomingFile::metadata_only(name, meta.len(), mime_type))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;
    use upload_core::Category;

    use super::{guess_mime, load, FileError};

    #[test]
    fn guesses_by_extension() {
        assert_eq!(guess_mime(Path::new("a/jan.CSV")), "text/csv");
        assert_eq!(guess_mime(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("mail.eml")), "message/rfc822");
        assert_eq!(guess_mime(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn images_carry_their_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scan.png");
        fs::write(&path, b"\x89PNG....").unwrap();

        let file = load(&path, Category::Invoices).unwrap();
        assert_eq!(file.name, "scan.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.size, 8);
        assert_eq!(file.content.len(), 8);
    }

    #[test]
    fn other_files_are_metadata_only() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jan.csv");
        fs::write(&path, "id,amount\n1,20\n").unwrap();

        let file = load(&path, Category::Transactions).unwrap();
        assert_eq!(file.size, 15);
        assert!(file.content.is_empty());
    }

    #[test]
    fn directories_are_rejected() {
        let temp = TempDir::new().unwrap();
        let err = load(temp.path(), Category::Emails).unwrap_err();
        assert!(matches!(err, FileError::NotAFile(_)));
    }
}
