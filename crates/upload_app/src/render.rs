use serde::Serialize;
use upload_core::{Category, FileRowView, FileStatus, UploadViewModel};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

/// `1234567` -> `1,234,567`.
pub fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn status_text(row: &FileRowView) -> String {
    match row.status {
        FileStatus::Pending => format_file_size(row.size),
        FileStatus::Uploading => format!("Uploading... {}%", row.progress),
        FileStatus::Processing => "Processing with AI...".to_string(),
        FileStatus::Completed => match row.records {
            Some(records) => format!(
                "{} - {} records detected",
                format_file_size(row.size),
                format_thousands(records)
            ),
            None => format_file_size(row.size),
        },
        FileStatus::Error => row
            .error
            .clone()
            .unwrap_or_else(|| "Upload failed".to_string()),
    }
}

pub fn render_row(row: &FileRowView) -> String {
    format!(
        "[{}] #{} {}: {}",
        row.category,
        row.file_id,
        row.name,
        status_text(row)
    )
}

pub fn render_header(category: Category) -> String {
    format!(
        "{}: {} ({})",
        category.title(),
        category.description(),
        category.accepted_extensions().join(", ").to_uppercase()
    )
}

pub fn render_summary(view: &UploadViewModel) -> String {
    format!("{} of {} ready", view.completed_count, view.total_count)
}

/// Final report printed with `--json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub category: Category,
    pub summary: String,
    pub completed_count: usize,
    pub failed_count: usize,
    pub total_count: usize,
    pub files: &'a [FileRowView],
}

pub fn report(category: Category, view: &UploadViewModel) -> Report<'_> {
    Report {
        category,
        summary: render_summary(view),
        completed_count: view.completed_count,
        failed_count: view
            .files
            .iter()
            .filter(|row| row.status == FileStatus::Error)
            .count(),
        total_count: view.total_count,
        files: &view.files,
    }
}
