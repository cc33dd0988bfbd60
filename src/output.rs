use crate::error::{ReportError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

/// Where the reports are read from and written to, relative to the
/// working directory.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub overheads: PathBuf,
    pub profit_loss: PathBuf,
    pub summary_text: PathBuf,
    pub summary_json: PathBuf,
}

impl Default for ReportPaths {
    fn default() -> Self {
        ReportPaths::under(Path::new("."))
    }
}

impl ReportPaths {
    pub fn under(root: &Path) -> Self {
        let reports = root.join("csv_reports");
        ReportPaths {
            overheads: reports.join("Overheads.csv"),
            profit_loss: reports.join("Profits_and_Loss.csv"),
            summary_text: root.join("summary_report.txt"),
            summary_json: root.join("summary.json"),
        }
    }
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = text.len(), "wrote report file");
    Ok(())
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write the text report and its JSON digest, or neither.
///
/// The digest is serialized before anything touches the disk. If the digest
/// cannot be written, the text report just written is removed again.
pub fn write_summary<T: Serialize>(paths: &ReportPaths, text: &str, digest: &T) -> Result<()> {
    let json = to_json(digest)?;
    write_text(&paths.summary_text, text)?;
    if let Err(e) = write_text(&paths.summary_json, &json) {
        let _ = std::fs::remove_file(&paths.summary_text);
        return Err(e);
    }
    Ok(())
}

/// Markdown table of the first `max_rows` rows, or `(no rows)`.
pub fn render_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table_rows(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OverheadRecord;

    #[test]
    fn default_paths_follow_report_layout() {
        let paths = ReportPaths::under(Path::new("/data"));
        assert_eq!(paths.overheads, Path::new("/data/csv_reports/Overheads.csv"));
        assert_eq!(
            paths.profit_loss,
            Path::new("/data/csv_reports/Profits_and_Loss.csv")
        );
        assert_eq!(paths.summary_text, Path::new("/data/summary_report.txt"));
    }

    #[test]
    fn preview_is_markdown_and_truncated() {
        let rows = vec![
            OverheadRecord { category: "Rent".into(), amount: 40.0 },
            OverheadRecord { category: "Utilities".into(), amount: 15.5 },
            OverheadRecord { category: "Salaries".into(), amount: 44.5 },
        ];
        let table = render_table_rows(&rows, 2);
        assert!(table.contains("Category"));
        assert!(table.contains("Utilities"));
        assert!(!table.contains("Salaries"));
        assert!(table.starts_with('|'));
    }

    #[test]
    fn failed_digest_write_leaves_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = ReportPaths::under(dir.path());
        paths.summary_json = dir.path().join("missing").join("summary.json");

        let err = write_summary(&paths, "[HIGHEST OVERHEAD] Rent: 40.0%\n", &[1, 2]).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
        assert!(!paths.summary_text.exists());
    }

    #[test]
    fn failed_report_write_skips_digest() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = ReportPaths::under(dir.path());
        paths.summary_text = dir.path().join("missing").join("summary_report.txt");

        let err = write_summary(&paths, "x", &[1]).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
        assert!(!paths.summary_json.exists());
    }

    #[test]
    fn preview_of_nothing() {
        let rows: Vec<OverheadRecord> = Vec::new();
        assert_eq!(render_table_rows(&rows, 5), "(no rows)");
    }
}
