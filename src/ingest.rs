//! Reading rater annotation exports from disk.
//!
//! A rater's data lives as one or more CSV files under a directory (often
//! one file per annotation session). Every `*.csv` under the directory is
//! read, recursively, and concatenated into a single [`AnnotationSet`].
//!
//! Filtering happens here, not in the merge: rows whose item or label cell
//! is missing or blank carry nothing to reconcile and are skipped. Text is
//! passed through raw — lower-casing, token splitting and item trimming are
//! the merge's job.

use std::path::{Path, PathBuf};

use glob::glob;
use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, AnnotationSet};
use crate::{Error, Result};

/// Column names for a rater's raw CSV files.
///
/// Exports from different raters or tools frequently disagree on header
/// naming (`Label` vs `Code`), so each rater gets its own config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaterFileConfig {
    /// Header of the column holding the annotated item text.
    pub item_column: String,
    /// Header of the column holding the comma-separated labels.
    pub label_column: String,
}

impl Default for RaterFileConfig {
    fn default() -> Self {
        Self {
            item_column: "Data".to_string(),
            label_column: "Label".to_string(),
        }
    }
}

impl RaterFileConfig {
    /// Config with explicit column names.
    pub fn new(item_column: impl Into<String>, label_column: impl Into<String>) -> Self {
        Self {
            item_column: item_column.into(),
            label_column: label_column.into(),
        }
    }
}

/// Read every `*.csv` under `dir` (recursively) into one annotation set.
///
/// Files are visited in sorted path order so the resulting set, and with it
/// the reconciled table, is reproducible across platforms.
pub fn extract_rater_data(dir: &Path, config: &RaterFileConfig) -> Result<AnnotationSet> {
    let pattern = dir.join("**").join("*.csv");
    let pattern = pattern.to_string_lossy();
    let mut files: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| Error::invalid_input(format!("bad glob pattern `{pattern}`: {e}")))?
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| Error::Io(e.into_error()))?;
    files.sort();

    let mut rows = Vec::new();
    for path in &files {
        read_annotation_file(path, config, &mut rows)?;
    }
    log::info!(
        "read {} annotations from {} files under {}",
        rows.len(),
        files.len(),
        dir.display()
    );
    Ok(AnnotationSet::new(rows))
}

/// Append one CSV file's usable rows to `out`.
fn read_annotation_file(
    path: &Path,
    config: &RaterFileConfig,
    out: &mut Vec<Annotation>,
) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let item_idx = column_index(&headers, &config.item_column, path)?;
    let label_idx = column_index(&headers, &config.label_column, path)?;

    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        let item = record.get(item_idx).unwrap_or("");
        let labels = record.get(label_idx).unwrap_or("");
        if item.trim().is_empty() || labels.trim().is_empty() {
            skipped += 1;
            continue;
        }
        out.push(Annotation::new(item, labels));
    }
    if skipped > 0 {
        log::debug!(
            "skipped {skipped} rows with blank item or labels in {}",
            path.display()
        );
    }
    Ok(())
}

fn column_index(headers: &csv::StringRecord, column: &str, path: &Path) -> Result<usize> {
    headers.iter().position(|h| h == column).ok_or_else(|| {
        Error::invalid_input(format!(
            "column `{column}` not found in {} (headers: {})",
            path.display(),
            headers.iter().collect::<Vec<_>>().join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_extract_reads_all_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "b.csv", "Data,Label\nsecond,bug\n");
        write_csv(dir.path(), "a.csv", "Data,Label\nfirst,feature\n");

        let set = extract_rater_data(dir.path(), &RaterFileConfig::default()).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.rows[0].item, "first");
        assert_eq!(set.rows[1].item, "second");
    }

    #[test]
    fn test_extract_recurses_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("session1")).unwrap();
        write_csv(
            &dir.path().join("session1"),
            "export.csv",
            "Data,Label\nnested,bug\n",
        );

        let set = extract_rater_data(dir.path(), &RaterFileConfig::default()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.rows[0].item, "nested");
    }

    #[test]
    fn test_blank_rows_are_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "r.csv",
            "Data,Label\nkept,bug\n,feature\nno label,\n  ,bug\n",
        );

        let set = extract_rater_data(dir.path(), &RaterFileConfig::default()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.rows[0].item, "kept");
    }

    #[test]
    fn test_custom_column_names() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "r.csv",
            "comment_body,code,extra\nsome text,\"bug, feature\",x\n",
        );

        let config = RaterFileConfig::new("comment_body", "code");
        let set = extract_rater_data(dir.path(), &config).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.rows[0].labels, "bug, feature");
    }

    #[test]
    fn test_missing_column_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "r.csv", "Data,Code\nx,bug\n");

        let err = extract_rater_data(dir.path(), &RaterFileConfig::default()).unwrap_err();
        match err {
            Error::InvalidInput(msg) => assert!(msg.contains("Label")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_directory_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let set = extract_rater_data(dir.path(), &RaterFileConfig::default()).unwrap();
        assert!(set.is_empty());
    }
}
