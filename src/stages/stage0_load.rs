use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Opinion, Record};
use crate::traits::RecordSource;

pub const DEFAULT_OPINION_COLUMN: &str = "Opinion";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("column {0:?} not found in sheet headers")]
    MissingColumn(String),
}

/// Configuration for Stage 0
#[derive(Debug, Clone)]
pub struct Stage0Config {
    /// Header of the column holding the opinion text
    pub column: String,
}

impl Default for Stage0Config {
    fn default() -> Self {
        Self {
            column: DEFAULT_OPINION_COLUMN.to_string(),
        }
    }
}

/// Result of Stage 0 loading
#[derive(Debug, Clone)]
pub struct Stage0Result {
    /// Opinions in source row order
    pub opinions: Vec<Opinion>,
    /// Data rows read from the source
    pub rows_read: usize,
    /// Rows dropped because the cell was null or empty
    pub rows_skipped: usize,
}

/// Pull the opinion column out of the records, dropping null and empty cells
pub fn extract_opinions(
    records: &[Record],
    config: &Stage0Config,
) -> Result<Stage0Result, LoadError> {
    if let Some(first) = records.first() {
        if !first.has_field(&config.column) {
            return Err(LoadError::MissingColumn(config.column.clone()));
        }
    }

    let opinions: Vec<Opinion> = records
        .iter()
        .filter_map(|r| r.get(&config.column))
        .filter(|text| !text.is_empty())
        .map(Opinion::new)
        .collect();

    Ok(Stage0Result {
        rows_read: records.len(),
        rows_skipped: records.len() - opinions.len(),
        opinions,
    })
}

/// Execute Stage 0: fetch rows and extract opinions
pub async fn execute_stage0<S>(source: &S, config: &Stage0Config) -> Result<Stage0Result>
where
    S: RecordSource + ?Sized,
{
    let records = source
        .fetch_records()
        .await
        .context("Failed to read opinion rows")?;

    let result = extract_opinions(&records, config)?;

    info!(
        "Stage 0: {} opinions loaded from {} rows ({} empty)",
        result.opinions.len(),
        result.rows_read,
        result.rows_skipped
    );
    if result.opinions.is_empty() {
        warn!("No opinions found in column {:?}", config.column);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(result: &Stage0Result) -> Vec<&str> {
        result.opinions.iter().map(|o| o.as_str()).collect()
    }

    #[test]
    fn test_null_and_empty_dropped_in_order() {
        let records = vec![
            Record::new().with("Opinion", Some("lower taxes")),
            Record::new().with("Opinion", Some("")),
            Record::new().with("Opinion", Some("more parks")),
            Record::new().with("Opinion", None),
        ];

        let result = extract_opinions(&records, &Stage0Config::default()).unwrap();
        assert_eq!(texts(&result), vec!["lower taxes", "more parks"]);
        assert_eq!(result.rows_read, 4);
        assert_eq!(result.rows_skipped, 2);
    }

    #[test]
    fn test_whitespace_only_kept_verbatim() {
        let records = vec![
            Record::new().with("Opinion", Some("   ")),
            Record::new().with("Opinion", Some("x")),
            Record::new().with("Opinion", Some("  padded  ")),
        ];

        let result = extract_opinions(&records, &Stage0Config::default()).unwrap();
        assert_eq!(texts(&result), vec!["   ", "x", "  padded  "]);
        assert_eq!(result.rows_skipped, 0);
    }

    #[test]
    fn test_duplicates_kept() {
        let records = vec![
            Record::new().with("Opinion", Some("same")),
            Record::new().with("Opinion", Some("same")),
        ];

        let result = extract_opinions(&records, &Stage0Config::default()).unwrap();
        assert_eq!(result.opinions.len(), 2);
    }

    #[test]
    fn test_missing_column() {
        let records = vec![Record::new().with("Timestamp", Some("2024/01/01"))];

        let err = extract_opinions(&records, &Stage0Config::default()).unwrap_err();
        assert_eq!(err, LoadError::MissingColumn("Opinion".to_string()));
    }

    #[test]
    fn test_empty_sheet() {
        let result = extract_opinions(&[], &Stage0Config::default()).unwrap();
        assert!(result.opinions.is_empty());
        assert_eq!(result.rows_read, 0);
    }

    #[test]
    fn test_custom_column() {
        let records = vec![Record::new()
            .with("Opinion", Some("ignored"))
            .with("意見", Some("公園を増やす"))];
        let config = Stage0Config {
            column: "意見".to_string(),
        };

        let result = extract_opinions(&records, &config).unwrap();
        assert_eq!(texts(&result), vec!["公園を増やす"]);
    }
}
