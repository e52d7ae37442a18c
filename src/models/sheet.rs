use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `values.get` response from the Sheets API
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetValues {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    /// Row-major cell values; absent entirely when the range is empty
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

/// One data row keyed by header name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, Option<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures
    pub fn with(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.insert(name, value.map(str::to_string));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.fields.insert(name.into(), value);
    }

    /// Whether the row has a column with this header at all
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The cell under `name`, `None` for a missing column or a null cell
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_deref())
    }
}

impl SheetValues {
    /// Header names taken from the first row
    pub fn headers(&self) -> Vec<String> {
        self.values
            .first()
            .map(|row| row.iter().map(|c| cell_to_string(c).unwrap_or_default()).collect())
            .unwrap_or_default()
    }

    /// Convert every row after the header row into a [`Record`].
    ///
    /// The API trims trailing empty cells, so short rows are padded with nulls.
    pub fn into_records(self) -> Vec<Record> {
        let headers = self.headers();
        self.values
            .into_iter()
            .skip(1)
            .map(|row| {
                let mut record = Record::new();
                for (i, header) in headers.iter().enumerate() {
                    let value = row.get(i).and_then(cell_to_string);
                    record.insert(header.clone(), value);
                }
                record
            })
            .collect()
    }
}

/// Render a cell as text; JSON null becomes `None`
fn cell_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
