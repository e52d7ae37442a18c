use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::auth::ServiceAccountAuth;
use super::error::{GoogleError, check_status};
use crate::models::{Record, SheetValues};
use crate::traits::RecordSource;

pub const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";
pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// How the source spreadsheet is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    /// Exact file name, looked up through Drive
    Name(String),
    /// Spreadsheet id, used as is
    Id(String),
}

/// Which worksheet to read
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet: SpreadsheetRef,
    /// Numeric worksheet id (the `gid` in the sheet URL)
    pub worksheet_id: u64,
}

/// Read-only access to one worksheet through the Sheets API
pub struct SheetsClient {
    client: Client,
    auth: Arc<ServiceAccountAuth>,
    config: SheetsConfig,
    drive_url: String,
    sheets_url: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: u64,
    title: String,
}

impl SheetsClient {
    pub fn new(client: Client, auth: Arc<ServiceAccountAuth>, config: SheetsConfig) -> Self {
        Self {
            client,
            auth,
            config,
            drive_url: DRIVE_API_URL.to_string(),
            sheets_url: SHEETS_API_URL.to_string(),
        }
    }

    /// Point at different Drive and Sheets API roots
    pub fn with_api_urls(
        mut self,
        drive_url: impl Into<String>,
        sheets_url: impl Into<String>,
    ) -> Self {
        self.drive_url = drive_url.into();
        self.sheets_url = sheets_url.into();
        self
    }

    /// Look the spreadsheet id up by name unless one was given
    pub async fn resolve_spreadsheet_id(&self) -> Result<String> {
        let name = match &self.config.spreadsheet {
            SpreadsheetRef::Id(id) => return Ok(id.clone()),
            SpreadsheetRef::Name(name) => name,
        };

        let token = self.auth.access_token().await?;
        let query = drive_name_query(name);
        debug!("Drive query: {}", query);

        let response = self
            .client
            .get(format!("{}/files", self.drive_url))
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await
            .context("Failed to send Drive files.list request")?;

        let list: FileList = check_status("Drive", response)
            .await?
            .json()
            .await
            .context("Failed to parse Drive file list")?;

        if list.files.len() > 1 {
            warn!(
                "{} spreadsheets are named {:?}, using the first",
                list.files.len(),
                name
            );
        }

        let file = list
            .files
            .into_iter()
            .next()
            .ok_or_else(|| GoogleError::SpreadsheetNotFound(name.clone()))?;

        info!("Resolved spreadsheet {:?} to {}", file.name, file.id);
        Ok(file.id)
    }

    /// Title of the configured worksheet, needed to address its range
    pub async fn worksheet_title(&self, spreadsheet_id: &str) -> Result<String> {
        let token = self.auth.access_token().await?;

        let response = self
            .client
            .get(self.spreadsheet_url(&[spreadsheet_id])?)
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties(sheetId,title)")])
            .send()
            .await
            .context("Failed to send spreadsheet metadata request")?;

        let metadata: SpreadsheetMetadata = check_status("Sheets", response)
            .await?
            .json()
            .await
            .context("Failed to parse spreadsheet metadata")?;

        find_worksheet_title(&metadata, self.config.worksheet_id)
    }

    /// Every cell value of the worksheet, header row included
    pub async fn read_values(&self, spreadsheet_id: &str, title: &str) -> Result<SheetValues> {
        let token = self.auth.access_token().await?;
        let range = whole_sheet_range(title);

        let response = self
            .client
            .get(self.spreadsheet_url(&[spreadsheet_id, "values", &range])?)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send values request")?;

        check_status("Sheets", response)
            .await?
            .json()
            .await
            .context("Failed to parse worksheet values")
    }

    fn spreadsheet_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.sheets_url).context("Invalid Sheets API URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Sheets API URL cannot be a base"))?
            .pop_if_empty()
            .push("spreadsheets")
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl RecordSource for SheetsClient {
    async fn fetch_records(&self) -> Result<Vec<Record>> {
        let spreadsheet_id = self.resolve_spreadsheet_id().await?;
        let title = self.worksheet_title(&spreadsheet_id).await?;
        info!("Reading worksheet {:?} ({})", title, self.config.worksheet_id);

        let values = self.read_values(&spreadsheet_id, &title).await?;
        Ok(values.into_records())
    }
}

/// Drive search for a non-trashed spreadsheet with exactly this name
fn drive_name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        escaped, SPREADSHEET_MIME_TYPE
    )
}

/// A1 range covering a whole sheet; quotes in the title are doubled
fn whole_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn find_worksheet_title(metadata: &SpreadsheetMetadata, worksheet_id: u64) -> Result<String> {
    metadata
        .sheets
        .iter()
        .find(|s| s.properties.sheet_id == worksheet_id)
        .map(|s| s.properties.title.clone())
        .ok_or_else(|| GoogleError::WorksheetNotFound(worksheet_id).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_name_query_escapes_quotes() {
        assert_eq!(
            drive_name_query("Citizens' Opinions"),
            "name = 'Citizens\\' Opinions' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false"
        );
    }

    #[test]
    fn test_whole_sheet_range() {
        assert_eq!(whole_sheet_range("Form Responses 1"), "'Form Responses 1'");
        assert_eq!(whole_sheet_range("Bob's sheet"), "'Bob''s sheet'");
    }

    #[test]
    fn test_find_worksheet_title() {
        let json = r#"{
            "sheets": [
                {"properties": {"sheetId": 0, "title": "Sheet1"}},
                {"properties": {"sheetId": 558979275, "title": "Form Responses 1"}}
            ]
        }"#;
        let metadata: SpreadsheetMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(find_worksheet_title(&metadata, 558979275).unwrap(), "Form Responses 1");

        let err = find_worksheet_title(&metadata, 7).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GoogleError>(),
            Some(GoogleError::WorksheetNotFound(7))
        ));
    }

    #[test]
    fn test_values_url_encodes_range() {
        let key = crate::google::ServiceAccountKey {
            client_email: "bot@x".to_string(),
            private_key: "k".to_string(),
            private_key_id: None,
            token_uri: crate::google::DEFAULT_TOKEN_URI.to_string(),
        };
        let auth = Arc::new(ServiceAccountAuth::new(Client::new(), key));
        let sheets = SheetsClient::new(
            Client::new(),
            auth,
            SheetsConfig {
                spreadsheet: SpreadsheetRef::Id("sheet123".to_string()),
                worksheet_id: 0,
            },
        );

        let url = sheets
            .spreadsheet_url(&["sheet123", "values", &whole_sheet_range("Form Responses 1")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet123/values/'Form%20Responses%201'"
        );
    }

    #[tokio::test]
    async fn test_resolve_given_id_skips_lookup() {
        let key = crate::google::ServiceAccountKey {
            client_email: "bot@x".to_string(),
            private_key: "k".to_string(),
            private_key_id: None,
            token_uri: crate::google::DEFAULT_TOKEN_URI.to_string(),
        };
        let auth = Arc::new(ServiceAccountAuth::new(Client::new(), key));
        let sheets = SheetsClient::new(
            Client::new(),
            auth,
            SheetsConfig {
                spreadsheet: SpreadsheetRef::Id("sheet123".to_string()),
                worksheet_id: 0,
            },
        );

        assert_eq!(sheets.resolve_spreadsheet_id().await.unwrap(), "sheet123");
    }
}
