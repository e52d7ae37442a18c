use reqwest::{Response, StatusCode};
use thiserror::Error;

/// Failures specific to the Google Sheets, Drive and Docs adapters
#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("{api} API error: {status} - {body}")]
    Api {
        api: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("no spreadsheet named {0:?} is visible to the service account")]
    SpreadsheetNotFound(String),

    #[error("worksheet with id {0} not found in spreadsheet")]
    WorksheetNotFound(u64),

    #[error("document {0} has no body content")]
    EmptyDocument(String),

    #[error("invalid service account key: {0}")]
    InvalidKey(String),
}

/// Turn a non-2xx response into [`GoogleError::Api`], keeping the body
pub async fn check_status(
    api: &'static str,
    response: Response,
) -> Result<Response, GoogleError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(GoogleError::Api { api, status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = GoogleError::Api {
            api: "Docs",
            status: StatusCode::FORBIDDEN,
            body: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "Docs API error: 403 Forbidden - permission denied");
    }

    #[test]
    fn test_not_found_display() {
        let err = GoogleError::SpreadsheetNotFound("Opinions Spreadsheet".to_string());
        assert_eq!(
            err.to_string(),
            "no spreadsheet named \"Opinions Spreadsheet\" is visible to the service account"
        );
        assert_eq!(
            GoogleError::WorksheetNotFound(558979275).to_string(),
            "worksheet with id 558979275 not found in spreadsheet"
        );
    }
}
