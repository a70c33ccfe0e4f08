//! Google Sheets ledger

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::errors::LedgerError;
use crate::domain::entities::LedgerRow;
use crate::domain::traits::{Ledger, LedgerConnector};

/// Sheets API base URL
const API_BASE: &str = "https://sheets.googleapis.com";

/// Longest amount Sheets can hold as a number without rounding
const MAX_NUMERIC_DIGITS: usize = 15;

/// Appends rows to one sheet range with a bearer token
pub struct SheetsLedger {
    client: Client,
    append_url: Url,
    access_token: String,
}

impl SheetsLedger {
    pub fn new(
        client: Client,
        base_url: &str,
        spreadsheet_id: &str,
        range: &str,
        access_token: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            client,
            append_url: append_url(base_url, spreadsheet_id, range)?,
            access_token: access_token.into(),
        })
    }
}

#[derive(Debug, Serialize)]
struct AppendRequest {
    values: [[String; 4]; 1],
}

/// Leading `'` makes Sheets store the cell as literal text under
/// `USER_ENTERED`, so `=...` or `12/3` is never evaluated
fn literal(text: &str) -> String {
    format!("'{}", text)
}

/// One row body. Timestamp and amount are parsed by Sheets; text cells are not.
fn append_request(row: &LedgerRow) -> AppendRequest {
    let digits = row.amount.as_str();
    let amount = if digits.len() > MAX_NUMERIC_DIGITS {
        literal(digits)
    } else {
        digits.to_string()
    };

    AppendRequest {
        values: [[
            row.timestamp.clone(),
            literal(&row.category),
            amount,
            literal(&row.raw_text),
        ]],
    }
}

/// `{base}/v4/spreadsheets/{id}/values/{range}:append`
fn append_url(base: &str, spreadsheet_id: &str, range: &str) -> Result<Url, LedgerError> {
    let range_segment = format!("{}:append", range);
    let mut url = Url::parse(base)
        .map_err(|e| LedgerError::NotConfigured(format!("bad sheets base url: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| LedgerError::NotConfigured("sheets base url cannot hold a path".to_string()))?
        .pop_if_empty()
        .extend(["v4", "spreadsheets", spreadsheet_id, "values", range_segment.as_str()]);
    Ok(url)
}

#[async_trait]
impl Ledger for SheetsLedger {
    fn name(&self) -> &str {
        "sheets"
    }

    async fn append_row(&self, row: &LedgerRow) -> Result<(), LedgerError> {
        let request = append_request(row);

        let response = self
            .client
            .post(self.append_url.clone())
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(LedgerError::Stale(format!("Sheets API {}: {}", status, body)))
            }
            _ => Err(LedgerError::Rejected(format!("Sheets API {}: {}", status, body))),
        }
    }
}

/// Builds `SheetsLedger`s, re-reading the token on each connect
pub struct SheetsConnector {
    client: Client,
    base_url: String,
    spreadsheet_id: Option<String>,
    range: String,
    access_token: Option<String>,
    token_file: Option<PathBuf>,
}

impl SheetsConnector {
    pub fn new(spreadsheet_id: Option<String>, range: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: API_BASE.to_string(),
            spreadsheet_id,
            range: range.into(),
            access_token: None,
            token_file: None,
        }
    }

    /// Point at another Sheets-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub fn with_token_file(mut self, path: Option<PathBuf>) -> Self {
        self.token_file = path;
        self
    }

    async fn resolve_token(&self) -> Result<String, LedgerError> {
        if let Some(path) = &self.token_file {
            let token = tokio::fs::read_to_string(path).await.map_err(|e| {
                LedgerError::NotConfigured(format!("cannot read token file {}: {}", path.display(), e))
            })?;
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }

        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| LedgerError::NotConfigured("sheets access token".to_string()))
    }
}

#[async_trait]
impl LedgerConnector for SheetsConnector {
    async fn connect(&self) -> Result<Arc<dyn Ledger>, LedgerError> {
        let spreadsheet_id = self
            .spreadsheet_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LedgerError::NotConfigured("sheets spreadsheet id".to_string()))?;
        let token = self.resolve_token().await?;

        let ledger = SheetsLedger::new(
            self.client.clone(),
            &self.base_url,
            spreadsheet_id,
            &self.range,
            token,
        )?;
        tracing::info!("Connected to sheet {} ({})", spreadsheet_id, self.range);
        Ok(Arc::new(ledger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_url() {
        let url = append_url(API_BASE, "abc123", "Sheet1!A:D").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Sheet1!A:D:append"
        );
    }

    #[test]
    fn test_append_url_escapes_sheet_names() {
        let url = append_url(API_BASE, "abc123", "My Sheet!A:D").unwrap();
        assert!(url.as_str().ends_with("/values/My%20Sheet!A:D:append"));
    }

    #[test]
    fn test_append_url_with_custom_base() {
        let url = append_url("http://127.0.0.1:8080", "abc", "Sheet1!A:D").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/v4/spreadsheets/abc/values/Sheet1!A:D:append"
        );
    }

    #[test]
    fn test_text_cells_are_sent_as_literals() {
        let row = LedgerRow {
            timestamp: "2024-01-01 10:00:00".to_string(),
            category: "Uncategorized".to_string(),
            amount: crate::domain::entities::Amount::from(500),
            raw_text: "=hyperlink(\"x\") 500".to_string(),
        };

        let body = serde_json::to_value(append_request(&row)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "values": [[
                    "2024-01-01 10:00:00",
                    "'Uncategorized",
                    "500",
                    "'=hyperlink(\"x\") 500"
                ]]
            })
        );
    }

    #[test]
    fn test_date_like_text_stays_literal() {
        assert_eq!(literal("12/3 chai"), "'12/3 chai");
    }

    #[test]
    fn test_amount_past_float_precision_is_text() {
        let row = LedgerRow {
            timestamp: "2024-01-01 10:00:00".to_string(),
            category: "Bills".to_string(),
            amount: crate::domain::entities::Amount::from_digits("123456789012345678901234567890")
                .unwrap(),
            raw_text: "huge".to_string(),
        };

        let request = append_request(&row);
        assert_eq!(request.values[0][2], "'123456789012345678901234567890");
    }

    #[tokio::test]
    async fn test_missing_spreadsheet_id_is_not_configured() {
        let connector = SheetsConnector::new(None, "Sheet1!A:D")
            .with_access_token(Some("token".to_string()));
        let err = connector.connect().await.err().unwrap();
        assert!(err.is_not_configured());
    }

    #[tokio::test]
    async fn test_missing_token_is_not_configured() {
        let connector = SheetsConnector::new(Some("abc".to_string()), "Sheet1!A:D");
        let err = connector.connect().await.err().unwrap();
        assert!(err.is_not_configured());
    }

    #[tokio::test]
    async fn test_token_file_is_read_on_connect() {
        let path = std::env::temp_dir().join(format!("hisaab-token-{}", uuid::Uuid::new_v4()));
        std::fs::write(&path, "file-token\n").unwrap();

        let connector = SheetsConnector::new(Some("abc".to_string()), "Sheet1!A:D")
            .with_token_file(Some(path.clone()));
        assert_eq!(connector.resolve_token().await.unwrap(), "file-token");

        std::fs::remove_file(&path).unwrap();
    }
}
