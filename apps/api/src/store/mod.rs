//! Store client for the Airtable table receiving synchronized candidates.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod dedup;
pub mod field_mapper;

use field_mapper::StoreFields;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Unexpected payload: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreRecord {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<StoreRecord>,
}

#[derive(Serialize)]
struct CreateRecords<'a> {
    records: Vec<NewRecord<'a>>,
}

#[derive(Serialize)]
struct NewRecord<'a> {
    fields: &'a StoreFields,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub api_url: String,
    pub api_key: String,
    pub base_id: String,
    pub table: String,
}

#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    settings: StoreSettings,
}

impl AirtableClient {
    pub fn new(mut settings: StoreSettings) -> Self {
        settings.api_url = settings.api_url.trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            settings,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/v0/{}/{}",
            self.settings.api_url, self.settings.base_id, self.settings.table
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, StoreError> {
        let response = builder.bearer_auth(&self.settings.api_key).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| StoreError::Payload(e.to_string()))
    }

    /// Bulk-insert endpoint with a single record. Returns the new record id.
    pub async fn create_record(&self, fields: &StoreFields) -> Result<String, StoreError> {
        let body = CreateRecords {
            records: vec![NewRecord { fields }],
        };
        let created: RecordList = self
            .fetch(self.client.post(self.table_url()).json(&body))
            .await?;

        let record = created
            .records
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Payload("create returned no records".to_string()))?;
        debug!("Created store record {}", record.id);
        Ok(record.id)
    }

    /// First record matching an Airtable formula, if any.
    pub async fn find_first(&self, formula: &str) -> Result<Option<StoreRecord>, StoreError> {
        let found: RecordList = self
            .fetch(
                self.client
                    .get(self.table_url())
                    .query(&[("filterByFormula", formula), ("maxRecords", "1")]),
            )
            .await?;
        Ok(found.records.into_iter().next())
    }
}
