//! Best-effort duplicate check against the store.
//!
//! The lookup runs under its own timeout. Timeouts and store errors resolve
//! to `Inconclusive`, which never blocks a save.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::field_mapper::{EMAIL_FIELD, PHONE_FIELD, RESUME_URL_FIELD};
use super::AirtableClient;
use crate::models::resume::ResumeDetail;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DedupCheck {
    /// Resume has no email, phone or profile url; no lookup was made.
    NoKeys,
    /// Lookup completed and found nothing.
    Unique,
    Duplicate { record_id: String },
    /// Lookup timed out or failed; treated as not a duplicate.
    Inconclusive { reason: String },
}

impl DedupCheck {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DedupCheck::Duplicate { .. })
    }
}

#[derive(Clone)]
pub struct Deduplicator {
    store: AirtableClient,
    timeout: Duration,
}

impl Deduplicator {
    pub fn new(store: AirtableClient, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn check(&self, resume: &ResumeDetail) -> DedupCheck {
        let keys = identity_keys(resume);
        if keys.is_empty() {
            debug!("Resume {} has no identity keys; skipping dedup", resume.summary.id);
            return DedupCheck::NoKeys;
        }

        let formula = build_formula(&keys);
        match tokio::time::timeout(self.timeout, self.store.find_first(&formula)).await {
            Ok(Ok(Some(record))) => DedupCheck::Duplicate {
                record_id: record.id,
            },
            Ok(Ok(None)) => DedupCheck::Unique,
            Ok(Err(e)) => {
                warn!("Dedup lookup failed for {}: {e}", resume.summary.id);
                DedupCheck::Inconclusive {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                warn!(
                    "Dedup lookup for {} exceeded {:?}; assuming not a duplicate",
                    resume.summary.id, self.timeout
                );
                DedupCheck::Inconclusive {
                    reason: format!("timed out after {}ms", self.timeout.as_millis()),
                }
            }
        }
    }
}

/// (store column, value) pairs for every non-empty identity key.
pub fn identity_keys(resume: &ResumeDetail) -> Vec<(&'static str, &str)> {
    [
        (EMAIL_FIELD, resume.email()),
        (PHONE_FIELD, resume.phone()),
        (RESUME_URL_FIELD, resume.profile_url()),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.map(|v| (field, v)))
    .collect()
}

/// `OR({Email}='a',{Phone number}='b')`
pub fn build_formula(keys: &[(&str, &str)]) -> String {
    let conditions: Vec<String> = keys
        .iter()
        .map(|(field, value)| format!("{{{field}}}='{}'", escape(value)))
        .collect();
    format!("OR({})", conditions.join(","))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
