//! Drives resumes from the provider into the store.
//!
//! Per item: fetch → dedup (short-circuits to `Duplicate`) → resolve contacts
//! → map → write. Every stage runs in order, one outbound call at a time.
//! Batches are strictly sequential and paced; one item's failure is tallied
//! and never aborts the rest.

use std::sync::Arc;

use tracing::{info, warn};

use crate::hh_client::HhClient;
use crate::models::sync::{SyncOutcome, SyncReport, SyncStage};
use crate::store::dedup::{DedupCheck, Deduplicator};
use crate::store::field_mapper;
use crate::store::AirtableClient;
use crate::sync::contacts::ContactResolver;
use crate::sync::pacer::Pacer;

#[derive(Clone)]
pub struct SyncOrchestrator {
    hh: HhClient,
    store: AirtableClient,
    dedup: Deduplicator,
    contacts: ContactResolver,
    pacer: Arc<dyn Pacer>,
}

impl SyncOrchestrator {
    pub fn new(
        hh: HhClient,
        store: AirtableClient,
        dedup: Deduplicator,
        contacts: ContactResolver,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            hh,
            store,
            dedup,
            contacts,
            pacer,
        }
    }

    pub async fn save_one(
        &self,
        token: &str,
        resume_id: &str,
        allow_paid_unlock: bool,
    ) -> SyncOutcome {
        let resume = match self.hh.get_detail(token, resume_id).await {
            Ok(resume) => resume,
            Err(e) => {
                warn!("Failed to fetch resume {resume_id}: {e}");
                return SyncOutcome::Failed {
                    stage: SyncStage::Fetch,
                    reason: e.to_string(),
                };
            }
        };

        let check = self.dedup.check(&resume).await;
        if check.is_duplicate() {
            info!("Resume {resume_id} already in store ({check:?}); skipping");
            return SyncOutcome::Duplicate;
        }
        if let DedupCheck::Inconclusive { reason } = &check {
            warn!("Dedup for {resume_id} inconclusive ({reason}); saving anyway");
        }

        let resolution = self
            .contacts
            .resolve(token, resume, allow_paid_unlock)
            .await;
        let fields = field_mapper::map_today(&resolution.resume);

        match self.store.create_record(&fields).await {
            Ok(record_id) => {
                info!("Saved resume {resume_id} as store record {record_id}");
                SyncOutcome::Saved {
                    had_free_contacts: resolution.had_free_contacts,
                    paid_unlock: resolution.paid_unlock_performed(),
                }
            }
            Err(e) => {
                warn!("Failed to save resume {resume_id}: {e}");
                SyncOutcome::Failed {
                    stage: SyncStage::Write,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Processes `resume_ids` one after another, pacing between items.
    pub async fn run_batch(
        &self,
        token: &str,
        resume_ids: &[String],
        allow_paid_unlock: bool,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        for (index, resume_id) in resume_ids.iter().enumerate() {
            self.pacer.wait_turn(index).await;

            let outcome = self.save_one(token, resume_id, allow_paid_unlock).await;
            info!(
                "Batch item {}/{} ({resume_id}): {outcome:?}",
                index + 1,
                resume_ids.len()
            );
            report.record(resume_id, &outcome);
        }

        info!(
            "Batch finished: total={} saved={} duplicates={} paid_unlocked={} errors={}",
            report.total, report.saved, report.duplicates, report.paid_unlocked, report.errors
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::store::test_support::client;
    use crate::sync::pacer::FixedIntervalPacer;

    #[derive(Default)]
    struct RecordingPacer {
        calls: AtomicUsize,
        indices: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Pacer for RecordingPacer {
        async fn wait_turn(&self, index: usize) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.indices.lock().unwrap().push(index);
        }
    }

    fn orchestrator(uri: &str, pacer: Arc<dyn Pacer>) -> SyncOrchestrator {
        let store = client(uri);
        let hh = HhClient::new(uri, "test-agent");
        SyncOrchestrator::new(
            hh.clone(),
            store.clone(),
            Deduplicator::new(store, Duration::from_secs(5)),
            ContactResolver::new(hh),
            pacer,
        )
    }

    fn no_delay() -> Arc<dyn Pacer> {
        Arc::new(FixedIntervalPacer::new(Duration::ZERO))
    }

    async fn mount_resume(server: &MockServer, id: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/resumes/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mount_store(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v0/appBase/People"))
            .and(query_param("filterByFormula", "OR({Email}='dup@example.com')"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [{"id": "recDup", "fields": {}}]
            })))
            .with_priority(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/appBase/People"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v0/appBase/People"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [{"id": "recNew", "fields": {}}]
            })))
            .mount(server)
            .await;
    }

    async fn mixed_batch_server() -> MockServer {
        let server = MockServer::start().await;
        let uri = server.uri();

        mount_resume(
            &server,
            "free",
            json!({"id": "free", "contact": [{"type": {"id": "email"}, "value": "free@example.com"}]}),
        )
        .await;
        mount_resume(
            &server,
            "dup",
            json!({"id": "dup", "contact": [{"type": {"id": "email"}, "value": "dup@example.com"}]}),
        )
        .await;
        mount_resume(
            &server,
            "locked",
            json!({"id": "locked", "actions": {"get_with_contact": {"url": format!("{uri}/resumes/locked/contacts")}}}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/resumes/locked/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "locked",
                "contact": [{"type": {"id": "cell"}, "value": {"formatted": "+7 999 000-00-00"}}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/resumes/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_store(&server).await;

        server
    }

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_save_one_saves_resume_with_free_contacts() {
        let server = mixed_batch_server().await;
        let outcome = orchestrator(&server.uri(), no_delay())
            .save_one("tok", "free", false)
            .await;
        assert_eq!(
            outcome,
            SyncOutcome::Saved {
                had_free_contacts: true,
                paid_unlock: false
            }
        );
    }

    #[tokio::test]
    async fn test_save_one_short_circuits_duplicate() {
        let server = MockServer::start().await;
        mount_resume(
            &server,
            "dup",
            json!({"id": "dup", "contact": [{"type": {"id": "email"}, "value": "dup@example.com"}]}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/v0/appBase/People"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [{"id": "recDup", "fields": {}}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = orchestrator(&server.uri(), no_delay())
            .save_one("tok", "dup", true)
            .await;
        assert_eq!(outcome, SyncOutcome::Duplicate);
    }

    #[tokio::test]
    async fn test_save_one_write_rejection_fails_at_write_stage() {
        let server = MockServer::start().await;
        mount_resume(&server, "r1", json!({"id": "r1"})).await;
        Mock::given(method("POST"))
            .and(path("/v0/appBase/People"))
            .respond_with(ResponseTemplate::new(422).set_body_string("INVALID_VALUE"))
            .mount(&server)
            .await;

        let outcome = orchestrator(&server.uri(), no_delay())
            .save_one("tok", "r1", false)
            .await;
        assert!(matches!(
            outcome,
            SyncOutcome::Failed {
                stage: SyncStage::Write,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_batch_tallies_every_outcome() {
        let server = mixed_batch_server().await;
        let report = orchestrator(&server.uri(), no_delay())
            .run_batch("tok", &ids(&["free", "dup", "missing", "locked"]), true)
            .await;

        assert_eq!(report.total, 4);
        assert_eq!(report.saved, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.paid_unlocked, 1);
        assert_eq!(report.saved_with_free_contacts, 1);
        assert_eq!(report.saved_without_contacts, 0);
        assert_eq!(report.saved + report.duplicates + report.errors, report.total);
        assert_eq!(report.failures[0].resume_id, "missing");
    }

    #[tokio::test]
    async fn test_batch_without_paid_unlock_saves_without_contacts() {
        let server = mixed_batch_server().await;
        let report = orchestrator(&server.uri(), no_delay())
            .run_batch("tok", &ids(&["locked"]), false)
            .await;

        assert_eq!(report.saved, 1);
        assert_eq!(report.paid_unlocked, 0);
        assert_eq!(report.saved_without_contacts, 1);
    }

    #[tokio::test]
    async fn test_batch_where_everything_fails_still_counts_total() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let report = orchestrator(&server.uri(), no_delay())
            .run_batch("tok", &ids(&["a", "b", "c"]), false)
            .await;
        assert_eq!(report.total, 3);
        assert_eq!(report.errors, 3);
        assert_eq!(report.saved + report.duplicates + report.errors, report.total);
    }

    #[tokio::test]
    async fn test_batch_paces_every_item_in_order() {
        let server = mixed_batch_server().await;
        let pacer = Arc::new(RecordingPacer::default());
        let report = orchestrator(&server.uri(), pacer.clone())
            .run_batch("tok", &ids(&["free", "missing", "dup"]), false)
            .await;

        assert_eq!(report.total, 3);
        assert_eq!(pacer.calls.load(Ordering::SeqCst), 3);
        assert_eq!(*pacer.indices.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_empty_report() {
        let server = MockServer::start().await;
        let report = orchestrator(&server.uri(), no_delay())
            .run_batch("tok", &[], true)
            .await;
        assert_eq!(report, SyncReport::default());
    }
}
