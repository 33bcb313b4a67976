use serde::Serialize;

/// Pipeline stage an item was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    Fetch,
    Write,
}

/// Terminal state of one resume passing through the sync pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    Saved {
        had_free_contacts: bool,
        paid_unlock: bool,
    },
    Duplicate,
    Failed {
        stage: SyncStage,
        reason: String,
    },
}

/// Aggregated batch result.
/// Always `saved + duplicates + errors == total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub total: usize,
    pub saved: usize,
    pub duplicates: usize,
    pub paid_unlocked: usize,
    pub saved_with_free_contacts: usize,
    pub saved_without_contacts: usize,
    pub errors: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SyncFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub resume_id: String,
    pub reason: String,
}

impl SyncReport {
    pub fn record(&mut self, resume_id: &str, outcome: &SyncOutcome) {
        self.total += 1;
        match outcome {
            SyncOutcome::Saved {
                had_free_contacts,
                paid_unlock,
            } => {
                self.saved += 1;
                if *paid_unlock {
                    self.paid_unlocked += 1;
                } else if *had_free_contacts {
                    self.saved_with_free_contacts += 1;
                } else {
                    self.saved_without_contacts += 1;
                }
            }
            SyncOutcome::Duplicate => self.duplicates += 1,
            SyncOutcome::Failed { reason, .. } => {
                self.errors += 1;
                self.failures.push(SyncFailure {
                    resume_id: resume_id.to_string(),
                    reason: reason.clone(),
                });
            }
        }
    }
}
