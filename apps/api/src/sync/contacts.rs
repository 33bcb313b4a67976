//! Decides whether a resume's contacts are already visible or must be
//! paid-unlocked. Unlock failures are never fatal: the original resume is
//! kept and the save proceeds without contacts.

use serde::Serialize;
use tracing::{info, warn};

use crate::hh_client::HhClient;
use crate::models::resume::ResumeDetail;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "unlock", rename_all = "snake_case")]
pub enum UnlockOutcome {
    /// Contacts were already visible.
    NotNeeded,
    /// Contacts gated and the caller did not allow spending quota.
    NotAllowed,
    /// Contacts gated and the provider offered no unlock action.
    Unavailable,
    Performed,
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct ContactResolution {
    pub resume: ResumeDetail,
    pub had_free_contacts: bool,
    pub unlock: UnlockOutcome,
}

impl ContactResolution {
    pub fn paid_unlock_performed(&self) -> bool {
        self.unlock == UnlockOutcome::Performed
    }
}

#[derive(Clone)]
pub struct ContactResolver {
    hh: HhClient,
}

impl ContactResolver {
    pub fn new(hh: HhClient) -> Self {
        Self { hh }
    }

    pub async fn resolve(
        &self,
        token: &str,
        resume: ResumeDetail,
        allow_paid_unlock: bool,
    ) -> ContactResolution {
        if resume.has_contacts() {
            return ContactResolution {
                resume,
                had_free_contacts: true,
                unlock: UnlockOutcome::NotNeeded,
            };
        }

        if !allow_paid_unlock {
            return ContactResolution {
                resume,
                had_free_contacts: false,
                unlock: UnlockOutcome::NotAllowed,
            };
        }

        let Some(action) = resume.paid_unlock_action.clone() else {
            return ContactResolution {
                resume,
                had_free_contacts: false,
                unlock: UnlockOutcome::Unavailable,
            };
        };

        match self.hh.invoke_action(token, &action).await {
            Ok(enriched) => {
                info!(
                    "Paid contact unlock performed for resume {}",
                    resume.summary.id
                );
                ContactResolution {
                    resume: enriched,
                    had_free_contacts: false,
                    unlock: UnlockOutcome::Performed,
                }
            }
            Err(e) => {
                warn!(
                    "Paid contact unlock failed for resume {}: {e}",
                    resume.summary.id
                );
                ContactResolution {
                    resume,
                    had_free_contacts: false,
                    unlock: UnlockOutcome::Failed {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }
}
