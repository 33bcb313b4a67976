//! Axum route handlers for contact unlock and store synchronization.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::{is_valid_id, ResumeDetail};
use crate::models::sync::{SyncOutcome, SyncReport};
use crate::state::AppState;
use crate::sync::contacts::UnlockOutcome;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeIdRequest {
    pub resume_id: String,
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub resume: ResumeDetail,
    pub had_free_contacts: bool,
    #[serde(flatten)]
    pub unlock: UnlockOutcome,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSaveRequest {
    pub resume_id: String,
    #[serde(default)]
    pub open_paid_contacts: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRunRequest {
    pub resume_ids: Vec<String>,
    #[serde(default)]
    pub open_paid_contacts: bool,
}

/// Per-item result of the batch save API.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_duplicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_contact_opened: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub had_free_contacts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SyncOutcome> for BatchSaveResponse {
    fn from(outcome: SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Saved {
                had_free_contacts,
                paid_unlock,
            } => BatchSaveResponse {
                success: true,
                is_duplicate: Some(false),
                paid_contact_opened: Some(paid_unlock),
                had_free_contacts: Some(had_free_contacts),
                error: None,
            },
            SyncOutcome::Duplicate => BatchSaveResponse {
                success: true,
                is_duplicate: Some(true),
                paid_contact_opened: None,
                had_free_contacts: None,
                error: None,
            },
            SyncOutcome::Failed { reason, .. } => BatchSaveResponse {
                success: false,
                is_duplicate: None,
                paid_contact_opened: None,
                had_free_contacts: None,
                error: Some(reason),
            },
        }
    }
}

fn require_id(resume_id: &str) -> Result<(), AppError> {
    if resume_id.trim().is_empty() {
        return Err(AppError::Validation("resumeId cannot be empty".to_string()));
    }
    if !is_valid_id(resume_id) {
        return Err(AppError::Validation(format!(
            "resumeId must be alphanumeric, got '{resume_id}'"
        )));
    }
    Ok(())
}

/// POST /view-contacts
///
/// Spends one unlock from the provider quota when contacts are gated.
/// The id is remembered so a later single save may reuse the unlock.
pub async fn handle_view_contacts(
    State(state): State<AppState>,
    Json(request): Json<ResumeIdRequest>,
) -> Result<Json<UnlockResponse>, AppError> {
    require_id(&request.resume_id)?;
    let token = state.sessions.get_token().await?;

    let resume = state
        .hh
        .get_detail(&token.access_token, &request.resume_id)
        .await?;
    if !resume.has_contacts() && resume.paid_unlock_action.is_none() {
        return Err(AppError::Validation(format!(
            "No access to contacts of resume {}",
            request.resume_id
        )));
    }

    let resolution = state
        .contacts
        .resolve(&token.access_token, resume, true)
        .await;
    if resolution.paid_unlock_performed() {
        state.sessions.cache().mark_unlocked(&request.resume_id).await;
    }

    Ok(Json(UnlockResponse {
        resume: resolution.resume,
        had_free_contacts: resolution.had_free_contacts,
        unlock: resolution.unlock,
    }))
}

/// POST /save-to-airtable
///
/// Paid unlock is allowed only for resumes unlocked earlier in this session.
pub async fn handle_save(
    State(state): State<AppState>,
    Json(request): Json<ResumeIdRequest>,
) -> Result<Json<SyncOutcome>, AppError> {
    require_id(&request.resume_id)?;
    let token = state.sessions.get_token().await?;
    let allow_paid_unlock = state.sessions.cache().is_unlocked(&request.resume_id).await;

    let outcome = state
        .sync
        .save_one(&token.access_token, &request.resume_id, allow_paid_unlock)
        .await;
    Ok(Json(outcome))
}

/// POST /api/batch-save
///
/// One item per call; the caller drives the loop.
pub async fn handle_batch_save(
    State(state): State<AppState>,
    Json(request): Json<BatchSaveRequest>,
) -> Result<Json<BatchSaveResponse>, AppError> {
    require_id(&request.resume_id)?;
    let token = state.sessions.get_token().await?;

    let outcome = state
        .sync
        .save_one(
            &token.access_token,
            &request.resume_id,
            request.open_paid_contacts,
        )
        .await;
    Ok(Json(outcome.into()))
}

/// POST /api/batch-save/run
///
/// Whole selection in one request, paced server-side.
pub async fn handle_batch_run(
    State(state): State<AppState>,
    Json(request): Json<BatchRunRequest>,
) -> Result<Json<SyncReport>, AppError> {
    for resume_id in &request.resume_ids {
        require_id(resume_id)?;
    }
    let token = state.sessions.get_token().await?;

    let report = state
        .sync
        .run_batch(
            &token.access_token,
            &request.resume_ids,
            request.open_paid_contacts,
        )
        .await;
    Ok(Json(report))
}
