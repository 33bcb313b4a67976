//! Axum route handlers for browsing provider resumes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::area::Area;
use crate::models::criteria::SearchCriteria;
use crate::models::resume::{is_valid_id, ResumeDetail, SearchPage};
use crate::search::form::SearchForm;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub criteria: SearchCriteria,
    #[serde(flatten)]
    pub page: SearchPage,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub resume: ResumeDetail,
    pub has_contacts: bool,
    pub can_unlock: bool,
    pub unlocked_this_session: bool,
}

/// GET /search-results
pub async fn handle_search(
    State(state): State<AppState>,
    Query(form): Query<SearchForm>,
) -> Result<Json<SearchResponse>, AppError> {
    let token = state.sessions.get_token().await?;
    let criteria = form.into_criteria()?;

    let page = state.hh.search(&token.access_token, &criteria).await?;

    Ok(Json(SearchResponse { criteria, page }))
}

/// GET /resume/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    if !is_valid_id(&resume_id) {
        return Err(AppError::Validation(format!(
            "resume id must be alphanumeric, got '{resume_id}'"
        )));
    }
    let token = state.sessions.get_token().await?;
    let resume = state.hh.get_detail(&token.access_token, &resume_id).await?;

    Ok(Json(ResumeDetailResponse {
        has_contacts: resume.has_contacts(),
        can_unlock: resume.paid_unlock_action.is_some(),
        unlocked_this_session: state.sessions.cache().is_unlocked(&resume_id).await,
        resume,
    }))
}

/// GET /api/areas
pub async fn handle_areas(State(state): State<AppState>) -> Result<Json<Vec<Area>>, AppError> {
    let token = state.sessions.get_token().await?;
    Ok(Json(state.hh.fetch_areas(&token.access_token).await?))
}
