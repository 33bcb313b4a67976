//! Axum route handlers for the OAuth login flow.

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::session::UserIdentity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LandingQuery {
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LandingResponse {
    pub authenticated: bool,
    pub user: Option<UserIdentity>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// GET /
pub async fn handle_landing(
    State(state): State<AppState>,
    Query(query): Query<LandingQuery>,
) -> Json<LandingResponse> {
    let session = state.sessions.current().await;
    Json(LandingResponse {
        authenticated: session.is_some(),
        user: session.map(|s| s.user_info),
        error: query.error,
    })
}

/// GET /auth
///
/// Redirects to the provider's authorize endpoint.
pub async fn handle_auth(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let url = state.oauth.authorize_url()?;
    Ok(Redirect::to(url.as_str()))
}

/// GET /callback
///
/// Exchanges the code, fetches the identity, persists the session.
pub async fn handle_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, AppError> {
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return Ok(Redirect::to("/?error=no_code"));
    };

    let token = state.oauth.exchange_code(&code).await?;
    let identity = state.oauth.fetch_identity(&token).await;

    state.sessions.login(token, identity).await.map_err(|e| {
        error!("Failed to store session: {e:#}");
        AppError::Internal(e)
    })?;
    info!("Operator logged in");

    Ok(Redirect::to("/"))
}

/// GET /logout
pub async fn handle_logout(State(state): State<AppState>) -> Redirect {
    state.sessions.logout().await;
    Redirect::to("/")
}
