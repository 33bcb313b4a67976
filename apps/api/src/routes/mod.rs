pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::search::handlers as search;
use crate::session::handlers as session;
use crate::state::AppState;
use crate::sync::handlers as sync;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Login flow
        .route("/", get(session::handle_landing))
        .route("/auth", get(session::handle_auth))
        .route("/callback", get(session::handle_callback))
        .route("/logout", get(session::handle_logout))
        // Provider browsing
        .route("/search-results", get(search::handle_search))
        .route("/resume/:id", get(search::handle_get_resume))
        .route("/api/areas", get(search::handle_areas))
        // Sync
        .route("/view-contacts", post(sync::handle_view_contacts))
        .route("/save-to-airtable", post(sync::handle_save))
        .route("/api/batch-save", post(sync::handle_batch_save))
        .route("/api/batch-save/run", post(sync::handle_batch_run))
        .with_state(state)
}
