use std::sync::Arc;

use crate::config::Config;
use crate::hh_client::oauth::{OAuthExchanger, OAuthSettings};
use crate::hh_client::HhClient;
use crate::session::{FileTokenStore, SessionCache, SessionTokenProvider};
use crate::store::dedup::Deduplicator;
use crate::store::{AirtableClient, StoreSettings};
use crate::sync::contacts::ContactResolver;
use crate::sync::orchestrator::SyncOrchestrator;
use crate::sync::pacer::build_pacer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub hh: HhClient,
    pub oauth: OAuthExchanger,
    /// Cache-then-file session lookup. Single operator, single process.
    pub sessions: SessionTokenProvider,
    pub contacts: ContactResolver,
    pub sync: SyncOrchestrator,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let hh = HhClient::new(&config.hh_api_url, &config.hh_user_agent);
        let oauth = OAuthExchanger::new(
            hh.clone(),
            OAuthSettings {
                oauth_url: config.hh_oauth_url.clone(),
                client_id: config.hh_client_id.clone(),
                client_secret: config.hh_client_secret.clone(),
                redirect_uri: config.hh_redirect_uri.clone(),
            },
        );
        let store = AirtableClient::new(StoreSettings {
            api_url: config.airtable_api_url.clone(),
            api_key: config.airtable_api_key.clone(),
            base_id: config.airtable_base_id.clone(),
            table: config.airtable_table.clone(),
        });
        let sessions = SessionTokenProvider::new(
            Arc::new(SessionCache::new()),
            Arc::new(FileTokenStore::new(config.tokens_file.clone())),
        );
        let contacts = ContactResolver::new(hh.clone());
        let sync = SyncOrchestrator::new(
            hh.clone(),
            store.clone(),
            Deduplicator::new(store, config.dedup_timeout),
            contacts.clone(),
            build_pacer(config.batch_pacer, config.batch_delay),
        );

        Self {
            contacts,
            config,
            hh,
            oauth,
            sessions,
            sync,
        }
    }
}
