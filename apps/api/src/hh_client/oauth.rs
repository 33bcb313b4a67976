//! Authorization-code flow against the provider's OAuth endpoints.

use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use tracing::{info, warn};

use super::{HhClient, HhError};
use crate::models::session::{Token, UserIdentity};

#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub oauth_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Clone)]
pub struct OAuthExchanger {
    hh: HhClient,
    settings: OAuthSettings,
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MeResponse {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    employer: Option<MeEmployer>,
}

#[derive(Debug, Deserialize)]
struct MeEmployer {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl OAuthExchanger {
    pub fn new(hh: HhClient, mut settings: OAuthSettings) -> Self {
        settings.oauth_url = settings.oauth_url.trim_end_matches('/').to_string();
        Self { hh, settings }
    }

    /// Provider authorize URL the operator is redirected to.
    pub fn authorize_url(&self) -> Result<Url, HhError> {
        Url::parse_with_params(
            &format!("{}/oauth/authorize", self.settings.oauth_url),
            &[
                ("response_type", "code"),
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
            ],
        )
        .map_err(|e| HhError::Payload(format!("invalid authorize url: {e}")))
    }

    /// Exchanges an authorization code for a token.
    ///
    /// Every failure is `AuthExchange`: an unreachable endpoint, a non-JSON
    /// body, or an `error` field (the provider's `error_description` is
    /// surfaced when present).
    pub async fn exchange_code(&self, code: &str) -> Result<Token, HhError> {
        let response = self
            .hh
            .http()
            .post(format!("{}/oauth/token", self.settings.oauth_url))
            .header(reqwest::header::USER_AGENT, self.hh.user_agent())
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| HhError::AuthExchange(format!("token endpoint unreachable: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| HhError::AuthExchange(format!("token response unreadable: {e}")))?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| HhError::AuthExchange(format!("token response is not JSON: {e}")))?;

        if let Ok(TokenErrorBody {
            error: Some(error),
            error_description,
        }) = serde_json::from_value::<TokenErrorBody>(value.clone())
        {
            return Err(HhError::AuthExchange(error_description.unwrap_or(error)));
        }

        let mut token: Token = serde_json::from_value(value)
            .map_err(|e| HhError::AuthExchange(format!("malformed token response: {e}")))?;
        if !token.is_usable() {
            return Err(HhError::AuthExchange(
                "token response has no access_token".to_string(),
            ));
        }
        token.obtained_at = Some(Utc::now());

        info!("Authorization code exchanged for access token");
        Ok(token)
    }

    /// GET /me. Best-effort: any failure yields a default identity.
    pub async fn fetch_identity(&self, token: &Token) -> UserIdentity {
        let me: MeResponse = match self.hh.get_json(&token.access_token, "/me").await {
            Ok(me) => me,
            Err(e) => {
                warn!("Identity fetch failed, continuing without user info: {e}");
                MeResponse::default()
            }
        };

        let (employer_id, employer_name, is_employer) = match me.employer {
            Some(employer) => (employer.id, employer.name, true),
            None => (None, None, false),
        };

        UserIdentity {
            email: me.email,
            employer_name,
            employer_id,
            is_employer,
        }
    }
}
