use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth token pair as issued by the provider's token endpoint.
///
/// `obtained_at` is not part of the provider payload; it is stamped locally
/// when the code exchange succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obtained_at: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Token {
    /// A token is usable only when it carries a non-empty access token.
    /// Expiry is never checked here; the provider rejects stale tokens.
    pub fn is_usable(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

/// Who authorised the app. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub employer_name: Option<String>,
    #[serde(default)]
    pub employer_id: Option<String>,
    #[serde(default)]
    pub is_employer: bool,
}

/// The single durable session record: `{tokens, userInfo, savedAt}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub tokens: Token,
    #[serde(default)]
    pub user_info: UserIdentity,
    pub saved_at: DateTime<Utc>,
}

impl PersistedSession {
    pub fn new(tokens: Token, user_info: UserIdentity) -> Self {
        Self {
            tokens,
            user_info,
            saved_at: Utc::now(),
        }
    }
}
