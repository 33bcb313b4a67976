//! Provider client: the single point of entry for all HeadHunter API calls.
//!
//! Every request is Bearer-authenticated and carries the configured
//! `User-Agent` (the provider rejects anonymous agents). Non-2xx responses
//! surface as `HhError::Upstream`; nothing is retried.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub mod oauth;
pub mod query;

use crate::models::area::Area;
use crate::models::criteria::SearchCriteria;
use crate::models::resume::{
    PaidUnlockAction, RawResume, RawSearchPage, ResumeDetail, SearchPage,
};
use query::SearchQueryBuilder;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum HhError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Unexpected payload: {0}")]
    Payload(String),

    #[error("Token exchange failed: {0}")]
    AuthExchange(String),
}

#[derive(Clone)]
pub struct HhClient {
    client: Client,
    api_url: String,
    user_agent: String,
}

impl HhClient {
    pub fn new(api_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorized(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
    }

    /// Sends the request, rejects non-2xx, and decodes the body as `T`.
    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, HhError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(HhError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| HhError::Payload(e.to_string()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> Result<T, HhError> {
        self.fetch(self.authorized(self.client.get(self.url(path)), token))
            .await
    }

    /// GET /resumes: one page of search results.
    pub async fn search(
        &self,
        token: &str,
        criteria: &SearchCriteria,
    ) -> Result<SearchPage, HhError> {
        let params = SearchQueryBuilder::for_today().build(criteria);
        debug!("Resume search params: {params:?}");

        let raw: RawSearchPage = self
            .fetch(
                self.authorized(self.client.get(self.url("/resumes")), token)
                    .query(&params),
            )
            .await?;
        let page = SearchPage::try_from(raw).map_err(|e| HhError::Payload(e.to_string()))?;

        debug!(
            "Resume search: found={} page={}/{}",
            page.found, page.page, page.pages
        );
        Ok(page)
    }

    /// GET /resumes/{id}
    pub async fn get_detail(&self, token: &str, resume_id: &str) -> Result<ResumeDetail, HhError> {
        let raw: RawResume = self
            .get_json(token, &format!("/resumes/{resume_id}"))
            .await?;
        ResumeDetail::try_from(raw).map_err(|e| HhError::Payload(e.to_string()))
    }

    /// Invokes a provider-supplied action (its own absolute url and method)
    /// and decodes the response as a resume.
    pub async fn invoke_action(
        &self,
        token: &str,
        action: &PaidUnlockAction,
    ) -> Result<ResumeDetail, HhError> {
        let method = Method::from_bytes(action.method.as_bytes())
            .map_err(|_| HhError::Payload(format!("invalid action method '{}'", action.method)))?;

        let raw: RawResume = self
            .fetch(self.authorized(self.client.request(method, &action.url), token))
            .await?;
        ResumeDetail::try_from(raw).map_err(|e| HhError::Payload(e.to_string()))
    }

    /// GET /areas, the full region tree.
    pub async fn fetch_areas(&self, token: &str) -> Result<Vec<Area>, HhError> {
        self.get_json(token, "/areas").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_sends_composed_query_and_parses_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/resumes"))
            .and(header("Authorization", "Bearer tok"))
            .and(header("User-Agent", "test-agent"))
            .and(query_param("text", "инженер AutoCAD"))
            .and(query_param("area", "1"))
            .and(query_param("per_page", "20"))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "found": 1,
                "page": 0,
                "pages": 1,
                "per_page": 20,
                "items": [{
                    "id": "abc123",
                    "title": "Инженер-конструктор",
                    "first_name": "Иван",
                    "last_name": "Петров",
                    "area": {"id": "1", "name": "Москва"},
                    "age": 34,
                    "alternate_url": "https://hh.ru/resume/abc123"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HhClient::new(mock_server.uri(), "test-agent");
        let criteria = SearchCriteria {
            free_text: "инженер".into(),
            must_have_skills: vec!["AutoCAD".into()],
            ..Default::default()
        };
        let page = client.search("tok", &criteria).await.unwrap();

        assert_eq!(page.found, 1);
        assert_eq!(page.items[0].id, "abc123");
        assert_eq!(page.items[0].area.as_deref(), Some("Москва"));
    }

    #[tokio::test]
    async fn test_detail_non_2xx_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/resumes/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HhClient::new(mock_server.uri(), "test-agent");
        let err = client.get_detail("tok", "missing").await.unwrap_err();
        assert!(matches!(err, HhError::Upstream { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_detail_without_id_is_payload_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/resumes/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "x"})))
            .mount(&mock_server)
            .await;

        let client = HhClient::new(mock_server.uri(), "test-agent");
        let err = client.get_detail("tok", "r1").await.unwrap_err();
        assert!(matches!(err, HhError::Payload(_)));
    }

    #[tokio::test]
    async fn test_invoke_action_uses_supplied_url_and_method() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/resumes/r1/unlock"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "r1",
                "contact": [{"type": {"id": "email"}, "value": "a@b.c"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HhClient::new("http://unused.invalid", "test-agent");
        let action = PaidUnlockAction {
            url: format!("{}/resumes/r1/unlock", mock_server.uri()),
            method: "POST".into(),
        };
        let resume = client.invoke_action("tok", &action).await.unwrap();
        assert_eq!(resume.email(), Some("a@b.c"));
    }

    #[tokio::test]
    async fn test_fetch_areas_parses_tree() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/areas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "113", "name": "Россия", "areas": [
                    {"id": "1", "name": "Москва", "areas": []}
                ]}
            ])))
            .mount(&mock_server)
            .await;

        let client = HhClient::new(mock_server.uri(), "test-agent");
        let areas = client.fetch_areas("tok").await.unwrap();
        assert_eq!(areas[0].areas[0].name, "Москва");
    }
}
