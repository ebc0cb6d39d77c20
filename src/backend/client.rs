//! HTTP client for the story backend
//!
//! Talks JSON to the service that searches the wiki and generates stories.
//! Every non-2xx response becomes [`BackendError::Status`] so callers can
//! report the status code.

use super::error::BackendError;
use super::traits::StoryBackend;
use super::types::{
    FindWikiPagesRequest, FindWikiPagesResponse, GenerateStoriesRequest, GenerateStoriesResponse,
    HealthStatus, StoryResult, WikiPage,
};
use crate::host::WorkItemId;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Default backend address
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Client for the story backend
pub struct HttpStoryBackend {
    client: reqwest::Client,
    base_url: String,
    /// Bearer token sent with every request, if configured
    auth_token: Option<String>,
}

impl HttpStoryBackend {
    /// Create a new backend client
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_reqwest_client(client, base_url, auth_token))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_reqwest_client(
        client: reqwest::Client,
        base_url: &str,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, BackendError>
    where
        Req: serde::Serialize + ?Sized + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("POST {url}");
        let response = self
            .authorize(self.client.post(&url).json(body))
            .send()
            .await?;
        decode(response).await
    }
}

/// Map a response to either its JSON body or a status error
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Backend responded with {}: {}", status.as_u16(), body);
        return Err(BackendError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl StoryBackend for HttpStoryBackend {
    async fn find_wiki_pages(&self, epic_title: &str) -> Result<Vec<WikiPage>, BackendError> {
        let request = FindWikiPagesRequest {
            epic_title: epic_title.to_string(),
        };
        let response: FindWikiPagesResponse = self.post_json("find_wiki_pages", &request).await?;
        Ok(response.pages)
    }

    async fn generate_stories(
        &self,
        wiki_page_paths: &[String],
        epic_id: WorkItemId,
    ) -> Result<Vec<StoryResult>, BackendError> {
        let request = GenerateStoriesRequest {
            wiki_page_paths: wiki_page_paths.to_vec(),
            epic_id,
        };
        let response: GenerateStoriesResponse =
            self.post_json("generate_stories", &request).await?;
        if let Some(message) = &response.message {
            tracing::info!("Backend: {message}");
        }
        Ok(response.stories)
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        let url = self.url("health");
        tracing::debug!("GET {url}");
        let response = self.authorize(self.client.get(&url)).send().await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    /// Serve `router` on an ephemeral port and return its base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn fake_backend() -> Router {
        Router::new()
            .route(
                "/find_wiki_pages",
                post(|Json(body): Json<Value>| async move {
                    let title = body["epic_title"].as_str().unwrap_or_default().to_string();
                    Json(json!({
                        "pages": [
                            {"path": format!("{title}/Overview"), "confidence": 0.9, "reason": "title"},
                            {"path": "Payments", "confidence": 0.7}
                        ]
                    }))
                }),
            )
            .route(
                "/generate_stories",
                post(|Json(body): Json<Value>| async move {
                    let count = body["wiki_page_paths"].as_array().map_or(0, |a| a.len());
                    Json(json!({
                        "message": format!("Generated stories from {count} wiki pages"),
                        "stories": [
                            {"title": "User Story: A", "status": "created", "epic": body["epic_id"]},
                            {"title": "User Story: B", "status": "failed", "error": "boom"}
                        ]
                    }))
                }),
            )
            .route(
                "/health",
                get(|| async { Json(json!({"status": "ok", "service": "Story Generator"})) }),
            )
    }

    #[tokio::test]
    async fn test_find_wiki_pages_sends_title() {
        let url = serve(fake_backend()).await;
        let backend = HttpStoryBackend::new(&url, None).unwrap();

        let pages = backend.find_wiki_pages("Checkout Flow").await.unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].path, "Checkout Flow/Overview");
        assert_eq!(pages[0].reason.as_deref(), Some("title"));
        assert_eq!(pages[1].path, "Payments");
    }

    #[tokio::test]
    async fn test_generate_stories_echoes_epic_id() {
        let url = serve(fake_backend()).await;
        let backend = HttpStoryBackend::new(&format!("{url}/"), None).unwrap();

        let paths = vec!["Checkout".to_string(), "Payments".to_string()];
        let stories = backend
            .generate_stories(&paths, WorkItemId(1234))
            .await
            .unwrap();

        assert_eq!(stories.len(), 2);
        assert!(stories[0].is_created());
        assert_eq!(stories[0].extra.get("epic"), Some(&json!(1234)));
        assert!(!stories[1].is_created());
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let router = Router::new()
            .route(
                "/find_wiki_pages",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "wiki offline") }),
            )
            .route(
                "/generate_stories",
                post(|| async { (StatusCode::NOT_FOUND, "Wiki pages not found") }),
            );
        let url = serve(router).await;
        let backend = HttpStoryBackend::new(&url, None).unwrap();

        let err = backend.find_wiki_pages("Checkout").await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert!(matches!(err, BackendError::Status { ref body, .. } if body == "wiki offline"));

        let err = backend
            .generate_stories(&["Checkout".to_string()], WorkItemId(1))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let router = Router::new().route(
            "/find_wiki_pages",
            post(|| async { Json(json!({"pages": "not a list"})) }),
        );
        let url = serve(router).await;
        let backend = HttpStoryBackend::new(&url, None).unwrap();

        let err = backend.find_wiki_pages("Checkout").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
        assert_eq!(err.status_code(), None);
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let router = Router::new().route(
            "/health",
            get(|headers: HeaderMap| async move {
                match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    Some("Bearer secret") => {
                        (StatusCode::OK, Json(json!({"status": "ok"})))
                    }
                    _ => (StatusCode::UNAUTHORIZED, Json(json!({"status": "denied"}))),
                }
            }),
        );
        let url = serve(router).await;

        let anonymous = HttpStoryBackend::new(&url, None).unwrap();
        let err = anonymous.health().await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));

        let authorized = HttpStoryBackend::new(&url, Some("secret".to_string())).unwrap();
        let health = authorized.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.service, None);
    }

    #[tokio::test]
    async fn test_health() {
        let url = serve(fake_backend()).await;
        let backend = HttpStoryBackend::new(&url, None).unwrap();
        let health = backend.health().await.unwrap();
        assert_eq!(health.service.as_deref(), Some("Story Generator"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpStoryBackend::new(&format!("http://{addr}"), None).unwrap();
        let err = backend.find_wiki_pages("Checkout").await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let backend = HttpStoryBackend::new("http://localhost:8000///", None).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(backend.url("/health"), "http://localhost:8000/health");
    }
}
