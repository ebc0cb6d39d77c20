//! Host backed by the Azure DevOps REST API
//!
//! Stands in for the browser extension host: the session is a PAT-authenticated
//! HTTP client and the work-item form reads the configured Epic through the
//! work item tracking API.

use super::error::HostError;
use super::traits::{HostSdk, WorkItemForm};
use super::types::{WorkItemId, FIELD_WORK_ITEM_TYPE, WORK_ITEM_FORM_SERVICE};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;

/// REST API version used for every call
const API_VERSION: &str = "7.0";

/// Settings needed to reach Azure DevOps
#[derive(Debug, Clone, Default)]
pub struct AzureHostConfig {
    /// Organization URL, e.g. `https://dev.azure.com/contoso`
    pub org_url: Option<String>,
    pub project: Option<String>,
    /// Personal access token
    pub token: Option<String>,
    /// The Epic the panel is opened on
    pub epic_id: Option<WorkItemId>,
}

/// Validated connection details, created by `init`
struct Session {
    client: reqwest::Client,
    org_url: Url,
    project: String,
    token: String,
    epic_id: WorkItemId,
}

impl Session {
    /// Build `{org}/{segments..}?api-version=7.0`
    fn api_url(&self, segments: &[&str]) -> Result<Url, HostError> {
        let mut url = self.org_url.clone();
        url.path_segments_mut()
            .map_err(|_| HostError::InvalidSetting {
                name: "AZURE_ORG_URL",
                reason: "cannot be used as a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T, HostError> {
        tracing::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .basic_auth("", Some(&self.token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HostError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| HostError::InvalidResponse(e.to_string()))
    }
}

/// Host session against an Azure DevOps organization
pub struct AzureDevOpsHost {
    config: AzureHostConfig,
    session: OnceLock<Arc<Session>>,
}

impl AzureDevOpsHost {
    pub fn new(config: AzureHostConfig) -> Self {
        Self {
            config,
            session: OnceLock::new(),
        }
    }

    fn session(&self) -> Result<&Arc<Session>, HostError> {
        self.session
            .get()
            .ok_or(HostError::InvalidSession("not initialized"))
    }

    fn build_session(&self) -> Result<Session, HostError> {
        let org_url = non_empty(self.config.org_url.as_deref(), "AZURE_ORG_URL")?;
        let project = non_empty(self.config.project.as_deref(), "AZURE_PROJECT")?;
        let token = non_empty(self.config.token.as_deref(), "AZURE_TOKEN")?;
        let epic_id = self
            .config
            .epic_id
            .ok_or(HostError::NotConfigured("STORYGEN_EPIC_ID"))?;

        let org_url = Url::parse(org_url).map_err(|e| HostError::InvalidSetting {
            name: "AZURE_ORG_URL",
            reason: e.to_string(),
        })?;
        if org_url.cannot_be_a_base() {
            return Err(HostError::InvalidSetting {
                name: "AZURE_ORG_URL",
                reason: "cannot be used as a base URL".to_string(),
            });
        }

        let client = reqwest::Client::builder().build()?;

        Ok(Session {
            client,
            org_url,
            project: project.to_string(),
            token: token.to_string(),
            epic_id,
        })
    }
}

fn non_empty<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, HostError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(HostError::NotConfigured(name)),
    }
}

#[async_trait]
impl HostSdk for AzureDevOpsHost {
    async fn init(&self) -> Result<(), HostError> {
        let session = self.build_session()?;
        tracing::info!(
            "Host session for {}/{} (Epic {})",
            session.org_url,
            session.project,
            session.epic_id
        );
        self.session
            .set(Arc::new(session))
            .map_err(|_| HostError::InvalidSession("already initialized"))
    }

    async fn ready(&self) -> Result<(), HostError> {
        let session = self.session()?;
        let url = session.api_url(&["_apis", "projects"])?;
        let projects: Value = session.get_json(url).await?;
        let visible = projects.get("count").and_then(Value::as_u64).unwrap_or(0);
        tracing::info!("Azure DevOps authentication OK ({visible} projects visible)");
        Ok(())
    }

    fn notify_load_succeeded(&self) {
        tracing::info!("Panel loaded");
    }

    fn notify_load_failed(&self, message: &str) {
        tracing::error!("Panel failed to load: {message}");
    }

    async fn get_service(&self, service_id: &str) -> Result<Arc<dyn WorkItemForm>, HostError> {
        if service_id != WORK_ITEM_FORM_SERVICE {
            return Err(HostError::ServiceUnavailable(service_id.to_string()));
        }
        let session = Arc::clone(self.session()?);
        Ok(Arc::new(AzureWorkItemForm::new(session)))
    }
}

#[derive(Debug, Deserialize)]
struct WorkItemPayload {
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Work-item form for the configured Epic
pub struct AzureWorkItemForm {
    session: Arc<Session>,
    /// Fields from the last fetch; `None` until first read
    fields: RwLock<Option<Map<String, Value>>>,
}

impl AzureWorkItemForm {
    fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            fields: RwLock::new(None),
        }
    }

    async fn fetch(&self) -> Result<Map<String, Value>, HostError> {
        let id = self.session.epic_id.to_string();
        let url = self.session.api_url(&[
            self.session.project.as_str(),
            "_apis",
            "wit",
            "workitems",
            id.as_str(),
        ])?;
        let payload: WorkItemPayload = self.session.get_json(url).await?;

        match payload.fields.get(FIELD_WORK_ITEM_TYPE).and_then(Value::as_str) {
            Some("Epic") | None => {}
            Some(other) => tracing::warn!("Work item {id} is a {other}, not an Epic"),
        }

        *self.fields.write().await = Some(payload.fields.clone());
        Ok(payload.fields)
    }
}

#[async_trait]
impl WorkItemForm for AzureWorkItemForm {
    async fn get_id(&self) -> Result<WorkItemId, HostError> {
        Ok(self.session.epic_id)
    }

    async fn get_field_value(&self, field_name: &str) -> Result<Option<Value>, HostError> {
        if let Some(fields) = self.fields.read().await.as_ref() {
            return Ok(fields.get(field_name).cloned());
        }
        let fields = self.fetch().await?;
        Ok(fields.get(field_name).cloned())
    }

    async fn refresh(&self) -> Result<(), HostError> {
        self.fetch().await?;
        tracing::info!("Refreshed work item {}", self.session.epic_id);
        Ok(())
    }
}
