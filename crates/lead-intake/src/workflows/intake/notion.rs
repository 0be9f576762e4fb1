use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::record::ExternalRecord;
use super::transport::{RecordId, RecordTransport, TransportError};
use crate::config::NotionConfig;

#[derive(Debug, Serialize)]
struct DatabaseParent<'a> {
    database_id: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePageRequest<'a> {
    parent: DatabaseParent<'a>,
    properties: &'a ExternalRecord,
}

#[derive(Debug, Deserialize)]
struct CreatePageResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Creates one database page per lead through the Notion REST API.
pub struct NotionTransport {
    client: reqwest::Client,
    config: NotionConfig,
}

impl NotionTransport {
    pub fn new(config: NotionConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| TransportError::Configuration(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn pages_url(&self) -> String {
        format!("{}/pages", self.config.api_url.trim_end_matches('/'))
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            TransportError::Configuration("NOTION_API_KEY contains invalid characters".into())
        })?;
        let version = HeaderValue::from_str(&self.config.version).map_err(|_| {
            TransportError::Configuration("NOTION_VERSION contains invalid characters".into())
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("notion-version", version);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl std::fmt::Debug for NotionTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RecordTransport for NotionTransport {
    async fn send(&self, record: &ExternalRecord) -> Result<RecordId, TransportError> {
        let database_id = self.config.database_id.as_deref().ok_or_else(|| {
            TransportError::Configuration("NOTION_DATABASE_ID is not set".to_string())
        })?;
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            TransportError::Configuration("NOTION_API_KEY is not set".to_string())
        })?;

        let body = CreatePageRequest {
            parent: DatabaseParent { database_id },
            properties: record,
        };

        debug!(properties = record.len(), "sending lead to notion");
        let response = self
            .client
            .post(self.pages_url())
            .headers(self.headers(api_key)?)
            .json(&body)
            .send()
            .await
            .map_err(|err| TransportError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<NotionErrorBody>()
                .await
                .ok()
                .map(|body| match (body.code, body.message) {
                    (Some(code), Some(message)) => format!("{code}: {message}"),
                    (None, Some(message)) => message,
                    (Some(code), None) => code,
                    (None, None) => String::new(),
                })
                .filter(|detail| !detail.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            warn!(status = status.as_u16(), %detail, "notion rejected lead");
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message: detail,
            });
        }

        let created = response
            .json::<CreatePageResponse>()
            .await
            .map_err(|err| TransportError::Unavailable(format!("unreadable response: {err}")))?;
        info!(record_id = %created.id, "new lead row created in notion");
        Ok(RecordId(created.id))
    }
}
