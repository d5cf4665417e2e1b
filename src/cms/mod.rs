use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{self, ConfigError};

pub mod cache;
pub mod endpoints;
pub mod extract;
pub mod index;
pub mod model;
pub mod resolve;

pub use cache::ResponseCache;
pub use index::ResourceIndex;
pub use model::{Document, Resource, ResourceRef};

/// Media type of the upstream document protocol.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

#[derive(Debug, Error)]
pub enum CmsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cms request failed: {status} {status_text} - {body}")]
    Upstream {
        status: u16,
        status_text: String,
        body: String,
    },
    #[error("failed to reach cms: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid cms response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid cms url: {0}")]
    InvalidUrl(String),
}

impl CmsError {
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        CmsError::Upstream {
            status,
            status_text,
            body: body.into(),
        }
    }

    /// HTTP status of an upstream failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            CmsError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Access to the CMS document API. Mappers only talk to the CMS through this seam.
#[async_trait]
pub trait CmsTransport: Send + Sync {
    /// Base URL without a trailing slash, used to absolutise media paths.
    fn base_url(&self) -> &str;

    async fn get_document(&self, endpoint: &str) -> Result<Document, CmsError>;

    async fn post_document(&self, endpoint: &str, body: &Value) -> Result<Value, CmsError>;
}

#[derive(Clone)]
pub struct CmsClient {
    http: Client,
    base_url: String,
    credentials: Option<(String, String)>,
    cache: ResponseCache<Document>,
}

impl fmt::Debug for CmsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmsClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}

impl CmsClient {
    /// Fails with `ConfigError::MissingBaseUrl` when no base URL is configured.
    pub fn from_config(cfg: &config::Cms) -> Result<Self, CmsError> {
        let base_url = cfg.base_url()?.to_string();
        let http = Client::builder()
            .user_agent("folio-cms/0.1")
            .timeout(cfg.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url,
            credentials: cfg
                .credentials()
                .map(|(u, p)| (u.to_string(), p.to_string())),
            cache: ResponseCache::new(cfg.cache_ttl()),
        })
    }

    fn url(&self, endpoint: &str) -> Result<Url, CmsError> {
        let raw = format!("{}{}", self.base_url, endpoint);
        Url::parse(&raw).map_err(|e| CmsError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    fn with_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header("Accept", JSONAPI_MEDIA_TYPE)
            .header("Content-Type", JSONAPI_MEDIA_TYPE);
        match &self.credentials {
            Some((user, pass)) => builder.basic_auth(user, Some(pass)),
            None => builder,
        }
    }

    pub fn build_get(&self, endpoint: &str) -> Result<reqwest::Request, CmsError> {
        let url = self.url(endpoint)?;
        Ok(self.with_headers(self.http.get(url)).build()?)
    }

    pub fn build_post(&self, endpoint: &str, body: &Value) -> Result<reqwest::Request, CmsError> {
        let url = self.url(endpoint)?;
        let payload = serde_json::to_vec(body)?;
        Ok(self
            .with_headers(self.http.post(url))
            .body(payload)
            .build()?)
    }

    pub fn cache(&self) -> &ResponseCache<Document> {
        &self.cache
    }
}

async fn ensure_success(res: Response) -> Result<Response, CmsError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %snippet(&body), "cms request failed");
    Err(CmsError::upstream(status.as_u16(), body))
}

// Keep log lines short when the CMS returns a full HTML error page.
fn snippet(body: &str) -> &str {
    match body.char_indices().nth(120) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl CmsTransport for CmsClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_document(&self, endpoint: &str) -> Result<Document, CmsError> {
        let request = self.build_get(endpoint)?;
        let key = request.url().to_string();
        if let Some(doc) = self.cache.get(&key) {
            debug!(url = %key, "cms cache hit");
            return Ok(doc);
        }

        debug!(url = %key, "sending cms request");
        let res = ensure_success(self.http.execute(request).await?).await?;
        let bytes = res.bytes().await?;
        let doc: Document = serde_json::from_slice(&bytes)?;
        self.cache.insert(key, doc.clone());
        Ok(doc)
    }

    async fn post_document(&self, endpoint: &str, body: &Value) -> Result<Value, CmsError> {
        let request = self.build_post(endpoint, body)?;
        debug!(url = %request.url(), "posting cms document");
        let res = ensure_success(self.http.execute(request).await?).await?;
        let bytes = res.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(user: Option<&str>, pass: Option<&str>) -> config::Cms {
        config::Cms {
            base_url: Some("https://cms.test/".into()),
            username: user.map(str::to_string),
            password: pass.map(str::to_string),
            cache_ttl_seconds: 60,
            request_timeout_seconds: 5,
            menu_id: "main".into(),
        }
    }

    fn header<'a>(request: &'a reqwest::Request, name: &str) -> Option<&'a str> {
        request.headers().get(name).and_then(|h| h.to_str().ok())
    }

    #[test]
    fn missing_base_url_is_config_error() {
        let mut cfg = settings(None, None);
        cfg.base_url = None;
        let err = CmsClient::from_config(&cfg).unwrap_err();
        assert!(matches!(err, CmsError::Config(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn build_get_sets_media_type_headers() {
        let client = CmsClient::from_config(&settings(None, None)).unwrap();
        assert_eq!(client.base_url(), "https://cms.test");
        let request = client.build_get(&endpoints::pages()).unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().as_str(), "https://cms.test/jsonapi/node/pages");
        assert_eq!(header(&request, "Accept"), Some(JSONAPI_MEDIA_TYPE));
        assert_eq!(header(&request, "Content-Type"), Some(JSONAPI_MEDIA_TYPE));
        assert!(request.headers().get("Authorization").is_none());
    }

    #[test]
    fn basic_auth_requires_both_credentials() {
        let client = CmsClient::from_config(&settings(Some("alice"), None)).unwrap();
        let request = client.build_get("/jsonapi").unwrap();
        assert!(request.headers().get("Authorization").is_none());

        let client = CmsClient::from_config(&settings(Some("alice"), Some("secret"))).unwrap();
        let request = client.build_get("/jsonapi").unwrap();
        assert_eq!(
            header(&request, "Authorization"),
            Some("Basic YWxpY2U6c2VjcmV0")
        );
    }

    #[test]
    fn build_post_carries_json_body() {
        let client = CmsClient::from_config(&settings(None, None)).unwrap();
        let body = json!({ "data": { "type": "contact_message--x" } });
        let request = client.build_post("/jsonapi/contact_message/x", &body).unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        let sent = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(serde_json::from_slice::<Value>(sent).unwrap(), body);
    }

    #[test]
    fn upstream_error_carries_status_text() {
        let err = CmsError::upstream(404, "nope");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "cms request failed: 404 Not Found - nope");
    }

    #[tokio::test]
    async fn cached_documents_skip_the_network() {
        let client = CmsClient::from_config(&settings(None, None)).unwrap();
        let endpoint = endpoints::pages();
        let key = client.build_get(&endpoint).unwrap().url().to_string();
        let doc: Document = serde_json::from_value(json!({ "data": [] })).unwrap();
        client.cache().insert(key, doc.clone());
        // cms.test never resolves, so only a cache hit can succeed
        assert_eq!(client.get_document(&endpoint).await.unwrap(), doc);
    }
}
