//! Backend gateway: typed wrapper over the five viewer endpoints.
//!
//! The gateway is the only module with network I/O. Its contract is narrow:
//! each operation takes validated arguments and returns either the requested
//! value or a [`FetchError`]; nothing panics past this boundary and no
//! `reqwest` type leaks through it.
//!
//! [`BackendGateway`] is a trait so the orchestrator can run against a
//! scripted fake in tests (and so hosts can interpose middleware); the real
//! implementation is [`HttpGateway`].
//!
//! ## Wire contract
//!
//! | Endpoint           | Request                  | Success response            |
//! |--------------------|--------------------------|-----------------------------|
//! | `POST /init/`      | `{url}`                  | `{request_id, page_num}`    |
//! | `POST /explain/`   | `{request_id, page}`     | `{explanation}`             |
//! | `POST /image/`     | `{request_id, page}`     | binary image payload        |
//! | `POST /audio/`     | `{request_id, page}`     | binary audio payload        |
//! | `POST /regenerate/`| `{request_id, page}`     | `{explanation}`             |

use crate::config::ViewerConfig;
use crate::error::{FetchError, ViewerError};
use crate::resource::ResourceHandle;
use crate::session::SessionId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Successful `/init/` response: a session handle plus the fixed page count.
#[derive(Debug, Clone, Deserialize)]
pub struct InitResponse {
    pub request_id: SessionId,
    pub page_num: u32,
}

/// The five operations the remote backend exposes.
///
/// All failures are collapsed into [`FetchError`] at this layer; callers
/// never see transport details.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Open a session for a document URL.
    async fn init(&self, url: &str) -> Result<InitResponse, FetchError>;

    /// Fetch the explanatory text for a page.
    async fn fetch_explanation(&self, session: &SessionId, page: u32)
        -> Result<String, FetchError>;

    /// Fetch the rendered page image.
    async fn fetch_image(
        &self,
        session: &SessionId,
        page: u32,
    ) -> Result<ResourceHandle, FetchError>;

    /// Fetch the synthesized narration for a page.
    async fn fetch_audio(
        &self,
        session: &SessionId,
        page: u32,
    ) -> Result<ResourceHandle, FetchError>;

    /// Same shape as [`fetch_explanation`](Self::fetch_explanation) but tells
    /// the backend to recompute instead of reusing its own cache.
    async fn regenerate_explanation(
        &self,
        session: &SessionId,
        page: u32,
    ) -> Result<String, FetchError>;
}

#[derive(Serialize)]
struct InitRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct PageRequest<'a> {
    request_id: &'a str,
    page: u32,
}

#[derive(Deserialize)]
struct ExplanationResponse {
    explanation: String,
}

/// `reqwest`-backed gateway talking to a real backend.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway from the viewer configuration.
    ///
    /// No timeout is applied unless
    /// [`request_timeout_secs`](crate::config::ViewerConfig::request_timeout_secs)
    /// is set; a hung backend call keeps the loading state pending
    /// indefinitely.
    pub fn new(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ViewerError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a page request and decode a JSON body.
    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        session: &SessionId,
        page: u32,
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(&PageRequest {
                request_id: session.as_str(),
                page,
            })
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Backend {
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(FetchError::from_transport)
    }

    /// POST a page request and wrap the binary body in a [`ResourceHandle`].
    async fn post_binary(
        &self,
        path: &str,
        session: &SessionId,
        page: u32,
    ) -> Result<ResourceHandle, FetchError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(&PageRequest {
                request_id: session.as_str(),
                page,
            })
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Backend {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response.bytes().await.map_err(FetchError::from_transport)?;
        debug!(path, page, len = bytes.len(), %content_type, "binary artifact fetched");
        Ok(ResourceHandle::new(bytes.to_vec(), content_type))
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn init(&self, url: &str) -> Result<InitResponse, FetchError> {
        let response = self
            .client
            .post(self.endpoint("/init/"))
            .json(&InitRequest { url })
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Backend {
                status: status.as_u16(),
            });
        }

        let init: InitResponse = response
            .json()
            .await
            .map_err(FetchError::from_transport)?;
        debug!(session = %init.request_id, pages = init.page_num, "session initialised");
        Ok(init)
    }

    async fn fetch_explanation(
        &self,
        session: &SessionId,
        page: u32,
    ) -> Result<String, FetchError> {
        self.post_json::<ExplanationResponse>("/explain/", session, page)
            .await
            .map(|r| r.explanation)
    }

    async fn fetch_image(
        &self,
        session: &SessionId,
        page: u32,
    ) -> Result<ResourceHandle, FetchError> {
        self.post_binary("/image/", session, page).await
    }

    async fn fetch_audio(
        &self,
        session: &SessionId,
        page: u32,
    ) -> Result<ResourceHandle, FetchError> {
        self.post_binary("/audio/", session, page).await
    }

    async fn regenerate_explanation(
        &self,
        session: &SessionId,
        page: u32,
    ) -> Result<String, FetchError> {
        self.post_json::<ExplanationResponse>("/regenerate/", session, page)
            .await
            .map(|r| r.explanation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ViewerConfig::builder()
            .base_url("http://localhost:8000/")
            .build()
            .unwrap();
        let gw = HttpGateway::new(&config).unwrap();
        assert_eq!(gw.endpoint("/explain/"), "http://localhost:8000/explain/");
    }

    #[test]
    fn page_request_wire_shape() {
        let body = serde_json::to_value(PageRequest {
            request_id: "abc-123",
            page: 7,
        })
        .unwrap();
        assert_eq!(body["request_id"], "abc-123");
        assert_eq!(body["page"], 7);
    }

    #[test]
    fn init_response_decodes_backend_field_names() {
        let init: InitResponse =
            serde_json::from_str(r#"{"request_id": "2f1c", "page_num": 12}"#).unwrap();
        assert_eq!(init.request_id.as_str(), "2f1c");
        assert_eq!(init.page_num, 12);
    }
}
