//! HTTP implementation of [`MemoryBackend`].

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::types::{AddNoteResponse, SearchResponse};
use super::{BackendError, MemoryBackend, MemoryRecord, SearchRequest, SearchResult};
use crate::config::BackendConfig;

const ADD_NOTE_PATH: &str = "add_note";
const SEARCH_PATH: &str = "search_semantic";

/// Longest slice of a rejection body kept for logging.
const DETAIL_LIMIT: usize = 256;

/// Client for the vector-store backend.
///
/// Cloning is cheap and clones share one connection pool, so a single
/// instance serves every concurrent tool invocation.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Build a client with a single fixed per-request timeout.
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(format!("remembar-mcp/{}", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()
            .context("failed to build backend HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Send one JSON POST and decode a 2xx body.
    ///
    /// Returns the status code alongside the body so callers can report it
    /// when the payload itself signals a refusal.
    async fn post_json<B, R>(&self, path: &'static str, body: &B) -> Result<(u16, R), BackendError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(name: "backend.request.sent", endpoint = path, url = %url, "Calling backend");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::from_transport(&e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::from_transport(&e))?;

        if status.is_client_error() {
            let detail = String::from_utf8_lossy(&bytes)
                .chars()
                .take(DETAIL_LIMIT)
                .collect();
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }
        if !status.is_success() {
            return Err(BackendError::BackendFault(format!(
                "{path} answered with status {status}"
            )));
        }

        let parsed = serde_json::from_slice(&bytes).map_err(|e| {
            BackendError::BackendFault(format!("{path} returned an unreadable body: {e}"))
        })?;
        Ok((status.as_u16(), parsed))
    }
}

#[async_trait]
impl MemoryBackend for BackendClient {
    async fn store(&self, record: &MemoryRecord) -> Result<String, BackendError> {
        let result: Result<String, BackendError> = async {
            let (status, body): (u16, AddNoteResponse) =
                self.post_json(ADD_NOTE_PATH, record).await?;
            body.into_note_id(status)
        }
        .await;

        match &result {
            Ok(note_id) => debug!(name: "backend.note.stored", note_id = %note_id, "Note stored"),
            Err(e) => warn!(
                name: "backend.request.failed",
                endpoint = ADD_NOTE_PATH,
                kind = e.kind(),
                error = %e,
                "Backend store failed"
            ),
        }
        result
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, BackendError> {
        let result: Result<Vec<SearchResult>, BackendError> = async {
            let (status, body): (u16, SearchResponse) =
                self.post_json(SEARCH_PATH, request).await?;
            body.into_results(status)
        }
        .await;

        match &result {
            Ok(items) => debug!(name: "backend.search.completed", count = items.len(), "Search answered"),
            Err(e) => warn!(
                name: "backend.request.failed",
                endpoint = SEARCH_PATH,
                kind = e.kind(),
                error = %e,
                "Backend search failed"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Priority;

    fn config(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            tenant_id: "default_user".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn endpoints_join_without_double_slash() {
        let client = BackendClient::new(&config("http://localhost:9000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
        assert_eq!(
            client.endpoint(ADD_NOTE_PATH),
            "http://localhost:9000/add_note"
        );
    }

    #[test]
    fn endpoints_keep_path_prefix() {
        let client = BackendClient::new(&config("https://memory.example.com/api")).unwrap();
        assert_eq!(
            client.endpoint(SEARCH_PATH),
            "https://memory.example.com/api/search_semantic"
        );
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = BackendClient::new(&config(&format!("http://{addr}"))).unwrap();
        let record = MemoryRecord::new("default_user", "hello", Priority::Med, Vec::new()).unwrap();
        let err = client.store(&record).await.unwrap_err();
        assert!(matches!(err, BackendError::Unreachable { .. }));
    }
}
