//! Tool gateway: validates tool arguments, calls the backend once, and turns
//! the outcome into a reply string.
//!
//! Replies are always strings. Failures are rendered through
//! [`ToolError::user_message`] and never escape as errors, so the caller sees
//! a readable sentence whatever happens.

pub mod error;
pub mod format;

pub use error::{Operation, ToolError};

use std::sync::Arc;

use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::backend::{MemoryBackend, MemoryRecord, Priority, SearchRequest, SearchResult};

/// Entry point for both memory tools.
#[derive(Debug, Clone)]
pub struct MemoryGateway {
    backend: Arc<dyn MemoryBackend>,
    tenant_id: String,
}

impl MemoryGateway {
    pub fn new(backend: Arc<dyn MemoryBackend>, tenant_id: impl Into<String>) -> Self {
        Self {
            backend,
            tenant_id: tenant_id.into(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Store `text` as a new memory.
    ///
    /// Unknown priorities fall back to `med`; duplicate tags are dropped.
    pub async fn add_memory(
        &self,
        text: &str,
        priority: Option<&str>,
        tags: Option<Vec<String>>,
    ) -> String {
        let op = Operation::AddMemory;
        let span = info_span!("tool", tool = op.name(), invocation_id = %Uuid::new_v4());
        async {
            match self.try_add_memory(text, priority, tags).await {
                Ok((note_id, record)) => {
                    info!(
                        name: "memory.saved",
                        note_id = %note_id,
                        priority = record.priority.as_str(),
                        tag_count = record.tags.len(),
                        "Memory saved"
                    );
                    format::saved(&note_id, &record.text)
                }
                Err(e) => Self::render_failure(op, &e),
            }
        }
        .instrument(span)
        .await
    }

    /// Search stored memories with a natural-language `query`.
    pub async fn search_memory(&self, query: &str) -> String {
        let op = Operation::SearchMemory;
        let span = info_span!("tool", tool = op.name(), invocation_id = %Uuid::new_v4());
        async {
            match self.try_search_memory(query).await {
                Ok((request, results)) => {
                    info!(
                        name: "memory.search.completed",
                        result_count = results.len(),
                        "Memory search completed"
                    );
                    format::search_results(&request.query_text, &results)
                }
                Err(e) => Self::render_failure(op, &e),
            }
        }
        .instrument(span)
        .await
    }

    async fn try_add_memory(
        &self,
        text: &str,
        priority: Option<&str>,
        tags: Option<Vec<String>>,
    ) -> Result<(String, MemoryRecord), ToolError> {
        let record = MemoryRecord::new(
            self.tenant_id.as_str(),
            text,
            Priority::from_arg(priority),
            tags.unwrap_or_default(),
        )
        .ok_or(ToolError::InvalidInput("text"))?;

        let note_id = self.backend.store(&record).await?;
        Ok((note_id, record))
    }

    async fn try_search_memory(
        &self,
        query: &str,
    ) -> Result<(SearchRequest, Vec<SearchResult>), ToolError> {
        let request = SearchRequest::new(self.tenant_id.as_str(), query)
            .ok_or(ToolError::InvalidInput("query"))?;

        let results = self.backend.search(&request).await?;
        Ok((request, results))
    }

    fn render_failure(op: Operation, err: &ToolError) -> String {
        warn!(
            name: "memory.tool.failed",
            tool = op.name(),
            kind = err.kind(),
            error = %err,
            "Tool invocation failed"
        );
        err.user_message(op)
    }
}
