//! Vector-store backend client.
//!
//! The backend owns all persistence and ranking. This module only shapes
//! outbound requests and normalizes whatever comes back:
//!
//! - `POST <base_url>/add_note` stores a [`MemoryRecord`]
//! - `POST <base_url>/search_semantic` runs a [`SearchRequest`]
//!
//! Every call is a single request with a bounded wait and no retries.

pub mod client;
pub mod error;
pub mod types;

pub use client::BackendClient;
pub use error::BackendError;
pub use types::{MemoryRecord, Priority, SEARCH_RESULT_LIMIT, SearchRequest, SearchResult};

use async_trait::async_trait;

/// The two operations the gateway needs from a backend.
///
/// [`BackendClient`] is the HTTP implementation; tests may substitute
/// their own.
#[async_trait]
pub trait MemoryBackend: Send + Sync + std::fmt::Debug {
    /// Store a note and return the backend-assigned identifier.
    async fn store(&self, record: &MemoryRecord) -> Result<String, BackendError>;

    /// Run a semantic search, returning items in backend order.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, BackendError>;
}
