//! Request and response shapes for the backend HTTP boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::BackendError;

/// Tenant used when none is configured.
pub const DEFAULT_TENANT_ID: &str = "default_user";

/// Modality recorded for every note stored through the tools.
pub const TYPED_MODALITY: &str = "typed";

/// Collections searched by every query, in request order.
pub const SEARCH_COLLECTIONS: [&str; 2] = ["entities_stream_v1", "user_notes_v1"];

/// Number of results requested per search.
pub const SEARCH_RESULT_LIMIT: u32 = 5;

/// Importance attached to a stored note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Med,
    High,
}

impl Priority {
    /// Parse a caller-supplied priority, falling back to [`Priority::Med`]
    /// for anything that is not exactly `low`, `med` or `high`.
    pub fn from_arg(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("low") => Self::Low,
            Some("high") => Self::High,
            _ => Self::Med,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }
}

/// Body of `POST /add_note`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRecord {
    pub tenant_id: String,
    pub text: String,
    pub modality: &'static str,
    pub priority: Priority,
    pub tags: Vec<String>,
}

impl MemoryRecord {
    /// Build a record from raw caller input.
    ///
    /// Returns `None` when `text` is empty after trimming. Tags are trimmed,
    /// blanks dropped, and duplicates removed keeping first-seen order.
    pub fn new(
        tenant_id: impl Into<String>,
        text: &str,
        priority: Priority,
        tags: impl IntoIterator<Item = String>,
    ) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.trim();
            if !tag.is_empty() && !unique.iter().any(|t| t == tag) {
                unique.push(tag.to_string());
            }
        }

        Some(Self {
            tenant_id: tenant_id.into(),
            text: text.to_string(),
            modality: TYPED_MODALITY,
            priority,
            tags: unique,
        })
    }
}

/// Body of `POST /search_semantic`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub tenant_id: String,
    pub query_text: String,
    pub collections: Vec<String>,
    pub n_results: u32,
}

impl SearchRequest {
    /// Build a search for `query`, or `None` when it is blank.
    pub fn new(tenant_id: impl Into<String>, query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(Self {
            tenant_id: tenant_id.into(),
            query_text: query.to_string(),
            collections: SEARCH_COLLECTIONS.iter().map(ToString::to_string).collect(),
            n_results: SEARCH_RESULT_LIMIT,
        })
    }
}

/// One normalized search hit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub text: String,
    /// Relevance as reported by the backend. Opaque; never reinterpreted.
    pub score: Option<f64>,
    pub collection: String,
    pub metadata: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire responses
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct AddNoteResponse {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    note_id: Option<Value>,
}

impl AddNoteResponse {
    pub(crate) fn into_note_id(self, status: u16) -> Result<String, BackendError> {
        if self.ok == Some(false) {
            return Err(BackendError::Rejected {
                status,
                detail: "add_note answered ok=false".to_string(),
            });
        }
        self.note_id
            .as_ref()
            .and_then(scalar_to_string)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BackendError::BackendFault("add_note response has no note_id".into()))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    ok: Option<bool>,
    /// Items stay untyped so one odd item cannot sink the whole response.
    #[serde(default)]
    results: Option<Vec<Value>>,
}

impl SearchResponse {
    pub(crate) fn into_results(self, status: u16) -> Result<Vec<SearchResult>, BackendError> {
        if self.ok == Some(false) {
            return Err(BackendError::Rejected {
                status,
                detail: "search_semantic answered ok=false".to_string(),
            });
        }
        let items = self.results.ok_or_else(|| {
            BackendError::BackendFault("search_semantic response has no results list".into())
        })?;
        Ok(items.iter().map(SearchResult::from_item).collect())
    }
}

/// Keys that may carry an item's text, in order of preference.
const TEXT_KEYS: [&str; 3] = ["text", "content", "document"];

/// Keys that may carry an item's relevance, in order of preference.
const SCORE_KEYS: [&str; 2] = ["score", "distance"];

impl SearchResult {
    /// Normalize one raw item. Fields that are missing or of an unexpected
    /// type are left empty instead of failing the item.
    fn from_item(item: &Value) -> Self {
        let Some(fields) = item.as_object() else {
            return Self::default();
        };

        let metadata = fields
            .get("metadata")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let id = fields
            .get("id")
            .and_then(scalar_to_string)
            .or_else(|| metadata.get("note_id").and_then(scalar_to_string))
            .unwrap_or_default();
        let text = TEXT_KEYS
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();
        let score = SCORE_KEYS
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_f64));
        let collection = fields
            .get("collection")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            id,
            text,
            score,
            collection,
            metadata,
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
