//! Caller-facing text rendering.
//!
//! Everything here is a pure function of its inputs, so rendering the same
//! backend response twice always yields the same string.

use crate::backend::{SEARCH_RESULT_LIMIT, SearchResult};

/// Longest item text shown in a search reply, in characters.
pub const MAX_ITEM_CHARS: usize = 200;

const ELLIPSIS: char = '…';

/// Collapse whitespace and cut `text` to at most `max` characters, marking
/// the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}

/// Confirmation for a stored note.
pub fn saved(note_id: &str, text: &str) -> String {
    format!(
        "Saved (id={note_id}). I'll remember: {}",
        truncate(text, MAX_ITEM_CHARS)
    )
}

/// Reply for a completed search, enumerating at most
/// [`SEARCH_RESULT_LIMIT`] items in backend order.
pub fn search_results(query: &str, results: &[SearchResult]) -> String {
    let results = &results[..results.len().min(SEARCH_RESULT_LIMIT as usize)];
    if results.is_empty() {
        return format!(
            "I couldn't find any memories matching \"{}\". Try rephrasing, or save it as a new memory.",
            truncate(query, MAX_ITEM_CHARS)
        );
    }

    let noun = if results.len() == 1 {
        "memory"
    } else {
        "memories"
    };
    let mut out = format!("Found {} relevant {noun}:\n", results.len());

    for (i, result) in results.iter().enumerate() {
        let text = truncate(&result.text, MAX_ITEM_CHARS);
        let text = if text.is_empty() {
            "(no text available)".to_string()
        } else {
            text
        };
        out.push_str(&format!("\n{}. {text}", i + 1));
        if let Some(source) = source_hint(result) {
            out.push_str(&format!(" ({source})"));
        }
    }
    out
}

/// Where a memory came from, when the backend tells us.
fn source_hint(result: &SearchResult) -> Option<&'static str> {
    match result.collection.as_str() {
        "user_notes_v1" => Some("from your notes"),
        "entities_stream_v1" => Some("from visual memory"),
        _ if result.metadata.contains_key("frame_ts") => Some("from visual memory"),
        _ if result.metadata.contains_key("note_id") => Some("from your notes"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn item(text: &str, collection: &str) -> SearchResult {
        SearchResult {
            id: "n-1".into(),
            text: text.into(),
            score: Some(0.2),
            collection: collection.into(),
            metadata: Map::new(),
        }
    }

    #[test]
    fn truncate_short_text_is_untouched() {
        assert_eq!(truncate("keys on the counter", 200), "keys on the counter");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "é".repeat(250);
        let cut = truncate(&text, 200);
        assert_eq!(cut.chars().count(), 201);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn truncate_flattens_newlines() {
        assert_eq!(truncate("line one\n\n  line two", 200), "line one line two");
    }

    #[test]
    fn saved_contains_note_id() {
        let msg = saved("n-42", "My keys are usually on the kitchen counter");
        assert!(msg.starts_with("Saved (id=n-42)."));
        assert!(msg.contains("kitchen counter"));
    }

    #[test]
    fn empty_results_are_explicit() {
        let msg = search_results("where are my keys?", &[]);
        assert!(!msg.is_empty());
        assert!(msg.contains("couldn't find any memories"));
    }

    #[test]
    fn results_keep_backend_order_and_sources() {
        let results = vec![
            item("saw keys near the door", "entities_stream_v1"),
            item("My keys are usually on the kitchen counter", "user_notes_v1"),
        ];
        let msg = search_results("keys", &results);
        let door = msg.find("near the door").unwrap();
        let counter = msg.find("kitchen counter").unwrap();
        assert!(door < counter);
        assert!(msg.starts_with("Found 2 relevant memories:"));
        assert!(msg.contains("1. saw keys near the door (from visual memory)"));
        assert!(msg.contains("2. My keys are usually on the kitchen counter (from your notes)"));
    }

    #[test]
    fn only_the_first_five_items_are_listed() {
        let results: Vec<SearchResult> = (1..=10)
            .map(|i| item(&format!("item {i}"), "user_notes_v1"))
            .collect();
        let msg = search_results("items", &results);

        assert!(msg.starts_with("Found 5 relevant memories:"), "{msg}");
        assert!(msg.contains("5. item 5 (from your notes)"), "{msg}");
        assert!(!msg.contains("6."), "{msg}");
        assert!(!msg.contains("item 6"), "{msg}");
    }

    #[test]
    fn source_falls_back_to_metadata() {
        let mut result = item("a photo of the garden", "");
        result.metadata = json!({"frame_ts": 1_700_000_000})
            .as_object()
            .unwrap()
            .clone();
        assert_eq!(source_hint(&result), Some("from visual memory"));
        assert_eq!(source_hint(&item("x", "other")), None);
    }

    #[test]
    fn long_items_are_truncated() {
        let long = "a".repeat(500);
        let msg = search_results("q", &[item(&long, "user_notes_v1")]);
        assert!(msg.contains(&format!("{}…", "a".repeat(200))));
        assert!(!msg.contains(&"a".repeat(201)));
    }

    #[test]
    fn rendering_is_idempotent() {
        let results = vec![item("pills at 9am", "user_notes_v1"), item("", "")];
        assert_eq!(
            search_results("pills", &results),
            search_results("pills", &results)
        );
        assert!(search_results("pills", &results).contains("2. (no text available)"));
    }
}
