//! Outbound select parameters, one set per search scope.
//!
//! Parameter names and their order are part of the backend contract and are
//! reproduced exactly. The query text always comes last.

use tracing::warn;

use crate::config::{HighlightContext, SearchConfig};

/// Ordered `(name, value)` pairs for one select request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectQuery {
    params: Vec<(String, String)>,
}

impl SelectQuery {
    fn push(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    fn context(self, context: &HighlightContext) -> Self {
        self.push("hl.ocr.contextBlock", context.block)
            .push("hl.ocr.contextSize", context.size)
            .push("hl.ocr.limitBlock", context.limit)
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of the first parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// IIIF search inside one document: absolute coordinates, high cap.
    pub fn within_document(config: &SearchConfig, document_id: &str, query: &str) -> Self {
        SelectQuery::default()
            .push("hl", "on")
            .push("hl.ocr.absoluteHighlights", "true")
            .push("df", &config.ocr_text_field)
            .push("hl.ocr.fl", &config.ocr_text_field)
            .push("hl.snippets", config.within_max_results)
            .push("fq", id_filter(config, document_id))
            .push("q", query)
    }

    /// Search across every document.
    pub fn collection(config: &SearchConfig, query: &str) -> Self {
        SelectQuery::default()
            .push("hl", "on")
            .push("rows", config.collection_max_documents)
            .push("df", &config.ocr_text_field)
            .push("hl.ocr.fl", &config.ocr_text_field)
            .push("hl.snippets", config.collection_max_results)
            .context(&config.collection_context)
            .push("q", query)
    }

    /// Snippets for one document. `snips` overrides the configured count.
    pub fn snippet(config: &SearchConfig, document_id: &str, query: &str, snips: u32) -> Self {
        SelectQuery::default()
            .push("hl", "on")
            .push("hl.snippets", snips)
            .push("df", &config.ocr_text_field)
            .push("hl.ocr.fl", &config.ocr_text_field)
            .context(&config.snippet_context)
            .push("fq", id_filter(config, document_id))
            .push("q", query)
    }
}

fn id_filter(config: &SearchConfig, document_id: &str) -> String {
    format!("{}:{document_id}", config.document_id_field)
}

/// Resolve the string-typed `snips` parameter, falling back to the
/// configured default when it is absent or not a positive integer.
pub fn snippet_count(snips: Option<&str>, config: &SearchConfig) -> u32 {
    match snips.map(str::trim) {
        None | Some("") => config.snippets_max_results,
        Some(raw) => match raw.parse::<u32>() {
            Ok(count) if count > 0 => count,
            _ => {
                warn!(snips = raw, "ignoring invalid snippet count");
                config.snippets_max_results
            }
        },
    }
}

/// Strip markup from free-text input before it reaches the backend.
///
/// Everything from a `<` up to the next `>` is dropped; an unterminated tag
/// drops the rest of the input.
pub fn sanitize_query(raw: &str) -> String {
    let mut clean = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.chars() {
        match (in_tag, ch) {
            (false, '<') => in_tag = true,
            (true, '>') => in_tag = false,
            (false, _) => clean.push(ch),
            (true, _) => {}
        }
    }
    clean.trim().to_string()
}
