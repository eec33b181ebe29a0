//! Backend payload normalization.
//!
//! Turns the decoded JSON of one select call into [`NormalizedDocument`]s.
//! A document is either fully populated or the whole payload is rejected
//! with [`BackendError::MalformedResponse`]. Backend order is kept as-is for
//! documents, snippets, groups and parts.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::BackendError;
use crate::geometry::{part_to_box, raw_to_box};
use crate::types::{
    HighlightGroup, HighlightPart, NormalizedDocument, RawHighlightBox, RawHighlightPart,
    SearchScope, Snippet,
};

/// Per-document field holding the coordinate scale factor.
pub const SCALE_FIELD: &str = "scale";

/// Top-level key of the OCR highlighting block.
pub const HIGHLIGHTING_KEY: &str = "ocrHighlighting";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHighlightBlock {
    snippets: Vec<RawSnippet>,
    num_total: u64,
}

#[derive(Debug, Deserialize)]
struct RawSnippet {
    #[serde(default)]
    regions: Vec<RawHighlightBox>,
    #[serde(default)]
    highlights: Vec<Vec<RawHighlightPart>>,
}

/// Normalize a decoded backend payload for `scope`.
pub fn normalize(
    payload: &Value,
    scope: SearchScope,
    config: &SearchConfig,
) -> Result<Vec<NormalizedDocument>, BackendError> {
    let docs = payload
        .pointer("/response/docs")
        .and_then(Value::as_array)
        .ok_or_else(|| BackendError::malformed("missing response.docs"))?;

    let documents = docs
        .iter()
        .map(|doc| normalize_document(payload, doc, scope, config))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        scope = scope.as_str(),
        documents = documents.len(),
        "normalized backend payload"
    );
    Ok(documents)
}

fn normalize_document(
    payload: &Value,
    doc: &Value,
    scope: SearchScope,
    config: &SearchConfig,
) -> Result<NormalizedDocument, BackendError> {
    let id = doc
        .get(&config.document_id_field)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            BackendError::malformed(format!(
                "document without string '{}' field",
                config.document_id_field
            ))
        })?;

    let manifest_url = match doc.get(&config.manifest_url_field).and_then(Value::as_str) {
        Some(url) => url.to_string(),
        None if !scope.requires_manifest_url() => String::new(),
        None => {
            return Err(BackendError::malformed(format!(
                "document '{id}' without string '{}' field",
                config.manifest_url_field
            )))
        }
    };

    let scale = match doc.get(SCALE_FIELD) {
        None | Some(Value::Null) => 1.0,
        Some(value) => value.as_f64().ok_or_else(|| {
            BackendError::malformed(format!("document '{id}' has non-numeric scale"))
        })?,
    };

    let block = payload
        .get(HIGHLIGHTING_KEY)
        .and_then(|highlighting| highlighting.get(id))
        .and_then(|fields| fields.get(&config.ocr_text_field))
        .ok_or_else(|| {
            BackendError::malformed(format!(
                "no {HIGHLIGHTING_KEY}.{id}.{} block",
                config.ocr_text_field
            ))
        })?;
    let block = RawHighlightBlock::deserialize(block).map_err(|e| {
        BackendError::malformed(format!("highlighting block for '{id}': {e}"))
    })?;

    let snippets = block
        .snippets
        .into_iter()
        .map(|snippet| normalize_snippet(id, snippet))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NormalizedDocument {
        id: id.to_string(),
        manifest_url,
        scale,
        total_matches: block.num_total,
        snippets,
    })
}

fn normalize_snippet(id: &str, snippet: RawSnippet) -> Result<Snippet, BackendError> {
    let region = snippet
        .regions
        .first()
        .ok_or_else(|| BackendError::malformed(format!("snippet in '{id}' without regions")))?;
    let page = region.page.clone().ok_or_else(|| {
        BackendError::malformed(format!("snippet region in '{id}' without page"))
    })?;

    let groups = snippet
        .highlights
        .into_iter()
        .map(|parts| HighlightGroup {
            parts: parts
                .into_iter()
                .map(|part| HighlightPart {
                    bbox: part_to_box(&part),
                    text: part.text,
                })
                .collect(),
        })
        .collect();

    Ok(Snippet {
        page,
        region: raw_to_box(region),
        groups,
    })
}
