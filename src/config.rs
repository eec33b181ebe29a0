//! Search configuration.
//!
//! [`SearchConfig`] is built once at startup (usually nested inside the
//! server's config file) and shared read-only by every request. Defaults
//! mirror a stock deployment against a local Solr core named `whiiif`.
//!
//! ```toml
//! [search]
//! solr_url = "http://localhost:8983/solr"
//! solr_core = "whiiif"
//! ocr_text_field = "ocr_text"
//! within_max_results = 4096
//! manifest_location = "/srv/iiif/manifests"
//!
//! [search.snippet_context]
//! block = "line"
//! size = 2
//! limit = "block"
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Granularity of OCR context returned around a highlight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContextBlock {
    Word,
    Line,
    Block,
}

impl ContextBlock {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextBlock::Word => "word",
            ContextBlock::Line => "line",
            ContextBlock::Block => "block",
        }
    }
}

impl fmt::Display for ContextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highlight context knobs for the snippet and collection scopes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HighlightContext {
    /// Unit of context returned either side of a match.
    #[serde(default = "default_context_block")]
    pub block: ContextBlock,
    /// Number of `block` units either side of a match.
    #[serde(default = "default_context_size")]
    pub size: u32,
    /// Context never extends past this container.
    #[serde(default = "default_context_limit")]
    pub limit: ContextBlock,
}

impl Default for HighlightContext {
    fn default() -> Self {
        Self {
            block: default_context_block(),
            size: default_context_size(),
            limit: default_context_limit(),
        }
    }
}

/// Backend, schema and result-cap settings for all three search scopes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Base URL of the Solr instance, without the core name.
    #[serde(default = "default_solr_url")]
    pub solr_url: String,

    #[serde(default = "default_solr_core")]
    pub solr_core: String,

    /// Field holding the OCR documents indexed by the highlighting plugin.
    #[serde(default = "default_ocr_text_field")]
    pub ocr_text_field: String,

    #[serde(default = "default_manifest_url_field")]
    pub manifest_url_field: String,

    #[serde(default = "default_document_id_field")]
    pub document_id_field: String,

    /// Snippet cap for IIIF search inside one document. Kept high on purpose.
    #[serde(default = "default_within_max_results")]
    pub within_max_results: u32,

    /// Default snippet count for snippet search when `snips` is not given.
    #[serde(default = "default_snippets_max_results")]
    pub snippets_max_results: u32,

    #[serde(default)]
    pub snippet_context: HighlightContext,

    /// Maximum number of documents in a collection digest.
    #[serde(default = "default_collection_max_documents")]
    pub collection_max_documents: u32,

    /// Snippet cap per document (not overall) in a collection digest.
    #[serde(default = "default_collection_max_results")]
    pub collection_max_results: u32,

    #[serde(default)]
    pub collection_context: HighlightContext,

    /// Directory holding `<document id>.json` IIIF manifests.
    #[serde(default = "default_manifest_location")]
    pub manifest_location: PathBuf,

    /// Prefix of annotation identifiers in IIIF search responses.
    #[serde(default = "default_annotation_namespace")]
    pub annotation_namespace: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            solr_url: default_solr_url(),
            solr_core: default_solr_core(),
            ocr_text_field: default_ocr_text_field(),
            manifest_url_field: default_manifest_url_field(),
            document_id_field: default_document_id_field(),
            within_max_results: default_within_max_results(),
            snippets_max_results: default_snippets_max_results(),
            snippet_context: HighlightContext::default(),
            collection_max_documents: default_collection_max_documents(),
            collection_max_results: default_collection_max_results(),
            collection_context: HighlightContext::default(),
            manifest_location: default_manifest_location(),
            annotation_namespace: default_annotation_namespace(),
        }
    }
}

impl SearchConfig {
    /// Full URL of the Solr select handler for the configured core.
    pub fn select_url(&self) -> String {
        format!(
            "{}/{}/select",
            self.solr_url.trim_end_matches('/'),
            self.solr_core
        )
    }

    /// Reject settings that would produce unusable backend queries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.solr_url)
            .map_err(|e| ConfigError::Invalid(format!("solr_url '{}': {e}", self.solr_url)))?;

        let names = [
            ("solr_core", &self.solr_core),
            ("ocr_text_field", &self.ocr_text_field),
            ("manifest_url_field", &self.manifest_url_field),
            ("document_id_field", &self.document_id_field),
            ("annotation_namespace", &self.annotation_namespace),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{key} must not be empty")));
            }
        }

        let caps = [
            ("within_max_results", self.within_max_results),
            ("snippets_max_results", self.snippets_max_results),
            ("collection_max_documents", self.collection_max_documents),
            ("collection_max_results", self.collection_max_results),
        ];
        for (key, value) in caps {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{key} must be at least 1")));
            }
        }

        Ok(())
    }
}

fn default_solr_url() -> String {
    "http://localhost:8983/solr".to_string()
}

fn default_solr_core() -> String {
    "whiiif".to_string()
}

fn default_ocr_text_field() -> String {
    "ocr_text".to_string()
}

fn default_manifest_url_field() -> String {
    "manifest_url".to_string()
}

fn default_document_id_field() -> String {
    "id".to_string()
}

fn default_within_max_results() -> u32 {
    4096
}

fn default_snippets_max_results() -> u32 {
    10
}

fn default_collection_max_documents() -> u32 {
    100
}

fn default_collection_max_results() -> u32 {
    5
}

fn default_context_block() -> ContextBlock {
    ContextBlock::Word
}

fn default_context_size() -> u32 {
    5
}

fn default_context_limit() -> ContextBlock {
    ContextBlock::Block
}

fn default_manifest_location() -> PathBuf {
    PathBuf::from("../resources/manifests")
}

fn default_annotation_namespace() -> String {
    "uun:whiiif".to_string()
}
