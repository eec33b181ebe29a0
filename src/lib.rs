//! Word-level IIIF full-text search over OCR highlighting backends.
//!
//! The backend (Solr with the OCR highlighting plugin) returns, for each
//! matching document, the exact page regions of every match. This crate
//! re-expresses that payload in three shapes:
//!
//! - **Within-document**: an IIIF Content Search `sc:AnnotationList` with
//!   one annotation per matched word box and one hit per logical match
//!   ([`annotation`]).
//! - **Collection**: per-document digests with cropped preview image URLs,
//!   correlated with IIIF manifests on disk ([`collection`]).
//! - **Snippet**: a lightweight page/highlight listing for one document
//!   ([`snippet`]).
//!
//! ## Pipeline
//!
//! ```text
//! q ─► SelectQuery ─► SearchBackend ─► normalize ─► assembler ─► JSON
//! ```
//!
//! [`SearchService`] runs that pipeline once per request. Backend failures
//! are logged and degrade to the scope's empty result, so callers always get
//! a well-formed body.
//!
//! ## Example
//!
//! ```no_run
//! use whiiif::{SearchConfig, SearchService, WithinRequest};
//!
//! # async fn run() {
//! let service = SearchService::from_config(SearchConfig::default());
//! let list = service
//!     .search_within(WithinRequest {
//!         document_id: "test-manifest".into(),
//!         query: "test response".into(),
//!         ignored: Vec::new(),
//!         search_id: "http://localhost:5000/search/test-manifest?q=test+response".into(),
//!     })
//!     .await;
//! println!("{} hits", list.hits.len());
//! # }
//! ```

pub mod annotation;
pub mod backend;
pub mod collection;
pub mod config;
pub mod error;
pub mod geometry;
pub mod manifest;
pub mod normalize;
pub mod query;
pub mod service;
pub mod snippet;
pub mod types;

pub use crate::annotation::{assemble_annotation_list, ignored_filters, AnnotationList, Hit};
pub use crate::backend::{SearchBackend, SolrClient};
pub use crate::collection::{assemble_collection, CollectionCanvas, CollectionDocument};
pub use crate::config::{ContextBlock, HighlightContext, SearchConfig};
pub use crate::error::{BackendError, ConfigError, ManifestError};
pub use crate::geometry::{apply_divisor, apply_scale, to_box};
pub use crate::manifest::{FsManifestStore, Manifest, ManifestStore};
pub use crate::normalize::normalize;
pub use crate::query::{sanitize_query, SelectQuery};
pub use crate::service::{SearchService, WithinRequest};
pub use crate::snippet::{assemble_snippets, SnippetCanvas, SnippetDocument};
pub use crate::types::{
    BoundingBox, HighlightEntry, HighlightGroup, HighlightPart, NormalizedDocument,
    RawHighlightBox, RawHighlightPart, SearchScope, Snippet,
};
