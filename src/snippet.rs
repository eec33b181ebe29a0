//! Per-document snippet listing.
//!
//! Same extraction as the collection digest, minus the manifest: regions and
//! highlights are scaled by the document's own `scale`, each box starting
//! from raw coordinates.

use serde::{Deserialize, Serialize};

use crate::geometry::apply_scale;
use crate::types::{BoundingBox, HighlightEntry, NormalizedDocument};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnippetDocument {
    pub id: String,
    pub total_results: u64,
    pub canvases: Vec<SnippetCanvas>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnippetCanvas {
    pub page: String,
    pub region: BoundingBox,
    pub highlights: Vec<HighlightEntry>,
}

pub fn assemble_snippets(documents: &[NormalizedDocument]) -> Vec<SnippetDocument> {
    documents
        .iter()
        .map(|doc| SnippetDocument {
            id: doc.id.clone(),
            total_results: doc.total_matches,
            canvases: doc
                .snippets
                .iter()
                .map(|snippet| SnippetCanvas {
                    page: snippet.page.clone(),
                    region: apply_scale(snippet.region, doc.scale),
                    highlights: snippet
                        .groups
                        .iter()
                        .flat_map(|group| group.parts.iter())
                        .map(|part| HighlightEntry {
                            coords: apply_scale(part.bbox, doc.scale),
                            chars: part.text.clone(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
