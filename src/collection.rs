//! Cross-document digest with cropped preview images.
//!
//! Previews are always downsampled by [`PREVIEW_DIVISOR`] from the raw
//! snippet coordinates. A document's `scale` plays no part here. Hit grouping
//! is flattened: every highlight part becomes its own entry.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::ManifestError;
use crate::geometry::{apply_divisor, PREVIEW_DIVISOR};
use crate::manifest::{cropped_image_url, ManifestStore};
use crate::types::{BoundingBox, HighlightEntry, NormalizedDocument, Snippet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionDocument {
    pub id: String,
    pub manifest_url: String,
    pub total_results: u64,
    pub canvases: Vec<CollectionCanvas>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionCanvas {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_id: Option<String>,
    pub page: String,
    /// Cropped, downsampled preview of the snippet region.
    pub image_url: String,
    pub region: BoundingBox,
    pub highlights: Vec<HighlightEntry>,
}

/// Build one digest per document whose manifest resolves.
///
/// Manifest failures are logged and drop only the affected document.
pub fn assemble_collection(
    documents: &[NormalizedDocument],
    manifests: &dyn ManifestStore,
) -> Vec<CollectionDocument> {
    documents
        .iter()
        .filter_map(|doc| match digest(doc, manifests) {
            Ok(digest) => Some(digest),
            Err(e) => {
                error!(
                    document_id = %doc.id,
                    kind = e.kind(),
                    error = %e,
                    "dropping document from collection results"
                );
                None
            }
        })
        .collect()
}

fn digest(
    doc: &NormalizedDocument,
    manifests: &dyn ManifestStore,
) -> Result<CollectionDocument, ManifestError> {
    let manifest = manifests.load(&doc.id)?;

    let canvases = doc
        .snippets
        .iter()
        .map(|snippet| -> Result<CollectionCanvas, ManifestError> {
            let canvas = manifest.canvas_for_page(&snippet.page)?;
            let image_url = canvas
                .image_url()
                .ok_or_else(|| ManifestError::CanvasMismatch {
                    page: snippet.page.clone(),
                    reason: "canvas has no image resource".to_string(),
                })?;

            let region = apply_divisor(snippet.region, PREVIEW_DIVISOR);
            Ok(CollectionCanvas {
                canvas_id: canvas.id.clone(),
                page: snippet.page.clone(),
                image_url: cropped_image_url(image_url, &region.xywh(), region.width),
                region,
                highlights: preview_highlights(snippet),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CollectionDocument {
        id: doc.id.clone(),
        manifest_url: doc.manifest_url.clone(),
        total_results: doc.total_matches,
        canvases,
    })
}

fn preview_highlights(snippet: &Snippet) -> Vec<HighlightEntry> {
    snippet
        .groups
        .iter()
        .flat_map(|group| group.parts.iter())
        .map(|part| HighlightEntry {
            coords: apply_divisor(part.bbox, PREVIEW_DIVISOR),
            chars: part.text.clone(),
        })
        .collect()
}
