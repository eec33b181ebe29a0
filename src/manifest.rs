//! IIIF manifests and where to find them.
//!
//! Only the slice of a Presentation manifest that collection search reads is
//! modelled. Canvases are addressed by position: the indexer labels pages
//! `page_<n>` and guarantees that `n` is the canvas's index in
//! `sequences[0].canvases`. Nothing here validates that contract beyond
//! bounds checking.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ManifestError;

/// Region+size segment of a full-resolution IIIF image request.
pub const FULL_IMAGE_SEGMENT: &str = "full/full";

/// Prefix of backend page labels.
pub const PAGE_LABEL_PREFIX: &str = "page_";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Manifest {
    #[serde(rename = "@id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sequences: Vec<Sequence>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Sequence {
    #[serde(default)]
    pub canvases: Vec<Canvas>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Canvas {
    #[serde(rename = "@id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageAnnotation>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ImageAnnotation {
    pub resource: ImageResource,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ImageResource {
    #[serde(rename = "@id", alias = "id")]
    pub id: String,
}

impl Canvas {
    /// Image URL of the canvas's first painting annotation.
    pub fn image_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.resource.id.as_str())
    }
}

impl Manifest {
    /// Canvases of the first sequence. Empty when the manifest has none.
    pub fn canvases(&self) -> &[Canvas] {
        self.sequences
            .first()
            .map(|sequence| sequence.canvases.as_slice())
            .unwrap_or_default()
    }

    /// Resolve a `page_<n>` label to the `n`th canvas.
    pub fn canvas_for_page(&self, page: &str) -> Result<&Canvas, ManifestError> {
        let index = page_index(page).ok_or_else(|| ManifestError::CanvasMismatch {
            page: page.to_string(),
            reason: format!("label is not of the form {PAGE_LABEL_PREFIX}<n>"),
        })?;
        let canvases = self.canvases();
        canvases
            .get(index)
            .ok_or_else(|| ManifestError::CanvasMismatch {
                page: page.to_string(),
                reason: format!(
                    "index {index} out of range for {} canvases",
                    canvases.len()
                ),
            })
    }
}

/// Zero-based canvas index encoded in a `page_<n>` label.
pub fn page_index(page: &str) -> Option<usize> {
    page.strip_prefix(PAGE_LABEL_PREFIX)?.parse().ok()
}

/// Replace the first `full/full` in `image_url` with a cropped region and a
/// width-only size. Only the first occurrence is touched.
pub fn cropped_image_url(image_url: &str, region: &str, width: u32) -> String {
    image_url.replacen(FULL_IMAGE_SEGMENT, &format!("{region}/{width},"), 1)
}

/// Read-only source of manifests keyed by document id.
pub trait ManifestStore: Send + Sync {
    fn load(&self, document_id: &str) -> Result<Manifest, ManifestError>;
}

/// Manifests stored as `<dir>/<document id>.json`.
#[derive(Debug, Clone)]
pub struct FsManifestStore {
    root: PathBuf,
}

impl FsManifestStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a document's manifest is expected at.
    pub fn path_for(&self, document_id: &str) -> PathBuf {
        self.root.join(format!("{document_id}.json"))
    }
}

impl ManifestStore for FsManifestStore {
    fn load(&self, document_id: &str) -> Result<Manifest, ManifestError> {
        let path = self.path_for(document_id);
        // Ids come from the index, but never let one leave the directory.
        if document_id.contains(['/', '\\']) || document_id.starts_with('.') {
            return Err(ManifestError::NotFound { path });
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ManifestError::NotFound { path })
            }
            Err(e) => {
                return Err(ManifestError::Malformed {
                    path,
                    reason: e.to_string(),
                })
            }
        };

        serde_json::from_str(&raw).map_err(|e| ManifestError::Malformed {
            path,
            reason: e.to_string(),
        })
    }
}
