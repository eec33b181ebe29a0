//! Canonical data model shared by the normalizer and the three assemblers.
//!
//! Everything here is built fresh per request from the backend payload and is
//! never mutated after construction. Output shapes live next to the assembler
//! that produces them.

use serde::{Deserialize, Serialize};

/// Which of the three result shapes a request asks for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// IIIF Search API response for one document.
    WithinDocument,
    /// Digest across every indexed document, with cropped preview images.
    Collection,
    /// Lightweight canvas/highlight listing for one document.
    Snippet,
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::WithinDocument => "within_document",
            SearchScope::Collection => "collection",
            SearchScope::Snippet => "snippet",
        }
    }

    /// Whether documents in this scope must carry a manifest URL.
    pub(crate) fn requires_manifest_url(&self) -> bool {
        !matches!(self, SearchScope::Snippet)
    }
}

/// Corner-coordinate box exactly as the highlighting backend reports it.
///
/// `ulx/uly` is the upper-left corner, `lrx/lry` the lower-right, both in
/// source (OCR) units. Snippet regions use this shape directly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawHighlightBox {
    pub ulx: u32,
    pub uly: u32,
    pub lrx: u32,
    pub lry: u32,
    #[serde(default)]
    pub page: Option<String>,
}

/// One highlight part as reported by the backend. `text` is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawHighlightPart {
    pub ulx: u32,
    pub uly: u32,
    pub lrx: u32,
    pub lry: u32,
    pub text: String,
}

/// Canonical `{x, y, width, height}` box in integer pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Media-fragment form used in canvas targets: `x,y,w,h`.
    pub fn xywh(&self) -> String {
        format!("{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// One located piece of a match. The box is unscaled.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightPart {
    pub text: String,
    pub bbox: BoundingBox,
}

/// One logical match. Holds several parts when the match wraps a line.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightGroup {
    pub parts: Vec<HighlightPart>,
}

impl HighlightGroup {
    /// Part texts joined with a single space, in part order.
    pub fn match_text(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A passage of OCR text on one page and the matches inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    /// Backend page label, e.g. `page_537`.
    pub page: String,
    /// Unscaled snippet region.
    pub region: BoundingBox,
    pub groups: Vec<HighlightGroup>,
}

/// One matched document after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocument {
    pub id: String,
    /// Empty for snippet scope when the backend omits the field.
    pub manifest_url: String,
    /// Coordinate correction between OCR units and canvas pixels.
    pub scale: f64,
    /// Backend-reported total. May exceed the groups actually returned.
    pub total_matches: u64,
    pub snippets: Vec<Snippet>,
}

impl NormalizedDocument {
    /// Iterate every highlight group of the document in backend order.
    pub fn groups(&self) -> impl Iterator<Item = (&Snippet, &HighlightGroup)> {
        self.snippets
            .iter()
            .flat_map(|snippet| snippet.groups.iter().map(move |group| (snippet, group)))
    }
}

/// `{coords, chars}` entry used by the collection and snippet listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HighlightEntry {
    pub coords: BoundingBox,
    pub chars: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(text: &str) -> HighlightPart {
        HighlightPart {
            text: text.to_string(),
            bbox: BoundingBox::default(),
        }
    }

    #[test]
    fn match_text_joins_parts_with_spaces() {
        let group = HighlightGroup {
            parts: vec![part("test"), part("response")],
        };
        assert_eq!(group.match_text(), "test response");
    }

    #[test]
    fn xywh_formats_in_field_order() {
        let bbox = BoundingBox {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        };
        assert_eq!(bbox.xywh(), "1,2,3,4");
    }

    #[test]
    fn highlight_part_requires_text() {
        let missing = serde_json::json!({ "ulx": 1, "uly": 2, "lrx": 3, "lry": 4 });
        assert!(serde_json::from_value::<RawHighlightPart>(missing.clone()).is_err());

        // Regions have no text and still decode.
        let region: RawHighlightBox = serde_json::from_value(missing).unwrap();
        assert_eq!(region.lry, 4);
    }

    #[test]
    fn only_snippet_scope_tolerates_missing_manifest_url() {
        assert!(SearchScope::WithinDocument.requires_manifest_url());
        assert!(SearchScope::Collection.requires_manifest_url());
        assert!(!SearchScope::Snippet.requires_manifest_url());
    }
}
