//! IIIF Content Search (v1) response assembly for a single document.
//!
//! Each highlight group becomes one `search:Hit`, each of its parts one
//! `oa:Annotation`. Annotation ids are a pure function of input order:
//!
//! ```text
//! <namespace>:<document id>:<page>:<hit index><suffix>
//! ```
//!
//! The hit index counts groups across the whole document (it does not reset
//! per snippet). The first part of a group has no suffix; part `n > 0` gets
//! the letter `char(97 + n)`, so a two-part hit yields `…:2` and `…:2b`.
//! Existing viewers key on these ids, so the skipped `a` is kept.

use serde::{Deserialize, Serialize};

use crate::geometry::apply_scale;
use crate::types::NormalizedDocument;

pub const PRESENTATION_CONTEXT: &str = "http://iiif.io/api/presentation/2/context.json";
pub const SEARCH_CONTEXT: &str = "http://iiif.io/api/search/1/context.json";

/// Request parameters that are accepted but never applied.
pub const UNIMPLEMENTED_FILTERS: [&str; 3] = ["motivation", "date", "user"];

/// `sc:AnnotationList` returned by the within-document search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotationList {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub within: Layer,
    pub resources: Vec<Annotation>,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    #[serde(rename = "@type")]
    pub kind: String,
    pub total: u64,
    pub ignored: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub motivation: String,
    pub resource: TextResource,
    /// `<canvas>#xywh=x,y,w,h`
    pub on: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextResource {
    #[serde(rename = "@type")]
    pub kind: String,
    pub chars: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hit {
    #[serde(rename = "@type")]
    pub kind: String,
    pub annotations: Vec<String>,
    #[serde(rename = "match")]
    pub match_text: String,
}

impl AnnotationList {
    /// Valid envelope with no results. Returned when the backend fails.
    pub fn empty(search_id: impl Into<String>, ignored: Vec<String>) -> Self {
        Self {
            context: vec![
                PRESENTATION_CONTEXT.to_string(),
                SEARCH_CONTEXT.to_string(),
            ],
            id: search_id.into(),
            kind: "sc:AnnotationList".to_string(),
            within: Layer {
                kind: "sc:Layer".to_string(),
                total: 0,
                ignored,
            },
            resources: Vec::new(),
            hits: Vec::new(),
        }
    }
}

/// Filters from [`UNIMPLEMENTED_FILTERS`] present in `param_names`, in
/// request order, each listed once.
pub fn ignored_filters<'a, I>(param_names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ignored: Vec<String> = Vec::new();
    for name in param_names {
        let unimplemented = UNIMPLEMENTED_FILTERS.iter().any(|filter| *filter == name);
        if unimplemented && !ignored.iter().any(|seen| seen == name) {
            ignored.push(name.to_string());
        }
    }
    ignored
}

fn part_suffix(in_idx: usize) -> String {
    if in_idx == 0 {
        return String::new();
    }
    u32::try_from(97 + in_idx)
        .ok()
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_default()
}

/// Build the search response for `documents`.
///
/// `search_id` becomes the list's `@id` (the request URL), `ignored` is
/// echoed in `within.ignored`, `namespace` prefixes every annotation id.
pub fn assemble_annotation_list(
    documents: &[NormalizedDocument],
    search_id: &str,
    ignored: Vec<String>,
    namespace: &str,
) -> AnnotationList {
    let mut list = AnnotationList::empty(search_id, ignored);

    for doc in documents {
        list.within.total += doc.total_matches;

        for (idx, (snippet, group)) in doc.groups().enumerate() {
            let canvas = format!("{}/canvas/{}", doc.manifest_url, snippet.page);
            let mut annotation_ids = Vec::with_capacity(group.parts.len());

            for (in_idx, part) in group.parts.iter().enumerate() {
                let id = format!(
                    "{namespace}:{}:{}:{idx}{}",
                    doc.id,
                    snippet.page,
                    part_suffix(in_idx)
                );
                let bbox = apply_scale(part.bbox, doc.scale);

                list.resources.push(Annotation {
                    id: id.clone(),
                    kind: "oa:Annotation".to_string(),
                    motivation: "sc:painting".to_string(),
                    resource: TextResource {
                        kind: "cnt:ContentAsText".to_string(),
                        chars: part.text.clone(),
                    },
                    on: format!("{canvas}#xywh={}", bbox.xywh()),
                });
                annotation_ids.push(id);
            }

            list.hits.push(Hit {
                kind: "search:Hit".to_string(),
                annotations: annotation_ids,
                match_text: group.match_text(),
            });
        }
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::normalize::normalize;
    use crate::types::{BoundingBox, HighlightGroup, HighlightPart, SearchScope, Snippet};
    use proptest::prelude::*;
    use std::collections::HashSet;

    const WITHIN: &str = include_str!("../tests/data/within_response.json");
    const SEARCH_ID: &str = "http://localhost:5000/search/test-manifest?q=test+response";

    fn documents() -> Vec<NormalizedDocument> {
        let payload = serde_json::from_str(WITHIN).unwrap();
        normalize(&payload, SearchScope::WithinDocument, &SearchConfig::default()).unwrap()
    }

    fn assemble(documents: &[NormalizedDocument]) -> AnnotationList {
        assemble_annotation_list(documents, SEARCH_ID, Vec::new(), "uun:whiiif")
    }

    #[test]
    fn one_hit_per_group_and_one_resource_per_part() {
        let docs = documents();
        let list = assemble(&docs);

        let groups: usize = docs.iter().map(|d| d.groups().count()).sum();
        let parts: usize = docs
            .iter()
            .flat_map(|d| d.groups())
            .map(|(_, g)| g.parts.len())
            .sum();

        assert_eq!(list.hits.len(), 3);
        assert_eq!(list.resources.len(), 4);
        assert_eq!(list.hits.len(), groups);
        assert_eq!(list.resources.len(), parts);
    }

    #[test]
    fn second_part_is_suffixed_b() {
        let list = assemble(&documents());
        let hit = &list.hits[2];
        assert_eq!(
            hit.annotations,
            [
                "uun:whiiif:test-manifest:page_537:2",
                "uun:whiiif:test-manifest:page_537:2b",
            ]
        );
        assert_eq!(list.resources[2].id, hit.annotations[0]);
        assert_eq!(list.resources[3].id, hit.annotations[1]);
    }

    #[test]
    fn hit_index_does_not_reset_per_snippet() {
        let list = assemble(&documents());
        assert_eq!(list.resources[0].id, "uun:whiiif:test-manifest:page_1069:0");
        assert_eq!(list.resources[1].id, "uun:whiiif:test-manifest:page_1073:1");
    }

    #[test]
    fn match_joins_part_texts() {
        let list = assemble(&documents());
        assert_eq!(list.hits[0].match_text, "test response");
        assert_eq!(list.hits[2].match_text, "test response");
        assert_eq!(list.resources[3].resource.chars, "response");
    }

    #[test]
    fn total_is_backend_reported_count() {
        let mut docs = documents();
        assert_eq!(assemble(&docs).within.total, 3);

        docs[0].total_matches = 40;
        let list = assemble(&docs);
        assert_eq!(list.within.total, 40);
        assert_eq!(list.hits.len(), 3);
    }

    #[test]
    fn targets_canvas_with_xywh_fragment() {
        let list = assemble(&documents());
        assert_eq!(
            list.resources[0].on,
            "http://mytestserver/manifests/test-manifest/canvas/page_1069#xywh=466,1206,31,66"
        );
    }

    #[test]
    fn scale_applies_to_every_part() {
        let mut docs = documents();
        docs[0].scale = 0.5;
        let list = assemble(&docs);
        assert_eq!(
            list.resources[0].on,
            "http://mytestserver/manifests/test-manifest/canvas/page_1069#xywh=233,603,15,33"
        );
    }

    #[test]
    fn identifiers_are_deterministic() {
        let docs = documents();
        assert_eq!(assemble(&docs), assemble(&docs));
    }

    #[test]
    fn serializes_search_api_shape() {
        let list = assemble_annotation_list(
            &documents(),
            SEARCH_ID,
            vec!["motivation".into()],
            "uun:whiiif",
        );
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["@type"], "sc:AnnotationList");
        assert_eq!(value["@id"], SEARCH_ID);
        assert_eq!(value["within"]["@type"], "sc:Layer");
        assert_eq!(value["within"]["ignored"][0], "motivation");
        assert_eq!(value["hits"][2]["match"], "test response");
        assert_eq!(value["hits"][2]["@type"], "search:Hit");
        assert_eq!(value["resources"][0]["resource"]["@type"], "cnt:ContentAsText");
    }

    #[test]
    fn empty_envelope_has_no_results() {
        let list = assemble(&[]);
        assert_eq!(list.within.total, 0);
        assert!(list.hits.is_empty());
        assert!(list.resources.is_empty());
        assert_eq!(list.context.len(), 2);
    }

    #[test]
    fn ignored_keeps_request_order_once() {
        let names = ["q", "user", "motivation", "user", "page"];
        assert_eq!(ignored_filters(names), ["user", "motivation"]);
        assert!(ignored_filters(["q"]).is_empty());
    }

    #[test]
    fn suffix_letters_skip_a() {
        assert_eq!(part_suffix(0), "");
        assert_eq!(part_suffix(1), "b");
        assert_eq!(part_suffix(2), "c");
    }

    fn group_strategy() -> impl Strategy<Value = HighlightGroup> {
        prop::collection::vec(("[a-z]{1,8}", 0u32..5000, 0u32..5000), 1..6).prop_map(|parts| {
            HighlightGroup {
                parts: parts
                    .into_iter()
                    .map(|(text, x, y)| HighlightPart {
                        text,
                        bbox: BoundingBox {
                            x,
                            y,
                            width: 40,
                            height: 20,
                        },
                    })
                    .collect(),
            }
        })
    }

    fn snippet_strategy() -> impl Strategy<Value = Snippet> {
        (0u32..20, prop::collection::vec(group_strategy(), 0..5)).prop_map(|(page, groups)| {
            Snippet {
                page: format!("page_{page}"),
                region: BoundingBox::default(),
                groups,
            }
        })
    }

    fn documents_strategy() -> impl Strategy<Value = Vec<NormalizedDocument>> {
        prop::collection::vec(
            (
                prop::collection::vec(snippet_strategy(), 0..4),
                prop_oneof![Just(1.0), 0.1f64..4.0],
                0u64..50,
            ),
            0..4,
        )
        .prop_map(|docs| {
            docs.into_iter()
                .enumerate()
                .map(|(i, (snippets, scale, total_matches))| NormalizedDocument {
                    id: format!("doc-{i}"),
                    manifest_url: format!("http://example.org/manifests/doc-{i}"),
                    scale,
                    total_matches,
                    snippets,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_counts_follow_groups_and_parts(docs in documents_strategy()) {
            let list = assemble(&docs);

            let groups: usize = docs.iter().map(|d| d.groups().count()).sum();
            let parts: usize = docs
                .iter()
                .flat_map(|d| d.groups())
                .map(|(_, g)| g.parts.len())
                .sum();
            let total: u64 = docs.iter().map(|d| d.total_matches).sum();

            prop_assert_eq!(list.hits.len(), groups);
            prop_assert_eq!(list.resources.len(), parts);
            prop_assert_eq!(list.within.total, total);
        }

        #[test]
        fn prop_annotation_ids_are_unique_and_resolvable(docs in documents_strategy()) {
            let list = assemble(&docs);

            let ids: HashSet<&str> = list.resources.iter().map(|r| r.id.as_str()).collect();
            prop_assert_eq!(ids.len(), list.resources.len());

            for hit in &list.hits {
                prop_assert!(!hit.annotations.is_empty());
                for id in &hit.annotations {
                    prop_assert!(ids.contains(id.as_str()));
                }
            }
        }

        #[test]
        fn prop_assembly_is_deterministic(docs in documents_strategy()) {
            prop_assert_eq!(assemble(&docs), assemble(&docs));
        }
    }
}
