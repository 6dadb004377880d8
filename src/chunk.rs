//! Output records produced by the statute chunker.
//!
//! A [`Chunk`] is one article of a statute — the unit that downstream RAG
//! systems embed and index. Chunks are built once during a single pass over a
//! document and never mutated afterwards; the storage/indexing side is an
//! external collaborator and only sees these plain serialisable records.

use serde::{Deserialize, Serialize};

/// One article-scoped chunk of a statute document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique id within the document:
    /// `{doc_id}_p{page}_{article_no with spaces → underscores}_{seq}`.
    ///
    /// The trailing sequence index increments once per emitted chunk, so two
    /// chunks that share an article number (OCR duplication, re-amended
    /// articles spanning pages) still get distinct ids.
    pub chunk_id: String,

    /// Article label, e.g. `제5조` or `제5조의2`. Never empty — the chunker
    /// only emits buffers that saw an article header.
    pub article_no: String,

    /// Parenthetical title following the article number, e.g. `목적` for
    /// `제1조(목적)`.
    pub article_title: Option<String>,

    /// Most recently seen chapter label (`제N장 …`) when this chunk's
    /// content began. Context only; chapters are not chunk boundaries of
    /// their own.
    pub chapter: Option<String>,

    /// Most recently seen section label (`제N절 …`), same contract as
    /// `chapter`.
    pub section: Option<String>,

    /// Full article body: the header line plus every following line up to
    /// (not including) the next article/chapter/section header.
    pub content: String,

    pub metadata: ChunkMetadata,
}

/// Per-chunk metadata extracted from the article body at flush time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Most recent amendment date found in the content, if any.
    pub last_amended: Option<String>,

    /// All amendment dates found, deduplicated and date-sorted ascending.
    pub amended_dates: Vec<String>,

    /// Ordered deletion/creation/amendment events extracted from in-body
    /// annotation markers.
    pub change_log: Vec<ChangeEntry>,

    /// Originating page number, when the chunker was given one.
    pub page_num: Option<usize>,
}

/// One change event extracted from an annotation marker inside an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub date: String,
}

/// What an annotation marker recorded about the article.
///
/// Serialised lowercase (`deleted` / `created` / `amended`) to match the
/// hand-off schema consumed by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// `삭제 <DATE>` — the article was deleted; marker text is stripped
    /// from `content`.
    Deleted,
    /// `신설 DATE` — the article was newly created; marker text is stripped.
    Created,
    /// `개정 DATE` — the article was amended; marker text stays in place.
    Amended,
}

impl ChangeEntry {
    pub fn new(kind: ChangeKind, date: impl Into<String>) -> Self {
        Self {
            kind,
            date: date.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_serialises_lowercase() {
        let entry = ChangeEntry::new(ChangeKind::Deleted, "2020.1.1");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"type":"deleted","date":"2020.1.1"}"#);
    }

    #[test]
    fn change_kind_round_trips() {
        for kind in [ChangeKind::Deleted, ChangeKind::Created, ChangeKind::Amended] {
            let entry = ChangeEntry::new(kind, "2021.3.15");
            let json = serde_json::to_string(&entry).unwrap();
            let back: ChangeEntry = serde_json::from_str(&json).unwrap();
            assert_eq!(back, entry);
        }
    }

    #[test]
    fn chunk_serialises_with_nested_metadata() {
        let chunk = Chunk {
            chunk_id: "doc_p1_제1조_0".into(),
            article_no: "제1조".into(),
            article_title: Some("목적".into()),
            chapter: None,
            section: None,
            content: "### 제1조(목적)\n이 규정은 목적을 정한다.".into(),
            metadata: ChunkMetadata {
                page_num: Some(1),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["article_no"], "제1조");
        assert_eq!(json["metadata"]["page_num"], 1);
        assert!(json["metadata"]["amended_dates"].as_array().unwrap().is_empty());
    }
}
