//! Statute chunker: one chunk per article, with chapter/section context.
//!
//! ## Structure
//!
//! Split in two halves so each is testable without fixtures:
//!
//! - [`classify_line`] — a pure classifier mapping one line to
//!   [`LineKind`] (chapter header, section header, article header, body)
//! - a reducer that folds classified lines into [`Chunk`]s, tracking the
//!   enclosing chapter/section labels and flushing the accumulation buffer
//!   on every header
//!
//! ## Boundary anchoring
//!
//! Header patterns match only at line start, after a short run of heading
//! markup (`#`, `*`, whitespace), and an article header must have nothing
//! else on the line beyond its optional parenthetical title. A reference to
//! `제5조` inside a body sentence therefore never opens a new chunk — that
//! anchoring is what makes chunk boundaries leak-free.
//!
//! A chapter or section header with no article before the next boundary
//! leaves its preamble buffer unemitted; only article-headed buffers become
//! chunks. Accepted data-loss policy for non-article preamble, covered by
//! `chapter_preamble_without_article_is_dropped`.

use crate::chunk::{ChangeEntry, ChangeKind, Chunk, ChunkMetadata};
use once_cell::sync::Lazy;
use regex::Regex;

/// Article header: `제N조` or `제N조의M`, optional `(title)`, optional
/// trailing emphasis markup, nothing else on the line.
static RE_ARTICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[#*\s]*제\s*(\d+)\s*조(?:\s*의\s*(\d+))?\s*(?:\(([^)]*)\))?\s*\**\s*$").unwrap()
});

/// Chapter header: `제N장`, then either end of line or whitespace and a
/// title. Requiring whitespace right after `장` keeps prose like
/// `제1장의 규정에 따라` classified as body.
static RE_CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[#*\s]*(제\s*\d+\s*장(?:\s+\S.*?)?)\s*\**\s*$").unwrap());

/// Section header, analogous to chapter.
static RE_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[#*\s]*(제\s*\d+\s*절(?:\s+\S.*?)?)\s*\**\s*$").unwrap());

/// `삭제 <DATE>` deletion marker; stripped from content after recording.
static RE_DELETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"삭제\s*<\s*(\d{4}(?:\s*\.\s*\d{1,2}){2})\s*\.?\s*>").unwrap());

/// `신설 DATE` creation marker (optionally angle-bracketed); stripped.
static RE_CREATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<?\s*신설\s*(\d{4}(?:\s*\.\s*\d{1,2}){2})\s*\.?\s*>?").unwrap());

/// `개정 DATE` amendment marker; recorded but deliberately left in place.
static RE_AMENDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"개정\s*<?\s*(\d{4}(?:\s*\.\s*\d{1,2}){2})").unwrap());

/// What one line of normalized Markdown is, structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Chapter header with its normalized label, e.g. `제1장 총칙`.
    Chapter(String),
    /// Section header with its normalized label, e.g. `제1절 통칙`.
    Section(String),
    /// Article header with its number and optional parenthetical title.
    Article { no: String, title: Option<String> },
    /// Anything else: body content, appended verbatim to the active buffer.
    Body,
}

/// Classify one line. Pure; independent of any accumulation state.
pub fn classify_line(line: &str) -> LineKind {
    if let Some(caps) = RE_ARTICLE.captures(line) {
        let mut no = format!("제{}조", &caps[1]);
        if let Some(sub) = caps.get(2) {
            no.push_str(&format!("의{}", sub.as_str()));
        }
        let title = caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .filter(|t| !t.is_empty());
        return LineKind::Article { no, title };
    }
    if let Some(caps) = RE_CHAPTER.captures(line) {
        return LineKind::Chapter(collapse_label(&caps[1]));
    }
    if let Some(caps) = RE_SECTION.captures(line) {
        return LineKind::Section(collapse_label(&caps[1]));
    }
    LineKind::Body
}

/// Normalize interior whitespace of a chapter/section label
/// (`제 1 장  총칙` → `제1장 총칙`).
fn collapse_label(raw: &str) -> String {
    let Some((idx, marker)) = raw.char_indices().find(|&(_, c)| c == '장' || c == '절') else {
        return raw.trim().to_string();
    };
    let head: String = raw[..idx].chars().filter(|c| !c.is_whitespace()).collect();
    let rest = raw[idx + marker.len_utf8()..].trim();
    if rest.is_empty() {
        format!("{head}{marker}")
    } else {
        format!("{head}{marker} {rest}")
    }
}

/// Split normalized Markdown into article-scoped chunks.
///
/// Never fails: lines that match no header pattern are body content, and a
/// document with zero article headers yields an empty vec — a valid outcome
/// for non-statute documents, not an error.
pub fn chunk_statute(content: &str, page_num: Option<usize>, doc_id: &str) -> Vec<Chunk> {
    let mut acc = Accumulator::new(page_num, doc_id);
    for line in content.lines() {
        match classify_line(line) {
            LineKind::Chapter(label) => {
                acc.flush();
                acc.chapter = Some(label);
                // A new chapter closes any open section.
                acc.section = None;
                acc.start_preamble(line);
            }
            LineKind::Section(label) => {
                acc.flush();
                acc.section = Some(label);
                acc.start_preamble(line);
            }
            LineKind::Article { no, title } => {
                acc.flush();
                acc.start_article(line, no, title);
            }
            LineKind::Body => acc.buffer.push(line.to_string()),
        }
    }
    acc.flush();
    acc.chunks
}

struct Accumulator<'a> {
    doc_id: &'a str,
    page_num: Option<usize>,
    chapter: Option<String>,
    section: Option<String>,
    buffer: Vec<String>,
    article: Option<(String, Option<String>)>,
    seq: usize,
    chunks: Vec<Chunk>,
}

impl<'a> Accumulator<'a> {
    fn new(page_num: Option<usize>, doc_id: &'a str) -> Self {
        Self {
            doc_id,
            page_num,
            chapter: None,
            section: None,
            buffer: Vec::new(),
            article: None,
            seq: 0,
            chunks: Vec::new(),
        }
    }

    fn start_preamble(&mut self, line: &str) {
        self.buffer = vec![line.to_string()];
        self.article = None;
    }

    fn start_article(&mut self, line: &str, no: String, title: Option<String>) {
        self.buffer = vec![line.to_string()];
        self.article = Some((no, title));
    }

    /// Emit the accumulating buffer as a chunk — but only when it carries
    /// both content and article metadata. Chapter/section preamble buffers
    /// are discarded here.
    fn flush(&mut self) {
        let Some((article_no, article_title)) = self.article.take() else {
            self.buffer.clear();
            return;
        };
        if self.buffer.is_empty() {
            return;
        }
        let raw = self.buffer.join("\n");
        self.buffer.clear();

        let (content, metadata) = extract_metadata(&raw, self.page_num);
        let chunk_id = format!(
            "{}_p{}_{}_{}",
            self.doc_id,
            self.page_num.unwrap_or(0),
            article_no.replace(' ', "_"),
            self.seq
        );
        self.seq += 1;
        self.chunks.push(Chunk {
            chunk_id,
            article_no,
            article_title,
            chapter: self.chapter.clone(),
            section: self.section.clone(),
            content,
            metadata,
        });
    }
}

/// Scan the flushed content for change markers. Deletion and creation
/// markers are stripped from the returned content; amendment markers stay
/// in place (deliberate asymmetry — amendment notes are part of the legal
/// text as published).
fn extract_metadata(raw: &str, page_num: Option<usize>) -> (String, ChunkMetadata) {
    let mut change_log: Vec<ChangeEntry> = Vec::new();

    for caps in RE_DELETED.captures_iter(raw) {
        change_log.push(ChangeEntry::new(ChangeKind::Deleted, normalize_date(&caps[1])));
    }
    let content = RE_DELETED.replace_all(raw, "").to_string();

    for caps in RE_CREATED.captures_iter(&content) {
        change_log.push(ChangeEntry::new(ChangeKind::Created, normalize_date(&caps[1])));
    }
    let content = RE_CREATED.replace_all(&content, "").to_string();

    let mut amended: Vec<String> = RE_AMENDED
        .captures_iter(&content)
        .map(|caps| normalize_date(&caps[1]))
        .collect();
    amended.sort_by_key(|d| date_key(d));
    amended.dedup();

    let last_amended = amended.last().cloned();
    for date in &amended {
        if !change_log.iter().any(|e| e.date == *date) {
            change_log.push(ChangeEntry::new(ChangeKind::Amended, date.clone()));
        }
    }

    (
        content,
        ChunkMetadata {
            last_amended,
            amended_dates: amended,
            change_log,
            page_num,
        },
    )
}

/// `2020. 1. 1.` → `2020.1.1`
fn normalize_date(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .trim_end_matches('.')
        .to_string()
}

/// Numeric `(year, month, day)` key so `2020.9.1` sorts before `2020.10.1`.
fn date_key(date: &str) -> (u32, u32, u32) {
    let mut parts = date.split('.').map(|p| p.parse().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── classify_line ────────────────────────────────────────────────────

    #[test]
    fn classifies_article_with_title() {
        assert_eq!(
            classify_line("### 제1조(목적)"),
            LineKind::Article {
                no: "제1조".into(),
                title: Some("목적".into())
            }
        );
    }

    #[test]
    fn classifies_article_without_title() {
        assert_eq!(
            classify_line("제3조"),
            LineKind::Article {
                no: "제3조".into(),
                title: None
            }
        );
    }

    #[test]
    fn classifies_article_with_ui_suffix() {
        assert_eq!(
            classify_line("**제5조의2(경력경쟁채용)**"),
            LineKind::Article {
                no: "제5조의2".into(),
                title: Some("경력경쟁채용".into())
            }
        );
    }

    #[test]
    fn classifies_chapter_and_section() {
        assert_eq!(classify_line("## 제1장 총칙"), LineKind::Chapter("제1장 총칙".into()));
        assert_eq!(classify_line("제 2 장"), LineKind::Chapter("제2장".into()));
        assert_eq!(classify_line("### 제1절 통칙"), LineKind::Section("제1절 통칙".into()));
    }

    #[test]
    fn mid_sentence_references_are_body() {
        assert_eq!(classify_line("자세한 사항은 제5조에 따른다."), LineKind::Body);
        assert_eq!(classify_line("제5조에 따라 임용한다."), LineKind::Body);
        assert_eq!(classify_line("제1장의 규정에 따라 처리한다."), LineKind::Body);
    }

    #[test]
    fn article_header_with_trailing_prose_is_body() {
        assert_eq!(classify_line("제5조 임용에 관한 사항"), LineKind::Body);
    }

    // ── reducer ──────────────────────────────────────────────────────────

    const TWO_ARTICLES: &str = "### 제1조(목적)\n이 규정은 목적을 정한다.\n### 제2조(정의)\n\"직원\"이란 다음을 말한다.";

    #[test]
    fn splits_two_articles_exactly() {
        let chunks = chunk_statute(TWO_ARTICLES, None, "doc");
        assert_eq!(chunks.len(), 2);

        assert_eq!(chunks[0].article_no, "제1조");
        assert_eq!(chunks[0].article_title.as_deref(), Some("목적"));
        assert!(chunks[0].content.contains("제1조"));
        assert!(chunks[0].content.contains("목적을 정한다"));
        assert!(chunks[0].chapter.is_none());
        assert!(chunks[0].section.is_none());

        assert_eq!(chunks[1].article_no, "제2조");
        assert_eq!(chunks[1].article_title.as_deref(), Some("정의"));
        assert!(!chunks[1].content.contains("목적을 정한다"), "boundary leak");
    }

    #[test]
    fn chapter_and_section_context_carried_forward() {
        let input = "## 제1장 총칙\n### 제1절 통칙\n### 제1조(목적)\n본문\n## 제2장 임용\n### 제2조(정의)\n본문";
        let chunks = chunk_statute(input, None, "doc");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chapter.as_deref(), Some("제1장 총칙"));
        assert_eq!(chunks[0].section.as_deref(), Some("제1절 통칙"));
        // New chapter resets the section context.
        assert_eq!(chunks[1].chapter.as_deref(), Some("제2장 임용"));
        assert_eq!(chunks[1].section, None);
    }

    #[test]
    fn reference_to_next_article_stays_inside_chunk() {
        let input = "제1조(목적)\n본문은 제2조를 따른다.\n제2조(정의)\n본문";
        let chunks = chunk_statute(input, None, "doc");
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].content.contains("제2조를 따른다"));
    }

    #[test]
    fn deleted_marker_recorded_and_stripped() {
        let input = "제3조(결격사유)\n삭제 <2020.1.1>";
        let chunks = chunk_statute(input, None, "doc");
        assert_eq!(chunks.len(), 1);
        let meta = &chunks[0].metadata;
        assert_eq!(
            meta.change_log,
            vec![ChangeEntry::new(ChangeKind::Deleted, "2020.1.1")]
        );
        assert!(!chunks[0].content.contains("삭제"), "marker must be stripped");
    }

    #[test]
    fn created_marker_recorded_and_stripped() {
        let input = "제3조의2(특례)\n<신설 2019.7.1>\n본문";
        let chunks = chunk_statute(input, None, "doc");
        let meta = &chunks[0].metadata;
        assert!(meta
            .change_log
            .contains(&ChangeEntry::new(ChangeKind::Created, "2019.7.1")));
        assert!(!chunks[0].content.contains("신설"));
        assert!(chunks[0].content.contains("본문"));
    }

    #[test]
    fn amended_dates_sorted_deduped_and_left_in_place() {
        let input = "제4조(보수)\n개정 2020.1.1 본문\n추가 개정 2019.5.5 내용\n개정 2020.1.1";
        let chunks = chunk_statute(input, None, "doc");
        let meta = &chunks[0].metadata;
        assert_eq!(meta.amended_dates, vec!["2019.5.5", "2020.1.1"]);
        assert_eq!(meta.last_amended.as_deref(), Some("2020.1.1"));
        assert!(chunks[0].content.contains("개정 2020.1.1"), "amendment text stays");
        let amended_entries = meta
            .change_log
            .iter()
            .filter(|e| e.kind == ChangeKind::Amended)
            .count();
        assert_eq!(amended_entries, 2);
    }

    #[test]
    fn amended_dates_sort_by_date_not_lexicographically() {
        let input = "제4조\n개정 2020.10.1\n개정 2020.9.1";
        let chunks = chunk_statute(input, None, "doc");
        assert_eq!(
            chunks[0].metadata.amended_dates,
            vec!["2020.9.1", "2020.10.1"]
        );
        assert_eq!(chunks[0].metadata.last_amended.as_deref(), Some("2020.10.1"));
    }

    #[test]
    fn chunk_ids_unique_for_duplicate_article_numbers() {
        let input = "제5조(임용)\n첫 번째 본문\n제5조(임용)\n중복 추출된 본문";
        let chunks = chunk_statute(input, Some(3), "docA");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_id, "docA_p3_제5조_0");
        assert_eq!(chunks[1].chunk_id, "docA_p3_제5조_1");
        assert_ne!(chunks[0].chunk_id, chunks[1].chunk_id);
    }

    #[test]
    fn page_number_defaults_to_zero_in_id() {
        let chunks = chunk_statute("제1조\n본문", None, "doc");
        assert_eq!(chunks[0].chunk_id, "doc_p0_제1조_0");
        assert_eq!(chunks[0].metadata.page_num, None);
    }

    #[test]
    fn zero_articles_yield_empty_list() {
        assert!(chunk_statute("머리말만 있는 문서입니다.\n본문.", None, "doc").is_empty());
        assert!(chunk_statute("", None, "doc").is_empty());
    }

    #[test]
    fn chapter_preamble_without_article_is_dropped() {
        // Accepted policy: chapter/section preamble that never reaches an
        // article header is not emitted anywhere.
        let input = "## 제1장 총칙\n장 머리말 설명.\n## 제2장 임용\n제2조(정의)\n본문";
        let chunks = chunk_statute(input, None, "doc");
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].content.contains("머리말"));
        assert_eq!(chunks[0].chapter.as_deref(), Some("제2장 임용"));
    }

    #[test]
    fn ordering_matches_reading_order() {
        let input = "제2조\n본문\n제1조\n본문\n제10조\n본문";
        let chunks = chunk_statute(input, None, "doc");
        let order: Vec<&str> = chunks.iter().map(|c| c.article_no.as_str()).collect();
        assert_eq!(order, ["제2조", "제1조", "제10조"]);
    }
}
