//! Integration tests for the full normalization + chunking pipeline.
//!
//! These run entirely in memory on synthetic statute Markdown — no files,
//! no network — so they always run in CI.

use lawchunk::{
    chunk_statute, clean_markdown, clean_page_artifacts, normalize_merged, process_document,
    PageText, PipelineConfig, TypoNormalizer,
};
use std::collections::HashSet;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn config(doc_id: &str) -> PipelineConfig {
    PipelineConfig::builder().doc_id(doc_id).build().unwrap()
}

/// Assert the invariants every chunk list must satisfy.
fn assert_chunk_invariants(chunks: &[lawchunk::Chunk], context: &str) {
    let mut seen_ids = HashSet::new();
    for chunk in chunks {
        assert!(
            !chunk.article_no.is_empty(),
            "[{context}] chunk with empty article_no"
        );
        assert!(
            seen_ids.insert(&chunk.chunk_id),
            "[{context}] duplicate chunk_id {}",
            chunk.chunk_id
        );

        let dates = &chunk.metadata.amended_dates;
        let mut deduped = dates.clone();
        deduped.dedup();
        assert_eq!(
            *dates, deduped,
            "[{context}] duplicate amended dates in {}",
            chunk.chunk_id
        );
        let mut sorted = dates.clone();
        sorted.sort_by_key(|d| {
            let mut p = d.split('.').map(|x| x.parse::<u32>().unwrap_or(0));
            (p.next().unwrap_or(0), p.next().unwrap_or(0), p.next().unwrap_or(0))
        });
        assert_eq!(
            *dates, sorted,
            "[{context}] amended dates not ascending in {}",
            chunk.chunk_id
        );
    }
}

// ── Full pipeline ────────────────────────────────────────────────────────────

/// A three-page personnel-regulation extract with every artifact class the
/// pipeline handles: VLM narration, page numbers glued to text, duplicated
/// revision footers, cross-page fences, change markers, and an OCR typo.
fn sample_pages() -> Vec<PageText> {
    vec![
        PageText::new(
            1,
            "이 이미지는 인사규정 문서를 추출한 것입니다. \n\
             ## 제1장 총칙\n\
             ### 제1조(목적)\n\
             이 규정은 직원의 읹용에 관한 사항을 정한다.\n\
             402-3\n\
             12차 개정 2021.3.15",
        ),
        PageText::new(
            2,
            "12차 개정 2021.3.15\n\
             ### 제2조(정의)\n\
             402-21.\"직위\"란 직무와 책임을 말한다.\n\
             2.\"직급\"이란 다음을 말한다.\n\
             ### 제3조(적용범위)\n\
             삭제 <2020.1.1>",
        ),
        PageText::new(
            3,
            "12차 개정 2021.3.15\n\
             ## 제2장 임용\n\
             ### 제4조(임용권자)\n\
             개정 2019.5.5 임용권은 다음과 같다.\n\
             세부 기준은 제5조에 따른다.\n\
             개정 2020.1.1\n\
             ```json\n{\"article\": \"제4조\"}\n```",
        ),
    ]
}

#[test]
fn full_document_produces_expected_chunks() {
    let out = process_document(&sample_pages(), &config("인사규정")).unwrap();
    assert_chunk_invariants(&out.chunks, "full");

    let numbers: Vec<&str> = out.chunks.iter().map(|c| c.article_no.as_str()).collect();
    assert_eq!(numbers, ["제1조", "제2조", "제3조", "제4조"]);

    // Chapter context carried forward, reset on the second chapter.
    assert_eq!(out.chunks[0].chapter.as_deref(), Some("제1장 총칙"));
    assert_eq!(out.chunks[3].chapter.as_deref(), Some("제2장 임용"));
}

#[test]
fn full_document_cleans_all_artifact_classes() {
    let out = process_document(&sample_pages(), &config("인사규정")).unwrap();

    assert!(!out.markdown.contains("이 이미지는"), "narration left behind");
    assert!(!out.markdown.contains("402-"), "page artifacts left behind");
    assert!(!out.markdown.contains("```json"), "json fence left behind");
    assert_eq!(
        out.markdown.matches("12차 개정").count(),
        1,
        "revision footer not deduped"
    );
    // The OCR typo is fixed without touching the article numbers around it.
    assert!(out.chunks[0].content.contains("임용에 관한 사항"));
}

#[test]
fn collision_page_number_preserves_list_item() {
    let out = process_document(&sample_pages(), &config("인사규정")).unwrap();
    let definitions = &out.chunks[1];
    assert!(
        definitions.content.contains("1.\"직위\"란"),
        "got: {}",
        definitions.content
    );
    assert!(definitions.content.contains("2.\"직급\"이란"));
}

#[test]
fn change_markers_extracted_per_chunk() {
    let out = process_document(&sample_pages(), &config("인사규정")).unwrap();

    let deleted = &out.chunks[2];
    assert_eq!(deleted.article_no, "제3조");
    assert!(deleted.metadata.change_log.iter().any(|e| e.date == "2020.1.1"));
    assert!(!deleted.content.contains("삭제"), "deletion marker not stripped");

    let amended = &out.chunks[3];
    assert_eq!(amended.metadata.amended_dates, vec!["2019.5.5", "2020.1.1"]);
    assert_eq!(amended.metadata.last_amended.as_deref(), Some("2020.1.1"));
    assert!(
        amended.content.contains("개정 2019.5.5"),
        "amendment text must stay in place"
    );

    // The surviving revision footer sits in the first article's body, so
    // its date is recorded there.
    assert_eq!(out.chunks[0].metadata.amended_dates, vec!["2021.3.15"]);
}

#[test]
fn stats_reflect_document_shape() {
    let out = process_document(&sample_pages(), &config("인사규정")).unwrap();
    assert_eq!(out.stats.chunks, 4);
    assert_eq!(out.stats.chapters, 2);
    assert_eq!(out.stats.deleted_events, 1);
    assert!(out.stats.amended_events >= 3);
}

#[test]
fn chunk_json_hand_off_shape() {
    let out = process_document(&sample_pages(), &config("인사규정")).unwrap();
    let json = serde_json::to_value(&out.chunks).unwrap();
    let first = &json[0];
    for field in [
        "chunk_id",
        "article_no",
        "article_title",
        "chapter",
        "section",
        "content",
        "metadata",
    ] {
        assert!(first.get(field).is_some(), "missing field {field}");
    }
    for field in ["last_amended", "amended_dates", "change_log", "page_num"] {
        assert!(first["metadata"].get(field).is_some(), "missing metadata.{field}");
    }
}

// ── Properties ───────────────────────────────────────────────────────────────

#[test]
fn page_cleaner_is_idempotent_on_sample() {
    for page in sample_pages() {
        let once = clean_page_artifacts(&page.markdown);
        assert_eq!(clean_page_artifacts(&once), once);
    }
}

#[test]
fn markdown_cleaner_is_idempotent_on_sample() {
    for page in sample_pages() {
        let once = clean_markdown(&page.markdown);
        assert_eq!(clean_markdown(&once), once);
    }
}

#[test]
fn post_merge_is_idempotent_on_sample() {
    let merged = sample_pages()
        .iter()
        .map(|p| p.markdown.clone())
        .collect::<Vec<_>>()
        .join("\n\n");
    let (once, _) = normalize_merged(&merged);
    let (twice, _) = normalize_merged(&once);
    assert_eq!(once, twice);
}

#[test]
fn article_number_bytes_survive_typo_normalization() {
    let normalizer = TypoNormalizer::with_defaults();
    let input = "제5조 읹용 기준과 제12조의2 적용";
    let (out, _) = normalizer.normalize(input);
    assert!(out.contains("제5조"));
    assert!(out.contains("제12조의2"));
}

#[test]
fn no_boundary_leak_on_forward_references() {
    let input = "제1조(목적)\n이 조는 제2조를 준용한다.\n제2조(정의)\n본문";
    let chunks = chunk_statute(input, None, "doc");
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].content.contains("제2조를 준용한다"));
    assert!(!chunks[1].content.contains("준용한다"));
}

#[test]
fn revision_citation_repeated_three_times_leaves_one() {
    let input = "9차 개정 2018.11.1\n본문\n9차 개정 2018.11.1\n본문\n9차 개정 2018.11.1";
    let (out, report) = normalize_merged(input);
    assert_eq!(out.matches("9차 개정 2018.11.1").count(), 1);
    assert_eq!(report.revisions_deduped, 2);
}

#[test]
fn zero_article_document_is_distinct_non_error_state() {
    let pages = [PageText::new(1, "일반 공지문입니다.\n표와 목록뿐입니다.")];
    let out = process_document(&pages, &config("공지")).unwrap();
    assert!(out.chunks.is_empty());
    assert!(!out.markdown.is_empty());
}

#[test]
fn duplicate_articles_across_pages_get_unique_ids() {
    // The same article extracted twice (overlapping OCR passes).
    let pages = [
        PageText::new(1, "제5조(임용)\n첫 추출"),
        PageText::new(2, "제5조(임용)\n중복 추출"),
    ];
    let out = process_document(&pages, &config("doc")).unwrap();
    assert_eq!(out.chunks.len(), 2);
    assert_chunk_invariants(&out.chunks, "duplicates");
}
