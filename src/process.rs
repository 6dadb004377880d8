//! End-to-end document processing entry points.
//!
//! [`process_document`] runs the full pipeline over a document's pages:
//! per-page typo normalization and page-artifact removal, page merging,
//! post-merge normalization, RAG Markdown cleanup, chunking, and statistics.
//! [`process_page`] is the single-page convenience for callers that chunk
//! page-by-page and want `page_num` stamped into ids and metadata.
//!
//! Every stage is a pure text transform; the only fallible step is
//! compiling the configured rule tables, which fails fast before any text
//! is touched.

use crate::chunk::Chunk;
use crate::config::PipelineConfig;
use crate::error::LawChunkError;
use crate::pipeline::chunker::chunk_statute;
use crate::pipeline::markdown::clean_markdown;
use crate::pipeline::merge::{normalize_merged, MergeReport};
use crate::pipeline::page_artifacts::clean_page_artifacts;
use crate::pipeline::typo::{TypoNormalizer, TypoReport};
use crate::stats::ChunkStats;
use serde::Serialize;
use tracing::{debug, info};

/// One page of raw OCR/VLM Markdown, 1-indexed.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page_num: usize,
    pub markdown: String,
}

impl PageText {
    pub fn new(page_num: usize, markdown: impl Into<String>) -> Self {
        Self {
            page_num,
            markdown: markdown.into(),
        }
    }
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// The fully normalized document Markdown the chunks were cut from.
    pub markdown: String,
    /// Article chunks in reading order.
    pub chunks: Vec<Chunk>,
    /// Aggregate counts for quality reporting.
    pub stats: ChunkStats,
    /// Typo replacements, summed across pages.
    pub typo_report: TypoReport,
    /// Post-merge dedup counts.
    pub merge_report: MergeReport,
}

/// Run the full pipeline over a document's pages.
///
/// A document with zero detected articles returns an empty `chunks` list —
/// a valid outcome for non-statute documents, not an error.
pub fn process_document(
    pages: &[PageText],
    config: &PipelineConfig,
) -> Result<PipelineOutput, LawChunkError> {
    info!(doc_id = %config.doc_id, pages = pages.len(), "starting pipeline");

    // ── Step 1: compile rule tables ──────────────────────────────────────
    let normalizer = TypoNormalizer::new(config.rules.clone())?;

    // ── Step 2: per-page normalization ───────────────────────────────────
    let mut typo_report = TypoReport::default();
    let cleaned_pages: Vec<String> = pages
        .iter()
        .map(|page| {
            let (corrected, report) = normalizer.normalize(&page.markdown);
            typo_report.critical += report.critical;
            typo_report.domain += report.domain;
            typo_report.ocr += report.ocr;
            typo_report.safe += report.safe;
            let cleaned = clean_page_artifacts(&corrected);
            debug!(
                page = page.page_num,
                replacements = report.total(),
                bytes = cleaned.len(),
                "page normalized"
            );
            cleaned
        })
        .collect();

    // ── Step 3: merge pages ──────────────────────────────────────────────
    let merged = cleaned_pages.join(&config.page_separator);

    // ── Step 4: post-merge normalization ─────────────────────────────────
    let (merged, merge_report) = normalize_merged(&merged);
    debug!(
        page_markers = merge_report.page_markers_removed,
        revisions = merge_report.revisions_deduped,
        fences = merge_report.fences_removed,
        "post-merge normalization done"
    );

    // ── Step 5: RAG Markdown cleanup ─────────────────────────────────────
    let markdown = if config.skip_markdown_clean {
        merged
    } else {
        clean_markdown(&merged)
    };

    // ── Step 6: chunk ────────────────────────────────────────────────────
    let chunks = chunk_statute(&markdown, None, &config.doc_id);

    // ── Step 7: stats ────────────────────────────────────────────────────
    let stats = ChunkStats::from_chunks(&chunks);
    info!(
        doc_id = %config.doc_id,
        chunks = stats.chunks,
        chapters = stats.chapters,
        typo_replacements = typo_report.total(),
        "pipeline complete"
    );

    Ok(PipelineOutput {
        markdown,
        chunks,
        stats,
        typo_report,
        merge_report,
    })
}

/// Run the full pipeline over a single page, stamping its page number into
/// chunk ids and metadata.
pub fn process_page(
    page: &PageText,
    config: &PipelineConfig,
) -> Result<PipelineOutput, LawChunkError> {
    let normalizer = TypoNormalizer::new(config.rules.clone())?;
    let (corrected, typo_report) = normalizer.normalize(&page.markdown);
    let cleaned = clean_page_artifacts(&corrected);
    let (merged, merge_report) = normalize_merged(&cleaned);
    let markdown = if config.skip_markdown_clean {
        merged
    } else {
        clean_markdown(&merged)
    };
    let chunks = chunk_statute(&markdown, Some(page.page_num), &config.doc_id);
    let stats = ChunkStats::from_chunks(&chunks);
    Ok(PipelineOutput {
        markdown,
        chunks,
        stats,
        typo_report,
        merge_report,
    })
}
