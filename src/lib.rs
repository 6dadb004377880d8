//! # lawchunk
//!
//! Statute-aware Markdown normalization and per-article chunking for RAG.
//!
//! ## Why this crate?
//!
//! Generic fixed-size or sentence chunkers destroy legal documents: a
//! retrieval hit that starts mid-article and ends in the next one is worse
//! than no hit at all. Statutes have an exact natural chunk boundary — the
//! article (`조`) — but OCR/VLM extraction buries those boundaries under
//! page-number artifacts, duplicated revision footers, stray code fences,
//! and glyph-level typos. This crate cleans the noise deterministically and
//! cuts the document into boundary-exact, one-chunk-per-article units with
//! structured amendment metadata.
//!
//! ## Pipeline Overview
//!
//! ```text
//! raw page Markdown
//!  │
//!  ├─ 1. Typo      tiered OCR corrections, article numbers protected
//!  ├─ 2. Artifacts page-number removal (inline + standalone)
//!  ├─ 3. Merge     join pages, dedup markers/revisions/fences
//!  ├─ 4. Cleanup   strip VLM narration, summary & JSON boilerplate
//!  ├─ 5. Chunk     one chunk per 제N조, chapter/section context
//!  └─ 6. Stats     counts for quality reporting
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use lawchunk::{process_document, PageText, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pages = [
//!         PageText::new(1, "### 제1조(목적)\n이 규정은 목적을 정한다."),
//!         PageText::new(2, "### 제2조(정의)\n\"직원\"이란 다음을 말한다."),
//!     ];
//!     let config = PipelineConfig::builder().doc_id("인사규정").build()?;
//!     let output = process_document(&pages, &config)?;
//!     for chunk in &output.chunks {
//!         println!("{}: {:?}", chunk.article_no, chunk.article_title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - Every transform stage is a total function over its string input:
//!   any input — empty, garbled, non-statute — produces a result, never an
//!   error. Zero detected articles is a valid outcome, reported as an empty
//!   chunk list.
//! - Article-number spans are never altered by the correction tables.
//! - A reference like "제5조에 따라" inside a body sentence never opens a
//!   chunk boundary; headers match at line start only.
//! - `chunk_id`s are unique per document even when the same article number
//!   appears twice.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `lawchunk` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod chunk;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod rules;
pub mod stats;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use chunk::{ChangeEntry, ChangeKind, Chunk, ChunkMetadata};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::LawChunkError;
pub use pipeline::chunker::{chunk_statute, classify_line, LineKind};
pub use pipeline::markdown::clean_markdown;
pub use pipeline::merge::{normalize_merged, MergeReport};
pub use pipeline::page_artifacts::clean_page_artifacts;
pub use pipeline::typo::{TypoNormalizer, TypoReport};
pub use process::{process_document, process_page, PageText, PipelineOutput};
pub use rules::{ExactRule, PatternRule, RuleTables};
pub use stats::ChunkStats;
