//! Pipeline stages for statute Markdown normalization and chunking.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets callers run any
//! subset — e.g. re-chunk already-clean Markdown without paying for the
//! normalizers again.
//!
//! ## Data Flow
//!
//! ```text
//! per page:  typo ──▶ page_artifacts          (noisy OCR text, per page)
//! merged:    merge ──▶ markdown ──▶ chunker   (page-joined document)
//! ```
//!
//! 1. [`typo`]           — tiered OCR/typo correction, article numbers protected
//! 2. [`page_artifacts`] — inline and standalone page-number removal
//! 3. [`merge`]          — cross-page dedup after concatenation
//! 4. [`markdown`]       — VLM boilerplate removal for RAG
//! 5. [`chunker`]        — header-anchored article segmentation + metadata
//!
//! All stages are pure, synchronous transforms over in-memory strings: no
//! I/O, no shared mutable state, safe to run concurrently across documents.

pub mod chunker;
pub mod markdown;
pub mod merge;
pub mod page_artifacts;
pub mod typo;
