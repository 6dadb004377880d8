//! Error types for the lawchunk library.
//!
//! The transform stages themselves ([`crate::pipeline`]) are total functions
//! over their string input: any input, including the empty string, produces a
//! result. Errors therefore only exist at the call boundaries — invalid
//! configuration, or a rule table that cannot be read or compiled. "Zero
//! articles detected" is **not** an error; the chunker returns an empty list
//! and callers report it as a distinct state.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the lawchunk library.
#[derive(Debug, Error)]
pub enum LawChunkError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Rule-table errors ─────────────────────────────────────────────────
    /// The rule-table file could not be read.
    #[error("Failed to read rule table '{path}': {source}\nCheck the path exists and is readable.")]
    RuleFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rule-table file is not valid JSON for [`crate::rules::RuleTables`].
    #[error("Failed to parse rule table '{path}': {source}")]
    RuleFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An OCR-pattern rule is not a valid regular expression.
    ///
    /// Raised once at normalizer construction so a bad table fails fast
    /// instead of mid-document.
    #[error("OCR-pattern rule {index} is not a valid regex '{pattern}': {detail}")]
    InvalidPatternRule {
        index: usize,
        pattern: String,
        detail: String,
    },
}
