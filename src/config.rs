//! Configuration for a document-processing run.
//!
//! All pipeline behaviour is controlled through [`PipelineConfig`], built via
//! its [`PipelineConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across worker threads and to diff two runs when
//! their chunk outputs differ.
//!
//! The typo rule tables are part of the config — injected data, not hidden
//! module state — so tests and operators can swap tables per run.

use crate::error::LawChunkError;
use crate::rules::RuleTables;

/// Configuration for [`crate::process::process_document`].
///
/// # Example
/// ```rust
/// use lawchunk::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .doc_id("인사규정")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Document identifier used in every `chunk_id`. Default: `"unknown"`,
    /// the sentinel for callers that have no stable id yet.
    pub doc_id: String,

    /// Typo/OCR correction tables. Default: the embedded tables
    /// ([`RuleTables::default`]); load overrides with
    /// [`RuleTables::from_path`].
    pub rules: RuleTables,

    /// Separator inserted between pages before post-merge normalization.
    /// Default: `"\n\n"`.
    pub page_separator: String,

    /// Skip the RAG boilerplate cleaner stage. Default: false.
    ///
    /// Useful when the input already went through boilerplate removal and
    /// only re-chunking is needed.
    pub skip_markdown_clean: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            doc_id: "unknown".to_string(),
            rules: RuleTables::default(),
            page_separator: "\n\n".to_string(),
            skip_markdown_clean: false,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn doc_id(mut self, id: impl Into<String>) -> Self {
        self.config.doc_id = id.into();
        self
    }

    pub fn rules(mut self, rules: RuleTables) -> Self {
        self.config.rules = rules;
        self
    }

    pub fn page_separator(mut self, sep: impl Into<String>) -> Self {
        self.config.page_separator = sep.into();
        self
    }

    pub fn skip_markdown_clean(mut self, v: bool) -> Self {
        self.config.skip_markdown_clean = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, LawChunkError> {
        let c = &self.config;
        if c.doc_id.trim().is_empty() {
            return Err(LawChunkError::InvalidConfig(
                "doc_id must not be empty (use the default \"unknown\" sentinel instead)".into(),
            ));
        }
        if c.doc_id.contains(char::is_whitespace) {
            return Err(LawChunkError::InvalidConfig(format!(
                "doc_id must not contain whitespace, got '{}'",
                c.doc_id
            )));
        }
        Ok(self.config)
    }
}
