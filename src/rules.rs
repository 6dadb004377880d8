//! Tiered typo/OCR correction rule tables.
//!
//! The tables are immutable data injected into
//! [`crate::pipeline::typo::TypoNormalizer`] rather than hidden module-level
//! state, so tests can swap tables freely and operators can hot-edit rules
//! without a rebuild. Embedded defaults cover the statute corpus this crate
//! was built for; [`RuleTables::from_path`] loads a JSON override with the
//! same shape.
//!
//! ## Tier policies
//!
//! | Tier | Kind | Protection check |
//! |------|------|------------------|
//! | `critical` | exact pair | yes — skipped inside article-number spans |
//! | `domain`   | exact pair | yes |
//! | `ocr_patterns` | regex → replacement | yes |
//! | `safe`     | exact pair | no — typographic only, defined always safe |
//!
//! Tiers apply in the order above; each tier's output feeds the next.

use crate::error::LawChunkError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One exact-substring correction: every unprotected occurrence of `from`
/// becomes `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactRule {
    pub from: String,
    pub to: String,
}

/// One regex correction for OCR misreads. `replacement` may use `$1`-style
/// capture references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub pattern: String,
    pub replacement: String,
}

/// The four correction tiers, applied in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTables {
    /// Unambiguous misrecognitions; small by design.
    #[serde(default)]
    pub critical: Vec<ExactRule>,

    /// Domain-specific corrections (personnel-regulation vocabulary).
    ///
    /// Policy: any pair whose correction is semantically ambiguous stays out
    /// of this table. A former `기관 → 기간` rule was removed for exactly
    /// that reason — both are common words and the rewrite corrupted valid
    /// prose. That exclusion is a standing constraint on this tier.
    #[serde(default)]
    pub domain: Vec<ExactRule>,

    /// Regex patterns for systematic OCR misreads, most importantly garbled
    /// variants of the `조` glyph in article numbers.
    #[serde(default)]
    pub ocr_patterns: Vec<PatternRule>,

    /// Typographic normalization applied everywhere with no protection
    /// check: full-width punctuation to half-width, double spaces, etc.
    #[serde(default)]
    pub safe: Vec<ExactRule>,
}

fn exact(pairs: &[(&str, &str)]) -> Vec<ExactRule> {
    pairs
        .iter()
        .map(|(from, to)| ExactRule {
            from: (*from).to_string(),
            to: (*to).to_string(),
        })
        .collect()
}

impl Default for RuleTables {
    fn default() -> Self {
        Self {
            critical: exact(&[
                ("싞설", "신설"),
                ("샥제", "삭제"),
                ("볍률", "법률"),
                ("규졍", "규정"),
            ]),
            domain: exact(&[
                ("읹용", "임용"),
                ("직윈", "직원"),
                ("승짂", "승진"),
                ("면즤", "면직"),
                ("졍원", "정원"),
                ("보슈", "보수"),
                ("휴즥", "휴직"),
                ("짓계", "징계"),
            ]),
            ocr_patterns: vec![
                PatternRule {
                    pattern: r"쩨\s*(\d+)\s*조".into(),
                    replacement: "제$1조".into(),
                },
                PatternRule {
                    pattern: r"제\s*(\d+)\s*쪼".into(),
                    replacement: "제$1조".into(),
                },
                PatternRule {
                    pattern: r"져\s*(\d+)\s*조".into(),
                    replacement: "제$1조".into(),
                },
                // Commas misread for periods inside dates: 2020,1,1 → 2020.1.1
                PatternRule {
                    pattern: r"(\d{4})\s*[,，]\s*(\d{1,2})\s*[,，]\s*(\d{1,2})".into(),
                    replacement: "$1.$2.$3".into(),
                },
            ],
            safe: exact(&[
                ("\u{3000}", " "),
                ("．", "."),
                ("（", "("),
                ("）", ")"),
                ("〈", "<"),
                ("〉", ">"),
                ("  ", " "),
            ]),
        }
    }
}

impl RuleTables {
    /// Load rule tables from a JSON file.
    ///
    /// Missing tiers default to empty, so a file may override only the tier
    /// it cares about. Pattern validity is checked later, at normalizer
    /// construction.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LawChunkError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LawChunkError::RuleFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LawChunkError::RuleFileParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Total number of rules across all tiers.
    pub fn len(&self) -> usize {
        self.critical.len() + self.domain.len() + self.ocr_patterns.len() + self.safe.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
