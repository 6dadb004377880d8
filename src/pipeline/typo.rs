//! Typo/OCR normalization with protected article-number spans.
//!
//! ## Why protection?
//!
//! Article numbers (`제5조`, `제12조의2`) are the anchors the chunker keys
//! on. A correction table that accidentally rewrites one — even a whitespace
//! tweak that shifts its glyphs — can silently merge two articles or orphan
//! a body. So before any substitution runs, every span matching the
//! article-number pattern is located, and tiers 1–3 skip any match starting
//! inside such a span. Tier 4 (typographic pairs) is defined always safe and
//! runs unconditionally.
//!
//! ## No in-place splicing
//!
//! Every substitution builds a fresh output buffer in a single forward pass,
//! and protected spans are recomputed against the current text before each
//! rule. Offsets therefore never drift, no matter how earlier rules shifted
//! the text.

use crate::error::LawChunkError;
use crate::rules::RuleTables;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Article-number span: `제` + digits + `조` with optional `의N` suffix and
/// optional interior whitespace (`제 5 조` is still one span).
static RE_ARTICLE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"제\s*\d+\s*조(?:\s*의\s*\d+)?").unwrap());

static RE_MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());
static RE_MULTI_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Replacement counts per tier, for QA logging. Not required for
/// correctness of the transform itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypoReport {
    pub critical: usize,
    pub domain: usize,
    pub ocr: usize,
    pub safe: usize,
}

impl TypoReport {
    pub fn total(&self) -> usize {
        self.critical + self.domain + self.ocr + self.safe
    }
}

/// Applies the tiered correction tables to raw extracted text.
///
/// Construct once per rule table (OCR patterns are compiled here, so a bad
/// table fails fast) and reuse across documents; the normalizer holds no
/// per-document state.
#[derive(Debug)]
pub struct TypoNormalizer {
    tables: RuleTables,
    ocr_compiled: Vec<(Regex, String)>,
}

impl TypoNormalizer {
    pub fn new(tables: RuleTables) -> Result<Self, LawChunkError> {
        let ocr_compiled = tables
            .ocr_patterns
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.replacement.clone()))
                    .map_err(|e| LawChunkError::InvalidPatternRule {
                        index,
                        pattern: rule.pattern.clone(),
                        detail: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            tables,
            ocr_compiled,
        })
    }

    /// Normalizer with the embedded default tables.
    pub fn with_defaults() -> Self {
        // Default patterns are fixed and covered by tests; compilation
        // cannot fail.
        Self::new(RuleTables::default()).expect("default rule tables compile")
    }

    /// Apply all tiers in order and return the corrected text with per-tier
    /// replacement counts.
    ///
    /// Total over its input: any string, including empty, yields a result.
    pub fn normalize(&self, text: &str) -> (String, TypoReport) {
        let mut report = TypoReport::default();

        // ── Tier 1: critical fixes ───────────────────────────────────────
        let mut current = text.to_string();
        for rule in &self.tables.critical {
            let spans = protected_spans(&current);
            let (next, n) = replace_exact_outside(&current, &rule.from, &rule.to, &spans);
            current = next;
            report.critical += n;
        }

        // ── Tier 2: domain fixes ─────────────────────────────────────────
        for rule in &self.tables.domain {
            let spans = protected_spans(&current);
            let (next, n) = replace_exact_outside(&current, &rule.from, &rule.to, &spans);
            current = next;
            report.domain += n;
        }

        // ── Tier 3: OCR pattern fixes ────────────────────────────────────
        for (re, replacement) in &self.ocr_compiled {
            let spans = protected_spans(&current);
            let (next, n) = replace_pattern_outside(&current, re, replacement, &spans);
            current = next;
            report.ocr += n;
        }

        // ── Tier 4: safe typographic fixes (no protection) ───────────────
        for rule in &self.tables.safe {
            let n = current.matches(rule.from.as_str()).count();
            if n > 0 {
                current = current.replace(&rule.from, &rule.to);
                report.safe += n;
            }
        }

        // ── Final structural cleanup ─────────────────────────────────────
        (structural_cleanup(&current), report)
    }
}

/// Byte spans of every article-number occurrence in `text`.
pub fn protected_spans(text: &str) -> Vec<(usize, usize)> {
    RE_ARTICLE_SPAN
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect()
}

fn is_protected(spans: &[(usize, usize)], offset: usize) -> bool {
    spans.iter().any(|&(s, e)| offset >= s && offset < e)
}

/// Replace every occurrence of `from` whose start lies outside the protected
/// spans. Single forward pass; returns the new text and replacement count.
fn replace_exact_outside(
    text: &str,
    from: &str,
    to: &str,
    spans: &[(usize, usize)],
) -> (String, usize) {
    if from.is_empty() {
        return (text.to_string(), 0);
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;
    for (start, matched) in text.match_indices(from) {
        if is_protected(spans, start) {
            continue;
        }
        out.push_str(&text[last..start]);
        out.push_str(to);
        last = start + matched.len();
        count += 1;
    }
    out.push_str(&text[last..]);
    (out, count)
}

/// Regex counterpart of [`replace_exact_outside`], expanding `$1`-style
/// capture references in the replacement.
fn replace_pattern_outside(
    text: &str,
    re: &Regex,
    replacement: &str,
    spans: &[(usize, usize)],
) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;
    for caps in re.captures_iter(text) {
        let m = caps.get(0).expect("capture group 0 always present");
        if is_protected(spans, m.start()) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        caps.expand(replacement, &mut out);
        last = m.end();
        count += 1;
    }
    out.push_str(&text[last..]);
    (out, count)
}

/// Collapse space/newline runs and canonicalise whitespace inside article
/// numbers (`제 5 조` → `제5조`). Formatting only, so it is allowed to touch
/// article-number interiors.
fn structural_cleanup(text: &str) -> String {
    let s = RE_MULTI_SPACE.replace_all(text, " ");
    let s = RE_MULTI_NEWLINE.replace_all(&s, "\n\n");
    RE_ARTICLE_SPAN
        .replace_all(&s, |caps: &regex::Captures<'_>| {
            caps[0].chars().filter(|c| !c.is_whitespace()).collect::<String>()
        })
        .to_string()
}
