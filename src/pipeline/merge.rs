//! Post-merge normalization of page-concatenated Markdown.
//!
//! Joining per-page VLM output re-introduces a class of artifacts that no
//! single-page pass can see: page markers from both sides of a page break,
//! the same revision-history footer repeated on adjacent pages, and code
//! fences that were opened on one page and re-opened on the next. This stage
//! removes the duplication and reports per-operation counts for quality
//! telemetry.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Full-line page-marker patterns. A line matching any of these is dropped.
static PAGE_MARKER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\s*(?:-\s*\d{1,4}\s*-|\d{1,4})\s*$", // 3  /  - 3 -  (dashes paired)
        r"^\s*_+\s*\d{1,4}\s*_+\s*$",          // __3__
        r"^\s*\*+\s*\d{1,4}\s*\*+\s*$",        // **3**
        r"(?i)^\s*(?:페이지|page)\s*[.:]?\s*\d{1,4}\s*$", // 페이지 3 / Page 3
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Revision citation: ordinal + `차 개정` + `YYYY.MM.DD` with optional
/// whitespace around the separators and an optional trailing period.
static RE_REVISION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*차\s*개정\s*(\d{4})\s*\.\s*(\d{1,2})\s*\.\s*(\d{1,2})\.?").unwrap()
});

static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

/// Per-operation counts from one [`normalize_merged`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Page-marker lines dropped.
    pub page_markers_removed: usize,
    /// Repeated revision citations blanked out.
    pub revisions_deduped: usize,
    /// Interior code-fence delimiter lines deleted.
    pub fences_removed: usize,
    /// Final byte length minus original byte length (≤ 0).
    pub length_delta: i64,
}

/// Remove cross-page duplication artifacts from merged Markdown.
///
/// Operations, in order:
/// 1. Drop page-marker lines (counted)
/// 2. Deduplicate repeated revision citations, keeping the first (counted)
/// 3. Delete interior code-fence lines, keeping the outermost pair (counted)
/// 4. Collapse runs of 3+ blank lines to exactly 2
pub fn normalize_merged(input: &str) -> (String, MergeReport) {
    let mut report = MergeReport::default();

    let s = drop_page_marker_lines(input, &mut report.page_markers_removed);
    let s = dedup_revisions(&s, &mut report.revisions_deduped);
    let s = drop_interior_fences(&s, &mut report.fences_removed);
    let s = RE_BLANK_RUN.replace_all(&s, "\n\n\n").to_string();

    report.length_delta = s.len() as i64 - input.len() as i64;
    (s, report)
}

fn drop_page_marker_lines(input: &str, removed: &mut usize) -> String {
    input
        .lines()
        .filter(|line| {
            let is_marker = PAGE_MARKER_PATTERNS.iter().any(|re| re.is_match(line));
            if is_marker {
                *removed += 1;
            }
            !is_marker
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep the first occurrence of each `(ordinal, year, month, day)` citation
/// key; later occurrences (adjacent pages carrying the same footer) are
/// replaced with the empty string.
fn dedup_revisions(input: &str, removed: &mut usize) -> String {
    let mut seen: HashSet<(u32, u32, u32, u32)> = HashSet::new();
    RE_REVISION
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let key = (
                caps[1].parse().unwrap_or(0),
                caps[2].parse().unwrap_or(0),
                caps[3].parse().unwrap_or(0),
                caps[4].parse().unwrap_or(0),
            );
            if seen.insert(key) {
                caps[0].to_string()
            } else {
                *removed += 1;
                String::new()
            }
        })
        .to_string()
}

/// A merged document legitimately has at most one outer fenced block. With
/// more than 2 fence-delimiter lines present, everything between the first
/// and last delimiter is page-boundary noise: the delimiters go, the
/// enclosed content stays.
fn drop_interior_fences(input: &str, removed: &mut usize) -> String {
    let fence_lines: Vec<usize> = input
        .lines()
        .enumerate()
        .filter(|(_, line)| line.trim_start().starts_with("```"))
        .map(|(i, _)| i)
        .collect();

    if fence_lines.len() <= 2 {
        return input.to_string();
    }

    let first = fence_lines[0];
    let last = *fence_lines.last().expect("non-empty fence list");
    input
        .lines()
        .enumerate()
        .filter(|(i, line)| {
            let interior_fence =
                line.trim_start().starts_with("```") && *i != first && *i != last;
            if interior_fence {
                *removed += 1;
            }
            !interior_fence
        })
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}
