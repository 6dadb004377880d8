//! Page-number artifact removal.
//!
//! Scanned statute pages carry `NNN-N` style page labels (e.g. `402-3`) that
//! OCR merges into the text — sometimes on a line of their own, sometimes
//! glued to the first word of the page, and sometimes colliding with a list
//! item (`402-21.` is page `402-2` followed by item `1.`). Rules run in a
//! fixed order; the line-level passes run before the inline pass so that a
//! named document marker (`인사규정 402-3`) is removed as a whole rather
//! than leaving its prefix behind.
//!
//! The whole function is idempotent: running it twice equals running it once.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_PAGE_NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3}-\d{1,2}").unwrap());
static RE_PAGE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3}-\d{1,2}$").unwrap());
static RE_DOC_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[가-힣A-Za-z]+\s*규정\s*\d{3}-\d{1,2}").unwrap());
static RE_PAGE_OF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)page\s*\d+\s*/\s*\d+").unwrap());
static RE_MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());
static RE_MULTI_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip page-number artifacts and excess whitespace.
///
/// Rules (applied in order):
/// 1. Lines consisting solely of a page number
/// 2. Named-document page markers (`인사규정 402-3`)
/// 3. Inline `NNN-N(N)` wherever it occurs in a line, whether glued to
///    Hangul or free-standing between words
/// 4. Page-number + list-item collision (`402-21.` → keep `1.`)
/// 5. `Page N/M` markers
/// 6. Collapse 2+ spaces to one, 3+ newlines to two
/// 7. Trim leading/trailing whitespace
pub fn clean_page_artifacts(input: &str) -> String {
    let s = drop_page_number_lines(input);
    let s = RE_DOC_MARKER.replace_all(&s, "");
    let s = strip_inline_artifacts(&s);
    let s = RE_PAGE_OF.replace_all(&s, "");
    let s = RE_MULTI_SPACE.replace_all(&s, " ");
    let s = RE_MULTI_NEWLINE.replace_all(&s, "\n\n");
    s.trim().to_string()
}

/// Rules 3 and 4 in a single forward pass.
///
/// The `regex` crate has no lookaround, so adjacency is checked manually on
/// the characters surrounding each match. A match that borders an ASCII
/// letter, digit, or dash is part of a longer identifier (`1402-3`,
/// `402-3-5`) and is left alone; every other bounded occurrence — glued to
/// Hangul, between spaces, at a line edge — is an artifact and goes.
fn strip_inline_artifacts(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for m in RE_PAGE_NUM.find_iter(input) {
        let prev = input[..m.start()].chars().next_back();
        let next = input[m.end()..].chars().next();

        if prev.is_some_and(|c| c.is_ascii_alphanumeric() || c == '-') {
            continue;
        }

        let matched = m.as_str();
        let dash = matched.find('-').expect("pattern contains a dash");
        let suffix_digits = matched.len() - dash - 1;

        if next == Some('.') && suffix_digits == 2 {
            // Collision: page `NNN-N` concatenated with list item `N.`.
            // Keep the list-item digit, drop the page portion.
            out.push_str(&input[last..m.start()]);
            out.push_str(&matched[matched.len() - 1..]);
            last = m.end();
        } else if next.is_some_and(|c| c.is_ascii_alphanumeric() || c == '-') {
            continue;
        } else {
            out.push_str(&input[last..m.start()]);
            last = m.end();
        }
    }
    out.push_str(&input[last..]);
    out
}

/// Rule 3: drop whole lines that are nothing but a page number.
fn drop_page_number_lines(input: &str) -> String {
    input
        .lines()
        .filter(|line| !RE_PAGE_LINE.is_match(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
