//! RAG-oriented cleanup of VLM-authored Markdown.
//!
//! VLMs pad their extraction with narration ("이 이미지는 …"), summary
//! sections, and JSON mirrors of data already rendered as prose. None of it
//! is statute content, and every stray sentence dilutes the embeddings built
//! from the chunks downstream. This stage strips the boilerplate before the
//! chunker runs.
//!
//! Unlike the typo normalizer there are no protected regions here: this
//! stage runs on VLM prose, not statute body text.
//!
//! Section removals (`요약`, the JSON extraction example) are line-scan
//! passes rather than regexes because the `regex` crate has no lookahead to
//! express "up to the next heading".

use once_cell::sync::Lazy;
use regex::Regex;

static RE_HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Meta-description opener at line start, removed up through its
/// terminating period (which may sit on a later line).
static RE_NARRATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:이 이미지는|아래와 같이|다음과 같이)[^.]*\.").unwrap());

static RE_MARKDOWN_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```markdown[ \t]*\n(.*?)\n?```").unwrap());

static RE_JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json[ \t]*\n.*?```\n?").unwrap());

static RE_SUMMARY_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:#{1,6}\s*요약|\*\*\s*요약\s*\*\*)").unwrap());

static RE_EXAMPLE_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:#{1,6}\s*|\*\*\s*)?추출\s*예시\s*[(（]\s*JSON").unwrap()
});

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s").unwrap());
static RE_HRULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^---+\s*$").unwrap());
static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{5,}").unwrap());

/// Strip VLM boilerplate from extracted Markdown before chunking.
///
/// Rules (applied in order):
/// 1. Remove HTML comment blocks, including multi-line ones
/// 2. Remove meta-narration sentences ("이 이미지는 …" etc.)
/// 3. Remove a `요약` section (bold label or heading) to the next heading
/// 4. Unwrap a ` ```markdown ` fenced block, keeping its content
/// 5. Remove ` ```json ` fenced blocks entirely
/// 6. Remove the "추출 예시 (JSON …)" section to the next heading or rule
/// 7. Collapse 4+ consecutive blank lines to 3
/// 8. Trim leading/trailing whitespace
pub fn clean_markdown(input: &str) -> String {
    let s = RE_HTML_COMMENT.replace_all(input, "");
    let s = RE_NARRATION.replace_all(&s, "");
    let s = remove_section(&s, &RE_SUMMARY_START, false);
    let s = RE_MARKDOWN_FENCE.replace_all(&s, "$1");
    let s = RE_JSON_FENCE.replace_all(&s, "");
    let s = remove_section(&s, &RE_EXAMPLE_START, true);
    let s = RE_BLANK_RUN.replace_all(&s, "\n\n\n\n");
    s.trim().to_string()
}

/// Drop every line from one matching `start` up to (not including) the next
/// heading — or a horizontal rule when `stop_at_hrule` is set — or the end
/// of the text.
fn remove_section(input: &str, start: &Regex, stop_at_hrule: bool) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut skipping = false;
    for line in input.lines() {
        if skipping {
            if RE_HEADING.is_match(line) || (stop_at_hrule && RE_HRULE.is_match(line)) {
                skipping = false;
            } else {
                continue;
            }
        }
        if start.is_match(line.trim_start()) {
            skipping = true;
            continue;
        }
        out.push(line);
    }
    out.join("\n")
}
