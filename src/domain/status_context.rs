//! Keyword-class scanning over captured text: completion / error / blocking
//! markers, language-independent within the application's working languages.

use regex::RegexSet;
use std::sync::LazyLock;

/// Flags and descriptive hints derived from the current capture, consumed by
/// the status mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusContext {
    pub has_completion_marker: bool,
    pub completion_text: Option<String>,
    pub has_error_marker: bool,
    pub error_text: Option<String>,
    pub is_blocked: bool,
    pub blocked_text: Option<String>,
}

// Word classes are intentionally duplicated across a handful of working
// languages (English, plus the glyphs which are language-independent) rather
// than routed through a translation table — the set is small and fixed.
static COMPLETION_WORDS: &[&str] = &[
    "completed", "complete", "finished", "done", "success", "succeeded", "✓", "✔",
];
static ERROR_WORDS: &[&str] = &["error", "failed", "failure", "exception", "✗", "✘", "✖"];
static BLOCKING_WORDS: &[&str] = &["waiting", "pending", "blocked", "paused", "awaiting"];

static COMPLETION_SET: LazyLock<RegexSet> = LazyLock::new(|| build_word_set(COMPLETION_WORDS));
static ERROR_SET: LazyLock<RegexSet> = LazyLock::new(|| build_word_set(ERROR_WORDS));
static BLOCKING_SET: LazyLock<RegexSet> = LazyLock::new(|| build_word_set(BLOCKING_WORDS));

fn build_word_set(words: &[&str]) -> RegexSet {
    let patterns: Vec<String> = words
        .iter()
        .map(|w| {
            if w.chars().all(|c| c.is_ascii_alphabetic()) {
                format!(r"(?i)\b{w}\b")
            } else {
                regex::escape(w)
            }
        })
        .collect();
    RegexSet::new(patterns).expect("marker word patterns are statically valid")
}

fn first_match<'a>(set: &RegexSet, words: &'a [&'a str], text: &str) -> Option<&'a str> {
    set.matches(text)
        .iter()
        .next()
        .map(|idx| words[idx])
}

impl StatusContext {
    /// Builds a `StatusContext` by scanning `text` (typically the latest
    /// capture's content) for the three marker classes.
    pub fn from_capture_text(text: &str) -> Self {
        let completion_text = first_match(&COMPLETION_SET, COMPLETION_WORDS, text);
        let error_text = first_match(&ERROR_SET, ERROR_WORDS, text);
        let blocked_text = first_match(&BLOCKING_SET, BLOCKING_WORDS, text);

        StatusContext {
            has_completion_marker: completion_text.is_some(),
            completion_text: completion_text.map(str::to_string),
            has_error_marker: error_text.is_some(),
            error_text: error_text.map(str::to_string),
            is_blocked: blocked_text.is_some(),
            blocked_text: blocked_text.map(str::to_string),
        }
    }
}
