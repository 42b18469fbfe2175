//! Review text cleaning.
//!
//! Applied once when raw reviews are normalized; downstream stages assume
//! text is already clean and non-empty.

use once_cell::sync::Lazy;
use regex::Regex;

static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\u{1F1E6}-\u{1F1FF}\u{1F3FB}-\u{1F3FF}\u{FE0F}\u{200D}\u{20E3}]")
        .expect("static regex")
});

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+").expect("static regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Strip emoji and URLs, collapse whitespace runs, and trim.
///
/// Returns an empty string when nothing but noise was present; callers drop
/// such reviews.
pub fn clean_review_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = EMOJI.replace_all(text, "");
    let text = URL.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}
