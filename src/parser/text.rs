use std::sync::LazyLock;

use regex::Regex;

// `…File:Ahri_Taunt.ogg/revision/latest` → `Ahri_Taunt`
static AUDIO_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([^:]*?)\.ogg").unwrap());
static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?s)"(.*)""#).unwrap());
// Text on the same line in front of the first quotation mark: `Xayah: "…"` → `Xayah: `
static SPEAKER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([^"\n]*)""#).unwrap());

const ZERO_WIDTH_SPACE: char = '\u{200b}';
const NO_BREAK_SPACE: char = '\u{a0}';

/// Audio file name between the last `:` and `.ogg` of a link target.
pub fn audio_token(href: &str) -> Option<&str> {
    AUDIO_TOKEN_RE
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Content strictly between the first and the last `"`.
pub fn quoted(text: &str) -> Option<&str> {
    QUOTED_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn speaker_prefix(text: &str) -> Option<&str> {
    SPEAKER_PREFIX_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn strip_invisible(s: &str) -> String {
    s.chars()
        .filter(|&c| c != ZERO_WIDTH_SPACE && c != NO_BREAK_SPACE)
        .collect()
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
