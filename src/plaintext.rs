//! The plaintext fallback: a lossy transliteration of arbitrary Unicode
//! text down to the 7-bit SMS charset. A peer to the UTF-16 masquerade
//! path, not on its hot path — callers pick one mode per message.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;

use crate::charset::{grapheme_is_unsupported, is_sms_charset};

static PLAINTEXT_CACHE: Lazy<RwLock<HashMap<String, String>>> =
    Lazy::new(|| RwLock::new(HashMap::with_capacity(0xFFFF)));

/// Transliterate `text` to the 7-bit SMS charset, one grapheme at a time.
///
/// Graphemes containing an unsupported codepoint (see
/// [`crate::charset::is_unsupported`]) are dropped entirely. All other
/// graphemes are run through a Unicode-to-ASCII transliterator; the
/// backtick and the non-printable ASCII control range are mapped to a
/// space or apostrophe, and a grapheme whose transliteration is empty is
/// replaced with `?`.
pub fn coerce_plaintext(text: &str) -> String {
    text.graphemes(true)
        .map(coerce_plaintext_grapheme)
        .collect()
}

fn coerce_plaintext_grapheme(grapheme: &str) -> String {
    if let Some(hit) = PLAINTEXT_CACHE.read().unwrap().get(grapheme) {
        return hit.clone();
    }
    let computed = coerce_plaintext_grapheme_uncached(grapheme);
    PLAINTEXT_CACHE
        .write()
        .unwrap()
        .insert(grapheme.to_string(), computed.clone());
    computed
}

fn coerce_plaintext_grapheme_uncached(grapheme: &str) -> String {
    if grapheme_is_unsupported(grapheme) {
        return String::new();
    }

    let transliterated = deunicode::deunicode(grapheme);
    let mut out = String::with_capacity(transliterated.len());
    for c in transliterated.chars() {
        match c {
            '`' => out.push('\''),
            '\u{8}' | '\u{c}' | '\u{b}' | '\t' => out.push(' '),
            c if (c as u32) < 256 && !is_sms_charset(c) => {}
            c => out.push(c),
        }
    }

    if out.is_empty() {
        "?".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diacritics_are_flattened_to_ascii() {
        assert_eq!(coerce_plaintext("\u{00C5}\u{00E9}\u{00EF}\u{00F4}u"), "Aeiou");
    }

    #[test]
    fn lone_bom_becomes_question_mark() {
        assert_eq!(coerce_plaintext("\u{feff}"), "?");
    }

    #[test]
    fn nul_is_dropped_entirely() {
        assert_eq!(coerce_plaintext("1234567890\0"), "1234567890");
    }

    #[test]
    fn basic_emoji_becomes_question_mark() {
        assert_eq!(coerce_plaintext("\u{2714}"), "?");
    }

    #[test]
    fn backtick_becomes_apostrophe() {
        assert_eq!(coerce_plaintext("`"), "'");
    }
}
