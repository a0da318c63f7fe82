//! Page-layout planning: the single-page fast path, the multi-page beam
//! search, and final assembly.

pub mod assemble;
pub mod beam;
pub mod single_page;

use unicode_segmentation::UnicodeSegmentation;

use crate::charset::{REPL_BE, REPL_LE};
use crate::coerce::{coerce_grapheme, UnsupportedPolicy};
use crate::error::{CoerceError, Result};

/// Per-grapheme BE/LE fragments and per-side encodability, ready for the
/// single-page and beam planners. Unencodable sides are filled with the
/// replacement character so that downstream code can always index into
/// `graphemes_be`/`graphemes_le` without special-casing.
pub(crate) struct PreparedText {
    pub graphemes_be: Vec<String>,
    pub graphemes_le: Vec<String>,
    pub errors_be: Vec<bool>,
    pub errors_le: Vec<bool>,
}

impl PreparedText {
    pub fn len(&self) -> usize {
        self.graphemes_be.len()
    }
}

/// Builds the per-grapheme plan, or fails if `policy` is
/// [`UnsupportedPolicy::Error`] and some grapheme contains an unsupported
/// codepoint (the only case in which a grapheme comes back unencodable on
/// both sides without a fallback the planner can use).
pub(crate) fn prepare(text: &str, policy: UnsupportedPolicy) -> Result<PreparedText> {
    let mut graphemes_be = Vec::new();
    let mut graphemes_le = Vec::new();
    let mut errors_be = Vec::new();
    let mut errors_le = Vec::new();

    for g in text.graphemes(true) {
        let coerced = coerce_grapheme(g, policy);
        if coerced.be.is_unencodable() && coerced.le.is_unencodable() {
            return Err(CoerceError::UnencodableGrapheme {
                grapheme: g.to_string(),
            });
        }
        errors_be.push(coerced.be.is_unencodable());
        errors_le.push(coerced.le.is_unencodable());
        graphemes_be.push(
            coerced
                .be
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| REPL_BE.to_string()),
        );
        graphemes_le.push(
            coerced
                .le
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| REPL_LE.to_string()),
        );
    }

    Ok(PreparedText {
        graphemes_be,
        graphemes_le,
        errors_be,
        errors_le,
    })
}
