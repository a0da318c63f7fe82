//! Grapheme-wise UCS-2 masquerade re-encoder for a strict, legacy SMS
//! gateway.
//!
//! The gateway accepts only percent-encoded UTF-8 whose decoded codepoints
//! fit the UCS-2 range (≤ U+FFFF), then re-encodes each page as raw
//! UTF-16-BE, 63 code units per page (70 if the whole message fits one
//! page). Phones, however, decode received pages as UTF-16, honoring an
//! optional byte-order mark to pick endianness. This crate exploits that
//! gap: by choosing, per page, whether to ship UTF-16-BE (no BOM) or
//! UTF-16-LE (mandatory BOM, bytes swapped), it can carry characters —
//! including supplementary-plane emoji — that the gateway would otherwise
//! mangle.
//!
//! # Example
//!
//! ```rust
//! use sms_masquerade::{coerce_text, CoerceOptions};
//!
//! let coerced = coerce_text("💩", &CoerceOptions::default())?;
//! assert_eq!(coerced, "\u{fffe}\u{3dd8}\u{a9dc}");
//! # Ok::<(), sms_masquerade::CoerceError>(())
//! ```

pub mod charset;
mod coerce;
mod error;
pub mod gateway;
mod plan;
pub mod plaintext;

pub use coerce::{Coerced, CoercedGrapheme, UnsupportedPolicy};
pub use error::{CoerceError, GatewayError, Result};
pub use plaintext::coerce_plaintext;

use plan::beam;
use plan::single_page::{try_single_page, SinglePageOutcome};
use plan::{assemble, prepare};

/// Configuration for [`coerce_text`].
#[derive(Debug, Clone)]
pub struct CoerceOptions {
    /// Maximum number of 63-code-unit pages the beam search may emit.
    /// Must be at least 1.
    pub max_pages: usize,
    /// Weight applied to each truncated grapheme's length when scoring a
    /// candidate layout. Higher values penalize truncation more heavily
    /// relative to per-grapheme encoding losses.
    pub truncated_text_error_multiplier: usize,
    /// How to handle graphemes containing an
    /// [`crate::charset::is_unsupported`] codepoint.
    pub unsupported_policy: UnsupportedPolicy,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self {
            max_pages: 5,
            truncated_text_error_multiplier: 1,
            unsupported_policy: UnsupportedPolicy::Replace,
        }
    }
}

/// Coerce `text` to UCS-2-masquerading UTF-16 under the default options
/// (`max_pages = 5`, multiplier = 1, `Replace` policy).
pub fn coerce_text_default(text: &str) -> String {
    coerce_text(text, &CoerceOptions::default())
        .expect("default options always satisfy max_pages >= 1")
}

/// A best-effort re-encoding of `text` into UCS-2-masquerading UTF-16,
/// page-structured per the SMS gateway's constraints.
///
/// The result is a plain `String` whose every codepoint is ≤ U+FFFF, ready
/// for percent-encoding by the caller. This never fails for encoding
/// difficulty — lossy substitutions are made visible in the output via
/// U+FFFD/U+FDFF — it only fails on the precondition `max_pages >= 1`.
pub fn coerce_text(text: &str, options: &CoerceOptions) -> Result<String> {
    if options.max_pages < 1 {
        return Err(CoerceError::MaxPagesZero);
    }

    if text.is_empty() {
        // Empty input has no pages to build; the gateway model rejects an
        // empty message outright, so there is nothing further to encode.
        return Ok(String::new());
    }

    let prepared = prepare(text, options.unsupported_policy)?;
    let multiplier = options.truncated_text_error_multiplier;

    let single_page = try_single_page(&prepared, multiplier);
    let (single_be, single_le) = match single_page {
        SinglePageOutcome::Fast(text) => {
            log::debug!(
                "single-page fast path succeeded ({} code units)",
                text.chars().count()
            );
            return Ok(text);
        }
        SinglePageOutcome::Candidates { be, le } => (be, le),
    };

    let states = beam::search(&prepared, options.max_pages);

    let mut candidates: Vec<(usize, Vec<String>)> = states
        .into_iter()
        .map(|state| {
            let truncated = prepared.len().saturating_sub(state.cursor) * multiplier;
            (state.errors + truncated, state.pages)
        })
        .collect();
    candidates.push((single_be.errors, vec![single_be.text]));
    candidates.push((single_le.errors, vec![single_le.text]));

    let best = candidates
        .into_iter()
        .min_by_key(|(loss, pages)| {
            let last_len = pages.last().map(|p| p.chars().count()).unwrap_or(0);
            (*loss, pages.len(), last_len)
        })
        .expect("at least the two single-page candidates are always present");

    log::debug!(
        "beam search selected {} page(s) with total loss {}",
        best.1.len(),
        best.0
    );

    Ok(assemble::assemble(&best.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_pages_zero_is_rejected() {
        let options = CoerceOptions {
            max_pages: 0,
            ..CoerceOptions::default()
        };
        assert_eq!(coerce_text("a", &options), Err(CoerceError::MaxPagesZero));
    }

    #[test]
    fn ascii_is_a_fixed_point() {
        let ascii = "the quick brown fox jumps over a lazy dog 0123456789";
        assert_eq!(coerce_text_default(ascii), ascii);
    }

    #[test]
    fn single_checkmark_is_unchanged() {
        assert_eq!(coerce_text_default("\u{2714}"), "\u{2714}");
    }

    #[test]
    fn pile_of_poo_is_masqueraded_as_le_page() {
        assert_eq!(coerce_text_default("\u{1F4A9}"), "\u{fffe}\u{3dd8}\u{a9dc}");
    }

    #[test]
    fn bom_be_input_gains_a_leading_bom() {
        assert_eq!(coerce_text_default("\u{feff}"), "\u{feff}\u{feff}");
    }

    #[test]
    fn bom_le_input_gains_a_leading_bom_be() {
        assert_eq!(coerce_text_default("\u{fffe}"), "\u{feff}\u{fffe}");
    }

    #[test]
    fn repeated_bom_be_round_trips_through_single_page_search() {
        let input = "\u{feff}".repeat(100);
        let out = coerce_text_default(&input);
        assert_eq!(out.chars().count(), 102);
        assert!(out.chars().all(|c| c == '\u{feff}'));
    }

    #[test]
    fn long_ascii_run_with_trailing_emoji_spans_two_pages() {
        let input = format!("{}{}", "a".repeat(80), "\u{1F4A9}");
        let out = coerce_text_default(&input);
        let first_page: String = out.chars().take(63).collect();
        assert_eq!(first_page, "a".repeat(63));
        assert_eq!(out.chars().nth(63), Some('\u{fffe}'));
    }

    #[test]
    fn empty_input_returns_empty_output() {
        assert_eq!(coerce_text_default(""), "");
    }

    #[test]
    fn strict_policy_rejects_unsupported_codepoint() {
        let options = CoerceOptions {
            unsupported_policy: UnsupportedPolicy::Error,
            ..CoerceOptions::default()
        };
        let err = coerce_text("\u{200E}", &options).unwrap_err();
        assert_eq!(
            err,
            CoerceError::UnencodableGrapheme {
                grapheme: "\u{200E}".to_string()
            }
        );
    }

    #[test]
    fn strict_policy_accepts_ordinary_text() {
        let options = CoerceOptions {
            unsupported_policy: UnsupportedPolicy::Error,
            ..CoerceOptions::default()
        };
        assert_eq!(coerce_text("hello", &options).unwrap(), "hello");
    }
}
