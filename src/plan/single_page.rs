//! The single-page fast path: try to fit the whole message in one 70-unit
//! page, in either endianness, before falling back to the beam search.

use crate::charset::{BOM_BE, BOM_LE, SINGLE_PAGE};

use super::PreparedText;

/// A full-message candidate kept for the final loss comparison even when
/// the fast path doesn't apply.
pub(crate) struct SinglePageCandidate {
    pub text: String,
    pub errors: usize,
}

pub(crate) enum SinglePageOutcome {
    /// Zero-error, in-budget page: return this immediately.
    Fast(String),
    /// Neither side was error-free and in-budget; both are still kept as
    /// degenerate one-page candidates for the beam's final comparison.
    Candidates {
        be: SinglePageCandidate,
        le: SinglePageCandidate,
    },
}

pub(crate) fn try_single_page(prepared: &PreparedText, multiplier: usize) -> SinglePageOutcome {
    let sp_be = build_be(prepared);
    let sp_le = build_le(prepared);

    let any_error_be = prepared.errors_be.iter().any(|&e| e);
    if !any_error_be && sp_be.chars().count() <= SINGLE_PAGE {
        return SinglePageOutcome::Fast(sp_be);
    }

    let any_error_le = prepared.errors_le.iter().any(|&e| e);
    if !any_error_le && sp_le.chars().count() <= SINGLE_PAGE {
        return SinglePageOutcome::Fast(sp_le);
    }

    let errors_be = count_errors_be(prepared, &sp_be, multiplier);
    let errors_le = count_errors_le(prepared, multiplier);

    SinglePageOutcome::Candidates {
        be: SinglePageCandidate {
            text: sp_be,
            errors: errors_be,
        },
        le: SinglePageCandidate {
            text: sp_le,
            errors: errors_le,
        },
    }
}

fn build_be(prepared: &PreparedText) -> String {
    let mut sp_be: String = prepared.graphemes_be.concat();
    match sp_be.chars().next() {
        Some(c) if c == BOM_LE || c == BOM_BE => {
            sp_be = format!("{BOM_BE}{sp_be}");
        }
        _ => {}
    }
    sp_be
}

fn build_le(prepared: &PreparedText) -> String {
    format!("{BOM_LE}{}", prepared.graphemes_le.concat())
}

/// Loss accounting for the BE candidate, with one deliberate quirk: the
/// running length only accounts for the leading BOM_BE we prepend in
/// [`build_be`] when the input text itself began with BOM_LE, not when it
/// began with BOM_BE. The discrepancy only ever affects which
/// near-the-boundary page layout looks marginally cheaper; it never changes
/// whether the fast path above applies.
fn count_errors_be(prepared: &PreparedText, sp_be: &str, multiplier: usize) -> usize {
    let prefix = format!("{BOM_BE}{BOM_LE}");
    let mut message_length = if sp_be.starts_with(&prefix) { 1 } else { 0 };
    let mut errors = 0usize;
    for (err, fragment) in prepared.errors_be.iter().zip(prepared.graphemes_be.iter()) {
        let flen = fragment.chars().count();
        if message_length + flen > SINGLE_PAGE {
            errors += flen * multiplier;
            continue;
        }
        message_length += flen;
        if *err {
            errors += 1;
        }
    }
    errors
}

fn count_errors_le(prepared: &PreparedText, multiplier: usize) -> usize {
    let mut message_length = 1usize; // the mandatory leading BOM_LE
    let mut errors = 0usize;
    for (err, fragment) in prepared.errors_le.iter().zip(prepared.graphemes_le.iter()) {
        let flen = fragment.chars().count();
        if message_length + flen > SINGLE_PAGE {
            errors += flen * multiplier;
            continue;
        }
        message_length += flen;
        if *err {
            errors += 1;
        }
    }
    errors
}
