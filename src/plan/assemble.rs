//! Final assembly: right-pad every non-final page to exactly 63 code units
//! with its own BOM, then concatenate.

use crate::charset::{BOM_BE, BOM_LE, PAGE};

/// Pad `page` to [`PAGE`] code units with its own BOM character, determined
/// by whether it is a BE page (does not start with BOM_LE) or an LE page
/// (does).
fn right_pad(page: &str) -> String {
    let len = page.chars().count();
    debug_assert!(len <= PAGE);
    let pad_char = if page.starts_with(BOM_LE) { BOM_LE } else { BOM_BE };
    let mut out = String::with_capacity(PAGE);
    out.push_str(page);
    for _ in len..PAGE {
        out.push(pad_char);
    }
    out
}

/// Pad every non-final page and concatenate. `pages` must be non-empty.
pub(crate) fn assemble(pages: &[String]) -> String {
    assert!(!pages.is_empty(), "assemble called with no pages");
    let (last, rest) = pages.split_last().unwrap();
    let mut out = String::new();
    for page in rest {
        out.push_str(&right_pad(page));
    }
    out.push_str(last);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_be_page_with_bom_be() {
        let padded = right_pad("ab");
        assert_eq!(padded.chars().count(), PAGE);
        assert!(padded.ends_with(&BOM_BE.to_string().repeat(PAGE - 2)));
    }

    #[test]
    fn pads_le_page_with_bom_le() {
        let page = format!("{BOM_LE}ab");
        let padded = right_pad(&page);
        assert_eq!(padded.chars().count(), PAGE);
        assert!(padded.ends_with(&BOM_LE.to_string().repeat(PAGE - 3)));
    }

    #[test]
    fn final_page_not_padded() {
        let out = assemble(&["a".repeat(63), "b".to_string()]);
        assert_eq!(out.chars().count(), 64);
    }
}
