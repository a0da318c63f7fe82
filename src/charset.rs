//! Constants shared across the coercer, planner and gateway model.

/// Byte-order mark for big-endian pages. Also the SMS gateway's own BOM.
pub const BOM_BE: char = '\u{FEFF}';
/// Byte-order mark for little-endian pages. Mandatory on every LE page.
pub const BOM_LE: char = '\u{FFFE}';

/// Stand-in for a grapheme that cannot be masqueraded in either endianness, BE side.
pub const REPL_BE: char = '\u{FFFD}';
/// Stand-in for a grapheme that cannot be masqueraded in either endianness, LE side.
/// Byte-swap of [`REPL_BE`].
pub const REPL_LE: char = '\u{FDFF}';

/// Code units in a non-final page.
pub const PAGE: usize = 63;
/// Code units allowed when the whole message fits in a single page.
pub const SINGLE_PAGE: usize = 70;

/// Codepoints the gateway appliance drops or mishandles, and that the encoder
/// therefore refuses to carry across pages.
///
/// Bidi control characters are technically representable, but a page is
/// parsed independently by the handset, so a directional override opened on
/// one page can't be closed on the next.
pub fn is_unsupported(c: char) -> bool {
    matches!(c,
        '\0'
        | '\u{202A}'..='\u{202E}'
        | '\u{2066}'..='\u{2069}'
        | '\u{200E}' | '\u{200F}'
        | '\u{061C}'
    )
}

/// `true` if any codepoint of `grapheme` is in [`is_unsupported`].
pub fn grapheme_is_unsupported(grapheme: &str) -> bool {
    grapheme.chars().any(is_unsupported)
}

/// The ASCII-only charset the gateway accepts unmodified. Deliberately not
/// the full ASCII printable set (no backtick) and not the full GSM default
/// alphabet (no euro sign) — the appliance mishandles both.
///
/// Used by [`crate::plaintext::coerce_plaintext`] to decide which
/// transliterated characters survive into the 7-bit fallback.
pub fn is_sms_charset(c: char) -> bool {
    matches!(c,
        '0'..='9'
        | 'a'..='z'
        | 'A'..='Z'
        | '!' | '"' | '#' | '$' | '%' | '&' | '\'' | '(' | ')' | '*' | '+'
        | ',' | '-' | '.' | '/' | ':' | ';' | '<' | '=' | '>' | '?' | '@'
        | '[' | '\\' | ']' | '^' | '_' | '{' | '|' | '}' | '~'
        | ' ' | '\n' | '\r' | '\x0C'
    )
}
