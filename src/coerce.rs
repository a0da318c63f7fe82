//! The grapheme coercer: maps one extended grapheme cluster to its BE/LE
//! UCS-2 masquerade, memoized across the life of the process.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use unicode_normalization::UnicodeNormalization;

use crate::charset::{grapheme_is_unsupported, REPL_BE, REPL_LE};

/// How a grapheme containing an [`crate::charset::is_unsupported`] codepoint
/// should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedPolicy {
    /// Substitute the replacement pair and flag an error. The default.
    Replace,
    /// Drop the grapheme silently; it contributes no length and no error.
    Ignore,
    /// Treat the grapheme as unencodable on both sides.
    Error,
    /// Pass the grapheme through untouched.
    ///
    /// The output may then contain codepoints the gateway cannot transport.
    /// Prefer one of the other three policies unless you have already
    /// excluded unsupported codepoints upstream.
    Pass,
}

impl Default for UnsupportedPolicy {
    fn default() -> Self {
        UnsupportedPolicy::Replace
    }
}

/// The result of coercing one grapheme on one endianness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced {
    /// A masquerade string, all codepoints ≤ U+FFFF, non-empty unless the
    /// grapheme was dropped under [`UnsupportedPolicy::Ignore`].
    Unit(String),
    /// This endianness cannot represent the grapheme at all.
    Unencodable,
}

impl Coerced {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Coerced::Unit(s) => Some(s),
            Coerced::Unencodable => None,
        }
    }

    pub fn is_unencodable(&self) -> bool {
        matches!(self, Coerced::Unencodable)
    }
}

/// The dual masquerade of one grapheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercedGrapheme {
    pub be: Coerced,
    pub le: Coerced,
    /// Set when this grapheme required a replacement-character substitution:
    /// either it contained an unsupported codepoint under `Replace`, or
    /// neither endianness could represent it and both sides collapsed to the
    /// replacement pair. Informational only; it does not feed the beam
    /// search's loss accounting, which tracks per-side encodability instead.
    pub is_error: bool,
}

type CacheKey = (String, UnsupportedPolicy);

static COERCE_CACHE: Lazy<RwLock<HashMap<CacheKey, CoercedGrapheme>>> =
    Lazy::new(|| RwLock::new(HashMap::with_capacity(0xFFFF)));

/// Coerce one grapheme into its BE/LE masquerade, under `policy`.
///
/// Memoized: repeated calls with the same `(grapheme, policy)` pair hit a
/// process-wide cache instead of re-running normalization search.
pub fn coerce_grapheme(grapheme: &str, policy: UnsupportedPolicy) -> CoercedGrapheme {
    debug_assert!(!grapheme.is_empty());

    let key: CacheKey = (grapheme.to_string(), policy);
    if let Some(hit) = COERCE_CACHE.read().unwrap().get(&key) {
        log::trace!("coerce cache hit for {:?} under {:?}", grapheme, policy);
        return hit.clone();
    }

    let computed = coerce_grapheme_uncached(grapheme, policy);
    COERCE_CACHE
        .write()
        .unwrap()
        .insert(key, computed.clone());
    computed
}

fn coerce_grapheme_uncached(grapheme: &str, policy: UnsupportedPolicy) -> CoercedGrapheme {
    if grapheme_is_unsupported(grapheme) {
        return match policy {
            UnsupportedPolicy::Replace => CoercedGrapheme {
                be: Coerced::Unit(REPL_BE.to_string()),
                le: Coerced::Unit(REPL_LE.to_string()),
                is_error: true,
            },
            UnsupportedPolicy::Ignore => CoercedGrapheme {
                be: Coerced::Unit(String::new()),
                le: Coerced::Unit(String::new()),
                is_error: false,
            },
            UnsupportedPolicy::Error => {
                log::warn!(
                    "grapheme {:?} contains an unsupported codepoint under the strict policy",
                    grapheme
                );
                CoercedGrapheme {
                    be: Coerced::Unencodable,
                    le: Coerced::Unencodable,
                    is_error: true,
                }
            }
            UnsupportedPolicy::Pass => {
                // fall through: re-attempt the normal masquerade search below,
                // which will usually succeed since most unsupported
                // codepoints are themselves in the BMP.
                coerce_normal(grapheme)
            }
        };
    }
    coerce_normal(grapheme)
}

/// Run the normalization search and endianness selection described in the
/// grapheme coercer's algorithm, ignoring the unsupported-codepoint policy.
fn coerce_normal(grapheme: &str) -> CoercedGrapheme {
    let mut candidates: Vec<String> = vec![grapheme.to_string()];
    for normalized in [
        grapheme.nfc().collect::<String>(),
        grapheme.nfkc().collect::<String>(),
        grapheme.nfd().collect::<String>(),
        grapheme.nfkd().collect::<String>(),
    ] {
        if normalized != grapheme && !candidates.contains(&normalized) {
            candidates.push(normalized);
        }
    }

    // shorter encodings first; ties preserve original relative order
    // (stable sort), so the original form wins ties.
    let mut candidate_bytes: Vec<Vec<u8>> = candidates.iter().map(|c| utf16_be_bytes(c)).collect();
    candidate_bytes.sort_by_key(|bytes| bytes.len());

    let be = decode_side(&candidate_bytes, true);
    let le = decode_side(&candidate_bytes, false);

    let be = finalize_side(be);
    let le = finalize_side(le);

    match (&be, &le) {
        (Coerced::Unencodable, Coerced::Unencodable) => CoercedGrapheme {
            be: Coerced::Unit(REPL_BE.to_string()),
            le: Coerced::Unit(REPL_LE.to_string()),
            is_error: true,
        },
        _ => CoercedGrapheme {
            be,
            le,
            is_error: false,
        },
    }
}

/// A page can hold at most 63 code units; anything that would consume the
/// whole page by itself is useless, so it's treated as unencodable.
const MAX_FRAGMENT_LEN: usize = 63;

fn finalize_side(candidate: Option<String>) -> Coerced {
    match candidate {
        Some(s) if s.chars().count() < MAX_FRAGMENT_LEN => Coerced::Unit(s),
        _ => Coerced::Unencodable,
    }
}

/// Emit the UTF-16-BE byte sequence of `s`.
fn utf16_be_bytes(s: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(s.len() * 2);
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Try each candidate byte sequence, reinterpreting its 16-bit units under
/// the given endianness, until one decodes to a string of valid scalar
/// values (i.e. contains no unpaired surrogate).
fn decode_side(candidates: &[Vec<u8>], big_endian: bool) -> Option<String> {
    for bytes in candidates {
        if let Some(s) = reinterpret_units(bytes, big_endian) {
            return Some(s);
        }
    }
    None
}

fn reinterpret_units(bytes: &[u8], big_endian: bool) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let mut out = String::with_capacity(bytes.len() / 2);
    for chunk in bytes.chunks_exact(2) {
        let unit: u16 = if big_endian {
            u16::from_be_bytes([chunk[0], chunk[1]])
        } else {
            u16::from_le_bytes([chunk[0], chunk[1]])
        };
        // char::from_u32 rejects the surrogate range D800..=DFFF, which is
        // exactly the "re-encodable as UTF-8" test this algorithm needs.
        match char::from_u32(unit as u32) {
            Some(c) => out.push(c),
            None => return None,
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
