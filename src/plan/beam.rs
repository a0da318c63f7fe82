//! The multi-page beam search: at each step, every live state is extended
//! by one BE page and one LE page; the beam is then pruned to the single
//! best (largest-cursor) state per distinct error count.
//!
//! An extension does not stop at the first encoding error: it keeps
//! accumulating the page's fragments right through it, recording a
//! checkpoint state just before each erroring grapheme as well as one final
//! state when the page fills up or the text ends. This lets the pruning
//! step pick whichever checkpoint turns out cheapest overall rather than
//! committing to "stop at the first error" up front.

use crate::charset::{BOM_BE, BOM_LE, PAGE};

use super::PreparedText;

#[derive(Clone)]
pub(crate) struct SearchState {
    pub cursor: usize,
    pub errors: usize,
    pub pages: Vec<String>,
}

/// Run the beam for up to `max_pages` iterations, or until every live state
/// has consumed the whole text.
pub(crate) fn search(prepared: &PreparedText, max_pages: usize) -> Vec<SearchState> {
    let mut states = vec![SearchState {
        cursor: 0,
        errors: 0,
        pages: Vec::new(),
    }];

    for _page_idx in 0..max_pages {
        let mut new_states: Vec<SearchState> = Vec::new();

        // A state that has already consumed the whole text has nothing left
        // to extend, but it must still be carried forward unchanged: pruning
        // only keeps the best state per error count, so a finished 0-error
        // state would otherwise be deleted the moment a higher-error bucket
        // still has extensions to offer.
        for state in &states {
            if state.cursor >= prepared.len() {
                new_states.push(state.clone());
            } else {
                new_states.extend(extend_be(prepared, state));
            }
        }
        for state in &states {
            if state.cursor >= prepared.len() {
                new_states.push(state.clone());
            } else {
                new_states.extend(extend_le(prepared, state));
            }
        }

        states = prune(new_states);

        if states.iter().all(|s| s.cursor >= prepared.len()) {
            break;
        }
    }

    states
}

/// Keep, for each distinct error count, only the state with the largest
/// cursor. With equal errors, advancing further is always preferable; with
/// different errors, both are worth exploring since further progress may be
/// cheaper at a slightly higher error count.
fn prune(states: Vec<SearchState>) -> Vec<SearchState> {
    use std::collections::HashMap;
    let mut best: HashMap<usize, SearchState> = HashMap::new();
    for state in states {
        match best.get(&state.errors) {
            Some(existing) if existing.cursor >= state.cursor => {}
            _ => {
                best.insert(state.errors, state);
            }
        }
    }
    best.into_values().collect()
}

/// Turn `page`'s fragments into a completed page appended to `pages`,
/// unless it would be empty or a lone BOM.
fn flush(pages: &[String], page: &[String]) -> Option<Vec<String>> {
    let page_text: String = page.concat();
    let mut chars = page_text.chars();
    let first = chars.next()?;
    if (first == BOM_BE || first == BOM_LE) && chars.next().is_none() {
        return None;
    }
    let mut out = pages.to_vec();
    out.push(page_text);
    Some(out)
}

fn extend_be(prepared: &PreparedText, state: &SearchState) -> Vec<SearchState> {
    let graphemes_be = &prepared.graphemes_be;
    let errors_be = &prepared.errors_be;
    let n = graphemes_be.len();

    let mut out = Vec::new();
    if state.cursor >= n {
        return out;
    }

    let mut page: Vec<String> = Vec::new();
    let mut total_len = 0usize;
    let mut errors = state.errors;
    let mut idx = state.cursor;

    loop {
        if errors_be[idx] {
            if let Some(pages) = flush(&state.pages, &page) {
                out.push(SearchState {
                    cursor: idx,
                    errors,
                    pages,
                });
            }
            errors += 1;
        }

        if page.is_empty()
            && matches!(graphemes_be[idx].chars().next(), Some(c) if c == BOM_LE || c == BOM_BE)
        {
            let prefixed = format!("{BOM_BE}{}", graphemes_be[idx]);
            total_len += prefixed.chars().count();
            page.push(prefixed);
        } else {
            total_len += graphemes_be[idx].chars().count();
            page.push(graphemes_be[idx].clone());
        }

        if idx + 1 >= n {
            if let Some(pages) = flush(&state.pages, &page) {
                out.push(SearchState {
                    cursor: idx + 1,
                    errors,
                    pages,
                });
            }
            break;
        } else if graphemes_be[idx + 1].chars().count() + total_len > PAGE {
            if let Some(pages) = flush(&state.pages, &page) {
                out.push(SearchState {
                    cursor: idx + 1,
                    errors,
                    pages,
                });
            }
            break;
        }
        idx += 1;
    }

    out
}

fn extend_le(prepared: &PreparedText, state: &SearchState) -> Vec<SearchState> {
    let graphemes_le = &prepared.graphemes_le;
    let errors_le = &prepared.errors_le;
    let n = graphemes_le.len();

    let mut out = Vec::new();
    if state.cursor >= n {
        return out;
    }

    let mut page: Vec<String> = vec![BOM_LE.to_string()];
    let mut total_len = 1usize;
    let mut errors = state.errors;
    let mut idx = state.cursor;

    loop {
        if errors_le[idx] {
            if let Some(pages) = flush(&state.pages, &page) {
                out.push(SearchState {
                    cursor: idx,
                    errors,
                    pages,
                });
            }
            errors += 1;
        }

        total_len += graphemes_le[idx].chars().count();
        page.push(graphemes_le[idx].clone());

        if idx + 1 >= n {
            if let Some(pages) = flush(&state.pages, &page) {
                out.push(SearchState {
                    cursor: idx + 1,
                    errors,
                    pages,
                });
            }
            break;
        } else if graphemes_le[idx + 1].chars().count() + total_len > PAGE {
            if let Some(pages) = flush(&state.pages, &page) {
                out.push(SearchState {
                    cursor: idx + 1,
                    errors,
                    pages,
                });
            }
            break;
        }
        idx += 1;
    }

    out
}
