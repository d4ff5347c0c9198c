//! Completion coordination.
//!
//! Queries the injected provider, bounds the candidate set, and either
//! applies a single candidate, applies the longest common prefix of many,
//! or reports that a candidate menu should be shown. Rendering the menu is
//! the dispatcher's job; the column layout math lives here as a pure
//! function.

use tracing::warn;

use super::buffer::LineBuffer;
use crate::spi::Completions;

/// Most candidates ever kept from one provider query.
pub const MAX_COMPLETIONS: usize = 1000;
/// Longest candidate accepted, in bytes.
pub const COMPLETION_MAX_LENGTH: usize = 256;

/// What the dispatcher must do after a completion request.
#[derive(Debug, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Nothing to do (no candidates).
    None,
    /// The buffer was updated; a plain redraw suffices.
    Applied,
    /// The buffer may have been updated with a common prefix; show this
    /// candidate menu, then redraw.
    Menu(Vec<String>),
}

/// Offset of the start of the word under the cursor: scans backward from
/// `point` while the preceding byte is not whitespace.
pub fn find_word_start(line: &str, point: usize) -> usize {
    let bytes = line.as_bytes();
    let mut i = point;
    while i > 0 && !bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    i
}

/// Longest common prefix of all candidates, compared character by
/// character, stopping at the first mismatch or the shortest candidate.
pub fn common_prefix(candidates: &[String]) -> String {
    let Some(first) = candidates.first() else {
        return String::new();
    };
    if candidates.len() == 1 {
        return first.clone();
    }

    // Accumulate whole characters only, so the slice below always lands on
    // a char boundary even when candidates diverge mid-character.
    let mut prefix_len = first.len();
    for other in &candidates[1..] {
        let mut len = 0;
        for (a, b) in first.chars().zip(other.chars()) {
            if a != b || len + a.len_utf8() > prefix_len {
                break;
            }
            len += a.len_utf8();
        }
        prefix_len = len;
    }
    first[..prefix_len].to_string()
}

/// Replace the token between the word start and `point` with `candidate`.
/// No-op when the result would overflow the buffer capacity.
pub fn apply_completion(line: &mut LineBuffer, candidate: &str) {
    let word_start = find_word_start(line.text(), line.point());
    let word_len = line.point() - word_start;

    if line.len() - word_len + candidate.len() >= line.capacity() - 1 {
        return;
    }

    line.replace_word(word_start, candidate);
}

/// Run one completion request against `provider`.
pub fn handle_completion(line: &mut LineBuffer, provider: &dyn Completions) -> CompletionOutcome {
    let mut candidates = provider.provide(line.text(), line.point());
    bound_candidates(&mut candidates);

    match candidates.len() {
        0 => CompletionOutcome::None,
        1 => {
            apply_completion(line, &candidates[0]);
            CompletionOutcome::Applied
        }
        _ => {
            let prefix = common_prefix(&candidates);
            if !prefix.is_empty() {
                apply_completion(line, &prefix);
            }
            CompletionOutcome::Menu(candidates)
        }
    }
}

/// Column geometry for the candidate menu: each column is as wide as the
/// longest candidate plus two, and as many columns fit the terminal as the
/// width allows (at least one).
pub fn menu_layout(candidates: &[String], terminal_width: usize) -> (usize, usize) {
    // Width is measured in characters so multi-byte candidates pad the
    // same as ASCII ones.
    let max_len = candidates
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0);
    let column_width = max_len + 2;
    let columns = (terminal_width / column_width).max(1);
    (column_width, columns)
}

/// Enforce the count and per-item length bounds in place.
fn bound_candidates(candidates: &mut Vec<String>) {
    let before = candidates.len();
    candidates.retain(|c| c.len() <= COMPLETION_MAX_LENGTH);
    candidates.truncate(MAX_COMPLETIONS);
    if candidates.len() < before {
        warn!(
            dropped = before - candidates.len(),
            "completion candidates over bounds were dropped"
        );
    }
}
