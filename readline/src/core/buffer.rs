//! The editable line buffer.
//!
//! Owns the text being edited, the cursor (`point`), the selection anchor
//! (`mark`), and a memoized command-token validity pair used by the renderer.
//! Every mutating operation keeps the invariant
//! `point <= len <= capacity - 1`; operations that would violate it are
//! silent no-ops, never errors.

use super::pairing;
use super::validity::CommandIndex;

/// Fixed buffer capacity in bytes. One byte of headroom is always kept, so
/// usable content is `LINE_MAX - 1` bytes.
pub const LINE_MAX: usize = 4096;

/// Mutable single-line text with cursor and selection anchor.
#[derive(Debug)]
pub struct LineBuffer {
    buf: String,
    capacity: usize,
    point: usize,
    mark: Option<usize>,
    /// Memoized `(first token, is valid command)`; refreshed on redraw only
    /// when the token text changed.
    cached_command: Option<(String, bool)>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::with_capacity(LINE_MAX)
    }

    /// A buffer with a custom capacity. Mostly useful in tests; capacities
    /// below 2 leave no usable room.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::new(),
            capacity,
            point: 0,
            mark: None,
            cached_command: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn point(&self) -> usize {
        self.point
    }

    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert a character at `point`, with electric pairing applied when
    /// `electric_pairs` is set.
    ///
    /// Closer handling runs first regardless of the pairing flag, as in the
    /// original engine: typing a closer that already sits at `point` skips
    /// over it, and a closer with a matching unclosed opener earlier in the
    /// buffer jumps just past the located closing position. Otherwise the
    /// character is inserted, and an opener additionally auto-inserts its
    /// matching closer after `point` (skipped for quotes already inside an
    /// open quoted span).
    pub fn insert(&mut self, c: char, electric_pairs: bool) {
        if self.buf.len() >= self.capacity.saturating_sub(1) {
            return;
        }

        if pairing::is_closing_delimiter(c) {
            if self.buf[self.point..].chars().next() == Some(c) {
                self.point += c.len_utf8();
                return;
            }
            if let Some(closer) = pairing::find_next_closing_delimiter(&self.buf, self.point, c) {
                self.point = closer + 1;
                return;
            }
        }

        self.buf.insert(self.point, c);
        self.point += c.len_utf8();

        if electric_pairs && pairing::is_opening_delimiter(c) {
            if (c == '"' || c == '\'')
                && pairing::quote_parity_odd(&self.buf, self.point - c.len_utf8(), c)
            {
                return;
            }
            if let Some(m) = pairing::matching_char(c) {
                // Headroom check again: the pair must not push past capacity.
                if self.buf.len() < self.capacity.saturating_sub(1) {
                    self.buf.insert(self.point, m);
                }
            }
        }
    }

    /// Delete the character at `point`. No-op at end of buffer.
    pub fn delete_forward(&mut self) {
        if self.point < self.buf.len() {
            self.buf.remove(self.point);
        }
    }

    /// Delete the character before `point`. When pairing is enabled and the
    /// boundary sits inside an adjacent empty pair (opener at `point - 1`,
    /// its exact match at `point`), both characters go in one step.
    pub fn delete_backward(&mut self, electric_pairs: bool) {
        let Some(prev) = self.buf[..self.point].chars().next_back() else {
            return;
        };
        let start = self.point - prev.len_utf8();

        let next = self.buf[self.point..].chars().next();
        if electric_pairs
            && pairing::is_opening_delimiter(prev)
            && next.is_some_and(|n| pairing::is_matching_pair(prev, n))
        {
            self.buf.remove(start);
            // The closer shifted down to `start`.
            self.buf.remove(start);
            self.point = start;
            return;
        }

        self.buf.remove(start);
        self.point = start;
    }

    /// Anchor the region at the current cursor position.
    pub fn set_mark(&mut self) {
        self.mark = Some(self.point);
    }

    /// Delete from `point` to end of buffer, returning the removed text.
    pub fn kill_line(&mut self) -> String {
        self.buf.split_off(self.point)
    }

    /// Delete the region between `mark` and `point`, returning the removed
    /// text. An unset mark anchors at offset 0. `point` moves to the region
    /// start and the mark is cleared. No-op when the region is empty.
    pub fn kill_region(&mut self) -> Option<String> {
        let mark = self.mark.unwrap_or(0).min(self.buf.len());
        if mark == self.point {
            return None;
        }

        let start = self.point.min(mark);
        let end = self.point.max(mark);
        let removed = self.buf[start..end].to_string();
        self.buf.replace_range(start..end, "");
        self.point = start;
        self.mark = None;
        Some(removed)
    }

    /// Insert `text` at `point`, truncated to the remaining capacity. No-op
    /// when nothing fits.
    pub fn yank(&mut self, text: &str) {
        let room = self.capacity.saturating_sub(1).saturating_sub(self.buf.len());
        let take = clamp_to_boundary(text, room);
        if take == 0 {
            return;
        }

        self.buf.insert_str(self.point, &text[..take]);
        self.point += take;
    }

    /// Replace the whole content (history recall), truncating at capacity.
    /// `point` lands at the end of the new text; a mark past the new end is
    /// pulled back to it.
    pub fn set_text(&mut self, text: &str) {
        let take = clamp_to_boundary(text, self.capacity.saturating_sub(1));
        self.buf.clear();
        self.buf.push_str(&text[..take]);
        self.point = self.buf.len();
        self.mark = self.mark.map(|m| m.min(self.buf.len()));
    }

    /// Replace the span `[word_start, point)` with `text`, leaving `point`
    /// just past the replacement. Capacity is the caller's concern.
    pub(crate) fn replace_word(&mut self, word_start: usize, text: &str) {
        let point = self.point;
        self.buf.replace_range(word_start..point, text);
        self.point = word_start + text.len();
    }

    /// Reset to the empty live-edit state.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.point = 0;
        self.mark = None;
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.buf[..self.point].chars().next_back() {
            self.point -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.buf[self.point..].chars().next() {
            self.point += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.point = 0;
    }

    pub fn move_end(&mut self) {
        self.point = self.buf.len();
    }

    /// The byte length of the first whitespace-delimited token, and whether
    /// the validity cache knows it. Recomputes only when the token changed
    /// since the previous call. `None` on an empty buffer.
    pub fn refresh_command_token(&mut self, commands: &CommandIndex) -> Option<(usize, bool)> {
        if self.buf.is_empty() {
            return None;
        }

        let cmd_len = self.buf.find(' ').unwrap_or(self.buf.len());
        let token = &self.buf[..cmd_len];

        let stale = self
            .cached_command
            .as_ref()
            .is_none_or(|(cached, _)| cached != token);
        if stale {
            let valid = commands.contains(token);
            self.cached_command = Some((token.to_string(), valid));
        }

        let valid = self.cached_command.as_ref().map(|(_, v)| *v)?;
        Some((cmd_len, valid))
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest prefix of `text` that fits in `room` bytes without splitting a
/// character.
fn clamp_to_boundary(text: &str, room: usize) -> usize {
    if text.len() <= room {
        return text.len();
    }
    let mut end = room;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}
