//! Session command history.
//!
//! A bounded, adjacent-deduplicated sequence of submitted lines plus a
//! navigation cursor. `current == len()` means the live edit buffer is in
//! view; lower positions show stored entries. Navigation writes straight
//! through the [`LineBuffer`].

use super::buffer::LineBuffer;

/// Default number of retained entries.
pub const HISTORY_MAX: usize = 1000;

#[derive(Debug)]
pub struct HistoryStore {
    entries: Vec<String>,
    capacity: usize,
    current: usize,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Record a submitted line. The oldest entry is evicted first when the
    /// store is full; the line is then appended unless it equals the most
    /// recent entry (adjacent dedup only). Either way the cursor returns to
    /// the live buffer. Empty lines are never recorded.
    pub fn add(&mut self, text: &str) {
        if text.is_empty() {
            self.current = self.entries.len();
            return;
        }

        if self.entries.len() >= self.capacity {
            self.entries.remove(0);
        }

        if self.entries.last().map(String::as_str) != Some(text) {
            self.entries.push(text.to_string());
        }

        self.current = self.entries.len();
    }

    /// Move the cursor by `direction` (-1 toward older, +1 toward newer) and
    /// load the entry at the new position into `line`. Position `len()`
    /// clears the buffer back to the live-edit state. Out-of-range moves
    /// leave both cursor and buffer untouched.
    pub fn navigate(&mut self, line: &mut LineBuffer, direction: i32) {
        let Some(new_pos) = self.current.checked_add_signed(direction as isize) else {
            return;
        };
        if new_pos > self.entries.len() {
            return;
        }

        if new_pos == self.entries.len() {
            line.clear();
        } else {
            line.set_text(&self.entries[new_pos]);
        }
        self.current = new_pos;
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(HISTORY_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut h = HistoryStore::new(10);
        h.add("ls");
        assert_eq!(h.len(), 1);
        assert_eq!(h.get(0), Some("ls"));
        assert_eq!(h.current(), 1);
    }

    #[test]
    fn test_adjacent_dedup() {
        let mut h = HistoryStore::new(10);
        h.add("ls");
        h.add("ls");
        h.add("pwd");
        assert_eq!(h.len(), 2);
        assert_eq!(h.get(0), Some("ls"));
        assert_eq!(h.get(1), Some("pwd"));
    }

    #[test]
    fn test_non_adjacent_duplicates_kept() {
        let mut h = HistoryStore::new(10);
        h.add("ls");
        h.add("pwd");
        h.add("ls");
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_eviction_at_capacity() {
        let mut h = HistoryStore::new(3);
        h.add("one");
        h.add("two");
        h.add("three");
        h.add("four");
        assert_eq!(h.len(), 3);
        assert_eq!(h.get(0), Some("two"));
        assert_eq!(h.get(2), Some("four"));
    }

    #[test]
    fn test_empty_line_not_recorded() {
        let mut h = HistoryStore::new(10);
        h.add("");
        assert_eq!(h.len(), 0);
    }

    #[test]
    fn test_navigate_bounds() {
        let mut h = HistoryStore::new(10);
        let mut line = LineBuffer::new();
        h.add("ls");
        h.add("pwd");
        assert_eq!(h.current(), 2);

        // Forward from the live buffer is a no-op.
        h.navigate(&mut line, 1);
        assert_eq!(h.current(), 2);
        assert_eq!(line.text(), "");

        h.navigate(&mut line, -1);
        assert_eq!(h.current(), 1);
        assert_eq!(line.text(), "pwd");

        h.navigate(&mut line, -1);
        assert_eq!(h.current(), 0);
        assert_eq!(line.text(), "ls");

        // Past the oldest is a no-op.
        h.navigate(&mut line, -1);
        assert_eq!(h.current(), 0);
        assert_eq!(line.text(), "ls");
    }

    #[test]
    fn test_navigate_back_to_live_clears_buffer() {
        let mut h = HistoryStore::new(10);
        let mut line = LineBuffer::new();
        h.add("ls");

        h.navigate(&mut line, -1);
        assert_eq!(line.text(), "ls");
        assert_eq!(line.point(), 2);

        h.navigate(&mut line, 1);
        assert_eq!(h.current(), 1);
        assert_eq!(line.text(), "");
        assert_eq!(line.point(), 0);
    }

    #[test]
    fn test_add_resets_cursor_even_on_dedup() {
        let mut h = HistoryStore::new(10);
        let mut line = LineBuffer::new();
        h.add("ls");
        h.navigate(&mut line, -1);
        assert_eq!(h.current(), 0);
        h.add("ls");
        assert_eq!(h.current(), 1);
    }
}
