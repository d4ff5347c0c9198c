//! SPI: traits for the external collaborators the engine calls into.
//!
//! The engine has zero knowledge of how candidates are produced or where
//! clipboard text lives; hosts inject implementations of these traits.

/// Produces completion candidates for a `(line, cursor offset)` query.
///
/// Implementations may return an empty list; the engine bounds candidate
/// count and per-item length itself.
pub trait Completions {
    fn provide(&self, line: &str, point: usize) -> Vec<String>;
}

/// No-op provider for hosts without completion.
pub struct NoCompletions;

impl Completions for NoCompletions {
    fn provide(&self, _line: &str, _point: usize) -> Vec<String> {
        Vec::new()
    }
}

/// Read/write access to an external clipboard. Failures are represented,
/// not raised: the engine treats them as no-ops.
pub trait Clipboard {
    /// Current clipboard text, or `None` when unavailable.
    fn read(&self) -> Option<String>;
    /// Store `text`; returns false on failure.
    fn write(&self, text: &str) -> bool;
}

/// No-op clipboard: reads nothing, writes nowhere.
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn read(&self) -> Option<String> {
        None
    }

    fn write(&self, _text: &str) -> bool {
        false
    }
}
