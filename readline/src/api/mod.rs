/// L2 API: Public types and traits for the readline crate.
///
/// Re-exports the main user-facing types from the core layer.
pub use crate::core::buffer::{LineBuffer, LINE_MAX};
pub use crate::core::completion::{
    common_prefix, find_word_start, menu_layout, CompletionOutcome, COMPLETION_MAX_LENGTH,
    MAX_COMPLETIONS,
};
pub use crate::core::config::{ColorConfig, ReadlineConfig};
pub use crate::core::editor::{visible_width, EditorAction, LineEditor, ReadlineError};
pub use crate::core::history::{HistoryStore, HISTORY_MAX};
pub use crate::core::validity::CommandIndex;
pub use crate::spi::{Clipboard, Completions, NoClipboard, NoCompletions};
