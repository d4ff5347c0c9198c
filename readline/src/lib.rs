#![forbid(unsafe_code)]

/// lamsh-readline: line editing, history, and completion for the lamsh shell.
///
/// # Architecture (SEA Pattern)
///
/// - `api/` — public types re-exported at crate root
/// - `core/` — implementations (buffer, pairing, history, validity, completion, editor, config)
/// - `spi/` — collaborator traits the host implements (completions, clipboard)
pub mod api;
pub mod core;
pub mod spi;

// Re-export the API surface at crate root for convenience.
pub use api::*;
