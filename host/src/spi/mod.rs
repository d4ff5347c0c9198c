/// SPI: host-side collaborators wired into the readline engine.
pub mod clipboard;
pub mod completions;
pub mod exec;
pub mod prompt;
