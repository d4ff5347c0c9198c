mod spi;

use anyhow::Result;
use lamsh_readline::{CommandIndex, EditorAction, HistoryStore, LineEditor, ReadlineConfig};
use tracing::debug;
use tracing_subscriber::prelude::*;

fn init_tracing() {
    // Honors RUST_LOG for filtering; default is warnings only.
    // Set LAMSH_LOG_FORMAT=json for JSON output to stderr.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let use_json = std::env::var("LAMSH_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

enum Submission<'a> {
    /// Blank line: nothing to run or record.
    Skip,
    Exit,
    Run(&'a str),
}

fn classify(line: &str) -> Submission<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Submission::Skip
    } else if trimmed == "exit" {
        Submission::Exit
    } else {
        Submission::Run(trimmed)
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config = ReadlineConfig::load("lamsh");
    let commands = CommandIndex::from_path_env();
    debug!(commands = commands.len(), "command index built");

    let mut history = HistoryStore::new(config.max_history_size);
    let mut editor = LineEditor::new(
        config,
        commands,
        Box::new(spi::completions::BashCompletions),
        Box::new(spi::clipboard::XClipboard),
    );

    let mut last_status = 0;
    loop {
        let prompt = spi::prompt::build_prompt(last_status);
        match editor.read_line(&prompt, &mut history)? {
            EditorAction::Eof => break,
            EditorAction::Submit(line) => match classify(&line) {
                Submission::Skip => continue,
                Submission::Exit => break,
                Submission::Run(cmd) => {
                    // History keeps the line verbatim; execution sees it
                    // trimmed.
                    history.add(&line);
                    last_status = spi::exec::execute(cmd);
                }
            },
        }
    }

    Ok(())
}
