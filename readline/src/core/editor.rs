//! The key-event dispatcher and renderer.
//!
//! Reads one key event at a time in a strictly synchronous loop, applies its
//! editing command to the buffer (directly or through pairing, history, and
//! completion), and redraws the prompt line. Raw mode is held only for the
//! duration of [`LineEditor::read_line`] and restored unconditionally on the
//! way out, so subprocesses always see a cooked terminal.

use std::io::{self, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, ClearType},
};
use thiserror::Error;
use tracing::warn;

use super::buffer::LineBuffer;
use super::completion::{self, CompletionOutcome};
use super::config::ReadlineConfig;
use super::history::HistoryStore;
use super::validity::CommandIndex;
use crate::spi::{Clipboard, Completions};

/// Errors the editor can surface. Everything recoverable (capacity,
/// collaborator failures) is absorbed as a no-op before reaching here;
/// terminal failures are the one fatal case.
#[derive(Debug, Error)]
pub enum ReadlineError {
    #[error("terminal configuration failed: {0}")]
    Terminal(#[source] io::Error),
    #[error("terminal write failed: {0}")]
    Render(#[source] io::Error),
}

/// What a finished `read_line` call means for the host.
#[derive(Debug, PartialEq, Eq)]
pub enum EditorAction {
    /// A line was submitted with Enter.
    Submit(String),
    /// End of input: Ctrl-D on an empty buffer, or EOF on a pipe.
    Eof,
}

/// Control flow for key event handling.
enum ControlFlow {
    Continue,
    /// Ctrl-C: discard the buffer and start a fresh prompt line.
    Interrupt,
    /// Ctrl-L: wipe the screen before redrawing.
    ClearScreen,
    /// Tab produced multiple candidates to print above the redraw.
    ShowMenu(Vec<String>),
    Submit,
    Eof,
}

/// Line editor with electric pairing, mark/region kills, history recall,
/// completion, and command-validity coloring.
pub struct LineEditor {
    buffer: LineBuffer,
    config: ReadlineConfig,
    commands: CommandIndex,
    completions: Box<dyn Completions>,
    clipboard: Box<dyn Clipboard>,
}

impl LineEditor {
    pub fn new(
        config: ReadlineConfig,
        commands: CommandIndex,
        completions: Box<dyn Completions>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            buffer: LineBuffer::new(),
            config,
            commands,
            completions,
            clipboard,
        }
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Read one line. Interactive terminals get the raw-mode editor;
    /// anything else (pipes, tests) falls back to plain buffered reading.
    pub fn read_line(
        &mut self,
        prompt: &str,
        history: &mut HistoryStore,
    ) -> Result<EditorAction, ReadlineError> {
        if crossterm::tty::IsTty::is_tty(&io::stdin()) {
            terminal::enable_raw_mode().map_err(ReadlineError::Terminal)?;
            let result = self.read_line_raw(prompt, history);
            let _ = terminal::disable_raw_mode();
            result
        } else {
            self.read_line_simple(prompt)
        }
    }

    fn read_line_simple(&mut self, prompt: &str) -> Result<EditorAction, ReadlineError> {
        use std::io::BufRead;

        print!("{prompt}");
        io::stdout().flush().map_err(ReadlineError::Render)?;

        let mut line = String::new();
        let n = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(ReadlineError::Terminal)?;
        if n == 0 {
            return Ok(EditorAction::Eof);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(EditorAction::Submit(line))
    }

    fn read_line_raw(
        &mut self,
        prompt: &str,
        history: &mut HistoryStore,
    ) -> Result<EditorAction, ReadlineError> {
        self.buffer.clear();
        self.render(prompt)?;

        loop {
            let Event::Key(key) = event::read().map_err(ReadlineError::Terminal)? else {
                continue;
            };

            match self.handle_key(key, history) {
                ControlFlow::Continue => self.render(prompt)?,
                ControlFlow::Interrupt => {
                    print!("^C\r\n");
                    self.buffer.clear();
                    self.render(prompt)?;
                }
                ControlFlow::ClearScreen => {
                    let mut stdout = io::stdout();
                    queue!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))
                        .map_err(ReadlineError::Render)?;
                    self.render(prompt)?;
                }
                ControlFlow::ShowMenu(candidates) => {
                    self.show_menu(&candidates)?;
                    self.render(prompt)?;
                }
                ControlFlow::Submit => {
                    print!("\r\n");
                    io::stdout().flush().map_err(ReadlineError::Render)?;
                    return Ok(EditorAction::Submit(self.buffer.text().to_string()));
                }
                ControlFlow::Eof => {
                    print!("\r\n");
                    io::stdout().flush().map_err(ReadlineError::Render)?;
                    return Ok(EditorAction::Eof);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, history: &mut HistoryStore) -> ControlFlow {
        let pairs = self.config.electric_pairs;

        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => ControlFlow::Submit,

            (KeyCode::Char('c'), KeyModifiers::CONTROL) => ControlFlow::Interrupt,

            // Forward delete, or EOF when there is nothing left to edit.
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                if self.buffer.is_empty() {
                    ControlFlow::Eof
                } else {
                    self.buffer.delete_forward();
                    ControlFlow::Continue
                }
            }

            (KeyCode::Char('a'), KeyModifiers::CONTROL) | (KeyCode::Home, _) => {
                self.buffer.move_home();
                ControlFlow::Continue
            }

            (KeyCode::Char('e'), KeyModifiers::CONTROL) | (KeyCode::End, _) => {
                self.buffer.move_end();
                ControlFlow::Continue
            }

            (KeyCode::Char('b'), KeyModifiers::CONTROL) | (KeyCode::Left, _) => {
                self.buffer.move_left();
                ControlFlow::Continue
            }

            (KeyCode::Char('f'), KeyModifiers::CONTROL) | (KeyCode::Right, _) => {
                self.buffer.move_right();
                ControlFlow::Continue
            }

            // Ctrl-Space arrives as NUL on most terminals.
            (KeyCode::Char(' '), KeyModifiers::CONTROL) | (KeyCode::Null, _) => {
                self.buffer.set_mark();
                ControlFlow::Continue
            }

            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                let killed = self.buffer.kill_line();
                self.stage(&killed);
                ControlFlow::Continue
            }

            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if let Some(killed) = self.buffer.kill_region() {
                    self.stage(&killed);
                }
                ControlFlow::Continue
            }

            (KeyCode::Char('y'), KeyModifiers::CONTROL) => {
                match self.clipboard.read() {
                    Some(text) => self.buffer.yank(&text),
                    None => warn!("clipboard read failed, yank skipped"),
                }
                ControlFlow::Continue
            }

            (KeyCode::Char('l'), KeyModifiers::CONTROL) => ControlFlow::ClearScreen,

            (KeyCode::Char('p'), KeyModifiers::CONTROL) | (KeyCode::Up, _) => {
                history.navigate(&mut self.buffer, -1);
                ControlFlow::Continue
            }

            (KeyCode::Char('n'), KeyModifiers::CONTROL) | (KeyCode::Down, _) => {
                history.navigate(&mut self.buffer, 1);
                ControlFlow::Continue
            }

            (KeyCode::Backspace, _) | (KeyCode::Char('h'), KeyModifiers::CONTROL) => {
                self.buffer.delete_backward(pairs);
                ControlFlow::Continue
            }

            (KeyCode::Tab, _) => {
                if !self.config.enable_completion {
                    return ControlFlow::Continue;
                }
                match completion::handle_completion(&mut self.buffer, self.completions.as_ref()) {
                    CompletionOutcome::None | CompletionOutcome::Applied => ControlFlow::Continue,
                    CompletionOutcome::Menu(candidates) => ControlFlow::ShowMenu(candidates),
                }
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.buffer.insert(c, pairs);
                ControlFlow::Continue
            }

            // Everything else is ignored.
            _ => ControlFlow::Continue,
        }
    }

    /// Stage killed text on the clipboard; failure leaves the kill local.
    fn stage(&self, text: &str) {
        if !text.is_empty() && !self.clipboard.write(text) {
            warn!("clipboard write failed, killed text not staged");
        }
    }

    /// Redraw the prompt line: prompt, command token colored by validity,
    /// the rest of the buffer, cursor repositioned to `point`.
    fn render(&mut self, prompt: &str) -> Result<(), ReadlineError> {
        let mut stdout = io::stdout();

        queue!(
            stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(prompt),
        )
        .map_err(ReadlineError::Render)?;

        let token = if self.config.enable_highlighting {
            self.buffer.refresh_command_token(&self.commands)
        } else {
            None
        };
        match token {
            Some((cmd_len, valid)) => {
                let color = if valid {
                    self.config.colors.valid_ansi()
                } else {
                    self.config.colors.invalid_ansi()
                };
                let text = self.buffer.text();
                queue!(
                    stdout,
                    Print(color),
                    Print(&text[..cmd_len]),
                    Print("\x1b[0m"),
                    Print(&text[cmd_len..]),
                )
                .map_err(ReadlineError::Render)?;
            }
            None => {
                queue!(stdout, Print(self.buffer.text())).map_err(ReadlineError::Render)?;
            }
        }

        let cursor_col =
            visible_width(prompt) + self.buffer.text()[..self.buffer.point()].chars().count();
        queue!(stdout, cursor::MoveToColumn(cursor_col as u16)).map_err(ReadlineError::Render)?;

        stdout.flush().map_err(ReadlineError::Render)
    }

    /// Print the candidate menu in left-justified columns sized to the
    /// widest candidate, then let the caller redraw the prompt line.
    fn show_menu(&self, candidates: &[String]) -> Result<(), ReadlineError> {
        let term_width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        let (col_width, cols) = completion::menu_layout(candidates, term_width);

        let mut stdout = io::stdout();
        queue!(stdout, Print("\r\n")).map_err(ReadlineError::Render)?;
        for (i, candidate) in candidates.iter().enumerate() {
            queue!(stdout, Print(format!("{candidate:<col_width$}")))
                .map_err(ReadlineError::Render)?;
            if (i + 1) % cols == 0 {
                queue!(stdout, Print("\r\n")).map_err(ReadlineError::Render)?;
            }
        }
        if candidates.len() % cols != 0 {
            queue!(stdout, Print("\r\n")).map_err(ReadlineError::Render)?;
        }
        stdout.flush().map_err(ReadlineError::Render)
    }
}

impl Drop for LineEditor {
    fn drop(&mut self) {
        // Never leave the terminal in raw mode.
        let _ = terminal::disable_raw_mode();
    }
}

/// Visible width of a string with ANSI escape sequences stripped. Prompts
/// carry color codes that occupy no columns.
pub fn visible_width(s: &str) -> usize {
    let mut count = 0;
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.as_str().starts_with('[') {
                // CSI sequence: skip through the final letter.
                chars.next();
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                chars.next();
            }
        } else {
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::{NoClipboard, NoCompletions};
    use std::cell::RefCell;

    /// In-memory clipboard for exercising kill/yank staging.
    struct MemClipboard {
        content: RefCell<Option<String>>,
    }

    impl MemClipboard {
        fn new(initial: Option<&str>) -> Self {
            Self {
                content: RefCell::new(initial.map(String::from)),
            }
        }
    }

    impl Clipboard for MemClipboard {
        fn read(&self) -> Option<String> {
            self.content.borrow().clone()
        }

        fn write(&self, text: &str) -> bool {
            *self.content.borrow_mut() = Some(text.to_string());
            true
        }
    }

    struct FixedCompletions(Vec<&'static str>);

    impl Completions for FixedCompletions {
        fn provide(&self, _line: &str, _point: usize) -> Vec<String> {
            self.0.iter().map(|s| s.to_string()).collect()
        }
    }

    fn test_editor() -> LineEditor {
        LineEditor::new(
            ReadlineConfig::default(),
            CommandIndex::from_names(["ls", "pwd"]),
            Box::new(NoCompletions),
            Box::new(NoClipboard),
        )
    }

    fn press(editor: &mut LineEditor, history: &mut HistoryStore, code: KeyCode) -> ControlFlow {
        editor.handle_key(KeyEvent::new(code, KeyModifiers::NONE), history)
    }

    fn ctrl(editor: &mut LineEditor, history: &mut HistoryStore, c: char) -> ControlFlow {
        editor.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL), history)
    }

    fn type_str(editor: &mut LineEditor, history: &mut HistoryStore, s: &str) {
        for c in s.chars() {
            press(editor, history, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_and_submit() {
        let mut editor = test_editor();
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "ls -la");
        assert_eq!(editor.buffer.text(), "ls -la");
        assert_eq!(editor.buffer.point(), 6);

        let flow = press(&mut editor, &mut history, KeyCode::Enter);
        assert!(matches!(flow, ControlFlow::Submit));
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        let mut editor = test_editor();
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "half a com");
        let flow = ctrl(&mut editor, &mut history, 'c');
        assert!(matches!(flow, ControlFlow::Interrupt));
    }

    #[test]
    fn test_ctrl_d_eof_only_when_empty() {
        let mut editor = test_editor();
        let mut history = HistoryStore::default();

        assert!(matches!(ctrl(&mut editor, &mut history, 'd'), ControlFlow::Eof));

        type_str(&mut editor, &mut history, "ab");
        press(&mut editor, &mut history, KeyCode::Home);
        assert!(matches!(ctrl(&mut editor, &mut history, 'd'), ControlFlow::Continue));
        assert_eq!(editor.buffer.text(), "b");
    }

    #[test]
    fn test_movement_keys() {
        let mut editor = test_editor();
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "hello");
        ctrl(&mut editor, &mut history, 'a');
        assert_eq!(editor.buffer.point(), 0);
        ctrl(&mut editor, &mut history, 'f');
        assert_eq!(editor.buffer.point(), 1);
        ctrl(&mut editor, &mut history, 'e');
        assert_eq!(editor.buffer.point(), 5);
        ctrl(&mut editor, &mut history, 'b');
        assert_eq!(editor.buffer.point(), 4);
        press(&mut editor, &mut history, KeyCode::Left);
        assert_eq!(editor.buffer.point(), 3);
        press(&mut editor, &mut history, KeyCode::Right);
        assert_eq!(editor.buffer.point(), 4);
    }

    #[test]
    fn test_electric_pair_typing() {
        let mut editor = test_editor();
        let mut history = HistoryStore::default();

        press(&mut editor, &mut history, KeyCode::Char('('));
        assert_eq!(editor.buffer.text(), "()");
        assert_eq!(editor.buffer.point(), 1);

        press(&mut editor, &mut history, KeyCode::Char(')'));
        assert_eq!(editor.buffer.text(), "()");
        assert_eq!(editor.buffer.point(), 2);
    }

    #[test]
    fn test_backspace_collapses_pair() {
        let mut editor = test_editor();
        let mut history = HistoryStore::default();

        press(&mut editor, &mut history, KeyCode::Char('('));
        press(&mut editor, &mut history, KeyCode::Backspace);
        assert_eq!(editor.buffer.text(), "");
        assert_eq!(editor.buffer.point(), 0);
    }

    #[test]
    fn test_kill_line_stages_clipboard() {
        let mut editor = test_editor();
        editor.clipboard = Box::new(MemClipboard::new(None));
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "echo hello");
        ctrl(&mut editor, &mut history, 'a');
        ctrl(&mut editor, &mut history, 'k');
        assert_eq!(editor.buffer.text(), "");
        assert_eq!(editor.clipboard.read().as_deref(), Some("echo hello"));
    }

    #[test]
    fn test_kill_region_and_yank_round_trip() {
        let mut editor = test_editor();
        editor.clipboard = Box::new(MemClipboard::new(None));
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "abcdef");
        ctrl(&mut editor, &mut history, 'a');
        editor.handle_key(
            KeyEvent::new(KeyCode::Char(' '), KeyModifiers::CONTROL),
            &mut history,
        );
        ctrl(&mut editor, &mut history, 'f');
        ctrl(&mut editor, &mut history, 'f');
        ctrl(&mut editor, &mut history, 'f');
        ctrl(&mut editor, &mut history, 'w');
        assert_eq!(editor.buffer.text(), "def");
        assert_eq!(editor.buffer.point(), 0);

        ctrl(&mut editor, &mut history, 'y');
        assert_eq!(editor.buffer.text(), "abcdef");
        assert_eq!(editor.buffer.point(), 3);
    }

    #[test]
    fn test_yank_with_unavailable_clipboard_is_noop() {
        let mut editor = test_editor();
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "abc");
        ctrl(&mut editor, &mut history, 'y');
        assert_eq!(editor.buffer.text(), "abc");
    }

    #[test]
    fn test_history_recall_keys() {
        let mut editor = test_editor();
        let mut history = HistoryStore::default();
        history.add("ls");
        history.add("pwd");

        ctrl(&mut editor, &mut history, 'p');
        assert_eq!(editor.buffer.text(), "pwd");
        ctrl(&mut editor, &mut history, 'p');
        assert_eq!(editor.buffer.text(), "ls");
        // Oldest entry: another step back is a no-op.
        ctrl(&mut editor, &mut history, 'p');
        assert_eq!(editor.buffer.text(), "ls");

        press(&mut editor, &mut history, KeyCode::Down);
        assert_eq!(editor.buffer.text(), "pwd");
        press(&mut editor, &mut history, KeyCode::Down);
        assert_eq!(editor.buffer.text(), "");
    }

    #[test]
    fn test_tab_applies_single_candidate() {
        let mut editor = test_editor();
        editor.completions = Box::new(FixedCompletions(vec!["echo"]));
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "ec");
        let flow = press(&mut editor, &mut history, KeyCode::Tab);
        assert!(matches!(flow, ControlFlow::Continue));
        assert_eq!(editor.buffer.text(), "echo");
    }

    #[test]
    fn test_tab_with_many_candidates_menus() {
        let mut editor = test_editor();
        editor.completions = Box::new(FixedCompletions(vec!["foobar", "foobaz"]));
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "foo");
        let flow = press(&mut editor, &mut history, KeyCode::Tab);
        match flow {
            ControlFlow::ShowMenu(items) => assert_eq!(items.len(), 2),
            _ => panic!("expected menu"),
        }
        assert_eq!(editor.buffer.text(), "fooba");
    }

    #[test]
    fn test_tab_disabled_by_config() {
        let config = ReadlineConfig {
            enable_completion: false,
            ..ReadlineConfig::default()
        };
        let mut editor = LineEditor::new(
            config,
            CommandIndex::default(),
            Box::new(FixedCompletions(vec!["echo"])),
            Box::new(NoClipboard),
        );
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "ec");
        press(&mut editor, &mut history, KeyCode::Tab);
        assert_eq!(editor.buffer.text(), "ec");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut editor = test_editor();
        let mut history = HistoryStore::default();

        type_str(&mut editor, &mut history, "abc");
        press(&mut editor, &mut history, KeyCode::PageUp);
        editor.handle_key(
            KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT),
            &mut history,
        );
        assert_eq!(editor.buffer.text(), "abc");
    }

    #[test]
    fn test_visible_width_plain() {
        assert_eq!(visible_width("hello"), 5);
        assert_eq!(visible_width(""), 0);
    }

    #[test]
    fn test_visible_width_strips_ansi() {
        assert_eq!(visible_width("\x1b[1;32mhello\x1b[0m"), 5);
        assert_eq!(visible_width("\x1b[32muser@host\x1b[0m \x1b[34m~\x1b[0m λ "), 14);
    }
}
