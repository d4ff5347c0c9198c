//! System clipboard access through `xclip`. Absence of the binary (or a
//! display) degrades to no-op reads and writes; the editor keeps working.

use std::io::Write;
use std::process::{Command, Stdio};

use lamsh_readline::Clipboard;
use tracing::debug;

pub struct XClipboard;

impl Clipboard for XClipboard {
    fn read(&self) -> Option<String> {
        let output = Command::new("xclip")
            .args(["-selection", "clipboard", "-o"])
            .stderr(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8(output.stdout).ok()
    }

    fn write(&self, text: &str) -> bool {
        let child = Command::new("xclip")
            .args(["-selection", "clipboard"])
            .stdin(Stdio::piped())
            .stderr(Stdio::null())
            .spawn();

        let Ok(mut child) = child else {
            debug!("xclip not available, clipboard write skipped");
            return false;
        };

        let wrote = child
            .stdin
            .take()
            .and_then(|mut stdin| stdin.write_all(text.as_bytes()).ok())
            .is_some();

        matches!(child.wait(), Ok(status) if status.success()) && wrote
    }
}
