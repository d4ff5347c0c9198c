//! Completion candidates from bash's programmable completion machinery.
//!
//! The query runs a short bash script with `COMP_LINE`/`COMP_POINT` set the
//! way bash itself would for the line under edit. Commands with a registered
//! completion spec go through it; everything else falls back to
//! `compgen -o default` on the current word.

use std::process::{Command, Stdio};

use lamsh_readline::{find_word_start, Completions};
use tracing::debug;

const COMPLETION_SCRIPT: &str = r#"
line="$COMP_LINE"
point="$COMP_POINT"
word="$1"
cmd="${line%% *}"
if [ -n "$cmd" ] && [ "$cmd" != "$line" ]; then
    if ! complete -p "$cmd" 2>/dev/null >/dev/null; then
        _completion_loader "$cmd" 2>/dev/null
    fi
    spec=$(complete -p "$cmd" 2>/dev/null)
fi
if [ -n "$spec" ]; then
    COMP_WORDS=($line)
    COMP_CWORD=$((${#COMP_WORDS[@]} - 1))
    case "$line" in *" ") COMP_WORDS+=(""); COMP_CWORD=$((COMP_CWORD + 1));; esac
    fn="${spec##* -F }"; fn="${fn%% *}"
    if [ "$fn" != "$spec" ]; then
        "$fn" "$cmd" "$word" "${COMP_WORDS[$((COMP_CWORD - 1))]}" 2>/dev/null
        printf '%s\n' "${COMPREPLY[@]}"
        exit 0
    fi
fi
compgen -o default -- "$word"
"#;

pub struct BashCompletions;

impl Completions for BashCompletions {
    fn provide(&self, line: &str, point: usize) -> Vec<String> {
        let word = &line[find_word_start(line, point)..point];

        let output = Command::new("bash")
            .args(["-c", COMPLETION_SCRIPT, "lamsh-complete", word])
            .env("COMP_LINE", line)
            .env("COMP_POINT", point.to_string())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        let Ok(output) = output else {
            debug!("bash not available, no completions");
            return Vec::new();
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut candidates: Vec<String> = stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        candidates.sort();
        candidates.dedup();
        candidates
    }
}
