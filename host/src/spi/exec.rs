//! Command execution: `cd` handled in-process, everything else through
//! `/bin/sh -c` so pipes, globs, and redirections behave as expected.

use std::process::Command;

use tracing::debug;

/// Run one submitted line. Returns the exit status for prompt coloring;
/// spawn failures and signal deaths report as status 1.
pub fn execute(line: &str) -> i32 {
    let line = line.trim();
    if line.is_empty() {
        return 0;
    }

    if let Some(rest) = strip_cd(line) {
        return change_dir(rest);
    }

    debug!(command = line, "spawning");
    match Command::new("/bin/sh").arg("-c").arg(line).status() {
        Ok(status) => status.code().unwrap_or(1),
        Err(e) => {
            eprintln!("lamsh: {e}");
            1
        }
    }
}

/// `cd` must run in this process or the directory change is lost with the
/// subshell.
fn strip_cd(line: &str) -> Option<&str> {
    if line == "cd" {
        return Some("");
    }
    line.strip_prefix("cd ").map(str::trim)
}

fn change_dir(arg: &str) -> i32 {
    let target = match arg {
        "" | "~" => dirs::home_dir(),
        _ if arg.starts_with("~/") => dirs::home_dir().map(|h| h.join(&arg[2..])),
        _ => Some(std::path::PathBuf::from(arg)),
    };

    let Some(target) = target else {
        eprintln!("lamsh: cd: cannot determine home directory");
        return 1;
    };

    match std::env::set_current_dir(&target) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("lamsh: cd: {}: {e}", target.display());
            1
        }
    }
}
