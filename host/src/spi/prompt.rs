//! Prompt construction: `user@host cwd λ`, with the lambda colored by the
//! exit status of the previous command.

use std::path::PathBuf;

/// Build the prompt string for the next read. `last_status` of zero paints
/// the lambda green, anything else red.
pub fn build_prompt(last_status: i32) -> String {
    let user = std::env::var("USER").unwrap_or_else(|_| String::from("user"));
    let host = hostname();

    let cwd = std::env::current_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cwd = display_cwd(&cwd, dirs::home_dir().as_ref());

    let lambda = if last_status == 0 {
        "\x1b[1;32mλ\x1b[0m"
    } else {
        "\x1b[1;31mλ\x1b[0m"
    };

    format!("\x1b[32m{user}@{host}\x1b[0m \x1b[1;34m{cwd}\x1b[0m {lambda} ")
}

fn hostname() -> String {
    if let Ok(h) = std::env::var("HOSTNAME") {
        if !h.is_empty() {
            return h;
        }
    }
    std::fs::read_to_string("/etc/hostname")
        .map(|s| s.trim().to_string())
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| String::from("localhost"))
}

/// Shorten a CWD path by replacing the home directory prefix with `~`.
fn display_cwd(cwd: &str, home: Option<&PathBuf>) -> String {
    match home {
        Some(h) => {
            let home_str = h.to_string_lossy();
            if cwd == home_str.as_ref() {
                String::from("~")
            } else if cwd.starts_with(home_str.as_ref()) {
                let rest = &cwd[home_str.len()..];
                if rest.starts_with('/') {
                    format!("~{rest}")
                } else {
                    cwd.to_string()
                }
            } else {
                cwd.to_string()
            }
        }
        None => cwd.to_string(),
    }
}
