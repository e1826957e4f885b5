//! Environment check handler.

use std::path::Path;

use crate::config::ENV_API_KEY;

/// Build the environment report.
///
/// The key itself is never printed, only its first and last characters.
pub fn report<F>(dotenv_path: Option<&Path>, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let dotenv_line = dotenv_path.map_or_else(
        || ".env loaded: no".to_string(),
        |path| format!(".env loaded: yes ({})", path.display()),
    );

    let key_line = match lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty()) {
        Some(key) => format!("{ENV_API_KEY} = {}", redact(key.trim())),
        None => format!("{ENV_API_KEY} is not set"),
    };

    format!("{dotenv_line}\n{key_line}")
}

/// Execute the check-env command against the process environment.
pub fn execute(dotenv_path: Option<&Path>) {
    println!("{}", report(dotenv_path, |key| std::env::var(key).ok()));
}

fn redact(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
