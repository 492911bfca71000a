//! Text helpers shared by the extractors, the presentation layer and logging.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

static BLANK_LINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\r\n|\n|\r){2,}").expect("static regex is valid"));

/// Collapse every run of two or more line breaks into a single `\n` and trim.
///
/// This is how stored bodies are presented; the stored text itself keeps its
/// blank-line paragraph separators.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(collapse_blank_lines("a\n\n\nb\n"), "a\nb");
/// ```
pub fn collapse_blank_lines(body: &str) -> String {
    BLANK_LINE_RUNS.replace_all(body, "\n").trim().to_string()
}

/// Collapse internal whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Cuts on a character boundary and appends `"…(+N bytes)"` with the number
/// of bytes dropped.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Create the parent directory of `path` if it does not exist yet.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            debug!(parent = %parent.display(), "Parent directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}
