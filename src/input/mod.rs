use std::path::{Component, Path, PathBuf};

use thiserror::Error;

pub mod discover;
pub mod grid;
pub mod reader;

pub use discover::{ReportLocation, discover_reports};
pub use grid::{load_grid, write_default_grid};
pub use reader::{open_maybe_gz, with_report_text};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid sublibrary pattern {pattern:?}: {message}")]
    Glob { pattern: String, message: String },
}

/// Lexical relative path from `base_dir` to `target`, `/`-separated.
///
/// Symlinks are not resolved so links stay under the run tree as written.
pub fn relative_path(target: &Path, base_dir: &Path) -> String {
    let target = absolute_lexical(target);
    let base = absolute_lexical(base_dir);

    let target_parts: Vec<Component<'_>> = target.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        parts.push("..".to_string());
    }
    for part in &target_parts[common..] {
        parts.push(part.as_os_str().to_string_lossy().into_owned());
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

fn absolute_lexical(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
