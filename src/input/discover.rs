use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern, glob_with};

use crate::input::InputError;
use crate::model::RunMeta;

/// A report found under `runs_dir/<run_id>/<sublib>/<report_name>`, with the
/// grid row it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLocation {
    pub run: RunMeta,
    pub sublib_id: String,
    pub path: PathBuf,
}

pub fn discover_reports(
    runs_dir: &Path,
    runs: &[RunMeta],
    sublib_glob: &str,
    report_name: &str,
) -> Result<Vec<ReportLocation>, InputError> {
    if !runs_dir.is_dir() {
        return Err(InputError::MissingInput(format!(
            "runs directory not found: {}",
            runs_dir.display()
        )));
    }
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut out = Vec::new();
    for run in runs {
        let run_dir = runs_dir.join(&run.run_id);
        if !run_dir.is_dir() {
            tracing::debug!(run_id = %run.run_id, "run directory absent; skipping");
            continue;
        }
        let pattern = format!(
            "{}/{}/{}",
            Pattern::escape(&run_dir.to_string_lossy()),
            sublib_glob,
            Pattern::escape(report_name)
        );
        let paths = glob_with(&pattern, options).map_err(|e| InputError::Glob {
            pattern: sublib_glob.to_string(),
            message: e.to_string(),
        })?;

        let mut found = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| InputError::Io(e.into_error()))?;
            if !path.is_file() {
                continue;
            }
            let sublib_id = path
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            found.push(ReportLocation {
                run: run.clone(),
                sublib_id,
                path,
            });
        }
        found.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(run_id = %run.run_id, reports = found.len(), "discovered reports");
        out.extend(found);
    }
    Ok(out)
}
