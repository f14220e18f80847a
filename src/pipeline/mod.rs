pub mod stage1_discover;
pub mod stage2_extract;
pub mod stage3_layout;
pub mod stage4_render;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::extract::{ExtractError, ReportPattern};
use crate::input::InputError;
use crate::model::CategoryPalette;
use crate::render::html::HtmlError;

use stage1_discover::run_stage1;
use stage2_extract::run_stage2;
use stage3_layout::run_stage3;
use stage4_render::{Stage4Input, write_outputs};

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("{}: {source}", path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
    #[error("no reports found for pattern {pattern} under {}", runs_dir.display())]
    EmptyResult { pattern: String, runs_dir: PathBuf },
    #[error("{count} duplicate (fraction, replicate) cell(s); first: fraction={fraction} replicate={replicate}")]
    DuplicateCell {
        count: usize,
        fraction: String,
        replicate: u32,
    },
    #[error("rendering failed: {0}")]
    Render(String),
    #[error("IO error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<HtmlError> for GalleryError {
    fn from(value: HtmlError) -> Self {
        GalleryError::Render(value.to_string())
    }
}

impl From<std::fmt::Error> for GalleryError {
    fn from(value: std::fmt::Error) -> Self {
        GalleryError::Render(value.to_string())
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(value: serde_json::Error) -> Self {
        GalleryError::Render(value.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub grid_path: PathBuf,
    pub runs_dir: PathBuf,
    pub html_out: PathBuf,
    pub svg_out: PathBuf,
    pub summary_out: Option<PathBuf>,
    pub report_name: String,
    pub sublib_glob: String,
    pub pattern: ReportPattern,
    pub palette: CategoryPalette,
    pub plotly_src: String,
    pub strict_duplicates: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryOutcome {
    pub panels: usize,
    pub reference_panels: usize,
    pub placeholders: usize,
    pub duplicates: usize,
}

pub fn run_gallery(config: &GalleryConfig) -> Result<GalleryOutcome, GalleryError> {
    let stage1 = run_stage1(config)?;
    let html_dir = output_dir(&config.html_out);
    let panels = run_stage2(
        &stage1.reports,
        &html_dir,
        &config.pattern,
        &config.palette,
    )?;
    let stage3 = run_stage3(&panels, &stage1.runs, config.strict_duplicates)?;

    write_outputs(&Stage4Input {
        panels: &panels,
        bounds: &stage3.bounds,
        matrix: &stage3.matrix,
        config,
    })?;

    Ok(GalleryOutcome {
        panels: panels.len(),
        reference_panels: stage3.matrix.references.len(),
        placeholders: stage3.matrix.placeholder_count(),
        duplicates: stage3.matrix.duplicates.len(),
    })
}

fn output_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/tests.rs"]
mod tests;
