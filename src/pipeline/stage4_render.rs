use std::fs;
use std::path::Path;

use crate::layout::{GlobalBounds, LayoutMatrix};
use crate::model::Panel;
use crate::pipeline::{GalleryConfig, GalleryError};
use crate::render::html::{HtmlOptions, render_html};
use crate::render::summary::{build_summary, render_summary_json};
use crate::render::svg::render_svg;
use crate::render::GALLERY_TITLE;

#[derive(Debug, Clone)]
pub struct Stage4Input<'a> {
    pub panels: &'a [Panel],
    pub bounds: &'a GlobalBounds,
    pub matrix: &'a LayoutMatrix,
    pub config: &'a GalleryConfig,
}

pub fn write_outputs(input: &Stage4Input<'_>) -> Result<(), GalleryError> {
    let options = HtmlOptions {
        title: GALLERY_TITLE.to_string(),
        report_name: input.config.report_name.clone(),
        plotly_src: input.config.plotly_src.clone(),
    };
    let html = render_html(input.panels, input.bounds, input.matrix, &options)?;
    write_text(&input.config.html_out, &html)?;
    tracing::info!(path = %input.config.html_out.display(), panels = input.panels.len(), "wrote interactive gallery");

    let svg = render_svg(input.panels, input.bounds, input.matrix, GALLERY_TITLE)?;
    write_text(&input.config.svg_out, &svg)?;
    tracing::info!(path = %input.config.svg_out.display(), "wrote static gallery");

    if let Some(path) = &input.config.summary_out {
        let summary = build_summary(input.panels, input.bounds, input.matrix);
        write_text(path, &render_summary_json(&summary)?)?;
        tracing::info!(path = %path.display(), "wrote gallery summary");
    }
    Ok(())
}

fn write_text(path: &Path, contents: &str) -> Result<(), GalleryError> {
    let wrap = |source| GalleryError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
    }
    fs::write(path, contents).map_err(wrap)
}
