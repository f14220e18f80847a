use std::path::Path;

use crate::extract::{ReportPattern, extract};
use crate::input::{ReportLocation, relative_path, with_report_text};
use crate::model::{CategoryPalette, Panel, sort_panels};
use crate::pipeline::GalleryError;

/// Extracts one panel per discovered report; any failure aborts the run.
pub fn run_stage2(
    reports: &[ReportLocation],
    html_dir: &Path,
    pattern: &ReportPattern,
    palette: &CategoryPalette,
) -> Result<Vec<Panel>, GalleryError> {
    let mut panels = Vec::with_capacity(reports.len());
    for report in reports {
        let series = with_report_text(&report.path, |text| extract(text, pattern, palette))?
            .map_err(|source| GalleryError::Extract {
                path: report.path.clone(),
                source,
            })?;
        let panel = Panel::new(
            &report.run,
            &report.sublib_id,
            relative_path(&report.path, html_dir),
            series,
        );
        tracing::debug!(
            run_id = %panel.run_id,
            sublib = %panel.sublib_id,
            points = panel.point_count,
            categories = panel.series.len(),
            "extracted panel"
        );
        panels.push(panel);
    }

    sort_panels(&mut panels);
    Ok(panels)
}
