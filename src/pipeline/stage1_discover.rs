use crate::input::{ReportLocation, discover_reports, load_grid};
use crate::model::RunMeta;
use crate::pipeline::{GalleryConfig, GalleryError};

#[derive(Debug, Clone)]
pub struct Stage1Output {
    pub runs: Vec<RunMeta>,
    pub reports: Vec<ReportLocation>,
}

pub fn run_stage1(config: &GalleryConfig) -> Result<Stage1Output, GalleryError> {
    let runs = load_grid(&config.grid_path)?;
    tracing::info!(
        grid = %config.grid_path.display(),
        runs = runs.len(),
        "loaded run grid"
    );

    let reports = discover_reports(
        &config.runs_dir,
        &runs,
        &config.sublib_glob,
        &config.report_name,
    )?;
    if reports.is_empty() {
        return Err(GalleryError::EmptyResult {
            pattern: format!("{}/{}", config.sublib_glob, config.report_name),
            runs_dir: config.runs_dir.clone(),
        });
    }
    tracing::info!(reports = reports.len(), "discovered reports");

    Ok(Stage1Output { runs, reports })
}
