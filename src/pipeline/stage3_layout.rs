use crate::layout::{GlobalBounds, LayoutMatrix, build_matrix, compute_global_bounds};
use crate::model::{Panel, RunMeta};
use crate::pipeline::GalleryError;
use crate::render::format_fraction;

#[derive(Debug, Clone)]
pub struct Stage3Output {
    pub bounds: GlobalBounds,
    pub matrix: LayoutMatrix,
}

pub fn run_stage3(
    panels: &[Panel],
    runs: &[RunMeta],
    strict_duplicates: bool,
) -> Result<Stage3Output, GalleryError> {
    let matrix = build_matrix(panels, runs);
    let bounds = compute_global_bounds(matrix.drawn_panels(panels));
    debug_assert!(
        matrix
            .drawn_panels(panels)
            .flat_map(Panel::points)
            .all(|(x, y)| bounds.contains(x, y))
    );

    for dup in &matrix.duplicates {
        tracing::warn!(
            fraction = %format_fraction(dup.fraction),
            replicate = dup.replicate,
            kept = %panels[dup.kept].source_reference,
            dropped = %panels[dup.dropped].source_reference,
            "duplicate (fraction, replicate) cell; keeping first panel"
        );
    }
    if strict_duplicates {
        if let Some(first) = matrix.duplicates.first() {
            return Err(GalleryError::DuplicateCell {
                count: matrix.duplicates.len(),
                fraction: format_fraction(first.fraction),
                replicate: first.replicate,
            });
        }
    }

    tracing::info!(
        rows = matrix.n_rows(),
        cols = matrix.n_cols(),
        references = matrix.references.len(),
        placeholders = matrix.placeholder_count(),
        "layout computed"
    );
    Ok(Stage3Output { bounds, matrix })
}
