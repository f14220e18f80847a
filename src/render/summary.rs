use std::collections::BTreeMap;

use serde::Serialize;

use crate::layout::{GlobalBounds, LayoutMatrix};
use crate::model::Panel;
use crate::render::format_fraction;

#[derive(Debug, Serialize)]
pub struct GallerySummary<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub n_panels: usize,
    pub n_reference_panels: usize,
    pub fractions: Vec<String>,
    pub replicates: Vec<u32>,
    pub placeholders: Vec<CellRef>,
    pub duplicates: Vec<DuplicateRef<'a>>,
    pub bounds: &'a GlobalBounds,
    pub panels: Vec<PanelSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CellRef {
    pub fraction: String,
    pub replicate: u32,
}

#[derive(Debug, Serialize)]
pub struct DuplicateRef<'a> {
    pub fraction: String,
    pub replicate: u32,
    pub kept: &'a str,
    pub dropped: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PanelSummary<'a> {
    pub run_id: &'a str,
    pub sublib: &'a str,
    pub fraction: f64,
    pub replicate: u32,
    pub is_reference: bool,
    pub src: &'a str,
    pub point_count: usize,
    pub points_by_category: BTreeMap<&'a str, usize>,
}

pub fn build_summary<'a>(
    panels: &'a [Panel],
    bounds: &'a GlobalBounds,
    matrix: &LayoutMatrix,
) -> GallerySummary<'a> {
    let source_of = |idx: usize| panels.get(idx).map(|p| p.source_reference.as_str()).unwrap_or("");
    GallerySummary {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        n_panels: panels.len(),
        n_reference_panels: matrix.references.len(),
        fractions: matrix.fractions.iter().map(|&f| format_fraction(f)).collect(),
        replicates: matrix.replicates.clone(),
        placeholders: matrix
            .placeholders()
            .into_iter()
            .map(|(f, r)| CellRef {
                fraction: format_fraction(f),
                replicate: r,
            })
            .collect(),
        duplicates: matrix
            .duplicates
            .iter()
            .map(|d| DuplicateRef {
                fraction: format_fraction(d.fraction),
                replicate: d.replicate,
                kept: source_of(d.kept),
                dropped: source_of(d.dropped),
            })
            .collect(),
        bounds,
        panels: panels
            .iter()
            .map(|p| {
                let mut points_by_category = BTreeMap::new();
                for s in &p.series {
                    *points_by_category.entry(s.category_id.as_str()).or_insert(0) += s.points.len();
                }
                PanelSummary {
                    run_id: &p.run_id,
                    sublib: &p.sublib_id,
                    fraction: p.fraction,
                    replicate: p.replicate,
                    is_reference: p.is_reference,
                    src: &p.source_reference,
                    point_count: p.point_count,
                    points_by_category,
                }
            })
            .collect(),
    }
}

pub fn render_summary_json(summary: &GallerySummary<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}
