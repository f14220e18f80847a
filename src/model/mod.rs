pub mod palette;

use std::cmp::Ordering;

pub use palette::CategoryPalette;

/// One row of the subsampling grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMeta {
    pub run_id: String,
    pub fraction: f64,
    pub replicate: u32,
    pub seed: Option<u64>,
    pub is_reference: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    pub category_id: String,
    pub display_name: String,
    pub color: String,
    pub points: Vec<(f64, f64)>,
}

/// Extracted point data for one (run, sublibrary) report.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub run_id: String,
    pub sublib_id: String,
    pub fraction: f64,
    pub replicate: u32,
    pub is_reference: bool,
    pub source_reference: String,
    pub series: Vec<PointSeries>,
    pub point_count: usize,
}

impl Panel {
    pub fn new(
        meta: &RunMeta,
        sublib_id: &str,
        source_reference: String,
        series: Vec<PointSeries>,
    ) -> Self {
        let point_count = series.iter().map(|s| s.points.len()).sum();
        Self {
            run_id: meta.run_id.clone(),
            sublib_id: sublib_id.to_string(),
            fraction: meta.fraction,
            replicate: meta.replicate,
            is_reference: meta.is_reference,
            source_reference,
            series,
            point_count,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.series.iter().flat_map(|s| s.points.iter().copied())
    }
}

/// Reference first, then fraction, replicate and sublibrary id.
pub fn panel_order(a: &Panel, b: &Panel) -> Ordering {
    b.is_reference
        .cmp(&a.is_reference)
        .then_with(|| a.fraction.total_cmp(&b.fraction))
        .then_with(|| a.replicate.cmp(&b.replicate))
        .then_with(|| a.sublib_id.cmp(&b.sublib_id))
}

pub fn sort_panels(panels: &mut [Panel]) {
    panels.sort_by(panel_order);
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/mod.rs"]
mod tests;
