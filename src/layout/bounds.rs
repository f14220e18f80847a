use serde::Serialize;

use crate::model::Panel;

/// Padding applied on each side, as a fraction of the square span.
pub const BOUNDS_PAD_FRACTION: f64 = 0.04;
pub const MIN_SPAN: f64 = 1.0;

/// Square window shared by every panel so point clouds are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl GlobalBounds {
    pub fn unit() -> Self {
        Self {
            min_x: 0.0,
            max_x: 1.0,
            min_y: 0.0,
            max_y: 1.0,
        }
    }

    pub fn span_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn span_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }
}

/// Bounds over the given panels; pass only the panels that will be drawn.
pub fn compute_global_bounds<'a>(panels: impl IntoIterator<Item = &'a Panel>) -> GlobalBounds {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut any = false;

    for (x, y) in panels.into_iter().flat_map(Panel::points) {
        any = true;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if !any {
        return GlobalBounds::unit();
    }

    let span = (max_x - min_x).max(max_y - min_y).max(MIN_SPAN);
    let half = span / 2.0 + span * BOUNDS_PAD_FRACTION;
    let cx = (min_x + max_x) / 2.0;
    let cy = (min_y + max_y) / 2.0;

    GlobalBounds {
        min_x: cx - half,
        max_x: cx + half,
        min_y: cy - half,
        max_y: cy + half,
    }
}
