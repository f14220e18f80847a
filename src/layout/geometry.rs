//! Fixed-cell grid geometry and the point transform shared by the renderers.

use serde::Serialize;

use crate::layout::{Cell, GlobalBounds, LayoutMatrix};

pub const MARGIN: f64 = 24.0;
pub const TITLE_H: f64 = 40.0;
pub const LEGEND_H: f64 = 28.0;
pub const ROW_HEADER_W: f64 = 104.0;
pub const COL_HEADER_H: f64 = 28.0;
pub const CELL_W: f64 = 300.0;
pub const CELL_H: f64 = 344.0;
pub const CARD_GAP: f64 = 12.0;
pub const CARD_HEADER_H: f64 = 44.0;
pub const PLOT_PAD: f64 = 10.0;
/// Side of the square plot area inside each card.
pub const PLOT_SIZE: f64 = CELL_W - CARD_GAP - 2.0 * PLOT_PAD;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Plot area below the card header strip.
    pub fn plot_area(&self) -> Rect {
        Rect {
            x: self.x + PLOT_PAD,
            y: self.y + CARD_HEADER_H + PLOT_PAD,
            w: self.w - 2.0 * PLOT_PAD,
            h: self.h - CARD_HEADER_H - 2.0 * PLOT_PAD,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }
}

/// Uniform-scale affine map from data space into a plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotTransform {
    scale: f64,
    origin_x: f64,
    origin_y: f64,
    min_x: f64,
    max_y: f64,
}

impl PlotTransform {
    pub fn new(bounds: &GlobalBounds, rect: &Rect) -> Self {
        let span_x = bounds.span_x().max(f64::EPSILON);
        let span_y = bounds.span_y().max(f64::EPSILON);
        let scale = (rect.w / span_x).min(rect.h / span_y);
        Self {
            scale,
            origin_x: rect.x + (rect.w - span_x * scale) / 2.0,
            origin_y: rect.y + (rect.h - span_y * scale) / 2.0,
            min_x: bounds.min_x,
            max_y: bounds.max_y,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Screen y grows downward, so data y is flipped.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.origin_x + (x - self.min_x) * self.scale,
            self.origin_y + (self.max_y - y) * self.scale,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotContent {
    Reference(usize),
    Panel(usize),
    Missing { fraction: f64, replicate: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub card: Rect,
    pub content: SlotContent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowLabel {
    Reference,
    Fraction(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowHeader {
    pub y_center: f64,
    pub label: RowLabel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColHeader {
    pub x_center: f64,
    pub y_center: f64,
    pub replicate: u32,
}

/// Placement of every card and header in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    pub width: f64,
    pub height: f64,
    pub title_y: f64,
    pub legend_y: f64,
    pub slots: Vec<Slot>,
    pub row_headers: Vec<RowHeader>,
    pub col_headers: Vec<ColHeader>,
}

impl GridGeometry {
    pub fn new(matrix: &LayoutMatrix) -> Self {
        let n_cols = matrix.n_cols().max(matrix.references.len()).max(1);
        let width = 2.0 * MARGIN + ROW_HEADER_W + n_cols as f64 * CELL_W;

        let title_y = MARGIN;
        let legend_y = MARGIN + TITLE_H;
        let mut y = legend_y + LEGEND_H;
        let mut row = 0usize;

        let mut slots = Vec::new();
        let mut row_headers = Vec::new();
        let mut col_headers = Vec::new();

        if !matrix.references.is_empty() {
            for (col, &panel) in matrix.references.iter().enumerate() {
                slots.push(Slot {
                    row,
                    col,
                    card: card_rect(col, y),
                    content: SlotContent::Reference(panel),
                });
            }
            row_headers.push(RowHeader {
                y_center: y + CELL_H / 2.0,
                label: RowLabel::Reference,
            });
            y += CELL_H;
            row += 1;
        }

        if matrix.n_rows() > 0 && matrix.n_cols() > 0 {
            for (col, &replicate) in matrix.replicates.iter().enumerate() {
                col_headers.push(ColHeader {
                    x_center: MARGIN + ROW_HEADER_W + (col as f64 + 0.5) * CELL_W,
                    y_center: y + COL_HEADER_H / 2.0,
                    replicate,
                });
            }
            y += COL_HEADER_H;

            for (r, &fraction) in matrix.fractions.iter().enumerate() {
                for (col, &replicate) in matrix.replicates.iter().enumerate() {
                    let content = match matrix.cell(r, col) {
                        Cell::Panel(idx) => SlotContent::Panel(idx),
                        Cell::Missing => SlotContent::Missing {
                            fraction,
                            replicate,
                        },
                    };
                    slots.push(Slot {
                        row,
                        col,
                        card: card_rect(col, y),
                        content,
                    });
                }
                row_headers.push(RowHeader {
                    y_center: y + CELL_H / 2.0,
                    label: RowLabel::Fraction(fraction),
                });
                y += CELL_H;
                row += 1;
            }
        }

        Self {
            width,
            height: y + MARGIN,
            title_y,
            legend_y,
            slots,
            row_headers,
            col_headers,
        }
    }
}

fn card_rect(col: usize, row_top: f64) -> Rect {
    Rect {
        x: MARGIN + ROW_HEADER_W + col as f64 * CELL_W + CARD_GAP / 2.0,
        y: row_top + CARD_GAP / 2.0,
        w: CELL_W - CARD_GAP,
        h: CELL_H - CARD_GAP,
    }
}
