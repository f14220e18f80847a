use crate::model::{Panel, RunMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Panel(usize),
    Missing,
}

/// A second panel that mapped onto an already occupied grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateCell {
    pub fraction: f64,
    pub replicate: u32,
    pub kept: usize,
    pub dropped: usize,
}

/// Reference row plus a complete fraction x replicate grid.
///
/// Panel indices refer to the slice passed to [`build_matrix`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMatrix {
    pub references: Vec<usize>,
    pub fractions: Vec<f64>,
    pub replicates: Vec<u32>,
    pub cells: Vec<Vec<Cell>>,
    pub duplicates: Vec<DuplicateCell>,
}

impl LayoutMatrix {
    pub fn n_rows(&self) -> usize {
        self.fractions.len()
    }

    pub fn n_cols(&self) -> usize {
        self.replicates.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Cell::Missing)
    }

    pub fn placeholder_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| matches!(c, Cell::Missing))
            .count()
    }

    /// Reference panels followed by every panel that owns a grid cell.
    /// Duplicates dropped from the grid are not included.
    pub fn drawn_panels<'a>(&'a self, panels: &'a [Panel]) -> impl Iterator<Item = &'a Panel> {
        let cell_panels = self.cells.iter().flatten().filter_map(|cell| match cell {
            Cell::Panel(idx) => Some(*idx),
            Cell::Missing => None,
        });
        self.references
            .iter()
            .copied()
            .chain(cell_panels)
            .filter_map(move |idx| panels.get(idx))
    }

    pub fn placeholders(&self) -> Vec<(f64, u32)> {
        let mut out = Vec::new();
        for (row, &fraction) in self.fractions.iter().enumerate() {
            for (col, &replicate) in self.replicates.iter().enumerate() {
                if self.cell(row, col) == Cell::Missing {
                    out.push((fraction, replicate));
                }
            }
        }
        out
    }
}

/// Axes are the union of the panels' and the grid's non-reference values, so a
/// run without any report still shows up as a placeholder.
pub fn build_matrix(panels: &[Panel], runs: &[RunMeta]) -> LayoutMatrix {
    let references = panels
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_reference)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    let mut fractions = Vec::new();
    let mut replicates = Vec::new();
    let axis_values = panels
        .iter()
        .filter(|p| !p.is_reference)
        .map(|p| (p.fraction, p.replicate))
        .chain(
            runs.iter()
                .filter(|r| !r.is_reference)
                .map(|r| (r.fraction, r.replicate)),
        );
    for (fraction, replicate) in axis_values {
        fractions.push(fraction);
        replicates.push(replicate);
    }
    fractions.sort_by(f64::total_cmp);
    fractions.dedup();
    replicates.sort_unstable();
    replicates.dedup();

    let mut cells = vec![vec![Cell::Missing; replicates.len()]; fractions.len()];
    let mut duplicates = Vec::new();
    for (idx, panel) in panels.iter().enumerate() {
        if panel.is_reference {
            continue;
        }
        let row = fractions.iter().position(|&f| f == panel.fraction);
        let col = replicates.iter().position(|&r| r == panel.replicate);
        let (Some(row), Some(col)) = (row, col) else {
            continue;
        };
        match cells[row][col] {
            Cell::Missing => cells[row][col] = Cell::Panel(idx),
            Cell::Panel(kept) => duplicates.push(DuplicateCell {
                fraction: panel.fraction,
                replicate: panel.replicate,
                kept,
                dropped: idx,
            }),
        }
    }

    LayoutMatrix {
        references,
        fractions,
        replicates,
        cells,
        duplicates,
    }
}
