//! Pulls the embedded UMAP arrays out of a split-pipe summary report.
//!
//! The report generator writes each array as a single line of the form
//! `const <name> = <decodeFn>('<payload>');` with `\'` escaping quotes inside
//! the payload.

use std::collections::HashMap;

use thiserror::Error;

use crate::codec::{DecodeError, decode_labels, decode_numeric};
use crate::model::{CategoryPalette, PointSeries};

pub const NUMERIC_DECODE_FN: &str = "decodeFloats";
pub const LABEL_DECODE_FN: &str = "decodeLabels";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("embedded assignment `{name}` not found in report")]
    MissingAssignment { name: String },
    #[error("failed to decode `{name}`: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
    #[error("decoded lengths disagree: x={x}, y={y}, labels={labels}")]
    LengthMismatch { x: usize, y: usize, labels: usize },
}

/// Variable and decoder names the report generator uses for the three arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPattern {
    pub x_var: String,
    pub y_var: String,
    pub label_var: String,
    pub numeric_fn: String,
    pub label_fn: String,
}

impl Default for ReportPattern {
    fn default() -> Self {
        Self {
            x_var: "umapX".to_string(),
            y_var: "umapY".to_string(),
            label_var: "umapSamples".to_string(),
            numeric_fn: NUMERIC_DECODE_FN.to_string(),
            label_fn: LABEL_DECODE_FN.to_string(),
        }
    }
}

pub fn extract(
    report: &str,
    pattern: &ReportPattern,
    palette: &CategoryPalette,
) -> Result<Vec<PointSeries>, ExtractError> {
    let x_payload = find_assignment(report, &pattern.x_var, &pattern.numeric_fn)?;
    let y_payload = find_assignment(report, &pattern.y_var, &pattern.numeric_fn)?;
    let label_payload = find_assignment(report, &pattern.label_var, &pattern.label_fn)?;

    let xs = decode_numeric(&x_payload).map_err(|source| ExtractError::Decode {
        name: pattern.x_var.clone(),
        source,
    })?;
    let ys = decode_numeric(&y_payload).map_err(|source| ExtractError::Decode {
        name: pattern.y_var.clone(),
        source,
    })?;
    let labels = decode_labels(&label_payload);

    if xs.len() != ys.len() || xs.len() != labels.len() {
        return Err(ExtractError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
            labels: labels.len(),
        });
    }

    Ok(group_series(&xs, &ys, labels, palette))
}

/// Returns the unescaped payload of `const <name> = <decode_fn>('...');`.
pub fn find_assignment(report: &str, name: &str, decode_fn: &str) -> Result<String, ExtractError> {
    let needle = format!("const {name} = {decode_fn}('");
    let mut search_from = 0usize;
    while let Some(pos) = report[search_from..].find(&needle) {
        let start = search_from + pos;
        let preceded_by_ident = report[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
        let body = start + needle.len();
        if !preceded_by_ident {
            if let Some(payload) = read_payload(&report[body..]) {
                return Ok(payload);
            }
        }
        search_from = body;
    }
    Err(ExtractError::MissingAssignment {
        name: name.to_string(),
    })
}

// Reads up to the closing `');`, undoing `\'` and `\\` escapes.
fn read_payload(rest: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = rest.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, '\'')) => out.push('\''),
                Some((_, '\\')) => out.push('\\'),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return None,
            },
            '\'' => {
                return rest[idx + 1..].starts_with(");").then_some(out);
            }
            '\n' => return None,
            _ => out.push(c),
        }
    }
    None
}

fn group_series(
    xs: &[f64],
    ys: &[f64],
    labels: Vec<String>,
    palette: &CategoryPalette,
) -> Vec<PointSeries> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<(f64, f64)>)> = Vec::new();

    for ((&x, &y), label) in xs.iter().zip(ys).zip(labels) {
        let slot = match index.get(&label) {
            Some(&slot) => slot,
            None => {
                groups.push((label.clone(), Vec::new()));
                index.insert(label, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].1.push((x, y));
    }

    groups
        .into_iter()
        .map(|(category_id, points)| {
            let (display_name, color) = palette.resolve(&category_id);
            PointSeries {
                category_id,
                display_name,
                color,
                points,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/src_inline/extract.rs"]
mod tests;
