pub mod html;
pub mod summary;
pub mod svg;

use std::collections::HashSet;

use serde::Serialize;

use crate::model::Panel;

pub const GALLERY_TITLE: &str = "UMAP Sample Gallery";

/// One legend row; first-seen order across the sorted panel list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub category: String,
    pub name: String,
    pub color: String,
}

pub fn legend_entries(panels: &[Panel]) -> Vec<LegendEntry> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for series in panels.iter().flat_map(|p| &p.series) {
        if seen.insert(series.category_id.as_str()) {
            out.push(LegendEntry {
                category: series.category_id.clone(),
                name: series.display_name.clone(),
                color: series.color.clone(),
            });
        }
    }
    out
}

/// Three decimals with trailing zeros dropped: `0.100` -> `0.1`, `1.000` -> `1`.
pub fn format_fraction(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0');
    text.trim_end_matches('.').to_string()
}

pub fn panel_headline(panel: &Panel) -> String {
    format!("{} ({})", panel.run_id, panel.sublib_id)
}

pub fn panel_metaline(panel: &Panel) -> String {
    let base = format!(
        "fraction={} \u{2022} replicate={} \u{2022} {} points",
        format_fraction(panel.fraction),
        panel.replicate,
        panel.point_count
    );
    if panel.is_reference {
        format!("reference full depth \u{2022} {base}")
    } else {
        base
    }
}

pub fn placeholder_label(fraction: f64, replicate: u32) -> String {
    format!(
        "fraction={} \u{2022} replicate={}",
        format_fraction(fraction),
        replicate
    )
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/render/mod.rs"]
mod tests;
