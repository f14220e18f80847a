//! Static SVG rendering of the gallery grid.
//!
//! Output is a pure function of its inputs: no timestamps, fixed number
//! formatting, panel order taken from the layout geometry.

use std::fmt::{self, Write};

use crate::layout::geometry::{CARD_HEADER_H, LEGEND_H, MARGIN, ROW_HEADER_W, RowLabel};
use crate::layout::{GlobalBounds, GridGeometry, LayoutMatrix, PlotTransform, Rect, SlotContent};
use crate::model::Panel;
use crate::render::{
    escape_xml, format_fraction, legend_entries, panel_headline, panel_metaline,
    placeholder_label,
};

pub const POINT_RADIUS: f64 = 1.6;
const POINT_OPACITY: f64 = 0.75;

const BG: &str = "#f4f0e8";
const CARD_FILL: &str = "#fffaf1";
const INK: &str = "#1f1c17";
const MUTED: &str = "#6f6658";
const LINE: &str = "#d8cfbe";
const HEAD_FILL: &str = "#eaf1f0";

pub fn render_svg(
    panels: &[Panel],
    bounds: &GlobalBounds,
    matrix: &LayoutMatrix,
    title: &str,
) -> Result<String, fmt::Error> {
    let geometry = GridGeometry::new(matrix);
    let total_points: usize = panels.iter().map(|p| p.point_count).sum();
    let mut out = String::with_capacity(4096 + total_points * 48);

    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"Georgia, 'Times New Roman', serif\">",
        w = num(geometry.width),
        h = num(geometry.height)
    )?;
    writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{BG}\"/>",
        num(geometry.width),
        num(geometry.height)
    )?;
    writeln!(
        out,
        "<text class=\"title\" x=\"{}\" y=\"{}\" font-size=\"20\" font-weight=\"700\" fill=\"{INK}\">{}</text>",
        num(MARGIN),
        num(geometry.title_y + 24.0),
        escape_xml(title)
    )?;

    write_legend(&mut out, panels, geometry.legend_y)?;
    write_headers(&mut out, &geometry)?;

    for (slot_idx, slot) in geometry.slots.iter().enumerate() {
        match slot.content {
            SlotContent::Reference(idx) | SlotContent::Panel(idx) => match panels.get(idx) {
                Some(panel) => write_panel(&mut out, slot_idx, &slot.card, panel, bounds)?,
                None => write_placeholder(&mut out, &slot.card, panel_fallback_label(idx))?,
            },
            SlotContent::Missing {
                fraction,
                replicate,
            } => write_missing(&mut out, &slot.card, fraction, replicate)?,
        }
    }

    writeln!(out, "</svg>")?;
    Ok(out)
}

fn write_legend(out: &mut String, panels: &[Panel], legend_y: f64) -> fmt::Result {
    let cy = legend_y + LEGEND_H / 2.0;
    writeln!(out, "<g class=\"legend\">")?;
    let mut x = MARGIN;
    for entry in legend_entries(panels) {
        writeln!(
            out,
            "<circle cx=\"{}\" cy=\"{}\" r=\"5\" fill=\"{}\"/>",
            num(x + 5.0),
            num(cy),
            escape_xml(&entry.color)
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"{INK}\">{}</text>",
            num(x + 14.0),
            num(cy + 4.0),
            escape_xml(&entry.name)
        )?;
        // Georgia at 12px averages about 7px per glyph.
        x += 14.0 + entry.name.chars().count() as f64 * 7.0 + 18.0;
    }
    writeln!(out, "</g>")
}

fn write_headers(out: &mut String, geometry: &GridGeometry) -> fmt::Result {
    writeln!(out, "<g class=\"row-headers\">")?;
    for header in &geometry.row_headers {
        let text = match header.label {
            RowLabel::Reference => "reference".to_string(),
            RowLabel::Fraction(f) => format!("fraction {}", format_fraction(f)),
        };
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"13\" font-weight=\"700\" text-anchor=\"end\" fill=\"{INK}\">{}</text>",
            num(MARGIN + ROW_HEADER_W - 12.0),
            num(header.y_center),
            escape_xml(&text)
        )?;
    }
    writeln!(out, "</g>")?;

    writeln!(out, "<g class=\"col-headers\">")?;
    for header in &geometry.col_headers {
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"13\" font-weight=\"700\" text-anchor=\"middle\" fill=\"{INK}\">replicate {}</text>",
            num(header.x_center),
            num(header.y_center + 4.0),
            header.replicate
        )?;
    }
    writeln!(out, "</g>")
}

fn write_panel(
    out: &mut String,
    slot_idx: usize,
    card: &Rect,
    panel: &Panel,
    bounds: &GlobalBounds,
) -> fmt::Result {
    writeln!(
        out,
        "<g class=\"panel\" data-run-id=\"{}\" data-sublib=\"{}\" data-fraction=\"{}\" data-replicate=\"{}\" data-reference=\"{}\">",
        escape_xml(&panel.run_id),
        escape_xml(&panel.sublib_id),
        format_fraction(panel.fraction),
        panel.replicate,
        panel.is_reference
    )?;
    writeln!(out, "<title>{}</title>", escape_xml(&panel.source_reference))?;
    writeln!(
        out,
        "<rect class=\"card\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"10\" fill=\"{CARD_FILL}\" stroke=\"{LINE}\"/>",
        num(card.x),
        num(card.y),
        num(card.w),
        num(card.h)
    )?;
    writeln!(
        out,
        "<rect class=\"card-head\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"10\" fill=\"{HEAD_FILL}\"/>",
        num(card.x),
        num(card.y),
        num(card.w),
        num(CARD_HEADER_H)
    )?;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"13\" font-weight=\"700\" fill=\"{INK}\">{}</text>",
        num(card.x + 10.0),
        num(card.y + 18.0),
        escape_xml(&panel_headline(panel))
    )?;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"{MUTED}\">{}</text>",
        num(card.x + 10.0),
        num(card.y + 35.0),
        escape_xml(&panel_metaline(panel))
    )?;

    let plot = card.plot_area();
    writeln!(
        out,
        "<clipPath id=\"clip-{slot_idx}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>",
        num(plot.x),
        num(plot.y),
        num(plot.w),
        num(plot.h)
    )?;
    writeln!(
        out,
        "<rect class=\"plot\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#ffffff\" stroke=\"#e5e5e5\"/>",
        num(plot.x),
        num(plot.y),
        num(plot.w),
        num(plot.h)
    )?;

    let transform = PlotTransform::new(bounds, &plot);
    writeln!(out, "<g clip-path=\"url(#clip-{slot_idx})\">")?;
    for series in &panel.series {
        writeln!(
            out,
            "<g class=\"series\" data-category=\"{}\" fill=\"{}\" fill-opacity=\"{POINT_OPACITY}\">",
            escape_xml(&series.category_id),
            escape_xml(&series.color)
        )?;
        for &(x, y) in &series.points {
            let (px, py) = transform.apply(x, y);
            writeln!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{POINT_RADIUS}\"/>",
                num(px),
                num(py)
            )?;
        }
        writeln!(out, "</g>")?;
    }
    writeln!(out, "</g>")?;
    writeln!(out, "</g>")
}

fn write_missing(out: &mut String, card: &Rect, fraction: f64, replicate: u32) -> fmt::Result {
    writeln!(
        out,
        "<g class=\"placeholder\" data-fraction=\"{}\" data-replicate=\"{}\">",
        format_fraction(fraction),
        replicate
    )?;
    write_placeholder_body(out, card, &placeholder_label(fraction, replicate))?;
    writeln!(out, "</g>")
}

fn write_placeholder(out: &mut String, card: &Rect, label: String) -> fmt::Result {
    writeln!(out, "<g class=\"placeholder\">")?;
    write_placeholder_body(out, card, &label)?;
    writeln!(out, "</g>")
}

fn write_placeholder_body(out: &mut String, card: &Rect, label: &str) -> fmt::Result {
    writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"10\" fill=\"none\" stroke=\"{LINE}\" stroke-dasharray=\"6 4\"/>",
        num(card.x),
        num(card.y),
        num(card.w),
        num(card.h)
    )?;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"14\" text-anchor=\"middle\" fill=\"{MUTED}\">missing</text>",
        num(card.center_x()),
        num(card.center_y() - 4.0)
    )?;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" text-anchor=\"middle\" fill=\"{MUTED}\">{}</text>",
        num(card.center_x()),
        num(card.center_y() + 14.0),
        escape_xml(label)
    )
}

fn panel_fallback_label(idx: usize) -> String {
    format!("panel #{idx} unavailable")
}

fn num(v: f64) -> String {
    let text = format!("{v:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
