//! Interactive HTML gallery: the panel payload is embedded as JSON and laid out
//! client-side, with each panel plotted by Plotly as an independent task.

use std::fmt::{self, Write};

use serde::Serialize;

use crate::layout::geometry::{CELL_W, PLOT_SIZE, ROW_HEADER_W};
use crate::layout::{Cell, GlobalBounds, LayoutMatrix};
use crate::model::{Panel, PointSeries};
use crate::render::{
    LegendEntry, escape_xml, format_fraction, legend_entries, panel_headline, panel_metaline,
    placeholder_label,
};

pub const DEFAULT_PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Clone)]
pub struct HtmlOptions {
    pub title: String,
    pub report_name: String,
    pub plotly_src: String,
}

#[derive(Debug, Serialize)]
struct GalleryPayload<'a> {
    title: &'a str,
    report_name: &'a str,
    bounds: &'a GlobalBounds,
    plot_size: f64,
    cell_width: f64,
    row_header_width: f64,
    legend: Vec<LegendEntry>,
    layout: LayoutPayload,
    panels: Vec<PanelPayload<'a>>,
}

#[derive(Debug, Serialize)]
struct LayoutPayload {
    references: Vec<usize>,
    fractions: Vec<f64>,
    fraction_labels: Vec<String>,
    replicates: Vec<u32>,
    cells: Vec<Vec<Option<usize>>>,
    placeholder_labels: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct PanelPayload<'a> {
    run_id: &'a str,
    sublib: &'a str,
    fraction: f64,
    replicate: u32,
    is_reference: bool,
    src: &'a str,
    label: String,
    meta: String,
    point_count: usize,
    series: Vec<SeriesPayload<'a>>,
}

#[derive(Debug, Serialize)]
struct SeriesPayload<'a> {
    category: &'a str,
    name: &'a str,
    color: &'a str,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl<'a> From<&'a PointSeries> for SeriesPayload<'a> {
    fn from(series: &'a PointSeries) -> Self {
        let (x, y): (Vec<f64>, Vec<f64>) = series.points.iter().copied().unzip();
        Self {
            category: &series.category_id,
            name: &series.display_name,
            color: &series.color,
            x,
            y,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("payload serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document formatting failed")]
    Fmt(#[from] fmt::Error),
}

fn build_payload<'a>(
    panels: &'a [Panel],
    bounds: &'a GlobalBounds,
    matrix: &LayoutMatrix,
    options: &'a HtmlOptions,
) -> GalleryPayload<'a> {
    let cells = matrix
        .cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Panel(idx) => Some(*idx),
                    Cell::Missing => None,
                })
                .collect()
        })
        .collect();
    let placeholder_labels = matrix
        .fractions
        .iter()
        .map(|&f| {
            matrix
                .replicates
                .iter()
                .map(|&r| placeholder_label(f, r))
                .collect()
        })
        .collect();

    GalleryPayload {
        title: &options.title,
        report_name: &options.report_name,
        bounds,
        plot_size: PLOT_SIZE,
        cell_width: CELL_W,
        row_header_width: ROW_HEADER_W,
        legend: legend_entries(panels),
        layout: LayoutPayload {
            references: matrix.references.clone(),
            fractions: matrix.fractions.clone(),
            fraction_labels: matrix.fractions.iter().map(|&f| format_fraction(f)).collect(),
            replicates: matrix.replicates.clone(),
            cells,
            placeholder_labels,
        },
        panels: panels
            .iter()
            .map(|p| PanelPayload {
                run_id: &p.run_id,
                sublib: &p.sublib_id,
                fraction: p.fraction,
                replicate: p.replicate,
                is_reference: p.is_reference,
                src: &p.source_reference,
                label: panel_headline(p),
                meta: panel_metaline(p),
                point_count: p.point_count,
                series: p.series.iter().map(SeriesPayload::from).collect(),
            })
            .collect(),
    }
}

/// Serializes the payload for a `<script type="application/json">` block.
pub fn payload_json(
    panels: &[Panel],
    bounds: &GlobalBounds,
    matrix: &LayoutMatrix,
    options: &HtmlOptions,
) -> Result<String, serde_json::Error> {
    let payload = build_payload(panels, bounds, matrix, options);
    let json = serde_json::to_string(&payload)?;
    // `<` only occurs inside JSON strings, where the escape is equivalent.
    Ok(json.replace('<', "\\u003c"))
}

pub fn render_html(
    panels: &[Panel],
    bounds: &GlobalBounds,
    matrix: &LayoutMatrix,
    options: &HtmlOptions,
) -> Result<String, HtmlError> {
    let json = payload_json(panels, bounds, matrix, options)?;
    let mut out = String::with_capacity(json.len() + STYLE.len() + SCRIPT.len() + 4096);

    writeln!(out, "<!doctype html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "  <meta charset=\"utf-8\" />")?;
    writeln!(
        out,
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />"
    )?;
    writeln!(out, "  <title>{}</title>", escape_xml(&options.title))?;
    out.push_str(STYLE);
    writeln!(
        out,
        "  <script src=\"{}\" charset=\"utf-8\"></script>",
        escape_xml(&options.plotly_src)
    )?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "  <section class=\"topbar\">")?;
    writeln!(out, "    <h1 class=\"title\">{}</h1>", escape_xml(&options.title))?;
    writeln!(
        out,
        "    <p class=\"subtitle\">UMAP point clouds extracted from <span class=\"mono\">{}</span>, drawn on one shared coordinate window. Rows are subsample fractions, columns are replicates.</p>",
        escape_xml(&options.report_name)
    )?;
    writeln!(out, "    <div class=\"stats\" id=\"stats\"></div>")?;
    writeln!(out, "    <div class=\"legend\" id=\"legend\"></div>")?;
    writeln!(out, "    <div class=\"actions\">")?;
    writeln!(
        out,
        "      <button id=\"rerender\" type=\"button\">Re-render Panels</button>"
    )?;
    writeln!(
        out,
        "      <button id=\"single-col\" type=\"button\">Toggle Single Column</button>"
    )?;
    writeln!(out, "    </div>")?;
    writeln!(out, "  </section>")?;
    writeln!(out, "  <main id=\"gallery\"></main>")?;
    writeln!(
        out,
        "  <script type=\"application/json\" id=\"gallery-data\">{json}</script>"
    )?;
    out.push_str(SCRIPT);
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}

const STYLE: &str = r##"  <style>
    :root {
      --bg: #f4f0e8;
      --panel: #fffaf1;
      --ink: #1f1c17;
      --muted: #6f6658;
      --line: #d8cfbe;
      --accent: #1f6f78;
      --ok: #2f7d32;
      --fail: #b3261e;
      --shadow: 0 10px 24px rgba(40, 32, 18, 0.08);
    }
    * { box-sizing: border-box; }
    html, body { margin: 0; padding: 0; background: var(--bg); color: var(--ink); font-family: Georgia, "Times New Roman", serif; }
    body { padding: 20px; }
    .topbar {
      position: sticky; top: 0; z-index: 20;
      background: color-mix(in oklab, var(--bg) 88%, white);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 12px 14px;
      margin-bottom: 16px;
      box-shadow: var(--shadow);
    }
    .title { font-size: 20px; font-weight: 700; margin: 0 0 4px; }
    .subtitle { font-size: 13px; color: var(--muted); margin: 0; }
    .stats, .legend { margin-top: 8px; font-size: 12px; color: var(--muted); display: flex; gap: 12px; flex-wrap: wrap; }
    .swatch { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 4px; vertical-align: middle; }
    .actions { margin-top: 10px; display: flex; gap: 8px; flex-wrap: wrap; }
    button {
      border: 1px solid var(--line);
      background: white;
      color: var(--ink);
      border-radius: 999px;
      padding: 6px 10px;
      cursor: pointer;
      font: inherit;
      font-size: 12px;
    }
    button:hover { border-color: var(--accent); color: var(--accent); }
    .section-grid { display: grid; gap: 12px; align-items: start; margin-bottom: 16px; }
    .single .section-grid { grid-template-columns: 1fr !important; }
    .single .row-head, .single .col-head.spacer { display: none; }
    .row-head { font-size: 13px; font-weight: 700; align-self: center; text-align: right; padding-right: 8px; }
    .col-head { font-size: 13px; font-weight: 700; text-align: center; }
    .card {
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 14px;
      overflow: hidden;
      box-shadow: var(--shadow);
    }
    .card.missing { background: transparent; border-style: dashed; box-shadow: none; color: var(--muted); }
    .card-head {
      display: grid;
      grid-template-columns: 1fr auto;
      gap: 8px;
      align-items: start;
      padding: 10px 12px 8px;
      border-bottom: 1px solid var(--line);
      background: linear-gradient(135deg, rgba(31,111,120,0.08), rgba(31,111,120,0) 45%);
    }
    .runline { font-size: 13px; font-weight: 700; }
    .metaline { font-size: 12px; color: var(--muted); }
    .metaline a { color: var(--accent); }
    .status {
      font-size: 11px;
      color: var(--muted);
      border: 1px solid var(--line);
      border-radius: 999px;
      padding: 2px 8px;
      white-space: nowrap;
      align-self: center;
    }
    .status.ok { color: var(--ok); border-color: var(--ok); }
    .status.fail { color: var(--fail); border-color: var(--fail); }
    .plot-host { margin: 10px auto; background: #fff; }
    .missing-body { display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 4px; font-size: 12px; }
    .mono { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; }
  </style>
"##;

const SCRIPT: &str = r##"  <script>
    const data = JSON.parse(document.getElementById("gallery-data").textContent);
    const gallery = document.getElementById("gallery");
    const size = data.plot_size;
    let tasks = [];

    function el(tag, className, text) {
      const node = document.createElement(tag);
      if (className) node.className = className;
      if (text !== undefined) node.textContent = text;
      return node;
    }

    function chip(text) {
      return el("span", "", text);
    }

    function setStatus(task, text, state) {
      task.status.textContent = text;
      task.status.className = state ? `status ${state}` : "status";
    }

    function panelCard(idx) {
      const panel = data.panels[idx];
      const card = el("section", "card");
      card.dataset.runId = panel.run_id;
      card.dataset.sublib = panel.sublib;
      const head = el("div", "card-head");
      const left = el("div");
      const meta = el("div", "metaline", `${panel.meta} • `);
      const link = el("a", "", "report");
      link.href = panel.src;
      meta.append(link);
      left.append(el("div", "runline", panel.label), meta);
      const status = el("div", "status", "queued");
      head.append(left, status);
      const host = el("div", "plot-host");
      host.style.width = `${size}px`;
      host.style.height = `${size}px`;
      card.append(head, host);
      tasks.push({ idx, panel, host, status });
      return card;
    }

    function missingCard(label) {
      const card = el("section", "card missing");
      const body = el("div", "missing-body");
      body.style.height = `${size + 64}px`;
      body.append(el("strong", "", "missing"), el("span", "", label));
      card.append(body);
      return card;
    }

    function buildLayout() {
      tasks = [];
      const layout = data.layout;
      const cols = Math.max(layout.replicates.length, layout.references.length, 1);
      const template = `${data.row_header_width}px repeat(${cols}, ${data.cell_width}px)`;
      const frag = document.createDocumentFragment();

      if (layout.references.length > 0) {
        const refs = el("div", "section-grid");
        refs.style.gridTemplateColumns = template;
        refs.append(el("div", "row-head", "reference"));
        layout.references.forEach(idx => refs.append(panelCard(idx)));
        frag.append(refs);
      }

      if (layout.fractions.length > 0 && layout.replicates.length > 0) {
        const grid = el("div", "section-grid");
        grid.style.gridTemplateColumns = template;
        grid.append(el("div", "col-head spacer", ""));
        layout.replicates.forEach(r => grid.append(el("div", "col-head", `replicate ${r}`)));
        for (let c = layout.replicates.length; c < cols; c++) grid.append(el("div", "col-head spacer", ""));
        layout.fractions.forEach((_, row) => {
          grid.append(el("div", "row-head", `fraction ${layout.fraction_labels[row]}`));
          layout.cells[row].forEach((idx, col) => {
            grid.append(idx === null ? missingCard(layout.placeholder_labels[row][col]) : panelCard(idx));
          });
          for (let c = layout.replicates.length; c < cols; c++) grid.append(el("div", "", ""));
        });
        frag.append(grid);
      }
      gallery.replaceChildren(frag);
    }

    function buildHeader() {
      const stats = document.getElementById("stats");
      const runCount = new Set(data.panels.map(p => p.run_id)).size;
      const points = data.panels.reduce((acc, p) => acc + p.point_count, 0);
      const missing = data.layout.cells.flat().filter(idx => idx === null).length;
      stats.replaceChildren(
        chip(`${runCount} runs`),
        chip(`${data.panels.length} panels`),
        chip(`${points} points`),
        chip(`${missing} missing cells`),
        chip(`report: ${data.report_name}`)
      );
      const legend = document.getElementById("legend");
      legend.replaceChildren(...data.legend.map(entry => {
        const item = el("span", "");
        const swatch = el("span", "swatch");
        swatch.style.background = entry.color;
        item.append(swatch, document.createTextNode(entry.name));
        return item;
      }));
    }

    function renderPanel(task) {
      const panel = task.panel;
      if (typeof window.Plotly === "undefined") {
        throw new Error("plotting library unavailable");
      }
      let total = 0;
      for (const s of panel.series) {
        if (s.x.length !== s.y.length) throw new Error(`series ${s.category} has unequal x/y`);
        total += s.x.length;
      }
      if (total !== panel.point_count) {
        throw new Error(`point count ${total} != ${panel.point_count}`);
      }
      const b = data.bounds;
      const traces = panel.series.map(s => ({
        type: "scattergl",
        mode: "markers",
        name: s.name,
        x: s.x,
        y: s.y,
        marker: { color: s.color, size: 3, opacity: 0.75 },
        hoverinfo: "name",
      }));
      const layout = {
        width: size,
        height: size,
        margin: { l: 0, r: 0, t: 0, b: 0 },
        showlegend: false,
        paper_bgcolor: "#ffffff",
        plot_bgcolor: "#ffffff",
        xaxis: { range: [b.min_x, b.max_x], visible: false, fixedrange: true },
        yaxis: { range: [b.min_y, b.max_y], visible: false, fixedrange: true, scaleanchor: "x", scaleratio: 1 },
      };
      return window.Plotly.newPlot(task.host, traces, layout, { displayModeBar: false, responsive: false });
    }

    async function runTask(task) {
      setStatus(task, "rendering", "");
      try {
        await renderPanel(task);
        setStatus(task, `ready • ${task.panel.point_count} points`, "ok");
      } catch (err) {
        setStatus(task, `failed: ${err && err.message ? err.message : err}`, "fail");
        console.warn("panel render failed", task.panel.run_id, task.panel.sublib, err);
      }
    }

    function schedule(task) {
      setStatus(task, "queued", "");
      setTimeout(() => { runTask(task); }, 0);
    }

    function renderAll() {
      tasks.forEach(task => {
        if (window.Plotly && typeof window.Plotly.purge === "function") {
          try { window.Plotly.purge(task.host); } catch (err) { /* host was never plotted */ }
        }
        schedule(task);
      });
    }

    document.getElementById("rerender").addEventListener("click", renderAll);
    document.getElementById("single-col").addEventListener("click", () => {
      gallery.classList.toggle("single");
    });

    buildHeader();
    buildLayout();
    renderAll();
  </script>
"##;
