mod codec;
mod extract;
mod input;
mod layout;
mod logging;
mod model;
mod pipeline;
mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::extract::{LABEL_DECODE_FN, NUMERIC_DECODE_FN, ReportPattern};
use crate::input::write_default_grid;
use crate::model::CategoryPalette;
use crate::pipeline::{GalleryConfig, GalleryError, run_gallery};
use crate::render::html::DEFAULT_PLOTLY_SRC;

#[derive(Debug, Parser)]
#[command(name = "kira-umapgallery", version)]
#[command(about = "Render split-pipe UMAP reports as comparable HTML and SVG galleries")]
struct Cli {
    /// Only log warnings and errors (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract UMAP points from every report and write both galleries
    Gallery(GalleryArgs),
    /// Write the default balanced subsampling grid TSV
    Grid {
        #[arg(long, default_value = "config/subsample_grid.tsv")]
        out: PathBuf,
    },
}

#[derive(Debug, Args)]
struct GalleryArgs {
    /// Run grid TSV: run_id, fraction, replicate, seed, is_reference
    #[arg(long, default_value = "config/subsample_grid.tsv")]
    grid: PathBuf,

    /// Root holding one directory per run
    #[arg(long, default_value = "runs")]
    runs_dir: PathBuf,

    #[arg(long, default_value = "figures/umap_sample_gallery.html")]
    html_out: PathBuf,

    #[arg(long, default_value = "figures/umap_sample_gallery.svg")]
    svg_out: PathBuf,

    /// Optional JSON summary of panels, layout and bounds
    #[arg(long)]
    summary_out: Option<PathBuf>,

    /// Report filename to aggregate
    #[arg(long, default_value = "all-sample_analysis_summary.html")]
    report_name: String,

    /// Sublibrary directory glob under each run
    #[arg(long, default_value = "sublib_*")]
    sublib_glob: String,

    /// JSON object overriding category display names and colors
    #[arg(long)]
    palette: Option<PathBuf>,

    #[arg(long, default_value = "umapX")]
    x_var: String,

    #[arg(long, default_value = "umapY")]
    y_var: String,

    #[arg(long, default_value = "umapSamples")]
    label_var: String,

    /// Decoder called on the coordinate arrays in the report
    #[arg(long, default_value = NUMERIC_DECODE_FN)]
    numeric_fn: String,

    /// Decoder called on the label array in the report
    #[arg(long, default_value = LABEL_DECODE_FN)]
    label_fn: String,

    /// Script URL for the client-side plotting library
    #[arg(long, default_value = DEFAULT_PLOTLY_SRC)]
    plotly_src: String,

    /// Abort when two panels map onto the same (fraction, replicate) cell
    #[arg(long)]
    strict_duplicates: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet);
    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), GalleryError> {
    match command {
        Command::Grid { out } => {
            let n = write_default_grid(&out)?;
            tracing::info!(path = %out.display(), runs = n, "wrote subsampling grid");
            Ok(())
        }
        Command::Gallery(args) => {
            let config = build_config(args)?;
            let outcome = run_gallery(&config)?;
            println!(
                "Wrote gallery: {} and {} ({} panels, {} missing cells)",
                config.html_out.display(),
                config.svg_out.display(),
                outcome.panels,
                outcome.placeholders
            );
            Ok(())
        }
    }
}

fn build_config(args: GalleryArgs) -> Result<GalleryConfig, GalleryError> {
    let palette = match &args.palette {
        Some(path) => CategoryPalette::load(path)?,
        None => CategoryPalette::default(),
    };
    Ok(GalleryConfig {
        grid_path: args.grid,
        runs_dir: args.runs_dir,
        html_out: args.html_out,
        svg_out: args.svg_out,
        summary_out: args.summary_out,
        report_name: args.report_name,
        sublib_glob: args.sublib_glob,
        pattern: ReportPattern {
            x_var: args.x_var,
            y_var: args.y_var,
            label_var: args.label_var,
            numeric_fn: args.numeric_fn,
            label_fn: args.label_fn,
        },
        palette,
        plotly_src: args.plotly_src,
        strict_duplicates: args.strict_duplicates,
    })
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
