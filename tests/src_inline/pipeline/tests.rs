use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::codec::{encode_labels, encode_numeric};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

const REPORT_NAME: &str = "all-sample_analysis_summary.html";

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_umapgallery_pipeline_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// 100 points over three categories, shifted by `offset`.
fn report_text(offset: f64) -> String {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut labels = Vec::new();
    for i in 0..100 {
        let label = match i % 3 {
            0 => "xcond_1",
            1 => "xcond_2",
            _ => "xcond_3",
        };
        xs.push(offset + (i % 10) as f64 * 0.5);
        ys.push(offset - (i / 10) as f64 * 0.25);
        labels.push(label);
    }
    format!(
        "<!doctype html><html><body><script>\nconst umapX = decodeFloats('{}');\nconst umapY = decodeFloats('{}');\nconst umapSamples = decodeLabels('{}');\n</script></body></html>\n",
        encode_numeric(&xs),
        encode_numeric(&ys),
        encode_labels(&labels)
    )
}

fn write_report(runs_dir: &Path, run_id: &str, sublib: &str, text: &str) -> PathBuf {
    let dir = runs_dir.join(run_id).join(sublib);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(REPORT_NAME);
    fs::write(&path, text).unwrap();
    path
}

fn scenario(root: &Path) -> GalleryConfig {
    let grid = root.join("config").join("subsample_grid.tsv");
    fs::create_dir_all(grid.parent().unwrap()).unwrap();
    fs::write(
        &grid,
        "run_id\tfraction\treplicate\tseed\tis_reference\n\
         ref_full\t1.0\t0\t424242\t1\n\
         f010_r1\t0.10\t1\t101001\t0\n\
         f010_r2\t0.10\t2\t101002\t0\n",
    )
    .unwrap();
    let runs_dir = root.join("runs");
    write_report(&runs_dir, "ref_full", "sublib_1", &report_text(0.0));
    write_report(&runs_dir, "f010_r1", "sublib_1", &report_text(1.0));
    write_report(&runs_dir, "f010_r2", "sublib_1", &report_text(-2.0));

    GalleryConfig {
        grid_path: grid,
        runs_dir,
        html_out: root.join("figures").join("gallery.html"),
        svg_out: root.join("figures").join("gallery.svg"),
        summary_out: Some(root.join("figures").join("gallery.json")),
        report_name: REPORT_NAME.to_string(),
        sublib_glob: "sublib_*".to_string(),
        pattern: ReportPattern::default(),
        palette: CategoryPalette::default(),
        plotly_src: "plotly.min.js".to_string(),
        strict_duplicates: false,
    }
}

#[test]
fn test_end_to_end_full_grid() {
    let root = make_temp_dir();
    let config = scenario(&root);
    let outcome = run_gallery(&config).unwrap();
    assert_eq!(
        outcome,
        GalleryOutcome {
            panels: 3,
            reference_panels: 1,
            placeholders: 0,
            duplicates: 0,
        }
    );

    let svg = fs::read_to_string(&config.svg_out).unwrap();
    assert_eq!(svg.matches("<g class=\"panel\"").count(), 3);
    assert_eq!(svg.matches("<g class=\"placeholder\"").count(), 0);
    assert_eq!(svg.matches("<g class=\"series\"").count(), 9);

    let html = fs::read_to_string(&config.html_out).unwrap();
    assert!(html.contains("\"src\":\"../runs/f010_r1/sublib_1/all-sample_analysis_summary.html\""));
    assert!(html.contains("\"point_count\":100"));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(config.summary_out.as_ref().unwrap()).unwrap())
            .unwrap();
    assert_eq!(summary["n_panels"], 3);
    assert_eq!(summary["panels"][0]["run_id"], "ref_full");
    assert_eq!(summary["panels"][0]["point_count"], 100);
}

#[test]
fn test_end_to_end_missing_report_yields_one_placeholder() {
    let root = make_temp_dir();
    let config = scenario(&root);
    fs::remove_dir_all(config.runs_dir.join("f010_r2")).unwrap();

    let outcome = run_gallery(&config).unwrap();
    assert_eq!(outcome.panels, 2);
    assert_eq!(outcome.placeholders, 1);

    let svg = fs::read_to_string(&config.svg_out).unwrap();
    assert_eq!(svg.matches("<g class=\"panel\"").count(), 2);
    assert_eq!(svg.matches("<g class=\"placeholder\"").count(), 1);
    assert!(svg.contains("<g class=\"placeholder\" data-fraction=\"0.1\" data-replicate=\"2\">"));
}

#[test]
fn test_svg_output_is_byte_identical_across_runs() {
    let root = make_temp_dir();
    let config = scenario(&root);
    run_gallery(&config).unwrap();
    let first = fs::read(&config.svg_out).unwrap();
    run_gallery(&config).unwrap();
    let second = fs::read(&config.svg_out).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_no_reports_is_empty_result() {
    let root = make_temp_dir();
    let mut config = scenario(&root);
    config.report_name = "other.html".to_string();
    assert!(matches!(
        run_gallery(&config),
        Err(GalleryError::EmptyResult { .. })
    ));
    assert!(!config.html_out.exists());
}

#[test]
fn test_missing_inputs_abort() {
    let root = make_temp_dir();
    let mut config = scenario(&root);
    config.runs_dir = root.join("no_runs");
    assert!(matches!(
        run_gallery(&config),
        Err(GalleryError::Input(InputError::MissingInput(_)))
    ));

    let mut config = scenario(&make_temp_dir());
    config.grid_path = root.join("missing.tsv");
    assert!(matches!(
        run_gallery(&config),
        Err(GalleryError::Input(InputError::MissingInput(_)))
    ));
}

#[test]
fn test_broken_report_aborts_without_output() {
    let root = make_temp_dir();
    let config = scenario(&root);
    write_report(
        &config.runs_dir,
        "f010_r1",
        "sublib_1",
        "const umapX = decodeFloats('1,2');\nconst umapY = decodeFloats('1');\nconst umapSamples = decodeLabels('a,b');\n",
    );
    let err = run_gallery(&config).unwrap_err();
    match err {
        GalleryError::Extract { path, source } => {
            assert!(path.ends_with("f010_r1/sublib_1/all-sample_analysis_summary.html"));
            assert!(matches!(source, ExtractError::LengthMismatch { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!config.svg_out.exists());

    write_report(&config.runs_dir, "f010_r1", "sublib_1", "<html></html>");
    assert!(matches!(
        run_gallery(&config),
        Err(GalleryError::Extract {
            source: ExtractError::MissingAssignment { .. },
            ..
        })
    ));
}

#[test]
fn test_duplicate_cells_warn_or_fail() {
    let root = make_temp_dir();
    let mut config = scenario(&root);
    write_report(&config.runs_dir, "f010_r1", "sublib_2", &report_text(1000.0));

    let outcome = run_gallery(&config).unwrap();
    assert_eq!(outcome.panels, 4);
    assert_eq!(outcome.duplicates, 1);
    let svg = fs::read_to_string(&config.svg_out).unwrap();
    assert_eq!(svg.matches("<g class=\"panel\"").count(), 3);

    // The dropped duplicate does not stretch the shared bounds.
    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(config.summary_out.as_ref().unwrap()).unwrap())
            .unwrap();
    assert!(summary["bounds"]["max_x"].as_f64().unwrap() < 100.0);
    assert_eq!(summary["duplicates"].as_array().unwrap().len(), 1);

    config.strict_duplicates = true;
    assert!(matches!(
        run_gallery(&config),
        Err(GalleryError::DuplicateCell { count: 1, replicate: 1, .. })
    ));
}

#[test]
fn test_output_dir_of_bare_filename() {
    assert_eq!(output_dir(Path::new("gallery.html")), PathBuf::from("."));
    assert_eq!(output_dir(Path::new("out/g.html")), PathBuf::from("out"));
}
