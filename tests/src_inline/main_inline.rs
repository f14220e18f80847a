use super::*;

#[test]
fn test_gallery_defaults() {
    let cli = Cli::try_parse_from(["kira-umapgallery", "gallery"]).unwrap();
    let Command::Gallery(args) = cli.command else {
        panic!("expected gallery command");
    };
    assert!(!cli.quiet);
    assert_eq!(args.grid, PathBuf::from("config/subsample_grid.tsv"));
    assert_eq!(args.report_name, "all-sample_analysis_summary.html");
    assert_eq!(args.sublib_glob, "sublib_*");

    let config = build_config(args).unwrap();
    assert_eq!(config.pattern, ReportPattern::default());
    assert_eq!(config.palette, CategoryPalette::default());
    assert!(!config.strict_duplicates);
    assert_eq!(config.plotly_src, DEFAULT_PLOTLY_SRC);
}

#[test]
fn test_gallery_overrides() {
    let cli = Cli::try_parse_from([
        "kira-umapgallery",
        "--quiet",
        "gallery",
        "--runs-dir",
        "/data/runs",
        "--svg-out",
        "out/g.svg",
        "--sublib-glob",
        "lib?",
        "--x-var",
        "ux",
        "--numeric-fn",
        "unpackF",
        "--strict-duplicates",
    ])
    .unwrap();
    assert!(cli.quiet);
    let Command::Gallery(args) = cli.command else {
        panic!("expected gallery command");
    };
    let config = build_config(args).unwrap();
    assert_eq!(config.runs_dir, PathBuf::from("/data/runs"));
    assert_eq!(config.svg_out, PathBuf::from("out/g.svg"));
    assert_eq!(config.sublib_glob, "lib?");
    assert_eq!(config.pattern.x_var, "ux");
    assert_eq!(config.pattern.numeric_fn, "unpackF");
    assert_eq!(config.pattern.label_fn, "decodeLabels");
    assert!(config.strict_duplicates);
}

#[test]
fn test_missing_palette_file_is_missing_input() {
    let cli = Cli::try_parse_from([
        "kira-umapgallery",
        "gallery",
        "--palette",
        "/nonexistent/palette.json",
    ])
    .unwrap();
    let Command::Gallery(args) = cli.command else {
        panic!("expected gallery command");
    };
    assert!(matches!(
        build_config(args),
        Err(GalleryError::Input(input::InputError::MissingInput(_)))
    ));
}

#[test]
fn test_grid_command() {
    let cli = Cli::try_parse_from(["kira-umapgallery", "grid", "--out", "g.tsv"]).unwrap();
    match cli.command {
        Command::Grid { out } => assert_eq!(out, PathBuf::from("g.tsv")),
        other => panic!("unexpected command: {other:?}"),
    }
    assert!(Cli::try_parse_from(["kira-umapgallery", "bogus"]).is_err());
}
