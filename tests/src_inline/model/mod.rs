use super::*;

fn meta(run_id: &str, fraction: f64, replicate: u32, is_reference: bool) -> RunMeta {
    RunMeta {
        run_id: run_id.to_string(),
        fraction,
        replicate,
        seed: None,
        is_reference,
    }
}

fn panel(run_id: &str, fraction: f64, replicate: u32, is_reference: bool, sublib: &str) -> Panel {
    Panel::new(
        &meta(run_id, fraction, replicate, is_reference),
        sublib,
        format!("runs/{run_id}/{sublib}/report.html"),
        vec![PointSeries {
            category_id: "a".to_string(),
            display_name: "a".to_string(),
            color: "#000".to_string(),
            points: vec![(0.0, 0.0), (1.0, 1.0)],
        }],
    )
}

#[test]
fn test_panel_point_count_is_derived() {
    let p = panel("f010_r1", 0.1, 1, false, "sublib_1");
    assert_eq!(p.point_count, 2);
    assert_eq!(p.points().count(), 2);
}

#[test]
fn test_panel_order_reference_first_then_fraction_replicate_sublib() {
    let mut panels = vec![
        panel("f050_r1", 0.5, 1, false, "sublib_1"),
        panel("f010_r2", 0.1, 2, false, "sublib_1"),
        panel("f010_r1", 0.1, 1, false, "sublib_2"),
        panel("f010_r1", 0.1, 1, false, "sublib_1"),
        panel("ref_full", 1.0, 0, true, "sublib_2"),
        panel("ref_full", 1.0, 0, true, "sublib_1"),
    ];
    sort_panels(&mut panels);
    let order: Vec<(&str, &str)> = panels
        .iter()
        .map(|p| (p.run_id.as_str(), p.sublib_id.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("ref_full", "sublib_1"),
            ("ref_full", "sublib_2"),
            ("f010_r1", "sublib_1"),
            ("f010_r1", "sublib_2"),
            ("f010_r2", "sublib_1"),
            ("f050_r1", "sublib_1"),
        ]
    );
}

#[test]
fn test_palette_resolves_builtin_and_unknown() {
    let palette = CategoryPalette::default();
    assert_eq!(
        palette.resolve("xcond_2"),
        ("SK-N-SH".to_string(), "#ff7f0e".to_string())
    );
    assert_eq!(
        palette.resolve("mystery"),
        ("mystery".to_string(), palette::DEFAULT_COLOR.to_string())
    );
}

#[test]
fn test_palette_json_overrides() {
    let palette = CategoryPalette::default()
        .merge_json(r##"{"xcond_1": {"name": "K-562", "color": "#000000"}, "extra": {"name": "X", "color": "#111111"}}"##)
        .unwrap();
    assert_eq!(palette.resolve("xcond_1").0, "K-562");
    assert_eq!(palette.resolve("extra").1, "#111111");
    assert_eq!(palette.resolve("xcond_3").0, "HepG2");
    assert!(CategoryPalette::default().merge_json("[1,2]").is_err());
}
