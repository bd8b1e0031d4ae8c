use std::fs;
use std::path::PathBuf;

use siteplan_config::RenderSettings;
use siteplan_engine::{Diagnostic, SitePlanner, Stage, ZoningRegistry};
use siteplan_io::{
    ArtifactFormat, ArtifactSaver, FileArtifactSaver, IoError, SurveyFacade, SurveyLoader,
    ValidationMode, validate_boundary,
};
use siteplan_render::render_site_plan;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    path
}

#[test]
fn prosper_traverse_produces_closed_path_and_twelve_easements() {
    let document = SurveyFacade::new()
        .load(&fixture("prosper_lot.json"))
        .expect("读取测量文档失败");
    let validated = validate_boundary(&document.boundary, ValidationMode::Strict).expect("校验失败");
    assert_eq!(validated.segments.len(), 4);

    let registry = ZoningRegistry::default();
    let planned = SitePlanner::new(&registry, RenderSettings::default())
        .plan(&validated.segments, &document.city.name)
        .expect("生成几何失败");

    assert!(planned.diagnostics.is_empty());
    let path = &planned.layout.path;
    assert_eq!(path.len(), 5);
    assert!(path.end().distance(path.points()[0]) < 1e-6);

    assert_eq!(planned.layout.easements.len(), 12);
    let mut labels: Vec<&str> = planned
        .layout
        .easements
        .iter()
        .map(|e| e.label.as_str())
        .collect();
    labels.sort();
    labels.dedup();
    assert_eq!(
        labels,
        vec![
            "Landscape Easement 15ft",
            "Landscape Setback 5ft",
            "Utility Easement 10ft"
        ]
    );
}

#[test]
fn malformed_direction_is_skipped_and_reported() {
    let document = SurveyFacade::new()
        .load(&fixture("malformed_lot.toml"))
        .expect("读取测量文档失败");

    let strict = validate_boundary(&document.boundary, ValidationMode::Strict);
    assert!(matches!(strict, Err(IoError::InvalidBoundary { index: 1, .. })));

    let validated = validate_boundary(&document.boundary, ValidationMode::Lenient).expect("校验失败");
    assert_eq!(validated.segments.len(), 3);
    assert_eq!(validated.rejected.len(), 1);
    assert_eq!(validated.rejected[0].index, 3);

    let registry = ZoningRegistry::default();
    let rendered = render_site_plan(
        &registry,
        RenderSettings::default(),
        &validated.segments,
        &document.city.name,
    )
    .expect("渲染不应中止");

    let skipped: Vec<(usize, Stage)> = rendered
        .diagnostics
        .iter()
        .filter_map(|d| match d {
            Diagnostic::SkippedSegment { index, stage, .. } => Some((*index, *stage)),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![(1, Stage::Path), (1, Stage::Easement)]);
    assert!(!rendered.encoded.is_empty());
}

#[test]
fn artifacts_are_written_in_each_format() {
    let document = SurveyFacade::new()
        .load(&fixture("prosper_lot.json"))
        .expect("读取测量文档失败");
    let validated = validate_boundary(&document.boundary, ValidationMode::Strict).unwrap();
    let registry = ZoningRegistry::default();
    let rendered = render_site_plan(
        &registry,
        RenderSettings::default(),
        &validated.segments,
        &document.city.name,
    )
    .unwrap();

    let dir = tempfile::tempdir().expect("create temp dir");
    let saver = FileArtifactSaver::new();

    let png_path = dir.path().join("plan.png");
    assert_eq!(
        saver.save(&rendered, &document, &png_path).unwrap(),
        ArtifactFormat::Png
    );
    assert_eq!(fs::read(&png_path).unwrap(), rendered.png);

    let b64_path = dir.path().join("plan.b64");
    saver.save(&rendered, &document, &b64_path).unwrap();
    assert_eq!(fs::read_to_string(&b64_path).unwrap(), rendered.encoded);

    let html_path = dir.path().join("plan.html");
    saver.save(&rendered, &document, &html_path).unwrap();
    let html = fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("<h1>Prosper Lot 12</h1>"));
    assert!(html.contains("1200 Preston Rd"));
    assert!(html.contains("data:image/png;base64,"));

    let err = saver
        .save(&rendered, &document, &dir.path().join("plan.gif"))
        .unwrap_err();
    assert!(matches!(err, IoError::UnsupportedFormat(_)));
}

#[test]
fn unsupported_survey_extension_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("survey.csv");
    fs::write(&path, "N,45,0,0,E,100").unwrap();
    let err = SurveyFacade::new().load(&path).unwrap_err();
    assert!(matches!(err, IoError::UnsupportedFormat(_)));
}
