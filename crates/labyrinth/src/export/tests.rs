use super::*;
use crate::error::{DegenerateKind, MazeError, ParseError};
use crate::geom2::IPoint;
use crate::maze::generate;

fn pairs(doc: &str) -> Vec<(String, String)> {
    let lines: Vec<&str> = doc.lines().collect();
    assert_eq!(lines.len() % 2, 0, "DXF must be code/value pairs");
    lines
        .chunks(2)
        .map(|kv| (kv[0].trim().to_string(), kv[1].to_string()))
        .collect()
}

/// `(layer, flag70, vertex count)` per POLYLINE, in document order.
fn polylines(doc: &str) -> Vec<(String, String, usize)> {
    let pairs = pairs(doc);
    let mut out = Vec::new();
    let mut i = 0;
    while i < pairs.len() {
        if pairs[i] == ("0".into(), "POLYLINE".into()) {
            let mut layer = String::new();
            let mut flag = String::new();
            let mut vertices = 0;
            i += 1;
            while pairs[i].0 != "0" {
                match pairs[i].0.as_str() {
                    "8" => layer = pairs[i].1.clone(),
                    "70" => flag = pairs[i].1.clone(),
                    _ => {}
                }
                i += 1;
            }
            while pairs[i].1 != "SEQEND" {
                if pairs[i] == ("0".into(), "VERTEX".into()) {
                    vertices += 1;
                }
                i += 1;
            }
            out.push((layer, flag, vertices));
        }
        i += 1;
    }
    out
}

fn layer_table(doc: &str) -> Vec<String> {
    let pairs = pairs(doc);
    pairs
        .windows(2)
        .filter(|w| w[0] == ("0".into(), "LAYER".into()) && w[1].0 == "2")
        .map(|w| w[1].1.clone())
        .collect()
}

fn square() -> Contour {
    Contour::closed(vec![
        IPoint::new(0, 0),
        IPoint::new(10_000, 0),
        IPoint::new(10_000, 10_000),
        IPoint::new(0, 10_000),
    ])
}

fn small_config() -> MazeConfig {
    MazeConfig {
        diameter: 150.0,
        ..Default::default()
    }
}

#[test]
fn dxf_polyline_flags_and_vertex_counts() {
    let mut shapes = ShapeSet::new();
    shapes.insert(ShapeClass::Boundary, vec![square()]);
    shapes.insert(
        ShapeClass::Corridors,
        vec![Contour::open(vec![
            IPoint::new(0, 0),
            IPoint::new(1_000, 0),
            IPoint::new(1_000, 1_500),
        ])],
    );
    let doc = write_dxf(&shapes);
    assert_eq!(
        polylines(&doc),
        vec![
            ("CORRIDORS".to_string(), "0".to_string(), 3),
            ("BOUNDARY".to_string(), "1".to_string(), 4),
        ]
    );
}

#[test]
fn dxf_sections_and_header() {
    let mut shapes = ShapeSet::new();
    shapes.insert(ShapeClass::Boundary, vec![square()]);
    let doc = write_dxf(&shapes);
    let pairs = pairs(&doc);
    assert_eq!(pairs.first(), Some(&("0".into(), "SECTION".into())));
    assert_eq!(pairs.last(), Some(&("0".into(), "EOF".into())));
    let pos = |k: &str| pairs.iter().position(|p| p.1 == k).unwrap();
    assert_eq!(pairs[pos("$ACADVER") + 1].1, "AC1009");
    assert_eq!(pairs[pos("$INSUNITS") + 1], ("70".into(), "4".into()));
    // y is mirrored: square spans 0..10 in x and -10..0 in y.
    let ext_min = pos("$EXTMIN");
    assert_eq!(pairs[ext_min + 1].1, "0");
    assert_eq!(pairs[ext_min + 2].1, "-10");
    let ext_max = pos("$EXTMAX");
    assert_eq!(pairs[ext_max + 1].1, "10");
    assert_eq!(pairs[ext_max + 2].1, "0");
    for section in ["HEADER", "TABLES", "ENTITIES"] {
        assert!(pairs.contains(&("2".into(), section.into())));
    }
    assert!(pairs.contains(&("2".into(), "CONTINUOUS".into())));
}

#[test]
fn dxf_layers_follow_present_classes() {
    let mut shapes = ShapeSet::new();
    shapes.insert(ShapeClass::Boundary, vec![square()]);
    shapes.insert(ShapeClass::EntryHole, vec![square()]);
    assert_eq!(layer_table(&write_dxf(&shapes)), vec!["CORRIDORS", "BOUNDARY"]);

    shapes.insert(ShapeClass::Wedge, vec![square()]);
    shapes.insert(ShapeClass::WedgeHole, vec![square()]);
    let doc = write_dxf(&shapes);
    assert_eq!(
        layer_table(&doc),
        vec!["CORRIDORS", "BOUNDARY", "WEDGE_CUT", "WEDGE_HOLE"]
    );
    // Holes are cut on the boundary layer.
    let layers: Vec<String> = polylines(&doc).into_iter().map(|p| p.0).collect();
    assert_eq!(layers, vec!["BOUNDARY", "BOUNDARY", "WEDGE_CUT", "WEDGE_HOLE"]);
}

#[test]
fn svg_document_shape() {
    let mut shapes = ShapeSet::new();
    shapes.insert(ShapeClass::Boundary, vec![square()]);
    shapes.insert(ShapeClass::Corridors, vec![square()]);
    shapes.insert(ShapeClass::CenterHole, Vec::new());
    let doc = write_svg(&shapes, 290.0, 10.0);
    assert!(doc.starts_with("<?xml"));
    assert!(doc.contains(r#"width="300mm" height="300mm" viewBox="-150 -150 300 300""#));
    assert!(doc.trim_end().ends_with("</svg>"));
    assert_eq!(doc.matches("<path").count(), 2);
    assert!(!doc.contains("center-hole"));

    let corridors = doc.lines().find(|l| l.contains(r#"id="corridors""#)).unwrap();
    assert!(corridors.contains(r#"fill-rule="evenodd""#));
    assert!(corridors.contains(r#"d="M 0 0 L 10 0 L 10 10 L 0 10 Z""#));
    let boundary = doc.lines().find(|l| l.contains(r#"id="boundary""#)).unwrap();
    assert!(boundary.contains(r#"fill="none""#));
    assert!(boundary.contains(r#"data-layer="BOUNDARY""#));
}

#[test]
fn job_walks_every_stage_once() {
    let model = generate(&small_config()).unwrap();
    let mut job = ExportJob::from_model(&model, ExportOptions::default()).unwrap();
    let mut seen = Vec::new();
    while job.stage() != Stage::Done {
        let progress = job.advance().unwrap();
        seen.push((progress.completed, progress.next));
    }
    assert_eq!(
        seen,
        vec![
            (Stage::Parse, Stage::Offset),
            (Stage::Offset, Stage::Union),
            (Stage::Union, Stage::Serialize),
            (Stage::Serialize, Stage::Done),
        ]
    );
    let again = job.advance().unwrap();
    assert_eq!(again.next, Stage::Done);
    assert_eq!(again.fraction(), 1.0);
}

#[test]
fn model_export_has_all_classes() {
    let model = generate(&small_config()).unwrap();
    let out = ExportJob::from_model(&model, ExportOptions::default())
        .unwrap()
        .run()
        .unwrap();
    assert!(out.warnings.is_empty());
    assert_eq!(out.format, ExportFormat::Svg);
    assert!(!out.shapes[&ShapeClass::Corridors].is_empty());
    assert_eq!(out.shapes[&ShapeClass::Boundary][0].points.len(), 64);
    assert_eq!(out.shapes[&ShapeClass::CenterHole].len(), 1);
    assert_eq!(out.shapes[&ShapeClass::EntryHole].len(), 1);
    assert!(!out.shapes.contains_key(&ShapeClass::Wedge));
    for id in ["corridors", "boundary", "center-hole", "entry-hole"] {
        assert!(out.document.contains(&format!(r#"id="{id}""#)));
    }
}

#[test]
fn wedge_export_to_dxf() {
    let cfg = MazeConfig {
        show_entry_wedge: true,
        ..small_config()
    };
    let model = generate(&cfg).unwrap();
    let options = ExportOptions {
        format: ExportFormat::Dxf,
        ..Default::default()
    };
    let out = ExportJob::from_model(&model, options).unwrap().run().unwrap();
    assert_eq!(out.shapes[&ShapeClass::Wedge].len(), 1);
    assert_eq!(out.shapes[&ShapeClass::WedgeHole].len(), 1);
    let layers = layer_table(&out.document);
    assert!(layers.contains(&"WEDGE_CUT".to_string()));
    assert!(layers.contains(&"WEDGE_HOLE".to_string()));
    // Every contour from the union is closed.
    assert!(polylines(&out.document).iter().all(|(_, flag, _)| flag == "1"));
}

#[test]
fn cancelling_between_stages() {
    let model = generate(&small_config()).unwrap();
    let job = ExportJob::from_model(&model, ExportOptions::default()).unwrap();
    let mut calls = 0;
    let err = job
        .run_with(|_| {
            calls += 1;
            if calls == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap_err();
    assert_eq!(err, ExportError::Cancelled { stage: Stage::Union });
}

#[test]
fn config_and_parse_errors_stay_distinct() {
    let bad = ExportInput {
        corridor_path: "M 0 0 L 1 0".into(),
        config: MazeConfig {
            difficulty: 9,
            ..Default::default()
        },
        start: None,
    };
    let err = ExportJob::new(bad, ExportOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ExportError::Config(MazeError::InvalidConfiguration { .. })
    ));

    let garbled = ExportInput {
        corridor_path: "M 0 0 Q 1 1".into(),
        config: MazeConfig::default(),
        start: None,
    };
    let err = ExportJob::new(garbled, ExportOptions::default())
        .unwrap()
        .run()
        .unwrap_err();
    assert_eq!(
        err,
        ExportError::Parse(ParseError::UnknownCommand {
            command: 'Q',
            offset: 6
        })
    );
}

#[test]
fn external_path_with_degenerate_subpath_still_exports() {
    let input = ExportInput {
        corridor_path: "M 0 0 L 0 0 M 0 0 L 10 0 L 10 10".into(),
        config: MazeConfig::default(),
        start: None,
    };
    let options = ExportOptions {
        join: Some(JoinStyle::Square),
        ..Default::default()
    };
    let out = ExportJob::new(input, options).unwrap().run().unwrap();
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].kind, DegenerateKind::ZeroLength);
    assert_eq!(out.shapes[&ShapeClass::Corridors].len(), 1);
    assert!(!out.shapes.contains_key(&ShapeClass::EntryHole));
    assert!(out.document.contains(r#"id="corridors""#));
}
