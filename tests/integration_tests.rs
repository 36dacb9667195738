//! Integration tests for the OMR to MEI converter
//!
//! Tests the full pipeline from input files to the written MEI document.

use omrmei::{BarlineDataConverter, ConvertError, ConvertOptions};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TWO_STAVES: &str = "x\t10\t20\t30\t40\ty\tz\nx\t50\t60\t70\t80\ty\tz\n";

fn write_inputs(staff_data: &str) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let bars = dir.path().join("bar_position.txt");
    let staves = dir.path().join("staff_vertices.txt");
    fs::write(&bars, "1\t100\t200\n").unwrap();
    fs::write(&staves, staff_data).unwrap();
    (dir, bars, staves)
}

#[test]
fn test_two_staff_page() {
    let (_dir, bars, staves) = write_inputs(TWO_STAVES);
    let converter = BarlineDataConverter::new(&bars, &staves, ConvertOptions::default()).unwrap();
    let doc = converter.convert("(2)").unwrap();
    let root = doc.root();

    let score_def = root.descendants_by_name("scoreDef")[0];
    let staff_grps = score_def.descendants_by_name("staffGrp");
    assert_eq!(staff_grps.len(), 1);
    let numbers: Vec<_> = staff_grps[0]
        .children()
        .iter()
        .map(|c| (c.name(), c.attribute("n")))
        .collect();
    assert_eq!(numbers, vec![("staffDef", Some("1")), ("staffDef", Some("2"))]);

    let surface = root.descendants_by_name("surface")[0];
    let coords: Vec<Vec<&str>> = surface
        .children()
        .iter()
        .map(|zone| {
            ["ulx", "uly", "lrx", "lry"]
                .iter()
                .filter_map(|key| zone.attribute(key))
                .collect()
        })
        .collect();
    assert_eq!(coords, vec![vec!["10", "20", "30", "40"], vec!["50", "60", "70", "80"]]);
}

#[test]
fn test_written_file() {
    let (dir, bars, staves) = write_inputs(TWO_STAVES);
    let out = dir.path().join("page.mei");
    let converter = BarlineDataConverter::new(&bars, &staves, ConvertOptions::default()).unwrap();
    converter.convert_to_file("(1 (1))", &out).unwrap();

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<scoreDef"));
    assert_eq!(xml.matches("<staffGrp").count(), 2);
    assert_eq!(xml.matches("<staffDef").count(), 2);
    assert_eq!(xml.matches("<zone").count(), 2);
    assert!(xml.contains(r#"ulx="50" uly="60" lrx="70" lry="80""#));
}

#[test]
fn test_linked_staves_in_file() {
    let (dir, bars, staves) = write_inputs(TWO_STAVES);
    let out = dir.path().join("page.mei");
    let options = ConvertOptions {
        link_staves: true,
        ..ConvertOptions::default()
    };
    let converter = BarlineDataConverter::new(&bars, &staves, options).unwrap();
    converter.convert_to_file("(1)x2", &out).unwrap();

    let xml = fs::read_to_string(&out).unwrap();
    assert_eq!(xml.matches("<sb ").count(), 2);
    assert_eq!(xml.matches("<staff ").count(), 2);
    // Two staff zones plus one zone per system
    assert_eq!(xml.matches("<zone").count(), 4);
}

#[test]
fn test_missing_staff_file() {
    let (dir, bars, _) = write_inputs(TWO_STAVES);
    let missing = dir.path().join("nope.txt");
    assert!(matches!(
        BarlineDataConverter::new(&bars, &missing, ConvertOptions::default()),
        Err(ConvertError::InputNotFound { .. })
    ));
}

#[test]
fn test_grammar_error_writes_nothing() {
    let (dir, bars, staves) = write_inputs(TWO_STAVES);
    let out = dir.path().join("page.mei");
    let converter = BarlineDataConverter::new(&bars, &staves, ConvertOptions::default()).unwrap();

    for hint in ["(1 a)", "(1", "(1)xabc"] {
        let result = converter.convert_to_file(hint, &out);
        assert!(matches!(result, Err(ConvertError::Grammar { .. })), "hint {}", hint);
    }
    assert!(!out.exists());
}

#[test]
fn test_bad_staff_data_writes_nothing() {
    let (dir, bars, staves) = write_inputs("x\t10\t20\ty\tz\n");
    let out = dir.path().join("page.mei");
    let converter = BarlineDataConverter::new(&bars, &staves, ConvertOptions::default()).unwrap();
    assert!(matches!(
        converter.convert_to_file("(1)", &out),
        Err(ConvertError::StaffData { line: 1, .. })
    ));
    assert!(!out.exists());
}

#[test]
fn test_zone_ids_unique_across_run() {
    let data: String = (0..20)
        .map(|i| format!("s{}\t{}\t0\t100\t{}\ta\tb\n", i, i, i + 10))
        .collect();
    let (_dir, bars, staves) = write_inputs(&data);
    let converter = BarlineDataConverter::new(&bars, &staves, ConvertOptions::default()).unwrap();
    let doc = converter.convert("(4)x5").unwrap();

    let zones = doc.root().descendants_by_name("zone");
    assert_eq!(zones.len(), 20);
    let mut ids: Vec<_> = zones.iter().map(|z| z.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    for (i, zone) in zones.iter().enumerate() {
        assert_eq!(zone.attribute("ulx"), Some(i.to_string().as_str()));
    }
}

#[test]
fn test_library_convert_entry_point() {
    let boxes = omrmei::parse_staff_data(TWO_STAVES).unwrap();
    let xml = omrmei::convert("(2)", &boxes).unwrap();
    assert!(xml.contains(r#"<staffDef xml:id="#));
    assert!(xml.contains(r#"n="2""#));
}
