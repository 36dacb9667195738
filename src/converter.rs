//! # Document Assembly
//!
//! Wires the pipeline stages into one MEI document:
//!
//! ```text
//! mei
//!   ├── meiHead (fileDesc/titleStmt/title when a title is configured)
//!   └── music
//!         ├── facsimile
//!         │     └── surface
//!         │           ├── zone per staff bounding box (file order)
//!         │           └── zone per system (only when linking staves)
//!         └── body
//!               └── mdiv
//!                     └── score
//!                           ├── scoreDef
//!                           │     └── staffGrp (largest system)
//!                           └── section
//!                                 └── sb, staff... per system (only when linking staves)
//! ```
//!
//! Any failure while parsing the hint, building the staff groups or
//! selecting the representative system aborts the conversion; a partial
//! document is never returned.

use crate::ast::{HintToken, StaffGroup};
use crate::bbox::{read_staff_file, BoundingBox};
use crate::config::ConvertOptions;
use crate::error::ConvertError;
use crate::facsimile::{attach_staff_to_zone, make_system_break, make_zone};
use crate::mei::{MeiDocument, MeiElement};
use crate::parser::parse_hint;
use crate::staffgrp::{compile_systems, staff_group_to_mei};
use crate::system::{expand_systems, select_representative};
use crate::writer::write_document;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Build the MEI document for `hint` and the page's staff bounding boxes.
pub fn assemble_document(
    hint: &str,
    staff_boxes: &[BoundingBox],
    options: &ConvertOptions,
) -> Result<MeiDocument, ConvertError> {
    let tokens = parse_hint(hint)?;
    assemble_from_tokens(&tokens, staff_boxes, options)
}

/// Build the MEI document from already parsed hint tokens.
pub fn assemble_from_tokens(
    tokens: &[HintToken],
    staff_boxes: &[BoundingBox],
    options: &ConvertOptions,
) -> Result<MeiDocument, ConvertError> {
    let patterns = compile_systems(tokens)?;
    let systems = expand_systems(&patterns);
    let representative = select_representative(&systems)?;
    debug!(
        "{} systems on the page, encoding a staff group of {} staves",
        systems.len(),
        representative.staff_count()
    );

    let mut doc = MeiDocument::new();
    let root = doc.root_mut();

    root.add_child(build_head(options));

    let staff_zones: Vec<MeiElement> = staff_boxes.iter().map(make_zone).collect();

    let mut section = MeiElement::new("section");
    let mut system_zones = Vec::new();
    if options.link_staves {
        if let Some(links) = link_systems(&systems, staff_boxes, &staff_zones) {
            for (system_zone, elements) in links {
                system_zones.push(system_zone);
                for element in elements {
                    section.add_child(element);
                }
            }
        }
    }

    let mut surface = MeiElement::new("surface");
    for zone in staff_zones.into_iter().chain(system_zones) {
        surface.add_child(zone);
    }
    let mut facsimile = MeiElement::new("facsimile");
    facsimile.add_child(surface);

    let mut score_def = MeiElement::new("scoreDef");
    score_def.add_child(staff_group_to_mei(representative));

    let mut score = MeiElement::new("score");
    score.add_child(score_def);
    score.add_child(section);

    let mut mdiv = MeiElement::new("mdiv");
    mdiv.add_child(score);
    let mut body = MeiElement::new("body");
    body.add_child(mdiv);

    let mut music = MeiElement::new("music");
    music.add_child(facsimile);
    music.add_child(body);
    root.add_child(music);

    Ok(doc)
}

fn build_head(options: &ConvertOptions) -> MeiElement {
    let mut head = MeiElement::new("meiHead");
    if let Some(text) = &options.title {
        let mut title = MeiElement::new("title");
        title.set_text(text.as_str());
        let mut title_stmt = MeiElement::new("titleStmt");
        title_stmt.add_child(title);
        let mut file_desc = MeiElement::new("fileDesc");
        file_desc.add_child(title_stmt);
        head.add_child(file_desc);
    }
    head
}

/// Distribute staff zones over the systems in page order.
///
/// Returns, per system, its zone and the `sb` + `staff` elements for the
/// section. Returns `None` when the box count does not match the staves.
fn link_systems(
    systems: &[&StaffGroup],
    staff_boxes: &[BoundingBox],
    staff_zones: &[MeiElement],
) -> Option<Vec<(MeiElement, Vec<MeiElement>)>> {
    let total_staves: usize = systems.iter().map(|s| s.staff_count()).sum();
    if total_staves != staff_boxes.len() {
        warn!(
            "staff file has {} bounding boxes but the systems contain {} staves; not linking staves to zones",
            staff_boxes.len(),
            total_staves
        );
        return None;
    }

    let mut links = Vec::with_capacity(systems.len());
    let mut offset = 0;

    for (i, system) in systems.iter().enumerate() {
        let numbers = system.staff_numbers();
        let boxes = &staff_boxes[offset..offset + numbers.len()];
        let zones = &staff_zones[offset..offset + numbers.len()];
        offset += numbers.len();

        let Some(bounds) = boxes.iter().copied().reduce(|a, b| a.union(&b)) else {
            debug!("system {} has no staves, skipping", i + 1);
            continue;
        };

        let system_zone = make_zone(&bounds);
        let mut elements = vec![make_system_break(system_zone.id(), i + 1)];
        elements.extend(
            numbers
                .iter()
                .zip(zones)
                .map(|(&n, zone)| attach_staff_to_zone(n, zone)),
        );
        links.push((system_zone, elements));
    }

    Some(links)
}

/// Converts OMR barline and staff output files to MEI.
pub struct BarlineDataConverter {
    bar_input_path: PathBuf,
    staff_input_path: PathBuf,
    options: ConvertOptions,
}

impl BarlineDataConverter {
    /// Both input files must exist before any parsing happens.
    pub fn new(
        bar_input_path: impl Into<PathBuf>,
        staff_input_path: impl Into<PathBuf>,
        options: ConvertOptions,
    ) -> Result<Self, ConvertError> {
        let bar_input_path = bar_input_path.into();
        let staff_input_path = staff_input_path.into();

        for path in [&bar_input_path, &staff_input_path] {
            if !path.exists() {
                return Err(ConvertError::InputNotFound { path: path.clone() });
            }
        }

        Ok(Self {
            bar_input_path,
            staff_input_path,
            options,
        })
    }

    pub fn bar_input_path(&self) -> &Path {
        &self.bar_input_path
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Build the document for the staff-group hint `hint`.
    pub fn convert(&self, hint: &str) -> Result<MeiDocument, ConvertError> {
        let tokens = parse_hint(hint)?;
        let staff_boxes = read_staff_file(&self.staff_input_path)?;
        assemble_from_tokens(&tokens, &staff_boxes, &self.options)
    }

    /// Convert and write the document to `output_path`.
    pub fn convert_to_file(&self, hint: &str, output_path: &Path) -> Result<(), ConvertError> {
        let doc = self.convert(hint)?;
        write_document(&doc, output_path, self.options.indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn boxes(n: u32) -> Vec<BoundingBox> {
        (0..n)
            .map(|i| BoundingBox::new(10.0, f64::from(100 * i), 900.0, f64::from(100 * i + 80)))
            .collect()
    }

    fn linked() -> ConvertOptions {
        ConvertOptions {
            link_staves: true,
            ..ConvertOptions::default()
        }
    }

    #[test]
    fn test_document_skeleton() {
        let doc = assemble_document("(2)", &boxes(2), &ConvertOptions::default()).unwrap();
        let root = doc.root();
        assert!(root.child("meiHead").is_some());

        let music = root.child("music").unwrap();
        let names: Vec<_> = music.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["facsimile", "body"]);

        let score = music
            .child("body")
            .and_then(|b| b.child("mdiv"))
            .and_then(|m| m.child("score"))
            .unwrap();
        let names: Vec<_> = score.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["scoreDef", "section"]);
    }

    #[test]
    fn test_score_def_uses_largest_system() {
        let doc = assemble_document("(4) (2 (2 2)) (5)", &[], &ConvertOptions::default()).unwrap();
        let score_def = doc.root().descendants_by_name("scoreDef")[0];
        assert_eq!(score_def.descendants_by_name("staffDef").len(), 6);
        assert_eq!(score_def.descendants_by_name("staffGrp").len(), 2);
    }

    #[test]
    fn test_zones_follow_file_order() {
        let doc = assemble_document("(3)", &boxes(3), &ConvertOptions::default()).unwrap();
        let uly: Vec<_> = doc
            .root()
            .descendants_by_name("zone")
            .into_iter()
            .filter_map(|z| z.attribute("uly"))
            .collect();
        assert_eq!(uly, vec!["0", "100", "200"]);
    }

    #[test]
    fn test_section_empty_without_linking() {
        let doc = assemble_document("(2)", &boxes(2), &ConvertOptions::default()).unwrap();
        assert!(doc.root().descendants_by_name("section")[0].children().is_empty());
        assert!(doc.root().descendants_by_name("staff").is_empty());
    }

    #[test]
    fn test_title_in_header() {
        let options = ConvertOptions {
            title: Some("Etude No. 2".to_string()),
            ..ConvertOptions::default()
        };
        let doc = assemble_document("(1)", &[], &options).unwrap();
        let title = doc.root().descendants_by_name("title")[0];
        assert_eq!(title.text(), Some("Etude No. 2"));
    }

    #[test]
    fn test_linking_staves_to_zones() {
        // Two systems of a grand staff plus a condensed one-staff system
        let doc = assemble_document("(2)x2 (1)", &boxes(5), &linked()).unwrap();
        let root = doc.root();

        let section = root.descendants_by_name("section")[0];
        let layout: Vec<_> = section
            .children()
            .iter()
            .map(|c| format!("{}{}", c.name(), c.attribute("n").unwrap_or("")))
            .collect();
        assert_eq!(
            layout,
            vec!["sb1", "staff1", "staff2", "sb2", "staff1", "staff2", "sb3", "staff1"]
        );

        // 5 staff zones followed by 3 system zones
        let zones = root.descendants_by_name("zone");
        assert_eq!(zones.len(), 8);

        let staves = root.descendants_by_name("staff");
        for (staff, zone) in staves.iter().zip(&zones[..5]) {
            assert_eq!(staff.attribute("facs"), Some(zone.id()));
        }

        let second_sb = &section.children()[3];
        let system_zone = root.find_by_id(second_sb.attribute("systemref").unwrap()).unwrap();
        assert_eq!(system_zone.attribute("uly"), Some("200"));
        assert_eq!(system_zone.attribute("lry"), Some("380"));
    }

    #[test]
    fn test_linking_skipped_on_count_mismatch() {
        let doc = assemble_document("(2)x2", &boxes(3), &linked()).unwrap();
        assert!(doc.root().descendants_by_name("staff").is_empty());
        assert_eq!(doc.root().descendants_by_name("zone").len(), 3);
    }

    #[test]
    fn test_all_ids_unique() {
        let doc = assemble_document("(2)x2 (1)", &boxes(5), &linked()).unwrap();
        let mut ids = HashSet::new();
        let mut stack = vec![doc.root()];
        while let Some(element) = stack.pop() {
            assert!(ids.insert(element.id().to_string()));
            stack.extend(element.children());
        }
    }

    #[test]
    fn test_grammar_error_aborts() {
        assert!(matches!(
            assemble_document("(1) (2", &boxes(3), &ConvertOptions::default()),
            Err(ConvertError::Grammar { .. })
        ));
    }

    #[test]
    fn test_empty_hint_is_no_systems() {
        assert!(matches!(
            assemble_document("  ", &[], &ConvertOptions::default()),
            Err(ConvertError::NoSystems)
        ));
    }

    #[test]
    fn test_converter_requires_existing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let staff = dir.path().join("staff.txt");
        std::fs::write(&staff, "x\t1\t2\t3\t4\ty\tz\n").unwrap();
        let missing = dir.path().join("bars.txt");

        match BarlineDataConverter::new(&missing, &staff, ConvertOptions::default()) {
            Err(ConvertError::InputNotFound { path }) => assert_eq!(path, missing),
            other => panic!("Expected missing input error, got {:?}", other.err()),
        }
    }
}
