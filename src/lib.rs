pub mod ast;
pub mod bbox;
pub mod config;
pub mod converter;
pub mod error;
pub mod facsimile;
pub mod lexer;
pub mod mei;
pub mod parser;
pub mod staffgrp;
pub mod system;
pub mod writer;

pub use ast::*;
pub use bbox::{parse_staff_data, read_staff_file, BoundingBox};
pub use config::ConvertOptions;
pub use converter::{assemble_document, BarlineDataConverter};
pub use error::*;
pub use mei::{MeiDocument, MeiElement};
pub use parser::parse_hint;
pub use staffgrp::{build_staff_group, compile_systems};
pub use system::{expand_systems, select_representative};
pub use writer::{to_xml_string, write_document};

/// Convert a staff-group hint and the page's staff bounding boxes to MEI.
/// This is the main entry point for the library.
pub fn convert(hint: &str, staff_boxes: &[BoundingBox]) -> Result<String, ConvertError> {
    let options = ConvertOptions::default();
    let doc = assemble_document(hint, staff_boxes, &options)?;
    to_xml_string(&doc, options.indent)
}

/// Convert with custom options (title, indentation, staff linking)
pub fn convert_with_options(
    hint: &str,
    staff_boxes: &[BoundingBox],
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    let doc = assemble_document(hint, staff_boxes, options)?;
    to_xml_string(&doc, options.indent)
}
