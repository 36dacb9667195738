//! Staff bounding boxes read from the OMR staff file.
//!
//! Each line is tab separated. The fields after the first and before the
//! last two are the coordinates `ulx, uly, lrx, lry` in page pixels:
//!
//! ```text
//! <label>\t<ulx>\t<uly>\t<lrx>\t<lry>\t<extra>\t<extra>
//! ```

use crate::error::ConvertError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Rectangle in page-pixel space. Coordinates are finite and non-negative;
/// OMR output may carry sub-pixel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub ulx: f64,
    pub uly: f64,
    pub lrx: f64,
    pub lry: f64,
}

impl BoundingBox {
    pub fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Self {
        Self { ulx, uly, lrx, lry }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            ulx: self.ulx.min(other.ulx),
            uly: self.uly.min(other.uly),
            lrx: self.lrx.max(other.lrx),
            lry: self.lry.max(other.lry),
        }
    }
}

/// Parse one staff-file line. `line_number` is only used for errors.
pub fn parse_staff_line(line: &str, line_number: usize) -> Result<BoundingBox, ConvertError> {
    let fields: Vec<&str> = line.trim_end_matches(&['\r', '\n'][..]).split('\t').collect();

    let coords = if fields.len() >= 3 {
        &fields[1..fields.len() - 2]
    } else {
        &[][..]
    };
    if coords.len() != 4 {
        return Err(ConvertError::StaffData {
            line: line_number,
            message: format!("expected 4 coordinates, found {}", coords.len()),
        });
    }

    let mut values = [0f64; 4];
    for (value, field) in values.iter_mut().zip(coords) {
        let field = field.trim();
        *value = field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| ConvertError::StaffData {
                line: line_number,
                message: format!("'{}' is not a pixel coordinate", field),
            })?;
    }

    Ok(BoundingBox::new(values[0], values[1], values[2], values[3]))
}

/// Parse staff-file content, one box per non-blank line, in file order.
pub fn parse_staff_data(content: &str) -> Result<Vec<BoundingBox>, ConvertError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_staff_line(line, i + 1))
        .collect()
}

/// Read every staff bounding box from `path`.
pub fn read_staff_file(path: &Path) -> Result<Vec<BoundingBox>, ConvertError> {
    let content = fs::read_to_string(path)?;
    let boxes = parse_staff_data(&content)?;
    debug!("read {} staff bounding boxes from {}", boxes.len(), path.display());
    Ok(boxes)
}
