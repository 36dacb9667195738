//! # Facsimile Mapping
//!
//! Factories linking musical elements to regions of the page image.
//!
//! Zones live in `facsimile/surface`. Staves and system breaks never own a
//! zone; they carry its id in `facs` or `systemref`. None of these functions
//! touch the file system or walk the staff-group tree.

use crate::bbox::BoundingBox;
use crate::mei::MeiElement;

/// Create a `zone` element with a fresh id and the box coordinates.
pub fn make_zone(bbox: &BoundingBox) -> MeiElement {
    MeiElement::new("zone")
        .with_attribute("ulx", bbox.ulx.to_string())
        .with_attribute("uly", bbox.uly.to_string())
        .with_attribute("lrx", bbox.lrx.to_string())
        .with_attribute("lry", bbox.lry.to_string())
}

/// Create a `staff` element numbered `staff_number` that references `zone`.
pub fn attach_staff_to_zone(staff_number: u32, zone: &MeiElement) -> MeiElement {
    MeiElement::new("staff")
        .with_attribute("n", staff_number.to_string())
        .with_attribute("facs", zone.id())
}

/// Create an `sb` marking the start of the `ordinal`-th system (1-based).
pub fn make_system_break(system_ref_id: &str, ordinal: usize) -> MeiElement {
    MeiElement::new("sb")
        .with_attribute("systemref", system_ref_id)
        .with_attribute("n", ordinal.to_string())
}
