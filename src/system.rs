//! # System Selection
//!
//! A page is a sequence of physical systems. Each [`SystemPattern`] stands
//! for `repeat` consecutive systems sharing one staff group.
//!
//! Systems on a page may hide staves (a condensed system can drop a silent
//! instrument). The score definition therefore declares the staff group of
//! the system with the most staves, and hidden staves are suppressed later
//! without redefining the group.

use crate::ast::*;
use crate::error::ConvertError;
use tracing::debug;

/// Expand patterns into one entry per physical system, in page order.
///
/// Repeats borrow the same compiled group rather than copying it.
pub fn expand_systems(patterns: &[SystemPattern]) -> Vec<&StaffGroup> {
    patterns
        .iter()
        .flat_map(|pattern| std::iter::repeat(&pattern.group).take(pattern.repeat as usize))
        .collect()
}

/// Select the system with the most staves; the first one wins a tie.
pub fn select_representative<'a>(systems: &[&'a StaffGroup]) -> Result<&'a StaffGroup, ConvertError> {
    let mut best: Option<(usize, &'a StaffGroup)> = None;

    for (index, &group) in systems.iter().enumerate() {
        let count = group.staff_count();
        match best {
            Some((best_count, _)) if best_count >= count => {}
            _ => {
                debug!("system {} is the largest so far with {} staves", index + 1, count);
                best = Some((count, group));
            }
        }
    }

    best.map(|(_, group)| group).ok_or(ConvertError::NoSystems)
}
