//! # Staff Group Builder
//!
//! Turns a [`ParsedGroup`] into a [`StaffGroup`] tree with staff numbers.
//!
//! Items are visited depth-first, left to right. The staff counter is
//! threaded through the recursion and returned, never reset per sibling or
//! per nesting level, so numbering is contiguous across the whole tree.
//!
//! ```text
//! (1 (1 1))  =>  StaffGroup
//!                  ├── Staff(1)
//!                  └── StaffGroup
//!                        ├── Staff(2)
//!                        └── Staff(3)
//! ```

use crate::ast::*;
use crate::error::ConvertError;
use crate::mei::MeiElement;
use tracing::info;

/// Build a staff group from `parsed`, numbering staves after `counter`.
///
/// Returns the group and the last staff number used (equal to `counter`
/// when the group is empty), or `None` if numbering would pass `u32::MAX`.
pub fn build_staff_group(parsed: &ParsedGroup, counter: u32) -> Option<(StaffGroup, u32)> {
    let mut group = StaffGroup::new();
    let mut n = counter;

    for item in &parsed.items {
        match item {
            GroupItem::Count(k) => {
                let last = n.checked_add(*k)?;
                group
                    .children
                    .extend((n + 1..=last).map(StaffGroupNode::Staff));
                n = last;
            }
            GroupItem::Nested(nested) => {
                let (child, next) = build_staff_group(nested, n)?;
                group.children.push(StaffGroupNode::Group(child));
                n = next;
            }
        }
    }

    Some((group, n))
}

/// Compile every hint token into a system pattern, each numbered from 1.
pub fn compile_systems(tokens: &[HintToken]) -> Result<Vec<SystemPattern>, ConvertError> {
    tokens
        .iter()
        .map(|token| {
            let (group, staves) =
                build_staff_group(&token.group, 0).ok_or_else(|| ConvertError::Grammar {
                    token: token.source.clone(),
                    column: 1,
                    message: "Too many staves to number".to_string(),
                })?;
            info!(
                "number of staves in system: {} x {} system(s)",
                staves,
                token.repeat
            );
            Ok(SystemPattern {
                group,
                repeat: token.repeat,
            })
        })
        .collect()
}

/// Render a staff group as nested `staffGrp` / `staffDef` elements.
pub fn staff_group_to_mei(group: &StaffGroup) -> MeiElement {
    let mut staff_grp = MeiElement::new("staffGrp");
    for child in &group.children {
        match child {
            StaffGroupNode::Group(nested) => staff_grp.add_child(staff_group_to_mei(nested)),
            StaffGroupNode::Staff(n) => {
                staff_grp.add_child(MeiElement::new("staffDef").with_attribute("n", n.to_string()))
            }
        }
    }
    staff_grp
}
