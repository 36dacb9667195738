//! # Staff Group Types
//!
//! Types produced by each stage of the staff-group pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! HintToken                     one top-level "( ... )xN" unit
//!   ├── source: String
//!   ├── group: ParsedGroup
//!   │     └── Vec<GroupItem>   (Count(k) | Nested(ParsedGroup))
//!   └── repeat: u32
//!
//! SystemPattern                 compiled HintToken
//!   ├── group: StaffGroup
//!   │     └── Vec<StaffGroupNode> (Group(StaffGroup) | Staff(n))
//!   └── repeat: u32
//! ```
//!
//! ## Key Concepts
//!
//! ### Staff numbering
//! Staff numbers are assigned depth-first, left to right, starting at 1
//! within one compiled tree. `"(1 (1 1))"` numbers the outer staff 1 and the
//! nested staves 2 and 3.
//!
//! ### Repeats
//! A `x<N>` suffix repeats a whole system pattern. Repeats are never copied:
//! every physical system of a pattern refers to the same `StaffGroup`.
//!
//! ## Related Modules
//! - `parser` - Creates `HintToken`s from the hint string
//! - `staffgrp` - Builds `StaffGroup` trees from `ParsedGroup`s
//! - `system` - Expands and selects between compiled systems

/// One element of a parsed group, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupItem {
    /// A run of `k` sibling staves
    Count(u32),
    /// A parenthesised subgroup
    Nested(ParsedGroup),
}

/// Nested list parsed from the body of one hint token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedGroup {
    pub items: Vec<GroupItem>,
}

impl ParsedGroup {
    pub fn new(items: Vec<GroupItem>) -> Self {
        Self { items }
    }

    /// Total number of staves described by this group and its subgroups.
    pub fn staff_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| match item {
                GroupItem::Count(k) => u64::from(*k),
                GroupItem::Nested(group) => group.staff_count(),
            })
            .sum()
    }
}

/// A parsed top-level hint token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintToken {
    /// Source text of the token, including any repeat suffix
    pub source: String,
    pub group: ParsedGroup,
    /// Number of consecutive systems sharing this pattern (default 1)
    pub repeat: u32,
}

/// Node of a compiled staff-group tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffGroupNode {
    Group(StaffGroup),
    /// A single staff with its 1-based staff number
    Staff(u32),
}

/// A staff group: an ordered list of subgroups and staves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaffGroup {
    pub children: Vec<StaffGroupNode>,
}

impl StaffGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of staves anywhere below this group.
    pub fn staff_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                StaffGroupNode::Group(group) => group.staff_count(),
                StaffGroupNode::Staff(_) => 1,
            })
            .sum()
    }

    /// Staff numbers in depth-first, left-to-right order.
    pub fn staff_numbers(&self) -> Vec<u32> {
        let mut numbers = Vec::with_capacity(self.staff_count());
        self.collect_staff_numbers(&mut numbers);
        numbers
    }

    fn collect_staff_numbers(&self, numbers: &mut Vec<u32>) {
        for child in &self.children {
            match child {
                StaffGroupNode::Group(group) => group.collect_staff_numbers(numbers),
                StaffGroupNode::Staff(n) => numbers.push(*n),
            }
        }
    }
}

/// A compiled hint token: one staff group shared by `repeat` systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPattern {
    pub group: StaffGroup,
    pub repeat: u32,
}
