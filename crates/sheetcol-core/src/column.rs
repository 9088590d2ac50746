//! Column types and the column-range merge algebra
//!
//! A worksheet stores column metadata as a list of inclusive `[min, max]`
//! ranges. Every mutation goes through [`apply_range`], which explodes both
//! the incoming range and the existing ranges into single-column atoms, so
//! right after a mutation each touched column lives in exactly one range of
//! width 1.

use std::collections::HashMap;

/// Column metadata for an inclusive, 1-based span of columns
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRange {
    /// First column (1-based)
    pub min: u32,
    /// Last column (inclusive)
    pub max: u32,
    /// Width in character units (None = not set)
    pub width: Option<f64>,
    /// Column-level style index
    pub style: u32,
    /// Column is hidden
    pub hidden: bool,
    /// Outline/grouping level (0-7)
    pub outline_level: u8,
    /// Width was set explicitly
    pub custom_width: bool,
    /// Best fit (auto-sized)
    pub best_fit: bool,
    /// Column is collapsed (in outline)
    pub collapsed: bool,
    /// Show phonetic information
    pub phonetic: bool,
}

impl ColumnRange {
    /// Create a range with default attributes
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            width: None,
            style: 0,
            hidden: false,
            outline_level: 0,
            custom_width: false,
            best_fit: false,
            collapsed: false,
            phonetic: false,
        }
    }

    /// Create a range covering a single column
    pub fn single(col: u32) -> Self {
        Self::new(col, col)
    }

    /// Set width
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set hidden
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Set style index
    pub fn with_style(mut self, style: u32) -> Self {
        self.style = style;
        self
    }

    /// Set outline level
    pub fn with_outline_level(mut self, level: u8) -> Self {
        self.outline_level = level;
        self
    }

    /// Set custom width flag
    pub fn with_custom_width(mut self, custom_width: bool) -> Self {
        self.custom_width = custom_width;
        self
    }

    /// Check whether `col` falls inside this range
    pub fn contains(&self, col: u32) -> bool {
        self.min <= col && col <= self.max
    }

    /// Copy of this range narrowed to the single column `col`
    fn atom(&self, col: u32) -> Self {
        Self {
            min: col,
            max: col,
            ..self.clone()
        }
    }

    fn same_attributes(&self, other: &Self) -> bool {
        self.width == other.width
            && self.style == other.style
            && self.hidden == other.hidden
            && self.outline_level == other.outline_level
            && self.custom_width == other.custom_width
            && self.best_fit == other.best_fit
            && self.collapsed == other.collapsed
            && self.phonetic == other.phonetic
    }
}

/// The attribute group a column operation writes
///
/// Each accessor owns a fixed set of attributes. When its range overlaps an
/// existing one, the owned attributes come from the new range and every other
/// attribute is carried forward from the existing range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrOwner {
    /// `width` and `custom_width`
    Width,
    /// `style`
    Style,
    /// `hidden`
    Visibility,
    /// `outline_level`
    OutlineLevel,
}

impl AttrOwner {
    /// Merge an existing atom into a freshly built atom for the same column
    fn merge(self, fresh: &ColumnRange, existing: &ColumnRange) -> ColumnRange {
        let mut merged = ColumnRange {
            min: fresh.min,
            max: fresh.max,
            ..existing.clone()
        };
        match self {
            AttrOwner::Width => {
                merged.width = fresh.width;
                merged.custom_width = fresh.custom_width;
            }
            AttrOwner::Style => merged.style = fresh.style,
            AttrOwner::Visibility => merged.hidden = fresh.hidden,
            AttrOwner::OutlineLevel => merged.outline_level = fresh.outline_level,
        }
        merged
    }
}

/// Apply `range` on top of `existing`, returning the flattened result
///
/// The touched columns `[range.min, range.max]` come first in ascending
/// order, each initialised from `range` and then merged with every existing
/// atom for the same column. Untouched columns follow in their original
/// relative order. No column index appears twice in the result.
pub fn apply_range(range: &ColumnRange, existing: &[ColumnRange], owner: AttrOwner) -> Vec<ColumnRange> {
    debug_assert!(range.min <= range.max);

    let touched = (range.max - range.min + 1) as usize;
    let mut flat: Vec<ColumnRange> = Vec::with_capacity(touched + existing.len());
    let mut index: HashMap<u32, usize> = HashMap::with_capacity(touched);

    for col in range.min..=range.max {
        index.insert(col, flat.len());
        flat.push(range.atom(col));
    }

    for column in existing {
        for col in column.min..=column.max {
            match index.get(&col) {
                Some(&idx) => {
                    flat[idx] = owner.merge(&flat[idx], column);
                }
                None => {
                    index.insert(col, flat.len());
                    flat.push(column.atom(col));
                }
            }
        }
    }

    flat
}

/// Ordered collection of column ranges owned by a worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnRangeSet {
    ranges: Vec<ColumnRange>,
}

impl ColumnRangeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap ranges as read from a worksheet, without flattening them
    pub fn from_ranges(ranges: Vec<ColumnRange>) -> Self {
        Self { ranges }
    }

    /// The ranges in storage order
    pub fn ranges(&self) -> &[ColumnRange] {
        &self.ranges
    }

    /// Mutable access to the ranges
    pub fn ranges_mut(&mut self) -> &mut Vec<ColumnRange> {
        &mut self.ranges
    }

    /// Number of ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the set has no ranges
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate over the ranges
    pub fn iter(&self) -> impl Iterator<Item = &ColumnRange> {
        self.ranges.iter()
    }

    /// Apply a range through the merge algebra
    pub fn apply(&mut self, range: &ColumnRange, owner: AttrOwner) {
        self.ranges = apply_range(range, &self.ranges, owner);
    }

    /// Last range covering `col` (later ranges take precedence)
    pub fn last_covering(&self, col: u32) -> Option<&ColumnRange> {
        self.ranges.iter().rev().find(|r| r.contains(col))
    }

    /// Width of the last range covering `col` that has a width set
    pub fn width(&self, col: u32) -> Option<f64> {
        self.ranges
            .iter()
            .rev()
            .filter(|r| r.contains(col))
            .find_map(|r| r.width)
    }

    /// Sorted copy with adjacent equal-attribute ranges joined
    ///
    /// This does not change the attributes any column resolves to; it only
    /// shrinks the list for output. The set itself is left untouched.
    /// Overlapping ranges resolve by their order, so a set holding any is
    /// returned as stored.
    pub fn coalesced(&self) -> ColumnRangeSet {
        let mut sorted = self.ranges.clone();
        sorted.sort_by_key(|r| r.min);
        if sorted.windows(2).any(|w| w[0].max >= w[1].min) {
            return self.clone();
        }

        let mut out: Vec<ColumnRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match out.last_mut() {
                Some(prev)
                    if prev.max.checked_add(1) == Some(range.min) && prev.same_attributes(&range) =>
                {
                    prev.max = range.max;
                }
                _ => out.push(range),
            }
        }
        ColumnRangeSet { ranges: out }
    }
}
