//! Partitioning of a program into consecutive segments.

use std::ops::Range;

use crate::params::LayerIndex;

/// A half-open line range `[start, end)` of the source program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First line (inclusive).
    pub start: usize,
    /// Last line (exclusive).
    pub end: usize,
}

impl Segment {
    /// Line range covered by the segment.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of lines in the segment.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the segment covers no lines.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Position of a segment within the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// The only segment: nothing precedes or follows it.
    Only,
    /// First of several segments.
    First,
    /// Neither first nor last.
    Middle,
    /// Last of several segments.
    Last,
}

impl SegmentRole {
    /// Role of the segment at 1-based `ordinal` out of `count`.
    pub fn of(ordinal: usize, count: usize) -> Self {
        match (ordinal == 1, ordinal == count) {
            (true, true) => SegmentRole::Only,
            (true, false) => SegmentRole::First,
            (false, false) => SegmentRole::Middle,
            (false, true) => SegmentRole::Last,
        }
    }

    /// True for segments that start at the beginning of the program.
    pub fn is_first(self) -> bool {
        matches!(self, SegmentRole::Only | SegmentRole::First)
    }

    /// True for segments that finish the print.
    pub fn is_last(self) -> bool {
        matches!(self, SegmentRole::Only | SegmentRole::Last)
    }
}

/// Split a program of `len` lines at the found layer positions.
///
/// The returned segments are contiguous and together cover `[0, len)`.
pub fn segments(layers: &LayerIndex, len: usize) -> Vec<Segment> {
    let mut starts: Vec<usize> = std::iter::once(0)
        .chain(layers.values().copied())
        .filter(|&start| start <= len)
        .collect();
    starts.sort_unstable();
    starts.dedup();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| Segment {
            start,
            end: starts.get(i + 1).copied().unwrap_or(len),
        })
        .collect()
}
