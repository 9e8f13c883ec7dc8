//! Virtual positions into an external line source.

use std::cmp::Ordering;

/// A cursor into a line source, identified by ordinal.
///
/// `valid == false` means "past the end": there is no line at `vid`. Positions
/// are produced and stepped by a [`LineSource`](crate::source::LineSource); the
/// viewport never assumes a position stays valid across a change in the
/// source's line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VirtualPosition {
    /// Ordinal of the line in the source.
    pub vid: usize,
    /// Whether a line exists at `vid`.
    pub valid: bool,
}

impl VirtualPosition {
    /// Position at `vid`, valid when `vid < count`.
    pub fn at(vid: usize, count: usize) -> Self {
        Self {
            vid,
            valid: vid < count,
        }
    }

    /// Position at `vid` with no line behind it.
    pub fn invalid(vid: usize) -> Self {
        Self { vid, valid: false }
    }

    /// Ordering of two positions by ordinal.
    ///
    /// An invalid position sorts after every valid one, since it denotes
    /// "past the end".
    pub fn order(&self, other: &Self) -> Ordering {
        match (self.valid, other.valid) {
            (true, true) | (false, false) => self.vid.cmp(&other.vid),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}
