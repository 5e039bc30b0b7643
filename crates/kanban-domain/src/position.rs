//! Fractional position allocation.
//!
//! Positions are `f64` sort keys. Inserting between two neighbors takes the
//! midpoint, so no other item has to be renumbered. Repeated insertions at
//! the same spot halve the gap each time; after roughly fifty of them the
//! midpoint collapses onto a neighbor. [`PositionAllocator::fits`] detects
//! that, and the caller renumbers the container before allocating again.
//! Head insertions approach zero the same way.

/// Positions of the items on either side of an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Neighbors {
    pub before: Option<f64>,
    pub after: Option<f64>,
}

impl Neighbors {
    pub fn new(before: Option<f64>, after: Option<f64>) -> Self {
        Self { before, after }
    }
}

pub struct PositionAllocator;

impl PositionAllocator {
    /// `max + 1`, or `1` for an empty container.
    pub fn allocate_end<I>(positions: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        positions
            .into_iter()
            .fold(None, |max: Option<f64>, p| {
                Some(max.map_or(p, |m| m.max(p)))
            })
            .map_or(1.0, |max| max + 1.0)
    }

    /// Position ahead of the current first item. Assumes `after_pos > 0`.
    pub fn allocate_before(after_pos: f64) -> f64 {
        after_pos / 2.0
    }

    pub fn allocate_after(before_pos: f64) -> f64 {
        before_pos + 1.0
    }

    pub fn allocate_between(before_pos: f64, after_pos: f64) -> f64 {
        (before_pos + after_pos) / 2.0
    }

    /// Pick the rule matching which neighbors exist.
    pub fn allocate(neighbors: Neighbors) -> f64 {
        match (neighbors.before, neighbors.after) {
            (None, None) => Self::allocate_end(std::iter::empty()),
            (Some(before), None) => Self::allocate_after(before),
            (None, Some(after)) => Self::allocate_before(after),
            (Some(before), Some(after)) => Self::allocate_between(before, after),
        }
    }

    /// True when `candidate` sorts strictly between the neighbors.
    pub fn fits(neighbors: Neighbors, candidate: f64) -> bool {
        candidate.is_finite()
            && neighbors.before.map_or(true, |b| candidate > b)
            && neighbors.after.map_or(true, |a| candidate < a)
    }

    /// Whether a sequence is usable as-is: finite and strictly increasing.
    pub fn is_strictly_increasing<I>(positions: I) -> bool
    where
        I: IntoIterator<Item = f64>,
    {
        let mut previous: Option<f64> = None;
        for p in positions {
            if !p.is_finite() {
                return false;
            }
            if let Some(prev) = previous {
                if p <= prev {
                    return false;
                }
            }
            previous = Some(p);
        }
        true
    }

    /// Fresh integer positions `1..=n`.
    pub fn renumbered(count: usize) -> impl Iterator<Item = f64> {
        (1..=count).map(|i| i as f64)
    }
}
