use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Minute offset into a local day. Valid endpoints are 0..=1440.
pub type Minute = u16;

pub const DAY_END: Minute = 1440;

/// Half-open minute range `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub start: Minute,
    pub end: Minute,
}

impl Interval {
    /// Builds a validated interval. `start >= end` and endpoints past the end
    /// of the day are rejected before any algebra sees them.
    pub fn new(start: Minute, end: Minute) -> Result<Self, PlanError> {
        if start >= end || end > DAY_END {
            return Err(PlanError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn len(&self) -> Minute {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True when another interval shares at least one minute with this one.
    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// True iff `inner` lies entirely inside `container`.
pub fn within(inner: &Interval, container: &Interval) -> bool {
    container.start <= inner.start && inner.end <= container.end
}

/// Shared minutes of `a` and `b`, or `None` when they only touch or are apart.
pub fn intersect(a: &Interval, b: &Interval) -> Option<Interval> {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    if start >= end {
        return None;
    }
    Some(Interval { start, end })
}

/// Minimal disjoint cover of the inputs: sorted by start, with overlapping or
/// adjacent intervals folded together.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals.to_vec();
    sorted.sort();

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for next in sorted {
        match merged.last_mut() {
            Some(acc) if next.start <= acc.end => {
                acc.end = acc.end.max(next.end);
            }
            _ => merged.push(next),
        }
    }
    merged
}

/// Parts of `base` not covered by any blocker, in order. Blockers are merged
/// first; the walk emits the gap before each clipped blocker and whatever
/// remains after the last one. May be empty.
pub fn subtract(base: &Interval, blockers: &[Interval]) -> Vec<Interval> {
    let mut gaps = Vec::new();
    let mut cursor = base.start;

    for blocker in merge(blockers) {
        if blocker.end <= base.start || blocker.start >= base.end {
            continue;
        }
        if cursor < blocker.start {
            gaps.push(Interval {
                start: cursor,
                end: blocker.start,
            });
        }
        cursor = cursor.max(blocker.end);
        if cursor >= base.end {
            break;
        }
    }

    if cursor < base.end {
        gaps.push(Interval {
            start: cursor,
            end: base.end,
        });
    }
    gaps
}
