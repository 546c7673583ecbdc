use serde::{Deserialize, Serialize};

use crate::interval::{self, Interval};
use crate::model::ScheduleItem;

/// One overlap between a proposed item and an existing one, with enough
/// detail for the user to decide how to resolve it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conflict {
    pub overlap: Interval,
    pub proposed_label: Option<String>,
    pub existing_label: Option<String>,
}

/// Finds every overlapping `(proposed, existing)` pair. Touching intervals
/// are not conflicts. An empty result means the proposal can be persisted
/// as-is once window enforcement has run.
pub fn detect(proposed: &[ScheduleItem], existing: &[ScheduleItem]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for p in proposed {
        for e in existing {
            if let Some(overlap) = interval::intersect(&p.interval, &e.interval) {
                conflicts.push(Conflict {
                    overlap,
                    proposed_label: p.label.clone(),
                    existing_label: e.label.clone(),
                });
            }
        }
    }
    conflicts
}

/// Collapses conflicts that report the exact same overlap span. A standing
/// push across several weekdays hits the same physical clash once per
/// weekday; the user should see it once.
pub fn dedup_overlaps(mut conflicts: Vec<Conflict>) -> Vec<Conflict> {
    let mut seen = std::collections::HashSet::new();
    conflicts.retain(|c| seen.insert((c.overlap.start, c.overlap.end)));
    conflicts
}
