use serde::{Deserialize, Serialize};

use crate::conflict::{self, Conflict};
use crate::interval::{self, Interval};
use crate::model::{self, ScheduleItem};

/// How a conflicted proposal should be settled. There is no default: a
/// destructive choice must arrive explicitly from the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Strategy {
    /// Wipe the scope's existing set and insert the proposal verbatim.
    Replace,
    /// Proposed items win within their span; existing items that overlap any
    /// proposed item are deleted, the rest are kept.
    MergeOverwrite,
    /// Existing items are untouched; proposed items are trimmed to the gaps
    /// between them. Fragments keep the original label, depth, and goal.
    OnlyNewInGaps,
}

/// First stage of the proposal state machine: either the proposal is clean
/// and already resolved, or the caller must pick a [`Strategy`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Clean(Vec<ScheduleItem>),
    Conflicted(Vec<Conflict>),
}

/// Checks a proposal against the pre-mutation existing set. A clean proposal
/// resolves by straight insertion; a conflicted one reports the conflicts and
/// waits for an explicit strategy.
pub fn evaluate(proposed: &[ScheduleItem], existing: &[ScheduleItem]) -> Outcome {
    let conflicts = conflict::detect(proposed, existing);
    if !conflicts.is_empty() {
        return Outcome::Conflicted(conflicts);
    }
    let mut resolved: Vec<ScheduleItem> = existing.to_vec();
    resolved.extend(proposed.iter().cloned());
    model::sort_by_start(&mut resolved);
    Outcome::Clean(resolved)
}

/// Computes the final item set for the scope under the chosen strategy.
///
/// Conflicts are always taken against the pre-mutation `existing` set;
/// nothing here compounds against partially-applied changes. The result is
/// sorted by start and, provided the proposal itself is pairwise disjoint,
/// pairwise disjoint as well.
pub fn resolve(
    strategy: Strategy,
    proposed: &[ScheduleItem],
    existing: &[ScheduleItem],
) -> Vec<ScheduleItem> {
    let mut resolved = match strategy {
        Strategy::Replace => proposed.to_vec(),
        Strategy::MergeOverwrite => {
            let mut kept: Vec<ScheduleItem> = existing
                .iter()
                .filter(|e| !proposed.iter().any(|p| p.interval.overlaps(&e.interval)))
                .cloned()
                .collect();
            kept.extend(proposed.iter().cloned());
            kept
        }
        Strategy::OnlyNewInGaps => {
            let blocked: Vec<Interval> = conflict::detect(proposed, existing)
                .into_iter()
                .map(|c| c.overlap)
                .collect();
            let blocked = interval::merge(&blocked);

            let mut kept: Vec<ScheduleItem> = existing.to_vec();
            for item in proposed {
                // An item fully inside the blocked cover fragments to nothing
                // and is dropped: the whole proposal was already scheduled.
                for gap in interval::subtract(&item.interval, &blocked) {
                    kept.push(item.with_interval(gap));
                }
            }
            kept
        }
    };
    model::sort_by_start(&mut resolved);
    resolved
}
