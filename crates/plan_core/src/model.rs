use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// How deep a block of work is expected to be. Level 1 is light/admin work,
/// level 3 is fully protected deep focus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum DepthLevel {
    Light,
    Deep,
    Peak,
}

/// Where a day item came from: copied out of the weekly standing routine at
/// day-open time, or added as a one-off for that date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Origin {
    Standing,
    SingleDay,
}

/// Execution state of a day item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlockStatus {
    Planned,
    Active,
    Done,
    Skipped,
}

/// The atomic persisted unit of a plan: one interval of one day (or one
/// weekday's routine) with its depth, optional label, and optional goal link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleItem {
    pub interval: Interval,
    pub depth: DepthLevel,
    pub label: Option<String>,
    pub goal_id: Option<String>,
    pub origin: Origin,
    pub status: BlockStatus,
    pub actual_minutes: u32,
}

impl ScheduleItem {
    pub fn standing(
        interval: Interval,
        depth: DepthLevel,
        label: Option<String>,
        goal_id: String,
    ) -> Self {
        Self {
            interval,
            depth,
            label,
            goal_id: Some(goal_id),
            origin: Origin::Standing,
            status: BlockStatus::Planned,
            actual_minutes: 0,
        }
    }

    pub fn single_day(
        interval: Interval,
        depth: DepthLevel,
        label: Option<String>,
        goal_id: Option<String>,
    ) -> Self {
        Self {
            interval,
            depth,
            label,
            goal_id,
            origin: Origin::SingleDay,
            status: BlockStatus::Planned,
            actual_minutes: 0,
        }
    }

    /// Same item over a different span. Used when a resolution strategy trims
    /// or fragments an item around existing commitments.
    pub fn with_interval(&self, interval: Interval) -> Self {
        Self {
            interval,
            ..self.clone()
        }
    }
}

/// Sorts a scope's items chronologically. Resolved sets are always returned
/// in this order.
pub fn sort_by_start(items: &mut [ScheduleItem]) {
    items.sort_by_key(|item| item.interval.start);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    #[test]
    fn with_interval_keeps_everything_but_the_span() {
        let item = ScheduleItem::standing(
            Interval::new(540, 660).unwrap(),
            DepthLevel::Peak,
            Some("Writing".to_string()),
            "goal-1".to_string(),
        );
        let moved = item.with_interval(Interval::new(720, 780).unwrap());
        assert_eq!(moved.label.as_deref(), Some("Writing"));
        assert_eq!(moved.goal_id.as_deref(), Some("goal-1"));
        assert_eq!(moved.depth, DepthLevel::Peak);
        assert_eq!(moved.interval, Interval::new(720, 780).unwrap());
    }

    #[test]
    fn schedule_item_survives_serde_round_trip() {
        let item = ScheduleItem::single_day(
            Interval::new(600, 645).unwrap(),
            DepthLevel::Light,
            None,
            None,
        );
        let json = serde_json::to_string(&item).unwrap();
        let back: ScheduleItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
