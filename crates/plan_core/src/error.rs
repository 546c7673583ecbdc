use chrono::Weekday;
use thiserror::Error;

use crate::conflict::Conflict;
use crate::interval::{Interval, Minute};
use crate::window::Window;

/// Recoverable rejections surfaced to the calling layer. Every variant
/// carries the data needed to render a precise message or to retry the
/// request with a different strategy.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    #[error("invalid interval: start {start} must precede end {end} within 0..=1440")]
    InvalidInterval { start: Minute, end: Minute },

    #[error("invalid window: opens at {open} but closes at {close}")]
    InvalidWindow { open: Minute, close: Minute },

    #[error("break {brk:?} falls outside its block {block:?}")]
    BreakOutsideBlock { block: Interval, brk: Interval },

    #[error("block {block:?} is entirely covered by its breaks")]
    FullyCovered { block: Interval },

    #[error("{} interval(s) fall outside the operating window {window:?}", .offending.len())]
    OutsideWindow {
        offending: Vec<Interval>,
        window: Window,
    },

    #[error("{} conflict(s) with existing items", .conflicts.len())]
    Conflicts { conflicts: Vec<Conflict> },

    #[error("weekday {weekday} is locked: its day is open and not yet shut down")]
    WeekdayLocked { weekday: Weekday },
}
