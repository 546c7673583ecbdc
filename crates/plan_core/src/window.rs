use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::interval::{self, Interval, Minute};

/// A weekday's operating hours. Days without a window are unrestricted; that
/// default lives inside [`enforce`], not at call sites.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Window {
    pub open: Minute,
    pub close: Minute,
}

impl Window {
    pub fn new(open: Minute, close: Minute) -> Result<Self, PlanError> {
        if open >= close || close > interval::DAY_END {
            return Err(PlanError::InvalidWindow { open, close });
        }
        Ok(Self { open, close })
    }

    pub fn as_interval(&self) -> Interval {
        Interval {
            start: self.open,
            end: self.close,
        }
    }
}

/// How intervals outside the window are treated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EnforceMode {
    /// Interactive composition: any interval outside the window fails with
    /// the full offender list so the user can adjust their request.
    Reject,
    /// Final safety pass before persistence: clip to the window, dropping
    /// intervals that collapse to nothing.
    Clip,
}

/// Validates or clips `proposed` against the day's window. No window means
/// the full day is available and the input passes through unchanged.
pub fn enforce(
    proposed: &[Interval],
    window: Option<&Window>,
    mode: EnforceMode,
) -> Result<Vec<Interval>, PlanError> {
    let Some(window) = window else {
        return Ok(proposed.to_vec());
    };
    let bounds = window.as_interval();

    match mode {
        EnforceMode::Reject => {
            let offending: Vec<Interval> = proposed
                .iter()
                .filter(|iv| !interval::within(iv, &bounds))
                .copied()
                .collect();
            if !offending.is_empty() {
                return Err(PlanError::OutsideWindow {
                    offending,
                    window: *window,
                });
            }
            Ok(proposed.to_vec())
        }
        EnforceMode::Clip => Ok(proposed
            .iter()
            .filter_map(|iv| interval::intersect(iv, &bounds))
            .collect()),
    }
}
