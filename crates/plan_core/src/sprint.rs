use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::interval::{self, Interval};
use crate::model::DepthLevel;

/// A contiguous stretch of a block left over after its breaks are removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sprint {
    pub interval: Interval,
    pub depth: DepthLevel,
    pub label: Option<String>,
}

/// Output of sprint composition: the sprints in chronological order plus the
/// merged form of the breaks that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SprintSet {
    pub sprints: Vec<Sprint>,
    pub normalized_breaks: Vec<Interval>,
}

/// Splits a block into its sprints by subtracting the (normalized) breaks.
///
/// A block with no breaks yields exactly one sprint equal to itself. A block
/// entirely consumed by its breaks is a user error (`FullyCovered`), never a
/// silent empty result. Sprints inherit the block's depth; labeled blocks get
/// numbered sprint labels, unlabeled blocks stay unlabeled.
pub fn compose_sprints(
    block: Interval,
    breaks: &[Interval],
    depth: DepthLevel,
    label: Option<&str>,
) -> Result<SprintSet, PlanError> {
    for brk in breaks {
        if !interval::within(brk, &block) {
            return Err(PlanError::BreakOutsideBlock { block, brk: *brk });
        }
    }

    let normalized_breaks = interval::merge(breaks);
    let spans = interval::subtract(&block, &normalized_breaks);
    if spans.is_empty() {
        return Err(PlanError::FullyCovered { block });
    }

    let sprints = spans
        .into_iter()
        .enumerate()
        .map(|(idx, span)| Sprint {
            interval: span,
            depth,
            label: label.map(|text| format!("{} — Sprint {}", text, idx + 1)),
        })
        .collect();

    Ok(SprintSet {
        sprints,
        normalized_breaks,
    })
}
