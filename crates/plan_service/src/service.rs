use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use plan_core::{
    conflict, interval, lock, resolve, sprint, window, BlockStatus, Conflict, DayRecord,
    DepthLevel, EnforceMode, Interval, Minute, Outcome, PlanError, ScheduleItem, Strategy, Window,
};

/// Errors the facade adds on top of the engine's [`PlanError`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("day {date} is already open")]
    DayAlreadyOpen { date: NaiveDate },

    #[error("day {date} has not been opened")]
    DayNotOpen { date: NaiveDate },

    #[error("no block starting at minute {start} on {date}")]
    BlockNotFound { date: NaiveDate, start: Minute },

    #[error("standing items require a goal")]
    MissingGoal,
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// A candidate block as the UI layers submit it: one span, optional internal
/// breaks, a depth level, and optional label/goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockProposal {
    pub interval: Interval,
    pub breaks: Vec<Interval>,
    pub depth: DepthLevel,
    pub label: Option<String>,
    pub goal_id: Option<String>,
}

/// One calendar date's plan: lifecycle record plus its scheduled items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayPlan {
    pub record: DayRecord,
    pub items: Vec<ScheduleItem>,
}

/// Serializable view of a date handed to the UI layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub record: DayRecord,
    pub items: Vec<ScheduleItem>,
}

#[derive(Debug, Default)]
struct PlannerState {
    windows: HashMap<Weekday, Window>,
    standing: HashMap<Weekday, Vec<ScheduleItem>>,
    days: HashMap<NaiveDate, DayPlan>,
}

/// One user's planner. Holds the weekly windows, the standing routine, and
/// per-date day plans behind a single lock, so every operation sees and
/// mutates a consistent snapshot of its scope.
pub struct PlannerService {
    state: RwLock<PlannerState>,
}

pub struct PlannerServiceBuilder {
    windows: Vec<(Weekday, Window)>,
}

impl PlannerServiceBuilder {
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
        }
    }

    pub fn with_window(mut self, weekday: Weekday, window: Window) -> Self {
        self.windows.retain(|(day, _)| *day != weekday);
        self.windows.push((weekday, window));
        self
    }

    pub fn build(self) -> PlannerService {
        let mut state = PlannerState::default();
        for (weekday, window) in self.windows {
            state.windows.insert(weekday, window);
        }
        PlannerService {
            state: RwLock::new(state),
        }
    }
}

impl PlannerService {
    pub fn builder() -> PlannerServiceBuilder {
        PlannerServiceBuilder::new()
    }

    // ----- windows and the standing routine -----------------------------

    pub fn window(&self, weekday: Weekday) -> Option<Window> {
        self.state.read().windows.get(&weekday).copied()
    }

    pub fn set_window(&self, weekday: Weekday, window: Window, today: NaiveDate) -> Result<()> {
        let mut state = self.state.write();
        ensure_unlocked(&state, weekday, today)?;
        tracing::debug!(?weekday, ?window, "setting operating window");
        state.windows.insert(weekday, window);
        Ok(())
    }

    pub fn clear_window(&self, weekday: Weekday, today: NaiveDate) -> Result<()> {
        let mut state = self.state.write();
        ensure_unlocked(&state, weekday, today)?;
        state.windows.remove(&weekday);
        Ok(())
    }

    pub fn standing_items(&self, weekday: Weekday) -> Vec<ScheduleItem> {
        self.state
            .read()
            .standing
            .get(&weekday)
            .cloned()
            .unwrap_or_default()
    }

    /// Drops a weekday's standing routine together with its window.
    pub fn clear_weekday(&self, weekday: Weekday, today: NaiveDate) -> Result<()> {
        let mut state = self.state.write();
        ensure_unlocked(&state, weekday, today)?;
        tracing::debug!(?weekday, "clearing standing routine");
        state.standing.remove(&weekday);
        state.windows.remove(&weekday);
        Ok(())
    }

    /// Pushes one proposal onto several weekdays' standing routines at once.
    ///
    /// The push is all-or-nothing: conflicts are gathered across every target
    /// weekday (deduplicated, since the same physical clash repeats per
    /// weekday) before anything mutates. Without a strategy any conflict
    /// refuses the whole push; with one, each weekday resolves against its
    /// own pre-mutation set.
    pub fn push_standing(
        &self,
        weekdays: &[Weekday],
        proposal: &BlockProposal,
        strategy: Option<Strategy>,
        today: NaiveDate,
    ) -> Result<()> {
        let goal_id = proposal.goal_id.clone().ok_or(ServiceError::MissingGoal)?;

        let mut state = self.state.write();
        for weekday in weekdays {
            ensure_unlocked(&state, *weekday, today)?;
        }

        let set = sprint::compose_sprints(
            proposal.interval,
            &proposal.breaks,
            proposal.depth,
            proposal.label.as_deref(),
        )?;

        // Per-weekday item sets, window-checked in reject mode so the user
        // sees exactly which spans fall outside which day's hours.
        let mut staged: Vec<(Weekday, Vec<ScheduleItem>)> = Vec::with_capacity(weekdays.len());
        let mut all_conflicts: Vec<Conflict> = Vec::new();
        for weekday in weekdays {
            let spans: Vec<Interval> = set.sprints.iter().map(|s| s.interval).collect();
            let spans = window::enforce(
                &spans,
                state.windows.get(weekday),
                EnforceMode::Reject,
            )?;

            let items: Vec<ScheduleItem> = spans
                .iter()
                .zip(&set.sprints)
                .map(|(span, sprint)| {
                    ScheduleItem::standing(*span, sprint.depth, sprint.label.clone(), goal_id.clone())
                })
                .collect();

            let existing = state.standing.get(weekday).cloned().unwrap_or_default();
            all_conflicts.extend(conflict::detect(&items, &existing));
            staged.push((*weekday, items));
        }

        let all_conflicts = conflict::dedup_overlaps(all_conflicts);
        if !all_conflicts.is_empty() && strategy.is_none() {
            return Err(PlanError::Conflicts {
                conflicts: all_conflicts,
            }
            .into());
        }

        for (weekday, items) in staged {
            let existing = state.standing.get(&weekday).cloned().unwrap_or_default();
            let resolved = match strategy {
                Some(strategy) => resolve::resolve(strategy, &items, &existing),
                None => match resolve::evaluate(&items, &existing) {
                    Outcome::Clean(resolved) => resolved,
                    // Unreachable: a conflict would have refused the push above.
                    Outcome::Conflicted(conflicts) => {
                        return Err(PlanError::Conflicts { conflicts }.into())
                    }
                },
            };
            tracing::debug!(?weekday, items = resolved.len(), "standing routine updated");
            state.standing.insert(weekday, resolved);
        }
        Ok(())
    }

    pub fn is_weekday_locked(&self, weekday: Weekday, today: NaiveDate) -> bool {
        let state = self.state.read();
        weekday_locked(&state, weekday, today)
    }

    // ----- day lifecycle ------------------------------------------------

    /// Opens a date: instantiates its plan from the matching weekday's
    /// standing routine and stamps `opened_at`. From this point the weekday's
    /// routine and window are locked until shutdown.
    pub fn open_day(&self, date: NaiveDate, opened_at: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.write();
        let already_open = state
            .days
            .get(&date)
            .is_some_and(|plan| plan.record.opened_at.is_some());
        if already_open {
            return Err(ServiceError::DayAlreadyOpen { date });
        }

        let routine = state
            .standing
            .get(&date.weekday())
            .cloned()
            .unwrap_or_default();
        let plan = state.days.entry(date).or_default();
        // One-off items planned ahead of opening keep their place; the
        // routine fills the remaining gaps around them.
        plan.items = match resolve::evaluate(&routine, &plan.items) {
            Outcome::Clean(resolved) => resolved,
            Outcome::Conflicted(_) => {
                resolve::resolve(Strategy::OnlyNewInGaps, &routine, &plan.items)
            }
        };
        plan.record.opened_at = Some(opened_at);
        tracing::debug!(%date, items = plan.items.len(), "day opened");
        Ok(())
    }

    pub fn shutdown_day(&self, date: NaiveDate, shutdown_at: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.write();
        let plan = state
            .days
            .get_mut(&date)
            .filter(|plan| plan.record.opened_at.is_some())
            .ok_or(ServiceError::DayNotOpen { date })?;
        plan.record.shutdown_at = Some(shutdown_at);
        tracing::debug!(%date, "day shut down");
        Ok(())
    }

    // ----- single-day planning ------------------------------------------

    /// Adds a one-off block to a date's plan. Never gated by the weekday
    /// lock: the template is untouched, only this one date changes.
    pub fn add_day_block(
        &self,
        date: NaiveDate,
        proposal: &BlockProposal,
        strategy: Option<Strategy>,
    ) -> Result<()> {
        let mut state = self.state.write();

        let set = sprint::compose_sprints(
            proposal.interval,
            &proposal.breaks,
            proposal.depth,
            proposal.label.as_deref(),
        )?;

        // Safety pass before persistence, so the day never holds out-of-window
        // minutes even when the window was narrowed after composition. Clipped
        // per sprint: a sprint may shrink or vanish without shifting the rest.
        let window = state.windows.get(&date.weekday()).copied();
        let mut items: Vec<ScheduleItem> = Vec::with_capacity(set.sprints.len());
        for sprint in &set.sprints {
            let clipped =
                window::enforce(&[sprint.interval], window.as_ref(), EnforceMode::Clip)?;
            items.extend(clipped.into_iter().map(|span| {
                ScheduleItem::single_day(
                    span,
                    sprint.depth,
                    sprint.label.clone(),
                    proposal.goal_id.clone(),
                )
            }));
        }

        let existing = state.days.get(&date).map(|p| p.items.clone()).unwrap_or_default();
        let resolved = match resolve::evaluate(&items, &existing) {
            Outcome::Clean(resolved) => resolved,
            Outcome::Conflicted(conflicts) => match strategy {
                Some(strategy) => resolve::resolve(strategy, &items, &existing),
                None => return Err(PlanError::Conflicts { conflicts }.into()),
            },
        };

        let plan = state.days.entry(date).or_default();
        plan.items = resolved;
        tracing::debug!(%date, items = plan.items.len(), "day plan updated");
        Ok(())
    }

    /// Replaces a date's entire plan with the given proposals. Explicitly
    /// destructive; the proposals must not clash with each other.
    pub fn replace_day(&self, date: NaiveDate, proposals: &[BlockProposal]) -> Result<()> {
        let mut state = self.state.write();
        let window = state.windows.get(&date.weekday()).copied();

        let mut items: Vec<ScheduleItem> = Vec::new();
        for proposal in proposals {
            let set = sprint::compose_sprints(
                proposal.interval,
                &proposal.breaks,
                proposal.depth,
                proposal.label.as_deref(),
            )?;

            for sprint in &set.sprints {
                let clipped =
                    window::enforce(&[sprint.interval], window.as_ref(), EnforceMode::Clip)?;
                items.extend(clipped.into_iter().map(|span| {
                    ScheduleItem::single_day(
                        span,
                        sprint.depth,
                        sprint.label.clone(),
                        proposal.goal_id.clone(),
                    )
                }));
            }
        }

        let clashes = internal_clashes(&items);
        if !clashes.is_empty() {
            return Err(PlanError::Conflicts { conflicts: clashes }.into());
        }

        let existing = state.days.get(&date).map(|p| p.items.clone()).unwrap_or_default();
        let resolved = resolve::resolve(Strategy::Replace, &items, &existing);
        let plan = state.days.entry(date).or_default();
        plan.items = resolved;
        tracing::debug!(%date, items = plan.items.len(), "day plan replaced");
        Ok(())
    }

    // ----- execution tracking -------------------------------------------

    pub fn set_block_status(
        &self,
        date: NaiveDate,
        start: Minute,
        status: BlockStatus,
    ) -> Result<()> {
        let mut state = self.state.write();
        let item = find_block(&mut state, date, start)?;
        item.status = status;
        Ok(())
    }

    /// Accumulates actually-worked minutes onto a block.
    pub fn log_actual(&self, date: NaiveDate, start: Minute, minutes: u32) -> Result<()> {
        let mut state = self.state.write();
        let item = find_block(&mut state, date, start)?;
        item.actual_minutes += minutes;
        Ok(())
    }

    // ----- views --------------------------------------------------------

    pub fn day_snapshot(&self, date: NaiveDate) -> DaySnapshot {
        let state = self.state.read();
        let plan = state.days.get(&date).cloned().unwrap_or_default();
        DaySnapshot {
            date,
            record: plan.record,
            items: plan.items,
        }
    }
}

fn weekday_locked(state: &PlannerState, weekday: Weekday, today: NaiveDate) -> bool {
    let record = state.days.get(&today).map(|plan| &plan.record);
    lock::is_locked(weekday, today, record)
}

fn ensure_unlocked(state: &PlannerState, weekday: Weekday, today: NaiveDate) -> Result<()> {
    if weekday_locked(state, weekday, today) {
        return Err(PlanError::WeekdayLocked { weekday }.into());
    }
    Ok(())
}

fn find_block<'a>(
    state: &'a mut PlannerState,
    date: NaiveDate,
    start: Minute,
) -> Result<&'a mut ScheduleItem> {
    state
        .days
        .get_mut(&date)
        .and_then(|plan| {
            plan.items
                .iter_mut()
                .find(|item| item.interval.start == start)
        })
        .ok_or(ServiceError::BlockNotFound { date, start })
}

fn internal_clashes(items: &[ScheduleItem]) -> Vec<Conflict> {
    let mut clashes = Vec::new();
    for (idx, a) in items.iter().enumerate() {
        for b in &items[idx + 1..] {
            if let Some(overlap) = interval::intersect(&a.interval, &b.interval) {
                clashes.push(Conflict {
                    overlap,
                    proposed_label: a.label.clone(),
                    existing_label: b.label.clone(),
                });
            }
        }
    }
    clashes
}
