use chrono::{NaiveDate, TimeZone, Utc, Weekday};

use plan_core::{DepthLevel, Interval, Origin, PlanError, Strategy, Window};
use plan_service::{BlockProposal, DaySnapshot, PlannerService, ServiceError};

fn iv(start: u16, end: u16) -> Interval {
    Interval::new(start, end).expect("well-formed interval")
}

fn block(start: u16, end: u16, label: &str, breaks: &[Interval]) -> BlockProposal {
    BlockProposal {
        interval: iv(start, end),
        breaks: breaks.to_vec(),
        depth: DepthLevel::Deep,
        label: Some(label.to_string()),
        goal_id: Some("thesis".to_string()),
    }
}

#[test]
fn a_week_of_planning_round_trips_through_the_service() {
    // Operating window 08:00-18:00 on weekdays the routine targets.
    let service = PlannerService::builder()
        .with_window(Weekday::Mon, Window::new(480, 1080).unwrap())
        .with_window(Weekday::Wed, Window::new(480, 1080).unwrap())
        .build();

    let wednesday = NaiveDate::from_ymd_opt(2026, 2, 4).unwrap();

    // Standing routine: 09:00-13:00 deep block with an 11:00-11:15 break,
    // pushed to Monday and Wednesday. The break splits it into two sprints.
    service
        .push_standing(
            &[Weekday::Mon, Weekday::Wed],
            &block(540, 780, "Thesis", &[iv(660, 675)]),
            None,
            wednesday,
        )
        .expect("clean routine push");

    let monday_items = service.standing_items(Weekday::Mon);
    let spans: Vec<_> = monday_items
        .iter()
        .map(|i| (i.interval.start, i.interval.end))
        .collect();
    assert_eq!(spans, [(540, 660), (675, 780)]);
    assert_eq!(
        monday_items[0].label.as_deref(),
        Some("Thesis — Sprint 1")
    );
    assert_eq!(
        monday_items[1].label.as_deref(),
        Some("Thesis — Sprint 2")
    );

    // A block starting before the window opens is rejected outright.
    let err = service
        .push_standing(
            &[Weekday::Mon],
            &block(420, 540, "Too early", &[]),
            None,
            wednesday,
        )
        .expect_err("out-of-window push must fail");
    assert!(matches!(
        err,
        ServiceError::Plan(PlanError::OutsideWindow { .. })
    ));

    // A clashing push without a strategy is refused with the conflict list;
    // retried with only-new-in-gaps it fills just the free minutes.
    let err = service
        .push_standing(
            &[Weekday::Mon, Weekday::Wed],
            &block(720, 840, "Review", &[]),
            None,
            wednesday,
        )
        .expect_err("conflicting push must fail without a strategy");
    match err {
        ServiceError::Plan(PlanError::Conflicts { conflicts }) => {
            assert_eq!(conflicts.len(), 1, "same clash reported once per push");
            assert_eq!(conflicts[0].overlap, iv(720, 780));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    service
        .push_standing(
            &[Weekday::Mon, Weekday::Wed],
            &block(720, 840, "Review", &[]),
            Some(Strategy::OnlyNewInGaps),
            wednesday,
        )
        .expect("gap-filling push");
    let spans: Vec<_> = service
        .standing_items(Weekday::Wed)
        .iter()
        .map(|i| (i.interval.start, i.interval.end))
        .collect();
    assert_eq!(spans, [(540, 660), (675, 780), (780, 840)]);

    // Opening Wednesday copies the routine into the day and locks the weekday.
    let opened = Utc.with_ymd_and_hms(2026, 2, 4, 7, 45, 0).unwrap();
    service.open_day(wednesday, opened).expect("open day");
    assert!(service.is_weekday_locked(Weekday::Wed, wednesday));
    let err = service
        .set_window(Weekday::Wed, Window::new(540, 1020).unwrap(), wednesday)
        .expect_err("locked weekday refuses window changes");
    assert_eq!(
        err,
        ServiceError::Plan(PlanError::WeekdayLocked {
            weekday: Weekday::Wed
        })
    );

    let snapshot = service.day_snapshot(wednesday);
    assert_eq!(snapshot.items.len(), 3);
    assert!(snapshot.items.iter().all(|i| i.origin == Origin::Standing));

    // A one-off afternoon block is clipped by the window and lands after the
    // routine; the day stays pairwise disjoint.
    service
        .add_day_block(
            wednesday,
            &block(1020, 1140, "Email sweep", &[]),
            Some(Strategy::MergeOverwrite),
        )
        .expect("single-day block");
    let snapshot = service.day_snapshot(wednesday);
    let spans: Vec<_> = snapshot
        .items
        .iter()
        .map(|i| (i.interval.start, i.interval.end))
        .collect();
    assert_eq!(spans, [(540, 660), (675, 780), (780, 840), (1020, 1080)]);
    for (idx, a) in snapshot.items.iter().enumerate() {
        for b in &snapshot.items[idx + 1..] {
            assert!(
                !a.interval.overlaps(&b.interval),
                "day items must stay disjoint"
            );
        }
    }
    let one_off = snapshot.items.last().unwrap();
    assert_eq!(one_off.origin, Origin::SingleDay);

    // Snapshots serialize for the UI layers and survive the round trip.
    let json = serde_json::to_string(&snapshot).expect("serialize snapshot");
    let back: DaySnapshot = serde_json::from_str(&json).expect("deserialize snapshot");
    assert_eq!(back, snapshot);

    // Shutdown releases the lock; the routine is editable again.
    let shutdown = Utc.with_ymd_and_hms(2026, 2, 4, 18, 30, 0).unwrap();
    service.shutdown_day(wednesday, shutdown).expect("shutdown");
    assert!(!service.is_weekday_locked(Weekday::Wed, wednesday));
    service
        .clear_weekday(Weekday::Wed, wednesday)
        .expect("clear after shutdown");
    assert!(service.standing_items(Weekday::Wed).is_empty());
    assert!(service.window(Weekday::Wed).is_none());
}
