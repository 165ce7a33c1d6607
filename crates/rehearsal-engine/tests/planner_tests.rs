//! Tests for bulk recurrence checks (expand, then classify each occurrence).

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use rehearsal_engine::{
    check_recurrence, check_recurrence_with, parse_date, Activity, ClassifyOptions, DateRange,
    Dimension, Interval, RecurrenceRequest, TimeOfDay,
};

fn d(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn t(s: &str) -> TimeOfDay {
    TimeOfDay::parse(s).unwrap()
}

fn monday_request() -> RecurrenceRequest {
    RecurrenceRequest {
        group_id: "choir".to_string(),
        interval: Interval::weekly(Weekday::Mon, t("19:00"), t("21:00")).unwrap(),
        date_range: DateRange::new(d("2024-03-04"), d("2024-03-25")),
        exclusions: BTreeSet::from([d("2024-03-18")]),
        location: "Hall A".to_string(),
        supervisor_id: "conductor-1".to_string(),
        participant_ids: BTreeSet::from(["p1".to_string()]),
    }
}

fn booked(id: &str, group: &str, date: &str, start: &str, end: &str, location: &str) -> Activity {
    Activity::new(
        id,
        group,
        Interval::on_date(d(date), t(start), t(end)).unwrap(),
        location,
        "someone-else",
    )
}

#[test]
fn empty_roster_gives_clear_plan() {
    let plan = check_recurrence(&monday_request(), &[]);

    let dates: Vec<NaiveDate> = plan.occurrences().iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![d("2024-03-04"), d("2024-03-11"), d("2024-03-25")]);
    assert!(!plan.has_critical());
    assert_eq!(plan.clear_dates(), dates);
    assert!(plan.blocked_dates().is_empty());
}

#[test]
fn critical_clash_only_on_its_date() {
    let roster = vec![booked("e1", "band", "2024-03-11", "20:00", "22:00", "Hall A")];

    let plan = check_recurrence(&monday_request(), &roster);

    assert!(plan.has_critical());
    assert_eq!(plan.blocked_dates(), vec![d("2024-03-11")]);
    assert_eq!(plan.clear_dates(), vec![d("2024-03-04"), d("2024-03-25")]);

    let check = &plan.occurrences()[1];
    assert_eq!(check.candidate.id, "choir@2024-03-11");
    assert_eq!(check.report.findings()[0].dimension, Dimension::Location);
    assert_eq!(check.report.findings()[0].affected_date, Some(d("2024-03-11")));
}

#[test]
fn excluded_date_is_not_checked() {
    let roster = vec![booked("e1", "band", "2024-03-18", "19:00", "21:00", "Hall A")];

    let plan = check_recurrence(&monday_request(), &roster);

    assert!(!plan.has_critical(), "2024-03-18 is excluded from the request");
    assert_eq!(plan.len(), 3);
}

#[test]
fn own_group_sessions_are_exempt() {
    let roster = vec![booked("e1", "choir", "2024-03-04", "19:00", "21:00", "Hall A")];

    let plan = check_recurrence(&monday_request(), &roster);

    assert!(plan.occurrences().iter().all(|o| o.report.is_clear()));
}

#[test]
fn options_pass_through_to_classifier() {
    let roster = vec![booked("e1", "band", "2024-03-04", "20:00", "22:00", "Hall B")];

    let default_plan = check_recurrence(&monday_request(), &roster);
    let quiet_plan = check_recurrence_with(
        &monday_request(),
        &roster,
        &ClassifyOptions {
            report_time_only_overlaps: false,
        },
    );

    assert_eq!(default_plan.occurrences()[0].report.len(), 1);
    assert_eq!(
        default_plan.occurrences()[0].report.findings()[0].dimension,
        Dimension::Time
    );
    assert!(quiet_plan.occurrences()[0].report.is_clear());
}

#[test]
fn empty_expansion_gives_empty_plan() {
    let mut request = monday_request();
    request.date_range = DateRange::new(d("2024-03-05"), d("2024-03-10"));

    let plan = check_recurrence(&request, &[]);

    assert!(plan.is_empty());
    assert!(!plan.has_critical());
}
