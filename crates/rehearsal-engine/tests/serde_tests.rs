//! Tests for the JSON boundary: canonical formats and constructor validation
//! on deserialization.

use chrono::Weekday;
use rehearsal_engine::{
    check_recurrence, classify, free_ranges, parse_date, synthesize, Activity, AvailabilityWindow,
    CandidateSlot, ClassifyOptions, ConflictReport, FreeRange, Interval, RecurrencePlan,
    RecurrenceRequest, SlotOptions, TimeOfDay,
};
use serde_json::json;

#[test]
fn time_of_day_serializes_as_hh_mm() {
    let t = TimeOfDay::parse("07:05").unwrap();
    assert_eq!(serde_json::to_value(t).unwrap(), json!("07:05"));
    let back: TimeOfDay = serde_json::from_value(json!("07:05")).unwrap();
    assert_eq!(back, t);
}

#[test]
fn time_of_day_rejects_loose_formats() {
    assert!(serde_json::from_value::<TimeOfDay>(json!("7:05")).is_err());
    assert!(serde_json::from_value::<TimeOfDay>(json!("07:05 PM")).is_err());
    assert!(serde_json::from_value::<TimeOfDay>(json!(425)).is_err());
}

#[test]
fn dated_interval_roundtrips() {
    let value = json!({"day": "Mon", "start": "19:00", "end": "21:00", "date": "2024-03-04"});

    let interval: Interval = serde_json::from_value(value.clone()).unwrap();

    assert_eq!(interval.day(), Weekday::Mon);
    assert_eq!(interval.date(), Some(parse_date("2024-03-04").unwrap()));
    assert_eq!(serde_json::to_value(&interval).unwrap(), value);
}

#[test]
fn interval_day_can_be_derived_from_date() {
    let interval: Interval =
        serde_json::from_value(json!({"start": "19:00", "end": "21:00", "date": "2024-03-07"})).unwrap();
    assert_eq!(interval.day(), Weekday::Thu);
}

#[test]
fn interval_accepts_full_weekday_names() {
    let interval: Interval =
        serde_json::from_value(json!({"day": "Wednesday", "start": "09:00", "end": "10:00"})).unwrap();
    assert_eq!(interval.day(), Weekday::Wed);
    assert_eq!(interval.date(), None);
}

#[test]
fn inverted_interval_is_rejected_on_input() {
    let err = serde_json::from_value::<Interval>(json!({"day": "Mon", "start": "21:00", "end": "19:00"}))
        .unwrap_err();
    assert!(err.to_string().contains("Invalid interval"), "got: {}", err);
}

#[test]
fn interval_without_day_or_date_is_rejected() {
    assert!(serde_json::from_value::<Interval>(json!({"start": "09:00", "end": "10:00"})).is_err());
}

#[test]
fn mismatched_day_and_date_is_rejected() {
    assert!(serde_json::from_value::<Interval>(
        json!({"day": "Fri", "start": "09:00", "end": "10:00", "date": "2024-03-04"})
    )
    .is_err());
}

#[test]
fn loose_date_is_rejected() {
    assert!(serde_json::from_value::<Interval>(
        json!({"start": "09:00", "end": "10:00", "date": "2024-3-4"})
    )
    .is_err());
}

#[test]
fn recurrence_request_from_json() {
    let request: RecurrenceRequest = serde_json::from_value(json!({
        "group_id": "choir",
        "interval": {"day": "Mon", "start": "19:00", "end": "21:00"},
        "date_range": {"from": "2024-03-04", "to": "2024-03-25"},
        "exclusions": ["2024-03-18"],
        "location": "Hall A",
        "supervisor_id": "conductor-1",
        "participant_ids": ["p1", "p2"]
    }))
    .unwrap();

    assert_eq!(request.exclusions.len(), 1);
    assert_eq!(request.participant_ids.len(), 2);
    assert_eq!(
        serde_json::to_value(request.date_range).unwrap(),
        json!({"from": "2024-03-04", "to": "2024-03-25"})
    );
}

#[test]
fn recurrence_request_defaults_optional_sets() {
    let request: RecurrenceRequest = serde_json::from_value(json!({
        "group_id": "choir",
        "interval": {"day": "Mon", "start": "19:00", "end": "21:00"},
        "date_range": {"from": "2024-03-04", "to": "2024-03-25"},
        "location": "Hall A",
        "supervisor_id": "conductor-1"
    }))
    .unwrap();

    assert!(request.exclusions.is_empty());
    assert!(request.participant_ids.is_empty());
}

#[test]
fn report_serializes_with_snake_case_tags() {
    let make = |id: &str, group: &str| {
        Activity::new(
            id,
            group,
            Interval::on_date(
                parse_date("2024-03-04").unwrap(),
                TimeOfDay::parse("19:00").unwrap(),
                TimeOfDay::parse("21:00").unwrap(),
            )
            .unwrap(),
            "Hall A",
            "c2",
        )
    };

    let report = classify(&make("new", "choir"), &[make("e1", "band")]);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["has_critical"], json!(true));
    assert_eq!(value["findings"][0]["dimension"], json!("location"));
    assert_eq!(value["findings"][0]["severity"], json!("critical"));
    assert_eq!(value["findings"][0]["affected_date"], json!("2024-03-04"));
    assert_eq!(value["findings"][0]["overlap_minutes"], json!(120));
    assert_eq!(value["findings"][0]["with_activity"]["id"], json!("e1"));
    assert_eq!(value["findings"][1]["dimension"], json!("supervisor"));
}

#[test]
fn candidate_slot_serializes_flat() {
    let window: AvailabilityWindow = serde_json::from_value(
        json!({"day": "Tue", "start": "16:00", "end": "16:45", "location": "Studio 1"}),
    )
    .unwrap();

    let slots = synthesize(&[window], &[], &[], &[45]);

    assert_eq!(
        serde_json::to_value(&slots).unwrap(),
        json!([{
            "day": "Tue",
            "start": "16:00",
            "end": "16:45",
            "duration_minutes": 45,
            "location": "Studio 1"
        }])
    );
}

#[test]
fn options_default_missing_fields() {
    let classify: ClassifyOptions = serde_json::from_value(json!({})).unwrap();
    let slots: SlotOptions = serde_json::from_value(json!({})).unwrap();
    assert!(classify.report_time_only_overlaps);
    assert_eq!(slots.step_minutes, 15);
}

fn rehearsal(id: &str, group: &str, date: &str) -> Activity {
    Activity::new(
        id,
        group,
        Interval::on_date(
            parse_date(date).unwrap(),
            TimeOfDay::parse("19:00").unwrap(),
            TimeOfDay::parse("21:00").unwrap(),
        )
        .unwrap(),
        "Hall A",
        "c2",
    )
}

#[test]
fn report_reads_back_from_json() {
    let candidate = rehearsal("new", "choir", "2024-03-04");
    let report = classify(&candidate, &[rehearsal("e1", "band", "2024-03-04")]);
    let json = serde_json::to_string(&report).unwrap();

    let back: ConflictReport = serde_json::from_str(&json).unwrap();

    assert_eq!(back, report);
    assert!(back.has_critical());
}

#[test]
fn report_recomputes_critical_flag_on_read() {
    let candidate = rehearsal("new", "choir", "2024-03-04");
    let report = classify(&candidate, &[rehearsal("e1", "band", "2024-03-04")]);
    let mut value = serde_json::to_value(&report).unwrap();
    value["has_critical"] = json!(false);

    let back: ConflictReport = serde_json::from_value(value).unwrap();

    assert!(back.has_critical());
}

#[test]
fn plan_reads_back_from_json() {
    let request: RecurrenceRequest = serde_json::from_value(json!({
        "group_id": "choir",
        "interval": {"day": "Mon", "start": "19:00", "end": "21:00"},
        "date_range": {"from": "2024-03-04", "to": "2024-03-11"},
        "location": "Hall A",
        "supervisor_id": "c1"
    }))
    .unwrap();
    let plan = check_recurrence(&request, &[rehearsal("e1", "band", "2024-03-11")]);
    let json = serde_json::to_string(&plan).unwrap();

    let back: RecurrencePlan = serde_json::from_str(&json).unwrap();

    assert_eq!(back, plan);
    assert_eq!(back.blocked_dates(), vec![parse_date("2024-03-11").unwrap()]);
}

#[test]
fn candidate_slot_reads_back_from_json() {
    let value = json!({
        "day": "Tue",
        "start": "16:00",
        "end": "16:45",
        "duration_minutes": 45,
        "location": "Studio 1"
    });

    let slot: CandidateSlot = serde_json::from_value(value.clone()).unwrap();

    assert_eq!(slot.duration_minutes(), 45);
    assert_eq!(slot.location(), Some("Studio 1"));
    assert_eq!(serde_json::to_value(&slot).unwrap(), value);
}

#[test]
fn candidate_slot_with_wrong_duration_is_rejected() {
    let err = serde_json::from_value::<CandidateSlot>(json!({
        "day": "Tue",
        "start": "16:00",
        "end": "16:45",
        "duration_minutes": 30
    }))
    .unwrap_err();

    assert!(err.to_string().contains("Invalid interval"), "got: {}", err);
}

#[test]
fn free_range_reads_back_from_json() {
    let window: AvailabilityWindow =
        serde_json::from_value(json!({"day": "Wed", "start": "09:00", "end": "10:00"})).unwrap();
    let busy: Interval =
        serde_json::from_value(json!({"day": "Wed", "start": "09:00", "end": "09:30"})).unwrap();
    let free = free_ranges(&window, &[busy]);
    let json = serde_json::to_string(&free).unwrap();

    let back: Vec<FreeRange> = serde_json::from_str(&json).unwrap();

    assert_eq!(back, free);
}
