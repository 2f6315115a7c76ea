use cadence_core::{CalendarRule, Duration, Instant, ResolvedTemplate, TaskTemplate};
use chrono::DateTime;

fn at(value: &str) -> Instant {
    DateTime::parse_from_rfc3339(value).unwrap()
}

fn standup_before_due() -> ResolvedTemplate {
    TaskTemplate::new()
        .name("standup")
        .due_on(CalendarRule::daily_at(9, 0))
        .create_offset(Duration::seconds(-900))
        .finalize()
        .unwrap()
}

fn report_after_create() -> ResolvedTemplate {
    TaskTemplate::new()
        .name("report")
        .create_on(CalendarRule::daily_at(8, 0))
        .due_offset(Duration::hours(2))
        .finalize()
        .unwrap()
}

#[test]
fn scenario_create_fifteen_minutes_before_daily_due() {
    let template = standup_before_due();

    assert!(template.should_be_created_at(at("2024-03-01T08:45:00Z")));
    let instance = template.current_instance(at("2024-03-01T08:45:00Z"));
    assert_eq!(instance.create_at, Some(at("2024-03-01T08:45:00Z")));
    assert_eq!(instance.due_at, Some(at("2024-03-01T09:00:00Z")));

    assert!(!template.should_be_created_at(at("2024-03-01T08:44:00Z")));
    assert!(!template.should_be_created_at(at("2024-03-01T08:46:00Z")));
}

#[test]
fn scenario_create_before_due_crosses_midnight() {
    let template = TaskTemplate::new()
        .name("night batch")
        .due_on(CalendarRule::daily_at(0, 10))
        .create_offset(Duration::seconds(-1800))
        .finalize()
        .unwrap();

    let instance = template.current_instance(at("2024-12-31T23:40:00Z"));
    assert_eq!(instance.create_at, Some(at("2024-12-31T23:40:00Z")));
    assert_eq!(instance.due_at, Some(at("2025-01-01T00:10:00Z")));
}

#[test]
fn create_boundary_tolerates_sub_minute_input() {
    let template = standup_before_due();

    let instance = template.current_instance(at("2024-03-01T08:45:37.250Z"));
    assert_eq!(instance.create_at, Some(at("2024-03-01T08:45:00Z")));
    assert_eq!(instance.due_at, Some(at("2024-03-01T09:00:00Z")));
}

#[test]
fn round_trip_before_due_holds_for_several_occurrences() {
    let template = standup_before_due();
    let offset = Duration::seconds(900);

    for due in [
        "2024-02-28T09:00:00Z",
        "2024-02-29T09:00:00Z",
        "2024-03-31T09:00:00Z",
        "2024-12-31T09:00:00Z",
    ] {
        let occurrence = at(due);
        let create = cadence_core::shift(occurrence, offset.invert()).unwrap();
        assert!(template.should_be_created_at(create), "create at {create}");
        assert_eq!(template.current_instance(create).due_at, Some(occurrence));
    }
}

#[test]
fn round_trip_after_create_adds_due_offset() {
    let template = report_after_create();

    for create in ["2024-01-31T08:00:00Z", "2024-02-29T08:00:00Z"] {
        let occurrence = at(create);
        let instance = template.current_instance(occurrence);
        assert_eq!(instance.create_at, Some(occurrence));
        assert_eq!(
            instance.due_at,
            cadence_core::shift(occurrence, Duration::hours(2))
        );
    }
}

#[test]
fn non_boundary_instants_resolve_nothing() {
    let template = report_after_create();

    for instant in [
        "2024-03-01T07:59:00Z",
        "2024-03-01T08:01:00Z",
        "2024-03-01T20:00:00Z",
    ] {
        let instant = at(instant);
        assert!(!template.should_be_created_at(instant));
        let instance = template.current_instance(instant);
        assert_eq!(instance.create_at, None);
        assert_eq!(instance.due_at, None);
    }
}

#[test]
fn repeated_queries_are_idempotent() {
    let template = standup_before_due();
    let instant = at("2024-03-01T08:45:00Z");

    let first = template.current_instance(instant);
    for _ in 0..3 {
        assert_eq!(template.current_instance(instant), first);
        assert!(template.should_be_created_at(instant));
        assert!(template.should_be_due_at(at("2024-03-01T09:00:00Z")));
    }
}

#[test]
fn should_be_due_at_with_recurrence_due_anchor() {
    let template = standup_before_due();

    assert!(template.should_be_due_at(at("2024-03-01T09:00:00Z")));
    assert!(template.should_be_due_at(at("2024-03-01T09:00:45Z")));
    assert!(!template.should_be_due_at(at("2024-03-01T09:01:00Z")));
    assert!(!template.should_be_due_at(at("2024-03-01T08:45:00Z")));
}

#[test]
fn should_be_due_at_with_duration_due_anchor_revalidates_create() {
    let template = report_after_create();

    assert!(template.should_be_due_at(at("2024-03-01T10:00:00Z")));
    assert!(!template.should_be_due_at(at("2024-03-01T10:01:00Z")));
    assert!(!template.should_be_due_at(at("2024-03-01T08:00:00Z")));
}

#[test]
fn template_without_due_anchor_has_no_due_instant() {
    let template = TaskTemplate::new()
        .name("inbox sweep")
        .create_on(CalendarRule::hourly_at(30))
        .finalize()
        .unwrap();

    let instance = template.current_instance(at("2024-03-01T14:30:00Z"));
    assert_eq!(instance.create_at, Some(at("2024-03-01T14:30:00Z")));
    assert_eq!(instance.due_at, None);
    assert!(!template.should_be_due_at(at("2024-03-01T14:30:00Z")));
}

#[test]
fn due_only_template_creates_on_due_occurrences() {
    let template = TaskTemplate::new()
        .name("pay rent")
        .due_on(CalendarRule::monthly_on(1, 9, 0))
        .finalize()
        .unwrap();

    assert!(template.create_anchor().is_recurrence());
    let instance = template.current_instance(at("2024-04-01T09:00:00Z"));
    assert_eq!(instance.create_at, Some(at("2024-04-01T09:00:00Z")));
    assert_eq!(instance.due_at, Some(at("2024-04-01T09:00:00Z")));
}

#[test]
fn next_instance_previews_without_boundary_gate() {
    let template = standup_before_due();

    let preview = template.next_instance(at("2024-03-01T10:00:00Z"));
    assert_eq!(preview.create_at, Some(at("2024-03-02T08:45:00Z")));
    assert_eq!(preview.due_at, Some(at("2024-03-02T09:00:00Z")));

    let strict = template.current_instance(at("2024-03-01T10:00:00Z"));
    assert_eq!(strict.create_at, None);
}

#[test]
fn next_instance_for_recurrence_create_returns_next_occurrence() {
    let template = report_after_create();

    let preview = template.next_instance(at("2024-03-01T08:00:30Z"));
    assert_eq!(preview.create_at, Some(at("2024-03-01T08:00:00Z")));
    assert_eq!(preview.due_at, Some(at("2024-03-01T10:00:00Z")));

    let preview = template.next_instance(at("2024-03-01T08:01:00Z"));
    assert_eq!(preview.create_at, Some(at("2024-03-02T08:00:00Z")));
}

#[test]
fn resolution_preserves_caller_offset() {
    let template = standup_before_due();

    let instance = template.current_instance(at("2024-03-01T10:45:00+02:00"));
    let create = instance.create_at.expect("08:45Z is a create boundary");
    assert_eq!(create.offset().local_minus_utc(), 2 * 3600);
    assert_eq!(create.to_rfc3339(), "2024-03-01T10:45:00+02:00");
}

#[test]
fn unsatisfiable_rule_never_resolves() {
    let template = TaskTemplate::new()
        .name("never")
        .create_on(CalendarRule::monthly_on(30, 0, 0).in_month(2))
        .finalize()
        .unwrap();

    assert!(!template.should_be_created_at(at("2024-02-29T00:00:00Z")));
    let preview = template.next_instance(at("2024-01-01T00:00:00Z"));
    assert_eq!(preview.create_at, None);
    assert_eq!(preview.due_at, None);
}

#[test]
fn offsets_past_calendar_range_resolve_to_nothing() {
    let far_due = TaskTemplate::new()
        .name("far due")
        .create_on(CalendarRule::daily_at(9, 0))
        .due_offset(Duration::seconds(i64::MIN + 1))
        .finalize()
        .unwrap();

    let instance = far_due.current_instance(at("2024-03-01T09:00:00Z"));
    assert_eq!(instance.create_at, Some(at("2024-03-01T09:00:00Z")));
    assert_eq!(instance.due_at, None);
    assert_eq!(far_due.resolve_due_at(at("2024-03-01T09:00:00Z")), None);
    assert!(!far_due.should_be_due_at(at("2024-03-01T09:00:00Z")));

    let distant_due = TaskTemplate::new()
        .name("distant due")
        .create_on(CalendarRule::daily_at(9, 0))
        .due_offset(Duration::days(200_000_000))
        .finalize()
        .unwrap();
    assert_eq!(distant_due.next_instance(at("2024-03-01T10:00:00Z")).due_at, None);
    assert!(!distant_due.should_be_due_at(at("2024-03-01T09:00:00Z")));

    let early_create = TaskTemplate::new()
        .name("early create")
        .due_on(CalendarRule::daily_at(9, 0))
        .create_offset(Duration::days(-200_000_000))
        .finalize()
        .unwrap();
    assert!(!early_create.should_be_created_at(at("2024-03-01T09:00:00Z")));
    assert_eq!(early_create.resolve_next_create_at(at("2024-03-01T09:00:00Z")), None);
}
