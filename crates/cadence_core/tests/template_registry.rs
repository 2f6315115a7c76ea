use cadence_core::{
    CalendarRule, Duration, Instant, RegistryError, ResolvedTemplate, TaskTemplate,
    TemplateError, TemplateRegistry,
};
use chrono::DateTime;

fn at(value: &str) -> Instant {
    DateTime::parse_from_rfc3339(value).unwrap()
}

fn seeded_registry() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    registry
        .define_with(|t| {
            t.name("standup")
                .due_on(CalendarRule::daily_at(9, 0))
                .create_offset(Duration::minutes(-15))
        })
        .expect("standup should register");
    registry
        .define(
            &TaskTemplate::new()
                .name("inbox")
                .create_on(CalendarRule::hourly_at(45)),
        )
        .expect("inbox should register");
    registry
        .define_with(|t| {
            t.name("lunch")
                .create_on(CalendarRule::daily_at(12, 0))
                .due_offset(Duration::hours(1))
        })
        .expect("lunch should register");
    registry
}

fn names<'a>(templates: impl IntoIterator<Item = &'a ResolvedTemplate>) -> Vec<&'a str> {
    templates.into_iter().map(|template| template.name()).collect()
}

#[test]
fn ready_to_create_at_returns_matches_in_registration_order() {
    let registry = seeded_registry();

    assert_eq!(
        names(registry.ready_to_create_at(at("2024-03-01T08:45:00Z"))),
        vec!["standup", "inbox"]
    );
    assert_eq!(
        names(registry.ready_to_create_at(at("2024-03-01T12:00:00Z"))),
        vec!["lunch"]
    );
    assert!(registry
        .ready_to_create_at(at("2024-03-01T12:01:00Z"))
        .is_empty());
}

#[test]
fn next_instances_at_returns_one_preview_per_template() {
    let registry = seeded_registry();

    let previews = registry.next_instances_at(at("2024-03-01T10:00:00Z"));
    assert_eq!(previews.len(), registry.len());

    assert_eq!(previews[0].name, "standup");
    assert_eq!(previews[0].create_at, Some(at("2024-03-02T08:45:00Z")));
    assert_eq!(previews[1].name, "inbox");
    assert_eq!(previews[1].create_at, Some(at("2024-03-01T10:45:00Z")));
    assert_eq!(previews[2].name, "lunch");
    assert_eq!(previews[2].create_at, Some(at("2024-03-01T12:00:00Z")));
    assert_eq!(previews[2].due_at, Some(at("2024-03-01T13:00:00Z")));
}

#[test]
fn instances_at_materializes_only_ready_templates() {
    let registry = seeded_registry();

    let instances = registry.instances_at(at("2024-03-01T08:45:20Z"));
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].name, "standup");
    assert_eq!(instances[0].due_at, Some(at("2024-03-01T09:00:00Z")));
    assert_eq!(instances[1].name, "inbox");
    assert_eq!(instances[1].create_at, Some(at("2024-03-01T08:45:00Z")));
    assert_eq!(instances[1].due_at, None);
}

#[test]
fn due_at_reports_templates_with_due_boundary() {
    let registry = seeded_registry();

    assert_eq!(
        names(registry.due_at(at("2024-03-01T09:00:00Z"))),
        vec!["standup"]
    );
    assert_eq!(
        names(registry.due_at(at("2024-03-01T13:00:00Z"))),
        vec!["lunch"]
    );
}

#[test]
fn duplicates_are_kept_as_separate_registrations() {
    let mut registry = TemplateRegistry::new();
    let template = TaskTemplate::new()
        .name("stretch")
        .create_on(CalendarRule::hourly_at(0));

    let first = registry.define(&template).unwrap();
    let second = registry.define(&template).unwrap();

    assert_ne!(first, second);
    assert_eq!(registry.len(), 2);
    assert_eq!(
        names(registry.ready_to_create_at(at("2024-03-01T15:00:00Z"))),
        vec!["stretch", "stretch"]
    );
    let ids: Vec<_> = registry.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn factory_errors_surface_as_invalid_template() {
    let mut registry = TemplateRegistry::new();
    let err = registry
        .define_with(|t| t.description("nameless").create_on(CalendarRule::daily_at(9, 0)))
        .unwrap_err();

    assert_eq!(err, RegistryError::InvalidTemplate(TemplateError::MissingName));
    assert!(registry.is_empty());
}

#[test]
fn register_accepts_finalized_template() {
    let mut registry = TemplateRegistry::new();
    let resolved = TaskTemplate::new()
        .name("prebuilt")
        .create_on(CalendarRule::daily_at(6, 30))
        .finalize()
        .unwrap();

    let id = registry.register(resolved.clone());
    assert_eq!(registry.get(id), Some(&resolved));
}
