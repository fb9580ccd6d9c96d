//! Pull path: flattening, defaults, landing step, and fetch ordering.
mod common;

use common::MockBackend;
use serde_json::json;

use rps_author::api::ApiError;
use rps_author::draft::{Step, DEFAULT_DURATION_MINUTES, DEFAULT_TEACHING_METHOD};
use rps_author::workflow::load_document;

fn seeded_backend() -> MockBackend {
    let backend = MockBackend::new(42);
    backend.set_document(json!({
        "course_id": 12,
        "course_name": "Struktur Data",
        "academic_year": "2025/2026",
        "semester": "odd",
        "description": "Struktur data dan algoritma",
        "status": "draft",
    }));
    backend.set_courses(vec![json!({ "id": 12, "code": "IF210", "name": "Struktur Data" })]);
    backend.set_outcomes(vec![json!({ "id": 3, "code": "CPL-03", "description": "analisis" })]);
    backend
}

#[test]
fn flattens_document_and_counts_defaults() {
    let backend = seeded_backend();
    let c1 = backend.seed(
        "cpmk",
        json!({ "code": "CPMK-01", "description": "memilih struktur", "cpl_ids": [3], "order": 1 }),
    );
    let c2 = backend.seed(
        "cpmk",
        json!({ "code": "CPMK-02", "description": "menganalisis kompleksitas", "cpl_ids": [3], "order": 2 }),
    );
    let s1 = backend.seed_sub_cpmk(
        c1,
        json!({ "code": "SUB-CPMK-01", "description": "array dan list", "order": 1 }),
    );
    // Missing method, duration, and weight: three documented defaults.
    backend.seed(
        "weekly_plan",
        json!({ "week": 1, "topic": "Pengenalan", "sub_cpmk_id": s1 }),
    );

    let client = backend.client();
    let draft = load_document(&client, 42).unwrap();

    assert_eq!(draft.rps_id, 42);
    assert_eq!(draft.info.course_id, Some(12));
    assert_eq!(draft.info.academic_year, "2025/2026");
    assert_eq!(draft.cpmks.len(), 2);
    assert_eq!(draft.cpmks[0].id, Some(c1));
    assert_eq!(draft.cpmks[1].id, Some(c2));

    assert_eq!(draft.sub_cpmks.len(), 1);
    assert_eq!(draft.sub_cpmks[0].cpmk_local_id, draft.cpmks[0].local_id);

    let week1 = &draft.weekly_plans[0];
    assert_eq!(week1.week, 1);
    assert_eq!(week1.teaching_method, DEFAULT_TEACHING_METHOD);
    assert_eq!(week1.duration_minutes, DEFAULT_DURATION_MINUTES);
    assert_eq!(week1.weight_percent, 0.0);
    assert_eq!(draft.wizard.defaulted_fields, 3);

    assert_eq!(draft.references.courses.len(), 1);
    assert_eq!(draft.references.outcomes.len(), 1);
}

#[test]
fn pads_weekly_grid_to_sixteen_editable_weeks() {
    let backend = seeded_backend();
    backend.seed("weekly_plan", json!({ "week": 3, "topic": "Stack" }));

    let client = backend.client();
    let draft = load_document(&client, 42).unwrap();

    assert_eq!(draft.weekly_plans.len(), 16);
    for (index, plan) in draft.weekly_plans.iter().enumerate() {
        assert_eq!(plan.week, index as u32 + 1);
    }
    assert!(draft.weekly_plans[2].has_content());
    assert!(!draft.weekly_plans[0].has_content());
    assert!(draft.weekly_plans[0].id.is_none());
}

#[test]
fn lands_on_first_step_without_content() {
    let backend = seeded_backend();
    backend.seed(
        "cpmk",
        json!({ "code": "CPMK-01", "description": "memilih struktur", "cpl_ids": [3] }),
    );

    let client = backend.client();
    let draft = load_document(&client, 42).unwrap();

    // Info and cpmk hold content; sub-outcomes are the first gap.
    assert!(draft.wizard.completed_steps.contains(&Step::Info));
    assert!(draft.wizard.completed_steps.contains(&Step::Cpmk));
    assert_eq!(draft.wizard.active_step, Step::SubCpmk);
}

#[test]
fn fetches_sub_outcomes_per_cpmk_in_document_order() {
    let backend = seeded_backend();
    let c1 = backend.seed("cpmk", json!({ "description": "pertama", "cpl_ids": [3] }));
    let c2 = backend.seed("cpmk", json!({ "description": "kedua", "cpl_ids": [3] }));

    let client = backend.client();
    load_document(&client, 42).unwrap();

    let sub_lists: Vec<String> = backend
        .requests()
        .into_iter()
        .filter(|(method, path)| method == "GET" && path.contains("/sub-cpmk"))
        .map(|(_, path)| path)
        .collect();
    assert_eq!(sub_lists.len(), 2);
    assert!(sub_lists[0].starts_with(&format!("/rps/cpmk/{c1}/sub-cpmk")));
    assert!(sub_lists[1].starts_with(&format!("/rps/cpmk/{c2}/sub-cpmk")));
}

#[test]
fn drains_paginated_reference_lists() {
    let backend = seeded_backend();
    let outcomes: Vec<_> = (0..150)
        .map(|n| json!({ "id": n + 1, "code": format!("CPL-{n}"), "description": "x" }))
        .collect();
    backend.set_outcomes(outcomes);

    let client = backend.client();
    let draft = load_document(&client, 42).unwrap();

    assert_eq!(draft.references.outcomes.len(), 150);
    let cpl_requests = backend
        .requests()
        .iter()
        .filter(|(method, path)| method == "GET" && path.starts_with("/cpl"))
        .count();
    assert_eq!(cpl_requests, 2);
}

#[test]
fn unknown_rps_id_maps_to_not_found() {
    let backend = seeded_backend();
    let client = backend.client();
    match load_document(&client, 999) {
        Err(ApiError::NotFound { .. }) => {}
        other => panic!("expected not-found, got {other:?}"),
    }
}
