//! Whole wizard run where every screen is a separate page load sharing a
//! file-backed session.

mod helpers;

use std::sync::Arc;

use helpers::{engineer_to_pm, Call, FakeApi, Reply};
use wannabe::session::FileBackend;
use wannabe::types::{PathDetailsResponse, SelectedRoles, Skill, StepDetail};
use wannabe::{
    DetailScreen, DetailView, PathScreen, PathView, RoleSelectionScreen, RoleSide, Screen,
    SessionStore, WizardConfig,
};

fn details() -> PathDetailsResponse {
    let step = |from: &str, to: &str| StepDetail {
        from: from.into(),
        to: to.into(),
        why: "Overlapping responsibilities.".into(),
        skills: vec![Skill {
            name: "communication".into(),
            ..Skill::default()
        }],
    };
    PathDetailsResponse {
        success: true,
        steps: Some(vec![
            step("Software Engineer", "Senior PM"),
            step("Senior PM", "Product Manager"),
        ]),
        ..PathDetailsResponse::default()
    }
}

/// A fresh store over the same session directory, as a new page load sees it
fn page_load(root: &std::path::Path) -> SessionStore {
    SessionStore::new(Arc::new(FileBackend::open(root, "alice").unwrap()))
}

#[tokio::test]
async fn test_full_run_across_page_loads() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeApi::new()
        .with_search("software eng", &[("Software Engineer", 0.95), ("QA Engineer", 0.6)])
        .with_search("product manager", &[("Product Manager", 1.0)])
        .with_path(Reply::Ok(engineer_to_pm()))
        .with_details(Reply::Ok(details()))
        .shared();

    // Role selection
    let mut selection = RoleSelectionScreen::new(api.clone(), page_load(dir.path()));
    selection.search_similar(RoleSide::Current, "software eng").await;
    selection.select_candidate(RoleSide::Current, 0);
    selection.search_similar(RoleSide::Target, "product manager").await;
    assert_eq!(selection.find_path().await, Some(Screen::PathSummary));

    // Path summary
    let path = PathScreen::load(&page_load(dir.path()));
    let PathView::Rendered(rendered) = path.view() else {
        panic!("expected a rendered path, got {:?}", path.view());
    };
    assert_eq!(rendered.arrow_percents(), vec![60, 80]);
    assert_eq!(path.explain(), Screen::StepDetails);

    // Step details
    let mut steps = DetailScreen::open(api.clone(), &page_load(dir.path())).await;
    assert!(matches!(steps.view(), DetailView::Cards(cards) if cards.len() == 2));
    let modal = steps.open_skill(0, 0).cloned().unwrap();
    assert_eq!(modal.title, "Communication");
    assert_eq!(modal.why, "Key for transitioning to Senior PM.");

    assert_eq!(
        api.calls(),
        vec![
            Call::Search("software eng".into()),
            Call::Search("product manager".into()),
            Call::FindPath(SelectedRoles::new("Software Engineer", "Product Manager")),
            Call::PathDetails(engineer_to_pm().path),
        ]
    );
    assert_eq!(
        page_load(dir.path()).input(),
        Some(SelectedRoles::new("Software Engineer", "Product Manager"))
    );
}

#[tokio::test]
async fn test_reset_returns_screens_to_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let config = WizardConfig::from_lookup(|_| None)
        .unwrap()
        .with_session_dir(dir.path())
        .with_session("reset-me");
    let api = FakeApi::new().with_path(Reply::Ok(engineer_to_pm())).shared();

    let mut selection = RoleSelectionScreen::new(api.clone(), config.session_store().unwrap());
    selection.choose(RoleSide::Current, "Software Engineer");
    selection.choose(RoleSide::Target, "Product Manager");
    assert_eq!(selection.find_path().await, Some(Screen::PathSummary));
    assert!(matches!(
        PathScreen::load(&config.session_store().unwrap()).view(),
        PathView::Rendered(_)
    ));

    config.session_store().unwrap().clear().unwrap();

    let store = config.session_store().unwrap();
    assert_eq!(PathScreen::load(&store).view(), &PathView::Missing);
    assert_eq!(
        DetailScreen::open(api, &store).await.view(),
        DetailView::Prompt
    );
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeApi::new().with_path(Reply::Ok(engineer_to_pm())).shared();

    let mut selection = RoleSelectionScreen::new(api, page_load(dir.path()));
    selection.choose(RoleSide::Current, "Software Engineer");
    selection.choose(RoleSide::Target, "Product Manager");
    selection.find_path().await;

    let other = SessionStore::new(Arc::new(FileBackend::open(dir.path(), "bob").unwrap()));
    assert!(other.results().is_none());
    assert!(page_load(dir.path()).results().is_some());
}
