//! Detail Renderer
//!
//! Rebuilds the path from the session store, asks the backend to enrich
//! every transition and lays the answer out as collapsible cards. Each card
//! lists skill tags that open a modal with definitions and resources.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};
use wannabe_client::CareerApi;
use wannabe_types::{same_role, PathDetailsResponse, Skill, StepDetail};

use crate::format::{title_case, ResourceCategory};
use crate::session::SessionStore;
use crate::state::{Phase, Screen, TaskStatus};

pub const PROMPT_MESSAGE: &str = "Please calculate a path first.";
pub const LOADING_MESSAGE: &str = "AI Career Coach is analyzing your roadmap...";
pub const LOAD_FAILED_MESSAGE: &str = "Error loading career insights.";
pub const NO_DEFINITION: &str = "No definition available.";
pub const NO_RESOURCES: &str = "General documentation and online courses.";

// =============================================================================
// CARDS
// =============================================================================

/// One transition of the breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepCard {
    /// 1-based position in the path
    pub index: usize,
    pub from_label: String,
    pub to_label: String,
    pub why: String,
    pub skills: Vec<Skill>,
    pub expanded: bool,
}

impl StepCard {
    fn from_detail(position: usize, detail: StepDetail) -> Self {
        Self {
            index: position + 1,
            from_label: title_case(&detail.from),
            to_label: title_case(&detail.to),
            why: detail.why,
            skills: detail.skills,
            expanded: position == 0,
        }
    }

    /// Header line, e.g. "Software Engineer → Senior Pm"
    pub fn title(&self) -> String {
        format!("{} → {}", self.from_label, self.to_label)
    }

    pub fn badge(&self) -> String {
        format!("Transition {}", self.index)
    }

    pub fn skills_heading(&self) -> String {
        format!("Key skills to acquire for {}", self.to_label)
    }

    /// Skill tag labels, raw as the server sent them
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|skill| skill.name.as_str())
    }

    pub fn toggle_glyph(&self) -> char {
        if self.expanded {
            '▲'
        } else {
            '▼'
        }
    }
}

// =============================================================================
// SKILL MODAL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceItem {
    pub category: ResourceCategory,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillModal {
    pub title: String,
    pub what: String,
    pub why: String,
    pub resources: Vec<ResourceItem>,
}

impl SkillModal {
    /// Modal contents for `skill` on the move towards `to_role`
    pub fn build(skill: &Skill, to_role: &str) -> Self {
        let resources = match skill.resources.as_deref() {
            Some(list) if !list.is_empty() => list
                .iter()
                .map(|text| ResourceItem {
                    category: ResourceCategory::categorize(text),
                    text: text.clone(),
                })
                .collect(),
            _ => vec![ResourceItem {
                category: ResourceCategory::Link,
                text: NO_RESOURCES.to_string(),
            }],
        };

        Self {
            title: title_case(&skill.name),
            what: non_empty(skill.what.as_deref())
                .unwrap_or(NO_DEFINITION)
                .to_string(),
            why: non_empty(skill.why_skill.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Key for transitioning to {}.", title_case(to_role))),
            resources,
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

// =============================================================================
// SCREEN
// =============================================================================

/// Why the breakdown could not be shown
#[derive(Debug, Clone, PartialEq)]
pub enum DetailFailure {
    /// `success: false` from the server
    Server(String),
    /// Request or decoding failed
    Transport,
    /// Steps don't line up with the requested roles
    Misaligned(String),
}

impl DetailFailure {
    pub fn message(&self) -> &str {
        match self {
            DetailFailure::Server(message) | DetailFailure::Misaligned(message) => message,
            DetailFailure::Transport => LOAD_FAILED_MESSAGE,
        }
    }
}

/// What the detail screen currently shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailView<'a> {
    Prompt,
    Loading,
    Cards(&'a [StepCard]),
    Failed(&'a str),
}

pub struct DetailScreen {
    api: Arc<dyn CareerApi>,
    roles: Option<Vec<String>>,
    /// Goal echoed by the server with the enrichment
    goal: Option<String>,
    enrichment: TaskStatus<Vec<StepCard>, DetailFailure>,
    modal: Option<SkillModal>,
}

impl DetailScreen {
    /// Read the path from the session; nothing is requested yet
    pub fn new(api: Arc<dyn CareerApi>, store: &SessionStore) -> Self {
        let roles = store
            .results()
            .map(|result| result.path)
            .filter(|path| !path.is_empty());

        Self {
            api,
            roles,
            goal: None,
            enrichment: TaskStatus::Idle,
            modal: None,
        }
    }

    /// Screen loaded from the session with its enrichment fetched
    pub async fn open(api: Arc<dyn CareerApi>, store: &SessionStore) -> Self {
        let mut screen = Self::new(api, store);
        screen.load().await;
        screen
    }

    /// Roles the enrichment is keyed by
    pub fn roles(&self) -> Option<&[String]> {
        self.roles.as_deref()
    }

    /// Fetch the enrichment for the stored path
    pub async fn load(&mut self) {
        let Some(roles) = self.roles.as_deref() else {
            return;
        };

        debug!(roles = roles.len(), "requesting path details");
        self.enrichment = TaskStatus::InProgress;

        let outcome = match self.api.path_details(roles).await {
            Ok(response) => {
                self.goal = response.target_goal.clone().filter(|goal| !goal.trim().is_empty());
                cards_from_response(roles, response)
            }
            Err(e) => {
                error!(error = %e, "path details request failed");
                Err(DetailFailure::Transport)
            }
        };
        self.enrichment = TaskStatus::Finished(outcome);
    }

    /// Heading role for the breakdown: the server's `target_goal`, else
    /// the last role of the stored path
    pub fn target_goal(&self) -> Option<String> {
        self.goal
            .as_deref()
            .or_else(|| self.roles.as_ref()?.last().map(String::as_str))
            .map(title_case)
    }

    pub fn view(&self) -> DetailView<'_> {
        if self.roles.is_none() {
            return DetailView::Prompt;
        }
        match &self.enrichment {
            TaskStatus::Idle | TaskStatus::InProgress => DetailView::Loading,
            TaskStatus::Finished(Ok(cards)) => DetailView::Cards(cards),
            TaskStatus::Finished(Err(failure)) => DetailView::Failed(failure.message()),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.roles.is_none() {
            return Phase::Error;
        }
        self.enrichment.phase()
    }

    /// Flip card `index` (0-based) open or closed; other cards are untouched
    pub fn toggle(&mut self, index: usize) -> bool {
        match self
            .enrichment
            .ok_mut()
            .and_then(|cards| cards.get_mut(index))
        {
            Some(card) => {
                card.expanded = !card.expanded;
                true
            }
            None => false,
        }
    }

    /// Open the modal for skill `skill` of card `card` (both 0-based)
    pub fn open_skill(&mut self, card: usize, skill: usize) -> Option<&SkillModal> {
        let cards = match self.enrichment.result() {
            Some(Ok(cards)) => cards,
            _ => return None,
        };
        let step = cards.get(card)?;
        let chosen = step.skills.get(skill)?;

        self.modal = Some(SkillModal::build(chosen, &step.to_label));
        self.modal.as_ref()
    }

    pub fn modal(&self) -> Option<&SkillModal> {
        self.modal.as_ref()
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Back to role selection, available in every state
    pub fn edit_roles(&self) -> Screen {
        Screen::RoleSelection
    }
}

/// Turn an enrichment response into cards, checking it matches `roles`
fn cards_from_response(
    roles: &[String],
    response: PathDetailsResponse,
) -> Result<Vec<StepCard>, DetailFailure> {
    if !response.success {
        let message = response
            .error
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| LOAD_FAILED_MESSAGE.to_string());
        warn!(error = %message, "path details unsuccessful");
        return Err(DetailFailure::Server(message));
    }

    let steps = response.steps.unwrap_or_default();
    check_steps(roles, &steps).map_err(|reason| {
        warn!(%reason, "path details do not match the requested path");
        DetailFailure::Misaligned(format!("The career insights do not match your path: {reason}."))
    })?;

    Ok(steps
        .into_iter()
        .enumerate()
        .map(|(position, detail)| StepCard::from_detail(position, detail))
        .collect())
}

fn check_steps(roles: &[String], steps: &[StepDetail]) -> Result<(), String> {
    let expected = roles.len().saturating_sub(1);
    if steps.len() != expected {
        return Err(format!("expected {expected} transitions, got {}", steps.len()));
    }

    for (index, (step, pair)) in steps.iter().zip(roles.windows(2)).enumerate() {
        if !same_role(&step.from, &pair[0]) || !same_role(&step.to, &pair[1]) {
            return Err(format!(
                "transition {} is '{}' -> '{}'",
                index + 1,
                step.from,
                step.to
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str) -> Skill {
        Skill {
            name: name.into(),
            ..Skill::default()
        }
    }

    fn detail(from: &str, to: &str) -> StepDetail {
        StepDetail {
            from: from.into(),
            to: to.into(),
            why: format!("{from} bridges to {to}"),
            skills: vec![skill("sql"), skill("Stakeholder management")],
        }
    }

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_cards_first_expanded_only() {
        let response = PathDetailsResponse {
            success: true,
            steps: Some(vec![detail("a", "b"), detail("b", "c"), detail("c", "d")]),
            ..PathDetailsResponse::default()
        };
        let cards = cards_from_response(&roles(&["a", "b", "c", "d"]), response).unwrap();

        let expanded: Vec<bool> = cards.iter().map(|c| c.expanded).collect();
        assert_eq!(expanded, vec![true, false, false]);
        assert_eq!(cards[1].index, 2);
        assert_eq!(cards[1].badge(), "Transition 2");
        assert_eq!(cards[1].title(), "B → C");
        assert_eq!(cards[0].toggle_glyph(), '▲');
        assert_eq!(cards[2].toggle_glyph(), '▼');
    }

    #[test]
    fn test_tags_keep_raw_names() {
        let card = StepCard::from_detail(0, detail("data analyst", "data engineer"));
        let tags: Vec<&str> = card.tags().collect();
        assert_eq!(tags, vec!["sql", "Stakeholder management"]);
        assert_eq!(card.skills_heading(), "Key skills to acquire for Data Engineer");
    }

    #[test]
    fn test_server_failure_message_verbatim() {
        let failure = cards_from_response(
            &roles(&["A", "B"]),
            PathDetailsResponse::failed(Some("no data".into())),
        )
        .unwrap_err();
        assert_eq!(failure, DetailFailure::Server("no data".into()));
        assert_eq!(failure.message(), "no data");
    }

    #[test]
    fn test_server_failure_without_message() {
        let failure =
            cards_from_response(&roles(&["A", "B"]), PathDetailsResponse::failed(None)).unwrap_err();
        assert_eq!(failure.message(), LOAD_FAILED_MESSAGE);
    }

    #[test]
    fn test_misaligned_response() {
        let response = PathDetailsResponse {
            success: true,
            steps: Some(vec![detail("b", "c"), detail("a", "b")]),
            ..PathDetailsResponse::default()
        };
        let failure = cards_from_response(&roles(&["a", "b", "c"]), response).unwrap_err();
        assert!(matches!(failure, DetailFailure::Misaligned(_)));
        assert!(failure.message().contains("transition 1"));

        let missing_steps = PathDetailsResponse {
            success: true,
            ..PathDetailsResponse::default()
        };
        let failure = cards_from_response(&roles(&["a", "b"]), missing_steps).unwrap_err();
        assert!(failure.message().contains("expected 1 transitions, got 0"));
    }

    #[test]
    fn test_modal_fallbacks() {
        let modal = SkillModal::build(&skill("machine learning"), "Data Scientist");

        assert_eq!(modal.title, "Machine Learning");
        assert_eq!(modal.what, "No definition available.");
        assert_eq!(modal.why, "Key for transitioning to Data Scientist.");
        assert_eq!(
            modal.resources,
            vec![ResourceItem {
                category: ResourceCategory::Link,
                text: "General documentation and online courses.".into()
            }]
        );
    }

    #[test]
    fn test_modal_empty_resources_use_fallback() {
        let mut s = skill("sql");
        s.resources = Some(vec![]);
        let modal = SkillModal::build(&s, "analyst");
        assert_eq!(modal.resources.len(), 1);
        assert_eq!(modal.resources[0].text, NO_RESOURCES);
    }

    #[test]
    fn test_modal_full_skill() {
        let s = Skill {
            name: "python".into(),
            what: Some("Python is a language.".into()),
            why_skill: Some("Pipelines need it.".into()),
            resources: Some(vec![
                "Book: Fluent Python".into(),
                "Course: Python for Everybody".into(),
                "Doc: docs.python.org".into(),
                "YouTube: Corey Schafer".into(),
                "Tool: Jupyter".into(),
                "realpython.com".into(),
            ]),
        };
        let modal = SkillModal::build(&s, "data engineer");

        assert_eq!(modal.title, "Python");
        assert_eq!(modal.what, "Python is a language.");
        assert_eq!(modal.why, "Pipelines need it.");
        let categories: Vec<ResourceCategory> = modal.resources.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                ResourceCategory::Book,
                ResourceCategory::Course,
                ResourceCategory::Doc,
                ResourceCategory::YouTube,
                ResourceCategory::Tool,
                ResourceCategory::Link,
            ]
        );
    }
}
