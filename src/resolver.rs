//! Role Resolver
//!
//! Turns free text into a canonical role held by one of the two role
//! dropdowns on the selection screen. A search either short-circuits on an
//! exact match or lists ranked candidates for the user to pick from.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};
use wannabe_client::{ApiError, CareerApi};
use wannabe_types::RoleMatch;

use crate::format::percent;
use crate::state::Phase;

/// Top score at or above which a search counts as an exact match
pub const EXACT_MATCH_THRESHOLD: f64 = 0.99;

pub const SEARCHING_MESSAGE: &str = "Searching database...";
pub const CANDIDATES_HEADING: &str = "Similar jobs found (click to select):";
pub const NO_MATCHES_MESSAGE: &str = "No matches found.";
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection Error.";

/// Which of the two roles a widget belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoleSide {
    Current,
    Target,
}

// =============================================================================
// DROPDOWN
// =============================================================================

/// Role dropdown.
///
/// With a known option list it only accepts listed roles, like a `<select>`
/// element: assigning anything else leaves it empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleDropdown {
    options: Vec<String>,
    value: Option<String>,
}

impl RoleDropdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Vec<String>) -> Self {
        Self {
            options,
            value: None,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Assign a value; returns whether the dropdown now holds it
    pub fn set(&mut self, role: &str) -> bool {
        if self.options.is_empty() || self.options.iter().any(|o| o == role) {
            self.value = Some(role.to_string());
            true
        } else {
            self.value = None;
            false
        }
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

// =============================================================================
// SEARCH PANEL
// =============================================================================

/// One selectable search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub role: String,
    pub score: f64,
    /// `round(score * 100)`
    pub percent: i64,
}

impl From<RoleMatch> for Candidate {
    fn from(m: RoleMatch) -> Self {
        Self {
            percent: percent(m.score),
            role: m.role,
            score: m.score,
        }
    }
}

/// What the results area under a search box shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum SearchPanel {
    #[default]
    Empty,
    Searching,
    ExactMatch(String),
    Candidates(Vec<Candidate>),
    Selected(String),
    NoMatches,
    ConnectionError,
}

impl SearchPanel {
    /// Decide what a completed search shows
    pub fn from_matches(matches: Vec<RoleMatch>) -> Self {
        match matches.first() {
            Some(top) if top.score >= EXACT_MATCH_THRESHOLD => {
                SearchPanel::ExactMatch(top.role.clone())
            }
            Some(_) => SearchPanel::Candidates(matches.into_iter().map(Candidate::from).collect()),
            None => SearchPanel::NoMatches,
        }
    }

    /// Single-line text of the panel, if it has one
    pub fn message(&self) -> Option<String> {
        match self {
            SearchPanel::Empty => None,
            SearchPanel::Searching => Some(SEARCHING_MESSAGE.to_string()),
            SearchPanel::ExactMatch(role) => Some(format!("Exact match: {role}")),
            SearchPanel::Candidates(_) => Some(CANDIDATES_HEADING.to_string()),
            SearchPanel::Selected(role) => Some(format!("Selected: {role}")),
            SearchPanel::NoMatches => Some(NO_MATCHES_MESSAGE.to_string()),
            SearchPanel::ConnectionError => Some(CONNECTION_ERROR_MESSAGE.to_string()),
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        match self {
            SearchPanel::Candidates(candidates) => candidates,
            _ => &[],
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            SearchPanel::Empty => Phase::Idle,
            SearchPanel::Searching => Phase::Searching,
            SearchPanel::ConnectionError => Phase::Error,
            _ => Phase::Rendered,
        }
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Search box, results area and dropdown for one side
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleField {
    pub dropdown: RoleDropdown,
    pub panel: SearchPanel,
}

pub struct RoleResolver {
    api: Arc<dyn CareerApi>,
    current: RoleField,
    target: RoleField,
}

impl RoleResolver {
    pub fn new(api: Arc<dyn CareerApi>) -> Self {
        Self::with_options(api, Vec::new())
    }

    /// Resolver whose dropdowns only accept `roles`
    pub fn with_options(api: Arc<dyn CareerApi>, roles: Vec<String>) -> Self {
        Self {
            api,
            current: RoleField {
                dropdown: RoleDropdown::with_options(roles.clone()),
                panel: SearchPanel::Empty,
            },
            target: RoleField {
                dropdown: RoleDropdown::with_options(roles),
                panel: SearchPanel::Empty,
            },
        }
    }

    pub fn field(&self, side: RoleSide) -> &RoleField {
        match side {
            RoleSide::Current => &self.current,
            RoleSide::Target => &self.target,
        }
    }

    fn field_mut(&mut self, side: RoleSide) -> &mut RoleField {
        match side {
            RoleSide::Current => &mut self.current,
            RoleSide::Target => &mut self.target,
        }
    }

    /// Role currently held by the dropdown on `side`
    pub fn selected(&self, side: RoleSide) -> Option<&str> {
        self.field(side).dropdown.value()
    }

    /// Search for roles similar to `text` and show the outcome on `side`.
    ///
    /// Blank text does nothing.
    pub async fn search_similar(&mut self, side: RoleSide, text: &str) {
        let Some(query) = self.begin_search(side, text) else {
            return;
        };
        let outcome = self.api.search_similar(&query).await;
        self.finish_search(side, outcome);
    }

    /// Enter the searching state; returns the trimmed query to send
    pub fn begin_search(&mut self, side: RoleSide, text: &str) -> Option<String> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }

        debug!(?side, query, "searching similar roles");
        self.field_mut(side).panel = SearchPanel::Searching;
        Some(query.to_string())
    }

    /// Apply a search response (or failure) to `side`
    pub fn finish_search(&mut self, side: RoleSide, outcome: Result<Vec<RoleMatch>, ApiError>) {
        let field = self.field_mut(side);

        field.panel = match outcome {
            Ok(matches) => match SearchPanel::from_matches(matches) {
                SearchPanel::ExactMatch(role) => {
                    field.dropdown.set(&role);
                    info!(?side, role = %role, "exact role match selected");
                    SearchPanel::ExactMatch(role)
                }
                panel => panel,
            },
            Err(e) => {
                error!(?side, error = %e, "Search Error");
                SearchPanel::ConnectionError
            }
        };
    }

    /// Pick candidate `index` from the results on `side`
    pub fn select_candidate(&mut self, side: RoleSide, index: usize) -> Option<String> {
        let field = self.field_mut(side);
        let role = field.panel.candidates().get(index)?.role.clone();

        field.dropdown.set(&role);
        field.panel = SearchPanel::Selected(role.clone());
        Some(role)
    }

    /// Set the dropdown on `side` directly
    pub fn choose(&mut self, side: RoleSide, role: &str) -> bool {
        self.field_mut(side).dropdown.set(role)
    }

    pub fn phase(&self) -> Phase {
        let (current, target) = (self.current.panel.phase(), self.target.panel.phase());
        if current.is_busy() || target.is_busy() {
            Phase::Searching
        } else if current == Phase::Error || target == Phase::Error {
            Phase::Error
        } else if current == Phase::Rendered || target == Phase::Rendered {
            Phase::Rendered
        } else {
            Phase::Idle
        }
    }
}
