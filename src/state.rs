//! Screen routing and request lifecycle
//!
//! Every screen is a small state machine. Its externally visible phase is
//! one of [`Phase`]; asynchronous requests are tracked with [`TaskStatus`].
//! Navigation between screens is a [`Screen`] value handed back to the
//! driver, which performs a full load of the next screen.

use serde::Serialize;

// =============================================================================
// SCREENS
// =============================================================================

/// The three wizard screens, each reached by full navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    /// Pick current and target role
    RoleSelection,
    /// Path as a chain of role nodes
    PathSummary,
    /// Per-transition breakdown with skills
    StepDetails,
}

impl Screen {
    /// Route the screen is served under; also reported by the CLI on navigation
    pub fn route(self) -> &'static str {
        match self {
            Screen::RoleSelection => "/",
            Screen::PathSummary => "/path",
            Screen::StepDetails => "/steps",
        }
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// Coarse state of a screen or of one of its widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Nothing requested yet
    Idle,
    /// Similarity search in flight
    Searching,
    /// Path or enrichment request in flight
    Requesting,
    /// Content is on screen
    Rendered,
    /// A screen-local error is on screen
    Error,
}

impl Phase {
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Searching | Phase::Requesting)
    }
}

// =============================================================================
// BACKGROUND TASKS - TaskStatus pattern
// =============================================================================

/// Status of a background task.
///
/// Represents the lifecycle of async operations explicitly in state.
#[derive(Debug, Clone, Default)]
pub enum TaskStatus<T, E> {
    /// No task running
    #[default]
    Idle,
    /// Task is in progress
    InProgress,
    /// Task completed with result
    Finished(Result<T, E>),
}

impl<T, E> TaskStatus<T, E> {
    /// Borrow the result if finished
    pub fn result(&self) -> Option<&Result<T, E>> {
        match self {
            TaskStatus::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// Mutably borrow the success value if finished successfully
    pub fn ok_mut(&mut self) -> Option<&mut T> {
        match self {
            TaskStatus::Finished(Ok(value)) => Some(value),
            _ => None,
        }
    }

    /// Phase this task puts its owner in
    pub fn phase(&self) -> Phase {
        match self {
            TaskStatus::Idle => Phase::Idle,
            TaskStatus::InProgress => Phase::Requesting,
            TaskStatus::Finished(Ok(_)) => Phase::Rendered,
            TaskStatus::Finished(Err(_)) => Phase::Error,
        }
    }
}
