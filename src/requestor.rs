//! Path Requestor
//!
//! Validates the two chosen roles, asks the backend for a path and, on
//! success, persists the result and the input before handing back the
//! navigation to the path summary screen.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use wannabe_client::CareerApi;
use wannabe_types::SelectedRoles;

use crate::session::SessionStore;
use crate::state::{Phase, Screen};

pub const IDLE_LABEL: &str = "Find Career Path";
pub const BUSY_LABEL: &str = "Calculating Path...";

pub const MISSING_ROLES_MESSAGE: &str = "Please select or search for both roles.";
pub const NO_PATH_MESSAGE: &str = "No realistic path found.";
pub const REQUEST_FAILED_MESSAGE: &str = "Failed to calculate path. Check server.";
pub const SAVE_FAILED_MESSAGE: &str = "Could not save the calculated path. Please try again.";

/// The control that triggers a path request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindButton {
    pub enabled: bool,
    pub label: &'static str,
}

impl Default for FindButton {
    fn default() -> Self {
        Self {
            enabled: true,
            label: IDLE_LABEL,
        }
    }
}

impl FindButton {
    pub fn is_busy(&self) -> bool {
        !self.enabled
    }
}

/// Holds the button busy for as long as it lives.
///
/// Dropping it (normal return, early return or unwinding) restores the idle
/// state, so no exit path can leave the button disabled.
pub struct BusyGuard<'a> {
    button: &'a mut FindButton,
}

impl<'a> BusyGuard<'a> {
    pub fn engage(button: &'a mut FindButton) -> Self {
        button.enabled = false;
        button.label = BUSY_LABEL;
        Self { button }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.button = FindButton::default();
    }
}

pub struct PathRequestor {
    api: Arc<dyn CareerApi>,
    store: SessionStore,
    button: FindButton,
    error: Option<String>,
}

impl PathRequestor {
    pub fn new(api: Arc<dyn CareerApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            button: FindButton::default(),
            error: None,
        }
    }

    pub fn button(&self) -> &FindButton {
        &self.button
    }

    /// Inline error under the button, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        if self.button.is_busy() {
            Phase::Requesting
        } else if self.error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    /// Request a path between the two roles.
    ///
    /// Returns the screen to navigate to on success; otherwise an inline
    /// error is left in [`PathRequestor::error`].
    pub async fn find_path(&mut self, current: Option<&str>, target: Option<&str>) -> Option<Screen> {
        self.error = None;

        let (Some(current), Some(target)) = (non_blank(current), non_blank(target)) else {
            self.error = Some(MISSING_ROLES_MESSAGE.to_string());
            return None;
        };
        let roles = SelectedRoles::new(current, target);

        let _busy = BusyGuard::engage(&mut self.button);

        match self.api.find_path(&roles).await {
            Ok(result) if result.success => {
                match self.store.save_path(&result, &roles) {
                    Ok(()) => {
                        info!(
                            current = %roles.current_role,
                            target = %roles.target_role,
                            transitions = result.transition_count(),
                            "path found"
                        );
                        Some(Screen::PathSummary)
                    }
                    Err(e) => {
                        error!(error = %e, "failed to persist path result");
                        self.error = Some(SAVE_FAILED_MESSAGE.to_string());
                        None
                    }
                }
            }
            Ok(result) => {
                warn!(error = ?result.error, "path request unsuccessful");
                self.error = Some(
                    result
                        .error
                        .filter(|message| !message.is_empty())
                        .unwrap_or_else(|| NO_PATH_MESSAGE.to_string()),
                );
                None
            }
            Err(e) => {
                error!(error = %e, "path request failed");
                self.error = Some(REQUEST_FAILED_MESSAGE.to_string());
                None
            }
        }
    }
}

fn non_blank(role: Option<&str>) -> Option<&str> {
    role.filter(|r| !r.trim().is_empty())
}
