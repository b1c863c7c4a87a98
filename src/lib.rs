//! Wannabe - career-transition wizard
//!
//! Three screens backed by a pathfinding service: role selection, path
//! summary and a per-step breakdown. Screens talk to the service through
//! [`CareerApi`] and hand data to each other through a [`SessionStore`].

pub mod config;
pub mod detail_view;
pub mod error;
pub mod format;
pub mod path_view;
pub mod requestor;
pub mod resolver;
pub mod selection;
pub mod session;
pub mod state;

pub use config::WizardConfig;
pub use detail_view::{DetailScreen, DetailView, SkillModal, StepCard};
pub use error::{ConfigError, SessionError};
pub use path_view::{PathScreen, PathView};
pub use requestor::PathRequestor;
pub use resolver::{RoleResolver, RoleSide, SearchPanel};
pub use selection::RoleSelectionScreen;
pub use session::{SessionBackend, SessionStore};
pub use state::{Phase, Screen};

pub use wannabe_client::{ApiError, CareerApi, HttpClient};
pub use wannabe_types as types;
