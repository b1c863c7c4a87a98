//! Role selection screen: two role pickers plus the find-path action

use std::sync::Arc;

use wannabe_client::CareerApi;

use crate::requestor::{FindButton, PathRequestor};
use crate::resolver::{RoleField, RoleResolver, RoleSide};
use crate::session::SessionStore;
use crate::state::{Phase, Screen};

pub struct RoleSelectionScreen {
    resolver: RoleResolver,
    requestor: PathRequestor,
}

impl RoleSelectionScreen {
    pub fn new(api: Arc<dyn CareerApi>, store: SessionStore) -> Self {
        Self::with_roles(api, store, Vec::new())
    }

    /// Screen whose dropdowns list the given canonical roles
    pub fn with_roles(api: Arc<dyn CareerApi>, store: SessionStore, roles: Vec<String>) -> Self {
        Self {
            resolver: RoleResolver::with_options(Arc::clone(&api), roles),
            requestor: PathRequestor::new(api, store),
        }
    }

    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    pub fn field(&self, side: RoleSide) -> &RoleField {
        self.resolver.field(side)
    }

    pub fn button(&self) -> &FindButton {
        self.requestor.button()
    }

    pub fn error(&self) -> Option<&str> {
        self.requestor.error()
    }

    pub async fn search_similar(&mut self, side: RoleSide, text: &str) {
        self.resolver.search_similar(side, text).await;
    }

    pub fn select_candidate(&mut self, side: RoleSide, index: usize) -> Option<String> {
        self.resolver.select_candidate(side, index)
    }

    pub fn choose(&mut self, side: RoleSide, role: &str) -> bool {
        self.resolver.choose(side, role)
    }

    /// Request a path between whatever the two dropdowns hold
    pub async fn find_path(&mut self) -> Option<Screen> {
        let current = self.resolver.selected(RoleSide::Current);
        let target = self.resolver.selected(RoleSide::Target);
        self.requestor.find_path(current, target).await
    }

    pub fn phase(&self) -> Phase {
        match self.requestor.phase() {
            Phase::Idle => self.resolver.phase(),
            phase => phase,
        }
    }
}
