//! Scripted `CareerApi` for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wannabe::types::{
    PathDetailsResponse, PathResult, RoleMatch, SelectedRoles, Transition,
};
use wannabe::{ApiError, CareerApi};

/// A canned reply; `Down` stands in for an unreachable backend
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Down,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> wannabe_client::Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Down => Err(ApiError::Status {
                status: 503,
                body: "service unavailable".into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(String),
    FindPath(SelectedRoles),
    PathDetails(Vec<String>),
}

pub struct FakeApi {
    searches: HashMap<String, Reply<Vec<RoleMatch>>>,
    path: Reply<PathResult>,
    details: Reply<PathDetailsResponse>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    /// Empty search results, no path, failed enrichment
    pub fn new() -> Self {
        Self {
            searches: HashMap::new(),
            path: Reply::Ok(PathResult::failed(None)),
            details: Reply::Ok(PathDetailsResponse::failed(None)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_search(mut self, query: &str, matches: &[(&str, f64)]) -> Self {
        let matches = matches
            .iter()
            .map(|(role, score)| RoleMatch::new(*role, *score))
            .collect();
        self.searches.insert(query.to_string(), Reply::Ok(matches));
        self
    }

    pub fn with_search_down(mut self, query: &str) -> Self {
        self.searches.insert(query.to_string(), Reply::Down);
        self
    }

    pub fn with_path(mut self, reply: Reply<PathResult>) -> Self {
        self.path = reply;
        self
    }

    pub fn with_details(mut self, reply: Reply<PathDetailsResponse>) -> Self {
        self.details = reply;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CareerApi for FakeApi {
    async fn search_similar(&self, text: &str) -> wannabe_client::Result<Vec<RoleMatch>> {
        self.record(Call::Search(text.to_string()));
        self.searches
            .get(text)
            .map(Reply::get)
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn find_path(&self, roles: &SelectedRoles) -> wannabe_client::Result<PathResult> {
        self.record(Call::FindPath(roles.clone()));
        self.path.get()
    }

    async fn path_details(&self, roles: &[String]) -> wannabe_client::Result<PathDetailsResponse> {
        self.record(Call::PathDetails(roles.to_vec()));
        self.details.get()
    }
}

pub fn transition(from: &str, to: &str, prob: f64) -> Transition {
    Transition {
        from: from.into(),
        to: to.into(),
        prob,
        count: None,
    }
}

/// Software Engineer → Senior PM → Product Manager
pub fn engineer_to_pm() -> PathResult {
    PathResult::found(
        vec![
            "Software Engineer".into(),
            "Senior PM".into(),
            "Product Manager".into(),
        ],
        vec![
            transition("Software Engineer", "Senior PM", 0.6),
            transition("Senior PM", "Product Manager", 0.8),
        ],
    )
}
