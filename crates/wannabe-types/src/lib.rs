//! Shared API Types for WannaBe
//!
//! This crate is the SINGLE SOURCE OF TRUTH for all types crossing HTTP boundaries
//! and for the values the wizard persists in its session store.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐
//! │  Pathfinder API  │  JSON   │  Wizard client   │
//! │  (search, path,  │ ◄─────► │  (three screens) │
//! │   enrichment)    │         │                  │
//! └──────────────────┘         └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. All API types live here - no inline struct definitions at call sites
//! 2. Optional server fields are `#[serde(default)]` so partial payloads decode
//! 3. Field names follow the server's JSON (camelCase for the path request)

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// SIMILARITY SEARCH
// ============================================================================

/// Request body for `POST /api/search-similar`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub text: String,
}

/// One ranked candidate from the similarity search.
///
/// On the wire this is the pair `[role, score]`; the response is an ordered
/// sequence of these, best first, and the order must be kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64)", into = "(String, f64)")]
pub struct RoleMatch {
    /// Canonical role identifier
    pub role: String,
    /// Similarity in [0, 1]
    pub score: f64,
}

impl RoleMatch {
    pub fn new(role: impl Into<String>, score: f64) -> Self {
        Self {
            role: role.into(),
            score,
        }
    }
}

impl From<(String, f64)> for RoleMatch {
    fn from((role, score): (String, f64)) -> Self {
        Self { role, score }
    }
}

impl From<RoleMatch> for (String, f64) {
    fn from(m: RoleMatch) -> Self {
        (m.role, m.score)
    }
}

// ============================================================================
// PATH COMPUTATION
// ============================================================================

/// The two roles picked on the selection screen.
///
/// Doubles as the `POST /api/find-path` request body and as the `wb_input`
/// session entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRoles {
    pub current_role: String,
    pub target_role: String,
}

impl SelectedRoles {
    pub fn new(current_role: impl Into<String>, target_role: impl Into<String>) -> Self {
        Self {
            current_role: current_role.into(),
            target_role: target_role.into(),
        }
    }
}

/// A directed edge between two consecutive roles of a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    /// Probability in [0, 1]
    pub prob: f64,
    /// Number of observed historical moves along this edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Response of `POST /api/find-path`, also persisted as `wb_results`.
///
/// When `success` is true, `steps[i]` describes the move from `path[i]` to
/// `path[i + 1]`, see [`PathResult::check_alignment`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Transition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Product of the step probabilities, when the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_confidence: Option<f64>,
}

/// Structural disagreement between `path` and `steps`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    #[error("path is empty")]
    EmptyPath,

    #[error("expected {expected} transitions for a path of {roles} roles, got {actual}")]
    StepCount {
        roles: usize,
        expected: usize,
        actual: usize,
    },

    #[error("transition {index} goes '{from}' -> '{to}', path expects '{expected_from}' -> '{expected_to}'")]
    Endpoints {
        index: usize,
        from: String,
        to: String,
        expected_from: String,
        expected_to: String,
    },
}

impl PathResult {
    /// A successful result with the given path and steps
    pub fn found(path: Vec<String>, steps: Vec<Transition>) -> Self {
        Self {
            success: true,
            path,
            steps,
            error: None,
            total_confidence: None,
        }
    }

    /// A failed result carrying an optional server message
    pub fn failed(error: Option<String>) -> Self {
        Self {
            success: false,
            error,
            ..Self::default()
        }
    }

    /// Number of moves between the first and last role
    pub fn transition_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Verify `steps` lines up with `path` position by position.
    ///
    /// Endpoints are compared case-insensitively after trimming, the way the
    /// backend normalizes role identifiers.
    pub fn check_alignment(&self) -> Result<(), AlignmentError> {
        if self.path.is_empty() {
            return Err(AlignmentError::EmptyPath);
        }

        let expected = self.path.len() - 1;
        if self.steps.len() != expected {
            return Err(AlignmentError::StepCount {
                roles: self.path.len(),
                expected,
                actual: self.steps.len(),
            });
        }

        for (index, (step, pair)) in self.steps.iter().zip(self.path.windows(2)).enumerate() {
            if !same_role(&step.from, &pair[0]) || !same_role(&step.to, &pair[1]) {
                return Err(AlignmentError::Endpoints {
                    index,
                    from: step.from.clone(),
                    to: step.to.clone(),
                    expected_from: pair[0].clone(),
                    expected_to: pair[1].clone(),
                });
            }
        }

        Ok(())
    }
}

/// Role identifiers compare without regard to case or surrounding space
pub fn same_role(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

// ============================================================================
// PATH DETAIL ENRICHMENT
// ============================================================================

/// Request body for `POST /api/get-path-details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDetailsRequest {
    /// Ordered role identifiers of the path
    pub roles: Vec<String>,
}

/// A skill to acquire for one transition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// One-sentence definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what: Option<String>,
    /// Why the skill matters for this particular move
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_skill: Option<String>,
    /// Learning resources tagged by prefix (`Book:`, `Course:`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

/// Enrichment of a single [`Transition`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepDetail {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

/// Response of `POST /api/get-path-details`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathDetailsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepDetail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Last role of the requested path, echoed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_goal: Option<String>,
}

impl PathDetailsResponse {
    pub fn failed(error: Option<String>) -> Self {
        Self {
            success: false,
            error,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(from: &str, to: &str, prob: f64) -> Transition {
        Transition {
            from: from.to_string(),
            to: to.to_string(),
            prob,
            count: None,
        }
    }

    #[test]
    fn test_role_match_decodes_from_pair() {
        let matches: Vec<RoleMatch> = serde_json::from_value(json!([
            ["Software Engineer", 0.95],
            ["Software Engineering Manager", 0.8],
            ["data analyst", 1]
        ]))
        .unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0], RoleMatch::new("Software Engineer", 0.95));
        assert_eq!(matches[1].role, "Software Engineering Manager");
        assert_eq!(matches[2].score, 1.0);
    }

    #[test]
    fn test_role_match_encodes_as_pair() {
        let value = serde_json::to_value(RoleMatch::new("nurse", 0.5)).unwrap();
        assert_eq!(value, json!(["nurse", 0.5]));
    }

    #[test]
    fn test_selected_roles_camel_case() {
        let value = serde_json::to_value(SelectedRoles::new("a", "b")).unwrap();
        assert_eq!(value, json!({"currentRole": "a", "targetRole": "b"}));
    }

    #[test]
    fn test_path_result_missing_success_is_failure() {
        let result: PathResult = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(result.path.is_empty());
    }

    #[test]
    fn test_path_result_full_payload() {
        let result: PathResult = serde_json::from_value(json!({
            "success": true,
            "path": ["a", "b"],
            "steps": [{"from": "a", "to": "b", "prob": 0.4, "count": 12}],
            "total_confidence": 0.4
        }))
        .unwrap();

        assert!(result.success);
        assert_eq!(result.steps[0].count, Some(12));
        assert_eq!(result.total_confidence, Some(0.4));
        assert_eq!(result.transition_count(), 1);
    }

    #[test]
    fn test_alignment_ok() {
        let result = PathResult::found(
            vec!["A".into(), "B".into(), "C".into()],
            vec![step("a", "b", 0.5), step("B ", "C", 0.7)],
        );
        assert_eq!(result.check_alignment(), Ok(()));
    }

    #[test]
    fn test_alignment_single_role_path() {
        let result = PathResult::found(vec!["A".into()], vec![]);
        assert_eq!(result.check_alignment(), Ok(()));
        assert_eq!(result.transition_count(), 0);
    }

    #[test]
    fn test_alignment_short_steps() {
        let result = PathResult::found(
            vec!["A".into(), "B".into(), "C".into()],
            vec![step("A", "B", 0.5)],
        );
        assert_eq!(
            result.check_alignment(),
            Err(AlignmentError::StepCount {
                roles: 3,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_alignment_wrong_endpoints() {
        let result = PathResult::found(
            vec!["A".into(), "B".into()],
            vec![step("A", "Z", 0.5)],
        );
        assert!(matches!(
            result.check_alignment(),
            Err(AlignmentError::Endpoints { index: 0, .. })
        ));
    }

    #[test]
    fn test_alignment_empty_path() {
        let result = PathResult::found(vec![], vec![]);
        assert_eq!(result.check_alignment(), Err(AlignmentError::EmptyPath));
    }

    #[test]
    fn test_details_response_partial_skills() {
        let response: PathDetailsResponse = serde_json::from_value(json!({
            "success": true,
            "steps": [{
                "from": "a",
                "to": "b",
                "why": "bridge",
                "skills": [{"name": "SQL"}, {"name": "Python", "what": "Python is...", "resources": ["Book: Fluent Python"]}]
            }],
            "target_goal": "b"
        }))
        .unwrap();

        let steps = response.steps.unwrap();
        assert_eq!(steps[0].skills[0].what, None);
        assert_eq!(steps[0].skills[0].resources, None);
        assert_eq!(
            steps[0].skills[1].resources.as_deref(),
            Some(&["Book: Fluent Python".to_string()][..])
        );
        assert_eq!(response.target_goal.as_deref(), Some("b"));
    }
}
