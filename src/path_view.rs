//! Path Renderer
//!
//! Rebuilds the computed path from the session store and lays it out as an
//! alternating sequence of role nodes and probability arrows. Performs no
//! network requests.

use serde::Serialize;
use tracing::warn;
use wannabe_types::PathResult;

use crate::format::{percent, title_case};
use crate::session::SessionStore;
use crate::state::{Phase, Screen};

pub const MISSING_PATH_MESSAGE: &str = "No path found.";

/// Summary sentence for a path with `transition_count` moves
pub fn summary_text(transition_count: usize) -> String {
    format!(
        "This is the most efficient calculated path, calculated from historical patterns in the \
         JobHop dataset. Your path includes {transition_count} transitions, with percentages \
         representing the statistical likelihood of each step based on real-world professional \
         trajectories. Click 'View Detailed Breakdown' for a full strategic analysis."
    )
}

/// Visual role of a node within the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeCategory {
    Current,
    Milestone,
    Target,
}

impl NodeCategory {
    /// First node is the current role, last is the target, the rest milestones
    pub fn for_position(index: usize, len: usize) -> Self {
        if index == 0 {
            NodeCategory::Current
        } else if index + 1 == len {
            NodeCategory::Target
        } else {
            NodeCategory::Milestone
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            NodeCategory::Current => "Current Role",
            NodeCategory::Milestone => "Milestone Step",
            NodeCategory::Target => "Target Goal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathItem {
    Node {
        category: NodeCategory,
        label: String,
    },
    Arrow {
        percent: i64,
        count: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPath {
    pub summary: String,
    pub transition_count: usize,
    pub items: Vec<PathItem>,
    /// Whole-path likelihood as a percentage, when the server supplied it
    pub confidence: Option<i64>,
}

impl RenderedPath {
    pub fn node_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, PathItem::Node { .. }))
            .count()
    }

    pub fn arrow_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, PathItem::Arrow { .. }))
            .count()
    }

    /// Percentages on the arrows, in path order
    pub fn arrow_percents(&self) -> Vec<i64> {
        self.items
            .iter()
            .filter_map(|item| match item {
                PathItem::Arrow { percent, .. } => Some(*percent),
                PathItem::Node { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PathView {
    /// No successful result in the session
    Missing,
    /// `path` and `steps` disagree
    Misaligned(String),
    Rendered(RenderedPath),
}

impl PathView {
    /// Lay out a stored result
    pub fn render(result: Option<&PathResult>) -> Self {
        let Some(result) = result.filter(|r| r.success) else {
            return PathView::Missing;
        };

        if let Err(e) = result.check_alignment() {
            warn!(error = %e, "stored path is inconsistent");
            return PathView::Misaligned(format!("The stored path is inconsistent: {e}."));
        }

        let len = result.path.len();
        let mut items = Vec::with_capacity(len * 2);
        for (index, role) in result.path.iter().enumerate() {
            items.push(PathItem::Node {
                category: NodeCategory::for_position(index, len),
                label: title_case(role),
            });
            if let Some(step) = result.steps.get(index).filter(|_| index + 1 < len) {
                items.push(PathItem::Arrow {
                    percent: percent(step.prob),
                    count: step.count,
                });
            }
        }

        let transition_count = result.transition_count();
        PathView::Rendered(RenderedPath {
            summary: summary_text(transition_count),
            transition_count,
            items,
            confidence: result.total_confidence.map(percent),
        })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            PathView::Missing => Some(MISSING_PATH_MESSAGE),
            PathView::Misaligned(message) => Some(message.as_str()),
            PathView::Rendered(_) => None,
        }
    }
}

/// Path summary screen
pub struct PathScreen {
    view: PathView,
}

impl PathScreen {
    pub fn load(store: &SessionStore) -> Self {
        Self {
            view: PathView::render(store.results().as_ref()),
        }
    }

    pub fn view(&self) -> &PathView {
        &self.view
    }

    pub fn phase(&self) -> Phase {
        match self.view {
            PathView::Rendered(_) => Phase::Rendered,
            _ => Phase::Error,
        }
    }

    /// "View Detailed Breakdown"
    pub fn explain(&self) -> Screen {
        Screen::StepDetails
    }
}
