//! Text formatting shared by the screens

use serde::Serialize;

/// Capitalize the first character of every space-separated word.
///
/// The rest of each word is left untouched and runs of spaces are kept, so
/// applying it twice gives the same result as applying it once.
pub fn title_case(s: &str) -> String {
    s.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Probability in [0, 1] as a whole percentage, rounded half away from zero
pub fn percent(probability: f64) -> i64 {
    (probability * 100.0).round() as i64
}

/// Presentation category of a learning resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Book,
    Course,
    Doc,
    YouTube,
    Tool,
    Link,
}

/// Prefixes checked in order; the first one contained in the text wins
pub const RESOURCE_PREFIXES: [(&str, ResourceCategory); 5] = [
    ("Book:", ResourceCategory::Book),
    ("Course:", ResourceCategory::Course),
    ("Doc:", ResourceCategory::Doc),
    ("YouTube:", ResourceCategory::YouTube),
    ("Tool:", ResourceCategory::Tool),
];

impl ResourceCategory {
    pub fn categorize(resource: &str) -> Self {
        RESOURCE_PREFIXES
            .iter()
            .find(|(prefix, _)| resource.contains(prefix))
            .map(|(_, category)| *category)
            .unwrap_or(ResourceCategory::Link)
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceCategory::Book => "book",
            ResourceCategory::Course => "course",
            ResourceCategory::Doc => "doc",
            ResourceCategory::YouTube => "youtube",
            ResourceCategory::Tool => "tool",
            ResourceCategory::Link => "link",
        }
    }
}
