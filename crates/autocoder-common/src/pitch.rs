use serde::{Deserialize, Serialize};

/// Structured product summary derived from an idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pitch {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub tech_stack: TechStack,
    #[serde(default)]
    pub estimated_complexity: Complexity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechStack {
    #[serde(default)]
    pub frontend: Vec<String>,
    #[serde(default)]
    pub backend: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Unknown labels are kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Complexity {
    Simple,
    #[default]
    Medium,
    Complex,
    Other(String),
}

impl From<String> for Complexity {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "simple" | "low" | "easy" => Complexity::Simple,
            "medium" | "moderate" => Complexity::Medium,
            "complex" | "high" | "hard" => Complexity::Complex,
            _ => Complexity::Other(raw),
        }
    }
}

impl From<Complexity> for String {
    fn from(complexity: Complexity) -> Self {
        complexity.to_string()
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Complexity::Simple => write!(f, "simple"),
            Complexity::Medium => write!(f, "medium"),
            Complexity::Complex => write!(f, "complex"),
            Complexity::Other(raw) => write!(f, "{}", raw),
        }
    }
}
