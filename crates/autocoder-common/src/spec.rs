//! MVC-flavoured technical specification derived from a pitch.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSpec {
    #[serde(default)]
    pub architecture: Architecture,
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(default)]
    pub controllers: Vec<Controller>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// Lowercase with separators dropped, so `belongs_to`, `Belongs To` and
/// `belongsTo` compare equal.
fn vocabulary_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Values outside the known set are kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Architecture {
    #[default]
    Spa,
    Mpa,
    Static,
    Game,
    Other(String),
}

impl From<String> for Architecture {
    fn from(raw: String) -> Self {
        match vocabulary_key(&raw).as_str() {
            "spa" => Architecture::Spa,
            "mpa" => Architecture::Mpa,
            "static" => Architecture::Static,
            "game" => Architecture::Game,
            _ => Architecture::Other(raw),
        }
    }
}

impl From<Architecture> for String {
    fn from(architecture: Architecture) -> Self {
        architecture.to_string()
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Architecture::Spa => write!(f, "spa"),
            Architecture::Mpa => write!(f, "mpa"),
            Architecture::Static => write!(f, "static"),
            Architecture::Game => write!(f, "game"),
            Architecture::Other(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    /// Attribute name to type string, in the order the model listed them.
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub validations: Vec<String>,
}

impl Model {
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }
}

/// Either the structured `{type, model}` form or a free-text phrase such as
/// `"belongs to Category"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relationship {
    Association {
        #[serde(rename = "type")]
        kind: RelationshipKind,
        #[serde(default)]
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<serde_json::Map<String, serde_json::Value>>,
    },
    Described(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipKind {
    HasOne,
    HasMany,
    BelongsTo,
    HasAndBelongsToMany,
    Other(String),
}

impl From<String> for RelationshipKind {
    fn from(raw: String) -> Self {
        match vocabulary_key(&raw).as_str() {
            "hasone" => RelationshipKind::HasOne,
            "hasmany" => RelationshipKind::HasMany,
            "belongsto" => RelationshipKind::BelongsTo,
            "hasandbelongstomany" => RelationshipKind::HasAndBelongsToMany,
            _ => RelationshipKind::Other(raw),
        }
    }
}

impl From<RelationshipKind> for String {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::HasOne => "hasOne".to_string(),
            RelationshipKind::HasMany => "hasMany".to_string(),
            RelationshipKind::BelongsTo => "belongsTo".to_string(),
            RelationshipKind::HasAndBelongsToMany => "hasAndBelongsToMany".to_string(),
            RelationshipKind::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub data_requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controller {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub before_filters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
    pub controller: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Other(String),
}

impl From<String> for HttpMethod {
    fn from(raw: String) -> Self {
        match vocabulary_key(&raw).as_str() {
            "get" => HttpMethod::Get,
            "post" => HttpMethod::Post,
            "put" => HttpMethod::Put,
            "patch" => HttpMethod::Patch,
            "delete" => HttpMethod::Delete,
            _ => HttpMethod::Other(raw),
        }
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => "GET".to_string(),
            HttpMethod::Post => "POST".to_string(),
            HttpMethod::Put => "PUT".to_string(),
            HttpMethod::Patch => "PATCH".to_string(),
            HttpMethod::Delete => "DELETE".to_string(),
            HttpMethod::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_stories: Vec<String>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
}
