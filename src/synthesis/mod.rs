//! Idea → pitch → technical spec, with deterministic fallbacks.
//!
//! Both stages make one model call, pull a JSON object out of the completion
//! and deserialize it. Any failure along the way yields the fixed fallback
//! value, tagged with [`Provenance::Fallback`] so callers can tell the two
//! apart without reading logs.

use std::sync::Arc;

use autocoder_common::{
    Architecture, Complexity, Controller, Feature, HttpMethod, Idea, Pitch, Route, TechStack,
    TechnicalSpec, ValidationError, View,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::SynthesisError;
use crate::llm::{CompletionOptions, PromptClient};
use crate::util::extract_json_candidate;

pub mod prompts;

/// Where a generated value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Parsed from model output
    Model,
    /// The model failed or its output was unusable
    Fallback { reason: String },
    /// Produced without consulting the model
    Static,
}

impl Provenance {
    pub fn fallback(reason: impl std::fmt::Display) -> Self {
        Provenance::Fallback {
            reason: reason.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Provenance::Fallback { .. })
    }
}

/// A value together with its [`Provenance`].
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Synthesized<T> {
    pub fn from_model(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Model,
        }
    }

    pub fn from_fallback(value: T, reason: impl std::fmt::Display) -> Self {
        Self {
            value,
            provenance: Provenance::fallback(reason),
        }
    }
}

pub struct SpecSynthesizer {
    client: Arc<dyn PromptClient>,
    options: CompletionOptions,
}

impl SpecSynthesizer {
    pub fn new(client: Arc<dyn PromptClient>, options: CompletionOptions) -> Self {
        Self { client, options }
    }

    /// Rejects ideas shorter than the minimum before calling the model.
    pub async fn build_pitch(&self, idea: &str) -> Result<Synthesized<Pitch>, ValidationError> {
        let idea = Idea::parse(idea)?;
        Ok(self.pitch_for(&idea).await)
    }

    pub async fn pitch_for(&self, idea: &Idea) -> Synthesized<Pitch> {
        let prompt = prompts::pitch_prompt(idea.as_str());
        match self.request::<Pitch>(&prompt, "pitch").await {
            Ok(pitch) => Synthesized::from_model(pitch),
            Err(e) => {
                warn!(error = %e, "Pitch synthesis failed, using fallback pitch");
                Synthesized::from_fallback(fallback_pitch(idea), e)
            }
        }
    }

    pub async fn build_spec(&self, pitch: &Pitch) -> Synthesized<TechnicalSpec> {
        let prompt = prompts::spec_prompt(pitch);
        match self.request::<TechnicalSpec>(&prompt, "technical spec").await {
            Ok(spec) => Synthesized::from_model(spec),
            Err(e) => {
                warn!(error = %e, "Spec synthesis failed, using fallback spec");
                Synthesized::from_fallback(fallback_spec(pitch), e)
            }
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        prompt: &str,
        what: &'static str,
    ) -> Result<T, SynthesisError> {
        debug!(client = self.client.name(), what, "Requesting {}", what);
        let text = self.client.complete(prompt, &self.options).await?;
        let candidate = extract_json_candidate(&text).ok_or(SynthesisError::NoJson)?;
        serde_json::from_str(candidate).map_err(|source| SynthesisError::Parse { what, source })
    }
}

/// Pitch derived only from the idea text.
pub fn fallback_pitch(idea: &Idea) -> Pitch {
    Pitch {
        title: idea.truncated(50),
        description: format!("A web application based on: {}", idea),
        target_audience: "General users".to_string(),
        key_features: vec![
            "Core functionality".to_string(),
            "User-friendly interface".to_string(),
            "Responsive design".to_string(),
        ],
        tech_stack: TechStack {
            frontend: vec![
                "HTML5".to_string(),
                "CSS3".to_string(),
                "JavaScript ES6+".to_string(),
            ],
            backend: Vec::new(),
            database: None,
        },
        estimated_complexity: Complexity::Medium,
    }
}

/// Single-view spec with one feature per key feature of the pitch.
pub fn fallback_spec(pitch: &Pitch) -> TechnicalSpec {
    TechnicalSpec {
        architecture: Architecture::Spa,
        models: Vec::new(),
        views: vec![View {
            name: "MainView".to_string(),
            path: "/".to_string(),
            components: vec!["App".to_string()],
            data_requirements: Vec::new(),
        }],
        controllers: vec![Controller {
            name: "AppController".to_string(),
            actions: vec!["init".to_string()],
            before_filters: Vec::new(),
        }],
        routes: vec![Route {
            method: HttpMethod::Get,
            path: "/".to_string(),
            controller: "AppController".to_string(),
            action: "init".to_string(),
        }],
        features: pitch
            .key_features
            .iter()
            .map(|f| Feature {
                name: f.clone(),
                description: f.clone(),
                user_stories: vec![format!("As a user, I want {}", f)],
                acceptance_criteria: vec![format!("The {} should work as expected", f)],
            })
            .collect(),
    }
}
