//! Prompt templates for pitch and spec synthesis.

use autocoder_common::Pitch;

const PITCH_PROMPT: &str = r#"You are a seasoned product manager and web architect.
Write a project pitch for the following app idea: "{idea}"

Hard constraints for the project:
- It runs entirely in the browser (HTML, JavaScript and CSS only)
- It can be deployed as a folder of static files
- It needs no backend server of any kind
- Data is persisted with localStorage and other standard web APIs

Answer with one JSON object of exactly this shape:
{
  "title": "Project Title",
  "description": "What the app does, in a few sentences",
  "targetAudience": "Who the app is for",
  "keyFeatures": ["feature one", "feature two"],
  "techStack": {
    "frontend": ["HTML5", "CSS3", "JavaScript ES6+"],
    "backend": [],
    "database": "localStorage"
  },
  "estimatedComplexity": "simple|medium|complex"
}"#;

const SPEC_PROMPT: &str = r#"You are a senior architect who follows Rails-style MVC conventions.
Produce a technical specification for this project pitch:

{pitch}

Adapt MVC to a client-side application:
- Models are JavaScript classes holding data and business rules
- Views render UI with template literals or custom elements
- Controllers handle events and application flow
- Routes drive client-side navigation

Answer with one JSON object of exactly this shape:
{
  "architecture": "spa|mpa|static|game",
  "models": [
    {
      "name": "ModelName",
      "attributes": { "attributeName": "type" },
      "relationships": [],
      "validations": []
    }
  ],
  "views": [
    {
      "name": "ViewName",
      "path": "/path",
      "components": ["ComponentA", "ComponentB"],
      "dataRequirements": ["ModelName"]
    }
  ],
  "controllers": [
    { "name": "ControllerName", "actions": ["index", "create", "update", "destroy"] }
  ],
  "routes": [
    { "method": "GET", "path": "/", "controller": "HomeController", "action": "index" }
  ],
  "features": [
    {
      "name": "Feature Name",
      "description": "What it does",
      "userStories": ["As a user, I want to ..."],
      "acceptanceCriteria": ["Given ..., when ..., then ..."]
    }
  ]
}"#;

pub fn pitch_prompt(idea: &str) -> String {
    PITCH_PROMPT.replace("{idea}", idea)
}

pub fn spec_prompt(pitch: &Pitch) -> String {
    let pitch_json = serde_json::to_string_pretty(pitch).unwrap_or_default();
    SPEC_PROMPT.replace("{pitch}", &pitch_json)
}
