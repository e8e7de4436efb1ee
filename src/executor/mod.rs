//! Per-ticket code generation.
//!
//! Model, view and controller tickets ask the model for one class file and
//! fall back to a fixed template when the call fails or returns nothing.
//! Every other kind emits static files without calling the model.

use std::sync::{Arc, LazyLock};

use autocoder_common::{FileMapping, Ticket, TicketKind};
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::ExecutionError;
use crate::llm::{CompletionOptions, PromptClient};
use crate::synthesis::Provenance;
use crate::util::completion_code;

static MODEL_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Create ([A-Za-z0-9_]+) Model").unwrap());

static VIEW_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Create ([A-Za-z0-9_]+) View").unwrap());

static CONTROLLER_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Create ([A-Za-z0-9_]+)").unwrap());

pub const INDEX_HTML: &str = "index.html";
pub const APPLICATION_JS: &str = "app/assets/javascripts/application.js";
pub const APPLICATION_CSS: &str = "app/assets/stylesheets/application.css";

const SCAFFOLD: &[(&str, &str)] = &[
    (INDEX_HTML, include_str!("templates/scaffold/index.html")),
    (APPLICATION_CSS, include_str!("templates/scaffold/application.css")),
    (APPLICATION_JS, include_str!("templates/scaffold/application.js")),
    (
        "app/assets/javascripts/lib/application.js",
        include_str!("templates/scaffold/lib_application.js"),
    ),
    (
        "app/assets/javascripts/lib/router.js",
        include_str!("templates/scaffold/router.js"),
    ),
    ("app/models/base_model.js", include_str!("templates/scaffold/base_model.js")),
    (
        "app/controllers/base_controller.js",
        include_str!("templates/scaffold/base_controller.js"),
    ),
    ("app/views/base_view.js", include_str!("templates/scaffold/base_view.js")),
];

const ROUTE_FILES: &[(&str, &str)] =
    &[("app/config/routes.js", include_str!("templates/static/routes.js"))];

const TEST_FILES: &[(&str, &str)] = &[
    ("test/test_helper.js", include_str!("templates/static/test_helper.js")),
    ("test/models/model_test.js", include_str!("templates/static/model_test.js")),
];

const DEPLOYMENT_FILES: &[(&str, &str)] = &[
    ("package.json", include_str!("templates/static/package.json")),
    ("wrangler.toml", include_str!("templates/static/wrangler.toml")),
];

const MODEL_FALLBACK: &str = include_str!("templates/fallback/model.js");
const VIEW_FALLBACK: &str = include_str!("templates/fallback/view.js");
const CONTROLLER_FALLBACK: &str = include_str!("templates/fallback/controller.js");

/// Files produced by one ticket, to be merged over the accumulated mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketOutput {
    pub files: FileMapping,
    pub provenance: Provenance,
}

impl TicketOutput {
    fn fixed(files: &[(&str, &str)]) -> Self {
        Self {
            files: files.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect(),
            provenance: Provenance::Static,
        }
    }

    fn single(path: String, content: String, provenance: Provenance) -> Self {
        let mut files = FileMapping::new();
        files.insert(path, content);
        Self { files, provenance }
    }
}

/// The class-file ticket kinds, each with its own naming and fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Model,
    View,
    Controller,
}

impl Component {
    fn title_regex(&self) -> &'static Regex {
        match self {
            Component::Model => &MODEL_TITLE_REGEX,
            Component::View => &VIEW_TITLE_REGEX,
            Component::Controller => &CONTROLLER_TITLE_REGEX,
        }
    }

    fn default_name(&self) -> &'static str {
        match self {
            Component::Model => "Model",
            Component::View => "View",
            Component::Controller => "Controller",
        }
    }

    /// Target name from a ticket title, or the default when it does not match.
    pub fn extract_name(&self, title: &str) -> String {
        self.title_regex()
            .captures(title)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| self.default_name().to_string())
    }

    pub fn path(&self, name: &str) -> String {
        let lower = name.to_lowercase();
        match self {
            Component::Model => format!("app/models/{}.js", lower),
            Component::View => format!("app/views/{}_view.js", lower),
            Component::Controller => format!("app/controllers/{}_controller.js", lower),
        }
    }

    pub fn class_name(&self, name: &str) -> String {
        let suffix = match self {
            Component::Model => return name.to_string(),
            Component::View => "View",
            Component::Controller => "Controller",
        };
        if name.ends_with(suffix) {
            name.to_string()
        } else {
            format!("{}{}", name, suffix)
        }
    }

    pub fn fallback(&self, name: &str) -> String {
        let template = match self {
            Component::Model => MODEL_FALLBACK,
            Component::View => VIEW_FALLBACK,
            Component::Controller => CONTROLLER_FALLBACK,
        };
        template
            .replace("__CLASS__", &self.class_name(name))
            .replace("__LOWER__", &name.to_lowercase())
            .replace("__NAME__", name)
    }

    fn prompt(&self, name: &str, ticket: &Ticket, existing: &FileMapping) -> String {
        let class = self.class_name(name);
        let body = match self {
            Component::Model => format!(
                "Write a JavaScript ES module exporting class {class} that extends BaseModel \
                 (import it from './base_model.js').\n\
                 Follow Active Record conventions:\n\
                 - set `static collectionName` to the plural lower-case name\n\
                 - implement validate() filling this.errors\n\
                 - add custom instance methods and static finders where useful\n\n\
                 Ticket: {}",
                ticket.description
            ),
            Component::View => format!(
                "Write a JavaScript ES module exporting class {class} that extends BaseView \
                 (import it from './base_view.js').\n\
                 The view must:\n\
                 - render HTML from template literals in render(data)\n\
                 - use the linkTo, formFor, textField and submitButton helpers\n\
                 - be responsive and accessible\n\n\
                 Ticket: {}",
                ticket.description
            ),
            Component::Controller => format!(
                "Write a JavaScript ES module exporting class {class} that extends BaseController \
                 (import it from './base_controller.js').\n\
                 Implement the RESTful actions index, show, new, create, edit, update and destroy, \
                 use before filters where needed and handle errors with flash messages.\n\n\
                 Ticket: {}",
                ticket.description
            ),
        };

        let context: Vec<&str> = existing.paths().filter(|p| p.ends_with(".js")).collect();
        if context.is_empty() {
            format!("{}\n\nReturn only the code in a single ```javascript block.", body)
        } else {
            format!(
                "{}\n\nThe project already contains: {}\n\nReturn only the code in a single ```javascript block.",
                body,
                context.join(", ")
            )
        }
    }
}

pub struct TicketExecutor {
    client: Arc<dyn PromptClient>,
    options: CompletionOptions,
}

impl TicketExecutor {
    pub fn new(client: Arc<dyn PromptClient>, options: CompletionOptions) -> Self {
        Self { client, options }
    }

    /// Produce the file patch for `ticket`. Never fails: model problems end
    /// in a fallback template.
    pub async fn execute(&self, ticket: &Ticket, existing: &FileMapping) -> TicketOutput {
        let files = match ticket.kind {
            TicketKind::Migration => SCAFFOLD,
            TicketKind::Route => ROUTE_FILES,
            TicketKind::Test => TEST_FILES,
            TicketKind::Deployment => DEPLOYMENT_FILES,
            TicketKind::Model => return self.generate(Component::Model, ticket, existing).await,
            TicketKind::View => return self.generate(Component::View, ticket, existing).await,
            TicketKind::Controller => {
                return self.generate(Component::Controller, ticket, existing).await;
            }
        };
        TicketOutput::fixed(files)
    }

    async fn generate(
        &self,
        component: Component,
        ticket: &Ticket,
        existing: &FileMapping,
    ) -> TicketOutput {
        let name = component.extract_name(&ticket.title);
        let path = component.path(&name);
        let prompt = component.prompt(&name, ticket, existing);
        debug!(ticket = %ticket.id, path = %path, "Generating code");

        match self.request_code(&prompt, &path).await {
            Ok(code) => TicketOutput::single(path, code, Provenance::Model),
            Err(e) => {
                warn!(
                    ticket = %ticket.id,
                    path = %path,
                    error = %e,
                    "Code generation failed, using fallback template"
                );
                TicketOutput::single(path, component.fallback(&name), Provenance::fallback(e))
            }
        }
    }

    async fn request_code(&self, prompt: &str, path: &str) -> Result<String, ExecutionError> {
        let text = self.client.complete(prompt, &self.options).await?;
        completion_code(&text).ok_or_else(|| ExecutionError::EmptyCode {
            path: path.to_string(),
        })
    }
}
