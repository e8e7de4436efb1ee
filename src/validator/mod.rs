//! Structural checks over a generated file mapping.
//!
//! Checks run in order and stop at the first failure: required files,
//! entry page markup, then every script file. Results are advisory.

use std::sync::LazyLock;

use autocoder_common::FileMapping;
use regex::Regex;

use crate::errors::ValidationFailure;
use crate::executor::{APPLICATION_CSS, APPLICATION_JS, INDEX_HTML};

mod script;

pub use script::{ScriptError, check as check_script};

pub const REQUIRED_FILES: [&str; 3] = [INDEX_HTML, APPLICATION_JS, APPLICATION_CSS];

static DOCTYPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype\s+html").unwrap());

static BODY_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body[\s>]").unwrap());

static BODY_CLOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").unwrap());

pub fn is_script(path: &str) -> bool {
    path.ends_with(".js") || path.ends_with(".mjs")
}

/// Run every check, returning the first failure.
pub fn check(files: &FileMapping) -> Result<(), ValidationFailure> {
    let missing: Vec<String> = REQUIRED_FILES
        .iter()
        .filter(|path| !files.contains(path))
        .map(|path| path.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationFailure::MissingFiles { paths: missing });
    }

    check_html(files.get(INDEX_HTML).unwrap_or_default())?;

    for (path, content) in files.iter().filter(|(path, _)| is_script(path)) {
        script::check(content).map_err(|e| ValidationFailure::ScriptSyntax {
            path: path.to_string(),
            line: e.line,
            message: e.message,
        })?;
    }

    Ok(())
}

pub fn validate(files: &FileMapping) -> bool {
    check(files).is_ok()
}

fn check_html(html: &str) -> Result<(), ValidationFailure> {
    let reason = if !DOCTYPE_REGEX.is_match(html) {
        "missing <!DOCTYPE html> declaration"
    } else if !BODY_OPEN_REGEX.is_match(html) {
        "missing opening <body> tag"
    } else if !BODY_CLOSE_REGEX.is_match(html) {
        "missing closing </body> tag"
    } else {
        return Ok(());
    };
    Err(ValidationFailure::MalformedHtml {
        reason: reason.to_string(),
    })
}
