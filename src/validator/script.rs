//! Syntax check for JavaScript sources.
//!
//! Sources are parsed as ES modules, so `import`/`export` are accepted and
//! strict-mode rules apply. Early errors (duplicate bindings, `with`, and
//! the like) count as syntax errors. Only the first diagnostic is reported.

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

pub fn check(source: &str) -> Result<(), ScriptError> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::mjs()).parse();

    let early_errors = if parsed.errors.is_empty() && !parsed.panicked {
        SemanticBuilder::new()
            .with_check_syntax_error(true)
            .build(&parsed.program)
            .errors
    } else {
        Vec::new()
    };

    match parsed.errors.first().or(early_errors.first()) {
        Some(diagnostic) => {
            let offset = diagnostic
                .labels
                .as_ref()
                .and_then(|labels| labels.first())
                .map(|label| label.offset())
                .unwrap_or(0);
            Err(ScriptError {
                line: line_of(source, offset),
                message: diagnostic.message.to_string(),
            })
        }
        None if parsed.panicked => Err(ScriptError {
            line: 1,
            message: "parser gave up on this source".to_string(),
        }),
        None => Ok(()),
    }
}

/// 1-based line containing byte `offset`.
fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
