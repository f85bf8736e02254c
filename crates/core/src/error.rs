//! Error types for loading and rendering a résumé.

use rirekisho_layout::FormatError;
use rirekisho_render_core::RenderError;
use std::fmt;
use thiserror::Error;

/// One field of the input that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProblem {
    /// Dotted path into the input document, e.g. `personal_info.email`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every problem found in a résumé document, not just the first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("résumé validation failed:\n{}", format_problems(.problems))]
pub struct ValidationError {
    pub problems: Vec<FieldProblem>,
}

fn format_problems(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationError {
    pub fn has_problem_at(&self, path: &str) -> bool {
        self.problems.iter().any(|p| p.path == path)
    }
}

/// The main error enum for all high-level operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML deserialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Formatting error: {0}")]
    Format(#[from] FormatError),
    #[error("Rendering error: {0}")]
    Render(RenderError),
}

impl From<RenderError> for PipelineError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Io(io) => PipelineError::Io(io),
            other => PipelineError::Render(other),
        }
    }
}
