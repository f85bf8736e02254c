//! # rirekisho-core
//!
//! Draws a résumé record onto the two-page rirekisho form.
//!
//! - **frame**: outlines, rules, dividers and the photo box
//! - **content**: the record's text placed into the planned regions
//! - **generator**: `ResumeGenerator`, page sequencing and output
//! - **loader**: JSON and YAML input and validation
//! - **report**: fallbacks and clipping observed during a render
//! - **error**: error types for the pipeline

// Re-export foundation crates
pub use rirekisho_layout as layout;
pub use rirekisho_render_core as render;
pub use rirekisho_types as types;

pub mod content;
pub mod error;
pub mod frame;
pub mod generator;
pub mod loader;
pub mod report;

pub use error::{FieldProblem, PipelineError, ValidationError};
pub use generator::{ResumeGenerator, ResumeGeneratorBuilder};
pub use loader::{load_resume_file, parse_resume_json, parse_resume_yaml};
pub use report::{Clip, Fallback, RenderReport};
