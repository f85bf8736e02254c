//! Core rendering abstractions for the rirekisho form.
//!
//! This crate provides the seam between layout and output:
//! - `PageCanvas`, the primitive drawing operations the form is built from
//! - stroke and line style types
//! - `RenderError`
//! - `RecordingCanvas`, which records calls instead of producing a file

mod error;
pub mod recording;
mod traits;
mod types;
pub mod utils;

pub use error::RenderError;
pub use recording::{DrawOp, RecordingCanvas};
pub use traits::PageCanvas;
pub use types::{LineStyle, Stroke, StrokeWeight};
