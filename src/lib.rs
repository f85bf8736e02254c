//! Renders a Japanese résumé (履歴書) as a fixed two-page A4 PDF.
//!
//! ```no_run
//! use rirekisho::{ResumeGenerator, load_resume_file};
//!
//! let record = load_resume_file("data/resume.yaml")?;
//! let generator = ResumeGenerator::builder().with_photo("data/photo.png").build()?;
//! let report = generator.generate_to_file(&record, "resume.pdf")?;
//! assert_eq!(report.pages, 2);
//! # Ok::<(), rirekisho::PipelineError>(())
//! ```

pub use rirekisho_core::{
    Clip, Fallback, FieldProblem, PipelineError, RenderReport, ResumeGenerator,
    ResumeGeneratorBuilder, ValidationError, load_resume_file, parse_resume_json,
    parse_resume_yaml,
};
pub use rirekisho_layout::{
    Clock, DateStyle, FixedClock, FormGeometry, FormatError, LayoutManifest, SectionKind,
    SystemClock,
};
pub use rirekisho_render_core::{DrawOp, PageCanvas, RecordingCanvas, RenderError, Stroke};
pub use rirekisho_render_lopdf::LopdfCanvas;
pub use rirekisho_types::{
    AdditionalInfo, DateToken, PersonalInfo, Point, Rect, ResumeRecord, Size, TimelineEntry,
};

// Whole crates for callers that need the lower layers.
pub use rirekisho_core as pipeline;
pub use rirekisho_layout as layout;
pub use rirekisho_render_core as render;
pub use rirekisho_types as types;
