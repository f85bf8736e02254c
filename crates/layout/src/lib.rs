//! Pure layout logic for the rirekisho form.
//!
//! Nothing in this crate touches a drawing surface: it turns a résumé record
//! into display strings and coordinates that the renderers consume.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("'{input}' is not a valid calendar date (expected YYYY-MM-DD)")]
    InvalidDate { input: String },
}

pub mod calendar;
pub mod flow;
pub mod form;
pub mod format;
pub mod manifest;
pub mod region;
pub mod text;

pub use calendar::{Clock, DateStyle, Era, EraYear, FixedClock, SystemClock};
pub use flow::{FlowRow, RowSlot, SectionGroup, TableLayout, TableSpec};
pub use form::{FormGeometry, PersonalBlockGeometry, TableColumns};
pub use format::{ParsedAddress, YearMonth};
pub use manifest::{
    DocumentPlan, LayoutManifest, PagePlan, PlacedSection, SectionHeight, SectionKind,
    SectionPlacement, TableCounts,
};
pub use region::LayoutRegion;

// Re-export geometry so downstream crates agree on a single set of types.
pub use rirekisho_types::geometry::{Point, Rect, Size};
