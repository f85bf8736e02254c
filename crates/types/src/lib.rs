pub mod geometry;
pub mod record;

pub use geometry::{Point, Rect, Size};
pub use record::{AdditionalInfo, DateToken, PersonalInfo, ResumeRecord, TimelineEntry};
