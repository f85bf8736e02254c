//! What a render had to give up on.
//!
//! Lenient parsing and page clipping never fail a render. They are logged and
//! collected here so callers can tell a clean render from a degraded one.

use rirekisho_layout::SectionKind;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    /// A timeline date token was not understood; its year and month cells are blank.
    BlankTimelineDate {
        section: SectionKind,
        /// Zero-based list within the table: education then work for the career table.
        group: usize,
        /// Zero-based index of the entry within its list.
        entry: usize,
        token: String,
    },
    /// The photo could not be used and the placeholder box was drawn.
    PhotoPlaceholder { reason: String },
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::BlankTimelineDate {
                section,
                group,
                entry,
                token,
            } => write!(
                f,
                "{:?} group {} entry {}: unrecognized date {:?}",
                section,
                group + 1,
                entry + 1,
                token
            ),
            Fallback::PhotoPlaceholder { reason } => {
                write!(f, "photo placeholder drawn: {}", reason)
            }
        }
    }
}

/// Content that did not fit on its page.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub section: SectionKind,
    /// Table rows or wrapped text lines that were not drawn. A single-row
    /// block cut by the page bottom counts as one row.
    pub lost: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub pages: usize,
    pub fallbacks: Vec<Fallback>,
    pub clipped: Vec<Clip>,
    /// Sections that started below the bottom of their page.
    pub dropped: Vec<SectionKind>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty() && self.clipped.is_empty() && self.dropped.is_empty()
    }

    pub(crate) fn fallback(&mut self, fallback: Fallback) {
        log::warn!("{}", fallback);
        self.fallbacks.push(fallback);
    }

    pub(crate) fn clip(&mut self, section: SectionKind, lost: usize) {
        if lost == 0 {
            return;
        }
        log::warn!(
            "{:?}: {} row(s) or line(s) did not fit and were clipped",
            section,
            lost
        );
        self.clipped.push(Clip { section, lost });
    }

    pub fn used_photo_placeholder(&self) -> bool {
        self.fallbacks
            .iter()
            .any(|f| matches!(f, Fallback::PhotoPlaceholder { .. }))
    }
}
