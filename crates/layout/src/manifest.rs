//! Declarative assignment of form sections to pages.
//!
//! The form always has two pages. Which section lands on which page is a
//! property of the paper form, not of the content, so it is written down as
//! an ordered manifest. Sections of a page are stacked top to bottom with a
//! fixed gap; the tables take the height the flow calculator gives them.

use crate::flow::{SectionGroup, TableLayout, TableSpec};
use crate::form::FormGeometry;
use crate::region::LayoutRegion;
use rirekisho_types::geometry::Rect;

pub const EDUCATION_LABEL: &str = "学歴";
pub const WORK_LABEL: &str = "職歴";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Title,
    PersonalInfo,
    /// Combined education and work table.
    Career,
    Certifications,
    /// Commute time, dependents, spouse and spouse support cells.
    Commute,
    /// Skills and hobbies.
    Skills,
    Motivation,
    /// Free-form requests from the applicant (本人希望記入欄).
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionHeight {
    Fixed(f32),
    CareerTable,
    CertificationTable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionPlacement {
    pub section: SectionKind,
    /// Zero-based page index.
    pub page: usize,
    pub height: SectionHeight,
}

impl SectionPlacement {
    pub fn new(section: SectionKind, page: usize, height: SectionHeight) -> Self {
        Self {
            section,
            page,
            height,
        }
    }
}

/// Entry counts that drive the table heights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub education: usize,
    pub work: usize,
    pub certifications: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutManifest {
    /// Top edge of the first section on each page.
    pub page_tops: Vec<f32>,
    pub placements: Vec<SectionPlacement>,
}

/// A section with its computed region.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSection {
    pub section: SectionKind,
    pub region: LayoutRegion,
    pub table: Option<TableLayout>,
    /// Height cut off at the bottom of the page.
    pub overflow: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub index: usize,
    pub sections: Vec<PlacedSection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan {
    pub pages: Vec<PagePlan>,
    /// Sections that start below the bottom of their page and are not drawn.
    pub dropped: Vec<SectionKind>,
}

impl DocumentPlan {
    pub fn section(&self, kind: SectionKind) -> Option<&PlacedSection> {
        self.pages
            .iter()
            .flat_map(|page| page.sections.iter())
            .find(|placed| placed.section == kind)
    }

    pub fn page_of(&self, kind: SectionKind) -> Option<usize> {
        self.pages
            .iter()
            .find(|page| page.sections.iter().any(|placed| placed.section == kind))
            .map(|page| page.index)
    }
}

/// Groups of the combined education/work table.
pub fn career_groups(counts: &TableCounts) -> Vec<SectionGroup> {
    vec![
        SectionGroup::labeled(EDUCATION_LABEL, counts.education),
        SectionGroup::labeled(WORK_LABEL, counts.work),
    ]
}

pub fn certification_groups(counts: &TableCounts) -> Vec<SectionGroup> {
    vec![SectionGroup::unlabeled(counts.certifications)]
}

impl LayoutManifest {
    /// The rirekisho's fixed assignment: personal info and the career table
    /// on page one; certifications and the four free-text blocks on page two.
    pub fn standard(form: &FormGeometry) -> Self {
        use SectionHeight::*;
        use SectionKind::*;

        let placements = vec![
            SectionPlacement::new(Title, 0, Fixed(form.title_height)),
            SectionPlacement::new(PersonalInfo, 0, Fixed(form.personal.height)),
            SectionPlacement::new(Career, 0, CareerTable),
            SectionPlacement::new(Certifications, 1, CertificationTable),
            SectionPlacement::new(Commute, 1, Fixed(form.commute_height)),
            SectionPlacement::new(Skills, 1, Fixed(form.skills_height)),
            SectionPlacement::new(Motivation, 1, Fixed(form.motivation_height)),
            SectionPlacement::new(Request, 1, Fixed(form.request_height)),
        ];

        Self {
            page_tops: vec![form.page_one_top, form.page_two_top],
            placements,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_tops.len()
    }

    /// Resolves every placement into page coordinates.
    pub fn plan(&self, form: &FormGeometry, counts: &TableCounts) -> DocumentPlan {
        let bottom = form.bottom_limit();
        let left = form.content_left();
        let width = form.content_width();

        let mut pages: Vec<PagePlan> = (0..self.page_count())
            .map(|index| PagePlan {
                index,
                sections: Vec::new(),
            })
            .collect();
        let mut dropped = Vec::new();

        for (page_index, page) in pages.iter_mut().enumerate() {
            let mut cursor = self.page_tops[page_index];

            for placement in self.placements.iter().filter(|p| p.page == page_index) {
                if cursor >= bottom {
                    log::warn!(
                        "Section {:?} starts below page {} (y={:.1}) and is not drawn",
                        placement.section,
                        page_index + 1,
                        cursor
                    );
                    dropped.push(placement.section);
                    continue;
                }

                let placed = match placement.height {
                    SectionHeight::Fixed(height) => {
                        let rect = Rect::new(left, cursor, width, height);
                        place_fixed(placement.section, rect, form, bottom)
                    }
                    SectionHeight::CareerTable => place_table(
                        placement.section,
                        &form.career,
                        &career_groups(counts),
                        true,
                        left,
                        cursor,
                        width,
                        bottom,
                    ),
                    SectionHeight::CertificationTable => place_table(
                        placement.section,
                        &form.certifications,
                        &certification_groups(counts),
                        counts.certifications > 0,
                        left,
                        cursor,
                        width,
                        bottom,
                    ),
                };

                cursor = placed.region.rect.bottom() + form.section_gap;
                page.sections.push(placed);
            }
        }

        for placement in &self.placements {
            if placement.page >= self.page_count() {
                log::warn!(
                    "Section {:?} is assigned to page {} but the form has {} pages",
                    placement.section,
                    placement.page + 1,
                    self.page_count()
                );
                dropped.push(placement.section);
            }
        }

        DocumentPlan { pages, dropped }
    }
}

fn place_fixed(
    section: SectionKind,
    rect: Rect,
    form: &FormGeometry,
    bottom: f32,
) -> PlacedSection {
    let overflow = (rect.bottom() - bottom).max(0.0);
    let mut rect = rect;
    if overflow > 0.0 {
        log::warn!(
            "Section {:?} overflows the page by {:.1}pt and is clipped",
            section,
            overflow
        );
        rect.height -= overflow;
    }

    let region = match section {
        SectionKind::PersonalInfo => {
            let p = &form.personal;
            LayoutRegion::with_dividers(
                rect,
                vec![
                    p.furigana_bottom,
                    p.name_bottom,
                    p.birth_bottom,
                    p.contact_bottom,
                    p.address_furigana_bottom,
                ],
            )
        }
        SectionKind::Commute => LayoutRegion::equal_columns(rect, 4),
        _ => LayoutRegion::new(rect),
    };

    PlacedSection {
        section,
        region,
        table: None,
        overflow,
    }
}

#[allow(clippy::too_many_arguments)]
fn place_table(
    section: SectionKind,
    spec: &TableSpec,
    groups: &[SectionGroup],
    end_marker: bool,
    left: f32,
    top: f32,
    width: f32,
    bottom: f32,
) -> PlacedSection {
    let table = spec.layout(top, groups, end_marker, bottom);
    let rect = table.frame(left, width);
    let dividers = table.rule_ys().iter().map(|y| y - top).collect();
    let overflow = table.total_height - table.visible_height();

    PlacedSection {
        section,
        region: LayoutRegion::with_dividers(rect, dividers),
        table: Some(table),
        overflow,
    }
}
