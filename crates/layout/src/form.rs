//! Fixed geometry of the rirekisho form.
//!
//! Every number here describes the one paper form the renderer reproduces.
//! Offsets inside a block are relative to that block's top-left corner.

use crate::flow::TableSpec;
use rirekisho_types::geometry::{Rect, Size};

/// A4 width in points.
pub const A4_WIDTH: f32 = 595.28;
/// A4 height in points.
pub const A4_HEIGHT: f32 = 841.89;
pub const PAGE_MARGIN: f32 = 20.0;
pub const SECTION_GAP: f32 = 20.0;

/// Standard rirekisho photo size, 30mm x 40mm.
pub const PHOTO_SIZE: Size = Size {
    width: 85.04,
    height: 113.39,
};

/// Geometry of the personal-info block on page one.
///
/// The block is L-shaped: its top-right corner is cut out for the photo, and
/// the landline/FAX sub-block sits below the cut-out.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalBlockGeometry {
    pub height: f32,
    /// Width of the label column on the left.
    pub label_width: f32,
    /// Width of the photo cut-out and of the sub-block below it.
    pub photo_column_width: f32,
    pub photo_cutout_height: f32,
    /// Bottom edge of the name reading row (dashed).
    pub furigana_bottom: f32,
    pub name_bottom: f32,
    pub birth_bottom: f32,
    pub contact_bottom: f32,
    /// Bottom edge of the address reading row (dashed).
    pub address_furigana_bottom: f32,
    /// Divider between birth date and gender.
    pub gender_x: f32,
    /// Start of the E-MAIL label cell in the contact row.
    pub email_label_x: f32,
    /// Start of the E-MAIL value cell in the contact row.
    pub email_value_x: f32,
    pub sub_block_label_width: f32,
    pub photo: Size,
}

impl Default for PersonalBlockGeometry {
    fn default() -> Self {
        Self {
            height: 180.0,
            label_width: 80.0,
            photo_column_width: 120.0,
            photo_cutout_height: 120.0,
            furigana_bottom: 20.0,
            name_bottom: 55.0,
            birth_bottom: 80.0,
            contact_bottom: 100.0,
            address_furigana_bottom: 120.0,
            gender_x: 300.0,
            email_label_x: 200.0,
            email_value_x: 260.0,
            sub_block_label_width: 40.0,
            photo: PHOTO_SIZE,
        }
    }
}

impl PersonalBlockGeometry {
    /// X offset where the photo column starts, relative to the block.
    pub fn photo_column_x(&self, block_width: f32) -> f32 {
        block_width - self.photo_column_width
    }

    /// The photo box centered inside the cut-out, in page coordinates.
    pub fn photo_box(&self, block: Rect) -> Rect {
        let cutout = Rect::new(
            block.x + self.photo_column_x(block.width),
            block.y,
            self.photo_column_width,
            self.photo_cutout_height,
        );
        Rect::new(
            cutout.x + (cutout.width - self.photo.width) / 2.0,
            cutout.y + (cutout.height - self.photo.height) / 2.0,
            self.photo.width,
            self.photo.height,
        )
    }

    /// The landline/FAX sub-block below the photo cut-out.
    pub fn sub_block(&self, block: Rect) -> Rect {
        Rect::new(
            block.x + self.photo_column_x(block.width),
            block.y + self.photo_cutout_height,
            self.photo_column_width,
            self.height - self.photo_cutout_height,
        )
    }
}

/// Column widths shared by the ruled timeline tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableColumns {
    pub year: f32,
    pub month: f32,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            year: 50.0,
            month: 30.0,
        }
    }
}

impl TableColumns {
    /// Left edge of the description column, relative to the table.
    pub fn description_x(&self) -> f32 {
        self.year + self.month
    }
}

/// All constants of the form in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct FormGeometry {
    pub page: Size,
    pub margin: f32,
    pub section_gap: f32,
    pub page_one_top: f32,
    pub page_two_top: f32,
    pub title_height: f32,
    pub personal: PersonalBlockGeometry,
    pub columns: TableColumns,
    pub career: TableSpec,
    pub certifications: TableSpec,
    pub commute_height: f32,
    pub skills_height: f32,
    pub motivation_height: f32,
    pub request_height: f32,
}

impl Default for FormGeometry {
    fn default() -> Self {
        Self {
            page: Size::new(A4_WIDTH, A4_HEIGHT),
            margin: PAGE_MARGIN,
            section_gap: SECTION_GAP,
            page_one_top: PAGE_MARGIN,
            page_two_top: 50.0,
            title_height: 40.0,
            personal: PersonalBlockGeometry::default(),
            columns: TableColumns::default(),
            career: TableSpec {
                row_height: 23.0,
                header_height: 25.0,
                min_height: 380.0,
                min_rows: 15,
                summary_row: false,
            },
            certifications: TableSpec {
                row_height: 23.0,
                header_height: 25.0,
                min_height: 0.0,
                min_rows: 4,
                summary_row: false,
            },
            commute_height: 40.0,
            skills_height: 120.0,
            motivation_height: 160.0,
            request_height: 120.0,
        }
    }
}

impl FormGeometry {
    pub fn content_width(&self) -> f32 {
        self.page.width - 2.0 * self.margin
    }

    pub fn content_left(&self) -> f32 {
        self.margin
    }

    /// Lowest Y coordinate content may reach before it is clipped.
    pub fn bottom_limit(&self) -> f32 {
        self.page.height - self.margin
    }

    /// Returns a copy with different minimum row counts for the two tables.
    pub fn with_min_rows(mut self, career: usize, certifications: usize) -> Self {
        self.career.min_rows = career;
        self.certifications.min_rows = certifications;
        self
    }

    /// Returns a copy with the `計 N 件` summary row switched on or off in both tables.
    pub fn with_summary_rows(mut self, enabled: bool) -> Self {
        self.career.summary_row = enabled;
        self.certifications.summary_row = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal_block(form: &FormGeometry) -> Rect {
        let height = form.personal.height;
        Rect::new(form.margin, 80.0, form.content_width(), height)
    }

    #[test]
    fn test_photo_box_fits_inside_cutout() {
        let form = FormGeometry::default();
        let block = personal_block(&form);
        let photo = form.personal.photo_box(block);
        let cutout_x = block.x + form.personal.photo_column_x(block.width);

        assert!(photo.x >= cutout_x);
        assert!(photo.right() <= block.right() + 0.01);
        assert!(photo.y >= block.y);
        let cutout_bottom = block.y + form.personal.photo_cutout_height;
        assert!(photo.bottom() <= cutout_bottom);
    }

    #[test]
    fn test_sub_block_fills_column_below_cutout() {
        let form = FormGeometry::default();
        let block = personal_block(&form);
        let sub = form.personal.sub_block(block);
        assert_eq!(sub.y, 200.0);
        assert_eq!(sub.bottom(), block.bottom());
        assert!((sub.right() - block.right()).abs() < 0.01);
    }

    #[test]
    fn test_rows_are_ordered_inside_block() {
        let p = PersonalBlockGeometry::default();
        let rows = [
            p.furigana_bottom,
            p.name_bottom,
            p.birth_bottom,
            p.contact_bottom,
            p.address_furigana_bottom,
        ];
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
        assert!(p.address_furigana_bottom < p.height);
        assert_eq!(p.address_furigana_bottom, p.photo_cutout_height);
    }
}
