//! Static line work of the form: outlines, rules and dividers.
//!
//! The frame is drawn before any content and depends on the record only
//! through the planned section regions (table heights follow entry counts).

use crate::report::{Fallback, RenderReport};
use rirekisho_layout::text::text_width;
use rirekisho_layout::{FormGeometry, PagePlan, PlacedSection, SectionKind, TableLayout};
use rirekisho_render_core::{PageCanvas, RenderError, Stroke};
use rirekisho_types::geometry::{Point, Rect};
use std::fs;
use std::path::Path;

const PLACEHOLDER_FONT_SIZE: f32 = 7.0;
const PLACEHOLDER_TEXT: [&str; 4] = ["写真をはる位置", "", "縦 36～40mm", "横 24～30mm"];

pub struct FrameRenderer<'a> {
    form: &'a FormGeometry,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(form: &'a FormGeometry) -> Self {
        Self { form }
    }

    pub fn draw_page<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        page: &PagePlan,
    ) -> Result<(), RenderError> {
        for placed in &page.sections {
            self.draw_section(canvas, placed)?;
        }
        Ok(())
    }

    pub fn draw_section<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        placed: &PlacedSection,
    ) -> Result<(), RenderError> {
        let rect = placed.region.rect;
        match placed.section {
            SectionKind::Title => Ok(()),
            SectionKind::PersonalInfo => self.personal_block(canvas, rect),
            SectionKind::Career | SectionKind::Certifications => match &placed.table {
                Some(table) => self.ruled_table(canvas, rect, table),
                None => canvas.draw_rect(rect, Stroke::HEAVY),
            },
            SectionKind::Commute => {
                canvas.draw_rect(rect, Stroke::HEAVY)?;
                for offset in &placed.region.dividers {
                    let x = rect.x + offset;
                    vertical(canvas, x, rect.y, rect.bottom(), Stroke::REGULAR)?;
                }
                Ok(())
            }
            SectionKind::Skills | SectionKind::Motivation | SectionKind::Request => {
                canvas.draw_rect(rect, Stroke::HEAVY)
            }
        }
    }

    /// The L-shaped personal block with its row and column dividers.
    fn personal_block<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        block: Rect,
    ) -> Result<(), RenderError> {
        let p = &self.form.personal;
        let (x, y) = (block.x, block.y);
        let split = x + p.photo_column_x(block.width);
        let cut = y + p.photo_cutout_height;
        let bottom = block.bottom();
        let label_x = x + p.label_width;

        let outline = [
            Point::new(x, y),
            Point::new(split, y),
            Point::new(split, cut),
            Point::new(block.right(), cut),
            Point::new(block.right(), bottom),
            Point::new(x, bottom),
        ];
        canvas.draw_polygon(&outline, Stroke::HEAVY)?;

        let rows = [
            (p.furigana_bottom, Stroke::DASHED),
            (p.name_bottom, Stroke::REGULAR),
            (p.birth_bottom, Stroke::REGULAR),
            (p.contact_bottom, Stroke::REGULAR),
            (p.address_furigana_bottom, Stroke::DASHED),
        ];
        for (offset, stroke) in rows {
            // The row at the cut-out depth only needs the part left of the photo column.
            horizontal(canvas, y + offset, x, split, stroke)?;
        }

        vertical(canvas, label_x, y, bottom, Stroke::REGULAR)?;

        let (birth_top, birth_bottom) = (y + p.name_bottom, y + p.birth_bottom);
        let gender_x = x + p.gender_x;
        vertical(canvas, gender_x, birth_top, birth_bottom, Stroke::REGULAR)?;
        let contact_y = y + p.contact_bottom;
        for offset in [p.email_label_x, p.email_value_x] {
            let line_x = x + offset;
            vertical(canvas, line_x, birth_bottom, contact_y, Stroke::REGULAR)?;
        }

        let sub = p.sub_block(block);
        vertical(canvas, sub.x, sub.y, sub.bottom(), Stroke::REGULAR)?;
        let middle = sub.y + sub.height / 2.0;
        horizontal(canvas, middle, sub.x, sub.right(), Stroke::REGULAR)?;
        let sub_label_x = sub.x + p.sub_block_label_width;
        vertical(canvas, sub_label_x, sub.y, sub.bottom(), Stroke::REGULAR)?;
        Ok(())
    }

    fn ruled_table<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        frame: Rect,
        table: &TableLayout,
    ) -> Result<(), RenderError> {
        canvas.draw_rect(frame, Stroke::HEAVY)?;
        for y in table.rule_ys() {
            horizontal(canvas, y, frame.x, frame.right(), Stroke::REGULAR)?;
        }

        let columns = &self.form.columns;
        for offset in [columns.year, columns.description_x()] {
            let x = frame.x + offset;
            // Year and month share a dashed divider on the paper form.
            let stroke = if offset == columns.year {
                Stroke::DASHED
            } else {
                Stroke::REGULAR
            };
            vertical(canvas, x, frame.y, frame.bottom(), stroke)?;
        }
        Ok(())
    }

    /// Embeds the photo in `photo_box`, or draws the placeholder when there is
    /// no usable photo.
    pub fn draw_photo<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        photo_box: Rect,
        photo: Option<&Path>,
        report: &mut RenderReport,
    ) -> Result<(), RenderError> {
        let Some(path) = photo else {
            log::debug!("No photo configured, drawing placeholder");
            return self.photo_placeholder(canvas, photo_box);
        };

        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                report.fallback(Fallback::PhotoPlaceholder {
                    reason: format!("cannot read '{}': {}", path.display(), e),
                });
                return self.photo_placeholder(canvas, photo_box);
            }
        };

        match canvas.embed_image(&data, photo_box) {
            Ok(()) => Ok(()),
            Err(RenderError::Image(reason)) => {
                report.fallback(Fallback::PhotoPlaceholder {
                    reason: format!("cannot decode '{}': {}", path.display(), reason),
                });
                self.photo_placeholder(canvas, photo_box)
            }
            Err(e) => Err(e),
        }
    }

    fn photo_placeholder<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        photo_box: Rect,
    ) -> Result<(), RenderError> {
        canvas.draw_rect(photo_box, Stroke::DASHED)?;

        let line_height = PLACEHOLDER_FONT_SIZE * 1.6;
        let block_height = PLACEHOLDER_TEXT.len() as f32 * line_height;
        let top = photo_box.y + (photo_box.height - block_height) / 2.0;
        for (i, line) in PLACEHOLDER_TEXT.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let width = text_width(line, PLACEHOLDER_FONT_SIZE);
            let x = photo_box.x + (photo_box.width - width) / 2.0;
            let y = top + i as f32 * line_height;
            canvas.place_text(line, Point::new(x, y), PLACEHOLDER_FONT_SIZE)?;
        }
        Ok(())
    }
}

fn horizontal<C: PageCanvas + ?Sized>(
    canvas: &mut C,
    y: f32,
    left: f32,
    right: f32,
    stroke: Stroke,
) -> Result<(), RenderError> {
    canvas.draw_line(Point::new(left, y), Point::new(right, y), stroke)
}

fn vertical<C: PageCanvas + ?Sized>(
    canvas: &mut C,
    x: f32,
    top: f32,
    bottom: f32,
    stroke: Stroke,
) -> Result<(), RenderError> {
    canvas.draw_line(Point::new(x, top), Point::new(x, bottom), stroke)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rirekisho_layout::{LayoutManifest, TableCounts};
    use rirekisho_render_core::{DrawOp, RecordingCanvas};

    fn standard_plan(counts: TableCounts) -> (FormGeometry, rirekisho_layout::DocumentPlan) {
        let form = FormGeometry::default();
        let plan = LayoutManifest::standard(&form).plan(&form, &counts);
        (form, plan)
    }

    #[test]
    fn test_personal_block_outline_has_photo_cutout() -> Result<(), RenderError> {
        let (form, plan) = standard_plan(TableCounts::default());
        let mut canvas = RecordingCanvas::new(form.page);
        let personal = plan.section(SectionKind::PersonalInfo).unwrap();
        FrameRenderer::new(&form).draw_section(&mut canvas, personal)?;

        let outline = canvas
            .page(0)
            .iter()
            .find_map(|op| match op {
                DrawOp::Polygon { points, stroke } => Some((points.clone(), *stroke)),
                _ => None,
            })
            .unwrap();
        assert_eq!(outline.1, Stroke::HEAVY);
        assert_eq!(outline.0.len(), 6);
        // The second vertex is the top-left corner of the cut-out.
        let block = personal.region.rect;
        assert!((outline.0[1].x - (block.right() - 120.0)).abs() < 0.01);
        assert_eq!(outline.0[2].y, block.y + 120.0);
        Ok(())
    }

    #[test]
    fn test_reading_rows_are_dashed() -> Result<(), RenderError> {
        let (form, plan) = standard_plan(TableCounts::default());
        let mut canvas = RecordingCanvas::new(form.page);
        let personal = plan.section(SectionKind::PersonalInfo).unwrap();
        FrameRenderer::new(&form).draw_section(&mut canvas, personal)?;

        let y = personal.region.rect.y;
        let dashed: Vec<f32> = canvas
            .horizontal_lines(0, y, y + 180.0)
            .into_iter()
            .filter(|(_, _, stroke)| *stroke == Stroke::DASHED)
            .map(|(from, _, _)| from.y - y)
            .collect();
        assert_eq!(dashed, vec![20.0, 120.0]);
        Ok(())
    }

    #[test]
    fn test_empty_certification_table_draws_minimum_rows() -> Result<(), RenderError> {
        let (form, plan) = standard_plan(TableCounts::default());
        let mut canvas = RecordingCanvas::new(form.page);
        let certs = plan.section(SectionKind::Certifications).unwrap();
        FrameRenderer::new(&form).draw_section(&mut canvas, certs)?;

        let rect = certs.region.rect;
        let full_width_rules = canvas
            .horizontal_lines(0, rect.y, rect.bottom())
            .into_iter()
            .filter(|(from, to, _)| {
                from.x == rect.x && (to.x - rect.right()).abs() < 0.01
            })
            .count();
        // Header rule plus one rule between each of the four blank rows.
        assert_eq!(full_width_rules, 4);
        assert_eq!(rect.height, 25.0 + 4.0 * 23.0);
        Ok(())
    }

    #[test]
    fn test_missing_photo_file_falls_back_to_placeholder() -> Result<(), RenderError> {
        let form = FormGeometry::default();
        let mut canvas = RecordingCanvas::new(form.page);
        let mut report = RenderReport::default();
        let photo_box = Rect::new(470.0, 83.0, 85.04, 113.39);

        FrameRenderer::new(&form).draw_photo(
            &mut canvas,
            photo_box,
            Some(Path::new("/nonexistent/photo.png")),
            &mut report,
        )?;

        assert!(report.used_photo_placeholder());
        assert!(canvas.images(0).is_empty());
        assert!(canvas.page(0).contains(&DrawOp::Rect {
            rect: photo_box,
            stroke: Stroke::DASHED
        }));
        assert!(canvas.texts(0).contains(&"写真をはる位置"));
        Ok(())
    }

    #[test]
    fn test_undecodable_photo_falls_back_to_placeholder() -> Result<(), RenderError> {
        let form = FormGeometry::default();
        let file = tempfile::NamedTempFile::new()?;
        std::fs::write(file.path(), b"not an image")?;
        let mut canvas = RecordingCanvas::new(form.page).rejecting_images();
        let mut report = RenderReport::default();

        FrameRenderer::new(&form).draw_photo(
            &mut canvas,
            Rect::new(470.0, 83.0, 85.04, 113.39),
            Some(file.path()),
            &mut report,
        )?;
        assert_eq!(report.fallbacks.len(), 1);
        assert!(canvas.images(0).is_empty());
        Ok(())
    }

    #[test]
    fn test_no_photo_is_not_a_fallback() -> Result<(), RenderError> {
        let form = FormGeometry::default();
        let mut canvas = RecordingCanvas::new(form.page);
        let mut report = RenderReport::default();
        let photo_box = Rect::new(0.0, 0.0, 85.0, 113.0);
        FrameRenderer::new(&form).draw_photo(&mut canvas, photo_box, None, &mut report)?;
        assert!(report.is_clean());
        assert!(!canvas.texts(0).is_empty());
        Ok(())
    }
}
