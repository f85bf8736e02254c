//! Places the record's text into the regions the frame was drawn around.
//!
//! Positions come from the planned regions and the form geometry; nothing
//! here recomputes table heights or section offsets.

use crate::error::PipelineError;
use crate::report::{Fallback, RenderReport};
use rirekisho_layout::calendar::{Clock, DateStyle, age_on};
use rirekisho_layout::format::{
    format_as_of, format_birth_date_styled, format_timeline_date_styled, parse_address,
    parse_birth_date,
};
use rirekisho_layout::text::{clip_lines, text_width, wrap_text};
use rirekisho_layout::{FlowRow, FormGeometry, PagePlan, PlacedSection, SectionKind, TableLayout};
use rirekisho_render_core::PageCanvas;
use rirekisho_types::geometry::{Point, Rect};
use rirekisho_types::record::{ResumeRecord, TimelineEntry};

pub const TITLE: &str = "履 歴 書";
pub const END_MARKER: &str = "以上";
pub const CAREER_HEADING: &str = "学歴・職歴";
pub const CERTIFICATIONS_HEADING: &str = "免許・資格";
const REQUEST_LABEL: &str =
    "本人希望記入欄（特に給料・職種・勤務時間・勤務地・その他についての希望などがあれば記入）";

const TITLE_SIZE: f32 = 20.0;
const AS_OF_SIZE: f32 = 9.0;
const LABEL_SIZE: f32 = 8.0;
const READING_SIZE: f32 = 9.0;
const NAME_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const SMALL_SIZE: f32 = 8.0;
const CELL_LABEL_SIZE: f32 = 7.0;
const LINE_HEIGHT: f32 = 14.0;
const PADDING: f32 = 6.0;

pub struct ContentRenderer<'a> {
    form: &'a FormGeometry,
    clock: &'a dyn Clock,
    date_style: DateStyle,
}

impl<'a> ContentRenderer<'a> {
    pub fn new(form: &'a FormGeometry, clock: &'a dyn Clock, date_style: DateStyle) -> Self {
        Self {
            form,
            clock,
            date_style,
        }
    }

    pub fn draw_page<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        page: &PagePlan,
        record: &ResumeRecord,
        report: &mut RenderReport,
    ) -> Result<(), PipelineError> {
        for placed in &page.sections {
            self.draw_section(canvas, placed, record, report)?;
        }
        Ok(())
    }

    pub fn draw_section<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        placed: &PlacedSection,
        record: &ResumeRecord,
        report: &mut RenderReport,
    ) -> Result<(), PipelineError> {
        let rect = placed.region.rect;
        match placed.section {
            SectionKind::Title => {
                report.clip(placed.section, cut_rows(placed));
                self.title(canvas, rect)
            }
            SectionKind::PersonalInfo => self.personal(canvas, rect, record, report),
            SectionKind::Career => {
                let Some(table) = &placed.table else {
                    return Ok(());
                };
                let groups = [record.education.as_slice(), record.work.as_slice()];
                let table = TimelineTable {
                    section: placed.section,
                    frame: rect,
                    layout: table,
                    heading: CAREER_HEADING,
                };
                self.timeline_table(canvas, &table, &groups, report)
            }
            SectionKind::Certifications => {
                let Some(table) = &placed.table else {
                    return Ok(());
                };
                let groups = [record.certifications.as_slice()];
                let table = TimelineTable {
                    section: placed.section,
                    frame: rect,
                    layout: table,
                    heading: CERTIFICATIONS_HEADING,
                };
                self.timeline_table(canvas, &table, &groups, report)
            }
            SectionKind::Commute => {
                report.clip(placed.section, cut_rows(placed));
                self.commute(canvas, placed, record)
            }
            SectionKind::Skills => self.free_text(
                canvas,
                placed.section,
                rect,
                "趣味・特技",
                &record.additional.skills,
                report,
            ),
            SectionKind::Motivation => self.free_text(
                canvas,
                placed.section,
                rect,
                "志望の動機、アピールポイントなど",
                &record.additional.motivation,
                report,
            ),
            SectionKind::Request => self.free_text(
                canvas,
                placed.section,
                rect,
                REQUEST_LABEL,
                &record.additional.request,
                report,
            ),
        }
    }

    fn title<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        rect: Rect,
    ) -> Result<(), PipelineError> {
        let title_y = middle(rect.y, rect.height, TITLE_SIZE);
        canvas.place_text(TITLE, Point::new(rect.x, title_y), TITLE_SIZE)?;

        let as_of = format_as_of(self.clock.today(), self.date_style);
        let x = rect.x + text_width(TITLE, TITLE_SIZE) + 40.0;
        let y = rect.bottom() - AS_OF_SIZE - 4.0;
        canvas.place_text(&as_of, Point::new(x, y), AS_OF_SIZE)?;
        Ok(())
    }

    fn personal<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        block: Rect,
        record: &ResumeRecord,
        report: &mut RenderReport,
    ) -> Result<(), PipelineError> {
        let p = &self.form.personal;
        let info = &record.personal;
        let (x, y) = (block.x, block.y);
        let split = x + p.photo_column_x(block.width);
        let value_x = x + p.label_width + PADDING;

        let rows = [
            (0.0, p.furigana_bottom, "ふりがな"),
            (p.furigana_bottom, p.name_bottom, "氏　　名"),
            (p.name_bottom, p.birth_bottom, "生年月日"),
            (p.birth_bottom, p.contact_bottom, "携帯電話"),
            (p.contact_bottom, p.address_furigana_bottom, "ふりがな"),
            (p.address_furigana_bottom, p.height, "現 住 所"),
        ];
        for (top, bottom, label) in rows {
            let band = Rect::new(x, y + top, p.label_width, bottom - top);
            self.centered(canvas, label, band, LABEL_SIZE)?;
        }

        let band = |top: f32, bottom: f32, size: f32| middle(y + top, bottom - top, size);

        canvas.place_text(
            &info.name_furigana,
            Point::new(value_x, band(0.0, p.furigana_bottom, READING_SIZE)),
            READING_SIZE,
        )?;
        canvas.place_text(
            &info.name_kanji,
            Point::new(value_x, band(p.furigana_bottom, p.name_bottom, NAME_SIZE)),
            NAME_SIZE,
        )?;

        let birth = format_birth_date_styled(&info.birth_date, self.date_style)?;
        let age = age_on(parse_birth_date(&info.birth_date)?, self.clock.today());
        let birth_line = format!("{}生　（満 {} 歳）", birth, age);
        let birth_y = band(p.name_bottom, p.birth_bottom, BODY_SIZE);
        canvas.place_text(&birth_line, Point::new(value_x, birth_y), BODY_SIZE)?;

        let gender_x = x + p.gender_x;
        let gender_label_y = band(p.name_bottom, p.birth_bottom, LABEL_SIZE);
        let at = Point::new(gender_x + PADDING, gender_label_y);
        canvas.place_text("性別", at, LABEL_SIZE)?;
        if let Some(gender) = &info.gender {
            canvas.place_text(gender, Point::new(gender_x + 40.0, birth_y), BODY_SIZE)?;
        }

        let contact_y = band(p.birth_bottom, p.contact_bottom, READING_SIZE);
        canvas.place_text(&info.phone, Point::new(value_x, contact_y), READING_SIZE)?;
        let email_label = Rect::new(
            x + p.email_label_x,
            y + p.birth_bottom,
            p.email_value_x - p.email_label_x,
            p.contact_bottom - p.birth_bottom,
        );
        self.centered(canvas, "E-MAIL", email_label, LABEL_SIZE)?;
        canvas.place_text(
            &info.email,
            Point::new(x + p.email_value_x + 4.0, contact_y),
            READING_SIZE,
        )?;

        if let Some(reading) = &info.address_furigana {
            let reading_y = band(p.contact_bottom, p.address_furigana_bottom, READING_SIZE);
            canvas.place_text(reading, Point::new(value_x, reading_y), READING_SIZE)?;
        }

        let address = parse_address(&info.address);
        let address_top = y + p.address_furigana_bottom;
        if !address.postal_code.is_empty() {
            canvas.place_text(
                &format!("〒{}", address.postal_code),
                Point::new(value_x, address_top + 4.0),
                READING_SIZE,
            )?;
        }
        let lines_top = address_top + 4.0 + READING_SIZE + 4.0;
        let mut lines = wrap_text(&address.address, split - value_x - PADDING, BODY_SIZE);
        let lost = clip_lines(&mut lines, LINE_HEIGHT, block.bottom() - lines_top);
        report.clip(SectionKind::PersonalInfo, lost);
        self.lines(canvas, &lines, value_x, lines_top, BODY_SIZE)?;

        let sub = p.sub_block(block);
        let row_height = sub.height / 2.0;
        let sub_rows = [("電話", info.landline.as_deref()), ("FAX", info.fax.as_deref())];
        for (i, (label, value)) in sub_rows.into_iter().enumerate() {
            let row = Rect::new(sub.x, sub.y + i as f32 * row_height, sub.width, row_height);
            let label_cell = row.column(0.0, p.sub_block_label_width);
            self.centered(canvas, label, label_cell, LABEL_SIZE)?;
            if let Some(value) = value {
                canvas.place_text(
                    value,
                    Point::new(
                        row.x + p.sub_block_label_width + 4.0,
                        middle(row.y, row.height, SMALL_SIZE),
                    ),
                    SMALL_SIZE,
                )?;
            }
        }
        Ok(())
    }

    fn timeline_table<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        table: &TimelineTable<'_>,
        groups: &[&[TimelineEntry]],
        report: &mut RenderReport,
    ) -> Result<(), PipelineError> {
        let columns = &self.form.columns;
        let (frame, layout) = (table.frame, table.layout);
        let description_x = columns.description_x();
        let header = Rect::new(frame.x, frame.y, frame.width, layout.header_height);
        self.centered(canvas, "年", header.column(0.0, columns.year), LABEL_SIZE)?;
        let month = header.column(columns.year, columns.month);
        self.centered(canvas, "月", month, LABEL_SIZE)?;
        let description = header.column(description_x, frame.width - description_x);
        self.centered(canvas, table.heading, description, LABEL_SIZE)?;

        for slot in layout.visible_rows() {
            let row = Rect::new(frame.x, slot.y, frame.width, layout.row_height);
            let text_y = middle(row.y, row.height, BODY_SIZE);
            let description = row.column(description_x, row.width - description_x);

            match slot.row {
                FlowRow::GroupLabel { group } => {
                    if let Some(label) = layout.group_label(group) {
                        self.centered(canvas, label, description, BODY_SIZE)?;
                    }
                }
                FlowRow::Entry { group, index } => {
                    let found = groups.get(group).and_then(|entries| entries.get(index));
                    let Some(entry) = found else {
                        continue;
                    };
                    let date = format_timeline_date_styled(
                        entry.date.as_str(),
                        self.clock,
                        self.date_style,
                    );
                    if date.is_blank() {
                        report.fallback(Fallback::BlankTimelineDate {
                            section: table.section,
                            group,
                            entry: index,
                            token: entry.date.to_string(),
                        });
                    }
                    let year = row.column(0.0, columns.year);
                    self.centered(canvas, &date.year, year, BODY_SIZE)?;
                    let month = row.column(columns.year, columns.month);
                    self.centered(canvas, &date.month, month, BODY_SIZE)?;

                    let text = if entry.category.is_empty() {
                        entry.description.clone()
                    } else {
                        format!("{}　{}", entry.description, entry.category)
                    };
                    let at = Point::new(description.x + PADDING, text_y);
                    canvas.place_text(&text, at, BODY_SIZE)?;
                }
                FlowRow::Summary { entries } => {
                    let summary = summary_text(entries);
                    self.right_aligned(canvas, &summary, row, text_y)?;
                }
                FlowRow::EndMarker => {
                    self.right_aligned(canvas, END_MARKER, row, text_y)?;
                }
                FlowRow::Blank => {}
            }
        }

        report.clip(table.section, layout.clipped_rows());
        Ok(())
    }

    fn commute<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        placed: &PlacedSection,
        record: &ResumeRecord,
    ) -> Result<(), PipelineError> {
        let info = &record.additional;
        let dependents = info.dependents.map(|n| format!("{}人", n));
        let cells = [
            ("通勤時間", info.commute_time.clone().unwrap_or_default()),
            ("扶養家族数（配偶者を除く）", dependents.unwrap_or_default()),
            ("配偶者", presence(info.spouse)),
            ("配偶者の扶養義務", presence(info.spouse_support)),
        ];

        for (cell, (label, value)) in placed.region.columns().into_iter().zip(cells) {
            let at = Point::new(cell.x + 4.0, cell.y + 4.0);
            canvas.place_text(label, at, CELL_LABEL_SIZE)?;
            let label_band = 4.0 + CELL_LABEL_SIZE;
            let lower = Rect::new(
                cell.x,
                cell.y + label_band,
                cell.width,
                cell.height - label_band,
            );
            self.centered(canvas, &value, lower, BODY_SIZE)?;
        }
        Ok(())
    }

    fn free_text<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        section: SectionKind,
        rect: Rect,
        label: &str,
        text: &str,
        report: &mut RenderReport,
    ) -> Result<(), PipelineError> {
        let at = Point::new(rect.x + PADDING, rect.y + 4.0);
        canvas.place_text(label, at, LABEL_SIZE)?;

        let top = rect.y + 4.0 + LABEL_SIZE + PADDING;
        let mut lines = wrap_text(text, rect.width - 2.0 * PADDING, BODY_SIZE);
        let lost = clip_lines(&mut lines, LINE_HEIGHT, rect.bottom() - top - 4.0);
        report.clip(section, lost);
        self.lines(canvas, &lines, rect.x + PADDING, top, BODY_SIZE)
    }

    fn lines<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        lines: &[String],
        x: f32,
        top: f32,
        size: f32,
    ) -> Result<(), PipelineError> {
        for (i, line) in lines.iter().enumerate() {
            canvas.place_text(line, Point::new(x, top + i as f32 * LINE_HEIGHT), size)?;
        }
        Ok(())
    }

    fn right_aligned<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        text: &str,
        row: Rect,
        y: f32,
    ) -> Result<(), PipelineError> {
        let x = row.right() - PADDING * 2.0 - text_width(text, BODY_SIZE);
        canvas.place_text(text, Point::new(x, y), BODY_SIZE)?;
        Ok(())
    }

    fn centered<C: PageCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        text: &str,
        cell: Rect,
        size: f32,
    ) -> Result<(), PipelineError> {
        if text.is_empty() {
            return Ok(());
        }
        let x = cell.x + (cell.width - text_width(text, size)) / 2.0;
        canvas.place_text(text, Point::new(x, middle(cell.y, cell.height, size)), size)?;
        Ok(())
    }
}

/// One of the two date-ordered tables and where it was placed.
struct TimelineTable<'a> {
    section: SectionKind,
    frame: Rect,
    layout: &'a TableLayout,
    heading: &'a str,
}

/// Rows of a single-row block lost when the page bottom cut into it.
fn cut_rows(placed: &PlacedSection) -> usize {
    usize::from(placed.overflow > 0.0)
}

/// Text of the optional total row under the last entry.
pub fn summary_text(entries: usize) -> String {
    format!("計 {} 件", entries)
}

/// Top of a line of `size` text vertically centered in a band.
fn middle(top: f32, height: f32, size: f32) -> f32 {
    top + (height - size) / 2.0
}

/// `有` / `無`, or both for the applicant to circle when unknown.
fn presence(value: Option<bool>) -> String {
    match value {
        Some(true) => "有".to_string(),
        Some(false) => "無".to_string(),
        None => "有・無".to_string(),
    }
}
