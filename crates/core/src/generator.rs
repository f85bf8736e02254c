use crate::content::ContentRenderer;
use crate::error::PipelineError;
use crate::frame::FrameRenderer;
use crate::report::RenderReport;
use rirekisho_layout::calendar::{Clock, DateStyle, SystemClock};
use rirekisho_layout::format::format_birth_date;
use rirekisho_layout::{DocumentPlan, FormGeometry, LayoutManifest, SectionKind, TableCounts};
use rirekisho_render_core::PageCanvas;
use rirekisho_render_lopdf::LopdfCanvas;
use rirekisho_types::record::ResumeRecord;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Renders résumé records onto the two-page form.
///
/// A generator holds only configuration and can render any number of
/// records; each render owns its canvas.
pub struct ResumeGenerator {
    form: FormGeometry,
    manifest: LayoutManifest,
    photo: Option<PathBuf>,
    clock: Arc<dyn Clock>,
    date_style: DateStyle,
}

/// A builder for creating a `ResumeGenerator`.
pub struct ResumeGeneratorBuilder {
    form: FormGeometry,
    photo: Option<PathBuf>,
    clock: Arc<dyn Clock>,
    date_style: DateStyle,
}

impl Default for ResumeGeneratorBuilder {
    fn default() -> Self {
        Self {
            form: FormGeometry::default(),
            photo: None,
            clock: Arc::new(SystemClock),
            date_style: DateStyle::default(),
        }
    }
}

impl ResumeGeneratorBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Path of the portrait to embed. A missing or unreadable file falls back
    /// to the placeholder box at render time.
    pub fn with_photo<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.photo = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_optional_photo(mut self, path: Option<PathBuf>) -> Self {
        self.photo = path;
        self
    }

    /// Source of the render date used for `現在`, the "as of" line and the age.
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_date_style(mut self, style: DateStyle) -> Self {
        self.date_style = style;
        self
    }

    /// Replaces the form geometry, e.g. to change the minimum row counts.
    pub fn with_form(mut self, form: FormGeometry) -> Self {
        self.form = form;
        self
    }

    pub fn build(self) -> Result<ResumeGenerator, PipelineError> {
        let form = self.form;
        if form.page.width <= 0.0 || form.page.height <= 0.0 {
            return Err(PipelineError::Config(format!(
                "Page size must be positive, got {}x{}",
                form.page.width, form.page.height
            )));
        }
        let fixed_columns = form.personal.photo_column_width + form.personal.label_width;
        if form.content_width() <= fixed_columns {
            return Err(PipelineError::Config(format!(
                "Margin {} leaves no room for the personal block",
                form.margin
            )));
        }
        let tables = [
            ("career", &form.career),
            ("certification", &form.certifications),
        ];
        for (name, spec) in tables {
            if spec.row_height <= 0.0 {
                return Err(PipelineError::Config(format!(
                    "{} table row height must be positive",
                    name
                )));
            }
        }

        let manifest = LayoutManifest::standard(&form);
        Ok(ResumeGenerator {
            form,
            manifest,
            photo: self.photo,
            clock: self.clock,
            date_style: self.date_style,
        })
    }
}

impl ResumeGenerator {
    pub fn builder() -> ResumeGeneratorBuilder {
        ResumeGeneratorBuilder::new()
    }

    pub fn form(&self) -> &FormGeometry {
        &self.form
    }

    /// Section placement for `record` without drawing anything.
    pub fn plan(&self, record: &ResumeRecord) -> DocumentPlan {
        let counts = TableCounts {
            education: record.education.len(),
            work: record.work.len(),
            certifications: record.certifications.len(),
        };
        self.manifest.plan(&self.form, &counts)
    }

    /// Draws both pages onto `canvas`: frame first, then content, per page.
    ///
    /// The canvas must have its first page open. An invalid birth date fails
    /// before anything is drawn.
    pub fn render<C: PageCanvas + ?Sized>(
        &self,
        record: &ResumeRecord,
        canvas: &mut C,
    ) -> Result<RenderReport, PipelineError> {
        format_birth_date(&record.personal.birth_date)?;

        let plan = self.plan(record);
        let frame = FrameRenderer::new(&self.form);
        let content = ContentRenderer::new(&self.form, self.clock.as_ref(), self.date_style);
        let mut report = RenderReport {
            dropped: plan.dropped.clone(),
            ..Default::default()
        };

        for page in &plan.pages {
            if page.index > 0 {
                canvas.add_page()?;
            }
            log::debug!(
                "Rendering page {} ({} sections)",
                page.index + 1,
                page.sections.len()
            );

            frame.draw_page(canvas, page)?;
            let personal = page
                .sections
                .iter()
                .find(|s| s.section == SectionKind::PersonalInfo);
            if let Some(personal) = personal {
                let photo_box = self.form.personal.photo_box(personal.region.rect);
                frame.draw_photo(canvas, photo_box, self.photo.as_deref(), &mut report)?;
            }
            content.draw_page(canvas, page, record, &mut report)?;
        }

        report.pages = canvas.page_count();
        if !report.is_clean() {
            log::warn!(
                "Rendered with {} fallback(s), {} clipped section(s), {} dropped section(s)",
                report.fallbacks.len(),
                report.clipped.len(),
                report.dropped.len()
            );
        }
        Ok(report)
    }

    /// Renders to PDF bytes in memory.
    pub fn generate_to_bytes(
        &self,
        record: &ResumeRecord,
    ) -> Result<(Vec<u8>, RenderReport), PipelineError> {
        let mut canvas = LopdfCanvas::new(self.form.page)?;
        let report = self.render(record, &mut canvas)?;
        let bytes = canvas.finish()?;
        log::debug!(
            "Encoded {} page(s) into {} bytes",
            report.pages,
            bytes.len()
        );
        Ok((bytes, report))
    }

    /// Renders and writes the finished PDF to `writer` in a single write.
    pub fn generate_to_writer<W: Write>(
        &self,
        record: &ResumeRecord,
        writer: &mut W,
    ) -> Result<RenderReport, PipelineError> {
        let (bytes, report) = self.generate_to_bytes(record)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(report)
    }

    pub fn generate_to_file<P: AsRef<Path>>(
        &self,
        record: &ResumeRecord,
        path: P,
    ) -> Result<RenderReport, PipelineError> {
        let path = path.as_ref();
        let (bytes, report) = self.generate_to_bytes(record)?;
        fs::write(path, &bytes).map_err(|e| with_path(e, path))?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(report)
    }

    /// Like [`generate_to_file`](Self::generate_to_file), with the file write
    /// performed by tokio.
    pub async fn generate_to_file_async<P: AsRef<Path>>(
        &self,
        record: &ResumeRecord,
        path: P,
    ) -> Result<RenderReport, PipelineError> {
        let path = path.as_ref();
        let (bytes, report) = self.generate_to_bytes(record)?;
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| with_path(e, path))?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(report)
    }
}

fn with_path(e: io::Error, path: &Path) -> PipelineError {
    PipelineError::Io(io::Error::new(
        e.kind(),
        format!("Failed to write PDF to '{}': {}", path.display(), e),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rirekisho_layout::calendar::FixedClock;
    use rirekisho_render_core::{DrawOp, RecordingCanvas, Stroke};
    use rirekisho_types::record::{PersonalInfo, TimelineEntry};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn generator() -> ResumeGenerator {
        ResumeGenerator::builder()
            .with_clock(FixedClock(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()))
            .build()
            .unwrap()
    }

    fn record() -> ResumeRecord {
        ResumeRecord {
            personal: PersonalInfo {
                name_kanji: "山田 太郎".into(),
                name_furigana: "やまだ たろう".into(),
                birth_date: "1995-06-04".into(),
                address: "東京都杉並区".into(),
                phone: "090-0000-0000".into(),
                email: "taro@example.com".into(),
                ..Default::default()
            },
            education: vec![TimelineEntry::new("2014-04", "入学", "東京大学")],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_produces_two_pages() -> Result<(), PipelineError> {
        init_logger();
        let form = FormGeometry::default();
        let mut canvas = RecordingCanvas::new(form.page);
        let report = generator().render(&record(), &mut canvas)?;
        assert_eq!(report.pages, 2);
        assert_eq!(canvas.page_count(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_birth_date_fails_before_drawing() {
        let mut record = record();
        record.personal.birth_date = "1995/06/04".into();
        let mut canvas = RecordingCanvas::new(FormGeometry::default().page);
        let result = generator().render(&record, &mut canvas);
        assert!(matches!(result, Err(PipelineError::Format(_))));
        assert!(canvas.page(0).is_empty());
    }

    #[test]
    fn test_zero_certifications_draw_minimum_blank_rows() -> Result<(), PipelineError> {
        let generator = ResumeGenerator::builder()
            .with_clock(FixedClock(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()))
            .with_form(FormGeometry::default().with_min_rows(15, 6))
            .build()?;
        let record = record();
        let plan = generator.plan(&record);
        let certs = plan
            .section(SectionKind::Certifications)
            .unwrap()
            .region
            .rect;

        let mut canvas = RecordingCanvas::new(generator.form().page);
        generator.render(&record, &mut canvas)?;

        assert_eq!(certs.height, 25.0 + 6.0 * 23.0);
        let row_rules = canvas
            .horizontal_lines(1, certs.y, certs.bottom())
            .into_iter()
            .filter(|(from, _, stroke)| {
                from.x == certs.x && *stroke == Stroke::REGULAR
            })
            .count();
        // header rule + five inner row rules
        assert_eq!(row_rules, 6);
        Ok(())
    }

    #[test]
    fn test_missing_photo_is_reported_not_fatal() -> Result<(), PipelineError> {
        let generator = ResumeGenerator::builder()
            .with_clock(FixedClock(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()))
            .with_photo("/nonexistent/photo.jpg")
            .build()?;
        let mut canvas = RecordingCanvas::new(generator.form().page);
        let report = generator.render(&record(), &mut canvas)?;
        assert!(report.used_photo_placeholder());
        let dashed_box = canvas.page(0).iter().any(|op| match op {
            DrawOp::Rect { stroke, .. } => *stroke == Stroke::DASHED,
            _ => false,
        });
        assert!(dashed_box);
        Ok(())
    }

    #[test]
    fn test_bad_form_is_a_config_error() {
        let mut form = FormGeometry::default();
        form.margin = 250.0;
        let result = ResumeGenerator::builder().with_form(form).build();
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_generate_to_file_writes_pdf() -> Result<(), PipelineError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("resume.pdf");
        let report = generator().generate_to_file(&record(), &path)?;
        assert_eq!(report.pages, 2);

        let bytes = std::fs::read(&path)?;
        assert!(bytes.starts_with(b"%PDF-1.7"));
        let doc = lopdf::Document::load_mem(&bytes)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        assert_eq!(doc.get_pages().len(), 2);
        Ok(())
    }

    #[test]
    fn test_write_into_missing_directory_is_io_error() {
        let path = "/nonexistent/dir/resume.pdf";
        let result = generator().generate_to_file(&record(), path);
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }

    #[tokio::test]
    async fn test_generate_to_file_async() -> Result<(), PipelineError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("resume.pdf");
        let report = generator().generate_to_file_async(&record(), &path).await?;
        assert_eq!(report.pages, 2);
        assert!(std::fs::metadata(&path)?.len() > 0);
        Ok(())
    }
}
