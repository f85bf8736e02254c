use lopdf::{Dictionary, Document as LopdfDocument, Object};

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj.as_reference() {
        Ok(id) => doc.get_object(id).ok().and_then(|o| o.as_dict().ok()),
        Err(_) => obj.as_dict().ok(),
    }
}

/// The resources dictionary of the first page.
pub fn page_resources(doc: &LopdfDocument) -> Option<&Dictionary> {
    let (_, page_id) = doc.get_pages().into_iter().next()?;
    let page = doc.get_object(page_id).ok()?.as_dict().ok()?;
    resolve(doc, page.get(b"Resources").ok()?)
}

/// BaseFont names referenced from the page resources.
pub fn extract_font_names(doc: &LopdfDocument) -> Vec<String> {
    let fonts = page_resources(doc)
        .and_then(|r| r.get(b"Font").ok())
        .and_then(|f| resolve(doc, f));
    let Some(fonts) = fonts else {
        return Vec::new();
    };
    fonts
        .iter()
        .filter_map(|(_, font)| resolve(doc, font))
        .filter_map(|font| font.get(b"BaseFont").ok()?.as_name().ok())
        .map(|name| String::from_utf8_lossy(name).to_string())
        .collect()
}

/// Number of image XObjects registered in the shared resources.
pub fn image_count(doc: &LopdfDocument) -> usize {
    page_resources(doc)
        .and_then(|r| r.get(b"XObject").ok())
        .and_then(|x| resolve(doc, x))
        .map(|x| x.len())
        .unwrap_or(0)
}

/// Width and height from a page's MediaBox.
pub fn media_box(doc: &LopdfDocument, page_number: u32) -> Option<(f32, f32)> {
    let page_id = *doc.get_pages().get(&page_number)?;
    let page = doc.get_object(page_id).ok()?.as_dict().ok()?;
    let mb = page.get(b"MediaBox").ok()?.as_array().ok()?;
    let num = |o: &Object| {
        o.as_float()
            .ok()
            .or_else(|| o.as_i64().ok().map(|i| i as f32))
    };
    Some((num(mb.get(2)?)?, num(mb.get(3)?)?))
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert that PDF contains a font matching a pattern
#[macro_export]
macro_rules! assert_pdf_has_font {
    ($pdf:expr, $pattern:expr) => {
        let fonts = $crate::common::pdf_assertions::extract_font_names(&$pdf.doc);
        assert!(
            fonts.iter().any(|f| f.contains($pattern)),
            "PDF should reference a font matching '{}', found: {:?}",
            $pattern,
            fonts
        );
    };
}
