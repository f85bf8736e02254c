/// Convert layout Y coordinate to PDF Y coordinate (flip origin)
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Baseline of a line of text whose box starts at `top`.
pub fn baseline_y(top: f32, font_size: f32) -> f32 {
    top + font_size * 0.8
}
