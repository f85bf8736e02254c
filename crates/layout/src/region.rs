use rirekisho_types::geometry::Rect;

/// A rectangle plus the offsets of its internal dividers.
///
/// Regions are computed for every render and thrown away afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRegion {
    pub rect: Rect,
    /// Divider offsets relative to `rect`. Horizontal dividers for tables
    /// and stacked blocks, vertical ones for the commute cells.
    pub dividers: Vec<f32>,
}

impl LayoutRegion {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            dividers: Vec::new(),
        }
    }

    pub fn with_dividers(rect: Rect, dividers: Vec<f32>) -> Self {
        Self { rect, dividers }
    }

    /// Splits the region into `count` equal-width columns and records the
    /// inner column edges as dividers.
    pub fn equal_columns(rect: Rect, count: usize) -> Self {
        let count = count.max(1);
        let step = rect.width / count as f32;
        let dividers = (1..count).map(|i| i as f32 * step).collect();
        Self { rect, dividers }
    }

    /// The cells between consecutive vertical dividers.
    pub fn columns(&self) -> Vec<Rect> {
        let mut edges = Vec::with_capacity(self.dividers.len() + 2);
        edges.push(0.0);
        edges.extend(self.dividers.iter().copied());
        edges.push(self.rect.width);
        edges
            .windows(2)
            .map(|w| self.rect.column(w[0], w[1] - w[0]))
            .collect()
    }
}
