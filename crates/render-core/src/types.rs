use serde::Serialize;

/// The two line weights of the form: regular rules and the heavy outer frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrokeWeight {
    Regular,
    Heavy,
}

impl StrokeWeight {
    pub fn width(self) -> f32 {
        match self {
            StrokeWeight::Regular => 0.5,
            StrokeWeight::Heavy => 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineStyle {
    Solid,
    /// Dash 3pt, gap 2pt.
    Dashed,
}

impl LineStyle {
    /// Dash array and phase for the PDF `d` operator.
    pub fn dash_pattern(self) -> (&'static [f32], f32) {
        match self {
            LineStyle::Solid => (&[], 0.0),
            LineStyle::Dashed => (&[3.0, 2.0], 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stroke {
    pub weight: StrokeWeight,
    pub style: LineStyle,
}

impl Stroke {
    pub const REGULAR: Stroke = Stroke {
        weight: StrokeWeight::Regular,
        style: LineStyle::Solid,
    };
    pub const HEAVY: Stroke = Stroke {
        weight: StrokeWeight::Heavy,
        style: LineStyle::Solid,
    };
    pub const DASHED: Stroke = Stroke {
        weight: StrokeWeight::Regular,
        style: LineStyle::Dashed,
    };

    pub fn width(&self) -> f32 {
        self.weight.width()
    }
}
