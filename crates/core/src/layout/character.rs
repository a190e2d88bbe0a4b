//! Character types: Glyph and Whitespace.
//!
//! A `Glyph` is a rendered character with a bounding box; a `Whitespace`
//! marker is a space or newline inferred by the layout engine and has no
//! geometry at all.

use crate::utils::{HasBBox, Rect};

/// Actual character in text with bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    text: String,
}

impl Glyph {
    pub fn new(bbox: Rect, text: &str) -> Self {
        let (x0, y0, x1, y1) = bbox;
        Self {
            x0,
            y0,
            x1,
            y1,
            text: text.to_string(),
        }
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    /// Returns true unless both width and height are strictly positive.
    ///
    /// NaN extents count as degenerate.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}

impl HasBBox for Glyph {
    fn x0(&self) -> f64 {
        self.x0
    }
    fn y0(&self) -> f64 {
        self.y0
    }
    fn x1(&self) -> f64 {
        self.x1
    }
    fn y1(&self) -> f64 {
        self.y1
    }
}

/// Virtual character inserted by the layout engine (space or newline).
///
/// Unlike `Glyph`, a whitespace marker has no bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitespace {
    text: String,
}

impl Whitespace {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn space() -> Self {
        Self::new(" ")
    }

    pub fn newline() -> Self {
        Self::new("\n")
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    pub fn is_newline(&self) -> bool {
        self.text == "\n"
    }
}
