//! Text lines: an ordered run of glyphs and whitespace markers.

use crate::utils::{HasBBox, INF_F64, Rect, get_bound};

use super::character::{Glyph, Whitespace};

/// Element in a text line - either a glyph or a whitespace marker.
#[derive(Debug, Clone, PartialEq)]
pub enum LineElement {
    Glyph(Glyph),
    Whitespace(Whitespace),
}

impl LineElement {
    pub fn get_text(&self) -> &str {
        match self {
            LineElement::Glyph(g) => g.get_text(),
            LineElement::Whitespace(w) => w.get_text(),
        }
    }

    pub fn as_glyph(&self) -> Option<&Glyph> {
        match self {
            LineElement::Glyph(g) => Some(g),
            LineElement::Whitespace(_) => None,
        }
    }
}

impl From<Glyph> for LineElement {
    fn from(glyph: Glyph) -> Self {
        LineElement::Glyph(glyph)
    }
}

impl From<Whitespace> for LineElement {
    fn from(ws: Whitespace) -> Self {
        LineElement::Whitespace(ws)
    }
}

/// A line of text in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    bbox: Rect,
    elements: Vec<LineElement>,
}

impl TextLine {
    /// Creates a line with the bbox reported by the layout engine.
    pub fn new(bbox: Rect, elements: Vec<LineElement>) -> Self {
        Self { bbox, elements }
    }

    /// Creates a line whose bbox is the envelope of its glyphs.
    ///
    /// A line without glyphs gets an inverted infinite bbox, so it never
    /// widens a union it takes part in.
    pub fn from_elements(elements: Vec<LineElement>) -> Self {
        let glyphs = elements.iter().filter_map(LineElement::as_glyph);
        let bbox = get_bound(glyphs.map(|g| g.bbox()))
            .unwrap_or((INF_F64, INF_F64, -INF_F64, -INF_F64));
        Self { bbox, elements }
    }

    /// Returns an iterator over elements in this text line.
    pub fn iter(&self) -> impl Iterator<Item = &LineElement> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[LineElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Full text of the line, newline markers included.
    pub fn get_text(&self) -> String {
        self.elements.iter().map(LineElement::get_text).collect()
    }
}

impl HasBBox for TextLine {
    fn x0(&self) -> f64 {
        self.bbox.0
    }
    fn y0(&self) -> f64 {
        self.bbox.1
    }
    fn x1(&self) -> f64 {
        self.bbox.2
    }
    fn y1(&self) -> f64 {
        self.bbox.3
    }
}
