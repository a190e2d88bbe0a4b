//! Text blocks: ordered groups of lines with a union bbox.

use crate::error::{QueryError, Result};
use crate::utils::{BBOX_EPSILON, HasBBox, INF_F64, Rect, get_bound, rect_approx_eq};

use super::textline::TextLine;

/// A text box made of lines, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    index: usize,
    bbox: Rect,
    lines: Vec<TextLine>,
}

impl TextBlock {
    /// Creates a block with the bbox reported by the layout engine.
    pub fn new(index: usize, bbox: Rect, lines: Vec<TextLine>) -> Self {
        Self {
            index,
            bbox,
            lines,
        }
    }

    /// Creates a block whose bbox is the union of its lines.
    pub fn from_lines(index: usize, lines: Vec<TextLine>) -> Self {
        let bbox = get_bound(lines.iter().map(|l| l.bbox()))
            .unwrap_or((INF_F64, INF_F64, -INF_F64, -INF_F64));
        Self::new(index, bbox, lines)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Returns an iterator over lines in this block.
    pub fn iter(&self) -> impl Iterator<Item = &TextLine> {
        self.lines.iter()
    }

    /// Union of the line bboxes, or `None` for a block without lines.
    pub fn lines_bound(&self) -> Option<Rect> {
        get_bound(self.lines.iter().map(|l| l.bbox()))
    }

    /// Checks that the block bbox is the geometric union of its lines.
    ///
    /// A block without lines has nothing to check against.
    pub fn validate(&self) -> Result<()> {
        match self.lines_bound() {
            Some(lines) if !rect_approx_eq(self.bbox, lines, BBOX_EPSILON) => {
                Err(QueryError::BlockBBoxMismatch {
                    block: self.bbox,
                    lines,
                })
            }
            _ => Ok(()),
        }
    }
}

impl HasBBox for TextBlock {
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
