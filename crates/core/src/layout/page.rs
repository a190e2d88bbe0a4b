//! Pages: the text blocks of one laid-out page, in reading order.

use crate::utils::{HasBBox, Rect};

use super::textbox::TextBlock;

/// A laid-out page.
///
/// Only text blocks are kept. Figures, images and paths carry no lines and
/// are dropped by the page sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub pageid: usize,
    bbox: Rect,
    blocks: Vec<TextBlock>,
}

impl Page {
    pub fn new(pageid: usize, bbox: Rect) -> Self {
        Self {
            pageid,
            bbox,
            blocks: Vec::new(),
        }
    }

    pub fn add(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }

    pub fn with_blocks<I: IntoIterator<Item = TextBlock>>(mut self, blocks: I) -> Self {
        self.blocks.extend(blocks);
        self
    }

    /// Text blocks on this page, in reading order.
    pub fn text_blocks(&self) -> &[TextBlock] {
        &self.blocks
    }
}

impl HasBBox for Page {
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
