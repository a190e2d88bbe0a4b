//! Layout model consumed by the matcher.
//!
//! Mirrors the structure a pdfminer-style layout engine produces:
//! a page holds text blocks, a block holds lines, a line holds glyphs
//! and whitespace markers in reading order.

pub mod character;
pub mod page;
pub mod textbox;
pub mod textline;

pub use character::{Glyph, Whitespace};
pub use page::Page;
pub use textbox::TextBlock;
pub use textline::{LineElement, TextLine};
