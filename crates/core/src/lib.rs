//! bbtext - query the text lines inside a rectangle of a laid-out page.
//!
//! Pages come from a layout engine as text blocks, lines, glyphs and
//! whitespace markers. Given a page number and a query rectangle, the
//! matcher finds, for each line, the contiguous run of glyphs that the
//! rectangle contains (or overlaps) and reports its text and bbox.

pub mod api;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod matcher;
pub mod query;
pub mod reconstruct;
pub mod source;
pub mod utils;

// Re-export high_level for convenience
pub use api::high_level;

pub use error::{QueryError, Result};
pub use query::{CoverMode, Query, QueryRegion};
pub use reconstruct::MatchedLine;
pub use source::{PageSource, XmlPageSource, open_layout_file};
