//! Error types for bbtext layout queries.

use thiserror::Error;

use crate::utils::{Rect, fmt_rect};

/// Primary error type for region queries.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot open layout document {path}: {msg}")]
    DocumentOpen { path: String, msg: String },

    #[error("layout format error at byte {pos}: {msg}")]
    LayoutFormat { pos: u64, msg: String },

    #[error("unrecognized covering mode: {0} (expected contains or overlaps)")]
    InvalidCoverMode(String),

    #[error("invalid query region: {0}")]
    InvalidRegion(String),

    #[error("invalid page number: {0} (pages are numbered from 1)")]
    InvalidPageNumber(usize),

    #[error("degenerate glyph {text:?} with bbox {}", fmt_rect(.bbox))]
    DegenerateGlyph { text: String, bbox: Rect },

    #[error(
        "text block bbox {} does not match the union of its lines {}",
        fmt_rect(.block),
        fmt_rect(.lines)
    )]
    BlockBBoxMismatch { block: Rect, lines: Rect },
}

impl QueryError {
    /// Returns true for violations of the layout engine's output contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            QueryError::DegenerateGlyph { .. } | QueryError::BlockBBoxMismatch { .. }
        )
    }
}

/// Convenience Result type alias for QueryError.
pub type Result<T> = std::result::Result<T, QueryError>;
