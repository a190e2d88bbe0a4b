//! Query construction: covering mode and query region.

use std::fmt;
use std::str::FromStr;

use crate::error::{QueryError, Result};
use crate::geometry::{contains, normalize_corners, overlaps, top_left_to_page};
use crate::layout::Glyph;
use crate::utils::Rect;

/// How a glyph has to relate to the query rectangle to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoverMode {
    /// Glyph box lies fully inside the query box.
    #[default]
    Contains,
    /// Glyph box intersects the query box with non-zero area.
    Overlaps,
}

impl CoverMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            CoverMode::Contains => "contains",
            CoverMode::Overlaps => "overlaps",
        }
    }

    /// Applies the predicate for this mode.
    pub fn test(self, query: Rect, glyph: &Glyph) -> bool {
        match self {
            CoverMode::Contains => contains(query, glyph),
            CoverMode::Overlaps => overlaps(query, glyph),
        }
    }
}

impl FromStr for CoverMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contains" => Ok(CoverMode::Contains),
            "overlaps" => Ok(CoverMode::Overlaps),
            _ => Err(QueryError::InvalidCoverMode(s.to_string())),
        }
    }
}

impl fmt::Display for CoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query rectangle as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryRegion {
    /// Page-space box, already normalized.
    Corners(Rect),
    /// Box measured from the top-left corner of the page, y growing down.
    TopLeft {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl QueryRegion {
    /// Page-space region from two opposite corners, in either order.
    pub fn corners(ax: f64, ay: f64, bx: f64, by: f64) -> Result<Self> {
        check_finite(&[ax, ay, bx, by])?;
        Ok(QueryRegion::Corners(normalize_corners(ax, ay, bx, by)))
    }

    /// Top-left-origin region; converted once the page height is known.
    pub fn top_left(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        check_finite(&[x, y, width, height])?;
        if width < 0.0 || height < 0.0 {
            return Err(QueryError::InvalidRegion(format!(
                "negative extent {width}x{height}"
            )));
        }
        Ok(QueryRegion::TopLeft {
            x,
            y,
            width,
            height,
        })
    }

    /// Page-space rectangle for a page of the given height.
    pub fn resolve(&self, page_height: f64) -> Rect {
        match *self {
            QueryRegion::Corners(rect) => rect,
            QueryRegion::TopLeft {
                x,
                y,
                width,
                height,
            } => top_left_to_page(x, y, width, height, page_height),
        }
    }
}

fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(v) => Err(QueryError::InvalidRegion(format!(
            "non-finite coordinate {v}"
        ))),
        None => Ok(()),
    }
}

/// A region plus the covering mode to test glyphs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub region: QueryRegion,
    pub mode: CoverMode,
}

impl Query {
    pub fn new(region: QueryRegion, mode: CoverMode) -> Self {
        Self { region, mode }
    }

    /// Page-space query matching glyphs fully inside `rect`.
    pub fn contains(rect: Rect) -> Result<Self> {
        let (x0, y0, x1, y1) = rect;
        Ok(Self::new(
            QueryRegion::corners(x0, y0, x1, y1)?,
            CoverMode::Contains,
        ))
    }

    /// Page-space query matching glyphs that overlap `rect`.
    pub fn overlaps(rect: Rect) -> Result<Self> {
        let (x0, y0, x1, y1) = rect;
        Ok(Self::new(
            QueryRegion::corners(x0, y0, x1, y1)?,
            CoverMode::Overlaps,
        ))
    }

    /// Query given as (x, y, width, height) from the top-left of the page.
    pub fn top_left(x: f64, y: f64, width: f64, height: f64, mode: CoverMode) -> Result<Self> {
        Ok(Self::new(QueryRegion::top_left(x, y, width, height)?, mode))
    }

    /// Page-space rectangle for a page of the given height.
    pub fn resolve(&self, page_height: f64) -> Rect {
        self.region.resolve(page_height)
    }
}
