//! Builder pattern for region queries.
//!
//! Provides a fluent API for configuring and running a query against a
//! layout dump on disk.
//!
//! # Example
//! ```ignore
//! use bbtext_core::api::RegionQuery;
//! use bbtext_core::query::CoverMode;
//!
//! let lines = RegionQuery::new("layout.xml")
//!     .page(3)
//!     .top_left(72.0, 72.0, 200.0, 40.0)
//!     .mode(CoverMode::Overlaps)
//!     .run()?;
//! ```

use std::path::{Path, PathBuf};

use crate::error::{QueryError, Result};
use crate::query::{CoverMode, Query, QueryRegion};
use crate::reconstruct::MatchedLine;
use crate::source::open_layout_file;

use super::high_level::{PageQueryReport, query_page_report};

#[derive(Debug, Clone, Copy, PartialEq)]
enum RegionSpec {
    Corners(f64, f64, f64, f64),
    TopLeft(f64, f64, f64, f64),
}

/// A builder for configuring a region query.
///
/// Region and mode are validated when the query runs, before the layout
/// dump is opened.
#[derive(Debug, Clone)]
pub struct RegionQuery {
    source: PathBuf,
    page: usize,
    region: Option<RegionSpec>,
    mode: CoverMode,
}

impl RegionQuery {
    /// Creates a query against the layout dump at `source`.
    ///
    /// Defaults to page 1 and [`CoverMode::Contains`].
    pub fn new(source: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            page: 1,
            region: None,
            mode: CoverMode::default(),
        }
    }

    /// Sets the page to query (1-indexed).
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Sets the region from two opposite corners in page space.
    pub fn corners(mut self, ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        self.region = Some(RegionSpec::Corners(ax, ay, bx, by));
        self
    }

    /// Sets the region as (x, y, width, height) from the top-left of the page.
    pub fn top_left(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.region = Some(RegionSpec::TopLeft(x, y, width, height));
        self
    }

    /// Sets the covering mode.
    pub fn mode(mut self, mode: CoverMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validates the configuration into a [`Query`].
    pub fn build_query(&self) -> Result<Query> {
        let region = match self.region {
            Some(RegionSpec::Corners(ax, ay, bx, by)) => QueryRegion::corners(ax, ay, bx, by)?,
            Some(RegionSpec::TopLeft(x, y, w, h)) => QueryRegion::top_left(x, y, w, h)?,
            None => return Err(QueryError::InvalidRegion("no region given".to_string())),
        };
        if self.page == 0 {
            return Err(QueryError::InvalidPageNumber(self.page));
        }
        Ok(Query::new(region, self.mode))
    }

    /// Runs the query and returns a report.
    pub fn run_report(&self) -> Result<PageQueryReport> {
        let query = self.build_query()?;
        let mut source = open_layout_file(&self.source)?;
        query_page_report(&mut source, self.page, &query)
    }

    /// Runs the query and returns the matched lines.
    pub fn run(&self) -> Result<Vec<MatchedLine>> {
        self.run_report().map(|report| report.matches)
    }
}
