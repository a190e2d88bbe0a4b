//! High-level query API.
//!
//! # Example
//!
//! ```ignore
//! use bbtext_core::api::RegionQuery;
//!
//! let lines = RegionQuery::new("layout.xml")
//!     .page(2)
//!     .corners(72.0, 600.0, 300.0, 720.0)
//!     .run()?;
//! ```

pub mod builder;
pub mod high_level;

// Re-export for convenience
pub use builder::RegionQuery;
pub use high_level::{
    PageQueryReport, match_page, query_layout_file, query_page, query_page_report,
};
