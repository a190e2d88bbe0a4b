//! Page query driver.
//!
//! Provides the entry points that tie page streams to the matcher:
//! - `query_page()` - Matched lines of one page of a page stream
//! - `query_page_report()` - Same, plus whether the page existed
//! - `match_page()` - Matched lines of a page already in memory
//! - `query_layout_file()` - Open a layout dump and query one of its pages

use std::path::Path;

use tracing::debug;

use crate::error::{QueryError, Result};
use crate::layout::Page;
use crate::matcher::match_line;
use crate::query::Query;
use crate::reconstruct::MatchedLine;
use crate::source::{PageSource, open_layout_file};
use crate::utils::{HasBBox, bbox2str};

/// Outcome of a page query.
///
/// `matches` is empty both when the page has no matching text and when
/// the document is shorter than the requested page; `page_found` tells
/// the two apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageQueryReport {
    pub page_found: bool,
    pub blocks_scanned: usize,
    pub lines_scanned: usize,
    pub matches: Vec<MatchedLine>,
}

fn scan_page(page: &Page, query: &Query, report: &mut PageQueryReport) -> Result<()> {
    let rect = query.resolve(page.height());
    debug!(
        pageid = page.pageid,
        query = %bbox2str(rect),
        mode = %query.mode,
        "matching page"
    );

    let mut matches = Vec::new();
    for block in page.text_blocks() {
        block.validate()?;
        report.blocks_scanned += 1;
        for line in block.iter() {
            report.lines_scanned += 1;
            if let Some(run) = match_line(line, rect, query.mode)? {
                let matched = MatchedLine::from_run(&run);
                debug!(text = %matched.text, bbox = %bbox2str(matched.bbox), "matched line");
                matches.push(matched);
            }
        }
    }
    report.matches = matches;
    Ok(())
}

/// Matches every line of every text block of `page`, in reading order.
///
/// Fails without partial results if the page breaks the layout contract.
pub fn match_page(page: &Page, query: &Query) -> Result<Vec<MatchedLine>> {
    let mut report = PageQueryReport {
        page_found: true,
        ..Default::default()
    };
    scan_page(page, query, &mut report)?;
    Ok(report.matches)
}

/// Queries page `page_number` (1-indexed) of a page stream.
///
/// Pages in front of the target are skipped, and nothing past the target
/// is read. A stream that ends early yields a report with `page_found`
/// unset and no matches.
pub fn query_page_report<S: PageSource + ?Sized>(
    source: &mut S,
    page_number: usize,
    query: &Query,
) -> Result<PageQueryReport> {
    if page_number == 0 {
        return Err(QueryError::InvalidPageNumber(page_number));
    }

    for skipped in 1..page_number {
        match source.skip_page() {
            Some(result) => {
                result?;
                debug!(page = skipped, "skipped page");
            }
            None => {
                debug!(page_number, pages = skipped - 1, "document ends before target page");
                return Ok(PageQueryReport::default());
            }
        }
    }

    let page = match source.next_page() {
        Some(page) => page?,
        None => {
            debug!(page_number, "document ends before target page");
            return Ok(PageQueryReport::default());
        }
    };

    let mut report = PageQueryReport {
        page_found: true,
        ..Default::default()
    };
    scan_page(&page, query, &mut report)?;
    debug!(
        page_number,
        blocks = report.blocks_scanned,
        lines = report.lines_scanned,
        matches = report.matches.len(),
        "page query done"
    );
    Ok(report)
}

/// Queries page `page_number` (1-indexed) of a page stream.
///
/// Returns an empty list when the stream has fewer pages.
pub fn query_page<S: PageSource + ?Sized>(
    source: &mut S,
    page_number: usize,
    query: &Query,
) -> Result<Vec<MatchedLine>> {
    query_page_report(source, page_number, query).map(|report| report.matches)
}

/// Opens a layout dump and queries one of its pages.
pub fn query_layout_file(
    path: impl AsRef<Path>,
    page_number: usize,
    query: &Query,
) -> Result<Vec<MatchedLine>> {
    if page_number == 0 {
        return Err(QueryError::InvalidPageNumber(page_number));
    }
    let mut source = open_layout_file(path)?;
    query_page(&mut source, page_number, query)
}
