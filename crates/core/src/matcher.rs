//! Line matcher: finds the run of a line that satisfies a query.
//!
//! A line is scanned once, left to right. Scanning starts in the
//! before-match state, where whitespace and non-matching glyphs are
//! skipped. The first matching glyph opens a run; from then on matching
//! glyphs and interior spaces are accumulated until the first glyph that
//! does not match, which completes the run and ends the scan. Newline
//! markers are never part of a run.
//!
//! Only the first run of a line is reported. A query rectangle spanning
//! two separated stretches of a line yields the leftmost stretch alone.

use std::ops::ControlFlow;

use tracing::trace;

use crate::error::{QueryError, Result};
use crate::layout::{Glyph, LineElement, TextLine};
use crate::query::CoverMode;
use crate::utils::{HasBBox, Rect};

/// Contiguous elements of a line that satisfied a query.
///
/// Always starts with a glyph and never holds a newline marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRun<'a> {
    elements: Vec<&'a LineElement>,
}

impl<'a> MatchedRun<'a> {
    pub fn elements(&self) -> &[&'a LineElement] {
        &self.elements
    }

    /// Glyphs of the run, whitespace markers left out.
    pub fn glyphs(&self) -> impl Iterator<Item = &'a Glyph> + '_ {
        self.elements.iter().filter_map(|&e| e.as_glyph())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

enum Scan<'a> {
    BeforeMatch,
    Accumulating(Vec<&'a LineElement>),
}

impl<'a> Scan<'a> {
    /// Advances the scan by one element.
    ///
    /// `Break` carries the completed run.
    fn step(
        self,
        element: &'a LineElement,
        query: Rect,
        mode: CoverMode,
    ) -> Result<ControlFlow<Vec<&'a LineElement>, Self>> {
        let next = match element {
            LineElement::Glyph(glyph) => {
                if glyph.is_degenerate() {
                    return Err(QueryError::DegenerateGlyph {
                        text: glyph.get_text().to_string(),
                        bbox: glyph.bbox(),
                    });
                }
                let hit = mode.test(query, glyph);
                match self {
                    Scan::BeforeMatch if hit => Scan::Accumulating(vec![element]),
                    Scan::BeforeMatch => Scan::BeforeMatch,
                    Scan::Accumulating(mut run) if hit => {
                        run.push(element);
                        Scan::Accumulating(run)
                    }
                    Scan::Accumulating(mut run) => {
                        // Spaces between the run and the glyph that closed it
                        // are not part of the run.
                        while run.last().is_some_and(|e| e.as_glyph().is_none()) {
                            run.pop();
                        }
                        return Ok(ControlFlow::Break(run));
                    }
                }
            }
            LineElement::Whitespace(ws) if ws.is_newline() => self,
            LineElement::Whitespace(_) => match self {
                Scan::BeforeMatch => Scan::BeforeMatch,
                Scan::Accumulating(mut run) => {
                    run.push(element);
                    Scan::Accumulating(run)
                }
            },
        };
        Ok(ControlFlow::Continue(next))
    }

    fn into_run(self) -> Option<Vec<&'a LineElement>> {
        match self {
            Scan::BeforeMatch => None,
            Scan::Accumulating(run) => Some(run),
        }
    }
}

/// Runs the matcher over one line.
///
/// Returns `Ok(None)` when no glyph of the line satisfies the query, and
/// fails on the first degenerate glyph visited.
pub fn match_line<'a>(
    line: &'a TextLine,
    query: Rect,
    mode: CoverMode,
) -> Result<Option<MatchedRun<'a>>> {
    let mut scan = Scan::BeforeMatch;
    for element in line.iter() {
        match scan.step(element, query, mode)? {
            ControlFlow::Continue(next) => scan = next,
            ControlFlow::Break(elements) => {
                trace!(len = elements.len(), "run closed by non-matching glyph");
                return Ok(Some(MatchedRun { elements }));
            }
        }
    }
    Ok(scan.into_run().map(|elements| MatchedRun { elements }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Whitespace;

    fn g(x0: f64, x1: f64, text: &str) -> LineElement {
        LineElement::Glyph(Glyph::new((x0, 0.0, x1, 1.0), text))
    }

    fn sp() -> LineElement {
        LineElement::Whitespace(Whitespace::space())
    }

    fn nl() -> LineElement {
        LineElement::Whitespace(Whitespace::newline())
    }

    fn text_of(run: &MatchedRun<'_>) -> String {
        run.elements().iter().map(|e| e.get_text()).collect()
    }

    fn run_text(elements: Vec<LineElement>, query: Rect, mode: CoverMode) -> Option<String> {
        let line = TextLine::from_elements(elements);
        match_line(&line, query, mode)
            .unwrap()
            .map(|run| text_of(&run))
    }

    #[test]
    fn test_full_line_match() {
        let text = run_text(
            vec![g(0.0, 1.0, "A"), sp(), g(2.0, 3.0, "B"), nl()],
            (0.0, 0.0, 3.0, 1.0),
            CoverMode::Contains,
        );
        assert_eq!(text.as_deref(), Some("A B"));
    }

    #[test]
    fn test_non_matching_glyph_ends_run_before_trailing_space() {
        let text = run_text(
            vec![g(0.0, 1.0, "A"), sp(), g(2.0, 3.0, "B"), nl()],
            (0.0, 0.0, 1.5, 1.0),
            CoverMode::Contains,
        );
        assert_eq!(text.as_deref(), Some("A"));
    }

    #[test]
    fn test_trailing_space_kept_when_line_ends_inside_query() {
        // No terminating glyph after the space: the run is closed by the
        // end of the line, so the space stays.
        let text = run_text(
            vec![g(0.0, 1.0, "A"), sp(), nl()],
            (0.0, 0.0, 5.0, 1.0),
            CoverMode::Contains,
        );
        assert_eq!(text.as_deref(), Some("A "));
    }

    #[test]
    fn test_leading_whitespace_dropped() {
        let text = run_text(
            vec![g(0.0, 1.0, "x"), sp(), sp(), g(2.0, 3.0, "B"), g(3.0, 4.0, "C")],
            (1.5, 0.0, 4.0, 1.0),
            CoverMode::Contains,
        );
        assert_eq!(text.as_deref(), Some("BC"));
    }

    #[test]
    fn test_only_first_run_is_reported() {
        let elements = vec![
            g(0.0, 1.0, "A"),
            g(1.0, 2.0, "B"),
            g(5.0, 6.0, "X"),
            g(8.0, 9.0, "C"),
            g(9.0, 10.0, "D"),
        ];
        let text = run_text(elements, (0.0, 0.0, 10.0, 1.0), CoverMode::Contains);
        assert_eq!(text.as_deref(), Some("ABXCD"));

        let gap = vec![
            g(0.0, 1.0, "A"),
            g(1.0, 2.0, "B"),
            LineElement::Glyph(Glyph::new((5.0, 5.0, 6.0, 6.0), "X")),
            g(8.0, 9.0, "C"),
            g(9.0, 10.0, "D"),
        ];
        let text = run_text(gap, (0.0, 0.0, 10.0, 1.0), CoverMode::Contains);
        assert_eq!(text.as_deref(), Some("AB"));
    }

    #[test]
    fn test_no_match() {
        let text = run_text(
            vec![g(0.0, 1.0, "A"), sp(), g(2.0, 3.0, "B"), nl()],
            (10.0, 10.0, 20.0, 20.0),
            CoverMode::Overlaps,
        );
        assert_eq!(text, None);
    }

    #[test]
    fn test_newline_in_the_middle_is_ignored() {
        let text = run_text(
            vec![g(0.0, 1.0, "A"), nl(), g(1.0, 2.0, "B")],
            (0.0, 0.0, 2.0, 1.0),
            CoverMode::Contains,
        );
        assert_eq!(text.as_deref(), Some("AB"));
    }

    #[test]
    fn test_overlaps_picks_partially_covered_glyphs() {
        let text = run_text(
            vec![g(0.0, 1.0, "A"), g(1.0, 2.0, "B"), g(2.0, 3.0, "C")],
            (0.5, 0.5, 1.5, 0.6),
            CoverMode::Overlaps,
        );
        assert_eq!(text.as_deref(), Some("AB"));

        // Touching the right edge of A only: A is excluded.
        let text = run_text(
            vec![g(0.0, 1.0, "A"), g(1.0, 2.0, "B"), g(2.0, 3.0, "C")],
            (1.0, 0.0, 1.5, 1.0),
            CoverMode::Overlaps,
        );
        assert_eq!(text.as_deref(), Some("B"));
    }

    #[test]
    fn test_degenerate_glyph_is_fatal() {
        let line = TextLine::from_elements(vec![
            g(0.0, 1.0, "A"),
            LineElement::Glyph(Glyph::new((1.0, 0.0, 1.0, 1.0), "|")),
        ]);
        let err = match_line(&line, (0.0, 0.0, 5.0, 5.0), CoverMode::Contains).unwrap_err();
        assert!(matches!(err, QueryError::DegenerateGlyph { ref text, .. } if text == "|"));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_glyphs_after_break_are_not_visited() {
        let line = TextLine::from_elements(vec![
            g(0.0, 1.0, "A"),
            g(4.0, 5.0, "Z"),
            LineElement::Glyph(Glyph::new((6.0, 0.0, 6.0, 1.0), "|")),
        ]);
        let run = match_line(&line, (0.0, 0.0, 2.0, 1.0), CoverMode::Contains)
            .unwrap()
            .unwrap();
        assert_eq!(text_of(&run), "A");
        assert_eq!(run.glyphs().count(), 1);
    }
}
