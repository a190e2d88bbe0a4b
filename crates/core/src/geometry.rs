//! Geometry predicates and coordinate conversion.
//!
//! Page space has its origin at the bottom-left with y growing upward.
//! Callers that think in screen terms (origin top-left, y growing down)
//! go through [`top_left_to_page`] before any predicate runs.

use crate::layout::Glyph;
use crate::utils::{HasBBox, Rect};

/// True iff the glyph box lies inside the query box, boundaries included.
pub fn contains(query: Rect, glyph: &Glyph) -> bool {
    let (qx0, qy0, qx1, qy1) = query;
    qx0 <= glyph.x0() && glyph.x1() <= qx1 && qy0 <= glyph.y0() && glyph.y1() <= qy1
}

/// True iff the boxes intersect with positive length on both axes.
///
/// Boxes that only touch along an edge do not overlap.
pub fn overlaps(query: Rect, glyph: &Glyph) -> bool {
    let (qx0, qy0, qx1, qy1) = query;
    !(qx1 <= glyph.x0() || glyph.x1() <= qx0 || qy1 <= glyph.y0() || glyph.y1() <= qy0)
}

/// Convert an (x, y, width, height) box given from the top-left corner of
/// the page into page space.
pub fn top_left_to_page(x: f64, y: f64, width: f64, height: f64, page_height: f64) -> Rect {
    (x, page_height - y - height, x + width, page_height - y)
}

/// Orders two opposite corners into an (x0, y0, x1, y1) box.
pub fn normalize_corners(ax: f64, ay: f64, bx: f64, by: f64) -> Rect {
    (ax.min(bx), ay.min(by), ax.max(bx), ay.max(by))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(bbox: Rect) -> Glyph {
        Glyph::new(bbox, "x")
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let q = (0.0, 0.0, 3.0, 1.0);
        assert!(contains(q, &glyph((0.0, 0.0, 3.0, 1.0))));
        assert!(contains(q, &glyph((1.0, 0.2, 2.0, 0.8))));
        assert!(!contains(q, &glyph((2.5, 0.0, 3.5, 1.0))));
        assert!(!contains(q, &glyph((0.0, -0.1, 1.0, 1.0))));
    }

    #[test]
    fn test_contains_every_margin_nonnegative() {
        let q = (10.0, 20.0, 30.0, 40.0);
        let steps = [0.0, 0.5, 2.0];
        for &l in &steps {
            for &b in &steps {
                for &r in &steps {
                    for &t in &steps {
                        let g = glyph((10.0 + l, 20.0 + b, 30.0 - r, 40.0 - t));
                        assert!(contains(q, &g), "margins {l} {b} {r} {t}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_overlaps_rejects_touching_edges() {
        let q = (1.0, 0.0, 2.0, 1.0);
        assert!(!overlaps(q, &glyph((0.0, 0.0, 1.0, 1.0))));
        assert!(!overlaps(q, &glyph((2.0, 0.0, 3.0, 1.0))));
        assert!(!overlaps(q, &glyph((1.0, 1.0, 2.0, 2.0))));
        assert!(!overlaps(q, &glyph((1.0, -1.0, 2.0, 0.0))));
    }

    #[test]
    fn test_overlaps_partial_and_enclosing() {
        let q = (1.0, 0.0, 2.0, 1.0);
        assert!(overlaps(q, &glyph((0.5, 0.5, 1.5, 1.5))));
        assert!(overlaps(q, &glyph((0.0, -1.0, 3.0, 2.0))));
        assert!(overlaps(q, &glyph((1.2, 0.2, 1.8, 0.8))));
    }

    #[test]
    fn test_contained_glyph_also_overlaps() {
        let q = (0.0, 0.0, 10.0, 10.0);
        for i in 0..9 {
            let x = i as f64;
            let g = glyph((x, x, x + 1.0, x + 1.0));
            assert!(contains(q, &g));
            assert!(overlaps(q, &g));
        }
    }

    #[test]
    fn test_top_left_to_page() {
        assert_eq!(
            top_left_to_page(10.0, 20.0, 30.0, 40.0, 792.0),
            (10.0, 732.0, 40.0, 772.0)
        );
        assert_eq!(top_left_to_page(0.0, 0.0, 0.0, 0.0, 100.0), (0.0, 100.0, 0.0, 100.0));
    }

    #[test]
    fn test_normalize_corners() {
        assert_eq!(normalize_corners(3.0, 1.0, 0.0, 0.0), (0.0, 0.0, 3.0, 1.0));
        assert_eq!(normalize_corners(0.0, 5.0, 2.0, -1.0), (0.0, -1.0, 2.0, 5.0));
    }
}
