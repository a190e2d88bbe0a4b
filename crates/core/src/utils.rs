//! Utility types and functions shared by the layout model and the matcher.

/// A bounding box (x0, y0, x1, y1) in page space: origin bottom-left, y up.
pub type Rect = (f64, f64, f64, f64);

/// Large value used as the seed of min/max envelope folds.
pub const INF_F64: f64 = f64::MAX;

/// Tolerance used when comparing coordinates read back from layout dumps.
pub const BBOX_EPSILON: f64 = 1e-6;

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Compares two rectangles coordinate by coordinate.
pub fn rect_approx_eq(a: Rect, b: Rect, epsilon: f64) -> bool {
    approx_eq(a.0, b.0, epsilon)
        && approx_eq(a.1, b.1, epsilon)
        && approx_eq(a.2, b.2, epsilon)
        && approx_eq(a.3, b.3, epsilon)
}

/// Trait for objects with a bounding box.
pub trait HasBBox {
    fn x0(&self) -> f64;
    fn y0(&self) -> f64;
    fn x1(&self) -> f64;
    fn y1(&self) -> f64;

    fn bbox(&self) -> Rect {
        (self.x0(), self.y0(), self.x1(), self.y1())
    }

    fn width(&self) -> f64 {
        self.x1() - self.x0()
    }

    fn height(&self) -> f64 {
        self.y1() - self.y0()
    }
}

impl HasBBox for Rect {
    fn x0(&self) -> f64 {
        self.0
    }
    fn y0(&self) -> f64 {
        self.1
    }
    fn x1(&self) -> f64 {
        self.2
    }
    fn y1(&self) -> f64 {
        self.3
    }
}

/// Smallest rectangle enclosing both inputs.
pub fn bbox_union(a: Rect, b: Rect) -> Rect {
    (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
}

/// Envelope of a sequence of rectangles, or `None` when the sequence is empty.
pub fn get_bound<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Rect> {
    let mut bound = (INF_F64, INF_F64, -INF_F64, -INF_F64);
    let mut any = false;
    for rect in rects {
        bound = bbox_union(bound, rect);
        any = true;
    }
    any.then_some(bound)
}

/// Formats a bounding box as a string.
pub fn bbox2str(bbox: Rect) -> String {
    let (x0, y0, x1, y1) = bbox;
    format!("{:.3},{:.3},{:.3},{:.3}", x0, y0, x1, y1)
}

pub(crate) fn fmt_rect(bbox: &Rect) -> String {
    bbox2str(*bbox)
}

/// Parses a `bbox` attribute of the form `x0,y0,x1,y1`.
///
/// Returns `None` unless exactly four finite numbers are present.
pub fn parse_bbox(s: &str) -> Option<Rect> {
    let mut it = s.split(',').map(|part| part.trim().parse::<f64>());
    let x0 = it.next()?.ok()?;
    let y0 = it.next()?.ok()?;
    let x1 = it.next()?.ok()?;
    let y1 = it.next()?.ok()?;
    if it.next().is_some() {
        return None;
    }
    let rect = (x0, y0, x1, y1);
    [x0, y0, x1, y1]
        .iter()
        .all(|v| v.is_finite())
        .then_some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        assert_eq!(
            parse_bbox("56.800,709.994,103.780,721.994"),
            Some((56.8, 709.994, 103.78, 721.994))
        );
        assert_eq!(parse_bbox(" 1, 2 ,3,4"), Some((1.0, 2.0, 3.0, 4.0)));
        assert_eq!(parse_bbox("1,2,3"), None);
        assert_eq!(parse_bbox("1,2,3,4,5"), None);
        assert_eq!(parse_bbox("1,2,x,4"), None);
        assert_eq!(parse_bbox("1,2,inf,4"), None);
    }

    #[test]
    fn test_bbox2str_roundtrip_precision() {
        let s = bbox2str((0.0, 1.5, 2.25, 3.125));
        assert_eq!(s, "0.000,1.500,2.250,3.125");
    }

    #[test]
    fn test_get_bound() {
        assert_eq!(get_bound(Vec::<Rect>::new()), None);
        let rects = vec![(2.0, 0.0, 3.0, 1.0), (0.0, -1.0, 1.0, 0.5)];
        assert_eq!(get_bound(rects), Some((0.0, -1.0, 3.0, 1.0)));
    }

    #[test]
    fn test_rect_approx_eq() {
        let a = (0.0, 0.0, 1.0, 1.0);
        assert!(rect_approx_eq(a, (0.0, 0.0, 1.0 + 1e-9, 1.0), BBOX_EPSILON));
        assert!(!rect_approx_eq(a, (0.0, 0.0, 1.001, 1.0), BBOX_EPSILON));
    }

    #[test]
    fn test_has_bbox_for_rect() {
        let r: Rect = (1.0, 2.0, 4.0, 8.0);
        assert_eq!(r.width(), 3.0);
        assert_eq!(r.height(), 6.0);
        assert_eq!(HasBBox::bbox(&r), r);
    }
}
