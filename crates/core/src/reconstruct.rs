//! Turns a matched run into text and a tight bounding box.

use serde::{Serialize, Serializer};

use crate::matcher::MatchedRun;
use crate::utils::{HasBBox, Rect, get_bound};

/// One matched line: the run's text and the envelope of its glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedLine {
    pub text: String,
    pub bbox: Rect,
}

impl MatchedLine {
    /// Reconstructs text and bbox from a run.
    pub fn from_run(run: &MatchedRun<'_>) -> Self {
        let text = run.elements().iter().map(|e| e.get_text()).collect();
        // Runs always open with a glyph, so the bound exists.
        let bbox = get_bound(run.glyphs().map(|g| g.bbox())).unwrap_or_default();
        Self { text, bbox }
    }
}

impl HasBBox for MatchedLine {
    fn x0(&self) -> f64 {
        self.bbox.0
    }
    fn y0(&self) -> f64 {
        self.bbox.1
    }
    fn x1(&self) -> f64 {
        self.bbox.2
    }
    fn y1(&self) -> f64 {
        self.bbox.3
    }
}

/// Wire form of a matched line: corners named `x1,y1` (lower-left) and
/// `x2,y2` (upper-right).
#[derive(Serialize)]
struct Record<'a> {
    text: &'a str,
    #[serde(rename = "x1")]
    x0: f64,
    #[serde(rename = "y1")]
    y0: f64,
    #[serde(rename = "x2")]
    x1: f64,
    #[serde(rename = "y2")]
    y1: f64,
}

impl Serialize for MatchedLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (x0, y0, x1, y1) = self.bbox;
        Record {
            text: &self.text,
            x0,
            y0,
            x1,
            y1,
        }
        .serialize(serializer)
    }
}
