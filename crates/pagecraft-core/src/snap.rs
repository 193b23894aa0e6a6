//! Alignment snapping for dragged blocks.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Distance threshold for edge snapping (in container pixels).
pub const SNAP_TOLERANCE: f64 = 5.0;

/// Guide line coordinates to draw while dragging. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapLines {
    /// Vertical guide at this x coordinate.
    pub x: Option<f64>,
    /// Horizontal guide at this y coordinate.
    pub y: Option<f64>,
}

impl SnapLines {
    /// No guides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if any guide is shown.
    pub fn is_snapped(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Which edge of the dragged block meets which edge of the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuideKind {
    /// Left meets left (or top meets top).
    StartToStart,
    /// Right of the dragged block meets left of the reference.
    EndToStart,
    /// Centers line up.
    CenterToCenter,
    /// Left of the dragged block meets right of the reference.
    StartToEnd,
    /// Right meets right (or bottom meets bottom).
    EndToEnd,
}

/// A single alignment candidate on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    /// Dragged block start coordinate (left or top) that produces the alignment.
    pub trigger: f64,
    /// Coordinate where the guide line is drawn.
    pub show: f64,
    pub kind: GuideKind,
}

/// Guides along one axis for a dragged extent of `size` against a
/// reference spanning `start..start + extent`.
fn axis_guides(size: f64, start: f64, extent: f64) -> [Guide; 5] {
    let end = start + extent;
    let center = start + extent / 2.0;
    [
        Guide { trigger: start, show: start, kind: GuideKind::StartToStart },
        Guide { trigger: start - size, show: start, kind: GuideKind::EndToStart },
        Guide { trigger: center - size / 2.0, show: center, kind: GuideKind::CenterToCenter },
        Guide { trigger: end, show: end, kind: GuideKind::StartToEnd },
        Guide { trigger: end - size, show: end, kind: GuideKind::EndToEnd },
    ]
}

/// Result of snapping a dragged block position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The (possibly) snapped top-left corner.
    pub point: Point,
    /// Guides to render.
    pub lines: SnapLines,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            lines: SnapLines::none(),
        }
    }
}

/// Snap candidates for one drag gesture, collected once at drag start.
#[derive(Debug, Clone, Default)]
pub struct SnapGuides {
    x: Vec<Guide>,
    y: Vec<Guide>,
}

impl SnapGuides {
    /// Build guides for a dragged block of `size` against reference rectangles.
    ///
    /// Candidates keep the order of `references`, and within a reference the
    /// order of [`GuideKind`]; snapping takes the first match on each axis.
    pub fn collect(size: Size, references: impl IntoIterator<Item = Rect>) -> Self {
        let mut guides = Self::default();
        for rect in references {
            guides.x.extend(axis_guides(size.width, rect.x0, rect.width()));
            guides.y.extend(axis_guides(size.height, rect.y0, rect.height()));
        }
        guides
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }

    /// Snap a top-left corner. Each axis snaps independently.
    pub fn snap(&self, point: Point, tolerance: f64) -> SnapResult {
        let mut result = SnapResult::none(point);
        if let Some(guide) = first_match(&self.x, point.x, tolerance) {
            result.point.x = guide.trigger;
            result.lines.x = Some(guide.show);
        }
        if let Some(guide) = first_match(&self.y, point.y, tolerance) {
            result.point.y = guide.trigger;
            result.lines.y = Some(guide.show);
        }
        result
    }
}

fn first_match(guides: &[Guide], value: f64, tolerance: f64) -> Option<&Guide> {
    guides.iter().find(|g| (value - g.trigger).abs() < tolerance)
}
