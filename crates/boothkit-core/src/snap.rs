//! Snap functionality for aligning a dragged box to margins, grid and shapes.
//!
//! The engine works on each axis independently and in a fixed priority
//! order: paper margins, grid lines, then sibling shapes. A margin match locks
//! its axis so the later stages leave it alone. The final box is always
//! clamped to the paper.
//!
//! Sibling shapes are visited in the order they are given (store order). For
//! every rule the first sibling within the threshold wins; there is no
//! nearest-match tie-break, so when several siblings are in range the result
//! depends on their order.

use crate::geometry::BoundingBox;
use crate::paper::Paper;
use serde::{Deserialize, Serialize};

/// Distance from each paper edge to the printable safe area.
pub const MARGIN_SIZE: f64 = 40.0;
/// Grid spacing (matches the visual grid overlay).
pub const GRID_SIZE: f64 = 20.0;
/// Smallest usable grid spacing; finer grids are rejected by config validation
/// and not drawn.
pub const MIN_GRID_SIZE: f64 = 1.0;
/// Maximum distance (exclusive) at which a snap is taken.
pub const SNAP_THRESHOLD: f64 = 10.0;

/// Tunables for the snap engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub margin_size: f64,
    pub snap_threshold: f64,
    pub grid_size: f64,
    pub enable_grid: bool,
    pub enable_margins: bool,
    pub enable_shape_snap: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            margin_size: MARGIN_SIZE,
            snap_threshold: SNAP_THRESHOLD,
            grid_size: GRID_SIZE,
            enable_grid: true,
            enable_margins: true,
            enable_shape_snap: true,
        }
    }
}

impl SnapConfig {
    /// Check if any snapping stage can ever match.
    pub fn is_enabled(&self) -> bool {
        self.snap_threshold > 0.0 && (self.enable_grid || self.enable_margins || self.enable_shape_snap)
    }
}

/// Which rule produced a snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapKind {
    LeftMargin,
    RightMargin,
    TopMargin,
    BottomMargin,
    GridX,
    GridY,
    ShapeLeft,
    ShapeRight,
    ShapeTop,
    ShapeBottom,
    ShapeCenterX,
    ShapeCenterY,
    SameXAxis,
    SameYAxis,
}

impl SnapKind {
    pub fn name(self) -> &'static str {
        match self {
            SnapKind::LeftMargin => "left-margin",
            SnapKind::RightMargin => "right-margin",
            SnapKind::TopMargin => "top-margin",
            SnapKind::BottomMargin => "bottom-margin",
            SnapKind::GridX => "grid-x",
            SnapKind::GridY => "grid-y",
            SnapKind::ShapeLeft => "shape-left",
            SnapKind::ShapeRight => "shape-right",
            SnapKind::ShapeTop => "shape-top",
            SnapKind::ShapeBottom => "shape-bottom",
            SnapKind::ShapeCenterX => "shape-center-x",
            SnapKind::ShapeCenterY => "shape-center-y",
            SnapKind::SameXAxis => "same-x-axis",
            SnapKind::SameYAxis => "same-y-axis",
        }
    }
}

/// Orientation of an alignment guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    /// A vertical line at a fixed x.
    Vertical,
    /// A horizontal line at a fixed y.
    Horizontal,
}

/// A transient line shown while dragging to indicate an active alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGuide {
    pub orientation: GuideOrientation,
    pub coordinate: f64,
}

/// At most one vertical and one horizontal guide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGuides {
    pub vertical: Option<f64>,
    pub horizontal: Option<f64>,
}

impl AlignmentGuides {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The guides as a list (vertical first).
    pub fn to_vec(&self) -> Vec<AlignmentGuide> {
        let vertical = self.vertical.map(|coordinate| AlignmentGuide {
            orientation: GuideOrientation::Vertical,
            coordinate,
        });
        let horizontal = self.horizontal.map(|coordinate| AlignmentGuide {
            orientation: GuideOrientation::Horizontal,
            coordinate,
        });
        vertical.into_iter().chain(horizontal).collect()
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// The corrected box (always inside the paper).
    pub bounds: BoundingBox,
    /// Rules that matched, in evaluation order.
    pub snapped_to: Vec<SnapKind>,
    /// Guides to draw for this frame.
    pub guides: AlignmentGuides,
}

impl SnapResult {
    /// A result that only clamps the box to the paper.
    pub fn none(bounds: BoundingBox, paper: Paper) -> Self {
        Self {
            bounds: bounds.clamp_to(&paper.bounds()),
            snapped_to: Vec::new(),
            guides: AlignmentGuides::default(),
        }
    }

    /// Check if any rule matched.
    pub fn is_snapped(&self) -> bool {
        !self.snapped_to.is_empty()
    }

    /// Check if a specific rule matched.
    pub fn snapped(&self, kind: SnapKind) -> bool {
        self.snapped_to.contains(&kind)
    }
}

/// Round `value` to the nearest multiple of `grid_size`.
///
/// Returns `None` when the rounding delta is not strictly below `threshold`
/// or the grid is degenerate.
pub fn snap_to_grid(value: f64, grid_size: f64, threshold: f64) -> Option<f64> {
    if !(grid_size > 0.0) || !grid_size.is_finite() {
        return None;
    }
    let gridded = (value / grid_size).round() * grid_size;
    ((value - gridded).abs() < threshold).then_some(gridded)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    /// Start coordinate and length of a box along this axis.
    fn span(self, bounds: &BoundingBox) -> (f64, f64) {
        match self {
            Axis::X => (bounds.x, bounds.width),
            Axis::Y => (bounds.y, bounds.height),
        }
    }

    fn paper_extent(self, paper: &Paper) -> f64 {
        match self {
            Axis::X => paper.width,
            Axis::Y => paper.height,
        }
    }

    fn kinds(self) -> AxisKinds {
        match self {
            Axis::X => AxisKinds {
                start_margin: SnapKind::LeftMargin,
                end_margin: SnapKind::RightMargin,
                grid: SnapKind::GridX,
                shape_start: SnapKind::ShapeLeft,
                shape_end: SnapKind::ShapeRight,
                center: SnapKind::ShapeCenterX,
                same_axis: SnapKind::SameXAxis,
            },
            Axis::Y => AxisKinds {
                start_margin: SnapKind::TopMargin,
                end_margin: SnapKind::BottomMargin,
                grid: SnapKind::GridY,
                shape_start: SnapKind::ShapeTop,
                shape_end: SnapKind::ShapeBottom,
                center: SnapKind::ShapeCenterY,
                same_axis: SnapKind::SameYAxis,
            },
        }
    }
}

struct AxisKinds {
    start_margin: SnapKind,
    end_margin: SnapKind,
    grid: SnapKind,
    shape_start: SnapKind,
    shape_end: SnapKind,
    center: SnapKind,
    same_axis: SnapKind,
}

/// Running snap state along one axis.
struct AxisSnap {
    axis: Axis,
    kinds: AxisKinds,
    pos: f64,
    len: f64,
    threshold: f64,
    margin_locked: bool,
    edge_taken: bool,
    center_taken: bool,
    same_axis_taken: bool,
    guide: Option<f64>,
}

impl AxisSnap {
    fn new(axis: Axis, target: &BoundingBox, threshold: f64) -> Self {
        let (pos, len) = axis.span(target);
        Self {
            axis,
            kinds: axis.kinds(),
            pos,
            len,
            threshold,
            margin_locked: false,
            edge_taken: false,
            center_taken: false,
            same_axis_taken: false,
            guide: None,
        }
    }

    fn near(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.threshold
    }

    fn snap_to_margins(&mut self, extent: f64, margin: f64, snapped_to: &mut Vec<SnapKind>) {
        if self.near(self.pos, margin) {
            self.pos = margin;
            self.margin_locked = true;
            snapped_to.push(self.kinds.start_margin);
        } else if self.near(self.pos + self.len, extent - margin) {
            self.pos = extent - margin - self.len;
            self.margin_locked = true;
            snapped_to.push(self.kinds.end_margin);
        }
    }

    fn snap_to_grid(&mut self, grid_size: f64, snapped_to: &mut Vec<SnapKind>) {
        if self.margin_locked {
            return;
        }
        if let Some(gridded) = snap_to_grid(self.pos, grid_size, self.threshold) {
            self.pos = gridded;
            snapped_to.push(self.kinds.grid);
        }
    }

    /// Start-to-start, else end-to-end edge alignment.
    fn snap_to_edges(&mut self, other: &BoundingBox, snapped_to: &mut Vec<SnapKind>) {
        if self.margin_locked || self.edge_taken {
            return;
        }
        let (start, len) = self.axis.span(other);
        if self.near(self.pos, start) {
            self.pos = start;
            self.edge_taken = true;
            snapped_to.push(self.kinds.shape_start);
        } else if self.near(self.pos + self.len, start + len) {
            self.pos = start + len - self.len;
            self.edge_taken = true;
            snapped_to.push(self.kinds.shape_end);
        }
    }

    /// Center-to-center alignment.
    fn snap_to_center(&mut self, other: &BoundingBox, snapped_to: &mut Vec<SnapKind>) {
        if self.margin_locked || self.center_taken {
            return;
        }
        let (start, len) = self.axis.span(other);
        let other_center = start + len / 2.0;
        if self.near(self.pos + self.len / 2.0, other_center) {
            self.pos = other_center - self.len / 2.0;
            self.center_taken = true;
            self.guide = Some(other_center);
            snapped_to.push(self.kinds.center);
        }
    }

    /// Start-axis alignment with a guide at the sibling's start edge.
    ///
    /// A center guide from any earlier sibling stays while the box is still
    /// centered on it.
    fn snap_to_same_axis(&mut self, other: &BoundingBox, snapped_to: &mut Vec<SnapKind>) {
        if self.margin_locked || self.same_axis_taken {
            return;
        }
        let (start, _) = self.axis.span(other);
        if self.near(self.pos, start) {
            self.pos = start;
            self.same_axis_taken = true;
            let center = self.pos + self.len / 2.0;
            let on_center_guide = self.center_taken && self.guide.is_some_and(|g| (g - center).abs() < f64::EPSILON);
            if !on_center_guide {
                self.guide = Some(start);
            }
            snapped_to.push(self.kinds.same_axis);
        }
    }
}

/// Snap `target` against the paper margins, the grid and `others`.
///
/// `others` must not contain the target itself. The engine never fails:
/// a non-positive threshold simply matches nothing, and the result is always
/// clamped to the paper.
pub fn snap(target: BoundingBox, others: &[BoundingBox], paper: Paper, config: &SnapConfig) -> SnapResult {
    let threshold = config.snap_threshold;
    let mut snapped_to = Vec::new();
    let mut x = AxisSnap::new(Axis::X, &target, threshold);
    let mut y = AxisSnap::new(Axis::Y, &target, threshold);

    if config.enable_margins {
        x.snap_to_margins(Axis::X.paper_extent(&paper), config.margin_size, &mut snapped_to);
        y.snap_to_margins(Axis::Y.paper_extent(&paper), config.margin_size, &mut snapped_to);
    }

    if config.enable_grid {
        x.snap_to_grid(config.grid_size, &mut snapped_to);
        y.snap_to_grid(config.grid_size, &mut snapped_to);
    }

    if config.enable_shape_snap {
        for other in others {
            x.snap_to_edges(other, &mut snapped_to);
            y.snap_to_edges(other, &mut snapped_to);

            x.snap_to_center(other, &mut snapped_to);
            y.snap_to_center(other, &mut snapped_to);

            x.snap_to_same_axis(other, &mut snapped_to);
            y.snap_to_same_axis(other, &mut snapped_to);
        }
    }

    let bounds = BoundingBox::new(x.pos, y.pos, target.width, target.height).clamp_to(&paper.bounds());
    let guides = AlignmentGuides {
        vertical: x.guide,
        horizontal: y.guide,
    };

    if !snapped_to.is_empty() {
        log::trace!(
            "snap ({:.1}, {:.1}) -> ({:.1}, {:.1}) via {:?}",
            target.x,
            target.y,
            bounds.x,
            bounds.y,
            snapped_to
        );
    }

    SnapResult {
        bounds,
        snapped_to,
        guides,
    }
}
