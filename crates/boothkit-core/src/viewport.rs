//! Viewport module for pan/zoom of the paper on screen.
//!
//! The viewport never touches shape geometry: it only maps paper coordinates
//! to screen coordinates and back.

use crate::paper::Paper;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 3.0;
/// Factor applied per wheel notch or zoom button press.
pub const ZOOM_STEP: f64 = 1.1;

/// Zoom range and step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: MIN_ZOOM,
            max: MAX_ZOOM,
            step: ZOOM_STEP,
        }
    }
}

impl ZoomLimits {
    pub fn clamp(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return 1.0_f64.clamp(self.min, self.max);
        }
        zoom.clamp(self.min, self.max)
    }
}

/// Viewport manages the view transform for the paper.
///
/// Zoom scales around `origin` (the paper center), then `offset` pans the
/// result in screen space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Current pan offset in screen pixels.
    pub offset: Vec2,
    /// Current zoom factor (1.0 = 100%).
    zoom: f64,
    /// Fixed point of zooming, in paper coordinates.
    pub origin: Point,
    pub limits: ZoomLimits,
    #[serde(skip)]
    pan_anchor: Option<Point>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            origin: Point::ZERO,
            limits: ZoomLimits::default(),
            pan_anchor: None,
        }
    }
}

impl Viewport {
    /// Create a viewport that zooms around the center of `paper`.
    pub fn new(paper: Paper, limits: ZoomLimits) -> Self {
        let mut viewport = Self {
            origin: paper.bounds().center(),
            limits,
            ..Self::default()
        };
        viewport.zoom = limits.clamp(1.0);
        viewport
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Set the zoom factor, clamped to the limits. Returns the applied value.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = self.limits.clamp(zoom);
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom * self.limits.step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom / self.limits.step)
    }

    /// Apply a wheel event. Scrolling up (negative delta) zooms in.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) -> f64 {
        if delta_y < 0.0 {
            self.zoom_in()
        } else if delta_y > 0.0 {
            self.zoom_out()
        } else {
            self.zoom
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts paper coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset + self.origin.to_vec2())
            * Affine::scale(self.zoom)
            * Affine::translate(-self.origin.to_vec2())
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        self.transform().inverse()
    }

    /// Convert a screen point to paper coordinates.
    pub fn screen_to_paper(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a paper point to screen coordinates.
    pub fn paper_to_screen(&self, paper_point: Point) -> Point {
        self.transform() * paper_point
    }

    /// Convert a screen-space drag delta into a paper-space delta.
    pub fn screen_delta_to_paper(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Start a pan gesture at `screen_point`.
    pub fn begin_pan(&mut self, screen_point: Point) {
        self.pan_anchor = Some(screen_point);
    }

    /// Continue the pan gesture. Returns `false` when no gesture is active.
    pub fn drag_pan(&mut self, screen_point: Point) -> bool {
        let Some(anchor) = self.pan_anchor else {
            return false;
        };
        self.pan(screen_point - anchor);
        self.pan_anchor = Some(screen_point);
        true
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Reset to 100% with no pan.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = self.limits.clamp(1.0);
        self.pan_anchor = None;
    }

    /// Zoom and pan so the whole paper fits in a `screen` sized area.
    ///
    /// Assumes the paper is laid out at the origin of the screen area.
    pub fn fit_to_paper(&mut self, paper: Paper, screen: kurbo::Size, padding: f64) {
        let available = kurbo::Size::new(
            (screen.width - padding * 2.0).max(1.0),
            (screen.height - padding * 2.0).max(1.0),
        );
        let scale = (available.width / paper.width).min(available.height / paper.height);
        self.origin = paper.bounds().center();
        self.set_zoom(scale);

        let screen_center = Point::new(screen.width / 2.0, screen.height / 2.0);
        self.offset = screen_center - self.origin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Paper::new(900.0, 600.0), ZoomLimits::default())
    }

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_identity() {
        let viewport = viewport();
        assert_eq!(viewport.zoom(), 1.0);
        assert_eq!(viewport.zoom_percent(), 100);
        assert_point_eq(viewport.screen_to_paper(Point::new(12.0, 34.0)), Point::new(12.0, 34.0));
    }

    #[test]
    fn test_zoom_around_paper_center() {
        let mut viewport = viewport();
        viewport.set_zoom(2.0);
        assert_point_eq(viewport.paper_to_screen(Point::new(450.0, 300.0)), Point::new(450.0, 300.0));
        assert_point_eq(viewport.paper_to_screen(Point::new(0.0, 0.0)), Point::new(-450.0, -300.0));
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = viewport();
        viewport.offset = Vec2::new(30.0, -20.0);
        viewport.set_zoom(1.5);
        let original = Point::new(123.0, 456.0);
        let back = viewport.paper_to_screen(viewport.screen_to_paper(original));
        assert_point_eq(back, original);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = viewport();
        assert_eq!(viewport.set_zoom(0.01), MIN_ZOOM);
        assert_eq!(viewport.set_zoom(100.0), MAX_ZOOM);
        assert_eq!(viewport.set_zoom(f64::NAN), 1.0);
        for _ in 0..50 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.zoom(), MAX_ZOOM);
        for _ in 0..50 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_wheel_direction() {
        let mut viewport = viewport();
        viewport.zoom_by_wheel(-120.0);
        assert!((viewport.zoom() - 1.1).abs() < 1e-12);
        assert_eq!(viewport.zoom_percent(), 110);
        viewport.zoom_by_wheel(120.0);
        viewport.zoom_by_wheel(120.0);
        assert!(viewport.zoom() < 1.0);
        let before = viewport.zoom();
        viewport.zoom_by_wheel(0.0);
        assert_eq!(viewport.zoom(), before);
    }

    #[test]
    fn test_pan_gesture() {
        let mut viewport = viewport();
        assert!(!viewport.drag_pan(Point::new(5.0, 5.0)));
        viewport.begin_pan(Point::new(10.0, 10.0));
        assert!(viewport.is_panning());
        assert!(viewport.drag_pan(Point::new(25.0, 5.0)));
        assert!(viewport.drag_pan(Point::new(30.0, 0.0)));
        viewport.end_pan();
        assert_eq!(viewport.offset, Vec2::new(20.0, -10.0));
        assert!(!viewport.is_panning());
    }

    #[test]
    fn test_screen_delta_scales_with_zoom() {
        let mut viewport = viewport();
        viewport.set_zoom(2.0);
        viewport.pan(Vec2::new(100.0, 0.0));
        assert_eq!(viewport.screen_delta_to_paper(Vec2::new(10.0, 4.0)), Vec2::new(5.0, 2.0));
    }

    #[test]
    fn test_fit_to_paper() {
        let mut viewport = viewport();
        viewport.fit_to_paper(Paper::new(900.0, 600.0), kurbo::Size::new(1000.0, 1000.0), 50.0);
        assert_eq!(viewport.zoom(), 1.0);
        assert_point_eq(viewport.paper_to_screen(Point::new(450.0, 300.0)), Point::new(500.0, 500.0));
    }

    #[test]
    fn test_reset() {
        let mut viewport = viewport();
        viewport.set_zoom(2.5);
        viewport.pan(Vec2::new(5.0, 5.0));
        viewport.begin_pan(Point::ZERO);
        viewport.reset();
        assert_eq!(viewport.zoom(), 1.0);
        assert_eq!(viewport.offset, Vec2::ZERO);
        assert!(!viewport.is_panning());
    }
}
