//! Geometric primitives used by the plotting pipeline.
//!
//! [`Point`] lives in data space. [`DevicePoint`] and [`DeviceRect`] are canvas
//! pixels with the origin at the top-left corner and Y growing downward.

use serde::Serialize;

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point on the canvas in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DevicePoint {
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
}

impl DevicePoint {
    /// Create a new device point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle on the canvas in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceRect {
    /// Top-left corner.
    pub min: DevicePoint,
    /// Bottom-right corner.
    pub max: DevicePoint,
}

impl DeviceRect {
    /// Create a rectangle from its top-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min: DevicePoint::new(x, y),
            max: DevicePoint::new(x + width, y + height),
        }
    }

    /// Create a rectangle spanning two arbitrary corners.
    pub fn from_corners(a: DevicePoint, b: DevicePoint) -> Self {
        Self {
            min: DevicePoint::new(a.x.min(b.x), a.y.min(b.y)),
            max: DevicePoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Check whether the point lies inside the rectangle, edges included.
    pub fn contains(&self, point: DevicePoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Clamp a point into the rectangle.
    pub fn clamp(&self, point: DevicePoint) -> DevicePoint {
        DevicePoint::new(
            point.x.max(self.min.x).min(self.max.x),
            point.y.max(self.min.y).min(self.max.y),
        )
    }
}
