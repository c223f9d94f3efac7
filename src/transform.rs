//! Coordinate transforms between data, normalized-axes and device space.
//!
//! A [`Transform`] is a plain value derived from a surface's current view
//! window and placement. Nothing here is cached: callers build a fresh
//! transform (or use the free functions) every time they need one, so the
//! mapping always reflects the latest view window.
//!
//! Three frames are involved:
//! - data: the surface's own units, Y growing upward;
//! - normalized: `0..=1` across the surface on both axes, Y growing upward;
//! - device: canvas pixels, origin top-left, Y growing downward.
//!
//! Between normalized and device sits the display frame (pixels, origin
//! bottom-left). Crossing from display to device applies
//! `device_y = canvas_height - display_y`.

use crate::error::{PlotError, PlotResult};
use crate::geom::{DevicePoint, DeviceRect, Point};
use crate::surface::PlotSurface;
use crate::view::Viewport;

/// A surface's pixel box in display coordinates (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBox {
    /// Left edge in pixels.
    pub x0: f64,
    /// Bottom edge in pixels, measured from the bottom of the canvas.
    pub y0: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl DisplayBox {
    /// Convert to a device rectangle on a canvas of the given height.
    pub fn to_device(&self, canvas_height: f64) -> DeviceRect {
        let top = canvas_height - (self.y0 + self.height);
        DeviceRect::new(self.x0, top, self.width, self.height)
    }
}

/// Affine mapping between data and device space for one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    viewport: Viewport,
    frame: DisplayBox,
    canvas_height: f64,
}

impl Transform {
    /// Create a transform.
    ///
    /// The viewport must be valid; surfaces reject degenerate windows before
    /// they can reach this point.
    pub fn new(viewport: Viewport, frame: DisplayBox, canvas_height: f64) -> Self {
        debug_assert!(viewport.is_valid(), "degenerate view window");
        Self {
            viewport,
            frame,
            canvas_height,
        }
    }

    /// Access the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Device rectangle covered by the surface.
    pub fn device_rect(&self) -> DeviceRect {
        self.frame.to_device(self.canvas_height)
    }

    /// Map a data point into normalized-axes coordinates.
    pub fn to_normalized(&self, point: Point) -> Point {
        let x = &self.viewport.x;
        let y = &self.viewport.y;
        Point::new((point.x - x.min) / x.span(), (point.y - y.min) / y.span())
    }

    /// Map normalized-axes coordinates back into data space.
    pub fn from_normalized(&self, point: Point) -> Point {
        let x = &self.viewport.x;
        let y = &self.viewport.y;
        Point::new(x.min + point.x * x.span(), y.min + point.y * y.span())
    }

    /// Map normalized-axes coordinates into device pixels.
    pub fn normalized_to_device(&self, point: Point) -> DevicePoint {
        let display_x = self.frame.x0 + point.x * self.frame.width;
        let display_y = self.frame.y0 + point.y * self.frame.height;
        DevicePoint::new(display_x, self.canvas_height - display_y)
    }

    /// Map device pixels into normalized-axes coordinates.
    pub fn device_to_normalized(&self, point: DevicePoint) -> Point {
        let display_y = self.canvas_height - point.y;
        Point::new(
            (point.x - self.frame.x0) / self.frame.width,
            (display_y - self.frame.y0) / self.frame.height,
        )
    }

    /// Map a data point into device pixels.
    pub fn to_device(&self, point: Point) -> DevicePoint {
        self.normalized_to_device(self.to_normalized(point))
    }

    /// Map device pixels into a data point.
    pub fn to_data(&self, point: DevicePoint) -> Point {
        self.from_normalized(self.device_to_normalized(point))
    }

    /// Map many data points in one call.
    pub fn to_device_batch(&self, points: &[Point]) -> Vec<DevicePoint> {
        points.iter().map(|point| self.to_device(*point)).collect()
    }

    /// Map paired coordinate arrays in one call.
    pub fn to_device_xy(&self, x: &[f64], y: &[f64]) -> PlotResult<Vec<DevicePoint>> {
        if x.len() != y.len() {
            return Err(PlotError::LengthMismatch {
                what: "x and y coordinates",
                left: x.len(),
                right: y.len(),
            });
        }
        Ok(x
            .iter()
            .zip(y)
            .map(|(x, y)| self.to_device(Point::new(*x, *y)))
            .collect())
    }
}

/// Map a data point on `surface` into device pixels.
pub fn to_device(surface: &PlotSurface, point: Point) -> DevicePoint {
    surface.transform().to_device(point)
}

/// Map a device point into the data space of `surface`.
pub fn to_data(surface: &PlotSurface, point: DevicePoint) -> Point {
    surface.transform().to_data(point)
}

/// Map many data points on `surface` into device pixels.
pub fn to_device_batch(surface: &PlotSurface, points: &[Point]) -> Vec<DevicePoint> {
    surface.transform().to_device_batch(points)
}

/// Map many device points into the data space of `surface`.
pub fn to_data_batch(surface: &PlotSurface, points: &[DevicePoint]) -> Vec<Point> {
    let transform = surface.transform();
    points.iter().map(|point| transform.to_data(*point)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubplotParams;
    use crate::layout::GridSlot;
    use crate::surface::SurfaceId;
    use crate::view::Range;

    fn transform() -> Transform {
        let viewport = Viewport::new(Range::new(-2.0, 8.0), Range::new(100.0, 300.0));
        let frame = DisplayBox {
            x0: 80.0,
            y0: 52.8,
            width: 496.0,
            height: 369.6,
        };
        Transform::new(viewport, frame, 480.0)
    }

    #[test]
    fn roundtrip_inside_view() {
        let transform = transform();
        for point in [
            Point::new(-2.0, 100.0),
            Point::new(3.25, 177.7),
            Point::new(8.0, 300.0),
            Point::new(0.001, 299.999),
        ] {
            let back = transform.to_data(transform.to_device(point));
            assert!((back.x - point.x).abs() < 1e-9);
            assert!((back.y - point.y).abs() < 1e-9);
        }
    }

    #[test]
    fn device_y_grows_downward() {
        let transform = transform();
        let bottom_left = transform.to_device(Point::new(-2.0, 100.0));
        let top_left = transform.to_device(Point::new(-2.0, 300.0));
        assert!(bottom_left.y > top_left.y);
        assert!((bottom_left.x - top_left.x).abs() < 1e-12);
    }

    #[test]
    fn view_corners_land_on_device_rect() {
        let transform = transform();
        let rect = transform.device_rect();
        let top_left = transform.to_device(Point::new(-2.0, 300.0));
        let bottom_right = transform.to_device(Point::new(8.0, 100.0));
        assert!((top_left.x - rect.min.x).abs() < 1e-9);
        assert!((top_left.y - rect.min.y).abs() < 1e-9);
        assert!((bottom_right.x - rect.max.x).abs() < 1e-9);
        assert!((bottom_right.y - rect.max.y).abs() < 1e-9);
        assert!((rect.min.y - (480.0 - 52.8 - 369.6)).abs() < 1e-9);
    }

    #[test]
    fn batched_matches_single() {
        let transform = transform();
        let points = [Point::new(0.0, 150.0), Point::new(4.0, 250.0)];
        let batch = transform.to_device_batch(&points);
        assert_eq!(batch[0], transform.to_device(points[0]));
        assert_eq!(batch[1], transform.to_device(points[1]));
    }

    #[test]
    fn surface_batches_invert_each_other() {
        let slot = GridSlot::new(1, 1, 1).unwrap();
        let params = SubplotParams::default();
        let mut surface = PlotSurface::new(
            SurfaceId(0),
            slot,
            slot.display_box(&params, 640.0, 480.0),
            480.0,
            0.05,
        );
        surface.set_view(Range::new(-2.0, 8.0), Range::new(100.0, 300.0)).unwrap();

        let points = [Point::new(-2.0, 100.0), Point::new(3.5, 210.0), Point::new(8.0, 300.0)];
        let device = to_device_batch(&surface, &points);
        assert_eq!(device[1], to_device(&surface, points[1]));
        let back = to_data_batch(&surface, &device);
        assert_eq!(back.len(), points.len());
        for (back, point) in back.iter().zip(&points) {
            assert!((back.x - point.x).abs() < 1e-9);
            assert!((back.y - point.y).abs() < 1e-9);
        }
        let single = to_data(&surface, device[2]);
        assert!((single.x - 8.0).abs() < 1e-9);
        assert!(to_data_batch(&surface, &[]).is_empty());
    }

    #[test]
    fn paired_arrays_must_match() {
        let transform = transform();
        assert!(transform.to_device_xy(&[1.0, 2.0], &[1.0]).is_err());
        assert_eq!(transform.to_device_xy(&[1.0], &[150.0]).unwrap().len(), 1);
    }
}
