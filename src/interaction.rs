//! Hit testing and the math behind pan and zoom gestures.
//!
//! These helpers are pure; the toolbar state machine decides when to call
//! them.

use crate::geom::{DevicePoint, DeviceRect, Point};
use crate::surface::{PlotSurface, SurfaceId};
use crate::transform::Transform;
use crate::view::{Range, Viewport};

/// Find the surface whose device rectangle contains `point`.
///
/// Surfaces are scanned in declaration order and the first match wins.
/// Subplots are not expected to overlap; when they do, the earlier one is
/// picked.
pub fn find_surface_at(surfaces: &[PlotSurface], point: DevicePoint) -> Option<SurfaceId> {
    surfaces
        .iter()
        .find(|surface| surface.contains_device(point))
        .map(PlotSurface::id)
}

/// Data units per device pixel along each axis, frozen when a pan starts.
///
/// The Y factor is negative because device Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanScale {
    /// Data units per pixel along X.
    pub x: f64,
    /// Data units per pixel along Y.
    pub y: f64,
}

impl PanScale {
    /// Derive the scale from the device projection of the view window corners.
    pub fn at_gesture_start(transform: &Transform) -> Self {
        let view = transform.viewport();
        let low = transform.to_device(Point::new(view.x.min, view.y.min));
        let high = transform.to_device(Point::new(view.x.max, view.y.max));
        Self {
            x: view.x.span() / (high.x - low.x),
            y: view.y.span() / (high.y - low.y),
        }
    }
}

/// Shift the view window captured at gesture start so content follows the
/// pointer.
pub fn pan_view(
    start: Viewport,
    origin: DevicePoint,
    pointer: DevicePoint,
    scale: PanScale,
) -> Viewport {
    let dx = (pointer.x - origin.x) * scale.x;
    let dy = (pointer.y - origin.y) * scale.y;
    Viewport::new(start.x.shifted(dx), start.y.shifted(dy))
}

/// Selection rectangle between the drag origin and the pointer clamped to
/// the surface.
pub fn selection_rect(origin: DevicePoint, pointer: DevicePoint, bounds: DeviceRect) -> DeviceRect {
    DeviceRect::from_corners(origin, bounds.clamp(pointer))
}

/// Convert a selection rectangle into a view window.
///
/// Returns `None` when the selection is smaller than `min_px` on either side,
/// or when it collapses to an empty data window; such selections are treated
/// as clicks.
pub fn selection_to_view(rect: DeviceRect, transform: &Transform, min_px: f64) -> Option<Viewport> {
    if rect.width() < min_px || rect.height() < min_px {
        return None;
    }
    let a = transform.to_data(rect.min);
    let b = transform.to_data(rect.max);
    let view = Viewport::new(Range::new(a.x, b.x), Range::new(a.y, b.y));
    view.is_valid().then_some(view)
}
