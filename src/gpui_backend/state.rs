use gpui::{Bounds, Pixels};

use crate::geom::DevicePoint;

/// Placement of the canvas element from the last prepaint.
#[derive(Debug, Clone, Default)]
pub(crate) struct ViewUiState {
    pub(crate) canvas_bounds: Option<Bounds<Pixels>>,
    pub(crate) drawn_size: Option<(u32, u32)>,
}

impl ViewUiState {
    /// Convert a window position into canvas-local device coordinates.
    pub(crate) fn to_canvas(&self, position: gpui::Point<Pixels>) -> Option<DevicePoint> {
        let bounds = self.canvas_bounds?;
        Some(DevicePoint::new(
            f64::from(f32::from(position.x - bounds.origin.x)),
            f64::from(f32::from(position.y - bounds.origin.y)),
        ))
    }

    /// Canvas size in whole device pixels, if laid out and non-empty.
    pub(crate) fn canvas_size(bounds: Bounds<Pixels>) -> Option<(u32, u32)> {
        let width = f32::from(bounds.size.width).round();
        let height = f32::from(bounds.size.height).round();
        (width >= 1.0 && height >= 1.0).then_some((width as u32, height as u32))
    }
}
