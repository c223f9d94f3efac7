//! Plot surfaces: one rectangular subplot with its own view window and marks.

use crate::axis::{AxisConfig, TickSet};
use crate::error::{AxisName, PlotError, PlotResult};
use crate::geom::{DevicePoint, DeviceRect};
use crate::layout::GridSlot;
use crate::mark::{LineMark, Mark, PointCollection};
use crate::style::{LineStyle, MarkerStyle, cycle_color};
use crate::transform::{DisplayBox, Transform};
use crate::view::{Range, ViewMode, Viewport};

/// Index of a surface inside its figure; also the index of its canvas layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) usize);

impl SurfaceId {
    /// Position of the surface in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A subplot with its own data-space view window.
#[derive(Debug, Clone)]
pub struct PlotSurface {
    id: SurfaceId,
    slot: GridSlot,
    frame: DisplayBox,
    canvas_height: f64,
    viewport: Viewport,
    mode: ViewMode,
    margin: f64,
    x_axis: AxisConfig,
    y_axis: AxisConfig,
    marks: Vec<Mark>,
}

impl PlotSurface {
    pub(crate) fn new(
        id: SurfaceId,
        slot: GridSlot,
        frame: DisplayBox,
        canvas_height: f64,
        margin: f64,
    ) -> Self {
        Self {
            id,
            slot,
            frame,
            canvas_height,
            viewport: Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)),
            mode: ViewMode::Auto,
            margin,
            x_axis: AxisConfig::default(),
            y_axis: AxisConfig::default(),
            marks: Vec::new(),
        }
    }

    /// Surface identifier.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Grid slot the surface occupies.
    pub fn slot(&self) -> GridSlot {
        self.slot
    }

    pub(crate) fn set_frame(&mut self, frame: DisplayBox, canvas_height: f64) {
        self.frame = frame;
        self.canvas_height = canvas_height;
    }

    /// Pixel box in display coordinates (origin bottom-left).
    pub fn display_box(&self) -> DisplayBox {
        self.frame
    }

    /// Device rectangle covered by the surface.
    pub fn device_rect(&self) -> DeviceRect {
        self.frame.to_device(self.canvas_height)
    }

    /// Check whether a device point lies on this surface.
    pub fn contains_device(&self, point: DevicePoint) -> bool {
        self.device_rect().contains(point)
    }

    /// A transform for the current view window and placement.
    ///
    /// Built on every call; never store it across view changes.
    pub fn transform(&self) -> Transform {
        Transform::new(self.viewport, self.frame, self.canvas_height)
    }

    /// Current view window.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current X view window.
    pub fn xlim(&self) -> Range {
        self.viewport.x
    }

    /// Current Y view window.
    pub fn ylim(&self) -> Range {
        self.viewport.y
    }

    /// Whether the view follows the data.
    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    /// Set the X view window and switch to manual view.
    pub fn set_xlim(&mut self, min: f64, max: f64) -> PlotResult<()> {
        let x = checked_range(AxisName::X, min, max)?;
        self.viewport.x = x;
        self.mode = ViewMode::Manual;
        Ok(())
    }

    /// Set the Y view window and switch to manual view.
    pub fn set_ylim(&mut self, min: f64, max: f64) -> PlotResult<()> {
        let y = checked_range(AxisName::Y, min, max)?;
        self.viewport.y = y;
        self.mode = ViewMode::Manual;
        Ok(())
    }

    /// Set both view windows at once; neither changes if either is invalid.
    pub fn set_view(&mut self, x: Range, y: Range) -> PlotResult<()> {
        let x = checked_range(AxisName::X, x.min, x.max)?;
        let y = checked_range(AxisName::Y, y.min, y.max)?;
        self.viewport = Viewport::new(x, y);
        self.mode = ViewMode::Manual;
        Ok(())
    }

    /// Union of the bounds of every mark.
    pub fn data_bounds(&self) -> Option<Viewport> {
        let mut bounds: Option<Viewport> = None;
        for mark_bounds in self.marks.iter().filter_map(Mark::bounds) {
            bounds = Some(match bounds {
                None => mark_bounds,
                Some(existing) => Viewport::new(
                    Range::union(existing.x, mark_bounds.x)?,
                    Range::union(existing.y, mark_bounds.y)?,
                ),
            });
        }
        bounds
    }

    /// The view window that fits all data, with margins.
    pub fn natural_view(&self) -> Viewport {
        match self.data_bounds() {
            Some(bounds) => Viewport::new(
                bounds.x.nonsingular().padded(self.margin),
                bounds.y.nonsingular().padded(self.margin),
            ),
            None => Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)),
        }
    }

    /// Fit the view window to the data and follow it from now on.
    pub fn autoscale(&mut self) {
        self.viewport = self.natural_view();
        self.mode = ViewMode::Auto;
    }

    /// All marks in drawing order.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Line marks in drawing order.
    pub fn lines(&self) -> impl Iterator<Item = &LineMark> {
        self.marks.iter().filter_map(|mark| match mark {
            Mark::Line(line) => Some(line),
            Mark::Points(_) => None,
        })
    }

    /// Point collections in drawing order.
    pub fn collections(&self) -> impl Iterator<Item = &PointCollection> {
        self.marks.iter().filter_map(|mark| match mark {
            Mark::Points(points) => Some(points),
            Mark::Line(_) => None,
        })
    }

    /// Add a mark; refits the view when following the data.
    pub fn add_mark(&mut self, mark: Mark) {
        self.marks.push(mark);
        if self.mode == ViewMode::Auto {
            self.viewport = self.natural_view();
        }
    }

    /// Add a line with the next color of the default cycle.
    pub fn plot(&mut self, x: impl Into<Vec<f64>>, y: impl Into<Vec<f64>>) -> PlotResult<()> {
        let style = LineStyle {
            color: cycle_color(self.marks.len()),
            ..LineStyle::default()
        };
        self.plot_styled(x, y, style)
    }

    /// Add a line with explicit styling.
    pub fn plot_styled(
        &mut self,
        x: impl Into<Vec<f64>>,
        y: impl Into<Vec<f64>>,
        style: LineStyle,
    ) -> PlotResult<()> {
        let line = LineMark::new(x.into(), y.into(), style)?;
        self.add_mark(Mark::Line(line));
        Ok(())
    }

    /// Add markers with the next color of the default cycle.
    pub fn scatter(&mut self, x: &[f64], y: &[f64]) -> PlotResult<()> {
        let style = MarkerStyle {
            fill: cycle_color(self.marks.len()),
            ..MarkerStyle::default()
        };
        self.scatter_styled(x, y, style)
    }

    /// Add markers with explicit styling.
    pub fn scatter_styled(&mut self, x: &[f64], y: &[f64], style: MarkerStyle) -> PlotResult<()> {
        let points = PointCollection::from_xy(x, y, style)?;
        self.add_mark(Mark::Points(points));
        Ok(())
    }

    /// X axis configuration.
    pub fn x_axis(&self) -> &AxisConfig {
        &self.x_axis
    }

    /// Y axis configuration.
    pub fn y_axis(&self) -> &AxisConfig {
        &self.y_axis
    }

    /// Mutable X axis configuration.
    pub fn x_axis_mut(&mut self) -> &mut AxisConfig {
        &mut self.x_axis
    }

    /// Mutable Y axis configuration.
    pub fn y_axis_mut(&mut self) -> &mut AxisConfig {
        &mut self.y_axis
    }

    /// Set the X axis title.
    pub fn set_xlabel(&mut self, title: impl Into<String>) {
        self.x_axis.set_title(Some(title.into()));
    }

    /// Set the Y axis title.
    pub fn set_ylabel(&mut self, title: impl Into<String>) {
        self.y_axis.set_title(Some(title.into()));
    }

    /// X ticks for the current view window.
    pub fn x_ticks(&self) -> TickSet {
        self.x_axis.tick_set(self.viewport.x)
    }

    /// Y ticks for the current view window.
    pub fn y_ticks(&self) -> TickSet {
        self.y_axis.tick_set(self.viewport.y)
    }
}

fn checked_range(axis: AxisName, min: f64, max: f64) -> PlotResult<Range> {
    let range = Range::new(min, max);
    if !range.is_valid() {
        return Err(PlotError::InvalidViewWindow { axis, min, max });
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubplotParams;

    fn surface() -> PlotSurface {
        let slot = GridSlot::new(1, 1, 1).unwrap();
        let frame = slot.display_box(&SubplotParams::default(), 640.0, 480.0);
        PlotSurface::new(SurfaceId(0), slot, frame, 480.0, 0.05)
    }

    #[test]
    fn setters_reject_degenerate_windows() {
        let mut surface = surface();
        let before = surface.viewport();
        assert!(surface.set_xlim(1.0, 1.0).is_err());
        assert!(surface.set_ylim(0.0, f64::NAN).is_err());
        assert!(
            surface
                .set_view(Range::new(0.0, 2.0), Range::new(f64::NEG_INFINITY, 0.0))
                .is_err()
        );
        assert_eq!(surface.viewport(), before);
    }

    #[test]
    fn adding_marks_refits_until_manual() {
        let mut surface = surface();
        surface.plot(vec![0.0, 10.0], vec![-1.0, 1.0]).unwrap();
        assert_eq!(surface.xlim(), Range::new(-0.5, 10.5));
        assert!((surface.ylim().min + 1.1).abs() < 1e-12);

        surface.set_xlim(2.0, 3.0).unwrap();
        assert_eq!(surface.view_mode(), ViewMode::Manual);
        surface.plot(vec![0.0, 100.0], vec![0.0, 0.0]).unwrap();
        assert_eq!(surface.xlim(), Range::new(2.0, 3.0));

        surface.autoscale();
        assert_eq!(surface.xlim(), Range::new(-5.0, 105.0));
        assert_eq!(surface.view_mode(), ViewMode::Auto);
    }

    #[test]
    fn empty_surface_shows_unit_square() {
        let mut surface = surface();
        surface.autoscale();
        assert_eq!(
            surface.viewport(),
            Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0))
        );
    }

    #[test]
    fn marks_keep_kind_and_order() {
        let mut surface = surface();
        surface.plot(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        surface.scatter(&[0.5], &[0.5]).unwrap();
        surface.plot(vec![0.0, 1.0], vec![1.0, 0.0]).unwrap();
        assert_eq!(surface.marks().len(), 3);
        assert_eq!(surface.lines().count(), 2);
        assert_eq!(surface.collections().count(), 1);
        let colors: Vec<_> = surface.lines().map(|line| line.style().color).collect();
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn device_rect_flips_display_box() {
        let surface = surface();
        let rect = surface.device_rect();
        assert!((rect.min.y - (480.0 - 52.8 - 369.6)).abs() < 1e-9);
        assert!(surface.contains_device(DevicePoint::new(300.0, 240.0)));
        assert!(!surface.contains_device(DevicePoint::new(10.0, 10.0)));
    }
}
