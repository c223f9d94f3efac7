//! Canvas layers and the hold-scope commit protocol.
//!
//! A [`CanvasLayer`] records draw calls as [`DrawCommand`]s. Outside a hold
//! scope every call becomes visible immediately; inside one, calls are staged
//! and become visible together when the outermost scope exits. The visible
//! content of a layer is everything committed since the last committed
//! `clear`.

use serde::Serialize;

use crate::error::{PlotError, PlotResult};
use crate::geom::{DevicePoint, DeviceRect};
use crate::surface::SurfaceId;

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Anchor at the start of the text.
    #[default]
    Left,
    /// Anchor at the middle of the text.
    Center,
    /// Anchor at the end of the text.
    Right,
}

/// Vertical text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextBaseline {
    /// Anchor at the top of the em box.
    Top,
    /// Anchor at the vertical middle.
    Middle,
    /// Anchor at the alphabetic baseline.
    #[default]
    Alphabetic,
    /// Anchor at the bottom of the em box.
    Bottom,
}

/// One recorded canvas operation, in device pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Erase everything drawn so far on the layer.
    Clear,
    /// Push the current style, transform and clip.
    Save,
    /// Pop the state pushed by the matching `Save`.
    Restore,
    /// Set the stroke colour.
    SetStrokeStyle {
        /// CSS colour string.
        style: String,
    },
    /// Set the fill colour used for text and filled markers.
    SetFillStyle {
        /// CSS colour string.
        style: String,
    },
    /// Set the stroke width.
    SetLineWidth {
        /// Width in pixels.
        width: f64,
    },
    /// Set the text font.
    SetFont {
        /// CSS font shorthand, e.g. `10px sans-serif`.
        font: String,
    },
    /// Set horizontal text alignment relative to the anchor.
    SetTextAlign {
        /// Alignment.
        align: TextAlign,
    },
    /// Set vertical text alignment relative to the anchor.
    SetTextBaseline {
        /// Baseline.
        baseline: TextBaseline,
    },
    /// Start a new path, discarding the current one.
    BeginPath,
    /// Start a subpath at a point.
    MoveTo {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// Add a straight segment to the current subpath.
    LineTo {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// Add a closed rectangle to the path.
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width in pixels.
        width: f64,
        /// Height in pixels.
        height: f64,
    },
    /// Stroke the current path.
    Stroke,
    /// Intersect the clip region with the current path.
    Clip,
    /// Stroke a rectangle outline without touching the path.
    StrokeRect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width in pixels.
        width: f64,
        /// Height in pixels.
        height: f64,
    },
    /// Draw text in the fill colour.
    FillText {
        /// Text to draw.
        text: String,
        /// Anchor X.
        x: f64,
        /// Anchor Y.
        y: f64,
    },
    /// Move the origin of later commands.
    Translate {
        /// Horizontal offset.
        x: f64,
        /// Vertical offset.
        y: f64,
    },
    /// Rotate later commands about the current origin.
    Rotate {
        /// Angle in radians; positive turns clockwise on screen.
        angle: f64,
    },
    /// Stroke connected segments through the points.
    StrokePolyline {
        /// Vertices in drawing order.
        points: Vec<DevicePoint>,
    },
    /// Fill one circle per center.
    FillCircles {
        /// Circle centers.
        centers: Vec<DevicePoint>,
        /// Radius per center, in pixels.
        radii: Vec<f64>,
    },
    /// Outline one circle per center.
    StrokeCircles {
        /// Circle centers.
        centers: Vec<DevicePoint>,
        /// Radius per center, in pixels.
        radii: Vec<f64>,
    },
}

/// Style state saved and restored by `save`/`restore`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerState {
    /// Current stroke style.
    pub stroke_style: String,
    /// Current fill style.
    pub fill_style: String,
    /// Current stroke width.
    pub line_width: f64,
    /// Current font.
    pub font: String,
    /// Current horizontal text anchoring.
    pub text_align: TextAlign,
    /// Current vertical text anchoring.
    pub text_baseline: TextBaseline,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            stroke_style: "black".to_string(),
            fill_style: "black".to_string(),
            line_width: 1.0,
            font: "10px sans-serif".to_string(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
        }
    }
}

/// An addressable drawing surface.
#[derive(Debug, Clone, Default)]
pub struct CanvasLayer {
    state: LayerState,
    saved: Vec<LayerState>,
    visible: Vec<DrawCommand>,
    staged: Vec<DrawCommand>,
    hold_depth: usize,
    commits: u64,
}

impl CanvasLayer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands currently visible on the layer.
    pub fn visible_commands(&self) -> &[DrawCommand] {
        &self.visible
    }

    /// Commands recorded inside the current hold scope but not yet visible.
    pub fn staged_commands(&self) -> &[DrawCommand] {
        &self.staged
    }

    /// Number of times the visible content has changed.
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    /// Whether a hold scope is open.
    pub fn is_held(&self) -> bool {
        self.hold_depth > 0
    }

    /// Current style state.
    pub fn state(&self) -> &LayerState {
        &self.state
    }

    /// Run `f` inside a hold scope and commit its draw calls atomically.
    ///
    /// Nested scopes commit once, when the outermost one exits.
    pub fn hold<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_hold();
        let result = f(self);
        self.end_hold();
        result
    }

    pub(crate) fn begin_hold(&mut self) {
        self.hold_depth += 1;
    }

    pub(crate) fn end_hold(&mut self) {
        debug_assert!(self.hold_depth > 0, "unbalanced hold scope");
        self.hold_depth = self.hold_depth.saturating_sub(1);
        if self.hold_depth > 0 {
            return;
        }
        let staged = std::mem::take(&mut self.staged);
        if staged.is_empty() {
            return;
        }
        for command in staged {
            self.apply(command);
        }
        self.commits += 1;
    }

    fn record(&mut self, command: DrawCommand) {
        if self.hold_depth > 0 {
            self.staged.push(command);
        } else {
            self.apply(command);
            self.commits += 1;
        }
    }

    fn apply(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Clear => self.visible.clear(),
            command => self.visible.push(command),
        }
    }

    /// Erase the layer.
    pub fn clear(&mut self) {
        self.record(DrawCommand::Clear);
    }

    /// Push the style state onto the state stack.
    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
        self.record(DrawCommand::Save);
    }

    /// Pop the style state and any clip set since the matching `save`.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
        self.record(DrawCommand::Restore);
    }

    /// Set the stroke style.
    pub fn set_stroke_style(&mut self, style: impl Into<String>) {
        let style = style.into();
        self.state.stroke_style = style.clone();
        self.record(DrawCommand::SetStrokeStyle { style });
    }

    /// Set the fill style.
    pub fn set_fill_style(&mut self, style: impl Into<String>) {
        let style = style.into();
        self.state.fill_style = style.clone();
        self.record(DrawCommand::SetFillStyle { style });
    }

    /// Set the stroke width.
    pub fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
        self.record(DrawCommand::SetLineWidth { width });
    }

    /// Set the font.
    pub fn set_font(&mut self, font: impl Into<String>) {
        let font = font.into();
        self.state.font = font.clone();
        self.record(DrawCommand::SetFont { font });
    }

    /// Set horizontal text anchoring.
    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
        self.record(DrawCommand::SetTextAlign { align });
    }

    /// Set vertical text anchoring.
    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
        self.record(DrawCommand::SetTextBaseline { baseline });
    }

    /// Start a new path.
    pub fn begin_path(&mut self) {
        self.record(DrawCommand::BeginPath);
    }

    /// Move the pen without drawing.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::MoveTo { x, y });
    }

    /// Add a straight segment to the path.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::LineTo { x, y });
    }

    /// Add a rectangle to the path.
    pub fn rect(&mut self, rect: DeviceRect) {
        self.record(DrawCommand::Rect {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        });
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) {
        self.record(DrawCommand::Stroke);
    }

    /// Intersect the clip region with the current path.
    pub fn clip(&mut self) {
        self.record(DrawCommand::Clip);
    }

    /// Stroke a rectangle outline.
    pub fn stroke_rect(&mut self, rect: DeviceRect) {
        self.record(DrawCommand::StrokeRect {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        });
    }

    /// Draw text at a point using the current alignment and baseline.
    pub fn fill_text(&mut self, text: impl Into<String>, x: f64, y: f64) {
        self.record(DrawCommand::FillText {
            text: text.into(),
            x,
            y,
        });
    }

    /// Move the origin.
    pub fn translate(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::Translate { x, y });
    }

    /// Rotate around the origin, in radians.
    pub fn rotate(&mut self, angle: f64) {
        self.record(DrawCommand::Rotate { angle });
    }

    /// Stroke connected segments through all points.
    pub fn stroke_polyline(&mut self, points: Vec<DevicePoint>) {
        if points.len() < 2 {
            return;
        }
        self.record(DrawCommand::StrokePolyline { points });
    }

    /// Fill one circle per center.
    pub fn fill_circles(&mut self, centers: Vec<DevicePoint>, radii: Vec<f64>) -> PlotResult<()> {
        check_circles(&centers, &radii)?;
        if !centers.is_empty() {
            self.record(DrawCommand::FillCircles { centers, radii });
        }
        Ok(())
    }

    /// Outline one circle per center.
    pub fn stroke_circles(&mut self, centers: Vec<DevicePoint>, radii: Vec<f64>) -> PlotResult<()> {
        check_circles(&centers, &radii)?;
        if !centers.is_empty() {
            self.record(DrawCommand::StrokeCircles { centers, radii });
        }
        Ok(())
    }
}

fn check_circles(centers: &[DevicePoint], radii: &[f64]) -> PlotResult<()> {
    if centers.len() != radii.len() {
        return Err(PlotError::LengthMismatch {
            what: "circle centers and radii",
            left: centers.len(),
            right: radii.len(),
        });
    }
    Ok(())
}

/// One layer per plot surface plus a trailing overlay layer.
#[derive(Debug, Clone)]
pub struct LayerSet {
    layers: Vec<CanvasLayer>,
}

impl LayerSet {
    /// Create layers for `surfaces` surfaces plus the overlay.
    pub fn new(surfaces: usize) -> Self {
        Self {
            layers: (0..=surfaces).map(|_| CanvasLayer::new()).collect(),
        }
    }

    /// Total number of layers, overlay included.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false: the overlay layer exists for the lifetime of the set.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of surface layers.
    pub fn surface_count(&self) -> usize {
        self.layers.len() - 1
    }

    /// Add a surface layer below the overlay and return its index.
    pub(crate) fn push_surface_layer(&mut self) -> usize {
        let index = self.surface_count();
        self.layers.insert(index, CanvasLayer::new());
        index
    }

    /// Drop every surface layer and blank the overlay.
    pub(crate) fn reset(&mut self) {
        self.layers.clear();
        self.layers.push(CanvasLayer::new());
    }

    /// Layer bound to a surface.
    pub fn surface(&self, id: SurfaceId) -> Option<&CanvasLayer> {
        self.layers[..self.surface_count()].get(id.index())
    }

    /// Mutable layer bound to a surface.
    pub fn surface_mut(&mut self, id: SurfaceId) -> PlotResult<&mut CanvasLayer> {
        let count = self.surface_count();
        self.layers[..count]
            .get_mut(id.index())
            .ok_or(PlotError::UnknownSurface(id.index()))
    }

    /// The overlay layer.
    pub fn overlay(&self) -> &CanvasLayer {
        &self.layers[self.layers.len() - 1]
    }

    /// The overlay layer, mutably.
    pub fn overlay_mut(&mut self) -> &mut CanvasLayer {
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    /// All layers in compositing order, overlay last.
    pub fn iter(&self) -> impl Iterator<Item = &CanvasLayer> {
        self.layers.iter()
    }

    /// Run `f` with every surface layer held; all of them commit on exit.
    ///
    /// The overlay is not part of the scope.
    pub fn hold_surfaces<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let count = self.surface_count();
        for layer in &mut self.layers[..count] {
            layer.begin_hold();
        }
        let result = f(self);
        for layer in &mut self.layers[..count] {
            layer.end_hold();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unheld_calls_are_visible_immediately() {
        let mut layer = CanvasLayer::new();
        layer.move_to(0.0, 0.0);
        layer.line_to(1.0, 1.0);
        assert_eq!(layer.visible_commands().len(), 2);
        assert_eq!(layer.commit_count(), 2);
    }

    #[test]
    fn hold_commits_atomically() {
        let mut layer = CanvasLayer::new();
        layer.fill_text("old", 0.0, 0.0);
        layer.hold(|layer| {
            layer.clear();
            layer.begin_path();
            layer.move_to(0.0, 0.0);
            layer.line_to(5.0, 5.0);
            layer.stroke();
            assert_eq!(layer.visible_commands().len(), 1);
            assert_eq!(layer.staged_commands().len(), 5);
        });
        assert!(!layer.is_held());
        assert_eq!(layer.commit_count(), 2);
        assert_eq!(layer.visible_commands().len(), 4);
        assert_eq!(layer.visible_commands()[0], DrawCommand::BeginPath);
    }

    #[test]
    fn nested_holds_commit_once() {
        let mut layer = CanvasLayer::new();
        layer.hold(|layer| {
            layer.clear();
            layer.hold(|layer| layer.stroke());
            assert!(layer.visible_commands().is_empty());
        });
        assert_eq!(layer.commit_count(), 1);
        assert_eq!(layer.visible_commands(), &[DrawCommand::Stroke]);
    }

    #[test]
    fn restore_pops_style_state() {
        let mut layer = CanvasLayer::new();
        layer.set_stroke_style("red");
        layer.save();
        layer.set_stroke_style("blue");
        layer.set_line_width(3.0);
        layer.restore();
        assert_eq!(layer.state().stroke_style, "red");
        assert_eq!(layer.state().line_width, 1.0);
    }

    #[test]
    fn circles_require_matching_radii() {
        let mut layer = CanvasLayer::new();
        let centers = vec![DevicePoint::new(1.0, 1.0), DevicePoint::new(2.0, 2.0)];
        assert!(layer.fill_circles(centers.clone(), vec![1.0]).is_err());
        assert!(layer.fill_circles(centers, vec![1.0, 2.0]).is_ok());
        assert_eq!(layer.visible_commands().len(), 1);
    }

    #[test]
    fn layer_set_keeps_overlay_last() {
        let mut layers = LayerSet::new(1);
        assert_eq!(layers.len(), 2);
        let index = layers.push_surface_layer();
        assert_eq!(index, 1);
        assert_eq!(layers.len(), 3);
        layers.overlay_mut().stroke();
        assert!(layers.surface(SurfaceId(1)).unwrap().visible_commands().is_empty());
        assert_eq!(layers.overlay().visible_commands().len(), 1);
        assert!(layers.surface(SurfaceId(2)).is_none());
    }

    #[test]
    fn hold_surfaces_leaves_overlay_live() {
        let mut layers = LayerSet::new(2);
        layers.hold_surfaces(|layers| {
            layers.surface_mut(SurfaceId(0)).unwrap().stroke();
            layers.overlay_mut().stroke();
            assert!(layers.surface(SurfaceId(0)).unwrap().visible_commands().is_empty());
            assert_eq!(layers.overlay().visible_commands().len(), 1);
        });
        assert_eq!(layers.surface(SurfaceId(0)).unwrap().commit_count(), 1);
        assert_eq!(layers.surface(SurfaceId(1)).unwrap().commit_count(), 0);
    }

    #[test]
    fn commands_serialize_with_op_tag() {
        let json = serde_json::to_value(DrawCommand::MoveTo { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(json["op"], "move_to");
        assert_eq!(json["y"], 2.0);
    }
}
