//! The figure: owns the plot surfaces, their canvas layers and the toolbar.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, trace};

use crate::canvas::LayerSet;
use crate::config::FigureConfig;
use crate::error::{PlotError, PlotResult};
use crate::geom::{DevicePoint, DeviceRect};
use crate::interaction::find_surface_at;
use crate::layout::GridSlot;
use crate::render;
use crate::surface::{PlotSurface, SurfaceId};
use crate::toolbar::{Action, Event, Toolbar};

/// Mime type of the JSON layer snapshot in a [`DisplayBundle`].
pub const LAYERS_MIME: &str = "application/vnd.plotcanvas.layers+json";

/// Renderable representations of a figure, keyed by mime type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayBundle {
    items: BTreeMap<String, Value>,
}

impl DisplayBundle {
    /// Content for a mime type.
    pub fn get(&self, mime: &str) -> Option<&Value> {
        self.items.get(mime)
    }

    /// Available mime types in sorted order.
    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Consume the bundle and return the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.items
    }
}

/// A set of plot surfaces drawn on stacked canvas layers.
#[derive(Debug, Clone)]
pub struct Figure {
    config: FigureConfig,
    width: u32,
    height: u32,
    surfaces: Vec<PlotSurface>,
    layers: LayerSet,
    toolbar: Toolbar,
    status: Option<String>,
}

impl Figure {
    /// Create an empty figure.
    pub fn new(config: FigureConfig) -> PlotResult<Self> {
        let (width, height) = config.canvas_size()?;
        info!(width, height, "figure created");
        Ok(Self {
            toolbar: Toolbar::new(config.interaction),
            config,
            width,
            height,
            surfaces: Vec::new(),
            layers: LayerSet::new(0),
            status: None,
        })
    }

    /// Create a figure with an `nrows` by `ncols` grid of surfaces.
    ///
    /// Surface ids are returned row by row from the top-left.
    pub fn subplots(
        nrows: usize,
        ncols: usize,
        config: FigureConfig,
    ) -> PlotResult<(Self, Vec<SurfaceId>)> {
        let mut figure = Self::new(config)?;
        let ids = (1..=nrows.saturating_mul(ncols).max(1))
            .map(|index| figure.add_subplot(nrows, ncols, index))
            .collect::<PlotResult<Vec<_>>>()?;
        Ok((figure, ids))
    }

    /// Add a surface at a grid slot; its layer goes below the overlay.
    pub fn add_subplot(&mut self, nrows: usize, ncols: usize, index: usize) -> PlotResult<SurfaceId> {
        let slot = GridSlot::new(nrows, ncols, index)?;
        let layer = self.layers.push_surface_layer();
        let id = SurfaceId(self.surfaces.len());
        debug_assert_eq!(layer, id.index());
        let frame = slot.display_box(&self.config.subplot, self.width as f64, self.height as f64);
        self.surfaces.push(PlotSurface::new(
            id,
            slot,
            frame,
            self.height as f64,
            self.config.render.margin,
        ));
        debug!(surface = id.index(), nrows, ncols, index, "subplot added");
        Ok(id)
    }

    /// Configuration the figure was built with.
    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    /// Canvas size in device pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// All surfaces in declaration order.
    pub fn surfaces(&self) -> &[PlotSurface] {
        &self.surfaces
    }

    /// Look up a surface.
    pub fn surface(&self, id: SurfaceId) -> PlotResult<&PlotSurface> {
        self.surfaces
            .get(id.index())
            .ok_or(PlotError::UnknownSurface(id.index()))
    }

    /// Look up a surface for mutation.
    pub fn surface_mut(&mut self, id: SurfaceId) -> PlotResult<&mut PlotSurface> {
        self.surfaces
            .get_mut(id.index())
            .ok_or(PlotError::UnknownSurface(id.index()))
    }

    /// Canvas layers, overlay last.
    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    /// Pan/zoom tool state.
    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    /// Live coordinate readout, if the pointer is over a surface.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Surface under a device point.
    pub fn find_surface_at(&self, point: DevicePoint) -> Option<SurfaceId> {
        find_surface_at(&self.surfaces, point)
    }

    /// Redraw every surface layer in one hold scope.
    pub fn draw(&mut self) -> PlotResult<()> {
        debug!(surfaces = self.surfaces.len(), "full redraw");
        let surfaces = &self.surfaces;
        let render = &self.config.render;
        self.layers.hold_surfaces(|layers| {
            for surface in surfaces {
                let layer = layers.surface_mut(surface.id())?;
                layer.clear();
                render::draw_surface(surface, layer, render)?;
            }
            Ok(())
        })
    }

    /// Redraw one surface layer in one hold scope.
    pub fn draw_surface(&mut self, id: SurfaceId) -> PlotResult<()> {
        trace!(surface = id.index(), "surface redraw");
        let surface = self
            .surfaces
            .get(id.index())
            .ok_or(PlotError::UnknownSurface(id.index()))?;
        let render = &self.config.render;
        self.layers.surface_mut(id)?.hold(|layer| {
            layer.clear();
            render::draw_surface(surface, layer, render)
        })
    }

    /// Change the canvas size in device pixels, re-place surfaces and redraw.
    pub fn resize(&mut self, width: u32, height: u32) -> PlotResult<()> {
        if width == 0 || height == 0 {
            return Err(PlotError::InvalidCanvasSize { width, height });
        }
        self.width = width;
        self.height = height;
        self.config.width_in = width as f64 / self.config.dpi;
        self.config.height_in = height as f64 / self.config.dpi;
        for surface in &mut self.surfaces {
            let frame =
                surface
                    .slot()
                    .display_box(&self.config.subplot, width as f64, height as f64);
            surface.set_frame(frame, height as f64);
        }
        info!(width, height, "figure resized");
        self.draw()
    }

    /// Remove every surface and blank all layers.
    pub fn clear(&mut self) {
        self.surfaces.clear();
        self.layers.reset();
        self.toolbar = Toolbar::new(self.config.interaction);
        self.status = None;
        debug!("figure cleared");
    }

    /// Feed one event to the toolbar and apply what it asks for.
    pub fn handle(&mut self, event: Event) -> PlotResult<()> {
        let actions = self.toolbar.handle(event, &self.surfaces);
        for action in actions {
            self.apply(action)?;
        }
        Ok(())
    }

    /// Pointer pressed at canvas-local device coordinates.
    pub fn on_mouse_down(&mut self, x: f64, y: f64) -> PlotResult<()> {
        self.handle(Event::PointerDown(DevicePoint::new(x, y)))
    }

    /// Pointer moved to canvas-local device coordinates.
    pub fn on_mouse_move(&mut self, x: f64, y: f64) -> PlotResult<()> {
        self.handle(Event::PointerMove(DevicePoint::new(x, y)))
    }

    /// Pointer released at canvas-local device coordinates.
    pub fn on_mouse_up(&mut self, x: f64, y: f64) -> PlotResult<()> {
        self.handle(Event::PointerUp(DevicePoint::new(x, y)))
    }

    /// Home button: fit every surface to its data.
    pub fn home(&mut self) -> PlotResult<()> {
        self.handle(Event::Home)
    }

    /// Pan button toggled.
    pub fn toggle_pan(&mut self, pressed: bool) -> PlotResult<()> {
        self.handle(Event::PanToggled(pressed))
    }

    /// Zoom button toggled.
    pub fn toggle_zoom(&mut self, pressed: bool) -> PlotResult<()> {
        self.handle(Event::ZoomToggled(pressed))
    }

    fn apply(&mut self, action: Action) -> PlotResult<()> {
        match action {
            Action::SetView { surface, x, y } => self.surface_mut(surface)?.set_view(x, y),
            Action::AutoscaleAll => {
                self.surfaces.iter_mut().for_each(PlotSurface::autoscale);
                Ok(())
            }
            Action::RedrawSurface(id) => self.draw_surface(id),
            Action::RedrawAll => self.draw(),
            Action::DrawSelection(rect) => {
                self.draw_selection(rect);
                Ok(())
            }
            Action::ClearOverlay => {
                self.layers.overlay_mut().clear();
                Ok(())
            }
            Action::Status(text) => {
                self.status = text;
                Ok(())
            }
        }
    }

    fn draw_selection(&mut self, rect: DeviceRect) {
        self.layers.overlay_mut().hold(|overlay| {
            overlay.clear();
            overlay.set_stroke_style("black");
            overlay.set_line_width(1.0);
            overlay.stroke_rect(rect);
        });
    }

    /// Draw everything, then describe the figure for a rich display host.
    ///
    /// The bundle carries a `text/plain` summary and a JSON snapshot of every
    /// layer's visible commands under [`LAYERS_MIME`].
    pub fn repr_mimebundle(&mut self) -> PlotResult<DisplayBundle> {
        self.draw()?;
        let surface_count = self.layers.surface_count();
        let layers = self
            .layers
            .iter()
            .enumerate()
            .map(|(index, layer)| {
                let kind = if index < surface_count { "surface" } else { "overlay" };
                let commands = serde_json::to_value(layer.visible_commands())?;
                Ok(json!({
                    "index": index,
                    "kind": kind,
                    "commits": layer.commit_count(),
                    "commands": commands,
                }))
            })
            .collect::<PlotResult<Vec<_>>>()?;

        let mut items = BTreeMap::new();
        items.insert(
            "text/plain".to_string(),
            Value::String(format!(
                "<Figure size {}x{} with {} Axes>",
                self.width,
                self.height,
                self.surfaces.len()
            )),
        );
        items.insert(
            LAYERS_MIME.to_string(),
            json!({
                "width": self.width,
                "height": self.height,
                "layers": layers,
            }),
        );
        Ok(DisplayBundle { items })
    }
}
