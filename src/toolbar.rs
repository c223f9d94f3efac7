//! Pan and zoom tools as an explicit state machine.
//!
//! [`Toolbar::handle`] takes one [`Event`] and the figure's surfaces and
//! returns the [`Action`]s the figure must apply. The toolbar never touches a
//! surface or a canvas layer itself.

use tracing::{debug, trace};

use crate::config::InteractionConfig;
use crate::geom::{DevicePoint, DeviceRect};
use crate::interaction::{PanScale, find_surface_at, pan_view, selection_rect, selection_to_view};
use crate::surface::{PlotSurface, SurfaceId};
use crate::view::{Range, Viewport};

/// The armed tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer drags do nothing.
    #[default]
    None,
    /// Dragging moves the view window.
    Pan,
    /// Dragging selects a new view window.
    Zoom,
}

/// Input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Pointer pressed at a device position.
    PointerDown(DevicePoint),
    /// Pointer moved to a device position.
    PointerMove(DevicePoint),
    /// Pointer released at a device position.
    PointerUp(DevicePoint),
    /// Home button clicked.
    Home,
    /// Pan button toggled.
    PanToggled(bool),
    /// Zoom button toggled.
    ZoomToggled(bool),
}

/// Side effect requested by the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace a surface's view window.
    SetView {
        /// Target surface.
        surface: SurfaceId,
        /// New X window.
        x: Range,
        /// New Y window.
        y: Range,
    },
    /// Fit every surface's view window to its data.
    AutoscaleAll,
    /// Redraw one surface layer.
    RedrawSurface(SurfaceId),
    /// Redraw every surface layer.
    RedrawAll,
    /// Show a zoom selection on the overlay.
    DrawSelection(DeviceRect),
    /// Erase the overlay.
    ClearOverlay,
    /// Replace the status text; `None` clears it.
    Status(Option<String>),
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Session {
    /// No drag in progress.
    Idle,
    /// Dragging with the pan tool.
    Pan {
        /// Surface being panned.
        surface: SurfaceId,
        /// Pointer position at gesture start.
        origin: DevicePoint,
        /// View window at gesture start.
        start: Viewport,
        /// Data units per pixel at gesture start.
        scale: PanScale,
    },
    /// Dragging with the zoom tool.
    Zoom {
        /// Surface being zoomed.
        surface: SurfaceId,
        /// Pointer position at gesture start.
        origin: DevicePoint,
        /// Device rectangle the selection is clamped to.
        bounds: DeviceRect,
    },
}

/// Pressed state of the two toggle buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolButtons {
    /// Pan button pressed.
    pub pan: bool,
    /// Zoom button pressed.
    pub zoom: bool,
}

/// Pan/zoom tool state machine.
#[derive(Debug, Clone)]
pub struct Toolbar {
    config: InteractionConfig,
    buttons: ToolButtons,
    session: Session,
    tools_lock: bool,
}

impl Toolbar {
    /// Create an idle toolbar with no tool armed.
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            buttons: ToolButtons::default(),
            session: Session::Idle,
            tools_lock: false,
        }
    }

    /// The armed tool.
    pub fn tool(&self) -> Tool {
        if self.buttons.pan {
            Tool::Pan
        } else if self.buttons.zoom {
            Tool::Zoom
        } else {
            Tool::None
        }
    }

    /// Button states, for hosts that render toggle buttons.
    pub fn buttons(&self) -> ToolButtons {
        self.buttons
    }

    /// The current drag session.
    pub fn session(&self) -> Session {
        self.session
    }

    /// Surface targeted by the current drag, if any.
    pub fn active_surface(&self) -> Option<SurfaceId> {
        match self.session {
            Session::Idle => None,
            Session::Pan { surface, .. } | Session::Zoom { surface, .. } => Some(surface),
        }
    }

    /// Advance the state machine by one event.
    pub fn handle(&mut self, event: Event, surfaces: &[PlotSurface]) -> Vec<Action> {
        let mut actions = Vec::new();
        match event {
            Event::PointerDown(point) => self.pointer_down(point, surfaces),
            Event::PointerMove(point) => self.pointer_move(point, surfaces, &mut actions),
            Event::PointerUp(point) => self.pointer_up(point, surfaces, &mut actions),
            Event::Home => {
                debug!("home: autoscale every surface");
                actions.push(Action::AutoscaleAll);
                actions.push(Action::RedrawAll);
            }
            Event::PanToggled(pressed) => self.toggle(Tool::Pan, pressed, &mut actions),
            Event::ZoomToggled(pressed) => self.toggle(Tool::Zoom, pressed, &mut actions),
        }
        actions
    }

    fn toggle(&mut self, tool: Tool, pressed: bool, actions: &mut Vec<Action>) {
        if self.tools_lock {
            return;
        }
        self.tools_lock = true;
        let before = self.tool();
        self.set_button(tool, pressed);
        if pressed {
            let other = match tool {
                Tool::Pan => Tool::Zoom,
                _ => Tool::Pan,
            };
            self.set_button(other, false);
            // Releasing the other button fires its callback; the lock stops it here.
            self.toggle(other, false, actions);
        }
        self.tools_lock = false;

        let after = self.tool();
        if after != before {
            debug!(?before, ?after, "tool changed");
            if self.session != Session::Idle {
                self.session = Session::Idle;
                actions.push(Action::ClearOverlay);
            }
        }
    }

    fn set_button(&mut self, tool: Tool, pressed: bool) {
        match tool {
            Tool::Pan => self.buttons.pan = pressed,
            Tool::Zoom => self.buttons.zoom = pressed,
            Tool::None => {}
        }
    }

    fn pointer_down(&mut self, point: DevicePoint, surfaces: &[PlotSurface]) {
        let tool = self.tool();
        if tool == Tool::None {
            return;
        }
        let Some(surface) = find_surface_at(surfaces, point).and_then(|id| lookup(surfaces, id))
        else {
            return;
        };
        self.session = match tool {
            Tool::Pan => {
                let transform = surface.transform();
                Session::Pan {
                    surface: surface.id(),
                    origin: point,
                    start: transform.viewport(),
                    scale: PanScale::at_gesture_start(&transform),
                }
            }
            Tool::Zoom => Session::Zoom {
                surface: surface.id(),
                origin: point,
                bounds: surface.device_rect(),
            },
            Tool::None => Session::Idle,
        };
        debug!(surface = surface.id().index(), ?tool, "drag started");
    }

    fn pointer_move(
        &mut self,
        point: DevicePoint,
        surfaces: &[PlotSurface],
        actions: &mut Vec<Action>,
    ) {
        match self.session {
            Session::Idle => actions.push(Action::Status(self.readout(point, surfaces))),
            Session::Pan {
                surface,
                origin,
                start,
                scale,
            } => {
                let view = pan_view(start, origin, point, scale);
                trace!(surface = surface.index(), ?view, "pan");
                actions.push(Action::SetView {
                    surface,
                    x: view.x,
                    y: view.y,
                });
                actions.push(Action::RedrawSurface(surface));
            }
            Session::Zoom { origin, bounds, .. } => {
                actions.push(Action::DrawSelection(selection_rect(origin, point, bounds)));
            }
        }
    }

    fn pointer_up(
        &mut self,
        point: DevicePoint,
        surfaces: &[PlotSurface],
        actions: &mut Vec<Action>,
    ) {
        let session = std::mem::replace(&mut self.session, Session::Idle);
        let Session::Zoom {
            surface,
            origin,
            bounds,
        } = session
        else {
            if let Session::Pan { surface, .. } = session {
                debug!(surface = surface.index(), "pan finished");
            }
            return;
        };

        actions.push(Action::ClearOverlay);
        let Some(target) = lookup(surfaces, surface) else {
            return;
        };
        let rect = selection_rect(origin, point, bounds);
        match selection_to_view(rect, &target.transform(), self.config.zoom_threshold()) {
            Some(view) => {
                debug!(surface = surface.index(), ?view, "zoom applied");
                actions.push(Action::SetView {
                    surface,
                    x: view.x,
                    y: view.y,
                });
                actions.push(Action::RedrawSurface(surface));
            }
            None => debug!(
                width = rect.width(),
                height = rect.height(),
                "zoom selection discarded"
            ),
        }
    }

    fn readout(&self, point: DevicePoint, surfaces: &[PlotSurface]) -> Option<String> {
        let surface = find_surface_at(surfaces, point).and_then(|id| lookup(surfaces, id))?;
        let data = surface.transform().to_data(point);
        let precision = self.config.readout_precision;
        Some(format!(
            "x={} y={}",
            surface.x_axis().formatter().format(data.x, precision),
            surface.y_axis().formatter().format(data.y, precision),
        ))
    }
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

fn lookup(surfaces: &[PlotSurface], id: SurfaceId) -> Option<&PlotSurface> {
    surfaces.get(id.index()).filter(|surface| surface.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubplotParams;
    use crate::layout::GridSlot;

    fn surfaces(ncols: usize) -> Vec<PlotSurface> {
        let params = SubplotParams::default();
        (1..=ncols)
            .map(|index| {
                let slot = GridSlot::new(1, ncols, index).unwrap();
                let mut surface = PlotSurface::new(
                    SurfaceId(index - 1),
                    slot,
                    slot.display_box(&params, 640.0, 480.0),
                    480.0,
                    0.05,
                );
                let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
                let y: Vec<f64> = x.iter().map(|v| v * 2.0).collect();
                surface.plot(x, y).unwrap();
                surface
            })
            .collect()
    }

    fn apply(surfaces: &mut [PlotSurface], actions: &[Action]) {
        for action in actions {
            match action {
                Action::SetView { surface, x, y } => {
                    surfaces[surface.index()].set_view(*x, *y).unwrap();
                }
                Action::AutoscaleAll => surfaces.iter_mut().for_each(PlotSurface::autoscale),
                _ => {}
            }
        }
    }

    fn center(surface: &PlotSurface) -> DevicePoint {
        let rect = surface.device_rect();
        DevicePoint::new((rect.min.x + rect.max.x) * 0.5, (rect.min.y + rect.max.y) * 0.5)
    }

    #[test]
    fn tools_are_mutually_exclusive() {
        let mut toolbar = Toolbar::default();
        toolbar.handle(Event::PanToggled(true), &[]);
        assert_eq!(toolbar.tool(), Tool::Pan);
        toolbar.handle(Event::ZoomToggled(true), &[]);
        assert_eq!(toolbar.tool(), Tool::Zoom);
        assert!(!toolbar.buttons().pan);
        toolbar.handle(Event::PanToggled(true), &[]);
        assert_eq!(
            toolbar.buttons(),
            ToolButtons {
                pan: true,
                zoom: false
            }
        );
        toolbar.handle(Event::PanToggled(false), &[]);
        assert_eq!(toolbar.tool(), Tool::None);
    }

    #[test]
    fn pointer_down_without_tool_stays_idle() {
        let surfaces = surfaces(1);
        let mut toolbar = Toolbar::default();
        let actions = toolbar.handle(Event::PointerDown(center(&surfaces[0])), &surfaces);
        assert!(actions.is_empty());
        assert_eq!(toolbar.session(), Session::Idle);
    }

    #[test]
    fn pointer_down_in_margin_stays_idle() {
        let surfaces = surfaces(1);
        let mut toolbar = Toolbar::default();
        toolbar.handle(Event::PanToggled(true), &surfaces);
        toolbar.handle(Event::PointerDown(DevicePoint::new(3.0, 3.0)), &surfaces);
        assert_eq!(toolbar.session(), Session::Idle);
    }

    #[test]
    fn pan_uses_scale_frozen_at_gesture_start() {
        let mut surfaces = surfaces(1);
        let mut toolbar = Toolbar::default();
        toolbar.handle(Event::PanToggled(true), &surfaces);

        let start = surfaces[0].viewport();
        let scale = PanScale::at_gesture_start(&surfaces[0].transform());
        toolbar.handle(Event::PointerDown(DevicePoint::new(100.0, 100.0)), &surfaces);
        let mid = toolbar.handle(Event::PointerMove(DevicePoint::new(120.0, 110.0)), &surfaces);
        apply(&mut surfaces, &mid);
        let end = toolbar.handle(Event::PointerMove(DevicePoint::new(150.0, 130.0)), &surfaces);
        assert!(end.contains(&Action::RedrawSurface(SurfaceId(0))));
        apply(&mut surfaces, &end);

        let view = surfaces[0].viewport();
        assert!((view.x.min - (start.x.min - 50.0 * scale.x)).abs() < 1e-9);
        assert!((view.x.max - (start.x.max - 50.0 * scale.x)).abs() < 1e-9);
        assert!((view.y.min - (start.y.min - 30.0 * scale.y)).abs() < 1e-9);
        assert!((view.y.max - (start.y.max - 30.0 * scale.y)).abs() < 1e-9);

        let up = toolbar.handle(Event::PointerUp(DevicePoint::new(150.0, 130.0)), &surfaces);
        assert!(up.is_empty());
        assert_eq!(toolbar.session(), Session::Idle);
    }

    #[test]
    fn pan_back_to_origin_restores_view_exactly() {
        let mut surfaces = surfaces(1);
        let mut toolbar = Toolbar::default();
        toolbar.handle(Event::PanToggled(true), &surfaces);
        let before = surfaces[0].viewport();
        let a = DevicePoint::new(200.0, 200.0);
        toolbar.handle(Event::PointerDown(a), &surfaces);
        let actions = toolbar.handle(Event::PointerMove(DevicePoint::new(260.0, 170.0)), &surfaces);
        apply(&mut surfaces, &actions);
        assert_ne!(surfaces[0].viewport(), before);
        let actions = toolbar.handle(Event::PointerMove(a), &surfaces);
        apply(&mut surfaces, &actions);
        toolbar.handle(Event::PointerUp(a), &surfaces);
        assert_eq!(surfaces[0].viewport(), before);
    }

    #[test]
    fn zoom_drag_previews_on_overlay_only() {
        let surfaces = surfaces(1);
        let mut toolbar = Toolbar::default();
        toolbar.handle(Event::ZoomToggled(true), &surfaces);
        toolbar.handle(Event::PointerDown(center(&surfaces[0])), &surfaces);
        let actions = toolbar.handle(Event::PointerMove(DevicePoint::new(10_000.0, 0.0)), &surfaces);
        assert_eq!(actions.len(), 1);
        let Action::DrawSelection(rect) = actions[0] else {
            panic!("expected a selection, got {actions:?}");
        };
        let bounds = surfaces[0].device_rect();
        assert_eq!(rect.max.x, bounds.max.x);
        assert_eq!(rect.min.y, bounds.min.y);
    }

    #[test]
    fn zoom_selection_shrinks_view() {
        let mut surfaces = surfaces(1);
        let mut toolbar = Toolbar::default();
        toolbar.handle(Event::ZoomToggled(true), &surfaces);
        let before = surfaces[0].viewport();
        let rect = surfaces[0].device_rect();
        let a = DevicePoint::new(rect.min.x + 40.0, rect.min.y + 30.0);
        let b = DevicePoint::new(rect.max.x - 90.0, rect.max.y - 20.0);
        toolbar.handle(Event::PointerDown(a), &surfaces);
        toolbar.handle(Event::PointerMove(b), &surfaces);
        let actions = toolbar.handle(Event::PointerUp(b), &surfaces);
        assert_eq!(actions[0], Action::ClearOverlay);
        assert!(actions.contains(&Action::RedrawSurface(SurfaceId(0))));
        apply(&mut surfaces, &actions);
        let after = surfaces[0].viewport();
        assert!(after.is_within(before));
        assert!(after.x.span() < before.x.span());
        assert!(after.y.span() < before.y.span());
    }

    #[test]
    fn tiny_zoom_selection_is_discarded() {
        let mut surfaces = surfaces(1);
        let mut toolbar = Toolbar::default();
        toolbar.handle(Event::ZoomToggled(true), &surfaces);
        let before = surfaces[0].viewport();
        let a = center(&surfaces[0]);
        let b = DevicePoint::new(a.x + 2.0, a.y + 2.0);
        toolbar.handle(Event::PointerDown(a), &surfaces);
        toolbar.handle(Event::PointerMove(b), &surfaces);
        let actions = toolbar.handle(Event::PointerUp(b), &surfaces);
        assert_eq!(actions, vec![Action::ClearOverlay]);
        apply(&mut surfaces, &actions);
        assert_eq!(surfaces[0].viewport(), before);
        assert_eq!(toolbar.session(), Session::Idle);
    }

    #[test]
    fn drag_targets_surface_under_pointer_down() {
        let mut surfaces = surfaces(2);
        let mut toolbar = Toolbar::default();
        toolbar.handle(Event::PanToggled(true), &surfaces);
        let right_before = surfaces[1].viewport();
        let down = center(&surfaces[0]);
        toolbar.handle(Event::PointerDown(down), &surfaces);
        assert_eq!(toolbar.active_surface(), Some(SurfaceId(0)));
        // Dragging across into the other surface still pans the first one.
        let actions = toolbar.handle(Event::PointerMove(center(&surfaces[1])), &surfaces);
        apply(&mut surfaces, &actions);
        assert_eq!(surfaces[1].viewport(), right_before);
    }

    #[test]
    fn idle_move_reports_data_coordinates() {
        let surfaces = surfaces(1);
        let mut toolbar = Toolbar::default();
        let transform = surfaces[0].transform();
        let point = transform.to_device(crate::geom::Point::new(25.0, 80.0));
        let actions = toolbar.handle(Event::PointerMove(point), &surfaces);
        assert_eq!(actions, vec![Action::Status(Some("x=25.00 y=80.00".into()))]);
        let actions = toolbar.handle(Event::PointerMove(DevicePoint::new(1.0, 1.0)), &surfaces);
        assert_eq!(actions, vec![Action::Status(None)]);
    }

    #[test]
    fn switching_tool_mid_drag_ends_session() {
        let surfaces = surfaces(1);
        let mut toolbar = Toolbar::default();
        toolbar.handle(Event::ZoomToggled(true), &surfaces);
        toolbar.handle(Event::PointerDown(center(&surfaces[0])), &surfaces);
        let actions = toolbar.handle(Event::PanToggled(true), &surfaces);
        assert_eq!(actions, vec![Action::ClearOverlay]);
        assert_eq!(toolbar.session(), Session::Idle);
    }

    #[test]
    fn home_requests_autoscale_and_full_redraw() {
        let mut surfaces = surfaces(2);
        let natural: Vec<_> = surfaces.iter().map(PlotSurface::natural_view).collect();
        surfaces[0].set_xlim(3.0, 4.0).unwrap();
        surfaces[1].set_ylim(-1.0, 0.0).unwrap();
        let mut toolbar = Toolbar::default();
        let actions = toolbar.handle(Event::Home, &surfaces);
        assert_eq!(actions, vec![Action::AutoscaleAll, Action::RedrawAll]);
        apply(&mut surfaces, &actions);
        for (surface, natural) in surfaces.iter().zip(natural) {
            assert_eq!(surface.viewport(), natural);
        }
    }
}
