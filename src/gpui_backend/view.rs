use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{
    ClickEvent, Div, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, SharedString,
    Stateful, Window, canvas, div,
};
use tracing::warn;

use crate::error::PlotResult;
use crate::figure::Figure;
use crate::style::Color;
use crate::toolbar::Event;

use super::config::FigureViewConfig;
use super::paint::{paint_figure, to_hsla};
use super::state::ViewUiState;

/// A GPUI view that renders a [`Figure`] with its pan/zoom toolbar.
///
/// The view tracks its canvas size, resizes the figure to match and forwards
/// pointer input in canvas-local device pixels.
#[derive(Clone)]
pub struct GpuiFigureView {
    figure: Arc<RwLock<Figure>>,
    state: Arc<RwLock<ViewUiState>>,
    config: FigureViewConfig,
}

impl GpuiFigureView {
    /// Create a view with the default [`FigureViewConfig`].
    pub fn new(figure: Figure) -> Self {
        Self::with_config(figure, FigureViewConfig::default())
    }

    /// Create a view with a custom configuration.
    pub fn with_config(figure: Figure, config: FigureViewConfig) -> Self {
        Self {
            figure: Arc::new(RwLock::new(figure)),
            state: Arc::new(RwLock::new(ViewUiState::default())),
            config,
        }
    }

    /// Get a handle for mutating the underlying figure.
    ///
    /// Call [`FigureHandle::redraw`] after changing marks or limits.
    pub fn figure_handle(&self) -> FigureHandle {
        FigureHandle {
            figure: Arc::clone(&self.figure),
        }
    }

    fn dispatch(&self, event: Event, cx: &mut Context<Self>) {
        let result = self.figure.write().expect("figure lock").handle(event);
        report(result);
        cx.notify();
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let local = self.state.read().expect("view state lock").to_canvas(ev.position);
        if let Some(point) = local {
            self.dispatch(Event::PointerDown(point), cx);
        }
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let local = self.state.read().expect("view state lock").to_canvas(ev.position);
        if let Some(point) = local {
            self.dispatch(Event::PointerMove(point), cx);
        }
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let local = self.state.read().expect("view state lock").to_canvas(ev.position);
        if let Some(point) = local {
            self.dispatch(Event::PointerUp(point), cx);
        }
    }

    fn tool_button(
        &self,
        id: &'static str,
        label: &'static str,
        pressed: bool,
        cx: &mut Context<Self>,
        on_click: impl Fn(&mut Self, &mut Context<Self>) + 'static,
    ) -> Stateful<Div> {
        let background = if pressed {
            self.config.active_button
        } else {
            Color::from_rgb_u32(0xf2f2f2)
        };
        div()
            .id(id)
            .px_2()
            .py_1()
            .border_1()
            .border_color(to_hsla(Color::from_rgb_u32(0xb0b0b0)))
            .rounded_sm()
            .bg(to_hsla(background))
            .child(label)
            .on_click(cx.listener(move |this, _: &ClickEvent, _, cx| on_click(this, cx)))
    }
}

impl Render for GpuiFigureView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let figure = Arc::clone(&self.figure);
        let state = Arc::clone(&self.state);
        let config = self.config.clone();
        let (buttons, status) = {
            let figure = self.figure.read().expect("figure lock");
            (
                figure.toolbar().buttons(),
                figure.status().map(|text| SharedString::from(text.to_string())),
            )
        };

        let mut root = div()
            .size_full()
            .flex()
            .flex_col()
            .bg(to_hsla(self.config.background));

        if self.config.show_toolbar {
            let mut bar = div()
                .flex()
                .flex_row()
                .gap_2()
                .p_1()
                .items_center()
                .child(self.tool_button("home", "Home", false, cx, |this, cx| {
                    this.dispatch(Event::Home, cx);
                }))
                .child(self.tool_button("pan", "Pan", buttons.pan, cx, move |this, cx| {
                    this.dispatch(Event::PanToggled(!buttons.pan), cx);
                }))
                .child(self.tool_button("zoom", "Zoom", buttons.zoom, cx, move |this, cx| {
                    this.dispatch(Event::ZoomToggled(!buttons.zoom), cx);
                }));
            if self.config.show_status {
                bar = bar.child(div().ml_4().child(status.unwrap_or_default()));
            }
            root = root.child(bar);
        }

        root.child(
            div()
                .flex_1()
                .child(
                    canvas(
                        move |bounds, _, _| {
                            let mut state = state.write().expect("view state lock");
                            state.canvas_bounds = Some(bounds);
                            let size = ViewUiState::canvas_size(bounds);
                            if let Some((width, height)) = size {
                                if state.drawn_size != size {
                                    let mut figure = figure.write().expect("figure lock");
                                    report(figure.resize(width, height));
                                    state.drawn_size = size;
                                }
                            }
                            (figure, bounds)
                        },
                        move |_, (figure, bounds), window, cx| {
                            let figure = figure.read().expect("figure lock");
                            paint_figure(&figure, bounds, &config, window, cx);
                        },
                    )
                    .size_full(),
                )
                .on_mouse_down(
                    MouseButton::Left,
                    cx.listener(|this, ev, _, cx| {
                        this.on_mouse_down(ev, cx);
                    }),
                )
                .on_mouse_move(cx.listener(|this, ev, _, cx| {
                    this.on_mouse_move(ev, cx);
                }))
                .on_mouse_up(
                    MouseButton::Left,
                    cx.listener(|this, ev, _, cx| {
                        this.on_mouse_up(ev, cx);
                    }),
                ),
        )
    }
}

fn report(result: PlotResult<()>) {
    if let Err(err) = result {
        warn!(error = %err, "figure update failed");
    }
}

/// A handle for mutating a [`Figure`] held inside a `GpuiFigureView`.
///
/// The handle clones cheaply and can be moved into async tasks.
#[derive(Clone)]
pub struct FigureHandle {
    figure: Arc<RwLock<Figure>>,
}

impl FigureHandle {
    /// Read the figure.
    ///
    /// The figure is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&Figure) -> R) -> R {
        let figure = self.figure.read().expect("figure lock");
        f(&figure)
    }

    /// Mutate the figure.
    ///
    /// The figure is locked for the duration of the callback.
    pub fn write<R>(&self, f: impl FnOnce(&mut Figure) -> R) -> R {
        let mut figure = self.figure.write().expect("figure lock");
        f(&mut figure)
    }

    /// Redraw every surface after external changes.
    pub fn redraw(&self) -> PlotResult<()> {
        self.write(Figure::draw)
    }
}
