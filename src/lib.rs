//! plotcanvas draws interactive 2D plots onto stacked canvas layers.
//!
//! A [`Figure`] owns a grid of [`PlotSurface`]s. Each surface renders onto its
//! own [`CanvasLayer`] and a shared overlay layer carries zoom selections. The
//! [`Toolbar`] state machine turns pointer and button events into pan, zoom
//! and home actions.

#![forbid(unsafe_code)]

pub mod axis;
pub mod canvas;
pub mod config;
pub mod error;
pub mod figure;
pub mod geom;
pub mod interaction;
pub mod layout;
pub mod mark;
pub mod render;
pub mod style;
pub mod surface;
pub mod toolbar;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axis::{AxisConfig, AxisFormatter, TickSet, TickSpec};
pub use canvas::{CanvasLayer, DrawCommand, LayerSet, TextAlign, TextBaseline};
pub use config::{FigureConfig, InteractionConfig, RenderConfig, SubplotParams};
pub use error::{AxisName, PlotError, PlotResult};
pub use figure::{DisplayBundle, Figure, LAYERS_MIME};
pub use geom::{DevicePoint, DeviceRect, Point};
pub use interaction::{PanScale, find_surface_at};
pub use layout::GridSlot;
pub use mark::{LineMark, Mark, PointCollection};
pub use style::{Color, LineStyle, MarkerSize, MarkerStyle};
pub use surface::{PlotSurface, SurfaceId};
pub use toolbar::{Action, Event, Session, Tool, ToolButtons, Toolbar};
pub use transform::{DisplayBox, Transform};
pub use view::{Range, ViewMode, Viewport};

#[cfg(feature = "gpui")]
pub use gpui_backend::{FigureHandle, FigureViewConfig, GpuiFigureView};
