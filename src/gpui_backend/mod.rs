//! GPUI integration for plotcanvas.
//!
//! [`GpuiFigureView`] paints a [`Figure`](crate::figure::Figure)'s committed
//! layers, forwards pointer input to its toolbar and renders the home, pan
//! and zoom buttons together with the coordinate readout.

mod config;
mod paint;
mod state;
mod view;

pub use config::FigureViewConfig;
pub use view::{FigureHandle, GpuiFigureView};
