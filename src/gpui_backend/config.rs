use crate::style::Color;

/// Configuration for the GPUI figure view.
#[derive(Debug, Clone)]
pub struct FigureViewConfig {
    /// Show the home/pan/zoom button row.
    pub show_toolbar: bool,
    /// Show the coordinate readout next to the buttons.
    pub show_status: bool,
    /// Canvas background.
    pub background: Color,
    /// Fill of a pressed tool button.
    pub active_button: Color,
    /// Font family used for canvas text.
    pub font_family: &'static str,
}

impl Default for FigureViewConfig {
    fn default() -> Self {
        Self {
            show_toolbar: true,
            show_status: true,
            background: Color::WHITE,
            active_button: Color::from_rgb_u32(0xc8daf0),
            font_family: ".SystemUIFont",
        }
    }
}
