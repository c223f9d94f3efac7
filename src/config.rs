//! Figure, render and interaction configuration.
//!
//! Every field has a default, so hosts can supply partial JSON documents.

use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Placement of the subplot grid inside the figure, in figure fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubplotParams {
    /// Left edge of the grid.
    pub left: f64,
    /// Right edge of the grid.
    pub right: f64,
    /// Bottom edge of the grid.
    pub bottom: f64,
    /// Top edge of the grid.
    pub top: f64,
    /// Horizontal gap between cells, as a fraction of the cell width.
    pub wspace: f64,
    /// Vertical gap between cells, as a fraction of the cell height.
    pub hspace: f64,
}

impl Default for SubplotParams {
    fn default() -> Self {
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
            wspace: 0.2,
            hspace: 0.2,
        }
    }
}

/// Settings used by the render pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Tick mark length in pixels.
    pub tick_length: f64,
    /// Gap between a tick mark and its label in pixels.
    pub label_offset: f64,
    /// Font size for tick labels and titles in pixels.
    pub font_size: f64,
    /// CSS font family.
    pub font_family: String,
    /// Frame, tick and text color as a CSS string.
    pub frame_color: String,
    /// Frame and tick stroke width in pixels.
    pub frame_width: f64,
    /// Fraction of the data span added on each side when auto-fitting.
    pub margin: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tick_length: 6.0,
            label_offset: 3.0,
            font_size: 12.0,
            font_family: "sans-serif".to_string(),
            frame_color: "black".to_string(),
            frame_width: 1.0,
            margin: 0.05,
        }
    }
}

impl RenderConfig {
    /// CSS font shorthand.
    pub fn font(&self) -> String {
        format!("{}px {}", self.font_size, self.font_family)
    }
}

/// Settings used by the toolbar state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Zoom selections narrower or shorter than this many pixels are discarded.
    /// Values below one pixel act as one pixel.
    pub min_zoom_px: f64,
    /// Decimals shown in the coordinate readout.
    pub readout_precision: usize,
}

/// Smallest zoom selection side honoured, in pixels.
const MIN_ZOOM_THRESHOLD_PX: f64 = 1.0;

impl InteractionConfig {
    /// Selection threshold actually applied, never below one pixel.
    pub fn zoom_threshold(&self) -> f64 {
        if self.min_zoom_px >= MIN_ZOOM_THRESHOLD_PX {
            self.min_zoom_px
        } else {
            MIN_ZOOM_THRESHOLD_PX
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_zoom_px: 5.0,
            readout_precision: 2,
        }
    }
}

/// Top-level figure configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Figure width in inches.
    pub width_in: f64,
    /// Figure height in inches.
    pub height_in: f64,
    /// Pixels per inch.
    pub dpi: f64,
    /// Subplot grid placement.
    pub subplot: SubplotParams,
    /// Render settings.
    pub render: RenderConfig,
    /// Interaction settings.
    pub interaction: InteractionConfig,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: 6.4,
            height_in: 4.8,
            dpi: 100.0,
            subplot: SubplotParams::default(),
            render: RenderConfig::default(),
            interaction: InteractionConfig::default(),
        }
    }
}

impl FigureConfig {
    /// Canvas size in whole pixels.
    pub fn canvas_size(&self) -> PlotResult<(u32, u32)> {
        let width = (self.width_in * self.dpi).round();
        let height = (self.height_in * self.dpi).round();
        if !(width >= 1.0 && height >= 1.0 && width <= u32::MAX as f64 && height <= u32::MAX as f64)
        {
            return Err(PlotError::InvalidCanvasSize {
                width: width.max(0.0).min(u32::MAX as f64) as u32,
                height: height.max(0.0).min(u32::MAX as f64) as u32,
            });
        }
        Ok((width as u32, height as u32))
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        let mut config: Self = serde_json::from_str(input)?;
        let threshold = config.interaction.zoom_threshold();
        if threshold != config.interaction.min_zoom_px {
            tracing::debug!(
                requested = config.interaction.min_zoom_px,
                threshold,
                "clamped zoom threshold"
            );
            config.interaction.min_zoom_px = threshold;
        }
        tracing::debug!(
            width_in = config.width_in,
            height_in = config.height_in,
            dpi = config.dpi,
            "loaded figure config"
        );
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json_pretty(&self) -> PlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_canvas_is_640_by_480() {
        assert_eq!(FigureConfig::default().canvas_size().unwrap(), (640, 480));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            FigureConfig::from_json_str(r#"{ "dpi": 50, "interaction": { "min_zoom_px": 3 } }"#)
                .unwrap();
        assert_eq!(config.dpi, 50.0);
        assert_eq!(config.interaction.min_zoom_px, 3.0);
        assert_eq!(config.interaction.readout_precision, 2);
        assert_eq!(config.render, RenderConfig::default());
        assert_eq!(config.canvas_size().unwrap(), (320, 240));
    }

    #[test]
    fn zoom_threshold_is_at_least_one_pixel() {
        let config =
            FigureConfig::from_json_str(r#"{ "interaction": { "min_zoom_px": 0 } }"#).unwrap();
        assert_eq!(config.interaction.min_zoom_px, 1.0);

        let manual = InteractionConfig {
            min_zoom_px: -3.0,
            ..InteractionConfig::default()
        };
        assert_eq!(manual.zoom_threshold(), 1.0);
        let nan = InteractionConfig {
            min_zoom_px: f64::NAN,
            ..InteractionConfig::default()
        };
        assert_eq!(nan.zoom_threshold(), 1.0);
        assert_eq!(InteractionConfig::default().zoom_threshold(), 5.0);
    }

    #[test]
    fn json_roundtrip() {
        let config = FigureConfig::default();
        let text = config.to_json_pretty().unwrap();
        assert_eq!(FigureConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_empty_canvas() {
        let config = FigureConfig {
            width_in: 0.0,
            ..FigureConfig::default()
        };
        assert!(matches!(
            config.canvas_size(),
            Err(PlotError::InvalidCanvasSize { width: 0, .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            FigureConfig::from_json_str("{ not json"),
            Err(PlotError::Config(_))
        ));
    }
}
