//! Colors and mark styling.

/// RGBA color.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from a packed `0xRRGGBB` value.
    pub const fn from_rgb_u32(rgb: u32) -> Self {
        Self::new(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        )
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let rgb = u32::from_str_radix(&expanded, 16).ok()?;
        Some(Self::from_rgb_u32(rgb))
    }

    /// CSS color string understood by canvas style setters.
    ///
    /// Opaque colors render as `#rrggbb`, translucent ones as `rgba(..)`.
    pub fn to_css(&self) -> String {
        let [r, g, b] = [self.r, self.g, self.b].map(channel_to_u8);
        if self.a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("rgba({r}, {g}, {b}, {:.3})", self.a.clamp(0.0, 1.0))
        }
    }

    /// Parse a CSS color as emitted by [`Color::to_css`], plus `black` and
    /// `white`.
    pub fn from_css(css: &str) -> Option<Self> {
        let css = css.trim();
        match css {
            "black" => return Some(Self::BLACK),
            "white" => return Some(Self::WHITE),
            _ => {}
        }
        if css.starts_with('#') {
            return Self::from_hex(css);
        }
        let inner = css
            .strip_prefix("rgba(")
            .or_else(|| css.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<f32> = inner
            .split(',')
            .map(|part| part.trim().parse().ok())
            .collect::<Option<_>>()?;
        let (rgb, a) = match parts.as_slice() {
            [r, g, b] => ([*r, *g, *b], 1.0),
            [r, g, b, a] => ([*r, *g, *b], *a),
            _ => return None,
        };
        let [r, g, b] = rgb.map(|channel| channel / 255.0);
        Some(Self::new(r, g, b, a))
    }
}

fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Ten-color categorical cycle applied to marks without an explicit color.
pub const COLOR_CYCLE: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

/// Color at position `index` of the default cycle, wrapping around.
pub fn cycle_color(index: usize) -> Color {
    Color::from_rgb_u32(COLOR_CYCLE[index % COLOR_CYCLE.len()])
}

/// Line stroke styling.
///
/// The width is expressed in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.5,
        }
    }
}

/// Marker size for point collections.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerSize {
    /// One radius, in pixels, shared by every point.
    Uniform(f64),
    /// One radius per point.
    PerPoint(Vec<f64>),
}

impl Default for MarkerSize {
    fn default() -> Self {
        Self::Uniform(3.0)
    }
}

/// Fill, edge and size of a point collection.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    /// Fill color.
    pub fill: Color,
    /// Optional edge color; no outline is drawn when absent.
    pub edge: Option<Color>,
    /// Marker radius in pixels.
    pub size: MarkerSize,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            edge: None,
            size: MarkerSize::default(),
        }
    }
}
