use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, TextRun, Window,
    font, point, px, quad,
};

use crate::canvas::{DrawCommand, TextAlign, TextBaseline};
use crate::figure::Figure;
use crate::geom::{DevicePoint, DeviceRect};
use crate::style::Color;

use super::config::FigureViewConfig;

/// Paint every committed layer of `figure` inside `bounds`, overlay last.
pub(crate) fn paint_figure(
    figure: &Figure,
    bounds: Bounds<Pixels>,
    config: &FigureViewConfig,
    window: &mut Window,
    cx: &mut App,
) {
    for layer in figure.layers().iter() {
        let mut replay = Replay::new(bounds, config.font_family);
        for command in layer.visible_commands() {
            replay.apply(command, window, cx);
        }
    }
}

#[derive(Debug, Clone)]
struct PaintState {
    stroke: Color,
    fill: Color,
    line_width: f64,
    font_size: f64,
    align: TextAlign,
    baseline: TextBaseline,
    offset: DevicePoint,
    rotation: f64,
    clip: Bounds<Pixels>,
}

#[derive(Debug, Clone, Copy)]
enum PathOp {
    Move(DevicePoint),
    Line(DevicePoint),
    Rect(DeviceRect),
}

struct Replay {
    origin: gpui::Point<Pixels>,
    font_family: &'static str,
    state: PaintState,
    saved: Vec<PaintState>,
    path: Vec<PathOp>,
}

impl Replay {
    fn new(bounds: Bounds<Pixels>, font_family: &'static str) -> Self {
        Self {
            origin: bounds.origin,
            font_family,
            state: PaintState {
                stroke: Color::BLACK,
                fill: Color::BLACK,
                line_width: 1.0,
                font_size: 10.0,
                align: TextAlign::default(),
                baseline: TextBaseline::default(),
                offset: DevicePoint::new(0.0, 0.0),
                rotation: 0.0,
                clip: bounds,
            },
            saved: Vec::new(),
            path: Vec::new(),
        }
    }

    fn apply(&mut self, command: &DrawCommand, window: &mut Window, cx: &mut App) {
        match command {
            DrawCommand::Clear => {}
            DrawCommand::Save => self.saved.push(self.state.clone()),
            DrawCommand::Restore => {
                if let Some(state) = self.saved.pop() {
                    self.state = state;
                }
            }
            DrawCommand::SetStrokeStyle { style } => {
                self.state.stroke = Color::from_css(style).unwrap_or(Color::BLACK);
            }
            DrawCommand::SetFillStyle { style } => {
                self.state.fill = Color::from_css(style).unwrap_or(Color::BLACK);
            }
            DrawCommand::SetLineWidth { width } => self.state.line_width = *width,
            DrawCommand::SetFont { font } => {
                if let Some(size) = font_size(font) {
                    self.state.font_size = size;
                }
            }
            DrawCommand::SetTextAlign { align } => self.state.align = *align,
            DrawCommand::SetTextBaseline { baseline } => self.state.baseline = *baseline,
            DrawCommand::BeginPath => self.path.clear(),
            DrawCommand::MoveTo { x, y } => self.path.push(PathOp::Move(DevicePoint::new(*x, *y))),
            DrawCommand::LineTo { x, y } => self.path.push(PathOp::Line(DevicePoint::new(*x, *y))),
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
            } => self
                .path
                .push(PathOp::Rect(DeviceRect::new(*x, *y, *width, *height))),
            DrawCommand::Stroke => self.stroke_path(window),
            DrawCommand::Clip => self.clip_to_path(),
            DrawCommand::StrokeRect {
                x,
                y,
                width,
                height,
            } => self.stroke_rect(DeviceRect::new(*x, *y, *width, *height), window),
            DrawCommand::FillText { text, x, y } => {
                self.fill_text(text, DevicePoint::new(*x, *y), window, cx)
            }
            DrawCommand::Translate { x, y } => {
                self.state.offset.x += x;
                self.state.offset.y += y;
            }
            DrawCommand::Rotate { angle } => self.state.rotation += angle,
            DrawCommand::StrokePolyline { points } => self.stroke_polyline(points, window),
            DrawCommand::FillCircles { centers, radii } => {
                self.circles(centers, radii, true, window)
            }
            DrawCommand::StrokeCircles { centers, radii } => {
                self.circles(centers, radii, false, window)
            }
        }
    }

    fn screen(&self, p: DevicePoint) -> gpui::Point<Pixels> {
        point(
            self.origin.x + px((p.x + self.state.offset.x) as f32),
            self.origin.y + px((p.y + self.state.offset.y) as f32),
        )
    }

    fn screen_rect(&self, rect: DeviceRect) -> Bounds<Pixels> {
        Bounds::from_corners(self.screen(rect.min), self.screen(rect.max))
    }

    fn with_clip(&self, window: &mut Window, f: impl FnOnce(&mut Window)) {
        let mask = ContentMask {
            bounds: self.state.clip,
        };
        window.with_content_mask(Some(mask), f);
    }

    fn stroke_path(&mut self, window: &mut Window) {
        if self.path.is_empty() {
            return;
        }
        let mut builder = PathBuilder::stroke(px(self.state.line_width.max(0.5) as f32));
        for op in &self.path {
            match *op {
                PathOp::Move(p) => builder.move_to(self.screen(p)),
                PathOp::Line(p) => builder.line_to(self.screen(p)),
                PathOp::Rect(rect) => {
                    builder.move_to(self.screen(rect.min));
                    builder.line_to(self.screen(DevicePoint::new(rect.max.x, rect.min.y)));
                    builder.line_to(self.screen(rect.max));
                    builder.line_to(self.screen(DevicePoint::new(rect.min.x, rect.max.y)));
                    builder.line_to(self.screen(rect.min));
                }
            }
        }
        let color = to_rgba(self.state.stroke);
        if let Ok(path) = builder.build() {
            self.with_clip(window, |window| window.paint_path(path, color));
        }
    }

    /// Only rectangular clip paths are supported; other path ops are ignored.
    fn clip_to_path(&mut self) {
        let mut clip = self.state.clip;
        for op in &self.path {
            if let PathOp::Rect(rect) = *op {
                clip = clip.intersect(&self.screen_rect(rect));
            }
        }
        self.state.clip = clip;
    }

    fn stroke_rect(&self, rect: DeviceRect, window: &mut Window) {
        let quad = quad(
            self.screen_rect(rect),
            Corners::all(px(0.0)),
            to_rgba(Color::new(0.0, 0.0, 0.0, 0.0)),
            Edges::all(px(self.state.line_width as f32)),
            to_rgba(self.state.stroke),
            BorderStyle::default(),
        );
        self.with_clip(window, |window| window.paint_quad(quad));
    }

    fn stroke_polyline(&self, points: &[DevicePoint], window: &mut Window) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut builder = PathBuilder::stroke(px(self.state.line_width.max(0.5) as f32));
        builder.move_to(self.screen(*first));
        for p in rest {
            builder.line_to(self.screen(*p));
        }
        let color = to_rgba(self.state.stroke);
        if let Ok(path) = builder.build() {
            self.with_clip(window, |window| window.paint_path(path, color));
        }
    }

    fn circles(&self, centers: &[DevicePoint], radii: &[f64], filled: bool, window: &mut Window) {
        let (background, border, edge) = if filled {
            (self.state.fill, self.state.fill, 0.0)
        } else {
            (
                Color::new(0.0, 0.0, 0.0, 0.0),
                self.state.stroke,
                self.state.line_width as f32,
            )
        };
        self.with_clip(window, |window| {
            for (center, radius) in centers.iter().zip(radii) {
                let offset = DevicePoint::new(*radius, *radius);
                let bounds = Bounds::from_corners(
                    self.screen(DevicePoint::new(center.x - offset.x, center.y - offset.y)),
                    self.screen(DevicePoint::new(center.x + offset.x, center.y + offset.y)),
                );
                window.paint_quad(quad(
                    bounds,
                    Corners::all(px(*radius as f32)),
                    to_rgba(background),
                    Edges::all(px(edge)),
                    to_rgba(border),
                    BorderStyle::default(),
                ));
            }
        });
    }

    fn fill_text(&self, text: &str, at: DevicePoint, window: &mut Window, cx: &mut App) {
        if text.is_empty() {
            return;
        }
        let run = TextRun {
            len: text.len(),
            font: font(self.font_family),
            color: to_hsla(self.state.fill),
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let shaped = window.text_system().shape_line(
            text.to_string().into(),
            px(self.state.font_size as f32),
            &[run],
            None,
        );
        // Rotated text is laid out horizontally, ending at the anchor but never
        // left of the canvas edge.
        let (align, baseline) = if self.state.rotation != 0.0 {
            (TextAlign::Right, TextBaseline::Middle)
        } else {
            (self.state.align, self.state.baseline)
        };
        let width = f64::from(f32::from(shaped.width));
        let ascent = f64::from(f32::from(shaped.ascent));
        let height = ascent + f64::from(f32::from(shaped.descent));
        let dx = match align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -width * 0.5,
            TextAlign::Right => -width,
        };
        let dy = match baseline {
            TextBaseline::Top => 0.0,
            TextBaseline::Middle => -height * 0.5,
            TextBaseline::Alphabetic => -ascent,
            TextBaseline::Bottom => -height,
        };
        let left = if self.state.rotation != 0.0 {
            rotated_fallback_left(at.x, self.state.offset.x, width)
        } else {
            at.x + dx
        };
        let origin = self.screen(DevicePoint::new(left, at.y + dy));
        let line_height = shaped.ascent + shaped.descent;
        self.with_clip(window, |window| {
            let _ = shaped.paint(origin, line_height, window, cx);
        });
    }
}

/// Left edge, in the translated frame, of rotated text drawn horizontally.
///
/// The text ends at `anchor_x` unless that would push its start past the
/// canvas' left edge.
fn rotated_fallback_left(anchor_x: f64, offset_x: f64, width: f64) -> f64 {
    (anchor_x - width).max(-offset_x)
}

/// Pixel size from a CSS font shorthand such as `12px sans-serif`.
fn font_size(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|token| token.strip_suffix("px"))
        .and_then(|size| size.parse().ok())
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}
