//! Render pipeline: turns a plot surface into draw calls on its layer.
//!
//! Drawing order per surface: marks clipped to the surface rectangle, then
//! the frame, then ticks and tick labels, then axis titles.

use std::f64::consts::FRAC_PI_2;

use crate::axis::TickSet;
use crate::canvas::{CanvasLayer, TextAlign, TextBaseline};
use crate::config::RenderConfig;
use crate::error::{PlotError, PlotResult};
use crate::geom::{DevicePoint, DeviceRect, Point};
use crate::mark::{LineMark, Mark, PointCollection};
use crate::surface::PlotSurface;
use crate::transform::Transform;

/// Normalized anchor of the X axis title: centered below the surface.
const X_TITLE_ANCHOR: Point = Point { x: 0.5, y: 0.0 };
/// Normalized anchor of the Y axis title: centered left of the surface.
const Y_TITLE_ANCHOR: Point = Point { x: 0.0, y: 0.5 };
/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_FACTOR: f64 = 0.6;

/// Draw one surface onto its layer.
///
/// The caller clears the layer and opens the hold scope.
pub fn draw_surface(
    surface: &PlotSurface,
    layer: &mut CanvasLayer,
    config: &RenderConfig,
) -> PlotResult<()> {
    let transform = surface.transform();
    let frame = transform.device_rect();

    layer.save();
    layer.begin_path();
    layer.rect(frame);
    layer.clip();
    let marks = draw_marks(surface.marks(), &transform, layer);
    layer.restore();
    marks?;

    draw_frame(layer, frame, config);
    let y_label_width = draw_ticks(surface, &transform, layer, config)?;
    draw_titles(surface, &transform, layer, config, y_label_width);
    Ok(())
}

fn draw_marks(marks: &[Mark], transform: &Transform, layer: &mut CanvasLayer) -> PlotResult<()> {
    for mark in marks {
        match mark {
            Mark::Line(line) => draw_line(line, transform, layer),
            Mark::Points(points) => draw_points(points, transform, layer)?,
        }
    }
    Ok(())
}

fn draw_line(line: &LineMark, transform: &Transform, layer: &mut CanvasLayer) {
    if line.x().is_empty() {
        return;
    }
    let style = line.style();
    layer.set_stroke_style(style.color.to_css());
    layer.set_line_width(style.width);

    // Non-finite samples break the line into separate runs.
    let mut run: Vec<Point> = Vec::new();
    for point in line.points() {
        if point.is_finite() {
            run.push(point);
        } else if !run.is_empty() {
            layer.stroke_polyline(transform.to_device_batch(&run));
            run.clear();
        }
    }
    if !run.is_empty() {
        layer.stroke_polyline(transform.to_device_batch(&run));
    }
}

fn draw_points(
    points: &PointCollection,
    transform: &Transform,
    layer: &mut CanvasLayer,
) -> PlotResult<()> {
    let (offsets, radii): (Vec<Point>, Vec<f64>) = points
        .offsets()
        .iter()
        .copied()
        .zip(points.radii())
        .filter(|(point, radius)| point.is_finite() && radius.is_finite())
        .unzip();
    if offsets.is_empty() {
        return Ok(());
    }
    let centers = transform.to_device_batch(&offsets);
    let style = points.style();

    layer.set_fill_style(style.fill.to_css());
    layer.fill_circles(centers.clone(), radii.clone())?;
    if let Some(edge) = style.edge {
        layer.set_stroke_style(edge.to_css());
        layer.set_line_width(1.0);
        layer.stroke_circles(centers, radii)?;
    }
    Ok(())
}

fn draw_frame(layer: &mut CanvasLayer, frame: DeviceRect, config: &RenderConfig) {
    layer.set_stroke_style(config.frame_color.clone());
    layer.set_line_width(config.frame_width);
    layer.stroke_rect(frame);
}

/// Draw ticks and labels on the bottom and left edges.
///
/// Returns the estimated width of the widest Y label, used to place the Y
/// title clear of the labels.
fn draw_ticks(
    surface: &PlotSurface,
    transform: &Transform,
    layer: &mut CanvasLayer,
    config: &RenderConfig,
) -> PlotResult<f64> {
    let view = transform.viewport();
    let x_ticks = checked_ticks(surface.x_ticks(), "x tick values and labels")?;
    let y_ticks = checked_ticks(surface.y_ticks(), "y tick values and labels")?;
    let tick = config.tick_length;
    let offset = config.label_offset;

    layer.set_font(config.font());
    layer.set_fill_style(config.frame_color.clone());
    layer.set_stroke_style(config.frame_color.clone());
    layer.set_line_width(config.frame_width);

    layer.set_text_align(TextAlign::Center);
    layer.set_text_baseline(TextBaseline::Top);
    for (value, label) in x_ticks.values.iter().zip(&x_ticks.labels) {
        if !view.x.contains(*value) {
            continue;
        }
        let anchor = transform.to_device(Point::new(*value, view.y.min));
        stroke_segment(layer, anchor, DevicePoint::new(anchor.x, anchor.y + tick));
        layer.fill_text(label.clone(), anchor.x, anchor.y + tick + offset);
    }

    let mut widest = 0.0_f64;
    layer.set_text_align(TextAlign::Right);
    layer.set_text_baseline(TextBaseline::Middle);
    for (value, label) in y_ticks.values.iter().zip(&y_ticks.labels) {
        if !view.y.contains(*value) {
            continue;
        }
        let anchor = transform.to_device(Point::new(view.x.min, *value));
        stroke_segment(layer, anchor, DevicePoint::new(anchor.x - tick, anchor.y));
        layer.fill_text(label.clone(), anchor.x - tick - offset, anchor.y);
        widest = widest.max(estimate_text_width(label, config.font_size));
    }
    Ok(widest)
}

fn draw_titles(
    surface: &PlotSurface,
    transform: &Transform,
    layer: &mut CanvasLayer,
    config: &RenderConfig,
    y_label_width: f64,
) {
    let gap = config.tick_length + config.label_offset;

    if let Some(title) = surface.x_axis().title() {
        let anchor = transform.normalized_to_device(X_TITLE_ANCHOR);
        layer.set_text_align(TextAlign::Center);
        layer.set_text_baseline(TextBaseline::Top);
        layer.fill_text(
            title,
            anchor.x,
            anchor.y + gap + config.font_size + config.label_offset,
        );
    }

    if let Some(title) = surface.y_axis().title() {
        let anchor = transform.normalized_to_device(Y_TITLE_ANCHOR);
        layer.save();
        layer.translate(anchor.x - gap - y_label_width - config.label_offset, anchor.y);
        layer.rotate(-FRAC_PI_2);
        layer.set_text_align(TextAlign::Center);
        layer.set_text_baseline(TextBaseline::Bottom);
        layer.fill_text(title, 0.0, 0.0);
        layer.restore();
    }
}

fn checked_ticks(ticks: TickSet, what: &'static str) -> PlotResult<TickSet> {
    if ticks.values.len() != ticks.labels.len() {
        return Err(PlotError::LengthMismatch {
            what,
            left: ticks.values.len(),
            right: ticks.labels.len(),
        });
    }
    Ok(ticks)
}

fn stroke_segment(layer: &mut CanvasLayer, from: DevicePoint, to: DevicePoint) {
    layer.begin_path();
    layer.move_to(from.x, from.y);
    layer.line_to(to.x, to.y);
    layer.stroke();
}

fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_WIDTH_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::TickSpec;
    use crate::canvas::DrawCommand;
    use crate::figure::Figure;
    use crate::style::{Color, MarkerSize, MarkerStyle};

    fn drawn(figure: &Figure) -> Vec<DrawCommand> {
        let id = figure.surfaces()[0].id();
        figure
            .layers()
            .surface(id)
            .expect("surface layer")
            .visible_commands()
            .to_vec()
    }

    #[test]
    fn line_is_one_clipped_polyline() {
        let (mut figure, ids) = Figure::subplots(1, 1, Default::default()).unwrap();
        let x: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|x| x.sin()).collect();
        figure.surface_mut(ids[0]).unwrap().plot(x, y).unwrap();
        figure.draw().unwrap();

        let commands = drawn(&figure);
        let clip = commands.iter().position(|c| *c == DrawCommand::Clip).unwrap();
        let polyline = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::StrokePolyline { points } if points.len() == 100))
            .unwrap();
        let restore = commands.iter().position(|c| *c == DrawCommand::Restore).unwrap();
        let frame = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::StrokeRect { .. }))
            .unwrap();
        assert!(clip < polyline && polyline < restore && restore < frame);
    }

    #[test]
    fn nan_splits_line() {
        let (mut figure, ids) = Figure::subplots(1, 1, Default::default()).unwrap();
        figure
            .surface_mut(ids[0])
            .unwrap()
            .plot(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 1.0, f64::NAN, 1.0, 0.0])
            .unwrap();
        figure.draw().unwrap();
        let runs = drawn(&figure)
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePolyline { .. }))
            .count();
        assert_eq!(runs, 2);
    }

    #[test]
    fn scatter_broadcasts_radius_and_strokes_edges() {
        let (mut figure, ids) = Figure::subplots(1, 1, Default::default()).unwrap();
        let style = MarkerStyle {
            fill: Color::from_rgb_u32(0xff0000),
            edge: Some(Color::BLACK),
            size: MarkerSize::Uniform(4.0),
        };
        figure
            .surface_mut(ids[0])
            .unwrap()
            .scatter_styled(&[0.0, 1.0, 2.0], &[2.0, 1.0, 0.0], style)
            .unwrap();
        figure.draw().unwrap();
        let commands = drawn(&figure);
        assert!(commands.contains(&DrawCommand::SetFillStyle {
            style: "#ff0000".into()
        }));
        let fill = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillCircles { radii, .. } => Some(radii.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(fill, vec![4.0; 3]);
        assert!(
            commands
                .iter()
                .any(|c| matches!(c, DrawCommand::StrokeCircles { .. }))
        );
    }

    #[test]
    fn ticks_outside_view_are_skipped() {
        let (mut figure, ids) = Figure::subplots(1, 1, Default::default()).unwrap();
        let surface = figure.surface_mut(ids[0]).unwrap();
        surface.x_axis_mut().set_ticks(TickSpec::Fixed(TickSet {
            values: vec![-10.0, 0.5, 10.0],
            labels: vec!["far left".into(), "mid".into(), "far right".into()],
        }));
        surface.set_xlim(0.0, 1.0).unwrap();
        figure.draw().unwrap();
        let labels: Vec<String> = drawn(&figure)
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert!(labels.contains(&"mid".to_string()));
        assert!(!labels.iter().any(|label| label.starts_with("far")));
    }

    #[test]
    fn x_tick_labels_sit_below_the_frame() {
        let (mut figure, ids) = Figure::subplots(1, 1, Default::default()).unwrap();
        figure.draw().unwrap();
        let bottom = figure.surface(ids[0]).unwrap().device_rect().max.y;
        let below = drawn(&figure).iter().any(|c| {
            matches!(c, DrawCommand::FillText { text, y, .. } if text == "0.0" && *y > bottom)
        });
        assert!(below);
    }

    #[test]
    fn mismatched_tick_labels_are_reported() {
        let (mut figure, ids) = Figure::subplots(1, 1, Default::default()).unwrap();
        figure
            .surface_mut(ids[0])
            .unwrap()
            .y_axis_mut()
            .set_ticks(TickSpec::Fixed(TickSet {
                values: vec![0.1, 0.2],
                labels: vec!["a".into()],
            }));
        assert!(matches!(
            figure.draw(),
            Err(PlotError::LengthMismatch { left: 2, right: 1, .. })
        ));
    }

    #[test]
    fn y_title_is_rotated() {
        let (mut figure, ids) = Figure::subplots(1, 1, Default::default()).unwrap();
        let surface = figure.surface_mut(ids[0]).unwrap();
        surface.set_xlabel("time");
        surface.set_ylabel("value");
        figure.draw().unwrap();
        let commands = drawn(&figure);
        let rotate = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Rotate { angle } if (*angle + FRAC_PI_2).abs() < 1e-12))
            .unwrap();
        let title = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::FillText { text, .. } if text == "value"))
            .unwrap();
        assert!(rotate < title);
        assert!(
            commands
                .iter()
                .any(|c| matches!(c, DrawCommand::FillText { text, .. } if text == "time"))
        );
    }
}
