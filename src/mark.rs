//! Renderable data series.
//!
//! Marks form a closed set: each kind is a variant of [`Mark`] and has one
//! render case. Adding a kind means adding a variant and its render case.

use crate::error::{PlotError, PlotResult};
use crate::geom::Point;
use crate::style::{LineStyle, MarkerSize, MarkerStyle};
use crate::view::{Range, Viewport};

/// A polyline through ordered `x`/`y` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMark {
    x: Vec<f64>,
    y: Vec<f64>,
    style: LineStyle,
}

impl LineMark {
    /// Create a line mark from paired coordinate arrays.
    pub fn new(x: Vec<f64>, y: Vec<f64>, style: LineStyle) -> PlotResult<Self> {
        if x.len() != y.len() {
            return Err(PlotError::LengthMismatch {
                what: "line x and y data",
                left: x.len(),
                right: y.len(),
            });
        }
        Ok(Self { x, y, style })
    }

    /// X samples.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Y samples.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Line styling.
    pub fn style(&self) -> LineStyle {
        self.style
    }

    /// Iterate the samples as data points.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.x.iter().zip(&self.y).map(|(x, y)| Point::new(*x, *y))
    }
}

/// A collection of markers drawn at arbitrary offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCollection {
    offsets: Vec<Point>,
    style: MarkerStyle,
}

impl PointCollection {
    /// Create a point collection.
    ///
    /// Per-point sizes must have one entry per offset.
    pub fn new(offsets: Vec<Point>, style: MarkerStyle) -> PlotResult<Self> {
        if let MarkerSize::PerPoint(sizes) = &style.size {
            if sizes.len() != offsets.len() {
                return Err(PlotError::LengthMismatch {
                    what: "marker offsets and sizes",
                    left: offsets.len(),
                    right: sizes.len(),
                });
            }
        }
        Ok(Self { offsets, style })
    }

    /// Create a point collection from paired coordinate arrays.
    pub fn from_xy(x: &[f64], y: &[f64], style: MarkerStyle) -> PlotResult<Self> {
        if x.len() != y.len() {
            return Err(PlotError::LengthMismatch {
                what: "scatter x and y data",
                left: x.len(),
                right: y.len(),
            });
        }
        let offsets = x.iter().zip(y).map(|(x, y)| Point::new(*x, *y)).collect();
        Self::new(offsets, style)
    }

    /// Marker positions in data space.
    pub fn offsets(&self) -> &[Point] {
        &self.offsets
    }

    /// Marker styling.
    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    /// Radius for every marker, broadcasting a uniform size.
    pub fn radii(&self) -> Vec<f64> {
        match &self.style.size {
            MarkerSize::Uniform(radius) => vec![*radius; self.offsets.len()],
            MarkerSize::PerPoint(radii) => radii.clone(),
        }
    }
}

/// A renderable data series on a plot surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// Connected line.
    Line(LineMark),
    /// Scattered markers.
    Points(PointCollection),
}

impl Mark {
    /// Bounds of the finite samples, if any.
    pub fn bounds(&self) -> Option<Viewport> {
        match self {
            Self::Line(line) => bounds_of(line.points()),
            Self::Points(points) => bounds_of(points.offsets().iter().copied()),
        }
    }
}

fn bounds_of(points: impl Iterator<Item = Point>) -> Option<Viewport> {
    let mut bounds: Option<Viewport> = None;
    for point in points.filter(Point::is_finite) {
        match bounds.as_mut() {
            None => {
                bounds = Some(Viewport::new(
                    Range::new(point.x, point.x),
                    Range::new(point.y, point.y),
                ));
            }
            Some(existing) => {
                existing.x.expand_to_include(point.x);
                existing.y.expand_to_include(point.y);
            }
        }
    }
    bounds
}
