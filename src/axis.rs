//! Axis configuration, tick location, and label formatting.

use std::sync::Arc;

use crate::view::Range;

/// Formatter for axis tick labels and coordinate readouts.
#[derive(Clone, Default)]
pub enum AxisFormatter {
    /// Default numeric formatter.
    #[default]
    Default,
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl AxisFormatter {
    /// Format a tick value placed on a grid with spacing `step`.
    ///
    /// The default formatter shows just enough decimals to tell neighbouring
    /// ticks apart.
    pub fn format_tick(&self, value: f64, step: f64) -> String {
        match self {
            Self::Default => {
                let decimals = decimals_for_step(step);
                // Avoid "-0" for ticks that land on zero through rounding.
                let value = if value.abs() < step.abs() * 1e-9 { 0.0 } else { value };
                format!("{value:.decimals$}")
            }
            Self::Custom(formatter) => formatter(value),
        }
    }

    /// Format a free value with the given number of decimals.
    pub fn format(&self, value: f64, precision: usize) -> String {
        match self {
            Self::Default => format!("{value:.precision$}"),
            Self::Custom(formatter) => formatter(value),
        }
    }
}

impl std::fmt::Debug for AxisFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "AxisFormatter::Default"),
            Self::Custom(_) => write!(f, "AxisFormatter::Custom(..)"),
        }
    }
}

fn decimals_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let mut decimals = 0;
    let mut scaled = step;
    while decimals < 12 && (scaled - scaled.round()).abs() > 1e-9 * scaled.max(1.0) {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

/// Tick positions paired with their label strings.
///
/// Values and labels pair up by index. The renderer treats a length mismatch
/// as a precondition violation and reports it instead of truncating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSet {
    /// Tick positions in data units.
    pub values: Vec<f64>,
    /// Label drawn next to each tick.
    pub labels: Vec<String>,
}

/// How tick positions are chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum TickSpec {
    /// Evenly spaced "nice" values inside the view window.
    Auto {
        /// Upper bound on the number of ticks.
        max_ticks: usize,
    },
    /// Fixed positions and labels; ones outside the view are skipped at draw time.
    Fixed(TickSet),
}

impl Default for TickSpec {
    fn default() -> Self {
        Self::Auto { max_ticks: 9 }
    }
}

/// Compute evenly spaced tick values on 1, 2, 2.5 or 5 × 10^k steps.
///
/// Returns the values (all inside `range`) and the chosen step.
pub fn nice_ticks(range: Range, max_ticks: usize) -> (Vec<f64>, f64) {
    if !range.is_valid() || max_ticks == 0 {
        return (Vec::new(), 0.0);
    }
    let raw_step = range.span() / max_ticks.max(1) as f64;
    let magnitude = 10_f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|factor| factor * magnitude)
        .find(|step| range.span() / step <= max_ticks as f64)
        .unwrap_or(10.0 * magnitude);

    let first = (range.min / step).ceil() as i64;
    let last = (range.max / step).floor() as i64;
    let values = (first..=last)
        .map(|i| i as f64 * step)
        .filter(|value| range.contains(*value))
        .collect();
    (values, step)
}

/// Axis configuration for one side of a plot surface.
#[derive(Debug, Clone, Default)]
pub struct AxisConfig {
    title: Option<String>,
    formatter: AxisFormatter,
    ticks: TickSpec,
}

impl AxisConfig {
    /// Create an axis with automatic ticks and no title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the axis formatter.
    pub fn with_formatter(mut self, formatter: AxisFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Set the tick specification.
    pub fn with_ticks(mut self, ticks: TickSpec) -> Self {
        self.ticks = ticks;
        self
    }

    /// Access the axis title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replace the axis title.
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Access the formatter.
    pub fn formatter(&self) -> &AxisFormatter {
        &self.formatter
    }

    /// Access the tick specification.
    pub fn ticks(&self) -> &TickSpec {
        &self.ticks
    }

    /// Replace the tick specification.
    pub fn set_ticks(&mut self, ticks: TickSpec) {
        self.ticks = ticks;
    }

    /// Tick positions and labels for the given view window.
    pub fn tick_set(&self, view: Range) -> TickSet {
        match &self.ticks {
            TickSpec::Auto { max_ticks } => {
                let (values, step) = nice_ticks(view, *max_ticks);
                let labels = values
                    .iter()
                    .map(|value| self.formatter.format_tick(*value, step))
                    .collect();
                TickSet { values, labels }
            }
            TickSpec::Fixed(ticks) => ticks.clone(),
        }
    }
}
