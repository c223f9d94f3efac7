//! Error types shared across the crate.

/// Axis identifier used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisName {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl std::fmt::Display for AxisName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Errors surfaced by figure, surface and render operations.
///
/// Negative hit tests and discarded zoom selections are normal outcomes and
/// never produce an error.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// A view window was non-finite or had no positive span.
    #[error("invalid {axis} view window ({min}, {max})")]
    InvalidViewWindow {
        /// Axis the window belongs to.
        axis: AxisName,
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },

    /// Two arrays that must pair up element-wise have different lengths.
    #[error("{what}: length mismatch ({left} vs {right})")]
    LengthMismatch {
        /// What was being paired.
        what: &'static str,
        /// Length of the first array.
        left: usize,
        /// Length of the second array.
        right: usize,
    },

    /// No surface with this index exists in the figure.
    #[error("unknown plot surface {0}")]
    UnknownSurface(usize),

    /// Subplot grid position outside of the grid.
    #[error("invalid subplot position {index} in a {nrows}x{ncols} grid")]
    InvalidSubplot {
        /// Grid rows.
        nrows: usize,
        /// Grid columns.
        ncols: usize,
        /// 1-based cell index.
        index: usize,
    },

    /// Canvas dimensions must be positive.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvasSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// Configuration could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type PlotResult<T> = Result<T, PlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_axis() {
        let err = PlotError::InvalidViewWindow {
            axis: AxisName::Y,
            min: 1.0,
            max: 1.0,
        };
        assert_eq!(err.to_string(), "invalid y view window (1, 1)");
    }
}
