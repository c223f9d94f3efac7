//! Subplot grid placement.

use crate::config::SubplotParams;
use crate::error::{PlotError, PlotResult};
use crate::transform::DisplayBox;

/// A surface's slot in a subplot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    /// Grid rows.
    pub nrows: usize,
    /// Grid columns.
    pub ncols: usize,
    /// 1-based cell index, counted row by row from the top-left.
    pub index: usize,
}

impl GridSlot {
    /// Validate and create a grid slot.
    pub fn new(nrows: usize, ncols: usize, index: usize) -> PlotResult<Self> {
        if nrows == 0 || ncols == 0 || index == 0 || index > nrows * ncols {
            return Err(PlotError::InvalidSubplot {
                nrows,
                ncols,
                index,
            });
        }
        Ok(Self {
            nrows,
            ncols,
            index,
        })
    }

    /// Pixel box of this slot on a canvas of the given size.
    pub fn display_box(&self, params: &SubplotParams, width: f64, height: f64) -> DisplayBox {
        let row = (self.index - 1) / self.ncols;
        let col = (self.index - 1) % self.ncols;
        let (left, cell_w) = cell_extent(params.left, params.right, params.wspace, self.ncols, col);
        // Rows count down from the top of the grid.
        let (bottom, cell_h) = cell_extent(
            params.bottom,
            params.top,
            params.hspace,
            self.nrows,
            self.nrows - 1 - row,
        );
        DisplayBox {
            x0: left * width,
            y0: bottom * height,
            width: cell_w * width,
            height: cell_h * height,
        }
    }
}

/// Start and size of cell `i` when `n` cells with relative gap `space` share
/// the span `start..end`.
fn cell_extent(start: f64, end: f64, space: f64, n: usize, i: usize) -> (f64, f64) {
    let n = n as f64;
    let cell = (end - start) / (n + space * (n - 1.0));
    let gap = space * cell;
    (start + i as f64 * (cell + gap), cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell_uses_subplot_params() {
        let slot = GridSlot::new(1, 1, 1).unwrap();
        let frame = slot.display_box(&SubplotParams::default(), 640.0, 480.0);
        assert!((frame.x0 - 80.0).abs() < 1e-9);
        assert!((frame.y0 - 52.8).abs() < 1e-9);
        assert!((frame.width - 496.0).abs() < 1e-9);
        assert!((frame.height - 369.6).abs() < 1e-9);
    }

    #[test]
    fn side_by_side_cells_do_not_overlap() {
        let params = SubplotParams::default();
        let left = GridSlot::new(1, 2, 1).unwrap().display_box(&params, 640.0, 480.0);
        let right = GridSlot::new(1, 2, 2).unwrap().display_box(&params, 640.0, 480.0);
        assert!(left.x0 + left.width < right.x0);
        assert!((right.x0 + right.width - 0.9 * 640.0).abs() < 1e-9);
        assert_eq!(left.y0, right.y0);
    }

    #[test]
    fn first_row_is_on_top() {
        let params = SubplotParams::default();
        let top = GridSlot::new(2, 1, 1).unwrap().display_box(&params, 640.0, 480.0);
        let bottom = GridSlot::new(2, 1, 2).unwrap().display_box(&params, 640.0, 480.0);
        assert!(top.y0 > bottom.y0 + bottom.height);
    }

    #[test]
    fn rejects_out_of_grid_index() {
        assert!(GridSlot::new(1, 2, 3).is_err());
        assert!(GridSlot::new(1, 2, 0).is_err());
        assert!(GridSlot::new(0, 2, 1).is_err());
    }
}
