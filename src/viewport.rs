/// Typical terminal cell: about half as wide as it is tall.
pub const DEFAULT_CELL_ASPECT: f32 = 0.5;

/// Character-grid viewport. `cell_aspect` is the width / height of one cell,
/// so the camera aspect is corrected for non-square cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: usize,
    pub rows: usize,
    pub cell_aspect: f32,
}

impl Viewport {
    pub fn new(cols: usize, rows: usize, cell_aspect: f32) -> Self {
        Self {
            cols,
            rows,
            cell_aspect,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    /// Visible width / height in physical units. `None` for an empty viewport.
    pub fn aspect(&self) -> Option<f32> {
        if self.is_empty() || !(self.cell_aspect > 0.0) {
            return None;
        }
        Some(self.cols as f32 * self.cell_aspect / self.rows as f32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24, DEFAULT_CELL_ASPECT)
    }
}
