//! Grid cell coordinates.

use std::fmt;

/// A `(row, col)` position on the synthetic road grid.
///
/// Row 0 is the top row; column 0 is the leftmost column.  Cells are plain
/// values: bounds are checked by the grid that owns them, not here.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: u16,
    pub col: u16,
}

impl Cell {
    #[inline]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// L1 distance to `other`.  On an unobstructed 4-connected grid this is
    /// exactly the minimum hop count between the two cells.
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        (self.row as i32 - other.row as i32).unsigned_abs()
            + (self.col as i32 - other.col as i32).unsigned_abs()
    }

    /// Row-major flat index for a grid with `cols` columns.
    #[inline]
    pub fn flat(self, cols: u16) -> usize {
        self.row as usize * cols as usize + self.col as usize
    }

    /// Inverse of [`flat`](Self::flat).
    #[inline]
    pub fn from_flat(index: usize, cols: u16) -> Self {
        let cols = cols as usize;
        Self::new((index / cols) as u16, (index % cols) as u16)
    }

    /// Cell centre in `[0, 1]²` map space: `x = (col + 0.5) / cols`,
    /// `y = (row + 0.5) / rows`.
    #[inline]
    pub fn normalized(self, rows: u16, cols: u16) -> (f64, f64) {
        (
            (self.col as f64 + 0.5) / cols as f64,
            (self.row as f64 + 0.5) / rows as f64,
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
