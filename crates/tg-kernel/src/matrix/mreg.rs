use std::fmt;

use crate::staging::StagedTile;
use crate::view::TileView;

/// Edge of one f32 matrix register (4x4 elements, 512 bits).
pub const MREG_DIM: usize = 4;

/// Matrix register model.
///
/// Holds up to `MREG_DIM x MREG_DIM` values with a configured active shape.
/// Cells outside the active shape are never read.
#[derive(Debug, Clone, Copy)]
pub struct MReg {
    cells: [[f32; MREG_DIM]; MREG_DIM],
    rows: usize,
    cols: usize,
}

impl MReg {
    /// Tile load of the `view.rows x view.cols` block at `view`.
    #[inline]
    pub fn load(buf: &[f32], view: TileView) -> Self {
        debug_assert!(view.rows <= MREG_DIM && view.cols <= MREG_DIM);
        let mut cells = [[0.0; MREG_DIM]; MREG_DIM];
        for (i, row) in cells.iter_mut().take(view.rows).enumerate() {
            row[..view.cols].copy_from_slice(&buf[view.row_range(i)]);
        }
        MReg {
            cells,
            rows: view.rows,
            cols: view.cols,
        }
    }

    /// Loads a staged B tile: row `j` holds column `j` of the B block.
    #[inline]
    pub fn load_staged(staged: &StagedTile) -> Self {
        debug_assert!(staged.rows() <= MREG_DIM && staged.depth() <= MREG_DIM);
        let mut cells = [[0.0; MREG_DIM]; MREG_DIM];
        for (j, row) in cells.iter_mut().take(staged.rows()).enumerate() {
            row[..staged.depth()].copy_from_slice(staged.row(j));
        }
        MReg {
            cells,
            rows: staged.rows(),
            cols: staged.depth(),
        }
    }

    /// Tile store of the active shape to the block at `view`.
    #[inline]
    pub fn store(&self, buf: &mut [f32], view: TileView) {
        debug_assert_eq!((self.rows, self.cols), (view.rows, view.cols));
        for i in 0..self.rows {
            buf[view.row_range(i)].copy_from_slice(&self.cells[i][..self.cols]);
        }
    }

    /// Matrix multiply-accumulate against a transposed right operand:
    /// `self[i][j] += dot(a[i][..depth], bt[j][..depth])`.
    ///
    /// Each dot product is reduced in full before it is added to the
    /// accumulator, like the hardware's per-cell reduction tree.
    #[inline]
    pub fn fmmacc(&mut self, a: &MReg, bt: &MReg) {
        debug_assert_eq!(a.rows, self.rows);
        debug_assert_eq!(bt.rows, self.cols);
        debug_assert_eq!(a.cols, bt.cols);
        let depth = a.cols;
        for i in 0..self.rows {
            for j in 0..self.cols {
                let dot = (0..depth).fold(0.0f32, |s, p| a.cells[i][p].mul_add(bt.cells[j][p], s));
                self.cells[i][j] += dot;
            }
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        debug_assert!(i < self.rows && j < self.cols);
        self.cells[i][j]
    }
}

impl fmt::Display for MReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter().take(self.rows) {
            for (j, v) in row[..self.cols].iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:.2}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
