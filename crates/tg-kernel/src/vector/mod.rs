//! Short-vector tile backend.
//!
//! An output tile is held as one vector register per output column, with
//! the tile's rows spread across lanes. For every step `p` of a depth chunk
//! the backend loads column `p` of the A tile with a strided load, then for
//! each output column broadcasts the matching B value into all lanes and
//! issues a fused multiply-accumulate:
//!
//! ```text
//! for p in 0..depth:
//!     a_col = vlse(A[0..rows, p], stride = lda)
//!     for j in 0..cols:
//!         acc[j] = vfmacc(acc[j], splat(Bt[j][p]), a_col)
//! ```

pub mod vreg;

use crate::backend::TileOp;
use crate::staging::StagedTile;
use crate::view::TileView;

pub use vreg::{VReg, VLANES};

/// Vector-register tile backend. Tile edges are capped at [`VLANES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorTiles;

/// Accumulator for [`VectorTiles`]: `cols` column registers of `rows` lanes.
#[derive(Debug, Clone)]
pub struct VectorAcc {
    cols: [VReg; VLANES],
    ncols: usize,
}

impl VectorAcc {
    /// Column `j` of the accumulator.
    pub fn column(&self, j: usize) -> &VReg {
        debug_assert!(j < self.ncols);
        &self.cols[j]
    }
}

impl TileOp for VectorTiles {
    const NAME: &'static str = "vector";
    const MAX_TILE: usize = VLANES;

    type Acc = VectorAcc;

    fn load(c: &[f32], view: TileView) -> VectorAcc {
        let mut cols = [VReg::splat(0.0, view.rows); VLANES];
        for (j, col) in cols.iter_mut().take(view.cols).enumerate() {
            *col = VReg::load_strided(c, view.index(0, j), view.stride, view.rows);
        }
        VectorAcc {
            cols,
            ncols: view.cols,
        }
    }

    fn mac(acc: &mut VectorAcc, a: &[f32], a_view: TileView, b: &StagedTile) {
        debug_assert_eq!(acc.ncols, b.rows());
        debug_assert_eq!(a_view.cols, b.depth());

        let vl = a_view.rows;
        for p in 0..a_view.cols {
            let a_col = VReg::load_strided(a, a_view.index(0, p), a_view.stride, vl);
            for j in 0..acc.ncols {
                let b_lane = VReg::splat(b.row(j)[p], vl);
                acc.cols[j].fmacc(&b_lane, &a_col);
            }
        }
    }

    fn store(acc: &VectorAcc, c: &mut [f32], view: TileView) {
        debug_assert_eq!(acc.ncols, view.cols);
        for j in 0..view.cols {
            acc.cols[j].store_strided(c, view.index(0, j), view.stride);
        }
    }
}
