//! Matrix-register tile backend.
//!
//! Models an accelerator with whole-tile registers: C and A tiles are loaded
//! row-major straight from memory, B must arrive transposed (one register row
//! per output column), and a single `fmmacc` folds a depth chunk into the
//! accumulator register. Register size caps the tile edge at [`MREG_DIM`].

pub mod mreg;

use crate::backend::TileOp;
use crate::staging::StagedTile;
use crate::view::TileView;

pub use mreg::{MReg, MREG_DIM};

#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixTiles;

impl TileOp for MatrixTiles {
    const NAME: &'static str = "matrix";
    const MAX_TILE: usize = MREG_DIM;

    type Acc = MReg;

    fn load(c: &[f32], view: TileView) -> MReg {
        MReg::load(c, view)
    }

    fn mac(acc: &mut MReg, a: &[f32], a_view: TileView, b: &StagedTile) {
        let a_tile = MReg::load(a, a_view);
        let b_tile = MReg::load_staged(b);
        acc.fmmacc(&a_tile, &b_tile);
    }

    fn store(acc: &MReg, c: &mut [f32], view: TileView) {
        acc.store(c, view);
    }
}
