use crate::backend::TileOp;
use crate::staging::StagedTile;
use crate::view::{TileView, MAX_TILE};

/// Pure-Rust scalar tile backend.
///
/// Implements the tile primitives with straightforward nested loops. It is
/// the portable fallback and needs no special hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarTiles;

/// Accumulator for [`ScalarTiles`]: a row-major block with leading
/// dimension `MAX_TILE`.
#[derive(Debug, Clone)]
pub struct ScalarAcc {
    data: [f32; MAX_TILE * MAX_TILE],
    rows: usize,
    cols: usize,
}

impl ScalarAcc {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * MAX_TILE + j]
    }
}

impl TileOp for ScalarTiles {
    const NAME: &'static str = "scalar";
    const MAX_TILE: usize = crate::view::MAX_TILE;

    type Acc = ScalarAcc;

    fn load(c: &[f32], view: TileView) -> ScalarAcc {
        let mut acc = ScalarAcc {
            data: [0.0; MAX_TILE * MAX_TILE],
            rows: view.rows,
            cols: view.cols,
        };
        for i in 0..view.rows {
            acc.data[i * MAX_TILE..i * MAX_TILE + view.cols].copy_from_slice(&c[view.row_range(i)]);
        }
        acc
    }

    fn mac(acc: &mut ScalarAcc, a: &[f32], a_view: TileView, b: &StagedTile) {
        debug_assert_eq!(acc.rows, a_view.rows);
        debug_assert_eq!(acc.cols, b.rows());
        debug_assert_eq!(a_view.cols, b.depth());

        for i in 0..acc.rows {
            let a_row = &a[a_view.row_range(i)];
            for j in 0..acc.cols {
                let b_col = b.row(j);
                let cell = &mut acc.data[i * MAX_TILE + j];
                for (x, y) in a_row.iter().zip(b_col) {
                    *cell += x * y;
                }
            }
        }
    }

    fn store(acc: &ScalarAcc, c: &mut [f32], view: TileView) {
        debug_assert_eq!((acc.rows, acc.cols), (view.rows, view.cols));
        for i in 0..view.rows {
            c[view.row_range(i)].copy_from_slice(&acc.data[i * MAX_TILE..i * MAX_TILE + view.cols]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store_roundtrip_strided() {
        // 3x5 matrix, tile is the 2x3 block at (1, 1)
        let src: Vec<f32> = (0..15).map(|v| v as f32).collect();
        let view = TileView::new(1, 1, 2, 3, 5);
        let acc = ScalarTiles::load(&src, view);
        assert_eq!(acc.get(0, 0), 6.0);
        assert_eq!(acc.get(1, 2), 13.0);

        let mut dst = vec![-1.0f32; 15];
        ScalarTiles::store(&acc, &mut dst, view);
        assert_eq!(dst[6..9], [6.0, 7.0, 8.0]);
        assert_eq!(dst[11..14], [11.0, 12.0, 13.0]);
        // Cells outside the tile are untouched.
        assert_eq!(dst[5], -1.0);
        assert_eq!(dst[9], -1.0);
        assert_eq!(dst[14], -1.0);
    }

    #[test]
    fn test_mac_accumulates_into_loaded_c() {
        // A = [1 2; 3 4], B = [1 2; 3 4], C0 = [1 1; 1 1]
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![1.0, 2.0, 3.0, 4.0];
        let c0 = vec![1.0; 4];
        let view = TileView::new(0, 0, 2, 2, 2);

        let mut staged = StagedTile::new();
        staged.stage(&b, view);
        let mut acc = ScalarTiles::load(&c0, view);
        ScalarTiles::mac(&mut acc, &a, view, &staged);

        let mut c = vec![0.0; 4];
        ScalarTiles::store(&acc, &mut c, view);
        assert_eq!(c, vec![8.0, 11.0, 16.0, 23.0]);
    }
}
