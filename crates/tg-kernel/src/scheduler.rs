use log::{debug, trace};

use crate::backend::TileOp;
use crate::error::{GemmError, Result};
use crate::kernel::tile_multiply;
use crate::staging::StagedTile;
use crate::view::{MatMut, MatRef, TileView};

/// Which of the four output-tile shapes a grid cell has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeClass {
    /// `T x T`
    Full,
    /// `T x tail_k`, last tile of a full row band.
    TailCols,
    /// `tail_n x T`, in the final row band.
    TailRows,
    /// `tail_n x tail_k`, the bottom-right corner.
    TailBoth,
}

/// One output tile produced by [`TileGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTile {
    pub view: TileView,
    pub class: ShapeClass,
}

/// Partition of an `n x k` output matrix into disjoint tiles of edge `T`.
///
/// Row bands start at `0, T, 2T, ...`; within a band, full `T`-wide tiles
/// come first and the narrower column tail (if any) last. The row tail band
/// (if any) comes after all full bands. Every element is covered by exactly
/// one tile and no empty tile is ever produced, so an `n == 0` or `k == 0`
/// grid is empty.
///
/// Tiles are disjoint, which makes the grid a safe unit of work for callers
/// that split C across threads.
#[derive(Debug, Clone)]
pub struct TileGrid {
    n: usize,
    k: usize,
    tile: usize,
    stride: usize,
    row: usize,
    col: usize,
}

impl TileGrid {
    /// Create the grid for an `n x k` matrix with leading dimension `stride`.
    ///
    /// # Panics
    /// Panics if `tile == 0`.
    pub fn new(n: usize, k: usize, tile: usize, stride: usize) -> Self {
        assert!(tile > 0, "tile size must be non-zero");
        let row = if k == 0 { n } else { 0 };
        TileGrid {
            n,
            k,
            tile,
            stride,
            row,
            col: 0,
        }
    }

    /// Total number of tiles: `ceil(n / T) * ceil(k / T)`.
    pub fn tile_count(&self) -> usize {
        self.n.div_ceil(self.tile) * self.k.div_ceil(self.tile)
    }

    /// Rows covered by full tiles (`floor(n / T) * T`).
    pub fn full_rows(&self) -> usize {
        (self.n / self.tile) * self.tile
    }

    /// Columns covered by full tiles (`floor(k / T) * T`).
    pub fn full_cols(&self) -> usize {
        (self.k / self.tile) * self.tile
    }

    fn remaining(&self) -> usize {
        if self.row >= self.n {
            return 0;
        }
        let bands_left = (self.n - self.row).div_ceil(self.tile);
        let per_band = self.k.div_ceil(self.tile);
        bands_left * per_band - self.col / self.tile
    }
}

impl Iterator for TileGrid {
    type Item = GridTile;

    fn next(&mut self) -> Option<GridTile> {
        if self.row >= self.n {
            return None;
        }

        let rows = self.tile.min(self.n - self.row);
        let cols = self.tile.min(self.k - self.col);
        let class = match (rows == self.tile, cols == self.tile) {
            (true, true) => ShapeClass::Full,
            (true, false) => ShapeClass::TailCols,
            (false, true) => ShapeClass::TailRows,
            (false, false) => ShapeClass::TailBoth,
        };
        let view = TileView::new(self.row, self.col, rows, cols, self.stride);

        self.col += cols;
        if self.col >= self.k {
            self.col = 0;
            self.row += rows;
        }

        Some(GridTile { view, class })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.remaining();
        (left, Some(left))
    }
}

impl ExactSizeIterator for TileGrid {}

/// Rejects tile sizes the backend cannot hold.
pub fn check_tile<Op: TileOp>(tile: usize) -> Result<()> {
    if tile == 0 || tile > Op::MAX_TILE {
        return Err(GemmError::InvalidTileSize {
            tile,
            max: Op::MAX_TILE,
            backend: Op::NAME,
        });
    }
    Ok(())
}

/// Tiled `C += A · B` with tile edge `tile` on backend `Op`.
///
/// A is `n x m`, B is `m x k`, C is `n x k`; all three may be strided
/// sub-views. C is partitioned by [`TileGrid`] and each output tile is
/// handed to [`tile_multiply`], which walks the full contraction dimension.
///
/// If any of n, m, k is zero the call returns without touching C.
///
/// # Errors
/// Returns an error if the tile size is out of range for `Op` or the
/// matrix shapes do not line up. Validation finishes before C is written.
pub fn tiled_multiply<Op: TileOp>(
    a: MatRef<'_>,
    b: MatRef<'_>,
    c: &mut MatMut<'_>,
    tile: usize,
) -> Result<()> {
    check_tile::<Op>(tile)?;
    let (n, m, k) = crate::view::gemm_dims(&a, &b, c)?;

    if n == 0 || m == 0 || k == 0 {
        debug!("tiled_multiply: empty problem n={} m={} k={}, C unchanged", n, m, k);
        return Ok(());
    }

    debug!(
        "tiled_multiply: n={} m={} k={} tile={} backend={}",
        n,
        m,
        k,
        tile,
        Op::NAME
    );

    let mut scratch = StagedTile::new();
    let stride = c.stride();
    let out = c.as_mut_slice();
    for GridTile { view, class } in TileGrid::new(n, k, tile, stride) {
        trace!(
            "tile ({}, {}) {}x{} {:?}",
            view.row,
            view.col,
            view.rows,
            view.cols,
            class
        );
        tile_multiply::<Op>(&a, &b, out, view, tile, &mut scratch);
    }
    Ok(())
}
