use crate::view::{TileView, MAX_TILE};

/// Scratch buffer holding one B sub-tile in contraction-major layout.
///
/// Staging a `depth x cols` row-major block of B stores it as `cols` rows of
/// `depth` contiguous values, so row `j` of the staged tile is column `j` of
/// the source block. The buffer is reused across depth chunks; only the
/// active `cols x depth` region is ever exposed, so values left over from a
/// previous, larger chunk cannot be observed.
#[derive(Clone)]
pub struct StagedTile {
    data: [f32; MAX_TILE * MAX_TILE],
    rows: usize,
    depth: usize,
}

impl StagedTile {
    pub fn new() -> Self {
        StagedTile {
            data: [0.0; MAX_TILE * MAX_TILE],
            rows: 0,
            depth: 0,
        }
    }

    /// Transposes the block of `b` described by `view` into the buffer.
    ///
    /// Exactly `view.rows * view.cols` cells are written. Afterwards the
    /// staged tile has `view.cols` rows of depth `view.rows`.
    pub fn stage(&mut self, b: &[f32], view: TileView) {
        debug_assert!(view.rows <= MAX_TILE && view.cols <= MAX_TILE);
        debug_assert!(view.end() <= b.len());
        for p in 0..view.rows {
            let src = &b[view.row_range(p)];
            for (j, &v) in src.iter().enumerate() {
                self.data[j * MAX_TILE + p] = v;
            }
        }
        self.rows = view.cols;
        self.depth = view.rows;
    }

    /// Number of staged rows (output columns of the tile).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Contraction depth of the staged chunk.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Column `j` of the source block, `depth` values long.
    #[inline]
    pub fn row(&self, j: usize) -> &[f32] {
        debug_assert!(j < self.rows);
        let start = j * MAX_TILE;
        &self.data[start..start + self.depth]
    }
}

impl Default for StagedTile {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StagedTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<&[f32]> = (0..self.rows).map(|j| self.row(j)).collect();
        f.debug_struct("StagedTile")
            .field("rows", &self.rows)
            .field("depth", &self.depth)
            .field("data", &rows)
            .finish()
    }
}
