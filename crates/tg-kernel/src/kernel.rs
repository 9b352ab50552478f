use crate::backend::TileOp;
use crate::staging::StagedTile;
use crate::view::{MatRef, TileView};

/// Computes one output tile: `C[out] += A[out.rows, :] · B[:, out.cols]`.
///
/// The accumulator is seeded from the current contents of C, so repeated
/// calls accumulate rather than overwrite. The contraction dimension
/// (`a.cols()`) is walked in chunks of `tile`; the last chunk may be
/// shorter and is handed to the backend at its real depth. Each chunk of B
/// is staged contraction-major in `scratch` before the multiply-accumulate.
/// C is written exactly once, after the last chunk.
///
/// - `c`: buffer of the output matrix; `out` indexes into it
/// - `out`: the output tile, `out.rows, out.cols <= tile`
/// - `tile`: tile edge, at most `Op::MAX_TILE`
pub fn tile_multiply<Op: TileOp>(
    a: &MatRef<'_>,
    b: &MatRef<'_>,
    c: &mut [f32],
    out: TileView,
    tile: usize,
    scratch: &mut StagedTile,
) {
    debug_assert!(tile >= 1 && tile <= Op::MAX_TILE);
    debug_assert!(out.rows >= 1 && out.rows <= tile);
    debug_assert!(out.cols >= 1 && out.cols <= tile);
    debug_assert!(out.end() <= c.len());

    let depth = a.cols();
    let mut acc = Op::load(c, out);

    for p0 in (0..depth).step_by(tile) {
        let chunk = tile.min(depth - p0);
        let a_view = a.view(out.row, p0, out.rows, chunk);
        let b_view = b.view(p0, out.col, chunk, out.cols);
        scratch.stage(b.as_slice(), b_view);
        Op::mac(&mut acc, a.as_slice(), a_view, scratch);
    }

    Op::store(&acc, c, out);
}
