use std::marker::PhantomData;

use log::debug;

use crate::backend::{DefaultTiles, TileOp};
use crate::error::Result;
use crate::scheduler::{check_tile, tiled_multiply};
use crate::view::{MatMut, MatRef};

/// Tile edge of the target hardware primitive.
pub const DEFAULT_TILE: usize = 4;

/// Settings for a [`Gemm`] runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemmConfig {
    /// Edge length `T` of the output tiles and of each depth chunk.
    pub tile_size: usize,
}

impl GemmConfig {
    pub fn new() -> Self {
        GemmConfig {
            tile_size: DEFAULT_TILE,
        }
    }

    /// Set the tile edge. Returns self for builder-style usage.
    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size;
        self
    }
}

impl Default for GemmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated GEMM runner bound to tile backend `Op`.
///
/// The backend is a type parameter, so the choice is made at compile time
/// and the kernel's inner loop is monomorphized for it.
#[derive(Debug, Clone)]
pub struct Gemm<Op: TileOp = DefaultTiles> {
    config: GemmConfig,
    _op: PhantomData<Op>,
}

impl<Op: TileOp> Gemm<Op> {
    /// # Errors
    /// Returns an error if `config.tile_size` is zero or larger than the
    /// backend's `MAX_TILE`.
    pub fn new(config: GemmConfig) -> Result<Self> {
        check_tile::<Op>(config.tile_size)?;
        Ok(Gemm {
            config,
            _op: PhantomData,
        })
    }

    pub fn config(&self) -> &GemmConfig {
        &self.config
    }

    /// Returns the name of the backend this runner uses.
    pub fn backend_name(&self) -> &'static str {
        Op::NAME
    }

    /// `C += A · B` on (possibly strided) matrix views.
    pub fn run(&self, a: MatRef<'_>, b: MatRef<'_>, c: &mut MatMut<'_>) -> Result<()> {
        tiled_multiply::<Op>(a, b, c, self.config.tile_size)
    }

    /// `C += A · B` on dense row-major buffers.
    ///
    /// - `a`: `n x m`, stride `m`
    /// - `b`: `m x k`, stride `k`
    /// - `c`: `n x k`, stride `k`
    ///
    /// # Errors
    /// Returns an error if any buffer holds fewer elements than its matrix.
    /// Extra trailing elements are ignored.
    pub fn multiply(
        &self,
        a: &[f32],
        b: &[f32],
        c: &mut [f32],
        n: usize,
        m: usize,
        k: usize,
    ) -> Result<()> {
        debug!("gemm[{}]: multiply n={} m={} k={}", Op::NAME, n, m, k);
        let a = MatRef::labeled("A", a, n, m, m)?;
        let b = MatRef::labeled("B", b, m, k, k)?;
        let mut c = MatMut::labeled("C", c, n, k, k)?;
        self.run(a, b, &mut c)
    }
}

/// `C += A · B` with backend `Op` and the default tile size.
///
/// A is `n x m`, B is `m x k`, C is `n x k`, all dense row-major. Zero
/// dimensions are a no-op.
///
/// # Errors
/// Returns an error if a buffer is too small for its matrix.
pub fn multiply<Op: TileOp>(
    a: &[f32],
    b: &[f32],
    c: &mut [f32],
    n: usize,
    m: usize,
    k: usize,
) -> Result<()> {
    Gemm::<Op>::new(GemmConfig::default())?.multiply(a, b, c, n, m, k)
}
