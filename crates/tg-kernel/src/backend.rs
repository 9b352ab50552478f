use std::fmt;
use std::str::FromStr;

use crate::error::GemmError;
use crate::staging::StagedTile;
use crate::view::TileView;

/// Tile compute capability: the load/store/multiply-accumulate primitives a
/// backend provides for one output tile of at most `MAX_TILE x MAX_TILE`.
///
/// The tile kernel is generic over this trait and never touches backend
/// registers directly. Backends are selected at compile time, so every call
/// below is statically dispatched and inlined into the kernel's depth loop.
///
/// Shapes handed to a backend always satisfy `rows, cols, depth <= MAX_TILE`
/// and are never zero.
pub trait TileOp {
    /// Returns the name of this backend (e.g., "scalar", "matrix").
    const NAME: &'static str;

    /// Largest tile edge the backend's registers can hold.
    const MAX_TILE: usize;

    /// Working sum for one output tile.
    type Acc;

    /// Loads the `view.rows x view.cols` region of C into a new accumulator.
    fn load(c: &[f32], view: TileView) -> Self::Acc;

    /// Accumulate one depth chunk: `acc += A_chunk · B_chunk`.
    ///
    /// - `a_view`: `rows x depth` block of A (row-major, read in place)
    /// - `b`: the matching `depth x cols` block of B, staged contraction-major
    ///   (`b.rows() == cols`, `b.depth() == depth`)
    fn mac(acc: &mut Self::Acc, a: &[f32], a_view: TileView, b: &StagedTile);

    /// Writes the accumulator back to the `view.rows x view.cols` region of C.
    fn store(acc: &Self::Acc, c: &mut [f32], view: TileView);
}

/// Identifies one of the built-in tile backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Portable nested loops.
    Scalar,
    /// Short-vector registers with strided loads and lane broadcast.
    Vector,
    /// Matrix registers with native tile multiply-accumulate.
    Matrix,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [BackendKind::Scalar, BackendKind::Vector, BackendKind::Matrix];

    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Scalar => crate::scalar::ScalarTiles::NAME,
            BackendKind::Vector => crate::vector::VectorTiles::NAME,
            BackendKind::Matrix => crate::matrix::MatrixTiles::NAME,
        }
    }

    pub fn max_tile(&self) -> usize {
        match self {
            BackendKind::Scalar => crate::scalar::ScalarTiles::MAX_TILE,
            BackendKind::Vector => crate::vector::VectorTiles::MAX_TILE,
            BackendKind::Matrix => crate::matrix::MatrixTiles::MAX_TILE,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BackendKind {
    type Err = GemmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GemmError::UnknownBackend(s.to_string()))
    }
}

/// Backend used by the crate-level `multiply` and by `Gemm` when no backend
/// is named. Chosen by cargo feature: `matrix-tiles`, then `vector-tiles`,
/// otherwise scalar.
#[cfg(feature = "matrix-tiles")]
pub type DefaultTiles = crate::matrix::MatrixTiles;

#[cfg(all(feature = "vector-tiles", not(feature = "matrix-tiles")))]
pub type DefaultTiles = crate::vector::VectorTiles;

#[cfg(not(any(feature = "vector-tiles", feature = "matrix-tiles")))]
pub type DefaultTiles = crate::scalar::ScalarTiles;
