use std::fmt;
use std::ops::Range;

use crate::error::{GemmError, Result};

/// Largest tile edge the engine supports. Accumulators and scratch buffers
/// are sized for this, so no backend may advertise a larger `MAX_TILE`.
pub const MAX_TILE: usize = 16;

/// Number of elements a row-major `rows x cols` region with the given stride
/// spans, from its first element to one past its last.
///
/// An empty region spans nothing regardless of stride.
pub fn required_len(operand: &'static str, rows: usize, cols: usize, stride: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Ok(0);
    }
    (rows - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(cols))
        .ok_or(GemmError::SizeOverflow {
            operand,
            rows,
            cols,
        })
}

fn check_layout(
    operand: &'static str,
    len: usize,
    rows: usize,
    cols: usize,
    stride: usize,
) -> Result<()> {
    if stride < cols {
        return Err(GemmError::InvalidStride {
            operand,
            stride,
            cols,
        });
    }
    let required = required_len(operand, rows, cols, stride)?;
    if len < required {
        return Err(GemmError::BufferTooSmall {
            operand,
            required,
            actual: len,
        });
    }
    Ok(())
}

/// Checks that `a (n x m) · b (m x k)` fits `c (n x k)` and returns (n, m, k).
pub fn gemm_dims(a: &MatRef<'_>, b: &MatRef<'_>, c: &MatMut<'_>) -> Result<(usize, usize, usize)> {
    if a.cols() != b.rows() || c.rows() != a.rows() || c.cols() != b.cols() {
        return Err(GemmError::DimensionMismatch {
            a_rows: a.rows(),
            a_cols: a.cols(),
            b_rows: b.rows(),
            b_cols: b.cols(),
            c_rows: c.rows(),
            c_cols: c.cols(),
        });
    }
    Ok((a.rows(), a.cols(), b.cols()))
}

/// A rectangular window into a row-major matrix.
///
/// The view carries its origin as (row, col) coordinates of the enclosing
/// matrix together with that matrix's stride, so it can be turned into flat
/// buffer indices without holding the buffer itself. It is a plain value:
/// the scheduler builds one per output tile and the kernel derives the
/// per-chunk A and B views from it.
///
/// Index arithmetic is checked with `debug_assert!` only; release builds
/// trust the scheduler's partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileView {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
    pub stride: usize,
}

impl TileView {
    pub fn new(row: usize, col: usize, rows: usize, cols: usize, stride: usize) -> Self {
        debug_assert!(
            rows == 0 || cols == 0 || col + cols <= stride,
            "tile columns {}..{} exceed stride {}",
            col,
            col + cols,
            stride
        );
        TileView {
            row,
            col,
            rows,
            cols,
            stride,
        }
    }

    /// Flat index of the view's top-left element.
    pub fn offset(&self) -> usize {
        self.row * self.stride + self.col
    }

    /// Flat index of element (r, c) relative to the view's origin.
    #[inline]
    pub fn index(&self, r: usize, c: usize) -> usize {
        debug_assert!(
            r < self.rows && c < self.cols,
            "index ({}, {}) outside {}x{} tile",
            r,
            c,
            self.rows,
            self.cols
        );
        self.offset() + r * self.stride + c
    }

    /// Flat index range covering row `r` of the view.
    #[inline]
    pub fn row_range(&self, r: usize) -> Range<usize> {
        let start = self.index(r, 0);
        start..start + self.cols
    }

    /// One past the last flat index the view touches; 0 for an empty view.
    pub fn end(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.offset() + (self.rows - 1) * self.stride + self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn numel(&self) -> usize {
        self.rows * self.cols
    }
}

/// Shared, read-only view of a caller-owned row-major matrix (A or B).
#[derive(Debug, Clone, Copy)]
pub struct MatRef<'a> {
    data: &'a [f32],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a> MatRef<'a> {
    /// Dense matrix whose stride equals its column count.
    pub fn new(data: &'a [f32], rows: usize, cols: usize) -> Result<Self> {
        Self::with_stride(data, rows, cols, cols)
    }

    /// Matrix with an explicit leading dimension, e.g. a sub-block of a
    /// larger buffer.
    ///
    /// # Errors
    /// Returns an error if `stride < cols` or `data` is shorter than the
    /// region the matrix spans.
    pub fn with_stride(data: &'a [f32], rows: usize, cols: usize, stride: usize) -> Result<Self> {
        Self::labeled("matrix", data, rows, cols, stride)
    }

    pub(crate) fn labeled(
        operand: &'static str,
        data: &'a [f32],
        rows: usize,
        cols: usize,
        stride: usize,
    ) -> Result<Self> {
        check_layout(operand, data.len(), rows, cols, stride)?;
        Ok(MatRef {
            data,
            rows,
            cols,
            stride,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Element (r, c).
    ///
    /// # Panics
    /// Panics if (r, c) lies outside the matrix.
    pub fn get(&self, r: usize, c: usize) -> f32 {
        assert!(r < self.rows && c < self.cols, "({}, {}) out of bounds", r, c);
        self.data[r * self.stride + c]
    }

    /// View of the `rows x cols` block starting at (row, col).
    pub fn view(&self, row: usize, col: usize, rows: usize, cols: usize) -> TileView {
        debug_assert!(row + rows <= self.rows && col + cols <= self.cols);
        TileView::new(row, col, rows, cols, self.stride)
    }
}

impl fmt::Display for MatRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let row = &self.data[r * self.stride..r * self.stride + self.cols];
            for (c, v) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:.3}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Exclusive view of the caller-owned output matrix C.
#[derive(Debug)]
pub struct MatMut<'a> {
    data: &'a mut [f32],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a> MatMut<'a> {
    pub fn new(data: &'a mut [f32], rows: usize, cols: usize) -> Result<Self> {
        Self::with_stride(data, rows, cols, cols)
    }

    /// # Errors
    /// Returns an error if `stride < cols` or `data` is shorter than the
    /// region the matrix spans.
    pub fn with_stride(
        data: &'a mut [f32],
        rows: usize,
        cols: usize,
        stride: usize,
    ) -> Result<Self> {
        Self::labeled("matrix", data, rows, cols, stride)
    }

    pub(crate) fn labeled(
        operand: &'static str,
        data: &'a mut [f32],
        rows: usize,
        cols: usize,
        stride: usize,
    ) -> Result<Self> {
        check_layout(operand, data.len(), rows, cols, stride)?;
        Ok(MatMut {
            data,
            rows,
            cols,
            stride,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_slice(&self) -> &[f32] {
        self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        self.data
    }

    /// Read-only reborrow, e.g. for printing.
    pub fn as_mat_ref(&self) -> MatRef<'_> {
        MatRef {
            data: self.data,
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
        }
    }

    pub fn view(&self, row: usize, col: usize, rows: usize, cols: usize) -> TileView {
        debug_assert!(row + rows <= self.rows && col + cols <= self.cols);
        TileView::new(row, col, rows, cols, self.stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_view_index() {
        // 3x2 block at (1, 2) of a matrix with stride 5
        let v = TileView::new(1, 2, 3, 2, 5);
        assert_eq!(v.offset(), 7);
        assert_eq!(v.index(0, 0), 7);
        assert_eq!(v.index(0, 1), 8);
        assert_eq!(v.index(2, 1), 18);
        assert_eq!(v.row_range(1), 12..14);
        assert_eq!(v.end(), 19);
        assert_eq!(v.numel(), 6);
    }

    #[test]
    fn test_empty_view() {
        let v = TileView::new(0, 0, 0, 4, 4);
        assert!(v.is_empty());
        assert_eq!(v.end(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_tile_view_out_of_bounds_debug() {
        let v = TileView::new(0, 0, 2, 2, 4);
        let _ = v.index(2, 0);
    }

    #[test]
    fn test_required_len() {
        assert_eq!(required_len("A", 3, 2, 5).unwrap(), 12);
        assert_eq!(required_len("A", 0, 7, 7).unwrap(), 0);
        assert_eq!(required_len("A", 1, 4, 100).unwrap(), 4);
        assert!(matches!(
            required_len("A", usize::MAX, 2, 2),
            Err(GemmError::SizeOverflow { operand: "A", .. })
        ));
    }

    #[test]
    fn test_matref_with_stride() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        // 3x2 sub-matrix with leading dimension 4, last row needs only 2 cells
        let m = MatRef::with_stride(&data[..10], 3, 2, 4).unwrap();
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(1, 1), 5.0);
        assert_eq!(m.get(2, 0), 8.0);
    }

    #[test]
    fn test_matref_too_small() {
        let data = vec![0.0f32; 5];
        let err = MatRef::new(&data, 2, 3).unwrap_err();
        assert_eq!(
            err,
            GemmError::BufferTooSmall {
                operand: "matrix",
                required: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_matref_bad_stride() {
        let data = vec![0.0f32; 16];
        assert!(matches!(
            MatRef::with_stride(&data, 2, 4, 3),
            Err(GemmError::InvalidStride { stride: 3, cols: 4, .. })
        ));
    }

    #[test]
    fn test_matmut_write_through() {
        let mut data = vec![0.0f32; 6];
        {
            let mut m = MatMut::new(&mut data, 2, 3).unwrap();
            let v = m.view(1, 1, 1, 2);
            let range = v.row_range(0);
            m.as_mut_slice()[range].copy_from_slice(&[4.0, 5.0]);
        }
        assert_eq!(data, vec![0.0, 0.0, 0.0, 0.0, 4.0, 5.0]);
    }

    #[test]
    fn test_display() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let m = MatRef::new(&data, 2, 2).unwrap();
        assert_eq!(m.to_string(), "1.000 2.000\n3.000 4.000\n");
    }
}
