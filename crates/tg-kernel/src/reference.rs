use crate::error::Result;
use crate::view::{gemm_dims, MatMut, MatRef};

/// Triple-loop `C += A · B`, the correctness oracle for the tiled paths.
///
/// Each `C[i, j]` is updated term by term in strictly increasing `p`, which
/// fixes the rounding baseline the tiled backends are compared against.
///
/// # Errors
/// Returns an error if the matrix shapes do not line up.
pub fn reference_strided(a: MatRef<'_>, b: MatRef<'_>, c: &mut MatMut<'_>) -> Result<()> {
    let (n, m, k) = gemm_dims(&a, &b, c)?;
    let (lda, ldb, ldc) = (a.stride(), b.stride(), c.stride());
    let (a, b) = (a.as_slice(), b.as_slice());
    let c = c.as_mut_slice();
    for i in 0..n {
        for j in 0..k {
            for p in 0..m {
                c[i * ldc + j] += a[i * lda + p] * b[p * ldb + j];
            }
        }
    }
    Ok(())
}

/// Dense form of [`reference_strided`]: A is `n x m`, B is `m x k`, C is
/// `n x k`, all row-major with stride equal to their width.
///
/// # Errors
/// Returns an error if any buffer is shorter than its matrix.
pub fn reference(a: &[f32], b: &[f32], c: &mut [f32], n: usize, m: usize, k: usize) -> Result<()> {
    let a = MatRef::labeled("A", a, n, m, m)?;
    let b = MatRef::labeled("B", b, m, k, k)?;
    let mut c = MatMut::labeled("C", c, n, k, k)?;
    reference_strided(a, b, &mut c)
}

/// Relative tolerance between a tiled result and the oracle for a
/// contraction of length `m`: `f32::EPSILON * m * 2`.
///
/// Tiled backends may sum in a different order and use fused
/// multiply-adds, so the bound grows with the number of summed terms.
pub fn tolerance(m: usize) -> f32 {
    f32::EPSILON * m.max(1) as f32 * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GemmError;

    #[test]
    fn test_reference_2x2() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![1.0, 2.0, 3.0, 4.0];
        let mut c = vec![0.0; 4];
        reference(&a, &b, &mut c, 2, 2, 2).unwrap();
        assert_eq!(c, vec![7.0, 10.0, 15.0, 22.0]);
    }

    #[test]
    fn test_reference_accumulates() {
        // [1,2] @ [3;4] = [11], on top of C0 = 100
        let mut c = vec![100.0];
        reference(&[1.0, 2.0], &[3.0, 4.0], &mut c, 1, 2, 1).unwrap();
        assert_eq!(c, vec![111.0]);
    }

    #[test]
    fn test_reference_non_square() {
        // [2x3] @ [3x1]
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = vec![1.0, 0.0, -1.0];
        let mut c = vec![0.0; 2];
        reference(&a, &b, &mut c, 2, 3, 1).unwrap();
        assert_eq!(c, vec![-2.0, -2.0]);
    }

    #[test]
    fn test_reference_rejects_short_buffers() {
        let mut c = vec![0.0; 4];
        let err = reference(&[1.0; 3], &[1.0; 4], &mut c, 2, 2, 2).unwrap_err();
        assert_eq!(
            err,
            GemmError::BufferTooSmall {
                operand: "A",
                required: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_tolerance_scales_with_depth() {
        assert_eq!(tolerance(1), f32::EPSILON * 2.0);
        assert_eq!(tolerance(8), f32::EPSILON * 16.0);
        assert_eq!(tolerance(0), tolerance(1));
    }
}
