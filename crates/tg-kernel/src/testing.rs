// Shared helpers for the unit tests in this crate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::reference::tolerance;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `len` values uniform in [0, 100).
pub fn random_matrix(rng: &mut StdRng, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.gen_range(0.0f32..100.0)).collect()
}

/// `len` small integers, so that sums stay exact in f32.
pub fn integer_matrix(rng: &mut StdRng, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.gen_range(0..8) as f32).collect()
}

/// Elementwise comparison within [`tolerance`] for contraction length `m`.
pub fn assert_close(expected: &[f32], actual: &[f32], m: usize, context: &str) {
    assert_eq!(expected.len(), actual.len(), "{}: length mismatch", context);
    let tol = tolerance(m);
    for (idx, (&e, &a)) in expected.iter().zip(actual).enumerate() {
        assert!(
            approx::relative_eq!(e, a, epsilon = tol, max_relative = tol),
            "{}: element {} differs: expected {}, got {} (tol {})",
            context,
            idx,
            e,
            a,
            tol
        );
    }
}
