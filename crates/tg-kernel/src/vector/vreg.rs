// Short-vector register model.
//
// Mirrors a vector-length-agnostic ISA: every operation takes an active
// length `vl` and leaves inactive lanes unspecified. Only the first `vl`
// lanes are ever read back.

/// Lanes in one f32 vector register (256-bit VLEN).
pub const VLANES: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct VReg {
    lanes: [f32; VLANES],
    vl: usize,
}

impl VReg {
    /// Broadcasts `v` into the first `vl` lanes.
    #[inline]
    pub fn splat(v: f32, vl: usize) -> Self {
        debug_assert!(vl <= VLANES);
        VReg {
            lanes: [v; VLANES],
            vl,
        }
    }

    /// Strided load: lane `l` reads `buf[base + l * stride]`.
    #[inline]
    pub fn load_strided(buf: &[f32], base: usize, stride: usize, vl: usize) -> Self {
        debug_assert!(vl <= VLANES);
        let mut lanes = [0.0; VLANES];
        for (l, lane) in lanes.iter_mut().take(vl).enumerate() {
            *lane = buf[base + l * stride];
        }
        VReg { lanes, vl }
    }

    /// Strided store of the active lanes.
    #[inline]
    pub fn store_strided(&self, buf: &mut [f32], base: usize, stride: usize) {
        for (l, &v) in self.active().iter().enumerate() {
            buf[base + l * stride] = v;
        }
    }

    /// Fused multiply-accumulate: `self[l] += x[l] * y[l]` with one rounding.
    #[inline]
    pub fn fmacc(&mut self, x: &VReg, y: &VReg) {
        debug_assert!(x.vl >= self.vl && y.vl >= self.vl);
        for l in 0..self.vl {
            self.lanes[l] = x.lanes[l].mul_add(y.lanes[l], self.lanes[l]);
        }
    }

    pub fn vl(&self) -> usize {
        self.vl
    }

    /// The active lanes.
    pub fn active(&self) -> &[f32] {
        &self.lanes[..self.vl]
    }
}
