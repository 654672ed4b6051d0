//! Karatsuba multiplication and squaring.
//!
//! Operands are split at half length; the three half-size products are
//! computed recursively, with the scratch space for each recursion depth
//! taken from a `KaratsubaArena`. The arena is sized once for a given
//! maximum operand length and can then be reused across calls, so that no
//! allocation happens on the hot path.
//!
//! Schoolbook multiplication is used when the operands are short, or when
//! their lengths are too unbalanced for the split to pay off. The exact
//! thresholds only matter for performance.

use super::uli;
use crate::Vec;

/// Below this operand length (in limbs), products use the schoolbook
/// method.
pub const KARATSUBA_MUL_THRESHOLD: usize = 24;

/// Below this operand length (in limbs), squarings use the schoolbook
/// method.
pub const KARATSUBA_SQR_THRESHOLD: usize = 32;

/// The shorter operand must be at least `NUM/DEN` of the longer one for
/// the Karatsuba split to be used. This is the numerator.
pub const KARATSUBA_RELATIVE_NUM: usize = 4;

/// Denominator of the relative balance threshold (see
/// `KARATSUBA_RELATIVE_NUM`).
pub const KARATSUBA_RELATIVE_DEN: usize = 5;

// Scratch space for one recursion depth: the two half-sums, and the
// middle product.
#[derive(Clone, Debug)]
struct Level {
    xs: Vec<u32>,
    ys: Vec<u32>,
    z1: Vec<u32>,
}

/// Per-depth scratch buffers for Karatsuba products.
#[derive(Clone, Debug, Default)]
pub struct KaratsubaArena {
    levels: Vec<Level>,
    len: usize,
}

impl KaratsubaArena {

    /// Creates an arena suitable for operands of up to `len` limbs.
    pub fn new(len: usize) -> Self {
        let mut a = Self::default();
        a.ensure(len);
        a
    }

    /// Returns the maximum operand length for which the arena is currently
    /// sized.
    pub fn capacity(&self) -> usize {
        self.len
    }

    /// Returns the number of recursion levels that have scratch space.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    // Resizes the arena (if needed) for operands of up to len limbs.
    fn ensure(&mut self, len: usize) {
        if len <= self.len {
            return;
        }
        self.levels.clear();
        let thr = core::cmp::min(KARATSUBA_MUL_THRESHOLD, KARATSUBA_SQR_THRESHOLD);
        let mut n = len;
        while n >= thr {
            let h = (n + 1) >> 1;
            self.levels.push(Level {
                xs: uli::new(h + 1),
                ys: uli::new(h + 1),
                z1: uli::new(2 * h + 2),
            });
            n = h + 1;
        }
        self.len = len;
    }
}

/// Computes `w = x*y`. The destination MUST have room for at least
/// `siglen(x) + siglen(y)` limbs; extra limbs are cleared.
pub fn mul(w: &mut [u32], x: &[u32], y: &[u32], arena: &mut KaratsubaArena) {
    let nx = uli::siglen(x);
    let ny = uli::siglen(y);
    arena.ensure(core::cmp::max(nx, ny));
    mul_inner(w, &x[..nx], &y[..ny], &mut arena.levels);
}

/// Computes `w = x^2`. The destination MUST have room for at least
/// `2*siglen(x)` limbs; extra limbs are cleared.
pub fn square(w: &mut [u32], x: &[u32], arena: &mut KaratsubaArena) {
    let n = uli::siglen(x);
    arena.ensure(n);
    square_inner(w, &x[..n], &mut arena.levels);
}

fn mul_inner(w: &mut [u32], x: &[u32], y: &[u32], levels: &mut [Level]) {
    let x = &x[..uli::siglen(x)];
    let y = &y[..uli::siglen(y)];
    let n = core::cmp::max(x.len(), y.len());
    let m = core::cmp::min(x.len(), y.len());
    if n < KARATSUBA_MUL_THRESHOLD
        || m * KARATSUBA_RELATIVE_DEN < n * KARATSUBA_RELATIVE_NUM
    {
        uli::mul_naive(w, x, y);
        return;
    }
    let (cur, rest) = match levels.split_first_mut() {
        Some(lv) => lv,
        None => {
            uli::mul_naive(w, x, y);
            return;
        }
    };

    // x = x1*B^h + x0, y = y1*B^h + y0; the balance condition ensures
    // that both x1 and y1 are non-empty.
    let h = (n + 1) >> 1;
    let (x0, x1) = x.split_at(h);
    let (y0, y1) = y.split_at(h);

    // z0 = x0*y0 and z2 = x1*y1, directly in the destination.
    w.fill(0);
    mul_inner(&mut w[..2 * h], x0, y0, rest);
    mul_inner(&mut w[2 * h..], x1, y1, rest);

    // z1 = (x0 + x1)*(y0 + y1) - z0 - z2
    let Level { xs, ys, z1 } = cur;
    let xs = &mut xs[..h + 1];
    let ys = &mut ys[..h + 1];
    let z1 = &mut z1[..2 * h + 2];
    uli::add(xs, x0, x1);
    uli::add(ys, y0, y1);
    mul_inner(z1, xs, ys, rest);
    uli::sub_in(z1, &w[..2 * h]);
    uli::sub_in(z1, &w[2 * h..]);

    uli::add_in(&mut w[h..], z1);
}

fn square_inner(w: &mut [u32], x: &[u32], levels: &mut [Level]) {
    let x = &x[..uli::siglen(x)];
    let n = x.len();
    if n < KARATSUBA_SQR_THRESHOLD {
        uli::square_naive(w, x);
        return;
    }
    let (cur, rest) = match levels.split_first_mut() {
        Some(lv) => lv,
        None => {
            uli::square_naive(w, x);
            return;
        }
    };

    let h = (n + 1) >> 1;
    let (x0, x1) = x.split_at(h);

    w.fill(0);
    square_inner(&mut w[..2 * h], x0, rest);
    square_inner(&mut w[2 * h..], x1, rest);

    let Level { xs, z1, .. } = cur;
    let xs = &mut xs[..h + 1];
    let z1 = &mut z1[..2 * h + 2];
    uli::add(xs, x0, x1);
    square_inner(z1, xs, rest);
    uli::sub_in(z1, &w[..2 * h]);
    uli::sub_in(z1, &w[2 * h..]);

    uli::add_in(&mut w[h..], z1);
}
