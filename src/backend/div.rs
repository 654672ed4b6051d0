//! Long division with reciprocal-based quotient estimation.
//!
//! We use the method from: N. Möller and T. Granlund, "Improved division
//! by invariant integers", IEEE Transactions on Computers, 2011. The
//! divisor is first normalized (left-shifted until the top bit of its top
//! limb is set); the reciprocal of its top two limbs is then computed
//! once, and each quotient limb is obtained from the top three limbs of
//! the current partial remainder with a single multiplication by that
//! reciprocal, followed by at most two cheap corrections (`div_3by2()`).
//! A final multiply-subtract of the full divisor, with an add-back if the
//! estimate was one too large, yields the exact quotient limb.
//!
//! Since the normalization and the reciprocal only depend on the divisor,
//! they are kept in a `Divisor` instance, which is meant to be reused for
//! all divisions by the same value (e.g. all reductions modulo a given
//! modulus). `Divisor::update()` recomputes them when the divisor value
//! changes.

use super::{addcarry, subborrow, umull_add2, uli, MASK, WORDSIZE};
use crate::Vec;

const W: u32 = WORDSIZE;

/// Returns the reciprocal `v = floor((B^2 - 1)/d) - B` of a normalized
/// limb `d` (top bit set), with `B = 2^WORDSIZE`.
pub fn reciprocal_2by1(d: u32) -> u32 {
    let t = ((1u64 << (2 * W)) - 1) / (d as u64);
    (t - (1u64 << W)) as u32
}

/// Returns the reciprocal `v = floor((B^3 - 1)/d) - B` of a normalized
/// two-limb value `d = d1*B + d0` (top bit of `d1` set), with
/// `B = 2^WORDSIZE`.
pub fn reciprocal_3by2(d1: u32, d0: u32) -> u32 {
    let d = ((d1 as u128) << W) | (d0 as u128);
    let t = ((1u128 << (3 * W)) - 1) / d;
    (t - (1u128 << W)) as u32
}

/// Divides `u1*B + u0` by the normalized limb `d`, given its reciprocal
/// `v`. It is required that `u1 < d`. Returned value is (quotient,
/// remainder).
pub fn div_2by1(u1: u32, u0: u32, d: u32, v: u32) -> (u32, u32) {
    let q = (v as u64) * (u1 as u64) + (((u1 as u64) << W) | (u0 as u64));
    let mut q1 = (((q >> W) as u32) + 1) & MASK;
    let q0 = (q as u32) & MASK;
    let mut r = u0.wrapping_sub(q1.wrapping_mul(d)) & MASK;
    if r > q0 {
        q1 = q1.wrapping_sub(1) & MASK;
        r = (r + d) & MASK;
    }
    if r >= d {
        q1 += 1;
        r -= d;
    }
    (q1, r)
}

/// Divides `u2*B^2 + u1*B + u0` by the normalized two-limb value
/// `d1*B + d0`, given its reciprocal `v`. It is required that
/// `u2*B + u1 < d1*B + d0`. Returned value is (quotient, remainder high
/// limb, remainder low limb).
pub fn div_3by2(u2: u32, u1: u32, u0: u32, d1: u32, d0: u32, v: u32)
    -> (u32, u32, u32)
{
    let b2mask = (1u64 << (2 * W)) - 1;
    let d = ((d1 as u64) << W) | (d0 as u64);
    let q = ((v as u64) * (u2 as u64)
        + (((u2 as u64) << W) | (u1 as u64))) & b2mask;
    let mut q1 = (q >> W) as u32;
    let q0 = (q as u32) & MASK;
    let r1 = u1.wrapping_sub(q1.wrapping_mul(d1)) & MASK;
    let t = (d0 as u64) * (q1 as u64);
    let mut r = ((((r1 as u64) << W) | (u0 as u64))
        .wrapping_sub(t).wrapping_sub(d)) & b2mask;
    q1 = (q1 + 1) & MASK;
    if ((r >> W) as u32) >= q0 {
        q1 = q1.wrapping_sub(1) & MASK;
        r = (r + d) & b2mask;
    }
    if r >= d {
        q1 += 1;
        r -= d;
    }
    (q1, (r >> W) as u32, (r as u32) & MASK)
}

/// A divisor, with its normalized form and reciprocal precomputed, and
/// scratch space for the shifted dividend.
#[derive(Clone, Debug)]
pub struct Divisor {
    // Divisor value (significant limbs only).
    orig: Vec<u32>,
    // Normalized divisor: orig << shift.
    norm: Vec<u32>,
    shift: u32,
    v: u32,
    un: Vec<u32>,
}

impl Divisor {

    /// Prepares division by `d`, which MUST NOT be zero.
    pub fn new(d: &[u32]) -> Self {
        let n = uli::siglen(d);
        debug_assert!(n > 0, "division by zero");
        let orig = d[..n].to_vec();
        let shift = d[n - 1].leading_zeros() - (32 - W);
        let mut norm = orig.clone();
        uli::shl(&mut norm, shift as usize);
        let v = if n == 1 {
            reciprocal_2by1(norm[0])
        } else {
            reciprocal_3by2(norm[n - 1], norm[n - 2])
        };
        Self { orig, norm, shift, v, un: Vec::new() }
    }

    /// Makes this instance a divisor by `d`. If `d` has the same value as
    /// the current divisor, then the precomputed values are kept.
    pub fn update(&mut self, d: &[u32]) {
        if uli::cmp(&self.orig, d) != 0 {
            let un = core::mem::take(&mut self.un);
            *self = Self::new(d);
            self.un = un;
        }
    }

    /// Returns the divisor value (significant limbs only).
    pub fn value(&self) -> &[u32] {
        &self.orig
    }

    /// Returns the number of significant limbs of the divisor.
    pub fn len(&self) -> usize {
        self.orig.len()
    }

    /// Computes the quotient and remainder of `u` by this divisor. The
    /// remainder replaces `u`; the quotient is written into `q` (which is
    /// cleared first, and should have room for `siglen(u) - len() + 1`
    /// limbs; quotient limbs beyond the length of `q` are dropped).
    pub fn div_qr(&mut self, q: &mut [u32], u: &mut [u32]) {
        self.divide(Some(q), u);
    }

    /// Reduces `u` modulo this divisor, in place.
    pub fn reduce(&mut self, u: &mut [u32]) {
        self.divide(None, u);
    }

    fn divide(&mut self, mut q: Option<&mut [u32]>, u: &mut [u32]) {
        if let Some(q) = q.as_deref_mut() {
            q.fill(0);
        }
        let Self { norm, shift, v, un, .. } = self;
        let n = norm.len();
        let m = uli::siglen(u);
        if m < n {
            return;
        }

        // Shifted dividend, with one extra limb for the shifted-out bits.
        un.clear();
        un.resize(m + 1, 0);
        un[..m].copy_from_slice(&u[..m]);
        uli::shl(un, *shift as usize);

        if n == 1 {
            let d = norm[0];
            let mut r = un[m];
            for j in (0..m).rev() {
                let (qj, rj) = div_2by1(r, un[j], d, *v);
                r = rj;
                if let Some(q) = q.as_deref_mut() {
                    if j < q.len() {
                        q[j] = qj;
                    }
                }
            }
            u.fill(0);
            u[0] = r >> *shift;
            return;
        }

        let (d1, d0) = (norm[n - 1], norm[n - 2]);
        for j in (0..=(m - n)).rev() {
            // The window un[j..=j+n] is lower than norm*B, hence the top
            // two limbs are at most (d1, d0).
            let (u2, u1, u0) = (un[j + n], un[j + n - 1], un[j + n - 2]);
            let mut qhat = if u2 > d1 || (u2 == d1 && u1 >= d0) {
                MASK
            } else {
                div_3by2(u2, u1, u0, d1, d0, *v).0
            };

            // un[j..=j+n] <- un[j..=j+n] - qhat*norm
            let mut carry = 0;
            let mut borrow = 0;
            for i in 0..n {
                let (lo, hi) = umull_add2(qhat, norm[i], carry, 0);
                carry = hi;
                (un[j + i], borrow) = subborrow(un[j + i], lo, borrow);
            }
            let mut top = (un[j + n] as i64) - (carry as i64) - (borrow as i64);

            // The estimate is never too small; if it was too large, add
            // the divisor back.
            while top < 0 {
                qhat -= 1;
                let mut cc = 0;
                for i in 0..n {
                    (un[j + i], cc) = addcarry(un[j + i], norm[i], cc);
                }
                top += cc as i64;
            }
            un[j + n] = top as u32;

            if let Some(q) = q.as_deref_mut() {
                if j < q.len() {
                    q[j] = qhat;
                }
            }
        }

        uli::shr(&mut un[..n], *shift as usize);
        u.fill(0);
        u[..n].copy_from_slice(&un[..n]);
    }
}
