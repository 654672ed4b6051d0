//! Basic operations on limb arrays.
//!
//! Unless documented otherwise, every function processes the full length
//! of its destination slice, reading missing source limbs as zero. This
//! makes it possible to mix arrays of distinct lengths, as long as the
//! destination is large enough to hold the result.

use super::{addcarry, subborrow, umull_add2, MASK, TOPBIT, WORDSIZE};
use crate::Vec;

const W: usize = WORDSIZE as usize;

// Get limb i of x, or zero if x is shorter.
#[inline(always)]
pub(crate) fn at(x: &[u32], i: usize) -> u32 {
    if i < x.len() { x[i] } else { 0 }
}

/// Allocates a new array of `len` limbs, all zero.
pub fn new(len: usize) -> Vec<u32> {
    vec![0u32; len]
}

/// Sets all limbs to zero.
#[inline]
pub fn set_zero(x: &mut [u32]) {
    x.fill(0);
}

/// Sets `w` to the (unsigned) value `v`; upper limbs are cleared. The
/// destination MUST be large enough for `v`.
pub fn set_u64(w: &mut [u32], v: u64) {
    let mut v = v;
    for l in w.iter_mut() {
        *l = (v as u32) & MASK;
        v >>= W;
    }
}

/// Copies `x` into `w`. If `x` is shorter, then the upper limbs of `w`
/// are cleared; if `x` is longer, then its extra limbs are ignored.
pub fn copy(w: &mut [u32], x: &[u32]) {
    let n = core::cmp::min(w.len(), x.len());
    w[..n].copy_from_slice(&x[..n]);
    w[n..].fill(0);
}

/// Resizes an array in place; new limbs are zero. Shrinking drops the
/// upper limbs.
pub fn resize(x: &mut Vec<u32>, len: usize) {
    x.resize(len, 0);
}

/// Returns the number of significant limbs (index of the most significant
/// non-zero limb, plus one), or 0 if the value is zero.
#[inline]
pub fn siglen(x: &[u32]) -> usize {
    let mut n = x.len();
    while n > 0 && x[n - 1] == 0 {
        n -= 1;
    }
    n
}

/// Returns the index of the most significant non-zero limb (0 for zero).
#[inline]
pub fn msword(x: &[u32]) -> usize {
    let n = siglen(x);
    if n == 0 { 0 } else { n - 1 }
}

/// Returns the length of the value, in bits (0 for zero).
pub fn bitlen(x: &[u32]) -> usize {
    let n = siglen(x);
    if n == 0 {
        0
    } else {
        (n - 1) * W + (32 - x[n - 1].leading_zeros()) as usize
    }
}

/// Returns the index of the most significant set bit (0 for zero).
pub fn msbit(x: &[u32]) -> usize {
    let n = bitlen(x);
    if n == 0 { 0 } else { n - 1 }
}

/// Returns bit `i` of `x` (0 or 1); bits beyond the array are zero.
#[inline]
pub fn getbit(x: &[u32], i: usize) -> u32 {
    (at(x, i / W) >> (i % W)) & 1
}

/// Returns `true` if the value is zero.
#[inline]
pub fn iszero(x: &[u32]) -> bool {
    x.iter().all(|&l| l == 0)
}

/// Shrinks an array to its minimal representation: the significant limbs,
/// plus one zero limb if the top bit of the top limb is set (so that the
/// array can be read as a non-negative two's-complement value). At least
/// one limb is always kept.
pub fn normalize(x: &mut Vec<u32>) {
    let n = siglen(x);
    x.truncate(n);
    if x.is_empty() || (x[x.len() - 1] & TOPBIT) != 0 {
        x.push(0);
    }
}

/// Compares two values; returns -1, 0 or 1 if `x` is lower than, equal
/// to, or greater than `y`, respectively. Arrays may have distinct lengths.
pub fn cmp(x: &[u32], y: &[u32]) -> i32 {
    let n = core::cmp::max(x.len(), y.len());
    for i in (0..n).rev() {
        let (a, b) = (at(x, i), at(y, i));
        if a != b {
            return if a > b { 1 } else { -1 };
        }
    }
    0
}

/// Shifts `x` left by `bits` bits, in place. Bits pushed beyond the array
/// are lost; shifting by at least the array width clears it.
pub fn shl(x: &mut [u32], bits: usize) {
    let n = x.len();
    let ws = bits / W;
    let bs = (bits % W) as u32;
    if ws >= n {
        x.fill(0);
        return;
    }
    if bs == 0 {
        for i in (ws..n).rev() {
            x[i] = x[i - ws];
        }
    } else {
        for i in (ws + 1..n).rev() {
            x[i] = ((x[i - ws] << bs) & MASK) | (x[i - ws - 1] >> (WORDSIZE - bs));
        }
        x[ws] = (x[0] << bs) & MASK;
    }
    x[..ws].fill(0);
}

/// Shifts `x` right by `bits` bits, in place (the array length does not
/// change).
pub fn shr(x: &mut [u32], bits: usize) {
    let n = x.len();
    let ws = bits / W;
    let bs = (bits % W) as u32;
    if ws >= n {
        x.fill(0);
        return;
    }
    let m = n - ws;
    if bs == 0 {
        for i in 0..m {
            x[i] = x[i + ws];
        }
    } else {
        for i in 0..(m - 1) {
            x[i] = (x[i + ws] >> bs) | ((x[i + ws + 1] << (WORDSIZE - bs)) & MASK);
        }
        x[m - 1] = x[n - 1] >> bs;
    }
    x[m..].fill(0);
}

/// Clears all bits at index `bits` and above.
pub fn truncate_bits(x: &mut [u32], bits: usize) {
    let ws = bits / W;
    if ws >= x.len() {
        return;
    }
    x[ws] &= (1u32 << (bits % W)) - 1;
    x[ws + 1..].fill(0);
}

/// Computes `w = x + y` over the full width of `w`; returns the output
/// carry (0 or 1).
pub fn add(w: &mut [u32], x: &[u32], y: &[u32]) -> u32 {
    let mut cc = 0;
    for i in 0..w.len() {
        (w[i], cc) = addcarry(at(x, i), at(y, i), cc);
    }
    cc
}

/// Computes `w = w + y` over the full width of `w`; returns the output
/// carry (0 or 1).
pub fn add_in(w: &mut [u32], y: &[u32]) -> u32 {
    let mut cc = 0;
    for i in 0..w.len() {
        (w[i], cc) = addcarry(w[i], at(y, i), cc);
    }
    cc
}

/// Computes `w = x - y` over the full width of `w`. If `x < y`, then the
/// result is the two's-complement representation of the (negative)
/// difference, and -1 is returned; otherwise, 0 is returned.
pub fn sub(w: &mut [u32], x: &[u32], y: &[u32]) -> i32 {
    let mut cc = 0;
    for i in 0..w.len() {
        (w[i], cc) = subborrow(at(x, i), at(y, i), cc);
    }
    -(cc as i32)
}

/// Computes `w = w - y` over the full width of `w`; same return
/// convention as `sub()`.
pub fn sub_in(w: &mut [u32], y: &[u32]) -> i32 {
    let mut cc = 0;
    for i in 0..w.len() {
        (w[i], cc) = subborrow(w[i], at(y, i), cc);
    }
    -(cc as i32)
}

/// Sets `w` to the two's-complement negation of `x`, over the full width
/// of `w`.
pub fn neg(w: &mut [u32], x: &[u32]) {
    sub(w, &[], x);
}

/// Two's-complement negation of `w` in place, over its full width.
pub fn neg_in(w: &mut [u32]) {
    let mut cc = 1;
    for l in w.iter_mut() {
        let z = (*l ^ MASK) + cc;
        *l = z & MASK;
        cc = z >> WORDSIZE;
    }
}

/// A limb buffer holding a value in two's-complement representation
/// (i.e. modulo 2^(WORDSIZE*len)), typically the output of a subtraction
/// that may have underflowed. The sign is tracked from the borrow, so
/// that the buffer is never confused with a plain magnitude.
pub struct TwosComplement<'a> {
    limbs: &'a mut [u32],
    negative: bool,
}

impl<'a> TwosComplement<'a> {

    /// Computes `w = x - y` and wraps the destination.
    pub fn sub(w: &'a mut [u32], x: &[u32], y: &[u32]) -> Self {
        let cc = sub(w, x, y);
        Self { limbs: w, negative: cc != 0 }
    }

    /// Computes `w = w - y` and wraps the destination.
    pub fn sub_in(w: &'a mut [u32], y: &[u32]) -> Self {
        let cc = sub_in(w, y);
        Self { limbs: w, negative: cc != 0 }
    }

    /// Returns `true` if the wrapped value is negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Converts the buffer back to a magnitude (in place); returns -1 if
    /// the value was negative, 0 if it is zero, +1 otherwise.
    pub fn into_magnitude(self) -> i32 {
        if self.negative {
            neg_in(self.limbs);
            -1
        } else if iszero(self.limbs) {
            0
        } else {
            1
        }
    }
}

/// Computes `w = w + x*y` over the first `x.len()` limbs of `w` (`y` is
/// a single limb); returns the carry (lower than 2^WORDSIZE), which is
/// NOT added into `w`.
#[inline]
pub fn muladd_loop(w: &mut [u32], x: &[u32], y: u32) -> u32 {
    let mut cc = 0;
    for i in 0..x.len() {
        (w[i], cc) = umull_add2(x[i], y, w[i], cc);
    }
    cc
}

/// Multiplies `x` by the single limb `y`, in place; returns the carry.
pub fn mul_word_in(x: &mut [u32], y: u32) -> u32 {
    let mut cc = 0;
    for l in x.iter_mut() {
        (*l, cc) = umull_add2(*l, y, 0, cc);
    }
    cc
}

/// Schoolbook multiplication: `w = x*y`. The destination MUST have room
/// for at least `siglen(x) + siglen(y)` limbs; extra limbs are cleared.
pub fn mul_naive(w: &mut [u32], x: &[u32], y: &[u32]) {
    w.fill(0);
    let nx = siglen(x);
    let ny = siglen(y);
    if nx == 0 || ny == 0 {
        return;
    }
    for i in 0..nx {
        let cc = muladd_loop(&mut w[i..], &y[..ny], x[i]);
        w[i + ny] = cc;
    }
}

/// Schoolbook squaring: `w = x^2`. The destination MUST have room for at
/// least `2*siglen(x)` limbs; extra limbs are cleared.
pub fn square_naive(w: &mut [u32], x: &[u32]) {
    w.fill(0);
    let n = siglen(x);
    if n == 0 {
        return;
    }

    // Cross products x_i*x_j for i < j, then doubled.
    for i in 0..(n - 1) {
        let cc = muladd_loop(&mut w[2 * i + 1..], &x[i + 1..n], x[i]);
        w[i + n] = cc;
    }
    shl(&mut w[..2 * n], 1);

    // Diagonal terms.
    let mut cc = 0;
    for i in 0..n {
        let (lo, hi) = umull_add2(x[i], x[i], w[2 * i], cc);
        w[2 * i] = lo;
        (w[2 * i + 1], cc) = addcarry(w[2 * i + 1], hi, 0);
    }
}

/// Decodes an unsigned big-endian byte sequence. The returned array has
/// at least one limb.
pub fn from_bytes_be(buf: &[u8]) -> Vec<u32> {
    let n = (buf.len() * 8 + W - 1) / W;
    let mut x = new(core::cmp::max(n, 1));
    let mut acc = 0u64;
    let mut acc_len = 0;
    let mut j = 0;
    for &b in buf.iter().rev() {
        acc |= (b as u64) << acc_len;
        acc_len += 8;
        if acc_len >= W {
            x[j] = (acc as u32) & MASK;
            j += 1;
            acc >>= W;
            acc_len -= W;
        }
    }
    if acc_len > 0 {
        x[j] = acc as u32;
    }
    x
}

/// Encodes a value as unsigned big-endian bytes, with minimal length
/// (a single zero byte for zero).
pub fn to_bytes_be(x: &[u32]) -> Vec<u8> {
    let len = core::cmp::max((bitlen(x) + 7) / 8, 1);
    let mut buf = vec![0u8; len];
    let mut acc = 0u64;
    let mut acc_len = 0;
    let mut k = len;
    for &l in x {
        acc |= (l as u64) << acc_len;
        acc_len += W;
        while acc_len >= 8 && k > 0 {
            k -= 1;
            buf[k] = acc as u8;
            acc >>= 8;
            acc_len -= 8;
        }
        if k == 0 {
            break;
        }
    }
    if k > 0 && acc_len > 0 {
        buf[k - 1] = acc as u8;
    }
    buf
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::testutil::{to_big, from_big, DRNG};
    use crate::RngCore;
    use num_bigint::BigUint;

    #[test]
    fn basic() {
        let mut x = new(4);
        assert!(iszero(&x));
        assert!(siglen(&x) == 0 && bitlen(&x) == 0 && msword(&x) == 0);
        set_u64(&mut x, 0x123456789ABCDEF);
        assert!(to_big(&x) == BigUint::from(0x123456789ABCDEFu64));
        assert!(bitlen(&x) == 57);
        assert!(msbit(&x) == 56);
        assert!(getbit(&x, 0) == 1 && getbit(&x, 4) == 0 && getbit(&x, 56) == 1);
        assert!(getbit(&x, 1000) == 0);
        let mut y = x.clone();
        resize(&mut y, 8);
        assert!(cmp(&x, &y) == 0);
        y[5] = 1;
        assert!(cmp(&x, &y) == -1 && cmp(&y, &x) == 1);
        normalize(&mut y);
        assert!(y.len() == 6);
        let mut z = new(5);
        z[0] = TOPBIT;
        normalize(&mut z);
        assert!(z == [TOPBIT, 0]);
        let mut z = new(3);
        normalize(&mut z);
        assert!(z == [0]);
    }

    #[test]
    fn shifts() {
        let mut rng = DRNG::from_seed(b"uli-shifts");
        for n in 1..12 {
            let x = rng.limbs(n);
            let zx = to_big(&x);
            for bits in [0, 1, 7, W - 1, W, W + 3, 3 * W + 5, n * W, n * W + 9] {
                let mut y = x.clone();
                shl(&mut y, bits);
                let mask = (BigUint::from(1u32) << (n * W)) - BigUint::from(1u32);
                assert!(to_big(&y) == ((&zx << bits) & &mask));
                let mut y = x.clone();
                shr(&mut y, bits);
                assert!(to_big(&y) == (&zx >> bits));
                let mut y = x.clone();
                truncate_bits(&mut y, bits);
                let mask = (BigUint::from(1u32) << bits) - BigUint::from(1u32);
                assert!(to_big(&y) == (&zx & &mask));
            }
        }
    }

    #[test]
    fn add_sub_neg() {
        let mut rng = DRNG::from_seed(b"uli-addsub");
        for _ in 0..200 {
            let nx = 1 + rng.below(10) as usize;
            let ny = 1 + rng.below(10) as usize;
            let x = rng.limbs(nx);
            let y = rng.limbs(ny);
            let n = core::cmp::max(nx, ny) + 1;
            let (zx, zy) = (to_big(&x), to_big(&y));

            let mut w = new(n);
            assert!(add(&mut w, &x, &y) == 0);
            assert!(to_big(&w) == &zx + &zy);
            let mut w2 = x.clone();
            resize(&mut w2, n);
            add_in(&mut w2, &y);
            assert!(w == w2);

            let mut w = new(n);
            let c = sub(&mut w, &x, &y);
            let modulus = BigUint::from(1u32) << (n * W);
            if zx >= zy {
                assert!(c == 0);
                assert!(to_big(&w) == &zx - &zy);
            } else {
                assert!(c == -1);
                assert!(to_big(&w) == &modulus - (&zy - &zx));
            }
            let mut w2 = x.clone();
            resize(&mut w2, n);
            assert!(sub_in(&mut w2, &y) == c);
            assert!(w == w2);

            // x + neg(x) = 0 over the full width.
            let mut xn = new(n);
            neg(&mut xn, &x);
            let mut s = new(n);
            add(&mut s, &x, &xn);
            assert!(iszero(&s));
            let mut t = x.clone();
            resize(&mut t, n);
            neg_in(&mut t);
            assert!(t == xn);

            let mut w = new(n);
            let tc = TwosComplement::sub(&mut w, &x, &y);
            assert!(tc.is_negative() == (zx < zy));
            let sg = tc.into_magnitude();
            if zx >= zy {
                assert!(to_big(&w) == &zx - &zy);
                assert!(sg == if zx == zy { 0 } else { 1 });
            } else {
                assert!(sg == -1);
                assert!(to_big(&w) == &zy - &zx);
            }
        }
    }

    #[test]
    fn products() {
        let mut rng = DRNG::from_seed(b"uli-mul");
        for _ in 0..200 {
            let nx = 1 + rng.below(12) as usize;
            let ny = 1 + rng.below(12) as usize;
            let x = rng.limbs(nx);
            let y = rng.limbs(ny);
            let mut w = new(nx + ny + 2);
            mul_naive(&mut w, &x, &y);
            assert!(to_big(&w) == to_big(&x) * to_big(&y));
            let mut w = new(2 * nx + 1);
            square_naive(&mut w, &x);
            assert!(to_big(&w) == to_big(&x) * to_big(&x));
            let mut z = x.clone();
            let k = rng.limbs(1)[0];
            let cc = mul_word_in(&mut z, k);
            z.push(cc);
            assert!(to_big(&z) == to_big(&x) * BigUint::from(k));
        }

        // All-ones operands stress the carries.
        for n in 1..10 {
            let x = vec![MASK; n];
            let mut w = new(2 * n);
            mul_naive(&mut w, &x, &x);
            let zx = to_big(&x);
            assert!(to_big(&w) == &zx * &zx);
            square_naive(&mut w, &x);
            assert!(to_big(&w) == &zx * &zx);
            assert!(from_big(&(&zx * &zx), 2 * n) == w);
        }
    }

    #[test]
    fn bytes() {
        assert!(to_bytes_be(&[0, 0]) == [0]);
        assert!(from_bytes_be(&[]) == [0]);
        assert!(iszero(&from_bytes_be(&[0, 0, 0])));
        let mut rng = DRNG::from_seed(b"uli-bytes");
        for len in 1..70 {
            let mut buf = vec![0u8; len];
            rng.fill_bytes(&mut buf);
            buf[0] |= 1;
            let x = from_bytes_be(&buf);
            assert!(to_big(&x) == BigUint::from_bytes_be(&buf));
            assert!(to_bytes_be(&x) == buf);
        }
    }
}
