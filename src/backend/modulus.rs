//! Per-modulus arithmetic context.
//!
//! A `Modulus` instance owns everything that depends only on the modulus
//! value (normalized divisor and reciprocal, Montgomery constant) and the
//! scratch buffers used by modular products. It replaces any kind of
//! global cache: callers that work repeatedly with the same modulus keep
//! one instance around, and distinct threads use distinct instances.
//!
//! Three exponentiation strategies are provided:
//!
//!  - `pow_naive()`: left-to-right square-and-multiply;
//!
//!  - `pow_window()`: sliding windows over the exponent bits, with a
//!    table of odd powers of the base;
//!
//!  - `pow_mont()`: the same sliding windows, with all products computed
//!    in Montgomery representation (odd moduli only).
//!
//! Unless otherwise noted, destination slices must have at least `len()`
//! limbs, and operands of modular products must be lower than the modulus.

use super::{addcarry, ninv, umull_add2, uli, karatsuba, Divisor, KaratsubaArena};
use crate::Vec;

/// Exponent bit length thresholds for the sliding window size: window
/// size `k` is used for exponents of up to `WINDOW_THRESHOLDS[k - 1]` bits.
const WINDOW_THRESHOLDS: [usize; 5] = [8, 24, 80, 240, 672];

/// Returns the window size (in bits) used for an exponent of `bits` bits.
pub fn window_size(bits: usize) -> usize {
    for (i, &t) in WINDOW_THRESHOLDS.iter().enumerate() {
        if bits <= t {
            return i + 1;
        }
    }
    WINDOW_THRESHOLDS.len() + 1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Domain {
    Plain,
    Montgomery,
}

/// Modular arithmetic context for a given (non-zero) modulus.
#[derive(Clone, Debug)]
pub struct Modulus {
    m: Vec<u32>,
    div: Divisor,
    mu: u32,
    arena: KaratsubaArena,
    // Product scratch (double-width, resized on demand).
    t: Vec<u32>,
    // Montgomery accumulator (len() + 2 limbs).
    mt: Vec<u32>,
}

impl Modulus {

    /// Creates a context for modulus `m`, which MUST NOT be zero.
    pub fn new(m: &[u32]) -> Self {
        let n = uli::siglen(m);
        debug_assert!(n > 0, "zero modulus");
        let m = m[..n].to_vec();
        let div = Divisor::new(&m);
        let mu = ninv(m[0] | 1);
        Self {
            div,
            mu,
            arena: KaratsubaArena::new(n),
            t: uli::new(2 * n + 1),
            mt: uli::new(n + 2),
            m,
        }
    }

    /// Returns the modulus value (significant limbs only).
    pub fn value(&self) -> &[u32] {
        &self.m
    }

    /// Returns the number of significant limbs of the modulus.
    pub fn len(&self) -> usize {
        self.m.len()
    }

    /// Returns `true` if the modulus is odd (Montgomery arithmetic is
    /// then available).
    pub fn is_odd(&self) -> bool {
        (self.m[0] & 1) != 0
    }

    /// Returns `true` if the modulus is 1.
    pub fn is_one(&self) -> bool {
        self.m.len() == 1 && self.m[0] == 1
    }

    /// Returns the Montgomery constant `-1/m mod 2^WORDSIZE` (meaningful
    /// only for an odd modulus).
    pub fn mont_constant(&self) -> u32 {
        self.mu
    }

    /// Returns the underlying divisor.
    pub fn divisor(&mut self) -> &mut Divisor {
        &mut self.div
    }

    /// Reduces `x` modulo the modulus, in place.
    pub fn reduce(&mut self, x: &mut [u32]) {
        self.div.reduce(x);
    }

    /// Sets `w` to `x mod m`. `x` may have any length.
    pub fn reduce_into(&mut self, w: &mut [u32], x: &[u32]) {
        let len = core::cmp::max(uli::siglen(x), 1);
        if self.t.len() < len {
            self.t.resize(len, 0);
        }
        let t = &mut self.t[..len];
        uli::copy(t, x);
        self.div.reduce(t);
        uli::copy(w, t);
    }

    /// Sets `w` to `x*y mod m`. Operands may have any size; the product
    /// is fully reduced.
    pub fn mul(&mut self, w: &mut [u32], x: &[u32], y: &[u32]) {
        let len = uli::siglen(x) + uli::siglen(y) + 1;
        if self.t.len() < len {
            self.t.resize(len, 0);
        }
        let t = &mut self.t[..len];
        karatsuba::mul(t, x, y, &mut self.arena);
        self.div.reduce(t);
        uli::copy(w, t);
    }

    /// Sets `w` to `x^2 mod m`.
    pub fn square(&mut self, w: &mut [u32], x: &[u32]) {
        let len = 2 * uli::siglen(x) + 1;
        if self.t.len() < len {
            self.t.resize(len, 0);
        }
        let t = &mut self.t[..len];
        karatsuba::square(t, x, &mut self.arena);
        self.div.reduce(t);
        uli::copy(w, t);
    }

    /// Montgomery product: sets `w` to `x*y/R mod m`, with
    /// `R = 2^(WORDSIZE*len())`. The modulus MUST be odd and both
    /// operands MUST be lower than the modulus.
    pub fn mont_mul(&mut self, w: &mut [u32], x: &[u32], y: &[u32]) {
        let n = self.m.len();
        let m = &self.m;
        let mu = self.mu;
        let t = &mut self.mt;
        t.fill(0);
        for i in 0..n {
            // t <- t + x_i*y
            let xi = uli::at(x, i);
            let mut cc = 0;
            for j in 0..n {
                (t[j], cc) = umull_add2(xi, uli::at(y, j), t[j], cc);
            }
            let c2;
            (t[n], c2) = addcarry(t[n], cc, 0);
            t[n + 1] += c2;

            // t <- (t + u*m)/2^WORDSIZE, with u such that the division
            // is exact.
            let u = t[0].wrapping_mul(mu) & super::MASK;
            let (_, mut cc) = umull_add2(u, m[0], t[0], 0);
            for j in 1..n {
                (t[j - 1], cc) = umull_add2(u, m[j], t[j], cc);
            }
            let c2;
            (t[n - 1], c2) = addcarry(t[n], cc, 0);
            t[n] = t[n + 1] + c2;
            t[n + 1] = 0;
        }

        // Here, t < 2*m.
        if t[n] != 0 || uli::cmp(&t[..n], m) >= 0 {
            uli::sub_in(&mut t[..n + 1], m);
        }
        uli::copy(w, &t[..n]);
    }

    /// Converts `x` (any size) into Montgomery representation:
    /// `w = x*R mod m`.
    pub fn to_mont(&mut self, w: &mut [u32], x: &[u32]) {
        let n = self.m.len();
        let nx = uli::siglen(x);
        let len = n + nx + 1;
        if self.t.len() < len {
            self.t.resize(len, 0);
        }
        let t = &mut self.t[..len];
        t.fill(0);
        t[n..n + nx].copy_from_slice(&x[..nx]);
        self.div.reduce(t);
        uli::copy(w, t);
    }

    /// Converts `x` (lower than the modulus) out of Montgomery
    /// representation: `w = x/R mod m`.
    pub fn from_mont(&mut self, w: &mut [u32], x: &[u32]) {
        self.mont_mul(w, x, &[1]);
    }

    fn mul_in(&mut self, dom: Domain, w: &mut [u32], x: &[u32], y: &[u32]) {
        match dom {
            Domain::Plain => self.mul(w, x, y),
            Domain::Montgomery => self.mont_mul(w, x, y),
        }
    }

    fn square_in(&mut self, dom: Domain, w: &mut [u32], x: &[u32]) {
        match dom {
            Domain::Plain => self.square(w, x),
            Domain::Montgomery => self.mont_mul(w, x, x),
        }
    }

    /// Sets `w` to `b^e mod m`, with plain square-and-multiply.
    pub fn pow_naive(&mut self, w: &mut [u32], b: &[u32], e: &[u32]) {
        let n = self.m.len();
        let mut base = uli::new(n);
        self.reduce_into(&mut base, b);
        let mut acc = uli::new(n);
        self.reduce_into(&mut acc, &[1]);
        let mut tmp = uli::new(n);
        for i in (0..uli::bitlen(e)).rev() {
            self.square(&mut tmp, &acc);
            core::mem::swap(&mut acc, &mut tmp);
            if uli::getbit(e, i) != 0 {
                self.mul(&mut tmp, &acc, &base);
                core::mem::swap(&mut acc, &mut tmp);
            }
        }
        uli::copy(w, &acc);
    }

    /// Sets `w` to `b^e mod m`, with sliding windows.
    pub fn pow_window(&mut self, w: &mut [u32], b: &[u32], e: &[u32]) {
        let n = self.m.len();
        let mut base = uli::new(n);
        self.reduce_into(&mut base, b);
        let mut one = uli::new(n);
        self.reduce_into(&mut one, &[1]);
        self.pow_sliding(Domain::Plain, w, &base, &one, e);
    }

    /// Sets `w` to `b^e mod m`, with sliding windows and Montgomery
    /// products. The modulus MUST be odd.
    pub fn pow_mont(&mut self, w: &mut [u32], b: &[u32], e: &[u32]) {
        let n = self.m.len();
        let mut base = uli::new(n);
        self.to_mont(&mut base, b);
        let mut one = uli::new(n);
        self.to_mont(&mut one, &[1]);
        let mut acc = uli::new(n);
        self.pow_sliding(Domain::Montgomery, &mut acc, &base, &one, e);
        self.from_mont(w, &acc);
    }

    // Sliding-window exponentiation in the given domain; `base` and `one`
    // are already reduced and converted.
    fn pow_sliding(&mut self, dom: Domain, w: &mut [u32],
        base: &[u32], one: &[u32], e: &[u32])
    {
        let n = self.m.len();
        let eb = uli::bitlen(e);
        let k = window_size(eb);

        // Odd powers: tab[i] = base^(2*i+1).
        let mut tab: Vec<Vec<u32>> = Vec::with_capacity(1 << (k - 1));
        tab.push(base.to_vec());
        if k > 1 {
            let mut b2 = uli::new(n);
            self.square_in(dom, &mut b2, base);
            for i in 1..(1usize << (k - 1)) {
                let mut t = uli::new(n);
                self.mul_in(dom, &mut t, &tab[i - 1], &b2);
                tab.push(t);
            }
        }

        let mut acc = one.to_vec();
        let mut tmp = uli::new(n);
        let mut i = eb;
        while i > 0 {
            if uli::getbit(e, i - 1) == 0 {
                self.square_in(dom, &mut tmp, &acc);
                core::mem::swap(&mut acc, &mut tmp);
                i -= 1;
                continue;
            }

            // Window covers bits j..i-1, with bit j set.
            let mut j = if i >= k { i - k } else { 0 };
            while uli::getbit(e, j) == 0 {
                j += 1;
            }
            let mut val = 0usize;
            for b in (j..i).rev() {
                val = (val << 1) | (uli::getbit(e, b) as usize);
                self.square_in(dom, &mut tmp, &acc);
                core::mem::swap(&mut acc, &mut tmp);
            }
            self.mul_in(dom, &mut tmp, &acc, &tab[val >> 1]);
            core::mem::swap(&mut acc, &mut tmp);
            i = j;
        }
        uli::copy(w, &acc);
    }

    /// Builds the simultaneous-exponentiation table for the provided
    /// bases: entry `x` (for `x` in `0..2^k`) is the product modulo `m`
    /// of all `bases[i]` such that bit `i` of `x` is set. Each entry has
    /// `len()` limbs.
    pub fn product_table(&mut self, bases: &[&[u32]]) -> Vec<Vec<u32>> {
        let n = self.m.len();
        let k = bases.len();
        let size = 1usize << k;
        let mut table = vec![uli::new(n); size];
        self.reduce_into(&mut table[0], &[1]);
        for (i, b) in bases.iter().enumerate() {
            self.reduce_into(&mut table[1 << i], b);
        }
        for mask in 1..size {
            if (mask & (mask - 1)) == 0 {
                continue;
            }
            let low = mask & mask.wrapping_neg();
            let mut t = uli::new(n);
            self.mul(&mut t, &table[mask ^ low], &table[low]);
            table[mask] = t;
        }
        tracing::trace!(bases = k, entries = size, "built product table");
        table
    }

    /// Sets `w` to the product of `bases[i]^exps[i]`. The bases are
    /// split into consecutive batches, with one table per batch as
    /// obtained from `product_table()` (a table for `j` bases has `2^j`
    /// entries, and the tables cover `exps.len()` bases in total). All
    /// batches share a single squaring chain.
    pub fn pow_prod(&mut self, w: &mut [u32], tables: &[Vec<Vec<u32>>], exps: &[&[u32]]) {
        let n = self.m.len();
        debug_assert!(!tables.is_empty());
        let mut batches = Vec::with_capacity(tables.len());
        let mut off = 0;
        for t in tables {
            let j = t.len().trailing_zeros() as usize;
            batches.push(&exps[off..off + j]);
            off += j;
        }
        debug_assert!(off == exps.len());

        let bits = exps.iter().map(|e| uli::bitlen(e)).max().unwrap_or(0);
        let mut acc = tables[0][0].clone();
        let mut tmp = uli::new(n);
        for i in (0..bits).rev() {
            self.square(&mut tmp, &acc);
            core::mem::swap(&mut acc, &mut tmp);
            for (table, es) in tables.iter().zip(&batches) {
                let mut idx = 0usize;
                for (j, e) in es.iter().enumerate() {
                    idx |= (uli::getbit(e, i) as usize) << j;
                }
                if idx != 0 {
                    self.mul(&mut tmp, &acc, &table[idx]);
                    core::mem::swap(&mut acc, &mut tmp);
                }
            }
        }
        uli::copy(w, &acc);
    }
}
