//! Simultaneous and fixed-base modular exponentiation.
//!
//! `ModPowProd` computes products `b_0^e_0 * b_1^e_1 * ... mod m` for a
//! fixed list of bases. The bases are split into batches of `width`
//! bases; for each batch, a table of all `2^width` sub-products is built
//! once. Each evaluation then scans the exponent bits from the top, with
//! one squaring per bit and at most one table multiplication per batch
//! and bit position (shared by all exponents of the batch).
//!
//! `FixModPow` speeds up repeated exponentiations of a single fixed basis
//! `g`. The exponent range is cut into `width` slices of `slice_size`
//! bits; with `g_i = g^(2^(slice_size*i))`, an exponentiation `g^e` is
//! the product of the `g_i^e_i` for the slices `e_i` of `e`, which is
//! evaluated with a `ModPowProd` over the `g_i`.

use crate::backend::{uli, Modulus};
use crate::int::LargeInt;
use crate::li::Li;
use crate::{Error, Vec};

/// Maximum table width: a table has up to `2^MAX_WIDTH` entries.
pub const MAX_WIDTH: usize = 16;

/// Precomputed tables for simultaneous exponentiation of a fixed list of
/// bases modulo a fixed modulus.
#[derive(Clone, Debug)]
pub struct ModPowProd {
    md: Modulus,
    tables: Vec<Vec<Vec<u32>>>,
    k: usize,
    width: usize,
}

impl ModPowProd {

    /// Builds the tables for the provided non-empty list of non-negative
    /// bases and positive modulus. Bases are grouped in batches of
    /// `width` (1 to `MAX_WIDTH`) bases, each with its own table of
    /// `2^width` entries (the last batch may be smaller).
    pub fn new(bases: &[LargeInt], modulus: &LargeInt, width: usize)
        -> Result<Self, Error>
    {
        if bases.is_empty() || width == 0 || width > MAX_WIDTH {
            return Err(Error::InvalidWidth);
        }
        if modulus.sign() <= 0 {
            return Err(Error::InvalidModulus);
        }
        if bases.iter().any(|b| b.sign() < 0) {
            return Err(Error::InvalidBasis);
        }
        let mut md = Modulus::new(modulus.as_li().value());
        let bl: Vec<&[u32]> = bases.iter().map(|b| b.as_li().value()).collect();
        let tables: Vec<Vec<Vec<u32>>> = bl.chunks(width)
            .map(|batch| md.product_table(batch))
            .collect();
        Ok(Self { md, tables, k: bases.len(), width })
    }

    /// Returns the number of bases.
    pub fn len(&self) -> usize {
        self.k
    }

    /// Returns the table width (number of bases per batch).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the modulus.
    pub fn modulus(&self) -> LargeInt {
        LargeInt::from_li(Li::from_parts(1, self.md.value().to_vec()))
    }

    /// Returns the product of the bases raised to the provided
    /// (non-negative) exponents, modulo the modulus. There must be
    /// exactly one exponent per basis.
    pub fn mod_pow_prod(&mut self, exponents: &[LargeInt]) -> Result<LargeInt, Error> {
        if exponents.len() != self.k {
            return Err(Error::ExponentCount);
        }
        if exponents.iter().any(|e| e.sign() < 0) {
            return Err(Error::InvalidExponent);
        }
        if self.md.is_one() {
            return Ok(LargeInt::zero());
        }
        let el: Vec<&[u32]> = exponents.iter().map(|e| e.as_li().value()).collect();
        let mut w = uli::new(self.md.len());
        self.md.pow_prod(&mut w, &self.tables, &el);
        Ok(LargeInt::from_li(Li::from_parts(1, w)))
    }

    /// Computes the same product as `mod_pow_prod()` with independent
    /// exponentiations, without any table.
    pub fn naive(bases: &[LargeInt], exponents: &[LargeInt], modulus: &LargeInt)
        -> Result<LargeInt, Error>
    {
        if bases.len() != exponents.len() {
            return Err(Error::ExponentCount);
        }
        let mut r = LargeInt::one().modulo(modulus)?;
        for (b, e) in bases.iter().zip(exponents) {
            r = r.mod_mul(&b.mod_pow(e, modulus)?, modulus)?;
        }
        Ok(r)
    }
}

/// Fixed-basis exponentiation with exponent slicing.
#[derive(Clone, Debug)]
pub struct FixModPow {
    mpp: ModPowProd,
    width: usize,
    slice_size: usize,
}

impl FixModPow {

    /// Prepares exponentiations of `basis` modulo `modulus`, for
    /// exponents of up to `bit_length` bits (larger exponents are
    /// supported, but slower); `size` is the expected number of
    /// exponentiations, used to choose the table width.
    pub fn new(basis: &LargeInt, modulus: &LargeInt, size: usize, bit_length: usize)
        -> Result<Self, Error>
    {
        let width = Self::optimal_width(size, bit_length);
        Self::with_width(basis, modulus, width, bit_length)
    }

    /// Same as `new()`, with an explicit table width (1 to `MAX_WIDTH`).
    pub fn with_width(basis: &LargeInt, modulus: &LargeInt, width: usize, bit_length: usize)
        -> Result<Self, Error>
    {
        if width == 0 || width > MAX_WIDTH {
            return Err(Error::InvalidWidth);
        }
        if modulus.sign() <= 0 {
            return Err(Error::InvalidModulus);
        }
        if basis.sign() < 0 {
            return Err(Error::InvalidBasis);
        }
        let slice_size = core::cmp::max((bit_length + width - 1) / width, 1);

        // bases[i] = basis^(2^(slice_size*i))
        let mut bases = Vec::with_capacity(width);
        let mut b = basis.modulo(modulus)?;
        for i in 0..width {
            if i > 0 {
                for _ in 0..slice_size {
                    b = b.mod_mul(&b, modulus)?;
                }
            }
            bases.push(b.clone());
        }
        tracing::debug!(width, slice_size, bit_length, "fixed-basis exponentiation table");
        Ok(Self {
            mpp: ModPowProd::new(&bases, modulus, width)?,
            width,
            slice_size,
        })
    }

    /// Returns the table width (number of exponent slices).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the size of each exponent slice, in bits.
    pub fn slice_size(&self) -> usize {
        self.slice_size
    }

    /// Returns the width that minimizes the total cost of `size`
    /// exponentiations with `bit_length`-bit exponents. The cost is
    /// counted in modular multiplications: building the bases and the
    /// table, then one squaring per slice bit and one table
    /// multiplication per non-zero bit column for each exponentiation.
    pub fn optimal_width(size: usize, bit_length: usize) -> usize {
        let cost = |w: usize| -> u128 {
            let s = ((bit_length + w - 1) / w).max(1) as u128;
            let t = 1u128 << w;
            let pre = (bit_length as u128) + t;
            // Expected multiplications per column: 1 - 2^-w.
            let per = s + (s * (t - 1)) / t;
            pre + (size as u128) * per
        };
        let mut best = 1;
        let mut best_cost = cost(1);
        for w in 2..=MAX_WIDTH {
            let c = cost(w);
            if c >= best_cost {
                break;
            }
            best = w;
            best_cost = c;
        }
        tracing::debug!(size, bit_length, width = best, "optimal width");
        best
    }

    /// Returns `basis^e mod modulus`, for a non-negative exponent.
    pub fn fix_mod_pow(&mut self, e: &LargeInt) -> Result<LargeInt, Error> {
        if e.sign() < 0 {
            return Err(Error::InvalidExponent);
        }
        let s = self.slice_size;
        let mut slices = Vec::with_capacity(self.width);
        for i in 0..self.width {
            let start = i * s;
            if i + 1 < self.width {
                slices.push(e.slice(start, start + s));
            } else {
                // The last slice takes all remaining bits.
                slices.push(e.shr(start).abs());
            }
        }
        self.mpp.mod_pow_prod(&slices)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::testutil::DRNG;

    fn modulus(rng: &mut DRNG, bits: usize) -> LargeInt {
        let mut m = LargeInt::random(bits, rng);
        if m.is_zero() {
            m = LargeInt::from_u64(0x77);
        }
        m
    }

    #[test]
    fn product_matches_naive() {
        let mut rng = DRNG::from_seed(b"modpowprod");
        for k in 1..=6 {
            for _ in 0..5 {
                let m = modulus(&mut rng, 200);
                let bases: Vec<LargeInt> = (0..k).map(|_| LargeInt::random(220, &mut rng)).collect();
                let mut mpp = ModPowProd::new(&bases, &m, k).unwrap();
                assert!(mpp.len() == k && mpp.width() == k);
                assert!(mpp.modulus() == m);
                for _ in 0..3 {
                    let exps: Vec<LargeInt> = (0..k).map(|_| LargeInt::random(100, &mut rng)).collect();
                    let r = mpp.mod_pow_prod(&exps).unwrap();
                    assert!(r == ModPowProd::naive(&bases, &exps, &m).unwrap());
                }
            }
        }
    }

    #[test]
    fn batched_bases() {
        // More bases than the table width: several tables, one result.
        let mut rng = DRNG::from_seed(b"modpowprod-batch");
        for &(k, width) in &[(5, 2), (7, 3), (40, 4), (100, 6)] {
            let m = modulus(&mut rng, 160);
            let bases: Vec<LargeInt> = (0..k).map(|_| LargeInt::random(160, &mut rng)).collect();
            let exps: Vec<LargeInt> = (0..k).map(|_| LargeInt::random(64, &mut rng)).collect();
            let mut mpp = ModPowProd::new(&bases, &m, width).unwrap();
            assert!(mpp.len() == k && mpp.width() == width);
            assert!(mpp.mod_pow_prod(&exps).unwrap()
                == ModPowProd::naive(&bases, &exps, &m).unwrap());
        }

        // 17 bases no longer exceed any limit.
        let m = LargeInt::from_u64(1009);
        let many: Vec<LargeInt> = (0..17).map(|i| LargeInt::from_u64(i + 2)).collect();
        let exps: Vec<LargeInt> = (0..17).map(|i| LargeInt::from_u64(3 * i + 1)).collect();
        let mut mpp = ModPowProd::new(&many, &m, 8).unwrap();
        assert!(mpp.mod_pow_prod(&exps).unwrap()
            == ModPowProd::naive(&many, &exps, &m).unwrap());
    }

    #[test]
    fn product_errors() {
        let m = LargeInt::from_u64(1009);
        let b = LargeInt::from_u64(5);
        assert!(ModPowProd::new(&[], &m, 4).unwrap_err() == Error::InvalidWidth);
        assert!(ModPowProd::new(&[b.clone()], &m, 0).unwrap_err() == Error::InvalidWidth);
        assert!(ModPowProd::new(&[b.clone()], &m, 17).unwrap_err() == Error::InvalidWidth);
        assert!(ModPowProd::new(&[b.clone()], &LargeInt::zero(), 1).unwrap_err()
            == Error::InvalidModulus);
        assert!(ModPowProd::new(&[-&b], &m, 1).unwrap_err() == Error::InvalidBasis);

        let mut mpp = ModPowProd::new(&[b.clone(), m.clone()], &m, 2).unwrap();
        assert!(mpp.mod_pow_prod(&[b.clone()]).unwrap_err() == Error::ExponentCount);
        assert!(mpp.mod_pow_prod(&[b.clone(), -&b]).unwrap_err() == Error::InvalidExponent);
        let zero = LargeInt::zero();
        assert!(mpp.mod_pow_prod(&[zero.clone(), zero.clone()]).unwrap().is_one());

        // Modulus 1: every product is zero.
        let mut mpp = ModPowProd::new(&[b.clone()], &LargeInt::one(), 1).unwrap();
        assert!(mpp.mod_pow_prod(&[zero]).unwrap().is_zero());
    }

    #[test]
    fn fixed_basis() {
        let mut rng = DRNG::from_seed(b"fixmodpow");
        for &(width, bits) in &[(1, 64), (2, 100), (4, 256), (5, 255), (8, 33), (16, 300)] {
            let m = modulus(&mut rng, 256);
            let g = LargeInt::random(256, &mut rng);
            let mut fmp = FixModPow::with_width(&g, &m, width, bits).unwrap();
            assert!(fmp.width() == width);
            assert!(fmp.slice_size() * width >= bits);
            for _ in 0..4 {
                let e = LargeInt::random(bits, &mut rng);
                assert!(fmp.fix_mod_pow(&e).unwrap() == g.mod_pow(&e, &m).unwrap());
            }

            // Exponents longer than the nominal bit length.
            let e = LargeInt::random(bits + 40, &mut rng);
            assert!(fmp.fix_mod_pow(&e).unwrap() == g.mod_pow(&e, &m).unwrap());
            let zero = LargeInt::zero();
            assert!(fmp.fix_mod_pow(&zero).unwrap() == LargeInt::one().modulo(&m).unwrap());
            assert!(fmp.fix_mod_pow(&LargeInt::from_i64(-1)).unwrap_err()
                == Error::InvalidExponent);
        }

        let m = LargeInt::from_u64(1009);
        let g = LargeInt::from_u64(11);
        assert!(FixModPow::with_width(&g, &m, 0, 10).unwrap_err() == Error::InvalidWidth);
        assert!(FixModPow::with_width(&g, &m, 17, 10).unwrap_err() == Error::InvalidWidth);
        assert!(FixModPow::with_width(&-&g, &m, 2, 10).unwrap_err() == Error::InvalidBasis);
        let mut fmp = FixModPow::new(&g, &m, 1000, 64).unwrap();
        let e = LargeInt::from_u64(0x1234_5678_9ABC_DEF0);
        assert!(fmp.fix_mod_pow(&e).unwrap() == g.mod_pow(&e, &m).unwrap());
    }

    #[test]
    fn width_selection() {
        // A single exponentiation does not pay for a large table; many
        // exponentiations do.
        let w1 = FixModPow::optimal_width(1, 2048);
        let w2 = FixModPow::optimal_width(100, 2048);
        let w3 = FixModPow::optimal_width(100000, 2048);
        assert!(w1 <= w2 && w2 <= w3);
        assert!(w3 > 4);
        assert!((1..=MAX_WIDTH).contains(&w1));
        assert!((1..=MAX_WIDTH).contains(&w3));
    }
}
