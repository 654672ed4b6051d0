//! Multi-precision integer kernel.
//!
//! Integers are handled at this level as slices of `u32` limbs, least
//! significant limb first. Each limb holds exactly `WORDSIZE` bits of
//! magnitude; the upper bits of every `u32` are always zero. Keeping the
//! limbs a few bits shorter than the native word means that carries,
//! borrows and the high halves of products always fit in plain `u32` and
//! `u64` values, so no intrinsics are needed anywhere.
//!
//! The limb width is selected at compile-time:
//!
//!  - feature `w26` selects 26-bit limbs;
//!  - feature `w30` selects 30-bit limbs;
//!  - if neither is set, 28-bit limbs are used.
//!
//! The functions in this module and its submodules do not validate their
//! inputs. Destination slices MUST be large enough for the result, and
//! operands MUST be non-negative (i.e. every limb in `[0, 2^WORDSIZE)`)
//! unless documented otherwise; violating this yields unspecified results.
//! Nothing here is constant-time.
//!
//! Submodules:
//!
//!  - `uli`: basic operations (comparisons, shifts, additions,
//!    subtractions, two's-complement negation, schoolbook products).
//!
//!  - `karatsuba`: Karatsuba multiplication and squaring, with explicit
//!    per-depth scratch buffers (`KaratsubaArena`).
//!
//!  - `div`: reciprocal-based (3-by-2) long division (`Divisor`).
//!
//!  - `modulus`: per-modulus context (`Modulus`) with modular
//!    multiplication, the three exponentiation strategies, Montgomery
//!    arithmetic and simultaneous-exponentiation tables.

#[cfg(all(
    feature = "w26",
    feature = "w30",
))]
compile_error!("cannot use 26-bit and 30-bit limbs simultaneously");

/// Number of bits stored in each limb.
#[cfg(feature = "w26")]
pub const WORDSIZE: u32 = 26;

/// Number of bits stored in each limb.
#[cfg(feature = "w30")]
pub const WORDSIZE: u32 = 30;

/// Number of bits stored in each limb.
#[cfg(not(any(feature = "w26", feature = "w30")))]
pub const WORDSIZE: u32 = 28;

/// Mask for the `WORDSIZE` low bits of a limb.
pub const MASK: u32 = (1u32 << WORDSIZE) - 1;

/// Top bit of a limb (used as sign bit in two's-complement views).
pub const TOPBIT: u32 = 1u32 << (WORDSIZE - 1);

pub mod uli;
pub mod karatsuba;
pub mod div;
pub mod modulus;

pub use div::Divisor;
pub use karatsuba::KaratsubaArena;
pub use modulus::Modulus;

// Add with carry; carry is 0 or 1.
// (x, y, c_in) -> x + y + c_in mod 2^WORDSIZE, c_out
#[inline(always)]
pub(crate) const fn addcarry(x: u32, y: u32, c: u32) -> (u32, u32) {
    let z = x + y + c;
    (z & MASK, z >> WORDSIZE)
}

// Subtract with borrow; borrow is 0 or 1.
// (x, y, c_in) -> x - y - c_in mod 2^WORDSIZE, c_out
#[inline(always)]
pub(crate) const fn subborrow(x: u32, y: u32, c: u32) -> (u32, u32) {
    let z = x.wrapping_sub(y).wrapping_sub(c);
    (z & MASK, z >> 31)
}

// Compute x*y+z1+z2, returned as two limbs (lo, hi). If all inputs are
// lower than 2^WORDSIZE, then so is hi.
#[inline(always)]
pub(crate) const fn umull_add2(x: u32, y: u32, z1: u32, z2: u32) -> (u32, u32) {
    let t = (x as u64) * (y as u64) + (z1 as u64) + (z2 as u64);
    ((t as u32) & MASK, (t >> WORDSIZE) as u32)
}

// Given an odd limb x, return -1/x mod 2^WORDSIZE.
pub(crate) const fn ninv(x: u32) -> u32 {
    let y = 2u32.wrapping_sub(x);
    let y = y.wrapping_mul(2u32.wrapping_sub(y.wrapping_mul(x)));
    let y = y.wrapping_mul(2u32.wrapping_sub(y.wrapping_mul(x)));
    let y = y.wrapping_mul(2u32.wrapping_sub(y.wrapping_mul(x)));
    let y = y.wrapping_mul(2u32.wrapping_sub(y.wrapping_mul(x)));
    y.wrapping_neg() & MASK
}
