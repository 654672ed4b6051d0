//! Immutable arbitrary-precision integers.
//!
//! `LargeInt` is the public integer type. A value is a sign and a
//! magnitude, always stored in minimal representation; it is never
//! modified after construction, and every operation returns a fresh
//! value. Internally, operations size a signed container for the result,
//! run the corresponding `Li` (or kernel) routine, and normalize.
//!
//! Constructors are named after their input kind (`from_bytes()`,
//! `from_hex()`, `from_parts()`, `random()`...). Inputs are validated,
//! and invalid inputs are reported as an `Error` before any computation.
//!
//! Byte encodings are big-endian. `to_bytes()` / `from_bytes()` convey
//! the unsigned magnitude only; `to_signed_bytes()` /
//! `from_signed_bytes()` use two's complement and preserve the sign.
//! Hexadecimal strings are lowercase on output, with a leading `-` for
//! negative values, and accepted in either case on input.
//!
//! Shifts, `getbit()`, `bitlen()` and `slice()` operate on the
//! magnitude. A right shift of a negative value thus rounds toward zero.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::backend::{uli, Divisor, KaratsubaArena, Modulus, MASK, WORDSIZE};
use crate::li::Li;
use crate::{CryptoRng, Error, RngCore, String, Vec};

/// Strategy used by `LargeInt::mod_pow_with()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModPowMethod {
    /// Left-to-right square-and-multiply.
    Naive,
    /// Sliding windows over a table of odd powers.
    #[default]
    Windowed,
    /// Sliding windows with Montgomery products (odd moduli only).
    Montgomery,
}

/// Immutable signed integer.
#[derive(Clone)]
pub struct LargeInt {
    li: Li,
}

impl LargeInt {

    // Wraps a container, normalizing it.
    pub(crate) fn from_li(mut li: Li) -> Self {
        li.normalize();
        Self { li }
    }

    // Returns a copy of the value in a container of `len` limbs (at
    // least the current length).
    pub(crate) fn to_li(&self, len: usize) -> Li {
        let mut r = Li::with_len(core::cmp::max(len, self.li.len()));
        r.set_copy(&self.li);
        r
    }

    /// Returns the underlying signed container.
    pub fn as_li(&self) -> &Li {
        &self.li
    }

    // Number of limbs in the minimal representation.
    #[inline]
    fn limbs(&self) -> usize {
        self.li.len()
    }

    /// Returns zero.
    pub fn zero() -> Self {
        Self::from_li(Li::with_len(1))
    }

    /// Returns one.
    pub fn one() -> Self {
        Self::from_u64(1)
    }

    /// Creates a value from an unsigned 64-bit integer.
    pub fn from_u64(v: u64) -> Self {
        let mut x = uli::new((64 + WORDSIZE as usize - 1) / WORDSIZE as usize);
        uli::set_u64(&mut x, v);
        Self::from_li(Li::from_parts(1, x))
    }

    /// Creates a value from a signed 64-bit integer.
    pub fn from_i64(v: i64) -> Self {
        let r = Self::from_u64(v.unsigned_abs());
        if v < 0 { -r } else { r }
    }

    /// Decodes an unsigned big-endian byte sequence (an empty sequence
    /// yields zero).
    pub fn from_bytes(buf: &[u8]) -> Self {
        Self::from_li(Li::from_parts(1, uli::from_bytes_be(buf)))
    }

    /// Decodes a two's-complement big-endian byte sequence (an empty
    /// sequence yields zero).
    pub fn from_signed_bytes(buf: &[u8]) -> Self {
        if buf.is_empty() || (buf[0] & 0x80) == 0 {
            return Self::from_bytes(buf);
        }
        let mut t = buf.to_vec();
        negate_bytes(&mut t);
        Self::from_li(Li::from_parts(-1, uli::from_bytes_be(&t)))
    }

    /// Decodes a hexadecimal string, with an optional leading `-`. Digits
    /// may use either case; at least one digit is required.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let (neg, digits) = match s.strip_prefix('-') {
            Some(d) => (true, d),
            None => (false, s),
        };
        if digits.is_empty() {
            return Err(Error::InvalidHex);
        }
        let w = WORDSIZE as usize;
        let mut x = uli::new((digits.len() * 4 + w - 1) / w);
        let mut acc = 0u64;
        let mut acc_len = 0;
        let mut j = 0;
        for c in digits.bytes().rev() {
            let d = match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - (b'a' - 10),
                b'A'..=b'F' => c - (b'A' - 10),
                _ => return Err(Error::InvalidHex),
            };
            acc |= (d as u64) << acc_len;
            acc_len += 4;
            if acc_len >= w {
                x[j] = (acc as u32) & MASK;
                j += 1;
                acc >>= w;
                acc_len -= w;
            }
        }
        if acc_len > 0 {
            x[j] = acc as u32;
        }
        let r = Self::from_li(Li::from_parts(1, x));
        Ok(if neg { -r } else { r })
    }

    /// Creates a value from a sign (-1, 0 or +1) and a magnitude (least
    /// significant limb first). Every limb must be lower than
    /// `2^WORDSIZE`, and the sign must be zero if and only if the
    /// magnitude is zero.
    pub fn from_parts(sign: i32, limbs: &[u32]) -> Result<Self, Error> {
        if !(-1..=1).contains(&sign) || limbs.iter().any(|&l| l > MASK) {
            return Err(Error::InvalidRepresentation);
        }
        if (sign == 0) != uli::iszero(limbs) {
            return Err(Error::InvalidRepresentation);
        }
        let mut v = limbs.to_vec();
        if v.is_empty() {
            v.push(0);
        }
        Ok(Self::from_li(Li::from_parts(sign, v)))
    }

    /// Samples a uniform integer in `[0, 2^bit_len)` from the provided
    /// byte source.
    pub fn random<T: CryptoRng + RngCore>(bit_len: usize, rng: &mut T) -> Self {
        let mut buf = vec![0u8; (bit_len + 7) >> 3];
        rng.fill_bytes(&mut buf);
        if (bit_len & 7) != 0 {
            buf[0] &= (1u8 << (bit_len & 7)) - 1;
        }
        Self::from_bytes(&buf)
    }

    /// Encodes the magnitude as unsigned big-endian bytes, with minimal
    /// length (a single zero byte for zero).
    pub fn to_bytes(&self) -> Vec<u8> {
        uli::to_bytes_be(&self.li.value)
    }

    /// Encodes the value in two's-complement big-endian, with minimal
    /// length (the top bit of the first byte is the sign).
    pub fn to_signed_bytes(&self) -> Vec<u8> {
        let mut buf = self.to_bytes();
        if self.li.sign >= 0 {
            if (buf[0] & 0x80) != 0 {
                buf.insert(0, 0);
            }
        } else {
            negate_bytes(&mut buf);
            if (buf[0] & 0x80) == 0 {
                buf.insert(0, 0xFF);
            }
        }
        buf
    }

    /// Encodes the value in lowercase hexadecimal, without leading zeros
    /// ("0" for zero), with a leading `-` for negative values.
    pub fn to_hex(&self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut s = String::new();
        if self.li.sign < 0 {
            s.push('-');
        }
        let buf = self.to_bytes();
        let mut started = false;
        for &b in buf.iter() {
            for d in [b >> 4, b & 0x0F] {
                if d != 0 || started {
                    s.push(HEX[d as usize] as char);
                    started = true;
                }
            }
        }
        if !started {
            s.push('0');
        }
        s
    }

    /// Returns the sign (-1, 0 or +1).
    pub fn sign(&self) -> i32 {
        self.li.sign
    }

    /// Returns `true` if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.li.sign == 0
    }

    /// Returns `true` if the value is one.
    pub fn is_one(&self) -> bool {
        self.li.is_one()
    }

    /// Returns `true` if the value is odd.
    pub fn is_odd(&self) -> bool {
        self.li.is_odd()
    }

    /// Returns the bit length of the magnitude (0 for zero).
    pub fn bitlen(&self) -> usize {
        uli::bitlen(&self.li.value)
    }

    /// Returns bit `i` of the magnitude (0 or 1).
    pub fn getbit(&self, i: usize) -> u32 {
        uli::getbit(&self.li.value, i)
    }

    /// Compares with another value; returns -1, 0 or +1.
    pub fn cmp(&self, y: &Self) -> i32 {
        self.li.cmp(&y.li)
    }

    /// Returns `-self`.
    pub fn neg(&self) -> Self {
        let mut r = self.li.clone();
        r.neg_in();
        Self { li: r }
    }

    /// Returns `|self|`.
    pub fn abs(&self) -> Self {
        let mut r = self.li.clone();
        r.sign = r.sign.abs();
        Self { li: r }
    }

    /// Returns `self + y`.
    pub fn add(&self, y: &Self) -> Self {
        let mut r = self.to_li(core::cmp::max(self.limbs(), y.limbs()) + 1);
        r.add_in(&y.li);
        Self::from_li(r)
    }

    /// Returns `self - y`.
    pub fn sub(&self, y: &Self) -> Self {
        let mut r = self.to_li(core::cmp::max(self.limbs(), y.limbs()) + 1);
        r.sub_in(&y.li);
        Self::from_li(r)
    }

    /// Returns `self*y`.
    pub fn mul(&self, y: &Self) -> Self {
        let mut r = Li::with_len(self.limbs() + y.limbs());
        let mut arena = KaratsubaArena::new(core::cmp::max(self.limbs(), y.limbs()));
        r.set_mul(&self.li, &y.li, &mut arena);
        Self::from_li(r)
    }

    /// Returns `self^2`.
    pub fn square(&self) -> Self {
        let mut r = Li::with_len(2 * self.limbs());
        let mut arena = KaratsubaArena::new(self.limbs());
        r.set_square(&self.li, &mut arena);
        Self::from_li(r)
    }

    /// Returns the quotient and remainder of the division by `d`, with
    /// the floor convention: `self = q*d + r`, with `r` of the sign of
    /// `d` (hence non-negative for a positive divisor) and `|r| < |d|`.
    pub fn div_rem(&self, d: &Self) -> Result<(Self, Self), Error> {
        if d.is_zero() {
            return Err(Error::DivideByZero);
        }
        let mut q = Li::with_len(self.limbs() + 1);
        let mut r = Li::with_len(core::cmp::max(self.limbs(), d.limbs()));
        let mut div = Divisor::new(&d.li.value);
        Li::div_qr(&mut q, &mut r, &self.li, &d.li, &mut div);
        Ok((Self::from_li(q), Self::from_li(r)))
    }

    /// Returns the (floor) quotient of the division by `d`.
    pub fn div(&self, d: &Self) -> Result<Self, Error> {
        Ok(self.div_rem(d)?.0)
    }

    /// Returns the (floor) remainder of the division by `d`.
    pub fn rem(&self, d: &Self) -> Result<Self, Error> {
        Ok(self.div_rem(d)?.1)
    }

    // Checks that m is a valid modulus.
    fn check_modulus(m: &Self) -> Result<(), Error> {
        if m.li.sign <= 0 {
            return Err(Error::InvalidModulus);
        }
        Ok(())
    }

    // Checks that p is a valid odd modulus.
    fn check_odd_modulus(p: &Self) -> Result<(), Error> {
        Self::check_modulus(p)?;
        if !p.is_odd() {
            return Err(Error::EvenModulus);
        }
        Ok(())
    }

    /// Returns `self mod m`, in `[0, m)`. The modulus must be positive.
    pub fn modulo(&self, m: &Self) -> Result<Self, Error> {
        Self::check_modulus(m)?;
        let mut r = Li::with_len(core::cmp::max(self.limbs(), m.limbs()));
        let mut div = Divisor::new(&m.li.value);
        Li::set_mod(&mut r, &self.li, &m.li, &mut div);
        Ok(Self::from_li(r))
    }

    /// Returns `(self + y) mod m`.
    pub fn mod_add(&self, y: &Self, m: &Self) -> Result<Self, Error> {
        Self::check_modulus(m)?;
        self.add(y).modulo(m)
    }

    /// Returns `(self - y) mod m`.
    pub fn mod_sub(&self, y: &Self, m: &Self) -> Result<Self, Error> {
        Self::check_modulus(m)?;
        self.sub(y).modulo(m)
    }

    /// Returns `(self*y) mod m`.
    pub fn mod_mul(&self, y: &Self, m: &Self) -> Result<Self, Error> {
        Self::check_modulus(m)?;
        self.mul(y).modulo(m)
    }

    /// Returns `self^e mod m`, with the default (windowed) method.
    pub fn mod_pow(&self, e: &Self, m: &Self) -> Result<Self, Error> {
        self.mod_pow_with(e, m, ModPowMethod::default())
    }

    /// Returns `self^e mod m` with the provided method. The modulus must
    /// be positive (and odd for the Montgomery method), the basis and the
    /// exponent non-negative. `x^0 mod 1 = 0`, `x^0 mod m = 1` for `m > 1`
    /// and `0^e mod m = 0` for `e > 0`.
    pub fn mod_pow_with(&self, e: &Self, m: &Self, method: ModPowMethod)
        -> Result<Self, Error>
    {
        Self::check_modulus(m)?;
        if self.li.sign < 0 {
            return Err(Error::InvalidBasis);
        }
        if e.li.sign < 0 {
            return Err(Error::InvalidExponent);
        }
        if method == ModPowMethod::Montgomery && !m.is_odd() {
            return Err(Error::EvenModulus);
        }

        if m.is_one() {
            return Ok(Self::zero());
        }
        if e.is_zero() {
            return Ok(Self::one());
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }

        let mut md = Modulus::new(&m.li.value);
        let mut w = uli::new(md.len());
        match method {
            ModPowMethod::Naive => md.pow_naive(&mut w, &self.li.value, &e.li.value),
            ModPowMethod::Windowed => md.pow_window(&mut w, &self.li.value, &e.li.value),
            ModPowMethod::Montgomery => md.pow_mont(&mut w, &self.li.value, &e.li.value),
        }
        Ok(Self::from_li(Li::from_parts(1, w)))
    }

    /// Returns the inverse of this value modulo `m`, in `[0, m)`.
    pub fn mod_inv(&self, m: &Self) -> Result<Self, Error> {
        Self::check_modulus(m)?;
        if m.is_one() {
            return Ok(Self::zero());
        }
        let mut w = Li::with_len(m.limbs());
        if !Li::modinv(&mut w, &self.li, &m.li) {
            return Err(Error::NotInvertible);
        }
        Ok(Self::from_li(w))
    }

    /// Returns the Legendre symbol of this value modulo the odd prime
    /// `p` (0, 1 or -1). Primality of `p` is not verified.
    pub fn legendre(&self, p: &Self) -> Result<i32, Error> {
        Self::check_odd_modulus(p)?;
        Ok(Li::legendre(&self.li, &p.li))
    }

    /// Returns a square root of this value modulo the odd prime `p`.
    /// Primality of `p` is not verified: with a composite `p` the call
    /// still terminates, and may report `NotQuadraticResidue` for a value
    /// that has a root. Modulo 1, the root is zero.
    pub fn mod_sqrt(&self, p: &Self) -> Result<Self, Error> {
        Self::check_odd_modulus(p)?;
        let mut w = Li::with_len(p.limbs());
        if !Li::modsqrt(&mut w, &self.li, &p.li) {
            return Err(Error::NotQuadraticResidue);
        }
        Ok(Self::from_li(w))
    }

    /// Returns the value with its magnitude shifted left by `bits` bits.
    pub fn shl(&self, bits: usize) -> Self {
        let w = WORDSIZE as usize;
        let mut r = self.to_li(self.limbs() + (bits + w - 1) / w);
        r.shl(bits);
        Self::from_li(r)
    }

    /// Returns the value with its magnitude shifted right by `bits` bits.
    pub fn shr(&self, bits: usize) -> Self {
        let mut r = self.li.clone();
        r.shr(bits);
        Self::from_li(r)
    }

    /// Returns the bits `bit_start` (inclusive) to `bit_end` (exclusive)
    /// of the magnitude, as a non-negative value. An empty range yields
    /// zero.
    pub fn slice(&self, bit_start: usize, bit_end: usize) -> Self {
        if bit_end <= bit_start {
            return Self::zero();
        }
        let mut r = self.li.value.clone();
        uli::truncate_bits(&mut r, bit_end);
        uli::shr(&mut r, bit_start);
        Self::from_li(Li::from_parts(1, r))
    }
}

// Two's-complement negation of a big-endian byte sequence, in place.
fn negate_bytes(buf: &mut [u8]) {
    let mut cc = 1u16;
    for b in buf.iter_mut().rev() {
        let z = ((!*b) as u16) + cc;
        *b = z as u8;
        cc = z >> 8;
    }
}

impl PartialEq for LargeInt {
    fn eq(&self, other: &Self) -> bool {
        LargeInt::cmp(self, other) == 0
    }
}

impl Eq for LargeInt { }

impl PartialOrd for LargeInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl Ord for LargeInt {
    fn cmp(&self, other: &Self) -> Ordering {
        LargeInt::cmp(self, other).cmp(&0)
    }
}

impl fmt::Display for LargeInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for LargeInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LargeInt({})", self.to_hex())
    }
}

impl Default for LargeInt {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for LargeInt {
    fn from(v: u64) -> Self {
        Self::from_u64(v)
    }
}

impl From<i64> for LargeInt {
    fn from(v: i64) -> Self {
        Self::from_i64(v)
    }
}

impl Add<LargeInt> for LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn add(self, other: LargeInt) -> LargeInt {
        LargeInt::add(&self, &other)
    }
}

impl Add<&LargeInt> for LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn add(self, other: &LargeInt) -> LargeInt {
        LargeInt::add(&self, other)
    }
}

impl Add<LargeInt> for &LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn add(self, other: LargeInt) -> LargeInt {
        LargeInt::add(self, &other)
    }
}

impl Add<&LargeInt> for &LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn add(self, other: &LargeInt) -> LargeInt {
        LargeInt::add(self, other)
    }
}

impl AddAssign<LargeInt> for LargeInt {
    #[inline(always)]
    fn add_assign(&mut self, other: LargeInt) {
        *self = LargeInt::add(self, &other);
    }
}

impl AddAssign<&LargeInt> for LargeInt {
    #[inline(always)]
    fn add_assign(&mut self, other: &LargeInt) {
        *self = LargeInt::add(self, other);
    }
}

impl Sub<LargeInt> for LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn sub(self, other: LargeInt) -> LargeInt {
        LargeInt::sub(&self, &other)
    }
}

impl Sub<&LargeInt> for LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn sub(self, other: &LargeInt) -> LargeInt {
        LargeInt::sub(&self, other)
    }
}

impl Sub<LargeInt> for &LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn sub(self, other: LargeInt) -> LargeInt {
        LargeInt::sub(self, &other)
    }
}

impl Sub<&LargeInt> for &LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn sub(self, other: &LargeInt) -> LargeInt {
        LargeInt::sub(self, other)
    }
}

impl SubAssign<LargeInt> for LargeInt {
    #[inline(always)]
    fn sub_assign(&mut self, other: LargeInt) {
        *self = LargeInt::sub(self, &other);
    }
}

impl SubAssign<&LargeInt> for LargeInt {
    #[inline(always)]
    fn sub_assign(&mut self, other: &LargeInt) {
        *self = LargeInt::sub(self, other);
    }
}

impl Mul<LargeInt> for LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn mul(self, other: LargeInt) -> LargeInt {
        LargeInt::mul(&self, &other)
    }
}

impl Mul<&LargeInt> for LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn mul(self, other: &LargeInt) -> LargeInt {
        LargeInt::mul(&self, other)
    }
}

impl Mul<LargeInt> for &LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn mul(self, other: LargeInt) -> LargeInt {
        LargeInt::mul(self, &other)
    }
}

impl Mul<&LargeInt> for &LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn mul(self, other: &LargeInt) -> LargeInt {
        LargeInt::mul(self, other)
    }
}

impl MulAssign<LargeInt> for LargeInt {
    #[inline(always)]
    fn mul_assign(&mut self, other: LargeInt) {
        *self = LargeInt::mul(self, &other);
    }
}

impl MulAssign<&LargeInt> for LargeInt {
    #[inline(always)]
    fn mul_assign(&mut self, other: &LargeInt) {
        *self = LargeInt::mul(self, other);
    }
}

impl Neg for LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn neg(self) -> LargeInt {
        LargeInt::neg(&self)
    }
}

impl Neg for &LargeInt {
    type Output = LargeInt;

    #[inline(always)]
    fn neg(self) -> LargeInt {
        LargeInt::neg(self)
    }
}
