//! Signed container layer.
//!
//! An `Li` is a sign (-1, 0 or +1) and a magnitude limb array of fixed
//! capacity. All operations write into a caller-provided destination
//! (usually `self`) and never grow it: the caller sizes each container
//! for the largest value it will hold. The sign is 0 if and only if the
//! magnitude is zero; every operation restores that invariant on exit.
//!
//! This layer does not report errors. Operations whose result may not
//! exist (modular inverse, square root) return a `bool`; other
//! preconditions (capacities, positive or odd moduli) are the caller's
//! responsibility.

use crate::backend::{uli, karatsuba, Divisor, KaratsubaArena, Modulus};
use crate::backend::uli::TwosComplement;
use crate::Vec;

/// Signed integer with a fixed-capacity magnitude.
#[derive(Clone, Debug)]
pub struct Li {
    pub(crate) sign: i32,
    pub(crate) value: Vec<u32>,
}

impl Li {

    /// Creates a zero value with room for `len` limbs.
    pub fn with_len(len: usize) -> Self {
        Self { sign: 0, value: uli::new(len) }
    }

    /// Creates a value from a sign and a magnitude. Only the sign of
    /// `sign` matters; a zero magnitude always yields sign 0, and a
    /// non-zero magnitude with sign 0 is read as positive.
    pub fn from_parts(sign: i32, value: Vec<u32>) -> Self {
        let mut x = Self { sign: sign.signum(), value };
        if x.sign == 0 && !uli::iszero(&x.value) {
            x.sign = 1;
        }
        x.fix_sign();
        x
    }

    /// Returns the sign (-1, 0 or +1).
    #[inline]
    pub fn sign(&self) -> i32 {
        self.sign
    }

    /// Returns the magnitude limbs (full capacity).
    #[inline]
    pub fn value(&self) -> &[u32] {
        &self.value
    }

    /// Returns the capacity, in limbs.
    #[inline]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns `true` if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.sign == 0
    }

    /// Returns `true` if the value is odd.
    #[inline]
    pub fn is_odd(&self) -> bool {
        uli::getbit(&self.value, 0) != 0
    }

    /// Returns `true` if the value is 1.
    pub fn is_one(&self) -> bool {
        self.sign == 1 && uli::siglen(&self.value) == 1 && self.value[0] == 1
    }

    /// Changes the capacity; upper limbs are dropped if shrinking.
    pub fn resize(&mut self, len: usize) {
        uli::resize(&mut self.value, len);
        self.fix_sign();
    }

    /// Shrinks the capacity to the minimal representation (see
    /// `uli::normalize()`).
    pub fn normalize(&mut self) {
        uli::normalize(&mut self.value);
        self.fix_sign();
    }

    #[inline]
    fn fix_sign(&mut self) {
        if uli::iszero(&self.value) {
            self.sign = 0;
        }
    }

    /// Sets this value to zero.
    pub fn set_zero(&mut self) {
        uli::set_zero(&mut self.value);
        self.sign = 0;
    }

    /// Sets this value to `v`.
    pub fn set_i32(&mut self, v: i32) {
        uli::set_u64(&mut self.value, v.unsigned_abs() as u64);
        self.sign = v.signum();
    }

    /// Sets this value to `x`. The destination capacity is unchanged.
    pub fn set_copy(&mut self, x: &Li) {
        uli::copy(&mut self.value, &x.value);
        self.sign = x.sign;
        self.fix_sign();
    }

    /// Compares two signed values; returns -1, 0 or +1.
    pub fn cmp(&self, y: &Li) -> i32 {
        if self.sign != y.sign {
            return if self.sign < y.sign { -1 } else { 1 };
        }
        self.sign * uli::cmp(&self.value, &y.value)
    }

    /// Compares the magnitudes of two values; returns -1, 0 or +1.
    pub fn cmp_abs(&self, y: &Li) -> i32 {
        uli::cmp(&self.value, &y.value)
    }

    /// Sets this value to `-x`.
    pub fn set_neg(&mut self, x: &Li) {
        self.set_copy(x);
        self.sign = -self.sign;
    }

    /// Negates this value in place.
    pub fn neg_in(&mut self) {
        self.sign = -self.sign;
    }

    /// Sets this value to `|x|`.
    pub fn set_abs(&mut self, x: &Li) {
        self.set_copy(x);
        self.sign = self.sign.abs();
    }

    // self <- self + ysign*|y|
    fn add_signed_in(&mut self, y: &Li, ysign: i32) {
        if ysign == 0 {
            return;
        }
        if self.sign == 0 {
            uli::copy(&mut self.value, &y.value);
            self.sign = ysign;
            return;
        }
        if self.sign == ysign {
            uli::add_in(&mut self.value, &y.value);
            return;
        }
        let tc = TwosComplement::sub_in(&mut self.value, &y.value);
        match tc.into_magnitude() {
            0 => self.sign = 0,
            -1 => self.sign = ysign,
            _ => { }
        }
    }

    /// Adds `y` to this value.
    pub fn add_in(&mut self, y: &Li) {
        self.add_signed_in(y, y.sign);
    }

    /// Subtracts `y` from this value.
    pub fn sub_in(&mut self, y: &Li) {
        self.add_signed_in(y, -y.sign);
    }

    /// Sets this value to `x + y`.
    pub fn set_add(&mut self, x: &Li, y: &Li) {
        self.set_copy(x);
        self.add_in(y);
    }

    /// Sets this value to `x - y`.
    pub fn set_sub(&mut self, x: &Li, y: &Li) {
        self.set_copy(x);
        self.sub_in(y);
    }

    /// Sets this value to `x*y`. Capacity MUST be at least the sum of the
    /// significant lengths of the operands.
    pub fn set_mul(&mut self, x: &Li, y: &Li, arena: &mut KaratsubaArena) {
        if x.sign == 0 || y.sign == 0 {
            self.set_zero();
            return;
        }
        karatsuba::mul(&mut self.value, &x.value, &y.value, arena);
        self.sign = x.sign * y.sign;
    }

    /// Sets this value to `x^2`.
    pub fn set_square(&mut self, x: &Li, arena: &mut KaratsubaArena) {
        if x.sign == 0 {
            self.set_zero();
            return;
        }
        karatsuba::square(&mut self.value, &x.value, arena);
        self.sign = 1;
    }

    /// Multiplies this value by the small non-negative constant `k`.
    pub fn mul_word_in(&mut self, k: u32) {
        uli::mul_word_in(&mut self.value, k);
        self.fix_sign();
    }

    /// Shifts the magnitude left by `bits` bits (the sign is kept).
    pub fn shl(&mut self, bits: usize) {
        uli::shl(&mut self.value, bits);
        self.fix_sign();
    }

    /// Shifts the magnitude right by `bits` bits (the sign is kept unless
    /// the result is zero).
    pub fn shr(&mut self, bits: usize) {
        uli::shr(&mut self.value, bits);
        self.fix_sign();
    }

    /// Reduces this value modulo the (positive) divisor value, into
    /// `[0, d)`. Capacity MUST be at least the divisor length.
    pub fn reduce_in(&mut self, div: &mut Divisor) {
        if self.sign == 0 {
            return;
        }
        div.reduce(&mut self.value);
        if uli::iszero(&self.value) {
            self.sign = 0;
        } else if self.sign < 0 {
            // d - r, computed as -r + d over the full width.
            uli::neg_in(&mut self.value);
            uli::add_in(&mut self.value, div.value());
            self.sign = 1;
        }
    }

    /// Sets `r = x mod m` with `m > 0`, in `[0, m)`. `div` is updated
    /// to `m` if needed.
    pub fn set_mod(r: &mut Li, x: &Li, m: &Li, div: &mut Divisor) {
        div.update(&m.value);
        r.set_copy(x);
        r.reduce_in(div);
    }

    /// Division with the floor convention: `x = q*d + r`, with `r` of the
    /// sign of `d` and `|r| < |d|`. `d` MUST NOT be zero. `q` needs
    /// room for the quotient magnitude plus one limb, `r` for both `x`
    /// and `d`.
    pub fn div_qr(q: &mut Li, r: &mut Li, x: &Li, d: &Li, div: &mut Divisor) {
        div.update(&d.value);
        r.set_copy(x);
        div.div_qr(&mut q.value, &mut r.value);
        let sx = x.sign;
        let sd = d.sign;
        q.sign = sx * sd;
        q.fix_sign();
        r.sign = sx;
        r.fix_sign();
        if r.sign != 0 && sx != sd {
            // q <- -(|q| + 1), r <- sd*(|d| - |r|)
            uli::add_in(&mut q.value, &[1]);
            q.sign = -1;
            uli::neg_in(&mut r.value);
            uli::add_in(&mut r.value, div.value());
            r.sign = sd;
        }
    }

    /// Sets `g = gcd(a, b)` and `u`, `v` such that `u*a + v*b = g`, for
    /// non-negative `a` and `b` (binary extended GCD). Destinations need
    /// room for the longer operand plus two limbs.
    pub fn egcd(g: &mut Li, u: &mut Li, v: &mut Li, a: &Li, b: &Li) {
        if a.sign == 0 || b.sign == 0 {
            if a.sign == 0 {
                g.set_abs(b);
                u.set_zero();
                v.set_i32(if b.sign == 0 { 0 } else { 1 });
            } else {
                g.set_abs(a);
                u.set_i32(1);
                v.set_zero();
            }
            return;
        }

        let len = core::cmp::max(
            uli::siglen(&a.value), uli::siglen(&b.value)) + 2;
        let mut x = Li::with_len(len);
        let mut y = Li::with_len(len);
        x.set_abs(a);
        y.set_abs(b);

        // Common factor 2^k.
        let mut k = 0;
        while !x.is_odd() && !y.is_odd() {
            x.shr(1);
            y.shr(1);
            k += 1;
        }

        let mut uu = x.clone();
        let mut vv = y.clone();
        let mut ca = Li::with_len(len);
        let mut cb = Li::with_len(len);
        let mut cc = Li::with_len(len);
        let mut cd = Li::with_len(len);
        ca.set_i32(1);
        cd.set_i32(1);

        // Invariants: ca*x + cb*y = uu, cc*x + cd*y = vv.
        loop {
            while uu.sign != 0 && !uu.is_odd() {
                uu.shr(1);
                if ca.is_odd() || cb.is_odd() {
                    ca.add_in(&y);
                    cb.sub_in(&x);
                }
                ca.shr(1);
                cb.shr(1);
            }
            while !vv.is_odd() {
                vv.shr(1);
                if cc.is_odd() || cd.is_odd() {
                    cc.add_in(&y);
                    cd.sub_in(&x);
                }
                cc.shr(1);
                cd.shr(1);
            }
            if uu.cmp(&vv) >= 0 {
                uu.sub_in(&vv);
                ca.sub_in(&cc);
                cb.sub_in(&cd);
            } else {
                vv.sub_in(&uu);
                cc.sub_in(&ca);
                cd.sub_in(&cb);
            }
            if uu.sign == 0 {
                break;
            }
        }

        g.set_copy(&vv);
        g.shl(k);
        u.set_copy(&cc);
        v.set_copy(&cd);
    }

    /// Sets `w = x^-1 mod m` (in `[0, m)`), for `m > 1`. Returns `false`
    /// (and sets `w` to zero) if `x` is not invertible.
    pub fn modinv(w: &mut Li, x: &Li, m: &Li) -> bool {
        let len = core::cmp::max(uli::siglen(&x.value), uli::siglen(&m.value)) + 2;
        let mut div = Divisor::new(&m.value);
        let mut xr = Li::with_len(len);
        xr.set_copy(x);
        xr.reduce_in(&mut div);
        let mut g = Li::with_len(len);
        let mut u = Li::with_len(len);
        let mut v = Li::with_len(len);
        Li::egcd(&mut g, &mut u, &mut v, &xr, m);
        if !g.is_one() {
            w.set_zero();
            return false;
        }
        u.reduce_in(&mut div);
        w.set_copy(&u);
        true
    }

    /// Returns the Legendre symbol of `x` modulo the odd prime `p`:
    /// 0 if `p` divides `x`, 1 if `x` is a non-zero square, -1 otherwise.
    pub fn legendre(x: &Li, p: &Li) -> i32 {
        let len = core::cmp::max(uli::siglen(&x.value), uli::siglen(&p.value)) + 1;
        let mut div = Divisor::new(&p.value);
        let mut a = Li::with_len(len);
        a.set_copy(x);
        a.reduce_in(&mut div);
        let mut n = Li::with_len(len);
        n.set_copy(p);

        let mut t = 1;
        while a.sign != 0 {
            while !a.is_odd() {
                a.shr(1);
                let r = n.value[0] & 7;
                if r == 3 || r == 5 {
                    t = -t;
                }
            }
            core::mem::swap(&mut a, &mut n);
            if (a.value[0] & 3) == 3 && (n.value[0] & 3) == 3 {
                t = -t;
            }
            div.update(&n.value);
            a.reduce_in(&mut div);
        }
        if n.is_one() { t } else { 0 }
    }

    /// Sets `w` to a square root of `x` modulo the odd prime `p`
    /// (Tonelli-Shanks). Returns `false` (and sets `w` to zero) if `x`
    /// is not a square modulo `p`.
    ///
    /// Primality of `p` is not verified. For a composite odd `p` the
    /// function always terminates, and a returned root is always
    /// correct, but `false` may be returned even when a root exists.
    pub fn modsqrt(w: &mut Li, x: &Li, p: &Li) -> bool {
        w.set_zero();
        if p.is_one() {
            return true;
        }

        let n = uli::siglen(&p.value);
        let mut md = Modulus::new(&p.value);
        let mut xr = Li::with_len(core::cmp::max(uli::siglen(&x.value), n));
        xr.set_copy(x);
        xr.reduce_in(md.divisor());
        if xr.sign == 0 {
            return true;
        }
        if Li::legendre(&xr, p) != 1 {
            return false;
        }
        let a = xr.value[..n].to_vec();
        let mut r = uli::new(n);

        if (p.value[0] & 3) == 3 {
            // r = a^((p+1)/4)
            let mut e = p.value[..n].to_vec();
            e.push(0);
            uli::add_in(&mut e, &[1]);
            uli::shr(&mut e, 2);
            md.pow_window(&mut r, &a, &e);
        } else {
            // p - 1 = q*2^s, with q odd (p >= 5 here).
            let mut q = p.value[..n].to_vec();
            uli::sub_in(&mut q, &[1]);
            let mut s = 0;
            while uli::getbit(&q, 0) == 0 {
                uli::shr(&mut q, 1);
                s += 1;
            }

            // Smallest non-residue; a perfect square p has none.
            let mut z = Li::with_len(n + 1);
            let mut zv = 2;
            loop {
                z.set_i32(zv);
                if Li::cmp(&z, p) >= 0 {
                    return false;
                }
                if Li::legendre(&z, p) == -1 {
                    break;
                }
                zv += 1;
            }

            let mut c = uli::new(n);
            md.pow_window(&mut c, &z.value, &q);
            let mut t = uli::new(n);
            md.pow_window(&mut t, &a, &q);
            let mut e = q.clone();
            e.push(0);
            uli::add_in(&mut e, &[1]);
            uli::shr(&mut e, 1);
            md.pow_window(&mut r, &a, &e);

            let mut m = s;
            let mut tmp = uli::new(n);
            loop {
                if uli::siglen(&t) == 1 && t[0] == 1 {
                    break;
                }
                // Least i such that t^(2^i) = 1 (0 < i < m).
                let mut i = 0;
                uli::copy(&mut tmp, &t);
                while !(uli::siglen(&tmp) == 1 && tmp[0] == 1) {
                    i += 1;
                    if i >= m {
                        return false;
                    }
                    let sq = tmp.clone();
                    md.square(&mut tmp, &sq);
                }
                let mut b = c.clone();
                for _ in 0..(m - i - 1) {
                    md.square(&mut tmp, &b);
                    core::mem::swap(&mut b, &mut tmp);
                }
                md.mul(&mut tmp, &r, &b);
                core::mem::swap(&mut r, &mut tmp);
                md.square(&mut c, &b);
                md.mul(&mut tmp, &t, &c);
                core::mem::swap(&mut t, &mut tmp);
                m = i;
            }
        }

        // Composite moduli can pass the symbol test without a root.
        let mut chk = uli::new(n);
        md.square(&mut chk, &r);
        if uli::cmp(&chk, &a) != 0 {
            return false;
        }

        uli::copy(&mut w.value, &r);
        w.sign = 1;
        w.fix_sign();
        true
    }
}

impl PartialEq for Li {
    fn eq(&self, other: &Self) -> bool {
        Li::cmp(self, other) == 0
    }
}

impl Eq for Li { }

/// Montgomery context for a fixed odd modulus. The Montgomery constant
/// and the scratch space are owned by the instance; one context should
/// be kept per modulus.
#[derive(Clone, Debug)]
pub struct MontContext {
    md: Modulus,
}

impl MontContext {

    /// Creates a context for the odd modulus `m` (which MUST be positive
    /// and odd).
    pub fn new(m: &Li) -> Self {
        debug_assert!(m.sign > 0 && m.is_odd());
        Self { md: Modulus::new(&m.value) }
    }

    /// Returns the modulus limbs (significant limbs only).
    pub fn modulus(&self) -> &[u32] {
        self.md.value()
    }

    /// Returns `-1/m mod 2^WORDSIZE`.
    pub fn constant(&self) -> u32 {
        self.md.mont_constant()
    }

    /// Sets `w = x*y/R mod m`, with `R = 2^(WORDSIZE*n)` for a modulus of
    /// `n` limbs. Operands MUST be non-negative and lower than `m`.
    pub fn mul_mont(&mut self, w: &mut Li, x: &Li, y: &Li) {
        self.md.mont_mul(&mut w.value, &x.value, &y.value);
        w.sign = 1;
        w.fix_sign();
    }

    /// Sets `w = b^e mod m` (non-negative `b` and `e`), with all products
    /// computed in Montgomery representation.
    pub fn modpow_mont(&mut self, w: &mut Li, b: &Li, e: &Li) {
        self.md.pow_mont(&mut w.value, &b.value, &e.value);
        w.sign = 1;
        w.fix_sign();
    }
}
