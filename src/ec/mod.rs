//! Elliptic curves in short Weierstraß form, Jacobi coordinates.
//!
//! A `Curve` is the curve `y^2 = x^3 + a*x + b` over the prime field of
//! integers modulo `p`. Points (`JPoint`) are held in Jacobi coordinates
//! `(X:Y:Z)`, for the affine point `(X/Z^2, Y/Z^3)`; the point at
//! infinity is represented as `(0:1:0)`. Each coordinate is a signed
//! container of the curve's fixed `length` (twice the limb count of `p`,
//! plus four), which is enough to hold a full product before reduction.
//! All coordinates are kept reduced into `[0, p)` between operations.
//!
//! Point operations are methods of the curve, because the curve owns the
//! field context (divisor for `p`, Karatsuba arena) and the scratch
//! registers, which are reused across calls. A `Curve` must therefore be
//! borrowed mutably; distinct threads should use distinct instances.
//!
//! Doubling uses the Cohen-Miyaji-Ono formulas in general, and the
//! Bernstein "dbl-2001-b" formulas when `a = p - 3`; the choice is made
//! once, when the curve is created. Addition uses "add-1998-cmo-2", with
//! explicit detection of the `P = Q` and `P = -Q` cases.
//!
//! Nothing here is constant-time.

use crate::backend::{uli, Divisor, KaratsubaArena};
use crate::int::LargeInt;
use crate::li::Li;
use crate::{CryptoRng, Error, RngCore, Vec};

pub mod params;

/// A curve point in Jacobi coordinates.
#[derive(Clone, Debug)]
pub struct JPoint {
    x: Li,
    y: Li,
    z: Li,
}

impl JPoint {

    /// Returns `true` if this point is the point at infinity.
    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Returns the Jacobi coordinates `(X, Y, Z)`.
    pub fn coordinates(&self) -> (LargeInt, LargeInt, LargeInt) {
        (LargeInt::from_li(self.x.clone()),
         LargeInt::from_li(self.y.clone()),
         LargeInt::from_li(self.z.clone()))
    }

    fn set_infinity(&mut self) {
        self.x.set_zero();
        self.y.set_i32(1);
        self.z.set_zero();
    }

    fn set(&mut self, q: &JPoint) {
        self.x.set_copy(&q.x);
        self.y.set_copy(&q.y);
        self.z.set_copy(&q.z);
    }
}

// Arithmetic modulo p, on containers holding values in [0, p). Outputs
// of mul() and square() need the full curve length.
#[derive(Clone, Debug)]
struct Fp {
    p: Li,
    pm2: Vec<u32>,
    div: Divisor,
    arena: KaratsubaArena,
}

impl Fp {

    fn mul(&mut self, w: &mut Li, x: &Li, y: &Li) {
        w.set_mul(x, y, &mut self.arena);
        w.reduce_in(&mut self.div);
    }

    fn square(&mut self, w: &mut Li, x: &Li) {
        w.set_square(x, &mut self.arena);
        w.reduce_in(&mut self.div);
    }

    fn add(&self, w: &mut Li, x: &Li, y: &Li) {
        w.set_add(x, y);
        if Li::cmp(w, &self.p) >= 0 {
            w.sub_in(&self.p);
        }
    }

    fn sub(&self, w: &mut Li, x: &Li, y: &Li) {
        w.set_sub(x, y);
        if w.sign() < 0 {
            w.add_in(&self.p);
        }
    }

    fn sub_in(&self, w: &mut Li, y: &Li) {
        w.sub_in(y);
        if w.sign() < 0 {
            w.add_in(&self.p);
        }
    }

    // w <- k*x mod p, for a small constant k
    fn mul_small(&mut self, w: &mut Li, x: &Li, k: u32) {
        w.set_copy(x);
        w.mul_word_in(k);
        w.reduce_in(&mut self.div);
    }

    fn neg(&self, w: &mut Li) {
        if !w.is_zero() {
            w.neg_in();
            w.add_in(&self.p);
        }
    }

    // w <- x^(p-2) mod p, which is 1/x if p is prime and x != 0.
    fn invert(&mut self, w: &mut Li, x: &Li, tmp: &mut Li) {
        w.set_i32(1);
        for i in (0..uli::bitlen(&self.pm2)).rev() {
            self.square(tmp, w);
            if uli::getbit(&self.pm2, i) != 0 {
                self.mul(w, tmp, x);
            } else {
                core::mem::swap(w, tmp);
            }
        }
    }
}

const NUM_REGS: usize = 8;

/// An elliptic curve `y^2 = x^3 + a*x + b` over a prime field.
#[derive(Clone, Debug)]
pub struct Curve {
    f: Fp,
    a: Li,
    b: Li,
    length: usize,
    a_minus_3: bool,
    t: [Li; NUM_REGS],
}

impl Curve {

    /// Creates a curve from the field modulus `p` (an odd prime greater
    /// than 3) and the coefficients `a` and `b`, both in `[0, p)`. The
    /// curve must be non-singular.
    ///
    /// Primality of `p` is NOT verified. With a composite `p`, the group
    /// law is meaningless, and a point whose `Z` is not invertible
    /// cannot be converted to affine form: `to_affine()` then returns
    /// `false` and `affine_coords()` returns `None`.
    pub fn new(p: &LargeInt, a: &LargeInt, b: &LargeInt) -> Result<Self, Error> {
        if p.sign() <= 0 || !p.is_odd() || p.cmp(&LargeInt::from_u64(3)) <= 0 {
            return Err(Error::InvalidCurve);
        }
        for c in [a, b] {
            if c.sign() < 0 || c.cmp(p) >= 0 {
                return Err(Error::InvalidCurve);
            }
        }
        // 4*a^3 + 27*b^2 != 0 mod p
        let disc = LargeInt::from_u64(4).mul(&a.square().mul(a))
            .add(&LargeInt::from_u64(27).mul(&b.square()));
        if disc.modulo(p)?.is_zero() {
            return Err(Error::InvalidCurve);
        }

        let n = uli::siglen(p.as_li().value());
        let length = 2 * n + 4;
        let a_minus_3 = a.add(&LargeInt::from_u64(3)).cmp(p) == 0;
        let pl = p.to_li(length);
        let pm2 = p.sub(&LargeInt::from_u64(2));
        let f = Fp {
            pm2: pm2.as_li().value().to_vec(),
            div: Divisor::new(pl.value()),
            arena: KaratsubaArena::new(n),
            p: pl,
        };
        tracing::debug!(
            limbs = n,
            length,
            doubling = if a_minus_3 { "dbl-2001-b" } else { "cmo" },
            "curve context created");
        Ok(Self {
            f,
            a: a.to_li(length),
            b: b.to_li(length),
            length,
            a_minus_3,
            t: core::array::from_fn(|_| Li::with_len(length)),
        })
    }

    /// Returns the field modulus.
    pub fn p(&self) -> LargeInt {
        LargeInt::from_li(self.f.p.clone())
    }

    /// Returns the coefficient `a`.
    pub fn a(&self) -> LargeInt {
        LargeInt::from_li(self.a.clone())
    }

    /// Returns the coefficient `b`.
    pub fn b(&self) -> LargeInt {
        LargeInt::from_li(self.b.clone())
    }

    /// Returns the limb length of point coordinates and scratch values.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns `true` if the curve uses the doubling formulas specialized
    /// for `a = -3`.
    pub fn uses_a_minus_3(&self) -> bool {
        self.a_minus_3
    }

    /// Returns the point at infinity.
    pub fn infinity(&self) -> JPoint {
        let mut r = JPoint {
            x: Li::with_len(self.length),
            y: Li::with_len(self.length),
            z: Li::with_len(self.length),
        };
        r.set_infinity();
        r
    }

    /// Creates a point from its affine coordinates, which must be in
    /// `[0, p)` and satisfy the curve equation.
    pub fn point_from_affine(&mut self, x: &LargeInt, y: &LargeInt)
        -> Result<JPoint, Error>
    {
        for c in [x, y] {
            if c.sign() < 0 || c.as_li().cmp_abs(&self.f.p) >= 0 {
                return Err(Error::PointNotOnCurve);
            }
        }
        let mut r = self.infinity();
        r.x.set_copy(x.as_li());
        r.y.set_copy(y.as_li());
        r.z.set_i32(1);
        if !self.is_on_curve(&r) {
            return Err(Error::PointNotOnCurve);
        }
        Ok(r)
    }

    /// Returns `true` if the point satisfies the curve equation
    /// `Y^2 = X^3 + a*X*Z^4 + b*Z^6` (the point at infinity does).
    pub fn is_on_curve(&mut self, q: &JPoint) -> bool {
        if q.is_infinity() {
            return true;
        }
        let Self { f, a, b, t, .. } = self;
        let [t0, t1, t2, t3, t4, t5, t6, _] = t;
        f.square(t0, &q.y);
        f.square(t1, &q.x);
        f.mul(t2, t1, &q.x);
        f.square(t1, &q.z);
        f.square(t3, t1);
        f.mul(t4, t3, t1);
        f.mul(t5, &q.x, t3);
        f.mul(t6, a, t5);
        f.add(t5, t2, t6);
        f.mul(t6, b, t4);
        f.add(t2, t5, t6);
        Li::cmp(t0, t2) == 0
    }

    /// Converts a point to affine form (`Z = 1`) in place. The point at
    /// infinity is left unchanged. Returns `false` (and leaves the point
    /// unchanged) if `Z` is not invertible, which may happen only with a
    /// composite field modulus.
    pub fn to_affine(&mut self, q: &mut JPoint) -> bool {
        if q.is_infinity() || q.z.is_one() {
            return true;
        }
        let Self { f, t, .. } = self;
        let [t0, t1, t2, t3, ..] = t;
        f.invert(t0, &q.z, t1);
        f.mul(t1, t0, &q.z);
        if !t1.is_one() {
            // Not a prime field; inversion by extended GCD instead.
            if !Li::modinv(t0, &q.z, &f.p) {
                return false;
            }
        }
        f.square(t1, t0);
        f.mul(t2, t1, t0);
        f.mul(t3, &q.x, t1);
        q.x.set_copy(t3);
        f.mul(t3, &q.y, t2);
        q.y.set_copy(t3);
        q.z.set_i32(1);
        true
    }

    /// Returns the affine coordinates of a point, or `None` for the point
    /// at infinity (or for a point that `to_affine()` cannot convert).
    pub fn affine_coords(&mut self, q: &JPoint) -> Option<(LargeInt, LargeInt)> {
        if q.is_infinity() {
            return None;
        }
        let mut r = q.clone();
        if !self.to_affine(&mut r) {
            return None;
        }
        Some((LargeInt::from_li(r.x), LargeInt::from_li(r.y)))
    }

    /// Returns `true` if both points are equal, i.e. represent the same
    /// affine point (or are both the point at infinity).
    pub fn equals(&mut self, q1: &JPoint, q2: &JPoint) -> bool {
        match (q1.is_infinity(), q2.is_infinity()) {
            (true, true) => return true,
            (false, false) => { }
            _ => return false,
        }
        let Self { f, t, .. } = self;
        let [t0, t1, t2, t3, t4, t5, ..] = t;

        // X1*Z2^2 = X2*Z1^2
        f.square(t0, &q1.z);
        f.square(t1, &q2.z);
        f.mul(t2, &q1.x, t1);
        f.mul(t3, &q2.x, t0);
        if Li::cmp(t2, t3) != 0 {
            return false;
        }

        // Y1*Z2^3 = Y2*Z1^3
        f.mul(t4, t1, &q2.z);
        f.mul(t2, &q1.y, t4);
        f.mul(t5, t0, &q1.z);
        f.mul(t3, &q2.y, t5);
        Li::cmp(t2, t3) == 0
    }

    /// Doubles a point in place.
    pub fn set_double(&mut self, q: &mut JPoint) {
        if q.is_infinity() || q.y.is_zero() {
            q.set_infinity();
            return;
        }
        if self.a_minus_3 {
            self.set_double_a3(q);
        } else {
            self.set_double_generic(q);
        }
    }

    /// Returns `2*q`.
    pub fn double(&mut self, q: &JPoint) -> JPoint {
        let mut r = q.clone();
        self.set_double(&mut r);
        r
    }

    fn set_double_generic(&mut self, q: &mut JPoint) {
        let Self { f, a, t, .. } = self;
        let [t0, t1, t2, t3, t4, t5, t6, t7] = t;

        // XX = X^2, YY = Y^2, YYYY = YY^2, ZZ = Z^2
        f.square(t0, &q.x);
        f.square(t1, &q.y);
        f.square(t2, t1);
        f.square(t3, &q.z);

        // S = 4*X*YY
        f.mul(t5, &q.x, t1);
        f.mul_small(t4, t5, 4);

        // M = 3*XX + a*ZZ^2
        f.square(t5, t3);
        f.mul(t6, a, t5);
        f.mul_small(t5, t0, 3);
        f.add(t7, t5, t6);

        // Z3 = 2*Y*Z
        f.mul(t5, &q.y, &q.z);
        f.mul_small(&mut q.z, t5, 2);

        // X3 = M^2 - 2*S
        f.square(t5, t7);
        f.mul_small(t6, t4, 2);
        f.sub(&mut q.x, t5, t6);

        // Y3 = M*(S - X3) - 8*YYYY
        f.sub(t5, t4, &q.x);
        f.mul(t6, t7, t5);
        f.mul_small(t5, t2, 8);
        f.sub(&mut q.y, t6, t5);
    }

    fn set_double_a3(&mut self, q: &mut JPoint) {
        let Self { f, t, .. } = self;
        let [t0, t1, t2, t3, t4, t5, ..] = t;

        // delta = Z^2, gamma = Y^2, beta = X*gamma
        f.square(t0, &q.z);
        f.square(t1, &q.y);
        f.mul(t2, &q.x, t1);

        // alpha = 3*(X - delta)*(X + delta)
        f.sub(t3, &q.x, t0);
        f.add(t4, &q.x, t0);
        f.mul(t5, t3, t4);
        f.mul_small(t3, t5, 3);
        core::mem::swap(t3, t5);

        // Z3 = (Y + Z)^2 - gamma - delta
        f.add(t3, &q.y, &q.z);
        f.square(t4, t3);
        f.sub_in(t4, t1);
        f.sub_in(t4, t0);
        q.z.set_copy(t4);

        // X3 = alpha^2 - 8*beta
        f.square(t3, t5);
        f.mul_small(t4, t2, 8);
        f.sub(&mut q.x, t3, t4);

        // Y3 = alpha*(4*beta - X3) - 8*gamma^2
        f.mul_small(t3, t2, 4);
        f.sub_in(t3, &q.x);
        f.mul(t4, t5, t3);
        f.square(t3, t1);
        f.mul_small(t0, t3, 8);
        f.sub(&mut q.y, t4, t0);
    }

    /// Adds `q2` to `q1` in place.
    pub fn set_add(&mut self, q1: &mut JPoint, q2: &JPoint) {
        if q2.is_infinity() {
            return;
        }
        if q1.is_infinity() {
            q1.set(q2);
            return;
        }

        {
            let Self { f, t, .. } = self;
            let [t0, t1, t2, t3, t4, t5, t6, _] = t;

            // U1 = X1*Z2^2, U2 = X2*Z1^2
            f.square(t0, &q1.z);
            f.square(t1, &q2.z);
            f.mul(t2, &q1.x, t1);
            f.mul(t3, &q2.x, t0);

            // S1 = Y1*Z2^3, S2 = Y2*Z1^3
            f.mul(t4, &q2.z, t1);
            f.mul(t5, &q1.y, t4);
            f.mul(t4, &q1.z, t0);
            f.mul(t6, &q2.y, t4);
        }

        if Li::cmp(&self.t[2], &self.t[3]) == 0 {
            if Li::cmp(&self.t[5], &self.t[6]) == 0 {
                self.set_double(q1);
            } else {
                q1.set_infinity();
            }
            return;
        }

        let Self { f, t, .. } = self;
        let [t0, t1, t2, t3, t4, t5, t6, _] = t;

        // H = U2 - U1, r = S2 - S1
        f.sub_in(t3, t2);
        f.sub_in(t6, t5);

        // HH = H^2, HHH = H*HH, V = U1*HH
        f.square(t0, t3);
        f.mul(t1, t3, t0);
        f.mul(t4, t2, t0);

        // Z3 = Z1*Z2*H
        f.mul(t0, &q1.z, &q2.z);
        f.mul(&mut q1.z, t0, t3);

        // X3 = r^2 - HHH - 2*V
        f.square(t0, t6);
        f.sub_in(t0, t1);
        f.sub_in(t0, t4);
        f.sub(&mut q1.x, t0, t4);

        // Y3 = r*(V - X3) - S1*HHH
        f.sub_in(t4, &q1.x);
        f.mul(t0, t6, t4);
        f.mul(t2, t5, t1);
        f.sub(&mut q1.y, t0, t2);
    }

    /// Returns `q1 + q2`.
    pub fn add(&mut self, q1: &JPoint, q2: &JPoint) -> JPoint {
        let mut r = q1.clone();
        self.set_add(&mut r, q2);
        r
    }

    /// Negates a point in place.
    pub fn set_neg(&mut self, q: &mut JPoint) {
        if q.is_infinity() {
            return;
        }
        self.f.neg(&mut q.y);
    }

    /// Returns `-q`.
    pub fn neg(&mut self, q: &JPoint) -> JPoint {
        let mut r = q.clone();
        self.set_neg(&mut r);
        r
    }

    /// Returns `e*q` (left-to-right double-and-add). A negative scalar
    /// multiplies the opposite point.
    pub fn scalar_mul(&mut self, q: &JPoint, e: &LargeInt) -> JPoint {
        let base = if e.sign() < 0 { self.neg(q) } else { q.clone() };
        let mut r = self.infinity();
        for i in (0..e.bitlen()).rev() {
            self.set_double(&mut r);
            if e.getbit(i) != 0 {
                self.set_add(&mut r, &base);
            }
        }
        r
    }

    /// Samples a random curve point (uniform x-coordinate among those
    /// that yield a point, random sign for y). The field modulus must be
    /// prime.
    pub fn random_point<T: CryptoRng + RngCore>(&mut self, rng: &mut T) -> JPoint {
        let p = self.p();
        let a = self.a();
        let b = self.b();
        loop {
            let x = LargeInt::random(p.bitlen(), rng);
            if x.cmp(&p) >= 0 {
                continue;
            }
            let rhs = x.square().add(&a).mul(&x).add(&b);
            let Ok(rhs) = rhs.modulo(&p) else { continue };
            let Ok(mut y) = rhs.mod_sqrt(&p) else { continue };
            if (rng.next_u32() & 1) != 0 && !y.is_zero() {
                y = &p - &y;
            }
            let mut r = self.infinity();
            r.x.set_copy(x.as_li());
            r.y.set_copy(y.as_li());
            r.z.set_i32(1);
            return r;
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use super::params::{CurveParams, P256, SECP256K1};
    use crate::testutil::DRNG;

    fn hx(s: &str) -> LargeInt {
        LargeInt::from_hex(s).unwrap()
    }

    // Affine doubling and addition with LargeInt operations, as an
    // independent reference.
    fn affine_double(c: &Curve, x: &LargeInt, y: &LargeInt) -> (LargeInt, LargeInt) {
        let p = c.p();
        let num = LargeInt::from_u64(3) * x.square() + c.a();
        let den = LargeInt::from_u64(2) * y;
        let l = num.mod_mul(&den.mod_inv(&p).unwrap(), &p).unwrap();
        let x3 = (l.square() - x - x).modulo(&p).unwrap();
        let y3 = (&l * (x - &x3) - y).modulo(&p).unwrap();
        (x3, y3)
    }

    fn affine_add(c: &Curve, x1: &LargeInt, y1: &LargeInt, x2: &LargeInt, y2: &LargeInt)
        -> (LargeInt, LargeInt)
    {
        let p = c.p();
        let l = (y2 - y1).mod_mul(&(x2 - x1).mod_inv(&p).unwrap(), &p).unwrap();
        let x3 = (l.square() - x1 - x2).modulo(&p).unwrap();
        let y3 = (&l * (x1 - &x3) - y1).modulo(&p).unwrap();
        (x3, y3)
    }

    fn check_curve(params: &CurveParams, seed: &[u8]) {
        let mut c = params.curve().unwrap();
        let g = params.generator(&mut c).unwrap();
        let n = params.order().unwrap();
        let mut rng = DRNG::from_seed(seed);

        assert!(c.is_on_curve(&g));
        let inf = c.infinity();
        assert!(inf.is_infinity() && c.is_on_curve(&inf));

        // 0*G and n*G are the point at infinity.
        assert!(c.scalar_mul(&g, &LargeInt::zero()).is_infinity());
        assert!(c.scalar_mul(&g, &n).is_infinity());
        let nm1 = &n - LargeInt::one();
        let q = c.scalar_mul(&g, &nm1);
        let mg = c.neg(&g);
        assert!(c.equals(&q, &mg));

        // G + (-G) = infinity; -(-G) = G.
        assert!(c.add(&g, &mg).is_infinity());
        let g2 = c.neg(&mg);
        assert!(c.equals(&g, &g2));
        let mut z = g.clone();
        c.set_add(&mut z, &inf);
        assert!(c.equals(&z, &g));
        let mut z = c.infinity();
        c.set_add(&mut z, &g);
        assert!(c.equals(&z, &g));

        for _ in 0..10 {
            // double(P) = add(P, P), and both match the affine formulas.
            let q = c.random_point(&mut rng);
            assert!(c.is_on_curve(&q));
            let (qx, qy) = c.affine_coords(&q).unwrap();
            let d1 = c.double(&q);
            let d2 = c.add(&q, &q);
            assert!(c.is_on_curve(&d1));
            assert!(c.equals(&d1, &d2));
            let (dx, dy) = c.affine_coords(&d1).unwrap();
            assert!((dx.clone(), dy.clone()) == affine_double(&c, &qx, &qy));

            // Addition of distinct points, with non-trivial Z on both.
            let r = c.random_point(&mut rng);
            let (rx, ry) = c.affine_coords(&r).unwrap();
            let d3 = c.double(&r);
            let s = c.add(&d1, &d3);
            assert!(c.is_on_curve(&s));
            let (r2x, r2y) = affine_double(&c, &rx, &ry);
            let (sx, sy) = c.affine_coords(&s).unwrap();
            assert!((sx, sy) == affine_add(&c, &dx, &dy, &r2x, &r2y));

            // Mixed representations of the same point compare equal.
            let mut d1a = d1.clone();
            assert!(c.to_affine(&mut d1a));
            assert!(d1a.coordinates().2.is_one());
            assert!(c.equals(&d1a, &d1));
            let md = c.neg(&d1);
            assert!(c.add(&d1a, &md).is_infinity());
        }

        // Scalar multiplication is linear.
        for _ in 0..5 {
            let k1 = LargeInt::random(256, &mut rng);
            let k2 = LargeInt::random(256, &mut rng);
            let p1 = c.scalar_mul(&g, &k1);
            let p2 = c.scalar_mul(&g, &k2);
            let p3 = c.scalar_mul(&g, &(&k1 + &k2));
            let p12 = c.add(&p1, &p2);
            assert!(c.equals(&p12, &p3));
            let p4 = c.scalar_mul(&g, &-&k1);
            assert!(c.add(&p1, &p4).is_infinity());
        }
    }

    #[test]
    fn secp256k1() {
        check_curve(&SECP256K1, b"ec-secp256k1");
        let mut c = SECP256K1.curve().unwrap();
        assert!(!c.uses_a_minus_3());
        assert!(c.length() == 2 * (255 / crate::backend::WORDSIZE as usize + 1) + 4);
        let g = SECP256K1.generator(&mut c).unwrap();

        let g2 = c.double(&g);
        let (x, y) = c.affine_coords(&g2).unwrap();
        assert!(x == hx("C6047F9441ED7D6D3045406E95C07CD85C778E4B8CEF3CA7ABAC09B95C709EE5"));
        assert!(y == hx("1AE168FEA63DC339A3C58419466CEAEEF7F632653266D0E1236431A950CFE52A"));

        let g3 = c.scalar_mul(&g, &LargeInt::from_u64(3));
        let (x, y) = c.affine_coords(&g3).unwrap();
        assert!(x == hx("F9308A019258C31049344F85F89D5229B531C845836F99B08601F113BCE036F9"));
        assert!(y == hx("388F7B0F632DE8140FE337E62A37F3566500A99934C2231B6CB9FD7584B8E672"));
        let g2g = c.add(&g2, &g);
        assert!(c.equals(&g3, &g2g));
    }

    #[test]
    fn p256() {
        check_curve(&P256, b"ec-p256");
        let mut c = P256.curve().unwrap();
        assert!(c.uses_a_minus_3());
        let g = P256.generator(&mut c).unwrap();
        let g2 = c.double(&g);
        let (x, y) = c.affine_coords(&g2).unwrap();
        assert!(x == hx("7CF27B188D034F7E8A52380304B51AC3C08969E277F21B35A60B48FC47669978"));
        assert!(y == hx("07775510DB8ED040293D9AC69F7430DBBA7DADE63CE982299E04B79D227873D1"));
    }

    #[test]
    fn generic_coefficients() {
        // Non-zero a that is not -3 exercises the full generic doubling.
        let p = hx(SECP256K1.p);
        let mut c = Curve::new(&p, &LargeInt::from_u64(5), &LargeInt::from_u64(11)).unwrap();
        assert!(!c.uses_a_minus_3());
        let mut rng = DRNG::from_seed(b"ec-generic");
        for _ in 0..10 {
            let q = c.random_point(&mut rng);
            let (qx, qy) = c.affine_coords(&q).unwrap();
            let d = c.double(&q);
            assert!(c.is_on_curve(&d));
            let (dx, dy) = c.affine_coords(&d).unwrap();
            assert!((dx, dy) == affine_double(&c, &qx, &qy));
            let t = c.scalar_mul(&q, &LargeInt::from_u64(3));
            let dq = c.add(&d, &q);
            assert!(c.equals(&t, &dq));
        }
    }

    #[test]
    fn validation() {
        let p = hx(SECP256K1.p);
        let seven = LargeInt::from_u64(7);
        let zero = LargeInt::zero();
        let one = LargeInt::one();
        assert!(Curve::new(&LargeInt::from_u64(3), &zero, &seven).unwrap_err()
            == Error::InvalidCurve);
        assert!(Curve::new(&(&p + &one), &zero, &seven).unwrap_err()
            == Error::InvalidCurve);
        assert!(Curve::new(&p, &p, &seven).unwrap_err() == Error::InvalidCurve);
        assert!(Curve::new(&p, &zero, &-&seven).unwrap_err() == Error::InvalidCurve);
        // Singular: y^2 = x^3.
        assert!(Curve::new(&p, &zero, &zero).unwrap_err() == Error::InvalidCurve);

        let mut c = Curve::new(&p, &zero, &seven).unwrap();
        let gx = hx(SECP256K1.gx);
        let gy = hx(SECP256K1.gy);
        assert!(c.point_from_affine(&gx, &gy).is_ok());
        assert!(c.point_from_affine(&gx, &(&gy + &one)).unwrap_err()
            == Error::PointNotOnCurve);
        assert!(c.point_from_affine(&(&gx + &p), &gy).unwrap_err()
            == Error::PointNotOnCurve);
        let inf = c.infinity();
        assert!(c.affine_coords(&inf).is_none());
    }

    #[test]
    fn composite_field() {
        // Not rejected: primality of p is not verified.
        let p = LargeInt::from_u64(15);
        let one = LargeInt::one();
        let mut c = Curve::new(&p, &one, &one).unwrap();
        let len = c.length();
        let pt = |x: i32, y: i32, z: i32| {
            let mut q = JPoint {
                x: Li::with_len(len),
                y: Li::with_len(len),
                z: Li::with_len(len),
            };
            q.x.set_i32(x);
            q.y.set_i32(y);
            q.z.set_i32(z);
            q
        };

        // Z = 5 has no inverse modulo 15.
        let q = pt(1, 1, 5);
        let mut r = q.clone();
        assert!(!c.to_affine(&mut r));
        assert!(r.coordinates() == q.coordinates());
        assert!(c.affine_coords(&q).is_none());

        // Z = 2 is invertible: (4:8:2) is the affine point (1, 1).
        let q = pt(4, 8, 2);
        assert!(c.affine_coords(&q) == Some((one.clone(), one.clone())));
        assert!(c.equals(&q, &pt(1, 1, 1)));
        assert!(!c.equals(&q, &pt(1, 2, 1)));
    }
}
