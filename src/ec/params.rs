//! Standard curve parameters.
//!
//! Values are given as hexadecimal strings; `CurveParams::curve()` builds
//! the corresponding `Curve` context.

use super::{Curve, JPoint};
use crate::int::LargeInt;
use crate::Error;

/// Parameters of a named curve: field modulus, coefficients, conventional
/// generator and its (prime) order.
#[derive(Clone, Copy, Debug)]
pub struct CurveParams {
    pub name: &'static str,
    pub p: &'static str,
    pub a: &'static str,
    pub b: &'static str,
    pub gx: &'static str,
    pub gy: &'static str,
    pub n: &'static str,
}

/// secp256k1 (SEC 2).
pub const SECP256K1: CurveParams = CurveParams {
    name: "secp256k1",
    p: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
    a: "0",
    b: "7",
    gx: "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
    gy: "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
    n: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
};

/// NIST P-256 (FIPS 186-4, also known as secp256r1).
pub const P256: CurveParams = CurveParams {
    name: "P-256",
    p: "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF",
    a: "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC",
    b: "5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B",
    gx: "6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296",
    gy: "4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5",
    n: "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551",
};

impl CurveParams {

    /// Creates the curve context.
    pub fn curve(&self) -> Result<Curve, Error> {
        Curve::new(
            &LargeInt::from_hex(self.p)?,
            &LargeInt::from_hex(self.a)?,
            &LargeInt::from_hex(self.b)?)
    }

    /// Returns the conventional generator, as a point of `curve` (which
    /// should have been obtained from `self.curve()`).
    pub fn generator(&self, curve: &mut Curve) -> Result<JPoint, Error> {
        curve.point_from_affine(
            &LargeInt::from_hex(self.gx)?,
            &LargeInt::from_hex(self.gy)?)
    }

    /// Returns the order of the generator.
    pub fn order(&self) -> Result<LargeInt, Error> {
        LargeInt::from_hex(self.n)
    }
}
