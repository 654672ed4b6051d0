//! Error type for the value, curve and exponentiation layers.
//!
//! The limb-array kernel and the signed container layer do not report
//! errors: their preconditions are the responsibility of the caller. All
//! checks happen at the `LargeInt`, `Curve` and `ModPowProd`/`FixModPow`
//! boundaries, before any state is modified.

use thiserror::Error;

/// Validation failure reported by the public API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A (sign, limbs) pair is not a valid integer representation.
    #[error("invalid integer representation")]
    InvalidRepresentation,

    /// A string is not a valid hexadecimal integer.
    #[error("invalid hexadecimal string")]
    InvalidHex,

    /// A modulus is zero or negative.
    #[error("modulus must be positive")]
    InvalidModulus,

    /// Montgomery arithmetic was requested with an even modulus.
    #[error("modulus must be odd for Montgomery arithmetic")]
    EvenModulus,

    /// An exponent is negative.
    #[error("exponent must be non-negative")]
    InvalidExponent,

    /// A basis is negative.
    #[error("basis must be non-negative")]
    InvalidBasis,

    /// Division by zero.
    #[error("division by zero")]
    DivideByZero,

    /// The value has no inverse modulo the provided modulus.
    #[error("value is not invertible")]
    NotInvertible,

    /// The value is not a square modulo the provided prime.
    #[error("value is not a quadratic residue")]
    NotQuadraticResidue,

    /// The number of exponents does not match the number of bases.
    #[error("exponent count does not match basis count")]
    ExponentCount,

    /// Curve parameters are out of range.
    #[error("invalid curve parameters")]
    InvalidCurve,

    /// Affine coordinates do not satisfy the curve equation.
    #[error("point is not on the curve")]
    PointNotOnCurve,

    /// A table width or basis count is out of the supported range.
    #[error("unsupported table width")]
    InvalidWidth,
}
