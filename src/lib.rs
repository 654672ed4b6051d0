//! Arithm is a library for arbitrary-precision integer arithmetic, with
//! modular exponentiation and elliptic curve computations on top of it.
//!
//! The crate is organized in layers:
//!
//!  - `backend`: operations on unsigned integers represented as slices of
//!    `u32` limbs, each limb holding `WORDSIZE` bits (28 by default).
//!    This includes Karatsuba multiplication, division with precomputed
//!    reciprocals, Montgomery multiplication, and several modular
//!    exponentiation strategies.
//!
//!  - `li`: `Li`, a mutable signed integer container with in-place
//!    operations, and number-theoretic functions (extended GCD, modular
//!    inversion, Legendre symbol, modular square roots).
//!
//!  - `int`: `LargeInt`, an immutable signed integer with the usual
//!    operators and modular functions, and conversions to and from bytes
//!    and hexadecimal strings.
//!
//!  - `ec`: Weierstrass curves `y^2 = x^3 + a*x + b` over prime fields,
//!    with points in Jacobian coordinates.
//!
//!  - `modpowprod`: simultaneous exponentiation (`ModPowProd`) and
//!    fixed-basis exponentiation (`FixModPow`).
//!
//! # Conventions
//!
//! This code is NOT constant-time. Running time depends on the operand
//! values, which is fine for public data but not for secrets.
//!
//! Functions that modify the object on which they are called tend to
//! have a name in `set_*()`, or end with `_in` when the destination is
//! also an operand. Invalid inputs at the `LargeInt` level are reported
//! through `Error`; the lower layers document their preconditions
//! instead, and check them only with debug assertions.
//!
//! # Usage
//!
//! The library is `no_std` with `alloc`. By default, it compiles against
//! the standard library (feature `std`).

#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub(crate) use alloc::string::String;
pub(crate) use alloc::vec::Vec;

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

pub mod backend;
mod error;
pub mod li;
pub mod int;
pub mod ec;
pub mod modpowprod;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::Error;
pub use int::{LargeInt, ModPowMethod};
pub use li::{Li, MontContext};
pub use ec::{Curve, JPoint};
pub use modpowprod::{FixModPow, ModPowProd};
