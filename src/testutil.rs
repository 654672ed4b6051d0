// Helpers shared by the unit tests: a deterministic byte source, and
// conversions between limb arrays and num-bigint values.

use crate::backend::{MASK, WORDSIZE};
use crate::{CryptoRng, RngCore, RngError};
use crate::Vec;
use num_bigint::{BigInt, BigUint, Sign};
use sha2::{Sha512, Digest};

// A pretend RNG for test purposes (deterministic from a given seed).
pub(crate) struct DRNG {
    buf: [u8; 64],
    ptr: usize,
}

impl DRNG {

    pub(crate) fn from_seed(seed: &[u8]) -> Self {
        let mut d = Self {
            buf: [0u8; 64],
            ptr: 0,
        };
        let mut sh = Sha512::new();
        sh.update(seed);
        d.buf[..].copy_from_slice(&sh.finalize());
        d
    }

    // Random integer in [0, n) (n > 0; slight bias is irrelevant here).
    pub(crate) fn below(&mut self, n: u32) -> u32 {
        self.next_u32() % n
    }

    // Random limb array of n limbs; the top limb is non-zero.
    pub(crate) fn limbs(&mut self, n: usize) -> Vec<u32> {
        let mut x = vec![0u32; n];
        for l in x.iter_mut() {
            *l = self.next_u32() & MASK;
        }
        if n > 0 && x[n - 1] == 0 {
            x[n - 1] = 1;
        }
        x
    }
}

impl RngCore for DRNG {

    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let len = dest.len();
        let mut off = 0;
        while off < len {
            let mut clen = 32 - self.ptr;
            if clen > (len - off) {
                clen = len - off;
            }
            dest[off .. off + clen].copy_from_slice(
                &self.buf[self.ptr .. self.ptr + clen]);
            self.ptr += clen;
            off += clen;
            if self.ptr == 32 {
                let mut sh = Sha512::new();
                sh.update(&self.buf);
                self.buf[..].copy_from_slice(&sh.finalize());
                self.ptr = 0;
            }
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8])
        -> Result<(), RngError>
    {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for DRNG { }

pub(crate) fn to_big(x: &[u32]) -> BigUint {
    let mut z = BigUint::from(0u32);
    for &l in x.iter().rev() {
        z = (z << (WORDSIZE as usize)) + BigUint::from(l);
    }
    z
}

pub(crate) fn from_big(z: &BigUint, n: usize) -> Vec<u32> {
    let mask = BigUint::from(MASK);
    let mut t = z.clone();
    let mut x = vec![0u32; n];
    for l in x.iter_mut() {
        *l = (&t & &mask).to_u32_digits().first().copied().unwrap_or(0);
        t >>= WORDSIZE as usize;
    }
    x
}

pub(crate) fn to_bigint(sign: i32, x: &[u32]) -> BigInt {
    let s = match sign {
        0 => Sign::NoSign,
        1 => Sign::Plus,
        _ => Sign::Minus,
    };
    BigInt::from_biguint(s, to_big(x))
}
