//! Randomness source for key material, padding filler and ephemeral scalars.
//!
//! A single [`Randomness`] is constructed by the caller and passed by
//! reference to every operation that needs random bytes. The generator sits
//! behind a mutex, so one source can be shared between threads.

use std::sync::{Mutex, MutexGuard};

use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::One;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{Error, Result};

/// Cryptographically strong random bytes and uniform big integers.
pub struct Randomness {
    rng: Mutex<ChaCha20Rng>,
}

impl Randomness {
    /// Seed the generator from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }

    /// Deterministic generator, for tests and reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    // A panic while holding the lock cannot leave the generator in a
    // state that matters, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ChaCha20Rng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fill `buf` with random bytes.
    pub fn fill(&self, buf: &mut [u8]) {
        self.lock().fill_bytes(buf);
    }

    /// Return `n` random bytes.
    pub fn bytes(&self, n: usize) -> Vec<u8> {
        let mut out = vec![0u8; n];
        self.fill(&mut out);
        out
    }

    /// Uniform integer in the inclusive range `[low, high]`.
    pub fn biguint_in_range(&self, low: &BigUint, high: &BigUint) -> Result<BigUint> {
        if low > high {
            return Err(Error::EmptyRange);
        }
        let bound = high + BigUint::one();
        Ok(self.lock().gen_biguint_range(low, &bound))
    }

    /// Integer built from `n` uniformly random big-endian bytes.
    pub fn biguint_of_bytes(&self, n: usize) -> BigUint {
        BigUint::from_bytes_be(&self.bytes(n))
    }
}

impl Default for Randomness {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl std::fmt::Debug for Randomness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Randomness").finish_non_exhaustive()
    }
}
