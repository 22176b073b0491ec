//! Miller-Rabin probabilistic primality test and random prime generation.
//!
//! `probably_prime` never rejects a prime. A composite survives one round
//! with probability at most 1/4, so `accuracy` rounds bound the false
//! positive rate by `4^-accuracy`.

use log::{debug, trace};
use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{Error, Result};
use crate::util::random::Randomness;

/// Miller-Rabin rounds used when the caller has no preference.
pub const DEFAULT_ACCURACY: usize = 25;

/// Odd primes used to discard candidates before running Miller-Rabin.
const SIEVE_PRIMES: &[u32] = &[
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Returns true if `n` is probably prime after `accuracy` Miller-Rabin rounds
/// with fresh random bases.
pub fn probably_prime(n: &BigUint, accuracy: usize, rng: &Randomness) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if *n == two || *n == three {
        return true;
    }
    if *n < two || n.is_even() {
        return false;
    }
    miller_rabin(n, accuracy, rng).unwrap_or(false)
}

/// Miller-Rabin rounds for an odd `n >= 5`.
fn miller_rabin(n: &BigUint, accuracy: usize, rng: &Randomness) -> Result<bool> {
    let two = BigUint::from(2u32);
    let n_minus_1 = n - BigUint::one();
    let (s, d) = decompose(&n_minus_1);
    let max_base = n - &two;

    for _ in 0..accuracy {
        let base = rng.biguint_in_range(&two, &max_base)?;
        if is_witness(&base, n, &n_minus_1, s, &d) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Write `n` as `2^s * d` with `d` odd. `n` must be non-zero.
fn decompose(n: &BigUint) -> (usize, BigUint) {
    let mut s = 0;
    let mut d = n.clone();
    while !d.is_zero() && d.is_even() {
        d >>= 1;
        s += 1;
    }
    (s, d)
}

/// True if `base` proves `n` composite.
fn is_witness(base: &BigUint, n: &BigUint, n_minus_1: &BigUint, s: usize, d: &BigUint) -> bool {
    let mut x = base.modpow(d, n);
    if x.is_one() || x == *n_minus_1 {
        return false;
    }
    let two = BigUint::from(2u32);
    for _ in 1..s {
        x = x.modpow(&two, n);
        if x == *n_minus_1 {
            return false;
        }
    }
    true
}

/// Cheap trial division against [`SIEVE_PRIMES`]. The primes themselves pass.
fn passes_sieve(n: &BigUint) -> bool {
    SIEVE_PRIMES.iter().all(|&p| {
        let p = BigUint::from(p);
        *n == p || !(n % &p).is_zero()
    })
}

/// Draw a random prime of exactly `byte_size` bytes.
///
/// Candidates are uniform over odd integers with the top bit set, so the
/// result always has the full width. The search has no retry limit; it takes
/// `O(ln n)` candidates on average.
pub fn generate_random_prime(byte_size: usize, accuracy: usize, rng: &Randomness) -> Result<BigUint> {
    if byte_size == 0 {
        return Err(Error::InvalidPrimeByteSize(byte_size));
    }
    if accuracy == 0 {
        return Err(Error::InvalidAccuracy);
    }

    let top_bit = BigUint::one() << (byte_size * 8 - 1);
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let candidate = rng.biguint_of_bytes(byte_size) | &top_bit | BigUint::one();
        if passes_sieve(&candidate) && probably_prime(&candidate, accuracy, rng) {
            debug!("found {}-bit prime after {} candidates", candidate.bits(), attempts);
            return Ok(candidate);
        }
        trace!("prime candidate {} rejected", attempts);
    }
}

/// All primes strictly below `limit`, by the sieve of Eratosthenes.
pub(crate) fn small_primes(limit: usize) -> Vec<u32> {
    if limit < 3 {
        return Vec::new();
    }
    let mut composite = vec![false; limit];
    let mut primes = Vec::new();
    for i in 2..limit {
        if composite[i] {
            continue;
        }
        primes.push(i as u32);
        let mut j = i * i;
        while j < limit {
            composite[j] = true;
            j += i;
        }
    }
    primes
}
