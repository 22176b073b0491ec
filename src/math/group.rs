//! Discovery of the multiplicative group `Z_p^*` and a certified generator.
//!
//! A generator is only accepted with a complete factorization of `p - 1` in
//! hand: `g` has order `p - 1` iff `g^((p-1)/f) != 1 (mod p)` for every prime
//! factor `f`. Partial factorizations cannot prove this, so a candidate `p`
//! whose `p - 1` does not factor completely is discarded and resampled. Safe
//! primes (`p - 1 = 2m`, `m` prime) are the most common accepted shape.

use log::{debug, trace};
use num_bigint_dig::BigUint;
use num_traits::{One, Zero};

use crate::error::Result;
use crate::math::primality::{generate_random_prime, probably_prime, small_primes};
use crate::util::random::Randomness;

/// Trial division bound used to factor `p - 1`.
const TRIAL_DIVISION_LIMIT: usize = 1 << 16;

/// A prime modulus together with a generator of its full multiplicative group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicGroup {
    p: BigUint,
    g: BigUint,
    order_factors: Vec<BigUint>,
}

impl CyclicGroup {
    /// Sample a `byte_size`-byte prime `p` with a fully factored `p - 1` and
    /// search for a generator. Neither level has a retry limit.
    pub fn generate(byte_size: usize, accuracy: usize, rng: &Randomness) -> Result<Self> {
        let divisors = small_primes(TRIAL_DIVISION_LIMIT);
        let mut primes_tried = 0u64;

        loop {
            primes_tried += 1;
            let p = generate_random_prime(byte_size, accuracy, rng)?;
            let order = &p - BigUint::one();

            let Some(order_factors) = factor_completely(&order, &divisors, accuracy, rng) else {
                trace!("p - 1 not fully factored, resampling p");
                continue;
            };

            let group = Self {
                p,
                g: BigUint::zero(),
                order_factors,
            };
            let g = group.find_generator(rng)?;
            debug!(
                "found {}-bit group with {} order factors after {} primes",
                group.p.bits(),
                group.order_factors.len(),
                primes_tried
            );
            return Ok(Self { g, ..group });
        }
    }

    /// Uniform search over `[2, p-2]` for an element of full order.
    fn find_generator(&self, rng: &Randomness) -> Result<BigUint> {
        let low = BigUint::from(2u32);
        let high = &self.p - BigUint::from(2u32);
        let mut attempts = 0u64;
        loop {
            attempts += 1;
            let candidate = rng.biguint_in_range(&low, &high)?;
            if self.is_generator(&candidate) {
                trace!("generator found after {} candidates", attempts);
                return Ok(candidate);
            }
        }
    }

    /// True if `candidate` generates the whole group.
    pub fn is_generator(&self, candidate: &BigUint) -> bool {
        let order = self.order();
        if !candidate.modpow(&order, &self.p).is_one() {
            return false;
        }
        self.order_factors
            .iter()
            .all(|f| !candidate.modpow(&(&order / f), &self.p).is_one())
    }

    /// The prime modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// The certified generator `g`.
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Group order `q = p - 1`.
    pub fn order(&self) -> BigUint {
        &self.p - BigUint::one()
    }

    /// Distinct prime factors of the group order, ascending.
    pub fn order_factors(&self) -> &[BigUint] {
        &self.order_factors
    }
}

/// Distinct prime factors of `n`, or `None` if trial division leaves a
/// composite cofactor.
fn factor_completely(
    n: &BigUint,
    divisors: &[u32],
    accuracy: usize,
    rng: &Randomness,
) -> Option<Vec<BigUint>> {
    let mut rest = n.clone();
    let mut factors = Vec::new();

    for &d in divisors {
        let d = BigUint::from(d);
        if &d * &d > rest {
            break;
        }
        if (&rest % &d).is_zero() {
            while (&rest % &d).is_zero() {
                rest /= &d;
            }
            factors.push(d);
        }
    }

    if !rest.is_one() {
        if !probably_prime(&rest, accuracy, rng) {
            return None;
        }
        factors.push(rest);
    }
    Some(factors)
}
