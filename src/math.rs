//! Number theory used by ElGamal: primality testing, group discovery and
//! modular inversion over `num-bigint-dig` integers.

pub mod group;
pub mod primality;

pub use group::CyclicGroup;
pub use primality::{generate_random_prime, probably_prime, DEFAULT_ACCURACY};

use num_bigint_dig::{BigInt, BigUint, ModInverse, Sign};

use crate::error::{Error, Result};

/// Inverse of `a` modulo `m`, normalized into `[0, m)`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    let inv = a.clone().mod_inverse(m).ok_or(Error::NotInvertible)?;
    let m_int = BigInt::from_biguint(Sign::Plus, m.clone());
    let inv = ((inv % &m_int) + &m_int) % &m_int;
    inv.to_biguint().ok_or(Error::NotInvertible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn inverse_of_small_values() {
        let m = BigUint::from(23u32);
        for a in 1u32..23 {
            let a = BigUint::from(a);
            let inv = mod_inverse(&a, &m).unwrap();
            assert!(inv < m);
            assert!(((&a * &inv) % &m).is_one());
        }
    }

    #[test]
    fn non_invertible_is_an_error() {
        let m = BigUint::from(12u32);
        assert_eq!(mod_inverse(&BigUint::from(8u32), &m), Err(Error::NotInvertible));
        assert_eq!(mod_inverse(&BigUint::from(0u32), &m), Err(Error::NotInvertible));
    }
}
