//! ElGamal signatures over the same keys used for encryption.
//!
//! A signature on `m` is `(s1, s2)` with `s1 = g^y mod p` and
//! `s2 = (H(m) - x * s1) * y^-1 mod q`, where `y` is a fresh ephemeral
//! coprime to `q`. It verifies iff `g^H(m) = h^s1 * s1^s2 (mod p)`.
//!
//! `H` is pluggable through [`DocumentDigest`]. [`Sha256Digest`] is the
//! default; [`TruncatedDigest`] keeps only a document prefix and exists for
//! interoperability with signatures produced that way. Any two documents that
//! share the prefix have the same signatures under it.

use log::{debug, trace};
use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::math::mod_inverse;
use crate::security::elgamal::{PrivateKey, PublicKey};
use crate::util::encoding::{decode_exact, encode_fields};
use crate::util::random::Randomness;

/// Maps a document to the bytes that get signed.
pub trait DocumentDigest {
    fn digest(&self, document: &[u8]) -> Vec<u8>;
}

/// SHA-256 of the whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Digest;

impl DocumentDigest for Sha256Digest {
    fn digest(&self, document: &[u8]) -> Vec<u8> {
        Sha256::digest(document).to_vec()
    }
}

/// The first `len` bytes of the document, or all of it if shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedDigest {
    len: usize,
}

impl TruncatedDigest {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn prefix_len(&self) -> usize {
        self.len
    }
}

impl Default for TruncatedDigest {
    fn default() -> Self {
        Self::new(10)
    }
}

impl DocumentDigest for TruncatedDigest {
    fn digest(&self, document: &[u8]) -> Vec<u8> {
        document[..self.len.min(document.len())].to_vec()
    }
}

/// An ElGamal signature `(s1, s2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    s1: BigUint,
    s2: BigUint,
}

impl Signature {
    pub fn s1(&self) -> &BigUint {
        &self.s1
    }

    pub fn s2(&self) -> &BigUint {
        &self.s2
    }

    /// Wire-format fields `(s1, s2)`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_fields(&[&self.s1.to_bytes_be(), &self.s2.to_bytes_be()])
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let fields = decode_exact(bytes, 2)?;
        Ok(Self {
            s1: BigUint::from_bytes_be(&fields[0]),
            s2: BigUint::from_bytes_be(&fields[1]),
        })
    }
}

fn digest_to_integer<D: DocumentDigest + ?Sized>(digest: &D, document: &[u8], q: &BigUint) -> BigUint {
    BigUint::from_bytes_be(&digest.digest(document)) % q
}

impl PrivateKey {
    /// Sign `document`. Ephemerals not coprime to `q`, or yielding `s2 = 0`,
    /// are discarded and redrawn.
    pub fn sign<D: DocumentDigest + ?Sized>(
        &self,
        document: &[u8],
        digest: &D,
        rng: &Randomness,
    ) -> Result<Signature> {
        let public = self.public_key();
        let (p, q) = (public.modulus(), public.q());
        let hm = digest_to_integer(digest, document, q);
        let high = q - 2u32;

        let mut attempts = 0u64;
        loop {
            attempts += 1;
            let mut y = rng.biguint_in_range(&BigUint::one(), &high)?;
            if !y.gcd(q).is_one() {
                y.zeroize();
                continue;
            }
            let mut y_inv = mod_inverse(&y, q)?;
            let s1 = public.g().modpow(&y, p);
            y.zeroize();

            let xs1 = (self.x() * &s1) % q;
            let s2 = (((&hm + q) - xs1) % q * &y_inv) % q;
            y_inv.zeroize();

            if s2.is_zero() {
                trace!("s2 = 0, redrawing ephemeral");
                continue;
            }
            debug!("signed {}-byte document after {} ephemerals", document.len(), attempts);
            return Ok(Signature { s1, s2 });
        }
    }
}

impl PublicKey {
    /// Check `signature` over `document`. Out-of-range components never verify.
    pub fn verify<D: DocumentDigest + ?Sized>(
        &self,
        document: &[u8],
        signature: &Signature,
        digest: &D,
    ) -> bool {
        let (p, q) = (self.modulus(), self.q());
        if signature.s1.is_zero() || signature.s1 >= *p || signature.s2 >= *q {
            return false;
        }
        let hm = digest_to_integer(digest, document, q);

        let lhs = self.g().modpow(&hm, p);
        let rhs = (self.h().modpow(&signature.s1, p) * signature.s1.modpow(&signature.s2, p)) % p;
        lhs == rhs
    }
}

/// Sign `document` and bundle it as wire-format fields `(document, s1, s2)`.
pub fn sign_document<D: DocumentDigest + ?Sized>(
    private_key: &PrivateKey,
    document: &[u8],
    digest: &D,
    rng: &Randomness,
) -> Result<Vec<u8>> {
    let signature = private_key.sign(document, digest, rng)?;
    encode_fields(&[
        document,
        &signature.s1.to_bytes_be(),
        &signature.s2.to_bytes_be(),
    ])
}

/// Check a bundle written by [`sign_document`]. Returns the document when
/// the signature holds.
pub fn check_document<D: DocumentDigest + ?Sized>(
    public_key: &PublicKey,
    signed: &[u8],
    digest: &D,
) -> Result<Vec<u8>> {
    let mut fields = decode_exact(signed, 3)?;
    let signature = Signature {
        s1: BigUint::from_bytes_be(&fields[1]),
        s2: BigUint::from_bytes_be(&fields[2]),
    };
    if public_key.verify(&fields[0], &signature, digest) {
        Ok(fields.swap_remove(0))
    } else {
        Err(Error::MalformedSignature)
    }
}
