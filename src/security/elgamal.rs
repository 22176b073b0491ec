//! ElGamal encryption over the multiplicative group of a prime field.
//!
//! A public key is `(q, g, h)` where `p = q + 1` is prime, `g` generates
//! `Z_p^*` and `h = g^x mod p` for the private scalar `x`.
//!
//! Messages of any length are padded to a multiple of the plaintext block
//! (one byte narrower than `p`, so every block is below `p`) and each block
//! `m` is masked as `m * s mod p` with the shared secret `s = h^y`. A fresh
//! ephemeral `y` is drawn for every message. The serialized ciphertext is
//!
//! ```text
//! c1 (width bytes) | c2 blocks (width bytes each) | u8 width
//! ```
//!
//! where `width` is the byte length of `p`.

use log::debug;
use num_bigint_dig::BigUint;
use num_traits::{One, Zero};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::math::group::CyclicGroup;
use crate::math::mod_inverse;
use crate::math::primality::DEFAULT_ACCURACY;
use crate::util::encoding::{biguint_to_fixed, decode_exact, encode_fields};
use crate::util::padding::{add_padding, remove_padding};
use crate::util::random::Randomness;

/// Smallest accepted size of `p`, in bits.
pub const MIN_PRIME_BITS: usize = 128;

/// Largest accepted size of `p`, in bits. The ciphertext trailer stores the
/// byte length of `p` in a single byte.
pub const MAX_PRIME_BITS: usize = 2040;

/// Configuration for ElGamal key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElGamalKeyGenConfig {
    /// Bit length of the prime `p`; a multiple of 8 in
    /// `MIN_PRIME_BITS..=MAX_PRIME_BITS`.
    pub prime_bits: usize,
    /// Miller-Rabin rounds for every primality decision; at least 1.
    pub accuracy: usize,
}

impl Default for ElGamalKeyGenConfig {
    fn default() -> Self {
        Self {
            prime_bits: 512,
            accuracy: DEFAULT_ACCURACY,
        }
    }
}

impl ElGamalKeyGenConfig {
    fn validate(&self) -> Result<()> {
        let bits = self.prime_bits;
        if bits % 8 != 0 || !(MIN_PRIME_BITS..=MAX_PRIME_BITS).contains(&bits) {
            return Err(Error::InvalidPrimeSize {
                min: MIN_PRIME_BITS,
                max: MAX_PRIME_BITS,
                actual: bits,
            });
        }
        if self.accuracy == 0 {
            return Err(Error::InvalidAccuracy);
        }
        Ok(())
    }
}

/// ElGamal public key `(q, g, h)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    q: BigUint,
    g: BigUint,
    h: BigUint,
    p: BigUint,
}

impl PublicKey {
    /// Build a public key from the group order `q`, generator `g` and `h`.
    pub fn new(q: BigUint, g: BigUint, h: BigUint) -> Result<Self> {
        let p = &q + BigUint::one();
        if p.bits() < 16 {
            return Err(Error::InvalidPublicKey("modulus is too small"));
        }
        if p.bits() > MAX_PRIME_BITS {
            return Err(Error::InvalidPublicKey("modulus is too large"));
        }
        if g <= BigUint::one() || g >= p {
            return Err(Error::InvalidPublicKey("generator outside (1, p)"));
        }
        if h.is_zero() || h >= p {
            return Err(Error::InvalidPublicKey("h outside [1, p)"));
        }
        Ok(Self { q, g, h, p })
    }

    /// Group order `q = p - 1`.
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// Generator `g`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Public component `h = g^x mod p`.
    pub fn h(&self) -> &BigUint {
        &self.h
    }

    /// Prime modulus `p = q + 1`.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Byte length of `p`; also the width of every ciphertext block.
    pub fn modulus_len(&self) -> usize {
        self.p.bits().div_ceil(8)
    }

    /// Width of a plaintext block, one byte narrower than `p`.
    pub fn plaintext_block_len(&self) -> usize {
        self.modulus_len() - 1
    }

    /// Encrypt `plaintext` of any length under a fresh ephemeral scalar.
    pub fn encrypt(&self, plaintext: &[u8], rng: &Randomness) -> Result<Ciphertext> {
        let width = self.modulus_len();
        let block = self.plaintext_block_len();
        let mut padded = add_padding(plaintext, block * 8, rng)?;

        let mut y = rng.biguint_in_range(&BigUint::one(), &(&self.q - 2u32))?;
        let c1 = self.g.modpow(&y, &self.p);
        let mut s = self.h.modpow(&y, &self.p);
        y.zeroize();

        let blocks = padded
            .chunks_exact(block)
            .map(|chunk| (BigUint::from_bytes_be(chunk) * &s) % &self.p)
            .collect();
        s.zeroize();
        padded.zeroize();

        Ok(Ciphertext { c1, blocks, width })
    }

    /// Persist as wire-format fields `(q, g, h)`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_fields(&[
            &self.q.to_bytes_be(),
            &self.g.to_bytes_be(),
            &self.h.to_bytes_be(),
        ])
    }

    /// Load a key written by [`PublicKey::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let fields = decode_exact(bytes, 3)?;
        Self::new(
            BigUint::from_bytes_be(&fields[0]),
            BigUint::from_bytes_be(&fields[1]),
            BigUint::from_bytes_be(&fields[2]),
        )
    }
}

/// ElGamal private key: the scalar `x` paired with its public key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    public: PublicKey,
    x: BigUint,
}

impl PrivateKey {
    /// Pair `x` with `public`. Requires `1 <= x <= q - 1` and `h = g^x mod p`.
    pub fn new(public: PublicKey, x: BigUint) -> Result<Self> {
        if x.is_zero() || x >= public.q {
            return Err(Error::InvalidPrivateKey("x outside [1, q - 1]"));
        }
        if public.g.modpow(&x, &public.p) != public.h {
            return Err(Error::InvalidPrivateKey("x does not match the public key"));
        }
        Ok(Self { public, x })
    }

    #[inline]
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub(crate) fn x(&self) -> &BigUint {
        &self.x
    }

    /// Recover the plaintext of `ciphertext`.
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>> {
        let p = &self.public.p;
        let block = self.public.plaintext_block_len();

        if ciphertext.width != self.public.modulus_len() {
            return Err(Error::MalformedCiphertext("block width does not match the key"));
        }
        if ciphertext.c1.is_zero() || ciphertext.c1 >= *p {
            return Err(Error::MalformedCiphertext("c1 outside the group"));
        }

        let mut s = ciphertext.c1.modpow(&self.x, p);
        let mut s_inv = mod_inverse(&s, p)?;
        s.zeroize();

        let mut plain = Vec::with_capacity(ciphertext.blocks.len() * block);
        for c2 in &ciphertext.blocks {
            if c2 >= p {
                s_inv.zeroize();
                return Err(Error::MalformedCiphertext("block outside the group"));
            }
            let m = (c2 * &s_inv) % p;
            match biguint_to_fixed(&m, block) {
                Some(bytes) => plain.extend_from_slice(&bytes),
                None => {
                    s_inv.zeroize();
                    return Err(Error::MalformedCiphertext(
                        "block does not decode to the plaintext width",
                    ));
                }
            }
        }
        s_inv.zeroize();

        let message = remove_padding(&plain);
        plain.zeroize();
        message
    }

    /// Persist as wire-format fields `(q, g, h, x)`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut x = self.x.to_bytes_be();
        let encoded = encode_fields(&[
            &self.public.q.to_bytes_be(),
            &self.public.g.to_bytes_be(),
            &self.public.h.to_bytes_be(),
            &x,
        ]);
        x.zeroize();
        encoded
    }

    /// Load a key written by [`PrivateKey::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut fields = decode_exact(bytes, 4)?;
        let public = PublicKey::new(
            BigUint::from_bytes_be(&fields[0]),
            BigUint::from_bytes_be(&fields[1]),
            BigUint::from_bytes_be(&fields[2]),
        )?;
        let x = BigUint::from_bytes_be(&fields[3]);
        fields[3].zeroize();
        Self::new(public, x)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Freshly generated key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    private: PrivateKey,
}

impl KeyPair {
    /// Discover a group of `config.prime_bits` bits, draw `x` uniformly from
    /// `[1, q - 2]` and compute `h = g^x mod p`.
    pub fn generate(config: &ElGamalKeyGenConfig, rng: &Randomness) -> Result<Self> {
        config.validate()?;

        let group = CyclicGroup::generate(config.prime_bits / 8, config.accuracy, rng)?;
        let q = group.order();
        let x = rng.biguint_in_range(&BigUint::one(), &(&q - 2u32))?;
        let h = group.generator().modpow(&x, group.modulus());

        let public = PublicKey::new(q, group.generator().clone(), h)?;
        let private = PrivateKey::new(public, x)?;
        debug!("generated {}-bit ElGamal key pair", config.prime_bits);
        Ok(Self { private })
    }

    #[inline]
    pub fn pub_key(&self) -> &PublicKey {
        &self.private.public
    }

    #[inline]
    pub fn priv_key(&self) -> &PrivateKey {
        &self.private
    }
}

/// An ElGamal ciphertext: `c1 = g^y mod p` and one masked value per block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    c1: BigUint,
    blocks: Vec<BigUint>,
    width: usize,
}

impl Ciphertext {
    pub fn c1(&self) -> &BigUint {
        &self.c1
    }

    pub fn blocks(&self) -> &[BigUint] {
        &self.blocks
    }

    /// Byte width of `c1` and of every block.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Serialize as `c1 | c2 blocks | u8 width`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let trailer = u8::try_from(self.width)
            .map_err(|_| Error::MalformedCiphertext("block width exceeds 255 bytes"))?;
        let mut out = Vec::with_capacity((self.blocks.len() + 1) * self.width + 1);
        for value in std::iter::once(&self.c1).chain(&self.blocks) {
            let bytes = biguint_to_fixed(value, self.width)
                .ok_or(Error::MalformedCiphertext("value wider than the block width"))?;
            out.extend_from_slice(&bytes);
        }
        out.push(trailer);
        Ok(out)
    }

    /// Parse the layout written by [`Ciphertext::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (&trailer, body) = bytes
            .split_last()
            .ok_or(Error::MalformedCiphertext("empty ciphertext"))?;
        let width = trailer as usize;
        if width == 0 || body.len() < 2 * width {
            return Err(Error::MalformedCiphertext("missing c1 or c2"));
        }
        let (c1, c2) = body.split_at(width);
        if c2.len() % width != 0 {
            return Err(Error::MalformedCiphertext("c2 is not a whole number of blocks"));
        }
        Ok(Self {
            c1: BigUint::from_bytes_be(c1),
            blocks: c2.chunks_exact(width).map(BigUint::from_bytes_be).collect(),
            width,
        })
    }
}

/// Encrypt `plaintext` and serialize the ciphertext.
pub fn elgamal_encrypt(public_key: &PublicKey, plaintext: &[u8], rng: &Randomness) -> Result<Vec<u8>> {
    public_key.encrypt(plaintext, rng)?.to_bytes()
}

/// Parse and decrypt the output of [`elgamal_encrypt`].
pub fn elgamal_decrypt(private_key: &PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    private_key.decrypt(&Ciphertext::from_bytes(ciphertext)?)
}
