//! AES block encryption and ElGamal public-key encryption and signatures.
//!
//! ```
//! use aes_elgamal::{ElGamalKeyGenConfig, KeyPair, Randomness};
//!
//! let rng = Randomness::from_seed(7);
//! let config = ElGamalKeyGenConfig { prime_bits: 160, ..Default::default() };
//! let keys = KeyPair::generate(&config, &rng)?;
//!
//! let ciphertext = keys.pub_key().encrypt(b"attack at dawn", &rng)?;
//! assert_eq!(keys.priv_key().decrypt(&ciphertext)?, b"attack at dawn");
//! # Ok::<(), aes_elgamal::Error>(())
//! ```

pub mod error;
pub mod math;
pub mod security;
pub mod util;

pub use error::{Error, Result};
pub use security::{
    aes_decrypt, aes_encrypt, check_document, decrypt_block, elgamal_decrypt, elgamal_encrypt,
    encrypt_block, sign_document, AesCipher, AesKey, AesKeySize, Ciphertext, DocumentDigest,
    ElGamalKeyGenConfig, KeyPair, KeySchedule, PrivateKey, PublicKey, Sha256Digest, Signature,
    TruncatedDigest,
};
pub use util::Randomness;
