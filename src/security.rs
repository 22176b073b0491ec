pub mod aes;
pub mod elgamal;
pub mod signature;

// Re-export AES functionality
pub use aes::{
    aes_decrypt, aes_encrypt, decrypt_block, encrypt_block, AesCipher, AesKey, AesKeySize,
    KeySchedule, RoundKeys, AES_BLOCK_SIZE,
};

// Re-export ElGamal functionality
pub use elgamal::{
    elgamal_decrypt, elgamal_encrypt, Ciphertext, ElGamalKeyGenConfig, KeyPair, PrivateKey,
    PublicKey, MAX_PRIME_BITS, MIN_PRIME_BITS,
};

// Re-export signature functionality
pub use signature::{
    check_document, sign_document, DocumentDigest, Sha256Digest, Signature, TruncatedDigest,
};
