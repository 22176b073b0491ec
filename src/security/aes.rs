//! AES (Rijndael) block cipher with 128, 192 and 256-bit keys.
//!
//! The state is a 16-byte block holding a 4x4 byte matrix in column-major
//! order (`state[row + 4 * col]`) and is transformed in place. A cipher with
//! `Nk` key words runs `6 + Nk` rounds.
//!
//! Two key schedules are available, see [`KeySchedule`]. They produce
//! different ciphertexts for the same key.
//!
//! Byte-level encryption pads the message (see [`crate::util::padding`]) and
//! encrypts each 16-byte block independently. There is no chaining mode.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::util::padding::{add_padding, remove_padding};
use crate::util::random::Randomness;

/// AES block size in bytes (128 bits).
pub const AES_BLOCK_SIZE: usize = 16;

/// Represents key sizes for AES: 128, 192, or 256 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesKeySize {
    Bits128,
    Bits192,
    Bits256,
}

impl AesKeySize {
    /// Key size for a key of `len` bytes.
    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(Self::Bits128),
            24 => Ok(Self::Bits192),
            32 => Ok(Self::Bits256),
            other => Err(Error::InvalidKeyLength(other)),
        }
    }

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        self.words() * 4
    }

    /// Key length in 32-bit words (`Nk`).
    pub fn words(self) -> usize {
        match self {
            Self::Bits128 => 4,
            Self::Bits192 => 6,
            Self::Bits256 => 8,
        }
    }

    /// Number of rounds (`Nr = 6 + Nk`).
    pub fn rounds(self) -> usize {
        6 + self.words()
    }
}

/// Key expansion algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeySchedule {
    /// FIPS-197 expansion with word rotation and round constants.
    #[default]
    Fips197,
    /// Simplified expansion without rotation or round constants.
    ///
    /// `rounds * key_len` bytes are produced by substituting the byte one key
    /// length earlier. Subkey `j` is the first 16 bytes of the `j`-th
    /// key-length chunk, and the final round reuses subkey `rounds - 1`.
    ///
    /// Only the round keys differ from [`KeySchedule::Fips197`]. The state
    /// layout, the 16-byte block and the padding stay the same, so this is
    /// not ciphertext-compatible with tools that used the simplified
    /// expansion on a row-major state or key-sized blocks.
    Legacy,
}

/// Raw AES key material.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AesKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    size: AesKeySize,
}

impl AesKey {
    /// Wrap `key_data`, which must be 16, 24 or 32 bytes long.
    pub fn new(key_data: &[u8]) -> Result<Self> {
        let size = AesKeySize::from_len(key_data.len())?;
        Ok(Self {
            bytes: key_data.to_vec(),
            size,
        })
    }

    /// Fresh random key of the given size.
    pub fn generate(size: AesKeySize, rng: &Randomness) -> Self {
        Self {
            bytes: rng.bytes(size.key_len()),
            size,
        }
    }

    pub fn size(&self) -> AesKeySize {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for AesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesKey")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// An AES key schedule object, storing the round keys after expansion.
///
/// Always holds `rounds + 1` round keys; entry 0 is mixed in before the
/// first round and entry `rounds` after the last.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RoundKeys {
    keys: Vec<[u8; AES_BLOCK_SIZE]>,
    rounds: usize,
}

impl RoundKeys {
    /// Expand `key` with the chosen schedule.
    pub fn expand(key: &AesKey, schedule: KeySchedule) -> Self {
        let rounds = key.size.rounds();
        let keys = match schedule {
            KeySchedule::Fips197 => fips_expansion(&key.bytes, key.size.words(), rounds),
            KeySchedule::Legacy => legacy_expansion(&key.bytes, rounds),
        };
        Self { keys, rounds }
    }

    /// Number of rounds (`Nr`).
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Round key applied after round `round` (0 = initial whitening).
    pub fn round_key(&self, round: usize) -> &[u8; AES_BLOCK_SIZE] {
        &self.keys[round]
    }
}

/// Encrypt a single 128-bit block in place using the provided key schedule.
pub fn aes_encrypt_block(state: &mut [u8; AES_BLOCK_SIZE], keys: &RoundKeys) {
    add_round_key(state, keys.round_key(0));

    for round in 1..keys.rounds {
        sub_bytes(state);
        shift_rows(state);
        mix_columns(state);
        add_round_key(state, keys.round_key(round));
    }

    // final round
    sub_bytes(state);
    shift_rows(state);
    add_round_key(state, keys.round_key(keys.rounds));
}

/// Decrypt a single 128-bit block in place using the provided key schedule.
pub fn aes_decrypt_block(state: &mut [u8; AES_BLOCK_SIZE], keys: &RoundKeys) {
    add_round_key(state, keys.round_key(keys.rounds));
    inv_shift_rows(state);
    inv_sub_bytes(state);

    for round in (1..keys.rounds).rev() {
        add_round_key(state, keys.round_key(round));
        inv_mix_columns(state);
        inv_shift_rows(state);
        inv_sub_bytes(state);
    }

    add_round_key(state, keys.round_key(0));
}

/// A keyed AES instance; the round keys are expanded once and wiped on drop.
pub struct AesCipher {
    round_keys: RoundKeys,
}

impl AesCipher {
    pub fn new(key: &AesKey, schedule: KeySchedule) -> Self {
        Self {
            round_keys: RoundKeys::expand(key, schedule),
        }
    }

    /// Build a cipher directly from raw key bytes.
    pub fn from_key_bytes(key: &[u8], schedule: KeySchedule) -> Result<Self> {
        Ok(Self::new(&AesKey::new(key)?, schedule))
    }

    /// Encrypt one 16-byte block in place.
    pub fn encrypt_block(&self, block: &mut [u8]) -> Result<()> {
        aes_encrypt_block(as_state(block)?, &self.round_keys);
        Ok(())
    }

    /// Decrypt one 16-byte block in place.
    pub fn decrypt_block(&self, block: &mut [u8]) -> Result<()> {
        aes_decrypt_block(as_state(block)?, &self.round_keys);
        Ok(())
    }

    /// Pad `data` and encrypt it block by block.
    pub fn encrypt(&self, data: &[u8], rng: &Randomness) -> Result<Vec<u8>> {
        let mut out = add_padding(data, AES_BLOCK_SIZE * 8, rng)?;
        for chunk in out.chunks_exact_mut(AES_BLOCK_SIZE) {
            self.encrypt_block(chunk)?;
        }
        Ok(out)
    }

    /// Decrypt the output of [`AesCipher::encrypt`] and strip its padding.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() % AES_BLOCK_SIZE != 0 {
            return Err(Error::MalformedCiphertext(
                "length is not a positive multiple of the block size",
            ));
        }
        let mut out = ciphertext.to_vec();
        for chunk in out.chunks_exact_mut(AES_BLOCK_SIZE) {
            self.decrypt_block(chunk)?;
        }
        let plain = remove_padding(&out);
        out.zeroize();
        plain
    }
}

/// Encrypt one block in place under `key` with the FIPS-197 schedule.
pub fn encrypt_block(block: &mut [u8], key: &[u8]) -> Result<()> {
    AesCipher::from_key_bytes(key, KeySchedule::default())?.encrypt_block(block)
}

/// Exact inverse of [`encrypt_block`].
pub fn decrypt_block(block: &mut [u8], key: &[u8]) -> Result<()> {
    AesCipher::from_key_bytes(key, KeySchedule::default())?.decrypt_block(block)
}

/// Pad and encrypt a byte string of any length.
pub fn aes_encrypt(data: &[u8], key: &[u8], rng: &Randomness) -> Result<Vec<u8>> {
    AesCipher::from_key_bytes(key, KeySchedule::default())?.encrypt(data, rng)
}

/// Decrypt the output of [`aes_encrypt`].
pub fn aes_decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    AesCipher::from_key_bytes(key, KeySchedule::default())?.decrypt(ciphertext)
}

fn as_state(block: &mut [u8]) -> Result<&mut [u8; AES_BLOCK_SIZE]> {
    let actual = block.len();
    block.try_into().map_err(|_| Error::InvalidBlockLength {
        expected: AES_BLOCK_SIZE,
        actual,
    })
}

// ---------------- Round transformations ---------------- //

/// S-Box for AES subBytes
static SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// Inverse S-Box for AES invSubBytes
static INV_SBOX: [u8; 256] = [
    0x52, 0x09, 0x6a, 0xd5, 0x30, 0x36, 0xa5, 0x38, 0xbf, 0x40, 0xa3, 0x9e, 0x81, 0xf3, 0xd7, 0xfb,
    0x7c, 0xe3, 0x39, 0x82, 0x9b, 0x2f, 0xff, 0x87, 0x34, 0x8e, 0x43, 0x44, 0xc4, 0xde, 0xe9, 0xcb,
    0x54, 0x7b, 0x94, 0x32, 0xa6, 0xc2, 0x23, 0x3d, 0xee, 0x4c, 0x95, 0x0b, 0x42, 0xfa, 0xc3, 0x4e,
    0x08, 0x2e, 0xa1, 0x66, 0x28, 0xd9, 0x24, 0xb2, 0x76, 0x5b, 0xa2, 0x49, 0x6d, 0x8b, 0xd1, 0x25,
    0x72, 0xf8, 0xf6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xd4, 0xa4, 0x5c, 0xcc, 0x5d, 0x65, 0xb6, 0x92,
    0x6c, 0x70, 0x48, 0x50, 0xfd, 0xed, 0xb9, 0xda, 0x5e, 0x15, 0x46, 0x57, 0xa7, 0x8d, 0x9d, 0x84,
    0x90, 0xd8, 0xab, 0x00, 0x8c, 0xbc, 0xd3, 0x0a, 0xf7, 0xe4, 0x58, 0x05, 0xb8, 0xb3, 0x45, 0x06,
    0xd0, 0x2c, 0x1e, 0x8f, 0xca, 0x3f, 0x0f, 0x02, 0xc1, 0xaf, 0xbd, 0x03, 0x01, 0x13, 0x8a, 0x6b,
    0x3a, 0x91, 0x11, 0x41, 0x4f, 0x67, 0xdc, 0xea, 0x97, 0xf2, 0xcf, 0xce, 0xf0, 0xb4, 0xe6, 0x73,
    0x96, 0xac, 0x74, 0x22, 0xe7, 0xad, 0x35, 0x85, 0xe2, 0xf9, 0x37, 0xe8, 0x1c, 0x75, 0xdf, 0x6e,
    0x47, 0xf1, 0x1a, 0x71, 0x1d, 0x29, 0xc5, 0x89, 0x6f, 0xb7, 0x62, 0x0e, 0xaa, 0x18, 0xbe, 0x1b,
    0xfc, 0x56, 0x3e, 0x4b, 0xc6, 0xd2, 0x79, 0x20, 0x9a, 0xdb, 0xc0, 0xfe, 0x78, 0xcd, 0x5a, 0xf4,
    0x1f, 0xdd, 0xa8, 0x33, 0x88, 0x07, 0xc7, 0x31, 0xb1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xec, 0x5f,
    0x60, 0x51, 0x7f, 0xa9, 0x19, 0xb5, 0x4a, 0x0d, 0x2d, 0xe5, 0x7a, 0x9f, 0x93, 0xc9, 0x9c, 0xef,
    0xa0, 0xe0, 0x3b, 0x4d, 0xae, 0x2a, 0xf5, 0xb0, 0xc8, 0xeb, 0xbb, 0x3c, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2b, 0x04, 0x7e, 0xba, 0x77, 0xd6, 0x26, 0xe1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0c, 0x7d,
];

/// Round constants for FIPS-197 key expansion (index 0 unused).
const RCON: [u8; 11] = [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Diffusion matrix for MixColumns over GF(2^8).
const MIX_MATRIX: [[u8; 4]; 4] = [[2, 3, 1, 1], [1, 2, 3, 1], [1, 1, 2, 3], [3, 1, 1, 2]];

/// Inverse of [`MIX_MATRIX`].
const INV_MIX_MATRIX: [[u8; 4]; 4] = [
    [14, 11, 13, 9],
    [9, 14, 11, 13],
    [13, 9, 14, 11],
    [11, 13, 9, 14],
];

fn sub_bytes(state: &mut [u8; AES_BLOCK_SIZE]) {
    for b in state.iter_mut() {
        *b = SBOX[*b as usize];
    }
}

fn inv_sub_bytes(state: &mut [u8; AES_BLOCK_SIZE]) {
    for b in state.iter_mut() {
        *b = INV_SBOX[*b as usize];
    }
}

/// Row `r` rotates left by `r` positions.
fn shift_rows(state: &mut [u8; AES_BLOCK_SIZE]) {
    let old = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[row + 4 * col] = old[row + 4 * ((col + row) % 4)];
        }
    }
}

fn inv_shift_rows(state: &mut [u8; AES_BLOCK_SIZE]) {
    let old = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[row + 4 * ((col + row) % 4)] = old[row + 4 * col];
        }
    }
}

fn mix_columns(state: &mut [u8; AES_BLOCK_SIZE]) {
    apply_matrix(state, &MIX_MATRIX);
}

fn inv_mix_columns(state: &mut [u8; AES_BLOCK_SIZE]) {
    apply_matrix(state, &INV_MIX_MATRIX);
}

/// Multiply every state column by `matrix` in GF(2^8).
fn apply_matrix(state: &mut [u8; AES_BLOCK_SIZE], matrix: &[[u8; 4]; 4]) {
    for column in state.chunks_exact_mut(4) {
        let a = [column[0], column[1], column[2], column[3]];
        for (out, coeffs) in column.iter_mut().zip(matrix) {
            *out = coeffs
                .iter()
                .zip(a)
                .fold(0, |acc, (&c, x)| acc ^ gf_mul(c, x));
        }
    }
}

/// Carry-less multiplication modulo x^8 + x^4 + x^3 + x + 1.
fn gf_mul(x: u8, y: u8) -> u8 {
    let mut r = 0;
    let mut a = x;
    let mut b = y;
    for _ in 0..8 {
        if (b & 1) == 1 {
            r ^= a;
        }
        let hi_bit_set = (a & 0x80) != 0;
        a <<= 1;
        if hi_bit_set {
            a ^= 0x1b;
        }
        b >>= 1;
    }
    r
}

fn add_round_key(state: &mut [u8; AES_BLOCK_SIZE], round_key: &[u8; AES_BLOCK_SIZE]) {
    for (s, k) in state.iter_mut().zip(round_key) {
        *s ^= *k;
    }
}

// ---------------- Key schedules ---------------- //

fn fips_expansion(key: &[u8], nk: usize, nr: usize) -> Vec<[u8; AES_BLOCK_SIZE]> {
    let total_words = (nr + 1) * 4;
    let mut expanded = vec![0u8; total_words * 4];
    expanded[..key.len()].copy_from_slice(key);

    for i in nk..total_words {
        let mut temp = [
            expanded[(i - 1) * 4],
            expanded[(i - 1) * 4 + 1],
            expanded[(i - 1) * 4 + 2],
            expanded[(i - 1) * 4 + 3],
        ];

        if i % nk == 0 {
            temp.rotate_left(1);
            for t in temp.iter_mut() {
                *t = SBOX[*t as usize];
            }
            temp[0] ^= RCON[i / nk];
        } else if nk > 6 && i % nk == 4 {
            for t in temp.iter_mut() {
                *t = SBOX[*t as usize];
            }
        }

        let wprev = (i - nk) * 4;
        for (j, tj) in temp.iter().enumerate() {
            expanded[i * 4 + j] = expanded[wprev + j] ^ tj;
        }
    }

    let keys = expanded
        .chunks_exact(AES_BLOCK_SIZE)
        .map(to_round_key)
        .collect();
    expanded.zeroize();
    keys
}

fn legacy_expansion(key: &[u8], nr: usize) -> Vec<[u8; AES_BLOCK_SIZE]> {
    let key_len = key.len();
    let mut expanded = vec![0u8; nr * key_len];
    expanded[..key_len].copy_from_slice(key);
    for i in key_len..expanded.len() {
        expanded[i] = SBOX[expanded[i - key_len] as usize];
    }

    let mut keys: Vec<[u8; AES_BLOCK_SIZE]> = expanded
        .chunks_exact(key_len)
        .map(|subkey| to_round_key(&subkey[..AES_BLOCK_SIZE]))
        .collect();
    keys.push(keys[nr - 1]);
    expanded.zeroize();
    keys
}

fn to_round_key(bytes: &[u8]) -> [u8; AES_BLOCK_SIZE] {
    let mut key = [0u8; AES_BLOCK_SIZE];
    key.copy_from_slice(bytes);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_block(s: &str) -> [u8; AES_BLOCK_SIZE] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    fn random_state(rng: &Randomness) -> [u8; AES_BLOCK_SIZE] {
        rng.bytes(AES_BLOCK_SIZE).try_into().unwrap()
    }

    // "Fips-197" example: key=2b7e151628aed2a6abf7158809cf4f3c, plaintext=6bc1bee22e409f96e93d7e117393172a
    // ciphertext=3ad77bb40d7a3660a89ecaf32466ef97
    #[test]
    fn test_aes128_encrypt_block() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let mut block = hex_block("6bc1bee22e409f96e93d7e117393172a");

        encrypt_block(&mut block, &key).unwrap();
        assert_eq!(block, hex_block("3ad77bb40d7a3660a89ecaf32466ef97"));

        decrypt_block(&mut block, &key).unwrap();
        assert_eq!(block, hex_block("6bc1bee22e409f96e93d7e117393172a"));
    }

    #[test]
    fn fips197_appendix_c_vectors() {
        let plaintext = hex_block("00112233445566778899aabbccddeeff");
        let cases = [
            (
                "000102030405060708090a0b0c0d0e0f",
                "69c4e0d86a7b0430d8cdb78070b4c55a",
            ),
            (
                "000102030405060708090a0b0c0d0e0f1011121314151617",
                "dda97ca4864cdfe06eaf70a0ec0d7191",
            ),
            (
                "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
                "8ea2b7ca516745bfeafc49904b496089",
            ),
        ];
        for (key, expected) in cases {
            let key = hex::decode(key).unwrap();
            let mut block = plaintext;
            encrypt_block(&mut block, &key).unwrap();
            assert_eq!(block, hex_block(expected));
            decrypt_block(&mut block, &key).unwrap();
            assert_eq!(block, plaintext);
        }
    }

    #[test]
    fn round_counts_follow_key_words() {
        assert_eq!(AesKeySize::Bits128.rounds(), 10);
        assert_eq!(AesKeySize::Bits192.rounds(), 12);
        assert_eq!(AesKeySize::Bits256.rounds(), 14);
        for size in [AesKeySize::Bits128, AesKeySize::Bits192, AesKeySize::Bits256] {
            assert_eq!(AesKeySize::from_len(size.key_len()), Ok(size));
        }
        assert_eq!(AesKeySize::from_len(20), Err(Error::InvalidKeyLength(20)));
    }

    #[test]
    fn gf_multiplication() {
        assert_eq!(gf_mul(0x57, 0x83), 0xc1);
        assert_eq!(gf_mul(0x57, 0x13), 0xfe);
        assert_eq!(gf_mul(0x57, 0x02), 0xae);
        assert_eq!(gf_mul(0x00, 0xff), 0x00);
        assert_eq!(gf_mul(0x01, 0xab), 0xab);
    }

    #[test]
    fn mix_columns_known_column() {
        let mut state = [0u8; AES_BLOCK_SIZE];
        state[..4].copy_from_slice(&[0xdb, 0x13, 0x53, 0x45]);
        state[4..8].copy_from_slice(&[0xf2, 0x0a, 0x22, 0x5c]);
        mix_columns(&mut state);
        assert_eq!(state[..4], [0x8eu8, 0x4d, 0xa1, 0xbc]);
        assert_eq!(state[4..8], [0x9fu8, 0xdc, 0x58, 0x9d]);
    }

    #[test]
    fn shift_rows_rotates_each_row() {
        let mut state: [u8; AES_BLOCK_SIZE] = core::array::from_fn(|i| i as u8);
        shift_rows(&mut state);
        assert_eq!(
            state,
            [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11]
        );
    }

    #[test]
    fn sub_bytes_is_invertible() {
        let rng = Randomness::from_seed(51);
        let original = random_state(&rng);
        let mut state = original;
        sub_bytes(&mut state);
        assert_ne!(state, original);
        inv_sub_bytes(&mut state);
        assert_eq!(state, original);
    }

    #[test]
    fn shift_rows_is_invertible() {
        let rng = Randomness::from_seed(52);
        let original = random_state(&rng);
        let mut state = original;
        shift_rows(&mut state);
        assert_ne!(state, original);
        inv_shift_rows(&mut state);
        assert_eq!(state, original);
    }

    #[test]
    fn mix_columns_is_invertible() {
        let rng = Randomness::from_seed(53);
        for _ in 0..32 {
            let original = random_state(&rng);
            let mut state = original;
            mix_columns(&mut state);
            inv_mix_columns(&mut state);
            assert_eq!(state, original);
        }
    }

    #[test]
    fn legacy_schedule_substitutes_previous_chunk() {
        let key = AesKey::new(&[0u8; 16]).unwrap();
        let keys = RoundKeys::expand(&key, KeySchedule::Legacy);
        assert_eq!(keys.rounds(), 10);
        assert_eq!(keys.round_key(0), &[0u8; 16]);
        assert_eq!(keys.round_key(1), &[SBOX[0]; 16]);
        assert_eq!(keys.round_key(2), &[SBOX[SBOX[0] as usize]; 16]);
        assert_eq!(keys.round_key(10), keys.round_key(9));

        let key = AesKey::new(&(0u8..32).collect::<Vec<_>>()).unwrap();
        let keys = RoundKeys::expand(&key, KeySchedule::Legacy);
        assert_eq!(keys.rounds(), 14);
        let expected: Vec<u8> = (0u8..16).map(|b| SBOX[b as usize]).collect();
        assert_eq!(keys.round_key(1).as_slice(), expected.as_slice());
    }

    #[test]
    fn legacy_block_roundtrip_for_all_key_sizes() {
        let rng = Randomness::from_seed(54);
        let plain = [15u8, 19, 87, 13, 46, 43, 1, 2, 3, 4, 5, 6, 7, 8, 9, 8];
        for size in [AesKeySize::Bits128, AesKeySize::Bits192, AesKeySize::Bits256] {
            let key = AesKey::generate(size, &rng);
            let cipher = AesCipher::new(&key, KeySchedule::Legacy);
            let mut block = plain;
            cipher.encrypt_block(&mut block).unwrap();
            assert_ne!(block, plain);
            cipher.decrypt_block(&mut block).unwrap();
            assert_eq!(block, plain);
        }
    }

    #[test]
    fn legacy_schedule_keeps_sixteen_byte_blocks() {
        let rng = Randomness::from_seed(58);
        let key = AesKey::generate(AesKeySize::Bits256, &rng);
        let legacy = AesCipher::new(&key, KeySchedule::Legacy);
        let fips = AesCipher::new(&key, KeySchedule::Fips197);

        let data = rng.bytes(20);
        let encrypted = legacy.encrypt(&data, &rng).unwrap();
        assert_eq!(encrypted.len(), 2 * AES_BLOCK_SIZE);
        assert_eq!(legacy.decrypt(&encrypted).unwrap(), data);
        assert!(fips.decrypt(&encrypted).ok() != Some(data));

        let mut wide = [0u8; 32];
        assert_eq!(
            legacy.encrypt_block(&mut wide),
            Err(Error::InvalidBlockLength {
                expected: AES_BLOCK_SIZE,
                actual: 32
            })
        );
    }

    #[test]
    fn schedules_give_different_ciphertexts() {
        let rng = Randomness::from_seed(55);
        let key = AesKey::generate(AesKeySize::Bits128, &rng);
        let mut a = [7u8; 16];
        let mut b = [7u8; 16];
        AesCipher::new(&key, KeySchedule::Fips197).encrypt_block(&mut a).unwrap();
        AesCipher::new(&key, KeySchedule::Legacy).encrypt_block(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn aes128_scenario_block() {
        let rng = Randomness::from_seed(56);
        let plain = [15u8, 19, 87, 13, 46, 43, 1, 2, 3, 4, 5, 6, 7, 8, 9, 8];
        let key = rng.bytes(16);

        let encrypted = aes_encrypt(&plain, &key, &rng).unwrap();
        assert_eq!(encrypted.len(), 32);
        assert_eq!(aes_decrypt(&encrypted, &key).unwrap(), plain);
    }

    #[test]
    fn byte_level_roundtrip() {
        let rng = Randomness::from_seed(57);
        for schedule in [KeySchedule::Fips197, KeySchedule::Legacy] {
            for size in [AesKeySize::Bits128, AesKeySize::Bits192, AesKeySize::Bits256] {
                let cipher = AesCipher::new(&AesKey::generate(size, &rng), schedule);
                for len in [0usize, 1, 15, 16, 17, 100, 1000] {
                    let data = rng.bytes(len);
                    let encrypted = cipher.encrypt(&data, &rng).unwrap();
                    assert_eq!(encrypted.len() % AES_BLOCK_SIZE, 0);
                    assert!(encrypted.len() > len);
                    assert_eq!(cipher.decrypt(&encrypted).unwrap(), data);
                }
            }
        }
    }

    #[test]
    fn rejects_bad_lengths() {
        let key = [0u8; 16];
        let mut short = [0u8; 15];
        assert_eq!(
            encrypt_block(&mut short, &key),
            Err(Error::InvalidBlockLength {
                expected: 16,
                actual: 15
            })
        );
        let mut block = [0u8; 16];
        assert_eq!(
            encrypt_block(&mut block, &[0u8; 17]),
            Err(Error::InvalidKeyLength(17))
        );
        assert!(matches!(
            aes_decrypt(&[0u8; 20], &key),
            Err(Error::MalformedCiphertext(_))
        ));
        assert!(matches!(aes_decrypt(&[], &key), Err(Error::MalformedCiphertext(_))));
    }
}
