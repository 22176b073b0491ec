//! Reversible padding to a whole number of blocks.
//!
//! The padded message is the original bytes, then random filler, then one
//! byte giving the number of filler bytes. At least one byte (the trailer) is
//! always appended, so the padded length is the next block multiple strictly
//! greater than the input length.

use crate::error::{Error, Result};
use crate::util::random::Randomness;

/// Largest block size whose filler count still fits the one-byte trailer.
pub const MAX_PADDING_BLOCK: usize = 256;

/// Pad `data` to a multiple of `block_bits / 8` bytes (rounded up).
pub fn add_padding(data: &[u8], block_bits: usize, rng: &Randomness) -> Result<Vec<u8>> {
    let block = block_bits.div_ceil(8);
    if block == 0 || block > MAX_PADDING_BLOCK {
        return Err(Error::InvalidBlockSize(block));
    }

    let padded_len = (data.len() / block + 1) * block;
    let filler = padded_len - data.len() - 1;

    let mut out = Vec::with_capacity(padded_len);
    out.extend_from_slice(data);
    out.extend_from_slice(&rng.bytes(filler));
    out.push(filler as u8);
    Ok(out)
}

/// Strip the padding written by [`add_padding`].
pub fn remove_padding(data: &[u8]) -> Result<Vec<u8>> {
    let (&filler, body) = data.split_last().ok_or(Error::MalformedPadding)?;
    let keep = body
        .len()
        .checked_sub(filler as usize)
        .ok_or(Error::MalformedPadding)?;
    Ok(body[..keep].to_vec())
}
