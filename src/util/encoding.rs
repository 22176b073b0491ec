//! Length-prefixed wire format for persisted keys, signatures and bundles.
//!
//! ```text
//! [u8 version = 1]
//!   for each field:
//!     [u32 BE len][len bytes]
//! ```
//!
//! Fields are opaque byte strings, so leading zeros survive a round trip.

use num_bigint_dig::BigUint;

use crate::error::{Error, Result};

/// Version byte written at the start of every encoded stream.
pub const WIRE_VERSION: u8 = 1;

const LEN_PREFIX: usize = 4;

/// Concatenate `fields` into one versioned, length-prefixed stream.
pub fn encode_fields(fields: &[&[u8]]) -> Result<Vec<u8>> {
    let total: usize = fields.iter().map(|f| LEN_PREFIX + f.len()).sum();
    let mut out = Vec::with_capacity(1 + total);
    out.push(WIRE_VERSION);
    for field in fields {
        let len = u32::try_from(field.len()).map_err(|_| Error::FieldTooLong(field.len()))?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(field);
    }
    Ok(out)
}

/// Split a stream produced by [`encode_fields`] back into its fields.
pub fn decode_fields(bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let (&version, mut rest) = bytes.split_first().ok_or(Error::TruncatedEncoding)?;
    if version != WIRE_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let mut fields = Vec::new();
    while !rest.is_empty() {
        if rest.len() < LEN_PREFIX {
            return Err(Error::TruncatedEncoding);
        }
        let (prefix, tail) = rest.split_at(LEN_PREFIX);
        let mut len_buf = [0u8; LEN_PREFIX];
        len_buf.copy_from_slice(prefix);
        let len = u32::from_be_bytes(len_buf) as usize;
        if len > tail.len() {
            return Err(Error::TruncatedEncoding);
        }
        let (field, tail) = tail.split_at(len);
        fields.push(field.to_vec());
        rest = tail;
    }
    Ok(fields)
}

/// Decode a stream that must hold exactly `count` fields.
pub fn decode_exact(bytes: &[u8], count: usize) -> Result<Vec<Vec<u8>>> {
    let fields = decode_fields(bytes)?;
    if fields.len() != count {
        return Err(Error::FieldCount {
            expected: count,
            actual: fields.len(),
        });
    }
    Ok(fields)
}

/// Big-endian bytes of `value`, left-padded with zeros to `width`.
///
/// Returns `None` when the value needs more than `width` bytes.
pub fn biguint_to_fixed(value: &BigUint, width: usize) -> Option<Vec<u8>> {
    let bytes = value.to_bytes_be();
    // zero encodes as a single 0x00 byte
    let bytes: &[u8] = if bytes == [0] { &[] } else { &bytes };
    let offset = width.checked_sub(bytes.len())?;
    let mut out = vec![0u8; width];
    out[offset..].copy_from_slice(bytes);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::random::Randomness;

    #[test]
    fn roundtrip_mixed_fields() {
        let rng = Randomness::from_seed(21);
        let f1 = rng.bytes(10);
        let f2 = rng.bytes(10_000);
        let f3 = rng.bytes(100);

        let encoded = encode_fields(&[&f1, &f2, &f3]).unwrap();
        let decoded = decode_exact(&encoded, 3).unwrap();

        assert_eq!(decoded, vec![f1, f2, f3]);
    }

    #[test]
    fn empty_and_zero_fields_survive() {
        let zeros = [0u8; 5];
        let encoded = encode_fields(&[&[], &zeros, &[0]]).unwrap();
        let decoded = decode_fields(&encoded).unwrap();
        assert_eq!(decoded, vec![vec![], vec![0u8; 5], vec![0]]);
    }

    #[test]
    fn no_fields_is_just_the_version() {
        let encoded = encode_fields(&[]).unwrap();
        assert_eq!(encoded, vec![WIRE_VERSION]);
        assert!(decode_fields(&encoded).unwrap().is_empty());
    }

    #[test]
    fn layout_is_big_endian_length_prefixed() {
        let encoded = encode_fields(&[b"ab"]).unwrap();
        assert_eq!(encoded, vec![1, 0, 0, 0, 2, b'a', b'b']);
    }

    #[test]
    fn rejects_malformed_streams() {
        assert_eq!(decode_fields(&[]), Err(Error::TruncatedEncoding));
        assert_eq!(decode_fields(&[2, 0, 0, 0, 0]), Err(Error::UnsupportedVersion(2)));
        assert_eq!(decode_fields(&[1, 0, 0]), Err(Error::TruncatedEncoding));
        assert_eq!(decode_fields(&[1, 0, 0, 0, 3, 9]), Err(Error::TruncatedEncoding));

        let encoded = encode_fields(&[b"a", b"b"]).unwrap();
        assert_eq!(
            decode_exact(&encoded, 3),
            Err(Error::FieldCount { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn fixed_width_integers() {
        let v = BigUint::from(0x0102u32);
        assert_eq!(biguint_to_fixed(&v, 4), Some(vec![0, 0, 1, 2]));
        assert_eq!(biguint_to_fixed(&v, 2), Some(vec![1, 2]));
        assert_eq!(biguint_to_fixed(&v, 1), None);
        assert_eq!(biguint_to_fixed(&BigUint::from(0u32), 3), Some(vec![0, 0, 0]));
        assert_eq!(biguint_to_fixed(&BigUint::from(0u32), 0), Some(vec![]));
    }
}
