//! Support code shared by the ciphers: randomness, padding and the wire format.

pub mod encoding;
pub mod padding;
pub mod random;

pub use encoding::{decode_exact, decode_fields, encode_fields, WIRE_VERSION};
pub use padding::{add_padding, remove_padding};
pub use random::Randomness;
