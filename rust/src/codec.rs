//! Text form of an XID: 20 symbols of base32hex, lowercase, no padding.
//!
//! The 96 payload bits are written most significant first and followed by 4
//! zero bits, so the text sorts exactly like the raw bytes.

use crate::xid::{RAW_LEN, XidError};

/// Base32 alphabet in ascending ASCII order.
pub const ENCODING: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
/// Length of the text form.
pub const TEXT_LEN: usize = 20;

const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: usize = 5;
/// Bits past the 96-bit payload carried by the last symbol.
const PAD_BITS: usize = TEXT_LEN * BITS_PER_CHAR - RAW_LEN * 8;

const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0;
    while i < 32 {
        lut[ENCODING[i] as usize] = i as u8;
        i += 1;
    }
    lut
};

fn bytes_to_u128(raw: &[u8; RAW_LEN]) -> u128 {
    raw.iter().fold(0u128, |acc, &b| (acc << 8) | u128::from(b))
}

/// Encode raw bytes into the 20-symbol text form.
pub fn encode_text(raw: &[u8; RAW_LEN]) -> [u8; TEXT_LEN] {
    let bits = bytes_to_u128(raw) << PAD_BITS;
    let mut out = [0u8; TEXT_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = BITS_PER_CHAR * (TEXT_LEN - 1 - i);
        *slot = ENCODING[((bits >> shift) & 0x1F) as usize];
    }
    out
}

/// Decode a text form back into raw bytes.
///
/// Rejects anything that `encode_text` could not have produced: wrong length,
/// symbols outside the lowercase alphabet, or non-zero padding bits.
pub fn decode_text(text: &str) -> Result<[u8; RAW_LEN], XidError> {
    let malformed = || XidError::MalformedInput(text.to_string());

    if text.len() != TEXT_LEN {
        return Err(malformed());
    }

    let mut bits = 0u128;
    for b in text.bytes() {
        let val = LOOKUP[b as usize];
        if val == NO_VALUE {
            return Err(malformed());
        }
        bits = (bits << BITS_PER_CHAR) | u128::from(val);
    }

    if bits & ((1 << PAD_BITS) - 1) != 0 {
        return Err(malformed());
    }

    let wide = (bits >> PAD_BITS).to_be_bytes();
    let mut raw = [0u8; RAW_LEN];
    raw.copy_from_slice(&wide[wide.len() - RAW_LEN..]);
    Ok(raw)
}

/// Check that `text` is a well-formed XID without keeping the result.
pub fn validate(text: &str) -> Result<(), XidError> {
    decode_text(text).map(|_| ())
}
