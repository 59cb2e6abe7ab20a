//! Bit framing: packs and unpacks `[len:16 | payload:8*L | crc:16]`.
//!
//! Bits are represented the same way `qr-engine`'s `BitBuffer` represents
//! them — one `bool` per bit, most-significant bit first within each field.

use crate::crc16::crc16_ccitt_false;
use crate::error::StegoError;

/// Appends the `len` low-order bits of `val`, most-significant first.
fn push_bits(bits: &mut Vec<bool>, val: u32, len: u32) {
    for i in (0..len).rev() {
        bits.push((val >> i) & 1 != 0);
    }
}

/// Reads `len` bits starting at `bits[offset]` as a big-endian unsigned value.
pub(crate) fn read_bits(bits: &[bool], offset: usize, len: usize) -> u32 {
    let mut val: u32 = 0;
    for &bit in &bits[offset..offset + len] {
        val = (val << 1) | u32::from(bit);
    }
    val
}

/// Encodes `message` as a length-prefixed, checksummed bit stream.
///
/// Fails with [`StegoError::PayloadTooLarge`] if the frame (32 header/trailer
/// bits plus 8 bits per payload byte) would not fit in `max_bits`.
pub fn encode_frame(message: &str, max_bits: usize) -> Result<Vec<bool>, StegoError> {
    let payload = message.as_bytes();
    let need = 32 + 8 * payload.len();
    if need > max_bits {
        return Err(StegoError::PayloadTooLarge { need, max: max_bits });
    }

    let mut bits = Vec::with_capacity(need);
    push_bits(&mut bits, payload.len() as u32, 16);
    for &byte in payload {
        push_bits(&mut bits, u32::from(byte), 8);
    }
    push_bits(&mut bits, u32::from(crc16_ccitt_false(payload)), 16);
    Ok(bits)
}

/// Decodes a bit stream produced by [`encode_frame`] back into a string.
///
/// Validates the frame's declared length and CRC-16 before returning.
pub fn decode_frame(bits: &[bool]) -> Result<String, StegoError> {
    if bits.len() < 32 {
        return Err(StegoError::ShortFrame { got: bits.len() });
    }
    let len = read_bits(bits, 0, 16) as usize;
    let need = 32 + 8 * len;
    if need > bits.len() {
        return Err(StegoError::BadLength {
            need,
            available: bits.len(),
        });
    }

    let mut payload = Vec::with_capacity(len);
    for i in 0..len {
        payload.push(read_bits(bits, 16 + 8 * i, 8) as u8);
    }
    let expected = read_bits(bits, 16 + 8 * len, 16) as u16;
    let got = crc16_ccitt_false(&payload);
    if expected != got {
        return Err(StegoError::ChecksumMismatch { expected, got });
    }

    String::from_utf8(payload).map_err(StegoError::InvalidUtf8)
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn round_trip_a_nonempty_message() {
        let bits = encode_frame("SECRET", 1024).unwrap();
        assert_eq!(decode_frame(&bits).unwrap(), "SECRET");
    }

    #[test]
    fn round_trip_the_empty_message() {
        let bits = encode_frame("", 32).unwrap();
        assert_eq!(bits.len(), 32);
        assert_eq!(decode_frame(&bits).unwrap(), "");
    }

    #[test]
    fn reject_a_payload_that_does_not_fit() {
        let err = encode_frame(&"x".repeat(1000), 64).unwrap_err();
        assert!(matches!(err, StegoError::PayloadTooLarge { .. }));
    }

    #[test]
    fn reject_a_frame_shorter_than_the_length_field() {
        let err = decode_frame(&[true; 10]).unwrap_err();
        assert!(matches!(err, StegoError::ShortFrame { got: 10 }));
    }

    #[test]
    fn reject_a_declared_length_past_the_end_of_the_frame() {
        // len field claims 1 byte but only the 32-bit header is present.
        let mut bits = vec![false; 32];
        bits[15] = true; // len = 1
        let err = decode_frame(&bits).unwrap_err();
        assert!(matches!(err, StegoError::BadLength { .. }));
    }

    #[test]
    fn reject_a_tampered_payload_bit() {
        let mut bits = encode_frame("tamper me", 1024).unwrap();
        let flip = 16; // first payload bit, not length or crc
        bits[flip] = !bits[flip];
        let err = decode_frame(&bits).unwrap_err();
        assert!(matches!(err, StegoError::ChecksumMismatch { .. }));
    }
}
