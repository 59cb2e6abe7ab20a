//! Property-based checks for the round-trip, framing, and distribution laws
//! this codec is expected to satisfy.

use proptest::prelude::*;

use qr_stego::distribution::distribution;
use qr_stego::engine::DefaultQrEngine;
use qr_stego::frame::{decode_frame, encode_frame};
use qr_stego::{capacity_bytes, decode_matrix, encode, validate_capacity, DecodeOptions, EncodeOptions, Matrix};

fn matrix_to_rows(matrix: &Matrix) -> Vec<Vec<bool>> {
    (0..matrix.size())
        .map(|y| (0..matrix.size()).map(|x| matrix.get_module(x, y)).collect())
        .collect()
}

fn ascii_message() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,40}"
}

proptest! {
    /// Round-trip identity: for any secondary that fits the
    /// primary's capacity, decoding the encoded matrix recovers it exactly.
    #[test]
    fn round_trip_identity(secondary in ascii_message()) {
        let primary = "https://example.com/path/to/page";
        if !validate_capacity(primary, &secondary, qr_engine::CodeEcc::High, 0.07).unwrap() {
            return Ok(());
        }
        let encoded = encode(&DefaultQrEngine, primary, &secondary, EncodeOptions::default()).unwrap();
        let scanned = Matrix::from_rows(&matrix_to_rows(&encoded.matrix)).unwrap();
        let decoded = decode_matrix(&DefaultQrEngine, &scanned, primary, DecodeOptions::default()).unwrap();
        prop_assert_eq!(decoded.secondary, secondary);
    }

    /// Frame round-trip.
    #[test]
    fn frame_round_trip(message in ascii_message()) {
        let bits = encode_frame(&message, 32 + 8 * message.len()).unwrap();
        prop_assert_eq!(decode_frame(&bits).unwrap(), message);
    }

    /// Distribution uniqueness and index bounds.
    #[test]
    fn distribution_indices_are_distinct_and_in_bounds(total in 3usize..500, frac in 0.0f64..1.0) {
        let need = ((total as f64) * frac) as usize;
        let seq = distribution(need, total).unwrap();
        let mut sorted = seq.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), seq.len());
        prop_assert!(seq.iter().all(|&i| i < total));
    }

    /// Monotone capacity.
    #[test]
    fn capacity_grows_with_safety_margin(margin_a in 0.01f64..0.5, margin_b in 0.01f64..0.5) {
        let primary = "https://example.com/path/to/page";
        let (lo, hi) = if margin_a <= margin_b { (margin_a, margin_b) } else { (margin_b, margin_a) };
        let cap_lo = capacity_bytes(primary, qr_engine::CodeEcc::High, lo).unwrap();
        let cap_hi = capacity_bytes(primary, qr_engine::CodeEcc::High, hi).unwrap();
        prop_assert!(cap_lo <= cap_hi);
    }

    /// Tamper detection: flipping a payload bit (not length
    /// or CRC) must surface as a checksum mismatch.
    #[test]
    fn tamper_detection(message in "[a-zA-Z0-9]{1,20}", flip_offset in 0usize..160) {
        let bits = encode_frame(&message, 32 + 8 * message.len()).unwrap();
        let payload_bits = 8 * message.len();
        if payload_bits == 0 {
            return Ok(());
        }
        let flip = 16 + (flip_offset % payload_bits);
        let mut tampered = bits.clone();
        tampered[flip] = !tampered[flip];
        prop_assert!(decode_frame(&tampered).is_err());
    }
}
