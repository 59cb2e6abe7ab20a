//! Core end-to-end scenarios this codec is expected to handle.

use std::sync::Once;

use qr_engine::CodeEcc;
use qr_stego::engine::DefaultQrEngine;
use qr_stego::{capacity_bytes, decode_matrix, encode, validate_capacity, DecodeOptions, EncodeOptions, Matrix, StegoError};
use tracing_subscriber::prelude::*;

static TRACING: Once = Once::new();

/// Installs a `tracing` subscriber once per test binary, so `encode`/`decode`'s
/// debug/trace/warn events are visible when running with `--nocapture`.
fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    });
}

fn matrix_to_rows(matrix: &Matrix) -> Vec<Vec<bool>> {
    (0..matrix.size())
        .map(|y| (0..matrix.size()).map(|x| matrix.get_module(x, y)).collect())
        .collect()
}

#[test]
fn s1_round_trip_with_a_nonempty_secondary() {
    init_tracing();
    let primary = "https://example.com/path/to/page";
    let result = encode(&DefaultQrEngine, primary, "SECRET", EncodeOptions::default()).unwrap();
    assert!(result.metadata.as_ref().unwrap().flipped_count > 0);
    assert_eq!(result.metadata.as_ref().unwrap().ec_level_used, CodeEcc::High);

    let scanned = Matrix::from_rows(&matrix_to_rows(&result.matrix)).unwrap();
    let decoded = decode_matrix(&DefaultQrEngine, &scanned, primary, DecodeOptions::default()).unwrap();
    assert_eq!(decoded.primary, primary);
    assert_eq!(decoded.secondary, "SECRET");
}

#[test]
fn s2_empty_secondary_yields_empty_secondary_and_zero_flips() {
    let primary = "https://example.com/page";
    let result = encode(&DefaultQrEngine, primary, "", EncodeOptions::default()).unwrap();
    assert_eq!(result.metadata.as_ref().unwrap().flipped_count, 0);

    let scanned = Matrix::from_rows(&matrix_to_rows(&result.matrix)).unwrap();
    let decoded = decode_matrix(&DefaultQrEngine, &scanned, primary, DecodeOptions::default()).unwrap();
    assert_eq!(decoded.secondary, "");
}

#[test]
fn s3_an_oversized_secondary_is_rejected() {
    let primary = "test";
    let secondary = "x".repeat(1000);
    let err = encode(&DefaultQrEngine, primary, &secondary, EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, StegoError::PayloadTooLarge { .. }));

    let fits = validate_capacity(primary, &secondary, CodeEcc::High, 0.07).unwrap();
    assert!(!fits);
}

#[test]
fn s4_capacity_and_round_trip_agree_with_a_short_token() {
    let primary = "https://example.com/path/page";
    let cap = capacity_bytes(primary, CodeEcc::High, 0.07).unwrap();
    assert!(cap >= 3);

    let result = encode(&DefaultQrEngine, primary, "tok", EncodeOptions::default()).unwrap();
    let metadata = result.metadata.as_ref().unwrap();
    assert_eq!(metadata.version, "1.0");
    assert_eq!(metadata.ec_level_used, CodeEcc::High);

    let scanned = Matrix::from_rows(&matrix_to_rows(&result.matrix)).unwrap();
    let decoded = decode_matrix(&DefaultQrEngine, &scanned, primary, DecodeOptions::default()).unwrap();
    assert_eq!(decoded.secondary, "tok");
}

#[test]
fn s5_crc_is_stable_and_sensitive_to_input() {
    use qr_stego::crc16::crc16_ccitt_false;

    let empty_a = crc16_ccitt_false(&[]);
    let empty_b = crc16_ccitt_false(&[]);
    assert_eq!(empty_a, empty_b);

    let a = crc16_ccitt_false(&[1, 2, 3, 4, 5]);
    let b = crc16_ccitt_false(&[1, 2, 3, 4, 5]);
    assert_eq!(a, b);

    let c = crc16_ccitt_false(&[1, 2, 3, 4, 6]);
    assert_ne!(a, c);
}

#[test]
fn s6_largest_prime_below_matches_known_values() {
    use qr_stego::distribution::largest_prime_below;

    assert_eq!(largest_prime_below(100), 97);
    assert_eq!(largest_prime_below(20), 19);
    assert_eq!(largest_prime_below(3), 2);
}
