//! Decoder (C8, image mode): wraps matrix-mode decoding, delegating the scan
//! and sample step to an external QR-reading capability.
//!
//! Locating a QR code in a photograph and reading its primary text is a
//! large, separate problem — decoding/correcting Reed–Solomon codewords
//! from noisy image data — and stays out of scope here exactly as it does
//! for the core crate. [`QrScanner`] is the seam: any detector/decoder
//! can be plugged in as long as it can locate the three finder corners and,
//! ideally, hand back a sampled module matrix directly.

mod error;

pub use error::ImageStegoError;

use image::GrayImage;
use tracing::debug;

use qr_stego::engine::{Matrix, QrEngine};
use qr_stego::{decode_matrix, DecodeOptions, DecodeResult};

/// Pixel coordinates of the three QR finder pattern centers, as located by
/// an external detector. Standard QR geometry places these at module
/// offset `(3, 3)`, `(size-4, 3)`, and `(3, size-4)` from the symbol's own
/// origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderLocation {
    pub top_left: (f64, f64),
    pub top_right: (f64, f64),
    pub bottom_left: (f64, f64),
}

/// What an external QR engine reports after locating and reading a code in
/// an image.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// The primary text the engine decoded.
    pub primary: String,
    /// The QR symbol's side length in modules, as determined by the engine
    /// (e.g. from the version-info bits it necessarily decoded to read
    /// `primary` at all).
    pub size: i32,
    /// A directly-sampled module matrix, if the engine exposes one. When
    /// absent, [`decode_image`] resamples from `location` instead.
    pub modules: Option<Vec<Vec<bool>>>,
    pub location: FinderLocation,
}

/// External capability: locate and read a QR code in an image. Black-box
/// from this crate's point of view — any conformant scanner/decoder
/// suffices.
pub trait QrScanner {
    fn scan_image(&self, image: &GrayImage) -> Option<ScanResult>;
}

/// Re-samples a module matrix from `image` using the three finder corners,
/// for scanners that only report corner locations rather than a full
/// module grid.
///
/// Module pitch is approximated as `corner_distance / size` along each axis;
/// each module's center is then thresholded against 128/255 of the
/// grayscale image. This is a best-effort fallback, not a perspective-correct
/// resampler — it assumes the image is already reasonably axis-aligned and
/// undistorted.
pub fn resample_matrix(image: &GrayImage, location: &FinderLocation, size: i32) -> Vec<Vec<bool>> {
    let (tlx, tly) = location.top_left;
    let (trx, tr_y) = location.top_right;
    let (blx, bly) = location.bottom_left;
    let n = f64::from(size);

    // Per-module step vectors along the top edge (columns) and left edge (rows).
    let col_step = ((trx - tlx) / n, (tr_y - tly) / n);
    let row_step = ((blx - tlx) / n, (bly - tly) / n);

    (0..size)
        .map(|y| {
            (0..size)
                .map(|x| {
                    let px = tlx
                        + col_step.0 * (f64::from(x) + 0.5)
                        + row_step.0 * (f64::from(y) + 0.5);
                    let py = tly
                        + col_step.1 * (f64::from(x) + 0.5)
                        + row_step.1 * (f64::from(y) + 0.5);
                    sample_is_dark(image, px, py)
                })
                .collect()
        })
        .collect()
}

fn sample_is_dark(image: &GrayImage, x: f64, y: f64) -> bool {
    let xi = x.round().clamp(0.0, f64::from(image.width().saturating_sub(1))) as u32;
    let yi = y.round().clamp(0.0, f64::from(image.height().saturating_sub(1))) as u32;
    image.get_pixel(xi, yi).0[0] < 128
}

/// Decodes a secondary payload out of `image`, assumed to contain a QR code
/// produced by `qr_stego::encode`.
///
/// Fails with [`ImageStegoError::NoCodeFound`] if `scanner` can't locate a
/// code. Otherwise delegates to [`qr_stego::decode_matrix`] once a module
/// matrix has been obtained (directly from the scanner, or resampled via
/// [`resample_matrix`]).
pub fn decode_image<E: QrEngine, S: QrScanner>(
    engine: &E,
    scanner: &S,
    image: &GrayImage,
    opts: DecodeOptions,
) -> Result<DecodeResult, ImageStegoError> {
    let scan = scanner
        .scan_image(image)
        .ok_or(ImageStegoError::NoCodeFound)?;
    debug!(size = scan.size, has_matrix = scan.modules.is_some(), "scanned image");

    let rows = match scan.modules {
        Some(rows) => rows,
        None => resample_matrix(image, &scan.location, scan.size),
    };
    let matrix = Matrix::from_rows(&rows)?;

    decode_matrix(engine, &matrix, &scan.primary, opts).map_err(ImageStegoError::Stego)
}

#[cfg(test)]
mod should {
    use super::*;
    use image::{GrayImage, Luma};
    use qr_stego::engine::DefaultQrEngine;
    use qr_stego::{encode, EncodeOptions};

    struct StubScanner {
        primary: String,
        size: i32,
        rows: Vec<Vec<bool>>,
    }

    impl QrScanner for StubScanner {
        fn scan_image(&self, _image: &GrayImage) -> Option<ScanResult> {
            Some(ScanResult {
                primary: self.primary.clone(),
                size: self.size,
                modules: Some(self.rows.clone()),
                location: FinderLocation {
                    top_left: (0.0, 0.0),
                    top_right: (0.0, 0.0),
                    bottom_left: (0.0, 0.0),
                },
            })
        }
    }

    #[test]
    fn decode_through_a_scanner_that_reports_a_matrix_directly() {
        let primary = "https://example.com/path/to/page";
        let encoded = encode(&DefaultQrEngine, primary, "SECRET", EncodeOptions::default()).unwrap();
        let size = encoded.matrix.size();
        let rows: Vec<Vec<bool>> = (0..size)
            .map(|y| (0..size).map(|x| encoded.matrix.get_module(x, y)).collect())
            .collect();

        let scanner = StubScanner {
            primary: primary.to_string(),
            size,
            rows,
        };
        let image = GrayImage::from_pixel(1, 1, Luma([255]));

        let result = decode_image(&DefaultQrEngine, &scanner, &image, DecodeOptions::default()).unwrap();
        assert_eq!(result.secondary, "SECRET");
    }

    struct EmptyScanner;
    impl QrScanner for EmptyScanner {
        fn scan_image(&self, _image: &GrayImage) -> Option<ScanResult> {
            None
        }
    }

    #[test]
    fn report_no_code_found_when_the_scanner_finds_nothing() {
        let image = GrayImage::from_pixel(1, 1, Luma([255]));
        let err = decode_image(&DefaultQrEngine, &EmptyScanner, &image, DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, ImageStegoError::NoCodeFound));
    }

    #[test]
    fn resample_a_uniformly_dark_image_as_all_dark_modules() {
        let image = GrayImage::from_pixel(100, 100, Luma([0]));
        let location = FinderLocation {
            top_left: (0.0, 0.0),
            top_right: (90.0, 0.0),
            bottom_left: (0.0, 90.0),
        };
        let rows = resample_matrix(&image, &location, 21);
        assert!(rows.iter().flatten().all(|&dark| dark));
    }
}
