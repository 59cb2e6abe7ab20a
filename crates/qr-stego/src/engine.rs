//! The external QR engine capability: `encode_text(str, ec_level) ->
//! Matrix`. Specified as a small trait so the codec logic in `encode`/
//! `decode` can be exercised against any conforming QR encoder, not just
//! `qr-engine`'s. `qr-engine` backs the default implementation.

use qr_engine::{CodeEcc, QrCode};

/// An immutable square grid of QR modules, decoupled from any particular
/// encoder implementation.
///
/// `version` is always derivable from `size` (`size = 17 + 4 * version`), so
/// a matrix built from a raw scanned grid — where the originating encoder's
/// internal state isn't available — still carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    size: i32,
    version: u8,
    ec_level: Option<CodeEcc>,
    modules: Vec<bool>,
}

/// A `Matrix` constructed from rows whose length isn't a legal QR side
/// (`17 + 4*v` for `v` in `[1, 40]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid matrix size: {0} is not 17 + 4*version for version in [1, 40]")]
pub struct InvalidMatrixSize(pub i32);

impl Matrix {
    /// Builds a matrix from a square grid of rows (true = dark). Fails if
    /// the grid isn't square or its side doesn't correspond to a QR version.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, InvalidMatrixSize> {
        let size = rows.len() as i32;
        if rows.iter().any(|row| row.len() as i32 != size) {
            return Err(InvalidMatrixSize(size));
        }
        let version = Self::version_for_size(size).ok_or(InvalidMatrixSize(size))?;
        let mut modules = Vec::with_capacity((size * size) as usize);
        for row in rows {
            modules.extend(row.iter().copied());
        }
        Ok(Self {
            size,
            version,
            ec_level: None,
            modules,
        })
    }

    fn from_qr_code(qr: &QrCode) -> Self {
        let size = qr.size();
        let mut modules = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                modules.push(qr.get_module(x, y));
            }
        }
        Self {
            size,
            version: qr.version().value(),
            ec_level: Some(qr.error_correction_level()),
            modules,
        }
    }

    fn version_for_size(size: i32) -> Option<u8> {
        if size < 21 || (size - 17) % 4 != 0 {
            return None;
        }
        let version = (size - 17) / 4;
        (1..=40).contains(&version).then_some(version as u8)
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn ec_level(&self) -> Option<CodeEcc> {
        self.ec_level
    }

    /// Returns `false` (light) for out-of-bounds coordinates, matching
    /// `qr-engine`'s `get_module`.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        if !(0..self.size).contains(&x) || !(0..self.size).contains(&y) {
            return false;
        }
        self.modules[(y * self.size + x) as usize]
    }

    /// XORs the module at `(x, y)` against its current value. Coordinates
    /// must be in bounds; used only by the encoder's flip-application step.
    pub(crate) fn toggle(&mut self, x: i32, y: i32) {
        let idx = (y * self.size + x) as usize;
        self.modules[idx] = !self.modules[idx];
    }
}

/// The external QR engine capability required by the codec: produce a base
/// matrix for a primary text string at a given error correction level. Any
/// conformant QR Code Model 2 encoder can implement this.
pub trait QrEngine {
    fn encode_text(&self, text: &str, ec_level: CodeEcc) -> Result<Matrix, qr_engine::QrError>;
}

/// The default engine, backed by the `qr-engine` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQrEngine;

impl QrEngine for DefaultQrEngine {
    fn encode_text(&self, text: &str, ec_level: CodeEcc) -> Result<Matrix, qr_engine::QrError> {
        QrCode::encode_text(text, ec_level).map(|qr| Matrix::from_qr_code(&qr))
    }
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn derive_version_from_size() {
        let qr = QrCode::encode_text("hello", CodeEcc::Low).unwrap();
        let matrix = Matrix::from_qr_code(&qr);
        assert_eq!(matrix.version(), qr.version().value());
    }

    #[test]
    fn reject_a_non_square_grid() {
        let rows = vec![vec![false; 21]; 20];
        assert!(Matrix::from_rows(&rows).is_err());
    }

    #[test]
    fn reject_a_size_that_is_not_17_plus_4_times_a_version() {
        let rows = vec![vec![false; 22]; 22];
        assert!(Matrix::from_rows(&rows).is_err());
    }

    #[test]
    fn accept_a_minimum_size_grid() {
        let rows = vec![vec![false; 21]; 21];
        let matrix = Matrix::from_rows(&rows).unwrap();
        assert_eq!(matrix.version(), 1);
    }
}
