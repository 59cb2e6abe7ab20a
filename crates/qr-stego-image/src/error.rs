use thiserror::Error;

/// Errors specific to image-mode decoding, plus anything [`qr_stego::decode_matrix`]
/// can raise once a matrix has been located and sampled.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImageStegoError {
    /// The scanner found no QR code in the image.
    #[error("no qr code found in image")]
    NoCodeFound,

    /// A matrix was sampled, but its shape doesn't correspond to a QR version.
    #[error("sampled an invalid matrix: {0}")]
    InvalidScan(#[from] qr_stego::engine::InvalidMatrixSize),

    /// Matrix-mode decoding failed after a matrix was successfully obtained.
    #[error(transparent)]
    Stego(#[from] qr_stego::StegoError),
}
