use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")] Validation(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Uploaded logo image could not be decoded")]
    InvalidLogoImage,

    #[error("Payload does not fit into any QR version at this error correction level")]
    PayloadTooLarge,

    #[error("Composition error: {0}")] Composition(String),

    #[error("Download error: {0}")] Download(#[from] reqwest::Error),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::Composition(e.to_string())
    }
}

impl From<qrcode::types::QrError> for AppError {
    fn from(e: qrcode::types::QrError) -> Self {
        match e {
            qrcode::types::QrError::DataTooLong => AppError::PayloadTooLarge,
            other => AppError::Composition(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
