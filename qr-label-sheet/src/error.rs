use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to generate QR code: {0}")]
    QrError(String),
    #[error("Failed to load logo: {0}")]
    LogoError(String),
    #[error("Invalid layout config: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
