use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read source file: {0}")]
    SourceUnreadable(String),

    #[error("No compatible 2D image data: {0}")]
    NoImageData(String),

    #[error("Failed to decode source container: {0}")]
    DecodeError(String),

    #[error("Unsupported pixel encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Malformed header side-channel: {0}")]
    MalformedSideChannel(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode output container: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConversionError {
    /// True for failures a batch run reports as a skipped file rather than a failed one.
    pub fn is_skippable(&self) -> bool {
        matches!(self, ConversionError::NoImageData(_))
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
