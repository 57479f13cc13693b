//! Error types for segment reconstruction.

use std::path::PathBuf;

/// Coarse classification of a [`ReconstructError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Open,
    Schema,
    Header,
    Mux,
    Trailer,
}

/// Errors that can stop a reconstruction run.
///
/// Messages name the failed operation followed by the container layer's
/// own error text.
#[derive(Debug, thiserror::Error)]
pub enum ReconstructError {
    /// An input segment could not be opened or its stream info could not be
    /// read. Both happen in one container call, so a stream-info failure is
    /// reported here too rather than as a separate kind.
    #[error("Failed to open file {}: {cause}", path.display())]
    Open { path: PathBuf, cause: anyhow::Error },

    /// The output container could not be allocated.
    #[error("Failed to create output context {}: {cause}", path.display())]
    CreateOutput { path: PathBuf, cause: anyhow::Error },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The output sink could not be opened or the header write failed.
    #[error("Error occurred when opening output file: {0}")]
    Header(anyhow::Error),

    #[error("Error muxing packet: {0}")]
    Mux(anyhow::Error),

    #[error("Error writing trailer: {0}")]
    Trailer(anyhow::Error),
}

impl ReconstructError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconstructError::Open { .. } | ReconstructError::CreateOutput { .. } => {
                ErrorKind::Open
            }
            ReconstructError::Schema(_) => ErrorKind::Schema,
            ReconstructError::Header(_) => ErrorKind::Header,
            ReconstructError::Mux(_) => ErrorKind::Mux,
            ReconstructError::Trailer(_) => ErrorKind::Trailer,
        }
    }
}

/// The segments do not describe a usable video + audio layout.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to find video stream")]
    MissingVideo,

    #[error("Failed to find audio stream")]
    MissingAudio,

    #[error("More than one video stream (streams {first} and {second})")]
    DuplicateVideo { first: usize, second: usize },

    #[error("More than one audio stream (streams {first} and {second})")]
    DuplicateAudio { first: usize, second: usize },

    #[error("Failed to copy codec parameters of stream {index}: {cause}")]
    CodecCopy { index: usize, cause: anyhow::Error },

    /// Segment 2 does not carry the same streams in the same order.
    #[error("Segment layout mismatch: {0}")]
    LayoutMismatch(String),
}
