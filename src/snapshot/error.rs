/// Errors that can occur while saving or loading a snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Container layout or content is not a valid snapshot
    #[error("Invalid snapshot container: {0}")]
    InvalidContainer(String),

    /// Snapshot written by an incompatible format version
    #[error("Unsupported snapshot format version '{found}'")]
    UnsupportedVersion {
        /// Version recorded in the snapshot
        found: String,
    },
}
