use crate::dataset::SampleId;
use crate::loader::LoadError;

/// Errors that can occur while discovering, loading and assembling a dataset.
///
/// Every variant is fatal to construction: no partial dataset is produced.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// I/O error while scanning the sample root
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The root directory holds no usable sample sub-directory
    #[error("No sample directories found in {location}")]
    NoSamplesFound {
        /// Directory (or input description) that was searched
        location: String,
    },

    /// A sample directory name does not follow the `<prefix>_<run>` convention
    #[error("Malformed sample name '{name}': {reason}")]
    MalformedSampleName {
        /// Offending directory name
        name: String,
        /// What could not be parsed
        reason: String,
    },

    /// One of the sample's files could not be read or parsed
    #[error("Failed to load sample '{sample}': {cause}")]
    SampleLoadError {
        /// Sample whose files failed to load
        sample: SampleId,
        /// Underlying parse or I/O failure
        #[source]
        cause: LoadError,
    },

    /// A spectrum has no positive intensity and cannot be scaled to [0, 1]
    #[error("Sample '{sample}' has a degenerate spectrum (maximum intensity is not positive)")]
    DegenerateRow {
        /// Sample with the degenerate row
        sample: SampleId,
    },

    /// Assembled parts violate a dataset invariant
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// The same sample identifier was supplied twice
    #[error("Duplicate sample identifier: {sample}")]
    DuplicateSample {
        /// Repeated identifier
        sample: SampleId,
    },
}
