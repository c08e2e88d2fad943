/// Errors raised while updating the working area or preparing plotting data.
///
/// Mutations that fail leave the working area and alias table untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    /// Requested mass window is empty or not a number after clamping
    #[error("Invalid mass range [{lo}, {hi}]")]
    InvalidRange {
        /// Lower bound after clamping
        lo: f64,
        /// Upper bound after clamping
        hi: f64,
    },

    /// No peak qualified as a normalization basis for a sample
    #[error("No qualifying peak to normalize sample '{sample}'")]
    EmptySelection {
        /// Display name of the sample left unnormalized
        sample: String,
    },

    /// A rename would give two samples the same display name
    #[error("Alias '{alias}' would be used by more than one sample")]
    DuplicateAlias {
        /// Conflicting display name
        alias: String,
    },

    /// A rename would leave a sample without a display name
    #[error("Alias for '{from}' must not be empty")]
    InvalidAlias {
        /// Display name being renamed
        from: String,
    },

    /// A plotting option is out of its domain
    #[error("Invalid plot option '{name}': {reason}")]
    InvalidOption {
        /// Option name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}
