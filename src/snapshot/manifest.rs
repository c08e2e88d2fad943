//! Manifest for the `.mshm` container.
//!
//! `manifest.json` lets a reader check the format version and see what the
//! container holds without decoding the full snapshot.

use serde::{Deserialize, Serialize};

use super::{Snapshot, SnapshotError, MSHM_FORMAT_VERSION};
use crate::dataset::MassRange;

/// Summary stored next to the snapshot in a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    /// Format version (e.g., "1.0.0")
    pub format_version: String,
    /// RFC 3339 timestamp of when the snapshot was taken
    pub created: String,
    /// Name and version of the program that wrote the file
    pub converter: String,
    /// Number of samples in the dataset
    pub sample_count: usize,
    /// Number of mass columns in the dataset
    pub column_count: usize,
    /// Total number of peaks across samples
    pub peak_count: usize,
    /// Full mass range of the dataset
    pub mass_limit: MassRange,
}

impl SnapshotManifest {
    /// Describe a snapshot
    pub fn for_snapshot(snapshot: &Snapshot) -> Self {
        let summary = snapshot.dataset.summary();
        Self {
            format_version: snapshot.format_version.clone(),
            created: snapshot.created.clone(),
            converter: snapshot.converter.clone(),
            sample_count: summary.samples,
            column_count: summary.columns,
            peak_count: summary.peaks,
            mass_limit: summary.mass_limit,
        }
    }
}

/// Accept any version sharing the major component of [`MSHM_FORMAT_VERSION`]
pub fn check_format_version(version: &str) -> Result<(), SnapshotError> {
    let major = |v: &str| v.split('.').next().map(str::to_string);
    match (major(version), major(MSHM_FORMAT_VERSION)) {
        (Some(found), Some(supported)) if !found.is_empty() && found == supported => Ok(()),
        _ => Err(SnapshotError::UnsupportedVersion {
            found: version.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_version_check() {
        assert!(check_format_version(MSHM_FORMAT_VERSION).is_ok());
        assert!(check_format_version("1.4.2").is_ok());
        assert!(matches!(
            check_format_version("2.0.0"),
            Err(SnapshotError::UnsupportedVersion { .. })
        ));
        assert!(check_format_version("").is_err());
    }
}
