//! # Session Snapshots
//!
//! A [`Snapshot`] captures a [`MassHeatMap`] completely: the assembled
//! dataset, the alias table and the working area. It can be encoded as plain
//! JSON or as a single-file `.mshm` ZIP container (see [`write_container`]).
//!
//! ```no_run
//! use mshm::discovery::SampleLayout;
//! use mshm::view::MassHeatMap;
//!
//! let mut heat_map = MassHeatMap::open("deconvolved/", &SampleLayout::default())?;
//! heat_map.set_selection(&["BSA", "Lysozyme"]);
//! heat_map.save("session.mshm")?;
//!
//! let restored = MassHeatMap::load("session.mshm")?;
//! assert_eq!(restored.samples(), heat_map.samples());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod container;
mod error;
mod manifest;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::view::{AliasTable, MassHeatMap, WorkingArea};

pub use container::{load_container, read_container, save_container, write_container};
pub use error::SnapshotError;
pub use manifest::{check_format_version, SnapshotManifest};

/// Current snapshot format version
pub const MSHM_FORMAT_VERSION: &str = "1.0.0";

/// MIME type stored as the first container entry
pub const MSHM_MIMETYPE: &str = "application/vnd.mshm";

/// Everything needed to restore a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version (e.g., "1.0.0")
    pub format_version: String,
    /// RFC 3339 timestamp of when the snapshot was taken
    pub created: String,
    /// Name and version of the program that wrote the snapshot
    pub converter: String,
    pub dataset: Dataset,
    pub aliases: AliasTable,
    pub working_area: WorkingArea,
}

impl Snapshot {
    /// Check the version and that aliases and working area fit the dataset
    pub fn validate(&self) -> Result<(), SnapshotError> {
        check_format_version(&self.format_version)?;
        if !self.aliases.is_consistent_with(self.dataset.samples()) {
            return Err(SnapshotError::InvalidContainer(
                "alias table does not match the dataset samples".to_string(),
            ));
        }
        self.working_area
            .check(&self.aliases, self.dataset.mass_limit())
            .map_err(SnapshotError::InvalidContainer)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode and validate a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

fn converter_info() -> String {
    format!("mshm v{}", env!("CARGO_PKG_VERSION"))
}

impl MassHeatMap {
    /// Capture the current session
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            format_version: MSHM_FORMAT_VERSION.to_string(),
            created: chrono::Utc::now().to_rfc3339(),
            converter: converter_info(),
            dataset: self.dataset().clone(),
            aliases: self.aliases().clone(),
            working_area: self.working_area().clone(),
        }
    }

    /// Restore a session from a snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        check_format_version(&snapshot.format_version)?;
        MassHeatMap::from_parts(snapshot.dataset, snapshot.aliases, snapshot.working_area)
            .map_err(SnapshotError::InvalidContainer)
    }

    /// Save the session as a `.mshm` container
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        save_container(&self.snapshot(), path)
    }

    /// Load a session from a `.mshm` container
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        Self::from_snapshot(load_container(path)?)
    }
}
