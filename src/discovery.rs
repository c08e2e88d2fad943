//! # Sample discovery
//!
//! Scans a root directory for per-sample deconvolution output directories and
//! derives one [`SampleId`] per sample.
//!
//! The default [`SampleLayout`] matches UniDec batch output:
//!
//! ```text
//! root/
//! ├── BSA_rep1_000002_unidecfiles/
//! │   ├── BSA_rep1_000002_mass.txt     # two columns: mass intensity
//! │   └── BSA_rep1_000002_peaks.dat    # one "mass intensity" pair per line
//! └── BSA_rep1_000005_unidecfiles/     # re-run, supersedes run 2
//! ```
//!
//! In [`DiscoveryMode::LatestRun`] the trailing `_<run>` of the directory stem is
//! parsed as a run number, only the highest run per prefix is kept and the
//! prefix becomes the sample identifier (`BSA_rep1` above). In
//! [`DiscoveryMode::AllDirectories`] every matching directory is a sample named
//! by its full stem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetError, SampleId};

/// How sample directories map onto samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryMode {
    /// Every matching directory is its own sample
    AllDirectories,
    /// Keep only the highest-numbered run per `<prefix>_<run>` stem
    #[default]
    LatestRun,
}

/// How mass/intensity values are arranged in a peak file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeakFileLayout {
    /// One `mass intensity` pair per line
    #[default]
    Pairs,
    /// Alternating lines: a line of masses followed by a line of intensities
    Rows,
}

/// File naming convention for sample directories and the files inside them.
///
/// A directory is a sample directory when its name ends with
/// `directory_suffix`; the remaining *stem* is combined with the file suffixes
/// to locate the spectrum and peak files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleLayout {
    /// Suffix identifying sample directories (may be empty to accept any directory)
    pub directory_suffix: String,
    /// Suffix appended to the stem to name the intensity-vs-mass file
    pub spectrum_suffix: String,
    /// Suffix appended to the stem to name the peak file
    pub peaks_suffix: String,
    /// Arrangement of values in the peak file
    pub peak_layout: PeakFileLayout,
    /// Directory-to-sample mapping
    pub mode: DiscoveryMode,
}

impl Default for SampleLayout {
    fn default() -> Self {
        Self {
            directory_suffix: "_unidecfiles".to_string(),
            spectrum_suffix: "_mass.txt".to_string(),
            peaks_suffix: "_peaks.dat".to_string(),
            peak_layout: PeakFileLayout::Pairs,
            mode: DiscoveryMode::LatestRun,
        }
    }
}

impl SampleLayout {
    /// Directory stem, `None` when `dir_name` is not a sample directory
    pub fn stem<'a>(&self, dir_name: &'a str) -> Option<&'a str> {
        let stem = dir_name.strip_suffix(self.directory_suffix.as_str())?;
        if stem.is_empty() {
            None
        } else {
            Some(stem)
        }
    }

    /// Path of the intensity-vs-mass file of a discovered sample
    pub fn spectrum_path(&self, sample: &SampleDirectory) -> PathBuf {
        sample
            .path
            .join(format!("{}{}", sample.stem, self.spectrum_suffix))
    }

    /// Path of the peak file of a discovered sample
    pub fn peaks_path(&self, sample: &SampleDirectory) -> PathBuf {
        sample
            .path
            .join(format!("{}{}", sample.stem, self.peaks_suffix))
    }
}

/// A sample directory selected by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDirectory {
    /// Canonical sample identifier
    pub id: SampleId,
    /// Full path of the directory
    pub path: PathBuf,
    /// Directory name without the layout's directory suffix
    pub stem: String,
    /// Parsed run number (only in [`DiscoveryMode::LatestRun`])
    pub run: Option<u64>,
}

/// Split a `<prefix>_<run>` stem into its prefix and numeric run
pub fn split_run_number(stem: &str) -> Result<(&str, u64), DatasetError> {
    let malformed = |reason: &str| DatasetError::MalformedSampleName {
        name: stem.to_string(),
        reason: reason.to_string(),
    };

    let (prefix, run) = stem
        .rsplit_once('_')
        .ok_or_else(|| malformed("missing '_<run>' segment"))?;
    if prefix.is_empty() {
        return Err(malformed("empty sample prefix"));
    }
    let run = run
        .parse::<u64>()
        .map_err(|_| malformed(&format!("run number '{}' is not numeric", run)))?;
    Ok((prefix, run))
}

/// Discover the samples below `root`, sorted by sample identifier.
///
/// Fails with [`DatasetError::NoSamplesFound`] when no directory matches the
/// layout, and with [`DatasetError::MalformedSampleName`] when a run number
/// cannot be parsed in [`DiscoveryMode::LatestRun`].
pub fn discover_samples<P: AsRef<Path>>(
    root: P,
    layout: &SampleLayout,
) -> Result<Vec<SampleDirectory>, DatasetError> {
    let root = root.as_ref();

    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        // follows symlinks
        if !entry.path().is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => candidates.push((name, entry.path())),
            Err(name) => debug!("Skipping non UTF-8 directory name {:?}", name),
        }
    }
    // read_dir order is platform dependent
    candidates.sort();

    let mut samples: BTreeMap<String, SampleDirectory> = BTreeMap::new();
    for (name, path) in candidates {
        let Some(stem) = layout.stem(&name) else {
            debug!("Skipping directory without sample suffix: {}", name);
            continue;
        };

        match layout.mode {
            DiscoveryMode::AllDirectories => {
                samples.insert(
                    stem.to_string(),
                    SampleDirectory {
                        id: SampleId::new(stem),
                        path,
                        stem: stem.to_string(),
                        run: None,
                    },
                );
            }
            DiscoveryMode::LatestRun => {
                let (prefix, run) = split_run_number(stem)?;
                let superseded = samples
                    .get(prefix)
                    .map_or(true, |current| current.run.map_or(true, |r| run > r));
                if superseded {
                    if let Some(previous) = samples.get(prefix) {
                        debug!(
                            "Run {} of '{}' supersedes {}",
                            run,
                            prefix,
                            previous.path.display()
                        );
                    }
                    samples.insert(
                        prefix.to_string(),
                        SampleDirectory {
                            id: SampleId::new(prefix),
                            path,
                            stem: stem.to_string(),
                            run: Some(run),
                        },
                    );
                } else {
                    debug!("Ignoring older run {} of '{}'", run, prefix);
                }
            }
        }
    }

    if samples.is_empty() {
        return Err(DatasetError::NoSamplesFound {
            location: root.display().to_string(),
        });
    }

    Ok(samples.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_dirs(root: &Path, names: &[&str]) {
        for name in names {
            fs::create_dir(root.join(name)).unwrap();
        }
    }

    #[test]
    fn test_split_run_number() {
        assert_eq!(split_run_number("BSA_rep1_000012").unwrap(), ("BSA_rep1", 12));
        assert!(matches!(
            split_run_number("BSA_rep1_abc"),
            Err(DatasetError::MalformedSampleName { .. })
        ));
        assert!(matches!(
            split_run_number("norun"),
            Err(DatasetError::MalformedSampleName { .. })
        ));
        assert!(matches!(
            split_run_number("_000001"),
            Err(DatasetError::MalformedSampleName { .. })
        ));
    }

    #[test]
    fn test_latest_run_keeps_highest_run() {
        let dir = tempdir().unwrap();
        make_dirs(
            dir.path(),
            &[
                "lysozyme_000002_unidecfiles",
                "lysozyme_000010_unidecfiles",
                "lysozyme_000003_unidecfiles",
                "BSA_000001_unidecfiles",
            ],
        );

        let samples = discover_samples(dir.path(), &SampleLayout::default()).unwrap();
        let ids: Vec<&str> = samples.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["BSA", "lysozyme"]);
        assert_eq!(samples[1].run, Some(10));
        assert_eq!(samples[1].stem, "lysozyme_000010");
    }

    #[test]
    fn test_non_sample_entries_are_ignored() {
        let dir = tempdir().unwrap();
        make_dirs(dir.path(), &["notes", "BSA_000001_unidecfiles"]);
        fs::write(dir.path().join("readme_000001_unidecfiles"), "a file").unwrap();

        let samples = discover_samples(dir.path(), &SampleLayout::default()).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].id.as_str(), "BSA");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_sample_directory_is_discovered() {
        let data = tempdir().unwrap();
        make_dirs(data.path(), &["BSA_000001_unidecfiles"]);
        let dir = tempdir().unwrap();
        make_dirs(dir.path(), &["lysozyme_000001_unidecfiles"]);
        std::os::unix::fs::symlink(
            data.path().join("BSA_000001_unidecfiles"),
            dir.path().join("BSA_000001_unidecfiles"),
        )
        .unwrap();

        let samples = discover_samples(dir.path(), &SampleLayout::default()).unwrap();
        let ids: Vec<&str> = samples.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["BSA", "lysozyme"]);
    }

    #[test]
    fn test_malformed_run_number() {
        let dir = tempdir().unwrap();
        make_dirs(dir.path(), &["BSA_latest_unidecfiles"]);

        let err = discover_samples(dir.path(), &SampleLayout::default()).unwrap_err();
        assert!(matches!(err, DatasetError::MalformedSampleName { .. }));
    }

    #[test]
    fn test_all_directories_mode() {
        let dir = tempdir().unwrap();
        make_dirs(
            dir.path(),
            &["b_run_unidecfiles", "a_000001_unidecfiles", "a_000002_unidecfiles"],
        );

        let layout = SampleLayout {
            mode: DiscoveryMode::AllDirectories,
            ..Default::default()
        };
        let samples = discover_samples(dir.path(), &layout).unwrap();
        let ids: Vec<&str> = samples.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a_000001", "a_000002", "b_run"]);
        assert!(samples.iter().all(|s| s.run.is_none()));
    }

    #[test]
    fn test_empty_root() {
        let dir = tempdir().unwrap();
        make_dirs(dir.path(), &["unrelated"]);

        let err = discover_samples(dir.path(), &SampleLayout::default()).unwrap_err();
        assert!(matches!(err, DatasetError::NoSamplesFound { .. }));
    }

    #[test]
    fn test_file_paths_follow_layout() {
        let layout = SampleLayout::default();
        let sample = SampleDirectory {
            id: SampleId::new("BSA"),
            path: PathBuf::from("/data/BSA_000004_unidecfiles"),
            stem: "BSA_000004".to_string(),
            run: Some(4),
        };
        assert_eq!(
            layout.spectrum_path(&sample),
            PathBuf::from("/data/BSA_000004_unidecfiles/BSA_000004_mass.txt")
        );
        assert_eq!(
            layout.peaks_path(&sample),
            PathBuf::from("/data/BSA_000004_unidecfiles/BSA_000004_peaks.dat")
        );
    }
}
