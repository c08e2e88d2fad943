use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use log::{info, warn};

use super::dataset_impl::Dataset;
use super::error::DatasetError;
use super::types::{IntensityMatrix, PeakList, SampleId};
use crate::discovery::{discover_samples, SampleLayout};
use crate::loader::{load_samples, RawSample};

impl Dataset {
    /// Discover, load and assemble every sample below `root`.
    pub fn from_directory<P: AsRef<Path>>(
        root: P,
        layout: &SampleLayout,
    ) -> Result<Self, DatasetError> {
        let root = root.as_ref();
        info!("Scanning {} for sample directories", root.display());

        let directories = discover_samples(root, layout)?;
        info!("Found {} samples", directories.len());

        let raw = load_samples(&directories, layout)?;
        let dataset = Self::assemble(raw)?;
        info!("{}", dataset.summary());
        Ok(dataset)
    }

    /// Align raw samples onto a shared mass axis and scale each row to a maximum of 1.0.
    ///
    /// The column set is the union of every sample's masses, ascending; a
    /// sample without a value at some mass gets 0 there. Row order follows the
    /// input order. Within one spectrum a repeated mass keeps its first value.
    pub fn assemble(samples: Vec<RawSample>) -> Result<Self, DatasetError> {
        if samples.is_empty() {
            return Err(DatasetError::NoSamplesFound {
                location: "assembly input".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(samples.len());
        for sample in &samples {
            if !seen.insert(sample.id.clone()) {
                return Err(DatasetError::DuplicateSample {
                    sample: sample.id.clone(),
                });
            }
        }

        let masses = union_masses(&samples);
        let mut matrix = IntensityMatrix::with_columns(masses.len(), samples.len());
        let mut ids: Vec<SampleId> = Vec::with_capacity(samples.len());
        let mut peaks: Vec<PeakList> = Vec::with_capacity(samples.len());

        for sample in samples {
            let mut row = aligned_row(&sample, &masses);
            normalize_row(&mut row, &sample.id)?;
            matrix.push_row(&row);
            ids.push(sample.id);
            peaks.push(sample.peaks);
        }

        Dataset::from_parts(ids, masses, matrix, peaks).map_err(DatasetError::InvalidDataset)
    }
}

/// Sorted, de-duplicated union of all sample masses
fn union_masses(samples: &[RawSample]) -> Vec<f64> {
    let mut masses: Vec<f64> = samples
        .iter()
        .flat_map(|s| s.spectrum.masses.iter().map(|&m| canonical_mass(m)))
        .collect();
    masses.sort_by(f64::total_cmp);
    masses.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
    masses
}

/// Fold -0.0 into 0.0 so that the column axis stays strictly ascending
#[inline]
fn canonical_mass(mass: f64) -> f64 {
    mass + 0.0
}

/// Place a sample's intensities on the shared axis, zero elsewhere
fn aligned_row(sample: &RawSample, masses: &[f64]) -> Vec<f64> {
    let mut row = vec![0.0; masses.len()];
    let mut filled = vec![false; masses.len()];
    for (mass, intensity) in sample.spectrum.iter() {
        let mass = canonical_mass(mass);
        let Ok(col) = masses.binary_search_by(|m| m.total_cmp(&mass)) else {
            continue;
        };
        if filled[col] {
            warn!(
                "Sample '{}' lists mass {} more than once; keeping the first value",
                sample.id, mass
            );
            continue;
        }
        row[col] = intensity;
        filled[col] = true;
    }
    row
}

fn normalize_row(row: &mut [f64], sample: &SampleId) -> Result<(), DatasetError> {
    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 {
        return Err(DatasetError::DegenerateRow {
            sample: sample.clone(),
        });
    }
    for value in row.iter_mut() {
        *value /= max;
    }
    Ok(())
}
