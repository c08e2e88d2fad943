use serde::{Deserialize, Serialize};

use super::types::{DatasetSummary, IntensityMatrix, MassRange, PeakList, SampleId};

/// The immutable, assembled dataset: one normalized row and one peak list per sample.
///
/// Rows, peak lists and sample identifiers share one index. Mass columns are
/// distinct and ascending, every row was scaled so that its maximum is 1.0.
/// A `Dataset` is never modified after assembly; windowed and renamed views
/// are derived from it on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRepr", into = "DatasetRepr")]
pub struct Dataset {
    samples: Vec<SampleId>,
    masses: Vec<f64>,
    matrix: IntensityMatrix,
    peaks: Vec<PeakList>,
}

#[derive(Serialize, Deserialize)]
struct DatasetRepr {
    samples: Vec<SampleId>,
    masses: Vec<f64>,
    matrix: IntensityMatrix,
    peaks: Vec<PeakList>,
}

impl TryFrom<DatasetRepr> for Dataset {
    type Error = String;

    fn try_from(repr: DatasetRepr) -> Result<Self, Self::Error> {
        Dataset::from_parts(repr.samples, repr.masses, repr.matrix, repr.peaks)
    }
}

impl From<Dataset> for DatasetRepr {
    fn from(dataset: Dataset) -> Self {
        Self {
            samples: dataset.samples,
            masses: dataset.masses,
            matrix: dataset.matrix,
            peaks: dataset.peaks,
        }
    }
}

impl Dataset {
    /// Build a dataset from already aligned parts, checking their shapes.
    pub(crate) fn from_parts(
        samples: Vec<SampleId>,
        masses: Vec<f64>,
        matrix: IntensityMatrix,
        peaks: Vec<PeakList>,
    ) -> Result<Self, String> {
        if samples.is_empty() {
            return Err("dataset has no samples".to_string());
        }
        if masses.is_empty() {
            return Err("dataset has no mass columns".to_string());
        }
        if matrix.shape() != (samples.len(), masses.len()) {
            return Err(format!(
                "matrix shape {:?} does not match {} samples x {} masses",
                matrix.shape(),
                samples.len(),
                masses.len()
            ));
        }
        if peaks.len() != samples.len() {
            return Err(format!(
                "{} peak lists for {} samples",
                peaks.len(),
                samples.len()
            ));
        }
        if !masses.windows(2).all(|w| w[0] < w[1]) {
            return Err("mass columns are not strictly ascending".to_string());
        }
        for (i, sample) in samples.iter().enumerate() {
            if samples[..i].contains(sample) {
                return Err(format!("duplicate sample identifier '{}'", sample));
            }
        }
        Ok(Self {
            samples,
            masses,
            matrix,
            peaks,
        })
    }

    /// Sample identifiers in row order
    pub fn samples(&self) -> &[SampleId] {
        &self.samples
    }

    /// Mass columns, ascending
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn matrix(&self) -> &IntensityMatrix {
        &self.matrix
    }

    /// Peak lists in row order
    pub fn peaks(&self) -> &[PeakList] {
        &self.peaks
    }

    /// Row index of a sample
    pub fn index_of(&self, sample: &str) -> Option<usize> {
        self.samples.iter().position(|s| s.as_str() == sample)
    }

    /// Normalized intensity row of a sample
    pub fn row(&self, sample: &str) -> Option<&[f64]> {
        self.index_of(sample).map(|idx| self.matrix.row(idx))
    }

    /// Peak list of a sample
    pub fn peaks_of(&self, sample: &str) -> Option<&PeakList> {
        self.index_of(sample).map(|idx| &self.peaks[idx])
    }

    /// Full mass range spanned by the columns
    pub fn mass_limit(&self) -> MassRange {
        // from_parts guarantees at least one column
        MassRange::new(self.masses[0], self.masses[self.masses.len() - 1])
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            samples: self.samples.len(),
            columns: self.masses.len(),
            peaks: self.peaks.iter().map(PeakList::len).sum(),
            mass_limit: self.mass_limit(),
        }
    }
}
