use std::borrow::Borrow;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Canonical identifier of one sample, derived from its directory name.
///
/// A `SampleId` never changes after discovery; user-facing names live in
/// [`crate::view::AliasTable`] and are joined back through this key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(String);

impl SampleId {
    /// Create a new sample identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SampleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SampleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SampleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Closed mass-weight interval `[lo, hi]` in Daltons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassRange {
    /// Lower bound (inclusive)
    pub lo: f64,
    /// Upper bound (inclusive)
    pub hi: f64,
}

impl MassRange {
    /// Create a new range. No ordering check is made; see [`MassRange::is_valid`].
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// True when both bounds are numbers and `lo <= hi`
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lo <= self.hi
    }

    /// True when `mass` lies inside the closed interval
    #[inline]
    pub fn contains(&self, mass: f64) -> bool {
        mass >= self.lo && mass <= self.hi
    }

    /// True when `other` lies entirely inside this range
    pub fn encloses(&self, other: &MassRange) -> bool {
        self.contains(other.lo) && self.contains(other.hi)
    }

    /// Snap `value` to the nearest bound when it falls outside the range
    #[inline]
    pub fn snap(&self, value: f64) -> f64 {
        if value < self.lo {
            self.lo
        } else if value > self.hi {
            self.hi
        } else {
            value
        }
    }

    /// Index range of the entries of an ascending `masses` slice that fall inside this range
    pub fn column_span(&self, masses: &[f64]) -> Range<usize> {
        let start = masses.partition_point(|&m| m < self.lo);
        let end = masses.partition_point(|&m| m <= self.hi);
        start..end.max(start)
    }
}

impl fmt::Display for MassRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// Dense row-major matrix of intensities: one row per sample, one column per mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct IntensityMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<MatrixRepr> for IntensityMatrix {
    type Error = String;

    fn try_from(repr: MatrixRepr) -> Result<Self, Self::Error> {
        if repr.rows.checked_mul(repr.cols) != Some(repr.data.len()) {
            return Err(format!(
                "invalid matrix shape ({}, {}) for buffer of length {}",
                repr.rows,
                repr.cols,
                repr.data.len()
            ));
        }
        Ok(Self {
            data: repr.data,
            rows: repr.rows,
            cols: repr.cols,
        })
    }
}

impl From<IntensityMatrix> for MatrixRepr {
    fn from(matrix: IntensityMatrix) -> Self {
        Self {
            rows: matrix.rows,
            cols: matrix.cols,
            data: matrix.data,
        }
    }
}

impl IntensityMatrix {
    /// A `rows x cols` matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Number of rows (samples)
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns (masses)
    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Borrow one row. Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Mutably borrow one row. Panics if `row` is out of bounds.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Iterate over rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on zero-width rows
        let cols = self.cols;
        (0..self.rows).map(move |r| &self.data[r * cols..(r + 1) * cols])
    }

    /// Multiply every cell of one row by `factor`
    pub fn scale_row(&mut self, row: usize, factor: f64) {
        for value in self.row_mut(row) {
            *value *= factor;
        }
    }

    /// Largest value in a row, `None` for a zero-width matrix
    pub fn row_max(&self, row: usize) -> Option<f64> {
        self.row(row).iter().copied().reduce(f64::max)
    }

    /// Copy the given rows (in the given order) restricted to a column span.
    ///
    /// Returns `None` when a row or the column span is out of bounds.
    pub fn select(&self, rows: &[usize], cols: Range<usize>) -> Option<Self> {
        if cols.start > cols.end || cols.end > self.cols {
            return None;
        }
        let width = cols.end - cols.start;
        let mut data = Vec::with_capacity(rows.len() * width);
        for &row in rows {
            if row >= self.rows {
                return None;
            }
            data.extend_from_slice(&self.row(row)[cols.clone()]);
        }
        Some(Self {
            data,
            rows: rows.len(),
            cols: width,
        })
    }

    pub(crate) fn push_row(&mut self, row: &[f64]) {
        debug_assert_eq!(row.len(), self.cols);
        self.data.extend_from_slice(row);
        self.rows += 1;
    }

    pub(crate) fn with_columns(cols: usize, capacity_rows: usize) -> Self {
        Self {
            data: Vec::with_capacity(cols * capacity_rows),
            rows: 0,
            cols,
        }
    }
}

/// Detected peaks of one sample as paired mass / intensity sequences.
///
/// Both sequences always have the same length; an absent peak is simply not
/// present in the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PeakListRepr", into = "PeakListRepr")]
pub struct PeakList {
    masses: Vec<f64>,
    intensities: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct PeakListRepr {
    masses: Vec<f64>,
    intensities: Vec<f64>,
}

impl TryFrom<PeakListRepr> for PeakList {
    type Error = String;

    fn try_from(repr: PeakListRepr) -> Result<Self, Self::Error> {
        PeakList::new(repr.masses, repr.intensities).ok_or_else(|| {
            "peak list masses and intensities differ in length".to_string()
        })
    }
}

impl From<PeakList> for PeakListRepr {
    fn from(peaks: PeakList) -> Self {
        Self {
            masses: peaks.masses,
            intensities: peaks.intensities,
        }
    }
}

impl PeakList {
    /// Build a peak list from parallel sequences, `None` when their lengths differ
    pub fn new(masses: Vec<f64>, intensities: Vec<f64>) -> Option<Self> {
        if masses.len() != intensities.len() {
            return None;
        }
        Some(Self {
            masses,
            intensities,
        })
    }

    /// Build a peak list from `(mass, intensity)` pairs
    pub fn from_pairs<I: IntoIterator<Item = (f64, f64)>>(pairs: I) -> Self {
        let (masses, intensities) = pairs.into_iter().unzip();
        Self {
            masses,
            intensities,
        }
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Iterate over `(mass, intensity)` pairs in stored order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.masses
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }

    pub fn push(&mut self, mass: f64, intensity: f64) {
        self.masses.push(mass);
        self.intensities.push(intensity);
    }

    /// Peaks whose mass lies inside `range`, order preserved
    pub fn within(&self, range: &MassRange) -> PeakList {
        PeakList::from_pairs(self.iter().filter(|&(mass, _)| range.contains(mass)))
    }

    /// Multiply every intensity by `factor`
    pub fn scale_intensities(&mut self, factor: f64) {
        for value in &mut self.intensities {
            *value *= factor;
        }
    }

    /// Subtract `offset` from every mass
    pub fn shift_masses(&mut self, offset: f64) {
        for mass in &mut self.masses {
            *mass -= offset;
        }
    }
}

/// Counts describing an assembled dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetSummary {
    /// Number of samples (matrix rows)
    pub samples: usize,
    /// Number of distinct mass columns
    pub columns: usize,
    /// Total number of detected peaks across samples
    pub peaks: usize,
    /// Full mass range covered by the columns
    pub mass_limit: MassRange,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset: {} samples, {} mass columns spanning {} Da, {} peaks",
            self.samples, self.columns, self.mass_limit, self.peaks
        )
    }
}
