use std::io::Write;

use log::warn;
use serde::{Deserialize, Serialize};

use super::{AliasTable, ViewError, WorkingArea};
use crate::dataset::{Dataset, IntensityMatrix, PeakList, SampleId};

/// Default number of peaks used as normalization basis
pub const DEFAULT_RANK: usize = 5;

/// Options for [`prepare_view`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Rescale each row to percent of its top-`rank` peak intensities
    pub normalize: bool,
    /// Mass offset subtracted from every mass coordinate
    pub deduction: f64,
    /// Maximum number of peaks forming the normalization basis
    pub rank: usize,
    /// Minimum peak intensity to qualify for the normalization basis
    pub threshold: f64,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            normalize: false,
            deduction: 0.0,
            rank: DEFAULT_RANK,
            threshold: 0.0,
        }
    }
}

impl PlotOptions {
    /// Reject options outside their domain
    pub fn validate(&self) -> Result<(), ViewError> {
        if self.rank == 0 {
            return Err(ViewError::InvalidOption {
                name: "rank",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.threshold.is_finite() {
            return Err(ViewError::InvalidOption {
                name: "threshold",
                reason: format!("{} is not a finite number", self.threshold),
            });
        }
        if !self.deduction.is_finite() {
            return Err(ViewError::InvalidOption {
                name: "deduction",
                reason: format!("{} is not a finite number", self.deduction),
            });
        }
        Ok(())
    }
}

/// Windowed, renamed and optionally renormalized data ready for rendering.
///
/// Row `i` of `matrix`, `labels[i]`, `samples[i]` and `peaks[i]` describe the
/// same sample. `masses` are the column coordinates after deduction.
#[derive(Debug, Clone, PartialEq)]
pub struct PlottingView {
    /// Display names, in plotting order
    pub labels: Vec<String>,
    /// Identifiers behind `labels`
    pub samples: Vec<SampleId>,
    /// Column coordinates (deduction applied)
    pub masses: Vec<f64>,
    pub matrix: IntensityMatrix,
    /// Windowed peaks per row; only the normalization basis when normalized
    pub peaks: Vec<PeakList>,
    /// Offset that was subtracted from every mass
    pub deduction: f64,
    /// Whether rows were rescaled to percentages
    pub normalized: bool,
    /// Per-sample problems that did not abort preparation
    pub warnings: Vec<ViewError>,
}

impl PlottingView {
    pub fn nrows(&self) -> usize {
        self.labels.len()
    }

    pub fn ncols(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.masses.is_empty()
    }

    /// Write the matrix as tab-separated values: a `sample` column then one column per mass
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut tsv = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);

        let mut header = Vec::with_capacity(self.masses.len() + 1);
        header.push("sample".to_string());
        header.extend(self.masses.iter().map(f64::to_string));
        tsv.write_record(&header)?;

        for (label, row) in self.labels.iter().zip(self.matrix.rows()) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(label.clone());
            record.extend(row.iter().map(f64::to_string));
            tsv.write_record(&record)?;
        }
        tsv.flush()?;
        Ok(())
    }

    /// Write the peaks as tab-separated `sample`, `mass`, `intensity` records
    pub fn write_peaks_tsv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut tsv = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        tsv.write_record(["sample", "mass", "intensity"])?;
        for (label, peaks) in self.labels.iter().zip(&self.peaks) {
            for (mass, intensity) in peaks.iter() {
                tsv.write_record([label.clone(), mass.to_string(), intensity.to_string()])?;
            }
        }
        tsv.flush()?;
        Ok(())
    }
}

/// Derive the plotting data for the current working area.
///
/// Rows are renamed to their aliases and sliced to `area.selected()` in that
/// order, columns and peaks to the current mass range. With `normalize` each
/// row is rescaled by `100 / S`, where `S` is the summed intensity of its top
/// `rank` peaks at or above `threshold`; those peaks become the row's peak
/// list, sorted by mass. A sample without such peaks is left raw and reported
/// in [`PlottingView::warnings`]. Finally `deduction` is subtracted from all
/// masses.
pub fn prepare_view(
    dataset: &Dataset,
    aliases: &AliasTable,
    area: &WorkingArea,
    options: &PlotOptions,
) -> Result<PlottingView, ViewError> {
    options.validate()?;

    let range = area.mass_range();
    let span = range.column_span(dataset.masses());

    let mut labels = Vec::with_capacity(area.selected().len());
    let mut samples = Vec::with_capacity(area.selected().len());
    let mut rows = Vec::with_capacity(area.selected().len());
    for alias in area.selected() {
        let Some(sample) = aliases.sample_of(alias) else {
            continue;
        };
        let Some(row) = dataset.index_of(sample.as_str()) else {
            continue;
        };
        labels.push(alias.clone());
        samples.push(sample.clone());
        rows.push(row);
    }

    let mut matrix = dataset
        .matrix()
        .select(&rows, span.clone())
        .ok_or(ViewError::InvalidRange {
            lo: range.lo,
            hi: range.hi,
        })?;
    let mut peaks: Vec<PeakList> = rows
        .iter()
        .map(|&row| dataset.peaks()[row].within(&range))
        .collect();

    let mut warnings = Vec::new();
    if options.normalize {
        for (i, peak_list) in peaks.iter_mut().enumerate() {
            match normalization_basis(peak_list, options.rank, options.threshold) {
                Some((basis, total)) => {
                    let factor = 100.0 / total;
                    matrix.scale_row(i, factor);
                    *peak_list = basis;
                    peak_list.scale_intensities(factor);
                }
                None => {
                    warn!(
                        "No peak of '{}' reaches {} in {}; leaving it unnormalized",
                        labels[i], options.threshold, range
                    );
                    warnings.push(ViewError::EmptySelection {
                        sample: labels[i].clone(),
                    });
                }
            }
        }
    }

    let mut masses = dataset.masses()[span].to_vec();
    if options.deduction != 0.0 {
        for mass in &mut masses {
            *mass -= options.deduction;
        }
        for peak_list in &mut peaks {
            peak_list.shift_masses(options.deduction);
        }
    }

    Ok(PlottingView {
        labels,
        samples,
        masses,
        matrix,
        peaks,
        deduction: options.deduction,
        normalized: options.normalize,
        warnings,
    })
}

/// Top-`rank` peaks at or above `threshold`, re-sorted by mass, with their
/// intensity sum. `None` when nothing qualifies or the sum is not positive.
fn normalization_basis(peaks: &PeakList, rank: usize, threshold: f64) -> Option<(PeakList, f64)> {
    let mut chosen: Vec<(f64, f64)> = peaks
        .iter()
        .filter(|&(_, intensity)| intensity >= threshold)
        .collect();
    // stable, so equal intensities keep their file order
    chosen.sort_by(|a, b| b.1.total_cmp(&a.1));
    chosen.truncate(rank);
    chosen.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total: f64 = chosen.iter().map(|&(_, intensity)| intensity).sum();
    if chosen.is_empty() || total <= 0.0 {
        return None;
    }
    Some((PeakList::from_pairs(chosen), total))
}
