//! # Raw table loader
//!
//! Parses the two whitespace-delimited, header-less tables that make up one
//! sample:
//!
//! - the **spectrum** table, one `mass intensity` pair per line, and
//! - the **peak** table, either one `mass intensity` pair per line
//!   ([`PeakFileLayout::Pairs`]) or alternating lines of masses and intensities
//!   ([`PeakFileLayout::Rows`]).
//!
//! Columns past the second are ignored in pair layout. Blank lines are skipped.
//! Every value must parse as a finite number; a table without any data is an
//! error. A failing sample aborts the whole load; the first failing sample in
//! input order is reported.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::dataset::{DatasetError, PeakList, SampleId};
use crate::discovery::{PeakFileLayout, SampleDirectory, SampleLayout};

/// Failure to read or parse one sample file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The expected file does not exist
    #[error("Missing file: {}", .0.display())]
    MissingFile(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field is not a number
    #[error("{}:{line}: invalid number '{field}'", .path.display())]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        field: String,
    },

    /// A line has fewer fields than required
    #[error("{}:{line}: expected at least {expected} columns", .path.display())]
    MissingColumn {
        path: PathBuf,
        line: usize,
        expected: usize,
    },

    /// A field parsed to NaN or infinity
    #[error("{}:{line}: value is not finite", .path.display())]
    NonFinite { path: PathBuf, line: usize },

    /// The file holds no data lines
    #[error("File contains no data: {}", .path.display())]
    Empty { path: PathBuf },

    /// Row-layout peak file whose mass and intensity rows do not pair up
    #[error(
        "{}: mass and intensity rows do not pair up ({masses} masses, {intensities} intensities)",
        .path.display()
    )]
    UnpairedPeakRows {
        path: PathBuf,
        masses: usize,
        intensities: usize,
    },
}

/// Intensity-vs-mass curve of one sample on its native mass grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSpectrum {
    pub masses: Vec<f64>,
    pub intensities: Vec<f64>,
}

impl RawSpectrum {
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Iterate over `(mass, intensity)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.masses
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }
}

impl FromIterator<(f64, f64)> for RawSpectrum {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let (masses, intensities) = iter.into_iter().unzip();
        Self {
            masses,
            intensities,
        }
    }
}

/// Everything read from disk for one sample, before alignment and scaling
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub id: SampleId,
    pub spectrum: RawSpectrum,
    pub peaks: PeakList,
}

fn parse_field(field: &str, path: &Path, line: usize) -> Result<f64, LoadError> {
    let value = field.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
        path: path.to_path_buf(),
        line,
        field: field.to_string(),
    })?;
    if !value.is_finite() {
        return Err(LoadError::NonFinite {
            path: path.to_path_buf(),
            line,
        });
    }
    Ok(value)
}

/// Numbered, non-blank lines of a table
fn data_lines<'a, R: BufRead + 'a>(
    reader: R,
    path: &'a Path,
) -> impl Iterator<Item = Result<(usize, String), LoadError>> + 'a {
    reader
        .lines()
        .enumerate()
        .filter_map(move |(idx, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(Ok((idx + 1, line))),
            Err(source) => Some(Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            })),
        })
}

fn parse_pairs<R: BufRead>(reader: R, path: &Path) -> Result<Vec<(f64, f64)>, LoadError> {
    let mut pairs = Vec::new();
    for line in data_lines(reader, path) {
        let (number, text) = line?;
        let mut fields = text.split_ascii_whitespace();
        let (Some(mass), Some(intensity)) = (fields.next(), fields.next()) else {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                line: number,
                expected: 2,
            });
        };
        pairs.push((
            parse_field(mass, path, number)?,
            parse_field(intensity, path, number)?,
        ));
    }
    if pairs.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(pairs)
}

/// Parse a two-column `mass intensity` spectrum table
pub fn parse_spectrum_table<R: BufRead>(reader: R, path: &Path) -> Result<RawSpectrum, LoadError> {
    Ok(parse_pairs(reader, path)?.into_iter().collect())
}

/// Parse a peak table in the given layout
pub fn parse_peak_table<R: BufRead>(
    reader: R,
    path: &Path,
    layout: PeakFileLayout,
) -> Result<PeakList, LoadError> {
    match layout {
        PeakFileLayout::Pairs => Ok(PeakList::from_pairs(parse_pairs(reader, path)?)),
        PeakFileLayout::Rows => parse_peak_rows(reader, path),
    }
}

fn parse_peak_rows<R: BufRead>(reader: R, path: &Path) -> Result<PeakList, LoadError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in data_lines(reader, path) {
        let (number, text) = line?;
        let row = text
            .split_ascii_whitespace()
            .map(|field| parse_field(field, path, number))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut peaks = PeakList::default();
    for chunk in rows.chunks(2) {
        let masses = &chunk[0];
        let intensities = chunk.get(1).map(Vec::as_slice).unwrap_or(&[]);
        if masses.len() != intensities.len() {
            return Err(LoadError::UnpairedPeakRows {
                path: path.to_path_buf(),
                masses: masses.len(),
                intensities: intensities.len(),
            });
        }
        for (&mass, &intensity) in masses.iter().zip(intensities) {
            peaks.push(mass, intensity);
        }
    }
    Ok(peaks)
}

fn open_table(path: &Path) -> Result<BufReader<File>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Read the spectrum and peak files of one discovered sample
pub fn load_sample(
    sample: &SampleDirectory,
    layout: &SampleLayout,
) -> Result<RawSample, DatasetError> {
    let read = || -> Result<RawSample, LoadError> {
        let spectrum_path = layout.spectrum_path(sample);
        let spectrum = parse_spectrum_table(open_table(&spectrum_path)?, &spectrum_path)?;

        let peaks_path = layout.peaks_path(sample);
        let peaks = parse_peak_table(open_table(&peaks_path)?, &peaks_path, layout.peak_layout)?;

        Ok(RawSample {
            id: sample.id.clone(),
            spectrum,
            peaks,
        })
    };

    read().map_err(|cause| DatasetError::SampleLoadError {
        sample: sample.id.clone(),
        cause,
    })
}

/// Load every discovered sample, preserving the input order.
///
/// With the `parallel` feature samples are read concurrently; the reported
/// error is still the first failing sample in input order.
pub fn load_samples(
    samples: &[SampleDirectory],
    layout: &SampleLayout,
) -> Result<Vec<RawSample>, DatasetError> {
    #[cfg(feature = "parallel")]
    let results: Vec<Result<RawSample, DatasetError>> = samples
        .par_iter()
        .map(|sample| load_sample(sample, layout))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<RawSample, DatasetError>> = samples
        .iter()
        .map(|sample| load_sample(sample, layout))
        .collect();

    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn path() -> PathBuf {
        PathBuf::from("sample_mass.txt")
    }

    #[test]
    fn test_parse_spectrum_table() {
        let data = "1000 0.5\n1001\t2.0\n\n1002   1.25 extra\n";
        let spectrum = parse_spectrum_table(Cursor::new(data), &path()).unwrap();
        assert_eq!(spectrum.masses, vec![1000.0, 1001.0, 1002.0]);
        assert_eq!(spectrum.intensities, vec![0.5, 2.0, 1.25]);
    }

    #[test]
    fn test_parse_scientific_notation() {
        let data = "1.5e3 2.5E-1\n";
        let spectrum = parse_spectrum_table(Cursor::new(data), &path()).unwrap();
        assert_eq!(spectrum.masses, vec![1500.0]);
        assert_eq!(spectrum.intensities, vec![0.25]);
    }

    #[test]
    fn test_invalid_number_reports_line() {
        let data = "1000 0.5\n1001 abc\n";
        let err = parse_spectrum_table(Cursor::new(data), &path()).unwrap_err();
        match err {
            LoadError::InvalidNumber { line, field, .. } => {
                assert_eq!(line, 2);
                assert_eq!(field, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let err = parse_spectrum_table(Cursor::new("1000\n"), &path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { line: 1, .. }));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = parse_spectrum_table(Cursor::new("1000 NaN\n"), &path()).unwrap_err();
        assert!(matches!(err, LoadError::NonFinite { line: 1, .. }));
    }

    #[test]
    fn test_empty_table() {
        let err = parse_spectrum_table(Cursor::new("\n  \n"), &path()).unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
    }

    #[test]
    fn test_parse_peak_pairs() {
        let data = "66430 100\n33215 12.5\n";
        let peaks = parse_peak_table(Cursor::new(data), &path(), PeakFileLayout::Pairs).unwrap();
        assert_eq!(peaks.masses(), &[66430.0, 33215.0]);
        assert_eq!(peaks.intensities(), &[100.0, 12.5]);
    }

    #[test]
    fn test_parse_peak_rows() {
        let data = "120 150 180\n5 50 20\n";
        let peaks = parse_peak_table(Cursor::new(data), &path(), PeakFileLayout::Rows).unwrap();
        assert_eq!(peaks.masses(), &[120.0, 150.0, 180.0]);
        assert_eq!(peaks.intensities(), &[5.0, 50.0, 20.0]);
    }

    #[test]
    fn test_parse_peak_rows_alternating_blocks() {
        let data = "120 150\n5 50\n180\n20\n";
        let peaks = parse_peak_table(Cursor::new(data), &path(), PeakFileLayout::Rows).unwrap();
        assert_eq!(peaks.masses(), &[120.0, 150.0, 180.0]);
        assert_eq!(peaks.intensities(), &[5.0, 50.0, 20.0]);
    }

    #[test]
    fn test_parse_peak_rows_unpaired() {
        let err = parse_peak_table(Cursor::new("120 150\n5\n"), &path(), PeakFileLayout::Rows)
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnpairedPeakRows {
                masses: 2,
                intensities: 1,
                ..
            }
        ));

        let err = parse_peak_table(Cursor::new("120 150\n"), &path(), PeakFileLayout::Rows)
            .unwrap_err();
        assert!(matches!(err, LoadError::UnpairedPeakRows { .. }));
    }

    #[test]
    fn test_load_sample_missing_peak_file() {
        let dir = tempdir().unwrap();
        let sample_dir = dir.path().join("BSA_000001_unidecfiles");
        fs::create_dir(&sample_dir).unwrap();
        fs::write(sample_dir.join("BSA_000001_mass.txt"), "100 1\n").unwrap();

        let sample = SampleDirectory {
            id: SampleId::new("BSA"),
            path: sample_dir,
            stem: "BSA_000001".to_string(),
            run: Some(1),
        };
        let err = load_sample(&sample, &SampleLayout::default()).unwrap_err();
        match err {
            DatasetError::SampleLoadError { sample, cause } => {
                assert_eq!(sample.as_str(), "BSA");
                assert!(matches!(cause, LoadError::MissingFile(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_samples_preserves_order() {
        let dir = tempdir().unwrap();
        let layout = SampleLayout::default();
        let mut samples = Vec::new();
        for (i, name) in ["c", "a", "b"].iter().enumerate() {
            let stem = format!("{}_00000{}", name, i);
            let sample_dir = dir.path().join(format!("{}_unidecfiles", stem));
            fs::create_dir(&sample_dir).unwrap();
            fs::write(
                sample_dir.join(format!("{}_mass.txt", stem)),
                format!("100 {}\n", i + 1),
            )
            .unwrap();
            fs::write(sample_dir.join(format!("{}_peaks.dat", stem)), "100 50\n").unwrap();
            samples.push(SampleDirectory {
                id: SampleId::new(*name),
                path: sample_dir,
                stem,
                run: Some(i as u64),
            });
        }

        let loaded = load_samples(&samples, &layout).unwrap();
        let ids: Vec<&str> = loaded.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(loaded[2].spectrum.intensities, vec![3.0]);
    }

    #[test]
    fn test_load_samples_reports_first_failure_in_input_order() {
        let dir = tempdir().unwrap();
        let mut samples = Vec::new();
        for name in ["z", "a"] {
            let stem = format!("{}_000001", name);
            let sample_dir = dir.path().join(format!("{}_unidecfiles", stem));
            fs::create_dir(&sample_dir).unwrap();
            samples.push(SampleDirectory {
                id: SampleId::new(name),
                path: sample_dir,
                stem,
                run: Some(1),
            });
        }

        let err = load_samples(&samples, &SampleLayout::default()).unwrap_err();
        match err {
            DatasetError::SampleLoadError { sample, .. } => assert_eq!(sample.as_str(), "z"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
