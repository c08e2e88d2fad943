//! Integration tests for mshm
//!
//! These tests build sample folders on disk and run the full pipeline from
//! discovery to plotting data and snapshots.

use mshm::dataset::{Dataset, DatasetError, MassRange, PeakList, SampleId};
use mshm::discovery::{DiscoveryMode, PeakFileLayout, SampleLayout};
use mshm::loader::{LoadError, RawSample};
use mshm::render::{PeakAnnotation, PlotGeometry};
use mshm::snapshot::{Snapshot, SnapshotError};
use mshm::view::{MassHeatMap, PlotOptions, ViewError};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Write one UniDec-style sample directory
fn write_sample(root: &Path, stem: &str, spectrum: &[(f64, f64)], peaks: &[(f64, f64)]) {
    let dir = root.join(format!("{}_unidecfiles", stem));
    fs::create_dir_all(&dir).unwrap();

    let table = |rows: &[(f64, f64)]| {
        rows.iter()
            .map(|(m, i)| format!("{} {}\n", m, i))
            .collect::<String>()
    };
    fs::write(dir.join(format!("{}_mass.txt", stem)), table(spectrum)).unwrap();
    fs::write(dir.join(format!("{}_peaks.dat", stem)), table(peaks)).unwrap();
}

/// Three samples on a 100..=200 Da grid, one of them re-run
fn sample_tree(root: &Path) {
    let grid = |scale: f64| -> Vec<(f64, f64)> {
        (100..=200)
            .map(|m| (m as f64, scale * (1.0 + (m % 11) as f64)))
            .collect()
    };
    write_sample(
        root,
        "A_000001",
        &grid(1.0),
        &[(120.0, 5.0), (150.0, 50.0), (180.0, 20.0)],
    );
    write_sample(root, "B_000001", &grid(9.0), &[(101.0, 1.0)]);
    write_sample(root, "B_000004", &grid(2.0), &[(110.0, 100.0)]);
    write_sample(root, "C_000002", &grid(3.0), &[(140.0, 70.0), (190.0, 30.0)]);

    // not a sample directory
    fs::create_dir_all(root.join("notes")).unwrap();
    fs::write(root.join("README.txt"), "batch of 2024-03-01").unwrap();
}

/// Test the complete folder-to-plot pipeline
#[test]
fn test_folder_to_plotting_view() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let mut heat_map = MassHeatMap::open(dir.path(), &SampleLayout::default()).unwrap();
    let ids: Vec<&str> = heat_map
        .original_samples()
        .iter()
        .map(SampleId::as_str)
        .collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(heat_map.mass_limit(), MassRange::new(100.0, 200.0));

    // B_000004 superseded B_000001
    assert_eq!(
        heat_map.dataset().peaks_of("B").unwrap().masses(),
        &[110.0]
    );

    heat_map.set_mass_range(130.0, 200.0).unwrap();
    heat_map.set_selection(&["A"]);
    let view = heat_map
        .prepare(&PlotOptions {
            normalize: true,
            rank: 2,
            threshold: 10.0,
            ..Default::default()
        })
        .unwrap();

    assert_eq!(view.labels, vec!["A"]);
    assert_eq!(view.ncols(), 71);
    assert_eq!(view.peaks[0].masses(), &[150.0, 180.0]);
    let expected = [50.0 * 100.0 / 70.0, 20.0 * 100.0 / 70.0];
    for (got, want) in view.peaks[0].intensities().iter().zip(expected) {
        assert!((got - want).abs() < 1e-9);
    }

    let geometry = PlotGeometry::from_view(&view);
    assert_eq!(geometry.x_extent, (129.5, 200.5));
    assert_eq!(geometry.height_px, 200);

    let labels: Vec<String> = PeakAnnotation::for_view(&view)
        .into_iter()
        .map(|a| a.intensity_label)
        .collect();
    assert_eq!(labels, vec!["71.4%", "28.6%"]);
}

#[test]
fn test_all_directories_mode() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let layout = SampleLayout {
        mode: DiscoveryMode::AllDirectories,
        ..Default::default()
    };
    let dataset = Dataset::from_directory(dir.path(), &layout).unwrap();
    let ids: Vec<&str> = dataset.samples().iter().map(SampleId::as_str).collect();
    assert_eq!(ids, vec!["A_000001", "B_000001", "B_000004", "C_000002"]);
}

#[test]
fn test_row_layout_peak_files() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("X_000001_unidecfiles");
    fs::create_dir_all(&sample).unwrap();
    fs::write(sample.join("X_000001_mass.txt"), "100 1\n101 4\n102 2\n").unwrap();
    fs::write(
        sample.join("X_000001_peaks.dat"),
        "101 102\n100 50\n",
    )
    .unwrap();

    let layout = SampleLayout {
        peak_layout: PeakFileLayout::Rows,
        ..Default::default()
    };
    let dataset = Dataset::from_directory(dir.path(), &layout).unwrap();
    let peaks = dataset.peaks_of("X").unwrap();
    assert_eq!(peaks.masses(), &[101.0, 102.0]);
    assert_eq!(peaks.intensities(), &[100.0, 50.0]);
    assert_eq!(dataset.row("X").unwrap(), &[0.25, 1.0, 0.5]);
}

#[test]
fn test_empty_folder() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("unrelated")).unwrap();

    let err = Dataset::from_directory(dir.path(), &SampleLayout::default()).unwrap_err();
    assert!(matches!(err, DatasetError::NoSamplesFound { .. }));
}

#[test]
fn test_missing_peak_file() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("Y_000001_unidecfiles");
    fs::create_dir_all(&sample).unwrap();
    fs::write(sample.join("Y_000001_mass.txt"), "100 1\n").unwrap();

    let err = Dataset::from_directory(dir.path(), &SampleLayout::default()).unwrap_err();
    match err {
        DatasetError::SampleLoadError { sample, cause } => {
            assert_eq!(sample.as_str(), "Y");
            assert!(matches!(cause, LoadError::MissingFile(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_run_number() {
    let dir = tempdir().unwrap();
    write_sample(dir.path(), "Z_latest", &[(100.0, 1.0)], &[(100.0, 100.0)]);

    let err = Dataset::from_directory(dir.path(), &SampleLayout::default()).unwrap_err();
    assert!(matches!(err, DatasetError::MalformedSampleName { .. }));
}

#[test]
fn test_session_survives_container_round_trip() {
    let dir = tempdir().unwrap();
    let samples = dir.path().join("samples");
    fs::create_dir_all(&samples).unwrap();
    sample_tree(&samples);

    let mut heat_map = MassHeatMap::open(&samples, &SampleLayout::default()).unwrap();
    heat_map
        .rename_aliases(&HashMap::from([
            ("A".to_string(), "Apo".to_string()),
            ("C".to_string(), "Complex".to_string()),
        ]))
        .unwrap();
    heat_map.set_selection(&["Complex", "Apo"]);
    heat_map.set_mass_range(115.5, 190.25).unwrap();

    let path = dir.path().join("session.mshm");
    heat_map.save(&path).unwrap();
    let restored = MassHeatMap::load(&path).unwrap();

    assert_eq!(restored.dataset(), heat_map.dataset());
    assert_eq!(restored.aliases(), heat_map.aliases());
    assert_eq!(restored.working_area(), heat_map.working_area());

    let options = PlotOptions {
        normalize: true,
        threshold: 1.0,
        ..Default::default()
    };
    assert_eq!(
        restored.prepare(&options).unwrap(),
        heat_map.prepare(&options).unwrap()
    );
}

#[test]
fn test_json_snapshot_rejects_tampering() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());
    let heat_map = MassHeatMap::open(dir.path(), &SampleLayout::default()).unwrap();

    let json = heat_map.snapshot().to_json().unwrap();
    assert!(Snapshot::from_json(&json).is_ok());

    let tampered = json.replace("\"format_version\": \"1.0.0\"", "\"format_version\": \"9.0.0\"");
    assert!(matches!(
        Snapshot::from_json(&tampered),
        Err(SnapshotError::UnsupportedVersion { .. })
    ));
}

#[test]
fn test_not_a_container() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.mshm");
    fs::write(&path, b"definitely not a zip archive").unwrap();
    assert!(MassHeatMap::load(&path).is_err());
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn raw_samples() -> impl Strategy<Value = Vec<RawSample>> {
        prop::collection::vec(
            prop::collection::vec((0u32..500, 0.001f64..1e6), 1..40),
            1..6,
        )
        .prop_map(|samples| {
            samples
                .into_iter()
                .enumerate()
                .map(|(i, points)| RawSample {
                    id: SampleId::new(format!("S{i}")),
                    spectrum: points
                        .into_iter()
                        .map(|(m, v)| (1000.0 + m as f64 * 0.5, v))
                        .collect(),
                    peaks: PeakList::from_pairs([(1000.0, 100.0), (1100.0, 42.0)]),
                })
                .collect()
        })
    }

    fn heat_map(samples: Vec<RawSample>) -> MassHeatMap {
        MassHeatMap::new(Dataset::assemble(samples).unwrap())
    }

    proptest! {
        /// Every assembled row peaks at exactly 1.0 and columns ascend strictly
        #[test]
        fn test_rows_are_normalized(samples in raw_samples()) {
            let dataset = Dataset::assemble(samples).unwrap();
            for row in 0..dataset.matrix().nrows() {
                prop_assert_eq!(dataset.matrix().row_max(row), Some(1.0));
            }
            prop_assert!(dataset.masses().windows(2).all(|w| w[0] < w[1]));
        }

        /// Setting a range twice gives the same result as setting it once
        #[test]
        fn test_range_clamping_is_idempotent(
            samples in raw_samples(),
            lo in 900.0f64..1300.0,
            width in 0.0f64..400.0,
        ) {
            let mut heat_map = heat_map(samples);
            heat_map.set_mass_range(lo, lo + width).unwrap();
            let once = heat_map.mass_range();
            prop_assert!(heat_map.mass_limit().encloses(&once));

            heat_map.set_mass_range(once.lo, once.hi).unwrap();
            prop_assert_eq!(heat_map.mass_range(), once);
        }

        /// Renaming before or after selecting yields the same plotting data
        #[test]
        fn test_rename_and_select_commute(samples in raw_samples(), pick in 0usize..6) {
            let count = samples.len();
            let target = format!("S{}", pick % count);
            let mapping = HashMap::from([(target.clone(), "renamed".to_string())]);

            let mut first = heat_map(samples.clone());
            first.rename_aliases(&mapping).unwrap();
            first.set_selection(&["renamed"]);

            let mut second = heat_map(samples);
            second.set_selection(&[target.as_str()]);
            second.rename_aliases(&mapping).unwrap();

            prop_assert_eq!(first.working_area(), second.working_area());
            let options = PlotOptions::default();
            prop_assert_eq!(first.prepare(&options).unwrap(), second.prepare(&options).unwrap());
        }

        /// Without normalization the view is a plain slice of the dataset
        #[test]
        fn test_unnormalized_view_is_a_slice(samples in raw_samples(), deduction in -50.0f64..50.0) {
            let heat_map = heat_map(samples);
            let options = PlotOptions { deduction, ..Default::default() };
            let view = heat_map.prepare(&options).unwrap();

            for (row, sample) in view.samples.iter().enumerate() {
                prop_assert_eq!(view.matrix.row(row), heat_map.dataset().row(sample.as_str()).unwrap());
            }
            for (shown, original) in view.masses.iter().zip(heat_map.dataset().masses()) {
                prop_assert_eq!(*shown, original - deduction);
            }
            prop_assert!(view.warnings.is_empty());
        }

        /// Snapshots survive JSON encoding exactly
        #[test]
        fn test_snapshot_round_trip(samples in raw_samples(), lo in 1000.0f64..1250.0) {
            let mut heat_map = heat_map(samples);
            heat_map.set_mass_range(lo, 1250.0).unwrap();
            let snapshot = heat_map.snapshot();
            let restored = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
            prop_assert_eq!(restored, snapshot);
        }
    }

    #[test]
    fn test_nan_range_rejected() {
        let mut heat_map = heat_map(vec![RawSample {
            id: SampleId::new("S0"),
            spectrum: [(1.0, 1.0), (2.0, 2.0)].into_iter().collect(),
            peaks: PeakList::default(),
        }]);
        assert!(matches!(
            heat_map.set_mass_range(f64::NAN, 2.0),
            Err(ViewError::InvalidRange { .. })
        ));
    }
}
