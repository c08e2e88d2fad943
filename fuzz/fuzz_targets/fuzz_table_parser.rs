#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use std::path::Path;

use mshm::discovery::PeakFileLayout;
use mshm::loader::{parse_peak_table, parse_spectrum_table};

fuzz_target!(|data: &[u8]| {
    let path = Path::new("fuzz_input");

    // Malformed tables must come back as errors, never as panics
    if let Ok(spectrum) = parse_spectrum_table(Cursor::new(data), path) {
        assert!(spectrum.iter().all(|(m, i)| m.is_finite() && i.is_finite()));
    }

    for layout in [PeakFileLayout::Pairs, PeakFileLayout::Rows] {
        if let Ok(peaks) = parse_peak_table(Cursor::new(data), path, layout) {
            assert_eq!(peaks.masses().len(), peaks.intensities().len());
        }
    }
});
