//! # MSHM - Mass Spectrometry Heat Maps
//!
//! `mshm` turns a folder of per-sample deconvolution results into one
//! comparable intensity-vs-mass matrix and renders it as an annotated heat
//! map: one row per sample, one column per molecular weight, with the detected
//! peaks of each sample labelled by mass and relative intensity.
//!
//! ## Pipeline
//!
//! ```text
//! root/*_unidecfiles/        discovery   ──> SampleDirectory (one per sample)
//!   ├── *_mass.txt           loader      ──> RawSample (spectrum + peaks)
//!   └── *_peaks.dat          dataset     ──> Dataset (shared mass axis, rows max 1.0)
//!                            view        ──> MassHeatMap (aliases + working area)
//!                                        ──> PlottingView (windowed, renormalized)
//!                            render      ──> PlotGeometry / plotly figure
//!                            snapshot    ──> .mshm container
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//!
//! use mshm::discovery::SampleLayout;
//! use mshm::view::{MassHeatMap, PlotOptions};
//!
//! let mut heat_map = MassHeatMap::open("deconvolved/", &SampleLayout::default())?;
//!
//! heat_map.rename_aliases(&HashMap::from([("BSA_rep1".to_string(), "BSA".to_string())]))?;
//! heat_map.set_selection(&["BSA", "Lysozyme"]);
//! heat_map.set_mass_range(14_000.0, 70_000.0)?;
//!
//! let view = heat_map.prepare(&PlotOptions {
//!     normalize: true,
//!     rank: 3,
//!     threshold: 5.0,
//!     ..Default::default()
//! })?;
//! for (label, peaks) in view.labels.iter().zip(&view.peaks) {
//!     println!("{}: {} peaks", label, peaks.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`discovery`]: sample directory naming conventions and scanning
//! - [`loader`]: whitespace-delimited spectrum and peak table parsing
//! - [`dataset`]: the immutable, normalized sample x mass matrix
//! - [`view`]: aliases, working area and plotting-data preparation
//! - [`render`]: figure geometry, labels and the plotly adapter
//! - [`snapshot`]: JSON and `.mshm` container persistence

// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod dataset;
pub mod discovery;
pub mod loader;
pub mod render;
pub mod snapshot;
pub mod view;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::dataset::{
        Dataset, DatasetError, DatasetSummary, IntensityMatrix, MassRange, PeakList, SampleId,
    };
    pub use crate::discovery::{
        discover_samples, DiscoveryMode, PeakFileLayout, SampleDirectory, SampleLayout,
    };
    pub use crate::loader::{load_sample, load_samples, LoadError, RawSample, RawSpectrum};
    #[cfg(feature = "plotting")]
    pub use crate::render::plotly_heatmap;
    pub use crate::render::{ColorStop, HeatMapStyle, PeakAnnotation, PlotGeometry};
    pub use crate::snapshot::{Snapshot, SnapshotError, MSHM_FORMAT_VERSION, MSHM_MIMETYPE};
    pub use crate::view::{
        AliasTable, MassHeatMap, PlotOptions, PlottingView, ViewError, WorkingArea,
    };
}
