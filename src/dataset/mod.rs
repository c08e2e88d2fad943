//! # Dataset module
//!
//! The immutable, assembled view of every sample on disk:
//!
//! - [`Dataset`]: sample identifiers, a shared ascending mass axis, a
//!   row-normalized [`IntensityMatrix`] and one [`PeakList`] per sample
//! - [`DatasetError`]: everything that can abort construction
//!
//! ## Assembly
//!
//! ```text
//! sample A  (100, 4) (101, 8)            ┐            100   101   102
//! sample B  (101, 5) (102, 10)           ├─ union ─▶ A 0.5   1.0   0.0
//!                                        ┘          B 0.0   0.5   1.0
//! ```
//!
//! Columns are the union of all masses, missing cells are zero-filled, and each
//! row is divided by its own maximum. Peak lists are kept exactly as read.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mshm::dataset::Dataset;
//! use mshm::discovery::SampleLayout;
//!
//! let dataset = Dataset::from_directory("runs/2024-05-01", &SampleLayout::default())?;
//! println!("{}", dataset.summary());
//! # Ok::<(), mshm::dataset::DatasetError>(())
//! ```

mod assembly;
mod dataset_impl;
mod error;
mod types;


pub use dataset_impl::Dataset;
pub use error::DatasetError;
pub use types::{DatasetSummary, IntensityMatrix, MassRange, PeakList, SampleId};
