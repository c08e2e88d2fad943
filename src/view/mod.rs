//! # Working Area and Plotting Views
//!
//! A [`MassHeatMap`] wraps an immutable [`Dataset`](crate::dataset::Dataset)
//! with the state a user edits between plots:
//!
//! ```text
//! Dataset (immutable) ──┐
//! AliasTable ───────────┼──> prepare_view ──> PlottingView ──> render
//! WorkingArea ──────────┘
//!   ├── selected aliases (ordered)
//!   └── mass range (within the dataset's mass limit)
//! ```
//!
//! The plotting view is recomputed from scratch on every request, so a
//! sequence of selections and range changes never compounds: widening the mass
//! range after narrowing it brings the hidden columns back.

mod alias;
mod error;
mod manager;
mod prepare;
mod working_area;


pub use alias::{AliasEntry, AliasTable};
pub use error::ViewError;
pub use manager::MassHeatMap;
pub use prepare::{prepare_view, PlotOptions, PlottingView, DEFAULT_RANK};
pub use working_area::WorkingArea;

pub use crate::dataset::MassRange;
