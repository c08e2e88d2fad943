use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::info;

use super::prepare::{prepare_view, PlotOptions, PlottingView};
use super::{AliasTable, ViewError, WorkingArea};
use crate::dataset::{Dataset, DatasetError, MassRange, SampleId};
use crate::discovery::SampleLayout;

/// Interactive heat map session over one assembled dataset.
///
/// Holds the immutable [`Dataset`], the editable [`AliasTable`] and the
/// current [`WorkingArea`]. Every mutating call either succeeds completely or
/// leaves the session as it was.
///
/// # Example
///
/// ```no_run
/// use mshm::discovery::SampleLayout;
/// use mshm::view::{MassHeatMap, PlotOptions};
///
/// let mut heat_map = MassHeatMap::open("deconvolved/", &SampleLayout::default())?;
/// heat_map.set_mass_range(60_000.0, 70_000.0)?;
/// let view = heat_map.prepare(&PlotOptions { normalize: true, ..Default::default() })?;
/// println!("{} rows x {} columns", view.nrows(), view.ncols());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct MassHeatMap {
    dataset: Arc<Dataset>,
    aliases: AliasTable,
    area: WorkingArea,
}

impl MassHeatMap {
    /// Start a session with identity aliases, everything selected and the full mass range
    pub fn new(dataset: impl Into<Arc<Dataset>>) -> Self {
        let dataset = dataset.into();
        let aliases = AliasTable::identity(dataset.samples());
        let area = WorkingArea::full(dataset.mass_limit(), &aliases);
        Self {
            dataset,
            aliases,
            area,
        }
    }

    /// Discover, load and assemble the samples below `root`
    pub fn open<P: AsRef<Path>>(root: P, layout: &SampleLayout) -> Result<Self, DatasetError> {
        Dataset::from_directory(root, layout).map(Self::new)
    }

    /// Rebuild a session from its parts, checking that they fit together
    pub(crate) fn from_parts(
        dataset: Dataset,
        aliases: AliasTable,
        area: WorkingArea,
    ) -> Result<Self, String> {
        if !aliases.is_consistent_with(dataset.samples()) {
            return Err("alias table does not match the dataset samples".to_string());
        }
        area.check(&aliases, dataset.mass_limit())?;
        Ok(Self {
            dataset: Arc::new(dataset),
            aliases,
            area,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Shared handle to the dataset
    pub fn dataset_handle(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Read-only copy of the current working area
    pub fn working_area(&self) -> &WorkingArea {
        &self.area
    }

    /// Sample identifiers as discovered, in dataset order
    pub fn original_samples(&self) -> &[SampleId] {
        self.dataset.samples()
    }

    /// Full mass range of the dataset
    pub fn mass_limit(&self) -> MassRange {
        self.area.mass_limit()
    }

    /// Currently selected aliases, in plotting order
    pub fn samples(&self) -> &[String] {
        self.area.selected()
    }

    /// Current mass window
    pub fn mass_range(&self) -> MassRange {
        self.area.mass_range()
    }

    /// Replace the selection; unknown aliases are ignored.
    pub fn set_selection<S: AsRef<str>>(&mut self, aliases: &[S]) {
        self.area = self.area.with_selection(aliases);
    }

    /// Replace the mass window, clamped to [`MassHeatMap::mass_limit`].
    pub fn set_mass_range(&mut self, lo: f64, hi: f64) -> Result<(), ViewError> {
        self.area = self.area.with_mass_range(lo, hi)?;
        Ok(())
    }

    /// Rename samples; `mapping` goes from current alias to new alias.
    ///
    /// Renamed samples that were selected stay selected under the new name.
    pub fn rename_aliases(&mut self, mapping: &HashMap<String, String>) -> Result<(), ViewError> {
        let (aliases, applied) = self.aliases.renamed(mapping)?;
        if applied.is_empty() {
            return Ok(());
        }
        info!("Renamed {} sample(s)", applied.len());
        self.area = self.area.with_aliases(&aliases, &applied);
        self.aliases = aliases;
        Ok(())
    }

    /// Select every sample over the full mass range; aliases are kept
    pub fn reset(&mut self) {
        self.area = WorkingArea::full(self.dataset.mass_limit(), &self.aliases);
    }

    /// Prepare the plotting data for the current working area
    pub fn prepare(&self, options: &PlotOptions) -> Result<PlottingView, ViewError> {
        prepare_view(&self.dataset, &self.aliases, &self.area, options)
    }
}
