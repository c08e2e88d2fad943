use log::debug;
use serde::{Deserialize, Serialize};

use super::{AliasTable, ViewError};
use crate::dataset::MassRange;

/// The user's current selection over the immutable dataset.
///
/// `mass_limit` is fixed at construction; `mass_range` always lies within it.
/// `sample_universe` lists every alias in dataset order and `selected` is an
/// ordered subset of it. Updates never modify a `WorkingArea` in place: each
/// operation returns a new value that the caller swaps in once it is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingArea {
    mass_limit: MassRange,
    mass_range: MassRange,
    sample_universe: Vec<String>,
    selected: Vec<String>,
}

impl WorkingArea {
    /// Everything selected over the full mass range
    pub fn full(mass_limit: MassRange, aliases: &AliasTable) -> Self {
        let universe: Vec<String> = aliases.aliases().map(str::to_string).collect();
        Self {
            mass_limit,
            mass_range: mass_limit,
            selected: universe.clone(),
            sample_universe: universe,
        }
    }

    /// Immutable bounds of the mass axis
    pub fn mass_limit(&self) -> MassRange {
        self.mass_limit
    }

    /// Current mass window
    pub fn mass_range(&self) -> MassRange {
        self.mass_range
    }

    /// All aliases, in dataset order
    pub fn sample_universe(&self) -> &[String] {
        &self.sample_universe
    }

    /// Aliases chosen for plotting, in plotting order
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Select `aliases` in the given order.
    ///
    /// Unknown and repeated aliases are dropped; the result may be empty.
    pub fn with_selection<S: AsRef<str>>(&self, aliases: &[S]) -> Self {
        let mut selected: Vec<String> = Vec::with_capacity(aliases.len());
        for alias in aliases {
            let alias = alias.as_ref();
            if !self.sample_universe.iter().any(|a| a == alias) {
                debug!("Ignoring unknown sample alias '{}'", alias);
                continue;
            }
            if selected.iter().any(|a| a == alias) {
                continue;
            }
            selected.push(alias.to_string());
        }
        Self {
            selected,
            ..self.clone()
        }
    }

    /// Set the mass window, snapping out-of-bounds values to the nearest limit.
    ///
    /// Fails with [`ViewError::InvalidRange`] when `lo > hi` after snapping or
    /// either bound is NaN.
    pub fn with_mass_range(&self, lo: f64, hi: f64) -> Result<Self, ViewError> {
        let range = MassRange::new(self.mass_limit.snap(lo), self.mass_limit.snap(hi));
        if !range.is_valid() {
            return Err(ViewError::InvalidRange {
                lo: range.lo,
                hi: range.hi,
            });
        }
        Ok(Self {
            mass_range: range,
            ..self.clone()
        })
    }

    /// Follow alias renames: the universe is rebuilt from `aliases` and every
    /// selected alias that was renamed is replaced by its new name, in place.
    pub fn with_aliases(&self, aliases: &AliasTable, renames: &[(String, String)]) -> Self {
        let selected = self
            .selected
            .iter()
            .map(|alias| {
                renames
                    .iter()
                    .find(|(old, _)| old == alias)
                    .map_or_else(|| alias.clone(), |(_, new)| new.clone())
            })
            .collect();
        Self {
            sample_universe: aliases.aliases().map(str::to_string).collect(),
            selected,
            ..self.clone()
        }
    }

    /// Check the structural invariants against an alias table and mass limit
    pub(crate) fn check(&self, aliases: &AliasTable, mass_limit: MassRange) -> Result<(), String> {
        if self.mass_limit != mass_limit {
            return Err(format!(
                "mass limit {} does not match dataset range {}",
                self.mass_limit, mass_limit
            ));
        }
        if !self.mass_range.is_valid() || !self.mass_limit.encloses(&self.mass_range) {
            return Err(format!(
                "mass range {} is not within {}",
                self.mass_range, self.mass_limit
            ));
        }
        if !self.sample_universe.iter().map(String::as_str).eq(aliases.aliases()) {
            return Err("sample universe does not match the alias table".to_string());
        }
        if let Some(alias) = self
            .selected
            .iter()
            .find(|a| !self.sample_universe.contains(a))
        {
            return Err(format!("selected sample '{}' is not in the universe", alias));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SampleId;

    fn area() -> WorkingArea {
        let aliases =
            AliasTable::identity(&[SampleId::new("A"), SampleId::new("B"), SampleId::new("C")]);
        WorkingArea::full(MassRange::new(100.0, 200.0), &aliases)
    }

    #[test]
    fn test_full() {
        let area = area();
        assert_eq!(area.selected(), &["A", "B", "C"]);
        assert_eq!(area.mass_range(), area.mass_limit());
    }

    #[test]
    fn test_selection_preserves_caller_order() {
        let area = area().with_selection(&["C", "A"]);
        assert_eq!(area.selected(), &["C", "A"]);
        assert_eq!(area.sample_universe(), &["A", "B", "C"]);
    }

    #[test]
    fn test_selection_drops_unknown_and_repeated() {
        let area = area().with_selection(&["B", "nope", "B", "A"]);
        assert_eq!(area.selected(), &["B", "A"]);

        let empty = area.with_selection(&["unknown_alias"]);
        assert!(empty.selected().is_empty());
    }

    #[test]
    fn test_mass_range_clamps_to_limit() {
        let area = area().with_mass_range(50.0, 150.0).unwrap();
        assert_eq!(area.mass_range(), MassRange::new(100.0, 150.0));

        let area = area.with_mass_range(150.0, 1e9).unwrap();
        assert_eq!(area.mass_range(), MassRange::new(150.0, 200.0));
    }

    #[test]
    fn test_mass_range_is_reset_not_narrowed() {
        let narrowed = area().with_mass_range(140.0, 160.0).unwrap();
        let widened = narrowed.with_mass_range(110.0, 190.0).unwrap();
        assert_eq!(widened.mass_range(), MassRange::new(110.0, 190.0));
    }

    #[test]
    fn test_mass_range_invalid() {
        let area = area();
        assert!(matches!(
            area.with_mass_range(180.0, 120.0),
            Err(ViewError::InvalidRange { .. })
        ));
        // both bounds snap to 200, which is a valid single-column window
        let area = area.with_mass_range(500.0, 600.0).unwrap();
        assert_eq!(area.mass_range(), MassRange::new(200.0, 200.0));
        assert!(area.with_mass_range(f64::NAN, 150.0).is_err());
    }

    #[test]
    fn test_with_aliases_follows_renames() {
        let area = area().with_selection(&["C", "B"]);
        let aliases =
            AliasTable::identity(&[SampleId::new("A"), SampleId::new("B"), SampleId::new("C")]);
        let renamed = aliases
            .renamed(&[("B".to_string(), "beta".to_string())].into_iter().collect())
            .unwrap();

        let area = area.with_aliases(&renamed.0, &renamed.1);
        assert_eq!(area.selected(), &["C", "beta"]);
        assert_eq!(area.sample_universe(), &["A", "beta", "C"]);
        assert!(area.check(&renamed.0, MassRange::new(100.0, 200.0)).is_ok());
    }
}
