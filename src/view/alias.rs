use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ViewError;
use crate::dataset::SampleId;

/// Display name assigned to one sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub sample: SampleId,
    pub alias: String,
}

/// Editable display names, one per sample, kept in dataset row order.
///
/// The table maps identity ([`SampleId`]) to presentation (alias); the two are
/// never merged. Aliases are unique and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    /// Every sample displayed under its own identifier
    pub fn identity(samples: &[SampleId]) -> Self {
        Self {
            entries: samples
                .iter()
                .map(|sample| AliasEntry {
                    sample: sample.clone(),
                    alias: sample.as_str().to_string(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    /// Aliases in dataset row order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.alias.as_str())
    }

    /// Display name of a sample
    pub fn alias_of(&self, sample: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.sample.as_str() == sample)
            .map(|e| e.alias.as_str())
    }

    /// Sample currently shown under `alias`
    pub fn sample_of(&self, alias: &str) -> Option<&SampleId> {
        self.entries
            .iter()
            .find(|e| e.alias == alias)
            .map(|e| &e.sample)
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.entries.iter().any(|e| e.alias == alias)
    }

    /// Merge `mapping` (current alias → new alias) into a new table.
    ///
    /// All renames apply at once, so swapping two names is allowed. Keys that
    /// name no current alias are ignored. Returns the new table together with
    /// the renames that actually changed something, as `(old, new)` pairs.
    pub fn renamed(
        &self,
        mapping: &HashMap<String, String>,
    ) -> Result<(AliasTable, Vec<(String, String)>), ViewError> {
        let mut applied = Vec::new();
        let mut entries = self.entries.clone();

        for entry in &mut entries {
            let Some(new_alias) = mapping.get(&entry.alias) else {
                continue;
            };
            if new_alias.trim().is_empty() {
                return Err(ViewError::InvalidAlias {
                    from: entry.alias.clone(),
                });
            }
            if *new_alias != entry.alias {
                applied.push((entry.alias.clone(), new_alias.clone()));
                entry.alias = new_alias.clone();
            }
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.alias.as_str()) {
                return Err(ViewError::DuplicateAlias {
                    alias: entry.alias.clone(),
                });
            }
        }

        Ok((AliasTable { entries }, applied))
    }

    /// True when the table names exactly `samples`, in order, with unique non-empty aliases
    pub(crate) fn is_consistent_with(&self, samples: &[SampleId]) -> bool {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries.len() == samples.len()
            && self
                .entries
                .iter()
                .zip(samples)
                .all(|(e, s)| e.sample == *s && !e.alias.is_empty() && seen.insert(e.alias.as_str()))
    }
}
