//! Captured sets of model records
//!
//! A snapshot is identified by the hash of its records alone, so two
//! captures with identical offerings share a cache file regardless of when
//! they were taken.

mod hash;
mod model;
mod store;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

pub(crate) use hash::order_independent_hash;
pub(crate) use model::ModelRecord;
pub(crate) use store::{SnapshotEntry, SnapshotStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Snapshot {
    models: Vec<ModelRecord>,
    timestamp: i64,
}

/// On-disk layouts. Early caches stored a bare, untimestamped array.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Current {
        models: Vec<ModelRecord>,
        timestamp: i64,
    },
    Legacy(Vec<ModelRecord>),
}

impl Snapshot {
    /// Build a snapshot from records, collapsing identical entries.
    ///
    /// Records are kept sorted by name, then canonical form.
    pub(crate) fn new(records: impl IntoIterator<Item = ModelRecord>, timestamp: i64) -> Self {
        let unique: HashSet<ModelRecord> = records.into_iter().collect();
        let mut keyed: Vec<(String, ModelRecord)> =
            unique.into_iter().map(|r| (r.canonical(), r)).collect();
        keyed.sort_by(|(ca, a), (cb, b)| a.name.cmp(&b.name).then_with(|| ca.cmp(cb)));

        let snapshot = Self {
            models: keyed.into_iter().map(|(_, r)| r).collect(),
            timestamp,
        };
        for name in snapshot.duplicate_names() {
            tracing::warn!(model = name, "multiple records share a model name");
        }
        snapshot
    }

    pub(crate) fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub(crate) fn len(&self) -> usize {
        self.models.len()
    }

    pub(crate) fn hash(&self) -> String {
        order_independent_hash(&self.models)
    }

    /// Records keyed by name. For a name with several records the last one
    /// in snapshot order wins.
    pub(crate) fn by_name(&self) -> BTreeMap<&str, &ModelRecord> {
        self.models.iter().map(|m| (m.name.as_str(), m)).collect()
    }

    pub(crate) fn duplicate_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .models
            .windows(2)
            .filter(|w| w[0].name == w[1].name)
            .map(|w| w[0].name.as_str())
            .collect();
        names.dedup();
        names
    }

    /// Pretty JSON document `{"models": [...], "timestamp": ...}`
    pub(crate) fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Parse a snapshot document. `fallback_timestamp` supplies the capture
    /// time for legacy documents that lack one.
    pub(crate) fn from_json(
        json: &str,
        fallback_timestamp: impl FnOnce() -> i64,
    ) -> Result<Self, serde_json::Error> {
        let snapshot = match serde_json::from_str::<SnapshotFile>(json)? {
            SnapshotFile::Current { models, timestamp } => Self::new(models, timestamp),
            SnapshotFile::Legacy(models) => Self::new(models, fallback_timestamp()),
        };
        Ok(snapshot)
    }
}
