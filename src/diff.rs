//! Set-based comparison of two snapshots

use std::collections::BTreeSet;

use serde::Serialize;

use crate::pricing::{PricingType, price_bits};
use crate::snapshot::{ModelRecord, Snapshot};

/// Before/after pair of a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Change<T> {
    pub(crate) old: T,
    pub(crate) new: T,
}

impl<T> Change<T> {
    #[cfg(test)]
    fn reversed(self) -> Self {
        Change {
            old: self.new,
            new: self.old,
        }
    }
}

fn change<T: Clone + PartialEq>(old: &T, new: &T) -> Option<Change<T>> {
    (old != new).then(|| Change {
        old: old.clone(),
        new: new.clone(),
    })
}

fn price_change(old: Option<f64>, new: Option<f64>) -> Option<Change<Option<f64>>> {
    (price_bits(old) != price_bits(new)).then_some(Change { old, new })
}

/// Fields that differ between two records of the same model
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FieldChanges {
    pub(crate) pricing_type: Option<Change<PricingType>>,
    pub(crate) input_price: Option<Change<Option<f64>>>,
    pub(crate) output_price: Option<Change<Option<f64>>>,
    pub(crate) cached_input_rate: Option<Change<Option<f64>>>,
    pub(crate) cache_write_rate: Option<Change<Option<f64>>>,
    pub(crate) quantization: Option<Change<Option<String>>>,
    pub(crate) deprecated: Option<Change<i64>>,
    pub(crate) replaced_by: Option<Change<Option<String>>>,
}

impl FieldChanges {
    fn between(old: &ModelRecord, new: &ModelRecord) -> Self {
        FieldChanges {
            pricing_type: change(&old.pricing.kind, &new.pricing.kind),
            input_price: price_change(
                old.pricing.normalized_input_price,
                new.pricing.normalized_input_price,
            ),
            output_price: price_change(
                old.pricing.normalized_output_price,
                new.pricing.normalized_output_price,
            ),
            cached_input_rate: price_change(
                old.pricing.rate_per_input_price_cached,
                new.pricing.rate_per_input_price_cached,
            ),
            cache_write_rate: price_change(
                old.pricing.rate_per_input_price_cache_write,
                new.pricing.rate_per_input_price_cache_write,
            ),
            quantization: change(&old.quantization, &new.quantization),
            deprecated: change(&old.deprecated, &new.deprecated),
            replaced_by: change(&old.replaced_by, &new.replaced_by),
        }
    }

    #[cfg(test)]
    fn reversed(self) -> Self {
        FieldChanges {
            pricing_type: self.pricing_type.map(Change::reversed),
            input_price: self.input_price.map(Change::reversed),
            output_price: self.output_price.map(Change::reversed),
            cached_input_rate: self.cached_input_rate.map(Change::reversed),
            cache_write_rate: self.cache_write_rate.map(Change::reversed),
            quantization: self.quantization.map(Change::reversed),
            deprecated: self.deprecated.map(Change::reversed),
            replaced_by: self.replaced_by.map(Change::reversed),
        }
    }
}

/// A model present in both snapshots whose record changed
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ModelChange {
    pub(crate) name: String,
    pub(crate) old: ModelRecord,
    pub(crate) new: ModelRecord,
    pub(crate) fields: FieldChanges,
}

impl ModelChange {
    fn between(old: &ModelRecord, new: &ModelRecord) -> Self {
        ModelChange {
            name: new.name.clone(),
            old: old.clone(),
            new: new.clone(),
            fields: FieldChanges::between(old, new),
        }
    }

    /// The model went from live to deprecated
    pub(crate) fn is_newly_deprecated(&self) -> bool {
        self.old.deprecated == 0 && self.new.deprecated > 0
    }

    pub(crate) fn pricing_changed(&self) -> bool {
        self.old.pricing != self.new.pricing
    }

    #[cfg(test)]
    fn reversed(self) -> Self {
        ModelChange {
            name: self.name,
            old: self.new,
            new: self.old,
            fields: self.fields.reversed(),
        }
    }
}

/// Differences between an older and a newer snapshot, each list ordered by name
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DiffReport {
    pub(crate) added: Vec<ModelRecord>,
    pub(crate) removed: Vec<ModelRecord>,
    pub(crate) modified: Vec<ModelChange>,
}

impl DiffReport {
    pub(crate) fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// The report that comparing in the opposite direction would produce
    #[cfg(test)]
    fn reversed(self) -> Self {
        DiffReport {
            added: self.removed,
            removed: self.added,
            modified: self.modified.into_iter().map(ModelChange::reversed).collect(),
        }
    }
}

pub(crate) fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> DiffReport {
    let old_models = old.by_name();
    let new_models = new.by_name();

    let old_names: BTreeSet<&str> = old_models.keys().copied().collect();
    let new_names: BTreeSet<&str> = new_models.keys().copied().collect();

    let added = new_names
        .difference(&old_names)
        .map(|name| new_models[name].clone())
        .collect();
    let removed = old_names
        .difference(&new_names)
        .map(|name| old_models[name].clone())
        .collect();
    let modified = old_names
        .intersection(&new_names)
        .filter_map(|name| {
            let (before, after) = (old_models[name], new_models[name]);
            (before != after).then(|| ModelChange::between(before, after))
        })
        .collect();

    DiffReport {
        added,
        removed,
        modified,
    }
}
