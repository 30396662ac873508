use sha2::{Digest, Sha256};

use super::model::ModelRecord;

/// SHA-256 over the sorted canonical forms of `records`.
///
/// Input order and duplicate records do not affect the result.
pub(crate) fn order_independent_hash<'a>(
    records: impl IntoIterator<Item = &'a ModelRecord>,
) -> String {
    let mut lines: Vec<String> = records.into_iter().map(ModelRecord::canonical).collect();
    lines.sort();
    lines.dedup();

    let mut hasher = Sha256::new();
    hasher.update(lines.join("\n").as_bytes());
    hex::encode(hasher.finalize())
}
