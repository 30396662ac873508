/// DeepInfra endpoint listing every deployed model with its pricing
pub(crate) const DEFAULT_API_URL: &str = "https://api.deepinfra.com/models/list";

/// Snapshot files are stored as `models_{hash}.json`
pub(crate) const SNAPSHOT_PREFIX: &str = "models_";
pub(crate) const SNAPSHOT_EXT: &str = "json";

/// Timestamp format for deprecation dates in diff output: "2025-01-15 08:30:00"
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format for snapshot capture times in listings: "Wed Jan 15 08:30:00 2025"
pub(crate) const CAPTURED_FORMAT: &str = "%a %b %d %H:%M:%S %Y";
