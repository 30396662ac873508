use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Snapshot {hash} not found in {dir}. Make sure the hash is correct and the cache file exists.")]
    SnapshotNotFound { hash: String, dir: PathBuf },

    #[error("Hash prefix \"{prefix}\" is ambiguous ({count} snapshots match)")]
    AmbiguousHash { prefix: String, count: usize },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid snapshot file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid cache directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Normalize(#[from] NormalizeError),

    #[error("{0}")]
    Hook(#[from] HookError),
}

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("Failed to fetch models: {0}")]
    Request(ureq::Error),

    #[error("Failed to fetch models: {status} {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode model list: {0}")]
    Decode(serde_json::Error),
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum NormalizeError {
    #[error("Unsupported pricing type: {input}")]
    UnsupportedType { input: String },

    #[error("image units pricing requires an image unit price")]
    MissingImagePrice,

    #[error("image units pricing requires default width, height and iterations")]
    MissingImageDefaults,

    #[error("image units pricing requires \"{key}\"")]
    MissingImageDefault { key: &'static str },

    #[error("Model {model}: {source}")]
    InvalidModel {
        model: String,
        source: Box<NormalizeError>,
    },
}

#[derive(Debug, Error)]
pub(crate) enum HookError {
    #[error("Failed to run on-change command `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("On-change command `{command}` exited with {status}")]
    Failed { command: String, status: String },
}
