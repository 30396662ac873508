//! Snapshot cache directory
//!
//! Each snapshot lives in `models_{hash}.json` inside the cache directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::consts::{SNAPSHOT_EXT, SNAPSHOT_PREFIX};
use crate::error::AppError;

use super::Snapshot;

/// Summary of a cached snapshot
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SnapshotEntry {
    pub(crate) hash: String,
    pub(crate) path: PathBuf,
    pub(crate) timestamp: i64,
    pub(crate) models: usize,
}

pub(crate) struct SnapshotStore {
    dir: PathBuf,
}

/// Modification time in unix seconds
fn file_mtime(path: &Path) -> Option<i64> {
    let meta = fs::metadata(path).ok()?;
    let mtime = meta
        .modified()
        .ok()?
        .duration_since(UNIX_EPOCH)
        .ok()?
        .as_secs() as i64;
    Some(mtime)
}

impl SnapshotStore {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// `~/.cache/modelwatch`, or `./cache` when there is no home directory
    pub(crate) fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".cache").join("modelwatch"))
            .unwrap_or_else(|| PathBuf::from("cache"))
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn path_for(&self, hash: &str) -> PathBuf {
        self.dir
            .join(format!("{SNAPSHOT_PREFIX}{hash}.{SNAPSHOT_EXT}"))
    }

    pub(crate) fn contains(&self, hash: &str) -> bool {
        self.path_for(hash).is_file()
    }

    /// Write `snapshot` under its hash, returning the hash and file path
    pub(crate) fn save(&self, snapshot: &Snapshot) -> Result<(String, PathBuf), AppError> {
        fs::create_dir_all(&self.dir).map_err(|source| AppError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let hash = snapshot.hash();
        let path = self.path_for(&hash);
        let json = snapshot.to_json().map_err(|e| AppError::Write {
            path: path.clone(),
            source: e.into(),
        })?;
        fs::write(&path, json).map_err(|source| AppError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), models = snapshot.len(), "saved snapshot");
        Ok((hash, path))
    }

    pub(crate) fn load(&self, hash: &str) -> Result<Snapshot, AppError> {
        let path = self.path_for(hash);
        if !path.is_file() {
            return Err(AppError::SnapshotNotFound {
                hash: hash.to_string(),
                dir: self.dir.clone(),
            });
        }
        Self::load_path(&path)
    }

    fn load_path(path: &Path) -> Result<Snapshot, AppError> {
        let content = fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Snapshot::from_json(&content, || file_mtime(path).unwrap_or(0)).map_err(|source| {
            AppError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Hashes of every snapshot file, in no particular order
    pub(crate) fn hashes(&self) -> Result<Vec<String>, AppError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let pattern = format!(
            "{}/{SNAPSHOT_PREFIX}*.{SNAPSHOT_EXT}",
            glob::Pattern::escape(&self.dir.to_string_lossy())
        );
        let hashes = glob::glob(&pattern)?
            .filter_map(Result::ok)
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?;
                stem.strip_prefix(SNAPSHOT_PREFIX).map(str::to_string)
            })
            .filter(|hash| !hash.is_empty())
            .collect();
        Ok(hashes)
    }

    /// Every readable snapshot, oldest first. Unreadable files are skipped.
    pub(crate) fn list(&self) -> Result<Vec<SnapshotEntry>, AppError> {
        let mut entries = Vec::new();
        for hash in self.hashes()? {
            let path = self.path_for(&hash);
            match Self::load_path(&path) {
                Ok(snapshot) => entries.push(SnapshotEntry {
                    hash,
                    path,
                    timestamp: snapshot.timestamp(),
                    models: snapshot.len(),
                }),
                Err(e) => tracing::warn!("skipping {}: {e}", path.display()),
            }
        }
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.hash.cmp(&b.hash)));
        Ok(entries)
    }

    /// Most recently captured snapshot
    pub(crate) fn latest(&self) -> Result<Option<SnapshotEntry>, AppError> {
        Ok(self.list()?.pop())
    }

    /// Expand a unique hash prefix to the full hash
    pub(crate) fn resolve(&self, prefix: &str) -> Result<String, AppError> {
        if self.contains(prefix) {
            return Ok(prefix.to_string());
        }

        let mut matches: Vec<String> = self
            .hashes()?
            .into_iter()
            .filter(|hash| !prefix.is_empty() && hash.starts_with(prefix))
            .collect();
        match matches.len() {
            0 => Err(AppError::SnapshotNotFound {
                hash: prefix.to_string(),
                dir: self.dir.clone(),
            }),
            1 => Ok(matches.remove(0)),
            count => Err(AppError::AmbiguousHash {
                prefix: prefix.to_string(),
                count,
            }),
        }
    }
}
