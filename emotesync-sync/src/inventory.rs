//! Season folder scanner.
//!
//! Turns `<asset_folder>/<season>/` into an ordered list of scan entries.
//! Files whose extension is not a supported image type are ignored; a file
//! that matches but cannot be read becomes an `Err` entry in place, and the
//! scan continues with the next file.
//!
//! # Ordering
//!
//! [`ScanOrder::Storage`] keeps whatever order the filesystem returns from
//! `read_dir`, which is platform dependent. When two files map to the same
//! emote name (`a.png`, `a.gif`) the later entry wins. Use
//! [`ScanOrder::ByFileName`] when a deterministic order is required.

use std::ffi::OsString;
use std::path::Path;

use emotesync_core::EmoteAsset;

use crate::error::{AssetReadError, SyncError};

/// Extensions accepted as emote images (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// One scanned file: a loaded asset, or the read failure for that file.
pub type ScanEntry = Result<EmoteAsset, AssetReadError>;

/// Enumeration order of the season folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// Order returned by the underlying storage (unspecified).
    #[default]
    Storage,
    /// Sorted by file name.
    ByFileName,
}

/// Emote name for `path`, or `None` if its extension is not supported or
/// its stem is not valid UTF-8.
pub fn emote_name(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let stem = path.file_stem()?;
    let Some(stem) = stem.to_str() else {
        tracing::warn!("skipping {}: file name is not valid UTF-8", path.display());
        return None;
    };
    (!stem.is_empty()).then(|| stem.to_string())
}

/// Scan `folder` for emote images.
///
/// Only failure to enumerate `folder` itself is fatal.
pub fn scan(folder: &Path, order: ScanOrder) -> Result<Vec<ScanEntry>, SyncError> {
    let read_dir = std::fs::read_dir(folder).map_err(|source| SyncError::AssetFolder {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut entries: Vec<(OsString, std::path::PathBuf)> = Vec::new();
    for entry in read_dir {
        match entry {
            Ok(e) => entries.push((e.file_name(), e.path())),
            Err(err) => tracing::warn!("skipping unreadable entry in {}: {err}", folder.display()),
        }
    }
    if order == ScanOrder::ByFileName {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
    }

    let mut scanned = Vec::new();
    for (_, path) in entries {
        let Some(name) = emote_name(&path) else {
            tracing::debug!("ignored: {}", path.display());
            continue;
        };
        if path.is_dir() {
            tracing::debug!("ignored directory: {}", path.display());
            continue;
        }
        match std::fs::read(&path) {
            Ok(bytes) => scanned.push(Ok(EmoteAsset {
                name,
                bytes,
                source_path: path,
            })),
            Err(source) => {
                tracing::warn!("error reading {}: {source}", path.display());
                scanned.push(Err(AssetReadError { name, path, source }));
            }
        }
    }
    Ok(scanned)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
