use crate::Result;
use nwbpack_types::Fingerprint;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

/// Compute the content fingerprint of a session directory.
///
/// SHA-256 over the sorted (relative path, size, mtime seconds) of every
/// regular file under `dir`. Captures the same staleness signals an index
/// would track per file, without reading file contents — raw imaging data
/// runs to tens of gigabytes per session.
pub fn fingerprint_dir(dir: &Path) -> Result<Fingerprint> {
    let mut entries: Vec<(String, u64, u64)> = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .into_owned();

        let metadata = entry.metadata()?;
        let mtime_secs = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        entries.push((rel, metadata.len(), mtime_secs));
    }

    // Filesystem enumeration order is not stable; the digest must be.
    entries.sort();

    let mut hasher = Sha256::new();
    for (rel, size, mtime) in &entries {
        hasher.update(rel.as_bytes());
        hasher.update(b"\0");
        hasher.update(size.to_le_bytes());
        hasher.update(mtime.to_le_bytes());
    }

    Ok(Fingerprint::new(format!("{:x}", hasher.finalize())))
}
