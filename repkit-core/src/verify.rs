use crate::hash;
use crate::manifest::{Manifest, ResolvedEntry};
use crate::progress::ProgressSink;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryStatus {
    Ok,
    Missing,
    Mismatch,
}

/// Aggregate outcome of one verification pass. Ephemeral, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub total_files: u64,
    pub total_bytes: u64,
    pub failed: Vec<String>,
    pub failed_bytes: u64,
}

impl Report {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Classify one resolved entry against the live filesystem. Missing files are
/// never hashed; a file that cannot be read to completion counts as a
/// mismatch, same as a wrong digest.
pub fn classify(entry: &ResolvedEntry) -> EntryStatus {
    if !entry.abs_path.exists() {
        return EntryStatus::Missing;
    }
    match hash::md5_file(&entry.abs_path) {
        Ok(digest) if digest == entry.md5_hex => EntryStatus::Ok,
        _ => EntryStatus::Mismatch,
    }
}

/// Check every entry exactly once, in manifest order, reporting progress
/// after each one. Read-only over the filesystem; idempotent against an
/// unchanged installation.
pub fn verify_resolved(entries: &[ResolvedEntry], progress: &dyn ProgressSink) -> Report {
    let total = entries.len();
    let mut report = Report { total_files: total as u64, ..Default::default() };
    for (i, entry) in entries.iter().enumerate() {
        report.total_bytes += entry.size;
        if classify(entry) != EntryStatus::Ok {
            report.failed.push(entry.rel_path.clone());
            report.failed_bytes += entry.size;
        }
        progress.update(i + 1, total, &entry.rel_path);
    }
    report
}

/// Resolve against `install_root` and verify in one step.
pub fn verify(manifest: &Manifest, install_root: &Path, progress: &dyn ProgressSink) -> Report {
    verify_resolved(&manifest.resolve(install_root), progress)
}
