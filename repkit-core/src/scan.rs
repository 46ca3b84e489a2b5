use crate::hash;
use crate::manifest::{Manifest, ManifestEntry};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result of one reference-tree scan. Files that could not be hashed are
/// omitted from the manifest and listed here with the failure reason.
#[derive(Debug)]
pub struct ScanOutcome {
    pub manifest: Manifest,
    pub skipped: Vec<(String, String)>,
}

/// Walk `root` recursively (regular files only; directories and symlinks are
/// not entries), excluding exactly the one well-known self-referential file
/// name. Hashing runs in parallel; entries keep traversal order.
pub fn scan(root: &Path, exclude_name: &str) -> Result<ScanOutcome> {
    let mut files: Vec<PathBuf> = Vec::new();
    for ent in walkdir::WalkDir::new(root).min_depth(1) {
        let ent = ent?;
        if !ent.file_type().is_file() {
            continue;
        }
        if ent.file_name() == exclude_name {
            continue;
        }
        files.push(ent.into_path());
    }

    let hashed: Vec<Result<ManifestEntry>> = files
        .par_iter()
        .map(|path| {
            let size = std::fs::metadata(path)
                .with_context(|| format!("stat {}", path.display()))?
                .len();
            let md5_hex = hash::md5_file(path)?;
            Ok(ManifestEntry { rel_path: rel_path_of(path, root), md5_hex, size })
        })
        .collect();

    let mut manifest = Manifest::default();
    let mut skipped = Vec::new();
    for (path, res) in files.iter().zip(hashed) {
        match res {
            Ok(entry) => manifest.entries.push(entry),
            Err(e) => {
                let rel = rel_path_of(path, root);
                warn!("skipping {}: {:#}", rel, e);
                skipped.push((rel, format!("{e:#}")));
            }
        }
    }
    Ok(ScanOutcome { manifest, skipped })
}

/// Root-relative path with `/` separators, portable across platforms.
fn rel_path_of(path: &Path, root: &Path) -> String {
    let rp = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    rp.to_string_lossy().replace('\\', "/")
}
