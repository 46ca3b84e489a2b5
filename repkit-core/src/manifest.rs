use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Well-known name of the persisted manifest blob, resolved relative to the
/// program's own installation rather than the target root.
pub const MANIFEST_FILE: &str = "file_hashes.bin";

/// One file of the reference installation. `rel_path` always uses `/`
/// separators and never escapes the logical root.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub rel_path: String,
    pub md5_hex: String,
    pub size: u64,
}

/// Insertion-ordered reference list. Uniqueness of `rel_path` is not enforced;
/// generation never produces duplicates because the tree walk visits each
/// file once.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

/// An entry joined onto a concrete installation root. No existence check is
/// performed at resolution time; that is the verifier's job.
#[derive(Clone, Debug)]
pub struct ResolvedEntry {
    pub abs_path: PathBuf,
    pub rel_path: String,
    pub md5_hex: String,
    pub size: u64,
}

impl Manifest {
    /// Persist the entry list as a single blob: an ordered sequence of
    /// (rel_path, md5_hex, size) records, no version field.
    pub fn save(&self, path: &Path) -> Result<()> {
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(f);
        bincode::serialize_into(&mut w, &self.entries).context("serialize manifest")?;
        // Flush explicitly; an error swallowed in Drop would leave a
        // truncated blob behind an Ok result.
        w.flush().with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Deserialize a persisted manifest. Fails hard on a missing or corrupt
    /// blob and on any entry whose rel_path could escape the root.
    pub fn load(path: &Path) -> Result<Manifest> {
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let entries: Vec<ManifestEntry> =
            bincode::deserialize_from(BufReader::new(f)).context("decode manifest")?;
        for e in &entries {
            validate_rel_path(&e.rel_path)?;
        }
        Ok(Manifest { entries })
    }

    /// Lenient variant preserving the source behavior: a load failure is a
    /// single diagnostic and an empty manifest, so verification degenerates to
    /// "nothing to check" instead of aborting. The flag distinguishes a
    /// failed load from a manifest that is genuinely empty.
    pub fn load_or_empty(path: &Path) -> (Manifest, bool) {
        match Self::load(path) {
            Ok(m) => (m, true),
            Err(e) => {
                warn!("could not load manifest {}: {:#}", path.display(), e);
                (Manifest::default(), false)
            }
        }
    }

    /// Join every rel_path onto `install_root`.
    pub fn resolve(&self, install_root: &Path) -> Vec<ResolvedEntry> {
        self.entries
            .iter()
            .map(|e| ResolvedEntry {
                abs_path: install_root.join(&e.rel_path),
                rel_path: e.rel_path.clone(),
                md5_hex: e.md5_hex.clone(),
                size: e.size,
            })
            .collect()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }
}

/// Reject rel_paths that are absolute or contain parent traversal.
fn validate_rel_path(rel: &str) -> Result<()> {
    let p = Path::new(rel);
    if p.is_absolute() {
        bail!("absolute paths are not allowed in a manifest: {:?}", rel);
    }
    for comp in p.components() {
        if matches!(comp, Component::ParentDir | Component::Prefix(_) | Component::RootDir) {
            bail!("parent traversal not allowed in a manifest: {:?}", rel);
        }
    }
    Ok(())
}
