use crate::locale::LocaleProfile;
use crate::manifest::Manifest;
use crate::pathenc::{self, PathCheck};
use crate::progress::ProgressSink;
use crate::repair::{self, ConfigVariant, FONT_FILE};
use crate::verify::{self, Report};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// One worker per user-initiated operation. Re-invoking while a worker is in
/// flight yields `Busy` instead of a second thread. No cancellation; a
/// started worker runs to completion.
pub struct Session {
    busy: Arc<AtomicBool>,
}

pub enum Spawn<T> {
    Busy,
    Started(JoinHandle<T>),
}

impl Session {
    pub fn new() -> Self {
        Self { busy: Arc::new(AtomicBool::new(false)) }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn run<T, F>(&self, op: F) -> Spawn<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Spawn::Busy;
        }
        let busy = self.busy.clone();
        Spawn::Started(std::thread::spawn(move || {
            let out = op();
            busy.store(false, Ordering::SeqCst);
            out
        }))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the aggregate sequence needs; owned so it can move into a
/// worker thread.
#[derive(Clone, Debug)]
pub struct CheckAll {
    pub manifest: Manifest,
    pub install_root: PathBuf,
    pub repair_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub profile: LocaleProfile,
}

/// Outcome of one step of the aggregate sequence.
#[derive(Clone, Debug)]
pub enum StepOutcome {
    Integrity(Report),
    Font { installed: bool },
    Config { variant: ConfigVariant, compatible: bool, applied: bool },
    PathCheck(PathCheck),
    Failed { step: &'static str, error: String },
}

/// Run the four checks strictly in sequence. A failed step is reported and
/// the remaining steps still run; UI feedback stays ordered and unambiguous.
pub fn check_all(cfg: &CheckAll, progress: &dyn ProgressSink) -> Vec<StepOutcome> {
    let mut out = Vec::with_capacity(4);

    progress.update(0, 4, "integrity");
    out.push(StepOutcome::Integrity(verify::verify(
        &cfg.manifest,
        &cfg.install_root,
        progress,
    )));

    progress.update(1, 4, "font");
    out.push(match repair::font_installed(&cfg.fonts_dir, FONT_FILE) {
        Ok(installed) => StepOutcome::Font { installed },
        Err(e) => StepOutcome::Failed { step: "font", error: format!("{e:#}") },
    });

    progress.update(2, 4, "config");
    let variant = repair::variant_for(cfg.profile.class());
    out.push(if repair::config_compatible(&cfg.install_root, variant) {
        StepOutcome::Config { variant, compatible: true, applied: false }
    } else {
        // The copy happens strictly after the variant decision.
        match repair::apply_variant(&cfg.repair_dir, &cfg.install_root, variant) {
            Ok(()) => StepOutcome::Config { variant, compatible: false, applied: true },
            Err(e) => StepOutcome::Failed { step: "config", error: format!("{e:#}") },
        }
    });

    progress.update(3, 4, "path");
    // The engine sees the full path; a relative root would hide a bad
    // character in the absolute prefix.
    let abs_root = absolute_root(&cfg.install_root);
    out.push(match pathenc::encoding_for_codepage(cfg.profile.codepage) {
        Some(enc) => StepOutcome::PathCheck(pathenc::check_path(&abs_root, enc)),
        None => StepOutcome::Failed {
            step: "path",
            error: format!("unknown codepage {}", cfg.profile.codepage),
        },
    });

    progress.update(4, 4, "done");
    out
}

/// Resolve a relative install root against the current directory, falling
/// back to the path as given if the current directory is unavailable.
fn absolute_root(root: &Path) -> PathBuf {
    if root.is_absolute() {
        return root.to_path_buf();
    }
    std::env::current_dir().map(|cwd| cwd.join(root)).unwrap_or_else(|_| root.to_path_buf())
}
