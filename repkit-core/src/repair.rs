use crate::hash;
use crate::locale::CompatibilityClass;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Engine configuration file replaced by a repair, in the installation root.
pub const CONFIG_TARGET: &str = "ipl._bp";

/// Font the engine needs for Cyrillic text rendering.
pub const FONT_FILE: &str = "YasuSakuuta.ttf";

/// Interchangeable variants of the engine configuration artifact shipped in
/// the repair directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigVariant {
    Russian,
    Japanese,
    Universal,
}

impl ConfigVariant {
    /// File name of this variant inside the repair directory.
    pub fn artifact(self) -> &'static str {
        match self {
            ConfigVariant::Russian => "ipl_ru._bp",
            ConfigVariant::Japanese => "ipl_jp._bp",
            ConfigVariant::Universal => "ipl._bp",
        }
    }

    /// Known-good digest of the installed target once this variant is in
    /// place. The universal artifact carries no pinned digest.
    pub fn known_md5(self) -> Option<&'static str> {
        match self {
            ConfigVariant::Russian => Some("3190ae2bf6ff7ec09869cebb9bd102b8"),
            ConfigVariant::Japanese => Some("31888256646e301b74f8d7ce744eb0b8"),
            ConfigVariant::Universal => None,
        }
    }
}

/// Deterministic variant selection from the locale class.
pub fn variant_for(class: CompatibilityClass) -> ConfigVariant {
    match class {
        CompatibilityClass::RussianFamily => ConfigVariant::Russian,
        CompatibilityClass::Japanese => ConfigVariant::Japanese,
        CompatibilityClass::Unsupported => ConfigVariant::Universal,
    }
}

/// Whether the installed config already matches the variant's known digest.
/// A missing or unreadable target is simply "not compatible"; variants with
/// no pinned digest are never already compatible.
pub fn config_compatible(install_root: &Path, variant: ConfigVariant) -> bool {
    let Some(expected) = variant.known_md5() else {
        return false;
    };
    let target = install_root.join(CONFIG_TARGET);
    match hash::md5_file(&target) {
        Ok(digest) => digest == expected,
        Err(e) => {
            debug!("could not hash {}: {:#}", target.display(), e);
            false
        }
    }
}

/// Copy the variant artifact over the installed target. Single short
/// copy-with-overwrite; callers report a failure without aborting an
/// aggregate sequence.
pub fn apply_variant(repair_dir: &Path, install_root: &Path, variant: ConfigVariant) -> Result<()> {
    let src = repair_dir.join(variant.artifact());
    let dst = install_root.join(CONFIG_TARGET);
    std::fs::copy(&src, &dst)
        .with_context(|| format!("copy {} -> {}", src.display(), dst.display()))?;
    Ok(())
}

/// Case-insensitive presence check for a font file in the system fonts
/// directory.
pub fn font_installed(fonts_dir: &Path, font_file: &str) -> Result<bool> {
    let wanted = font_file.to_lowercase();
    for ent in std::fs::read_dir(fonts_dir)
        .with_context(|| format!("read dir {}", fonts_dir.display()))?
    {
        let ent = ent?;
        if ent.file_name().to_string_lossy().to_lowercase() == wanted {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Copy the font file into the fonts directory. OS font-cache and registry
/// registration belong to the platform layer, not here.
pub fn install_font_file(repair_dir: &Path, fonts_dir: &Path, font_file: &str) -> Result<()> {
    let src = repair_dir.join(font_file);
    let dst = fonts_dir.join(font_file);
    std::fs::copy(&src, &dst)
        .with_context(|| format!("copy {} -> {}", src.display(), dst.display()))?;
    Ok(())
}
