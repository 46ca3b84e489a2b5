use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use repkit_core::locale::{self, LocaleProfile};
use repkit_core::localize::Messages;
use repkit_core::manifest::{Manifest, MANIFEST_FILE};
use repkit_core::pathenc::{self, PathCheck};
use repkit_core::progress::Progress;
use repkit_core::repair::{self, ConfigVariant, FONT_FILE};
use repkit_core::scan;
use repkit_core::session::{self, CheckAll, Session, Spawn, StepOutcome};
use repkit_core::verify::{self, Report};

#[derive(Parser)]
#[command(name = "repkit", version, about = "Installation integrity checker and repair toolkit")]
struct Cli {
    /// Message language for human-readable output
    #[arg(long, global = true, default_value = "en")]
    lang: String,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Build the reference manifest from an installation tree
    Scan {
        root: PathBuf,
        #[arg(long, default_value = MANIFEST_FILE)]
        output: PathBuf,
    },
    /// Verify an installation against a manifest
    Verify {
        manifest: PathBuf,
        install_root: PathBuf,
        #[arg(long, default_value_t = false)]
        progress: bool,
        /// Degrade a manifest load failure to "nothing to check"
        #[arg(long, default_value_t = false)]
        lenient: bool,
    },
    /// Classify a system locale and print its profile
    Locale {
        #[arg(long, value_parser = parse_lang_id)]
        lang_id: u16,
        #[arg(long)]
        codepage: u32,
    },
    /// Test whether a path is representable in a codepage
    CheckPath {
        path: PathBuf,
        #[arg(long)]
        codepage: u32,
    },
    /// Select and apply the configuration variant for a locale
    FixConfig {
        install_root: PathBuf,
        #[arg(long)]
        repair_dir: PathBuf,
        #[arg(long, value_parser = parse_lang_id)]
        lang_id: u16,
    },
    /// Check (and optionally install) the required font file
    CheckFont {
        #[arg(long)]
        fonts_dir: PathBuf,
        #[arg(long)]
        repair_dir: Option<PathBuf>,
    },
    /// Run all four checks in sequence
    CheckAll {
        manifest: PathBuf,
        install_root: PathBuf,
        #[arg(long)]
        repair_dir: PathBuf,
        #[arg(long)]
        fonts_dir: PathBuf,
        #[arg(long, value_parser = parse_lang_id)]
        lang_id: u16,
        #[arg(long)]
        codepage: u32,
        #[arg(long, default_value_t = false)]
        progress: bool,
    },
}

fn parse_lang_id(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|_| format!("bad language id: {s}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let msgs = Messages::builtin(&cli.lang);
    match cli.cmd {
        Cmd::Scan { root, output } => cmd_scan(&root, &output)?,
        Cmd::Verify { manifest, install_root, progress, lenient } => {
            cmd_verify(&msgs, &manifest, &install_root, progress, lenient)?
        }
        Cmd::Locale { lang_id, codepage } => cmd_locale(lang_id, codepage),
        Cmd::CheckPath { path, codepage } => cmd_check_path(&msgs, &path, codepage)?,
        Cmd::FixConfig { install_root, repair_dir, lang_id } => {
            cmd_fix_config(&install_root, &repair_dir, lang_id)?
        }
        Cmd::CheckFont { fonts_dir, repair_dir } => {
            cmd_check_font(&msgs, &fonts_dir, repair_dir.as_deref())?
        }
        Cmd::CheckAll {
            manifest,
            install_root,
            repair_dir,
            fonts_dir,
            lang_id,
            codepage,
            progress,
        } => cmd_check_all(
            &msgs,
            &manifest,
            &install_root,
            &repair_dir,
            &fonts_dir,
            lang_id,
            codepage,
            progress,
        )?,
    }
    Ok(())
}

fn cmd_scan(root: &Path, output: &Path) -> Result<()> {
    // The manifest artifact itself must never become an entry.
    let exclude = output
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(MANIFEST_FILE)
        .to_string();
    let outcome = scan::scan(root, &exclude)?;
    outcome.manifest.save(output)?;
    for (rel, reason) in &outcome.skipped {
        eprintln!("skipped {rel}: {reason}");
    }
    eprintln!(
        "Indexed {} files ({} bytes) -> {}",
        outcome.manifest.entries.len(),
        outcome.manifest.total_bytes(),
        output.display()
    );
    Ok(())
}

fn cmd_verify(
    msgs: &Messages,
    manifest_path: &Path,
    install_root: &Path,
    progress: bool,
    lenient: bool,
) -> Result<()> {
    let manifest = if lenient {
        load_lenient(msgs, manifest_path)
    } else {
        Manifest::load(manifest_path)?
    };

    let prog = Progress::new(progress);
    prog.start();
    let report = verify::verify(&manifest, install_root, &prog);
    prog.stop();

    print_report(msgs, &report);
    Ok(())
}

/// A failed load is diagnosed as such; an empty manifest that loaded fine
/// is not an error, just nothing to check.
fn load_lenient(msgs: &Messages, path: &Path) -> Manifest {
    let (manifest, loaded) = Manifest::load_or_empty(path);
    if !loaded {
        eprintln!("{}", msgs.msg("load-failed", &[]));
    }
    manifest
}

fn print_report(msgs: &Messages, report: &Report) {
    let total = report.total_files.to_string();
    if report.all_ok() {
        println!("{}", msgs.msg("integrity-ok", &[("total", &total)]));
    } else {
        let failed = report.failed.len().to_string();
        let bytes = report.failed_bytes.to_string();
        println!(
            "{}",
            msgs.msg(
                "integrity-failed",
                &[("failed", &failed), ("total", &total), ("bytes", &bytes)]
            )
        );
        for rel in &report.failed {
            println!("  {rel}");
        }
    }
}

fn cmd_locale(lang_id: u16, codepage: u32) {
    let profile = LocaleProfile::new(lang_id, codepage);
    println!("lang id:  0x{:04X} ({})", profile.lang_id, profile.display_name());
    println!("primary:  0x{:04X}", profile.primary);
    println!("class:    {:?}", profile.class());
    println!("codepage: {} ({})", profile.codepage, profile.encoding_name);
}

fn cmd_check_path(msgs: &Messages, path: &Path, codepage: u32) -> Result<()> {
    let Some(enc) = pathenc::encoding_for_codepage(codepage) else {
        bail!("{}", msgs.msg("codepage-unknown", &[("codepage", &codepage.to_string())]));
    };
    let encoding_name = format!("cp{codepage}");
    match pathenc::check_path(path, enc) {
        PathCheck::Valid => {
            println!("{}", msgs.msg("path-ok", &[("encoding", &encoding_name)]));
        }
        PathCheck::Invalid(components) => {
            let joined = components.join(", ");
            println!(
                "{}",
                msgs.msg("path-invalid", &[("encoding", &encoding_name), ("components", &joined)])
            );
        }
    }
    Ok(())
}

fn cmd_fix_config(install_root: &Path, repair_dir: &Path, lang_id: u16) -> Result<()> {
    let class = locale::classify(lang_id);
    let msgs = Messages::for_class(class);
    let name = locale::display_name(lang_id);
    let variant = repair::variant_for(class);

    if repair::config_compatible(install_root, variant) {
        println!("{}", msgs.msg("config-ok", &[]));
        return Ok(());
    }
    if variant == ConfigVariant::Universal {
        println!("{}", msgs.msg("locale-unsupported", &[("locale", &name)]));
    } else {
        println!("{}", msgs.msg("config-mismatch", &[("locale", &name)]));
    }
    repair::apply_variant(repair_dir, install_root, variant)?;
    println!("{}", msgs.msg("config-applied", &[("artifact", variant.artifact())]));
    Ok(())
}

fn cmd_check_font(msgs: &Messages, fonts_dir: &Path, repair_dir: Option<&Path>) -> Result<()> {
    if repair::font_installed(fonts_dir, FONT_FILE)? {
        println!("{}", msgs.msg("font-present", &[("font", FONT_FILE)]));
        return Ok(());
    }
    println!("{}", msgs.msg("font-missing", &[("font", FONT_FILE)]));
    if let Some(repair_dir) = repair_dir {
        repair::install_font_file(repair_dir, fonts_dir, FONT_FILE)?;
        println!("{}", msgs.msg("font-installed", &[("font", FONT_FILE)]));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_check_all(
    msgs: &Messages,
    manifest_path: &Path,
    install_root: &Path,
    repair_dir: &Path,
    fonts_dir: &Path,
    lang_id: u16,
    codepage: u32,
    progress: bool,
) -> Result<()> {
    let manifest = load_lenient(msgs, manifest_path);
    let cfg = CheckAll {
        manifest,
        install_root: install_root.to_path_buf(),
        repair_dir: repair_dir.to_path_buf(),
        fonts_dir: fonts_dir.to_path_buf(),
        profile: LocaleProfile::new(lang_id, codepage),
    };
    let encoding_name = cfg.profile.encoding_name.clone();
    let locale_name = cfg.profile.display_name();

    let prog = Progress::new(progress);
    prog.start();
    let session = Session::new();
    let worker_prog = prog.clone();
    let outcomes = match session.run(move || session::check_all(&cfg, &worker_prog)) {
        Spawn::Busy => bail!("{}", msgs.msg("busy", &[])),
        Spawn::Started(handle) => handle.join().map_err(|_| anyhow!("worker panicked"))?,
    };
    prog.stop();

    for outcome in outcomes {
        match outcome {
            StepOutcome::Integrity(report) => print_report(msgs, &report),
            StepOutcome::Font { installed: true } => {
                println!("{}", msgs.msg("font-present", &[("font", FONT_FILE)]));
            }
            StepOutcome::Font { installed: false } => {
                println!("{}", msgs.msg("font-missing", &[("font", FONT_FILE)]));
            }
            StepOutcome::Config { compatible: true, .. } => {
                println!("{}", msgs.msg("config-ok", &[]));
            }
            StepOutcome::Config { variant, applied, .. } => {
                if variant == ConfigVariant::Universal {
                    println!("{}", msgs.msg("locale-unsupported", &[("locale", &locale_name)]));
                } else {
                    println!("{}", msgs.msg("config-mismatch", &[("locale", &locale_name)]));
                }
                if applied {
                    println!(
                        "{}",
                        msgs.msg("config-applied", &[("artifact", variant.artifact())])
                    );
                }
            }
            StepOutcome::PathCheck(PathCheck::Valid) => {
                println!("{}", msgs.msg("path-ok", &[("encoding", &encoding_name)]));
            }
            StepOutcome::PathCheck(PathCheck::Invalid(components)) => {
                let joined = components.join(", ");
                println!(
                    "{}",
                    msgs.msg(
                        "path-invalid",
                        &[("encoding", &encoding_name), ("components", &joined)]
                    )
                );
            }
            StepOutcome::Failed { step, error } => {
                eprintln!("{step}: {error}");
            }
        }
    }
    Ok(())
}
