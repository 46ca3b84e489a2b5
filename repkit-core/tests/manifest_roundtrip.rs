use repkit_core::hash;
use repkit_core::manifest::{Manifest, ManifestEntry, MANIFEST_FILE};
use repkit_core::scan;
use std::fs;

#[test]
fn scan_save_load_roundtrip() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("install");
    fs::create_dir_all(root.join("data/sub")).unwrap();
    fs::write(root.join("game.exe"), b"engine bytes").unwrap();
    fs::write(root.join("data/arc.dat"), vec![7u8; 4096]).unwrap();
    fs::write(root.join("data/sub/voice.bin"), b"").unwrap();

    let outcome = scan::scan(&root, MANIFEST_FILE).unwrap();
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.manifest.entries.len(), 3);

    // Relative paths use '/' and known digests match a pre-computed digest of
    // the exact bytes.
    let by_path = |rel: &str| -> &ManifestEntry {
        outcome
            .manifest
            .entries
            .iter()
            .find(|e| e.rel_path == rel)
            .unwrap_or_else(|| panic!("missing entry {rel}"))
    };
    let exe = by_path("game.exe");
    assert_eq!(exe.md5_hex, hash::md5_bytes(b"engine bytes"));
    assert_eq!(exe.size, 12);
    let arc = by_path("data/arc.dat");
    assert_eq!(arc.md5_hex, hash::md5_bytes(&vec![7u8; 4096]));
    assert_eq!(arc.size, 4096);
    assert_eq!(by_path("data/sub/voice.bin").size, 0);

    let blob = td.path().join(MANIFEST_FILE);
    outcome.manifest.save(&blob).unwrap();
    let loaded = Manifest::load(&blob).unwrap();
    assert_eq!(loaded, outcome.manifest);
}

#[test]
fn scan_excludes_the_manifest_artifact() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("install");
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("a.txt"), b"a").unwrap();
    fs::write(root.join(MANIFEST_FILE), b"old blob").unwrap();
    // Excluded by name anywhere in the tree, not just at the root.
    fs::write(root.join("nested").join(MANIFEST_FILE), b"stray copy").unwrap();

    let outcome = scan::scan(&root, MANIFEST_FILE).unwrap();
    let paths: Vec<&str> = outcome.manifest.entries.iter().map(|e| e.rel_path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt"]);
}

#[test]
fn load_fails_hard_on_corrupt_blob() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("install");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.txt"), b"abc").unwrap();

    let blob = td.path().join(MANIFEST_FILE);
    scan::scan(&root, MANIFEST_FILE).unwrap().manifest.save(&blob).unwrap();

    // Truncate the blob to half its size.
    let bytes = fs::read(&blob).unwrap();
    fs::write(&blob, &bytes[..bytes.len() / 2]).unwrap();

    assert!(Manifest::load(&blob).is_err());

    // The lenient path degrades to "nothing to check" and flags the failure.
    let (lenient, loaded) = Manifest::load_or_empty(&blob);
    assert!(lenient.entries.is_empty());
    assert!(!loaded);
}

#[test]
fn load_or_empty_on_missing_blob() {
    let td = tempfile::tempdir().unwrap();
    let (m, loaded) = Manifest::load_or_empty(&td.path().join("no_such.bin"));
    assert!(m.entries.is_empty());
    assert!(!loaded);
}

#[test]
fn load_or_empty_tells_an_empty_manifest_from_a_failed_load() {
    let td = tempfile::tempdir().unwrap();
    let blob = td.path().join(MANIFEST_FILE);
    Manifest::default().save(&blob).unwrap();

    let (m, loaded) = Manifest::load_or_empty(&blob);
    assert!(m.entries.is_empty());
    assert!(loaded);
}

#[cfg(target_os = "linux")]
#[test]
fn save_surfaces_write_errors() {
    let m = Manifest {
        entries: vec![ManifestEntry {
            rel_path: "a.txt".to_string(),
            md5_hex: hash::md5_bytes(b"a"),
            size: 1,
        }],
    };
    // /dev/full accepts the open and fails every write with ENOSPC; a save
    // that buffers until Drop would report success here.
    let err = m.save(std::path::Path::new("/dev/full")).expect_err("device is always full");
    assert!(format!("{err:#}").contains("/dev/full"));
}

#[test]
fn load_rejects_escaping_rel_paths() {
    let td = tempfile::tempdir().unwrap();
    let blob = td.path().join(MANIFEST_FILE);
    let evil = Manifest {
        entries: vec![ManifestEntry {
            rel_path: "../outside.txt".to_string(),
            md5_hex: hash::md5_bytes(b"x"),
            size: 1,
        }],
    };
    evil.save(&blob).unwrap();
    let err = Manifest::load(&blob).expect_err("expected traversal rejection");
    assert!(format!("{err:#}").contains("not allowed"));
}

#[test]
fn resolve_joins_onto_install_root() {
    let m = Manifest {
        entries: vec![ManifestEntry {
            rel_path: "data/arc.dat".to_string(),
            md5_hex: hash::md5_bytes(b"x"),
            size: 1,
        }],
    };
    let resolved = m.resolve(std::path::Path::new("/opt/game"));
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].abs_path, std::path::Path::new("/opt/game/data/arc.dat"));
    assert_eq!(resolved[0].rel_path, "data/arc.dat");
}
