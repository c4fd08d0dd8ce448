//! Hygiene: source-level checks on the scene crate.
//!
//! Scans `scene/src/` (test files excluded) for patterns the crate never
//! allows in production code. Every budget is zero.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

/// Pattern, human label.
const BANNED: &[(&str, &str)] = &[
    (".unwrap()", "unwrap"),
    (".expect(", "expect"),
    ("panic!(", "panic!"),
    ("unreachable!(", "unreachable!"),
    ("todo!(", "todo!"),
    ("unimplemented!(", "unimplemented!"),
    ("let _ =", "silent discard"),
    (".ok()", "error-dropping .ok()"),
    ("#[allow(dead_code)]", "allow(dead_code)"),
    ("dbg!(", "dbg!"),
    ("println!(", "println!"),
];

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(|(n, line)| format!("  {}:{}: {}", file.path, n + 1, line.trim()))
        })
        .collect()
}

#[test]
fn sources_found() {
    assert!(!source_files().is_empty(), "run from the scene crate root");
}

#[test]
fn banned_patterns_absent() {
    let files = source_files();
    let mut report = Vec::new();
    for (pattern, label) in BANNED {
        let found = hits(&files, pattern);
        if !found.is_empty() {
            report.push(format!("{label} ({} found):\n{}", found.len(), found.join("\n")));
        }
    }
    assert!(report.is_empty(), "hygiene violations:\n{}", report.join("\n"));
}

#[test]
fn every_module_has_its_test_file() {
    let files = source_files();
    for file in &files {
        let Some(attr) = file.content.lines().find(|l| l.starts_with("#[path = \"")) else {
            continue;
        };
        let name = attr.trim_start_matches("#[path = \"").trim_end_matches("\"]");
        let test_path = Path::new("src").join(name);
        assert!(test_path.exists(), "{} declares missing test file {name}", file.path);
    }
}
