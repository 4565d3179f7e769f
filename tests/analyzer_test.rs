// Integration tests for the dependency analyzer, driven against real
// file trees in temporary directories.

use luapack::analyzer::{DependencyAnalyzer, StaticDiscovery};
use luapack::error::LuapackError;
use luapack::models::AnalysisReport;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, body).unwrap();
    path
}

fn analyzer(max_deps: usize) -> DependencyAnalyzer {
    DependencyAnalyzer::new(max_deps).with_discovery(Box::new(StaticDiscovery::unavailable()))
}

fn analyze(entry: &Path, max_deps: usize) -> Result<AnalysisReport, LuapackError> {
    analyzer(max_deps).analyze(entry)
}

#[test]
fn test_script_without_requires_has_empty_manifest() {
    let dir = tempdir().unwrap();
    let entry = write_script(&dir, "main.lua", "print('standalone')\n");

    let report = analyze(&entry, 36).unwrap();
    assert!(report.scripts.is_empty());
    assert!(report.libraries.is_empty());
}

#[test]
fn test_diamond_dependency_appears_once_before_dependents() {
    let dir = tempdir().unwrap();
    let entry = write_script(&dir, "main.lua", "require 'a'\nrequire 'b'\n");
    write_script(&dir, "a.lua", "local c = require 'c'\nreturn c\n");
    write_script(&dir, "b.lua", "local c = require 'c'\nreturn c\n");
    write_script(&dir, "c.lua", "return { shared = true }\n");

    let report = analyze(&entry, 36).unwrap();

    let position = |name: &str| {
        report
            .scripts
            .iter()
            .position(|p| p.ends_with(name))
            .unwrap_or_else(|| panic!("{name} missing from manifest"))
    };

    assert_eq!(report.scripts.len(), 3);
    assert_eq!(
        report.scripts.iter().filter(|p| p.ends_with("c.lua")).count(),
        1
    );
    assert!(position("c.lua") < position("a.lua"));
    assert!(position("c.lua") < position("b.lua"));
}

#[test]
fn test_self_require_reports_two_element_chain() {
    let dir = tempdir().unwrap();
    let entry = write_script(&dir, "selfish.lua", "require 'selfish'\n");

    match analyze(&entry, 36) {
        Err(LuapackError::CircularDependency { chain, .. }) => {
            assert_eq!(chain.len(), 2);
            assert!(chain[0].ends_with("selfish.lua"));
            assert_eq!(chain[0], chain[1]);
        }
        other => panic!("expected CircularDependency, got {other:?}"),
    }
}

#[test]
fn test_cycle_chain_lists_files_in_require_order() {
    let dir = tempdir().unwrap();
    let a = write_script(&dir, "a.lua", "require 'b'\n");
    write_script(&dir, "b.lua", "require 'c'\n");
    write_script(&dir, "c.lua", "require 'a'\n");

    match analyze(&a, 36) {
        Err(LuapackError::CircularDependency { chain, .. }) => {
            let names: Vec<_> = chain
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
                .collect();
            assert_eq!(names, vec!["a.lua", "b.lua", "c.lua", "a.lua"]);
        }
        other => panic!("expected CircularDependency, got {other:?}"),
    }
}

#[test]
fn test_dynamic_requires_are_fatal() {
    let dir = tempdir().unwrap();
    let by_variable = write_script(&dir, "var.lua", "local m = require(target)\n");
    assert!(matches!(
        analyze(&by_variable, 36),
        Err(LuapackError::DynamicRequire { .. })
    ));

    let by_concat = write_script(&dir, "concat.lua", "local m = require('a' .. 'b')\n");
    assert!(matches!(
        analyze(&by_concat, 36),
        Err(LuapackError::DynamicRequire { .. })
    ));
}

#[test]
fn test_require_text_in_comments_and_strings_is_inert() {
    let dir = tempdir().unwrap();
    let entry = write_script(
        &dir,
        "main.lua",
        "-- require 'ghost'\n--[[ require 'ghost' ]]\nlocal s = \"require 'ghost'\"\nreturn s\n",
    );

    let report = analyze(&entry, 36).unwrap();
    assert!(report.scripts.is_empty());
    assert!(report.libraries.is_empty());
}

#[test]
fn test_dependency_limit_fires_before_reading_next_file() {
    let dir = tempdir().unwrap();
    let entry = write_script(&dir, "main.lua", "require 'first'\n");
    write_script(&dir, "first.lua", "require 'second'\n");
    // second.lua holds a dynamic require; reaching it would raise
    // DynamicRequire instead of the limit error
    write_script(&dir, "second.lua", "require(anything)\n");

    match analyze(&entry, 1) {
        Err(LuapackError::DependencyLimitExceeded { count, limit, .. }) => {
            assert_eq!(count, 2);
            assert_eq!(limit, 1);
        }
        other => panic!("expected DependencyLimitExceeded, got {other:?}"),
    }
}

#[test]
fn test_native_artifacts_go_to_libraries_only() {
    let dir = tempdir().unwrap();
    let entry = write_script(&dir, "main.lua", "require 'fast'\nrequire 'plain'\n");
    write_script(&dir, "plain.lua", "return {}\n");
    fs::write(dir.path().join("fast.so"), b"\x7fELF").unwrap();

    // a limit of 1 proves the native artifact never counts as a dependency
    let report = analyze(&entry, 1).unwrap();

    assert_eq!(report.scripts.len(), 1);
    assert!(report.scripts[0].ends_with("plain.lua"));
    assert_eq!(report.libraries.len(), 1);
    assert!(report.libraries[0].ends_with("fast.so"));
    assert!(!report.scripts.iter().any(|p| p.ends_with("fast.so")));
}

#[test]
fn test_relative_and_dotted_references_combine() {
    let dir = tempdir().unwrap();
    let entry = write_script(
        &dir,
        "main.lua",
        "require './local/helper'\nrequire 'net.http'\n",
    );
    write_script(&dir, "local/helper.lua", "return {}\n");
    write_script(&dir, "src/net/http.lua", "require 'net.url'\n");
    write_script(&dir, "src/net/url.lua", "return {}\n");

    let report = analyze(&entry, 36).unwrap();
    let names: Vec<_> = report
        .scripts
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["helper.lua", "url.lua", "http.lua"]);
}

#[test]
fn test_guarded_requires_are_hard_dependencies() {
    let dir = tempdir().unwrap();
    let entry = write_script(
        &dir,
        "main.lua",
        "local ok, opt = pcall(require, 'optional')\n",
    );
    write_script(&dir, "optional.lua", "return {}\n");

    let report = analyze(&entry, 36).unwrap();
    assert_eq!(report.scripts.len(), 1);
    assert!(report.scripts[0].ends_with("optional.lua"));
}

#[test]
fn test_unresolved_reference_is_fatal_and_lists_locations() {
    let dir = tempdir().unwrap();
    let entry = write_script(&dir, "main.lua", "require 'no.such.module'\n");

    match analyze(&entry, 36) {
        Err(LuapackError::ModuleNotFound { reference, requester, searched, .. }) => {
            assert_eq!(reference, "no.such.module");
            assert!(requester.ends_with("main.lua"));
            assert!(!searched.is_empty());
        }
        other => panic!("expected ModuleNotFound, got {other:?}"),
    }
}

#[test]
fn test_missing_entry_is_fatal() {
    let dir = tempdir().unwrap();
    let ghost = dir.path().join("ghost.lua");

    assert!(matches!(
        analyze(&ghost, 36),
        Err(LuapackError::MissingFile { .. })
    ));
}

#[test]
fn test_repeated_analysis_is_deterministic() {
    let dir = tempdir().unwrap();
    let entry = write_script(
        &dir,
        "main.lua",
        "require 'x'\nrequire 'y'\nrequire 'z'\n",
    );
    write_script(&dir, "x.lua", "require 'shared'\n");
    write_script(&dir, "y.lua", "require 'shared'\n");
    write_script(&dir, "z.lua", "return {}\n");
    write_script(&dir, "shared.lua", "return {}\n");
    fs::write(dir.path().join("nat.so"), b"").unwrap();
    write_script(&dir, "w.lua", "require 'nat'\n");

    let first = analyze(&entry, 36).unwrap();
    let second = analyze(&entry, 36).unwrap();

    assert_eq!(first.scripts, second.scripts);
    assert_eq!(first.libraries, second.libraries);
}

#[test]
fn test_analysis_bounds_work_not_manifest_size() {
    // 3 dependencies under a cap of 2: the third increment aborts the run
    let dir = tempdir().unwrap();
    let entry = write_script(&dir, "main.lua", "require 'd1'\nrequire 'd2'\nrequire 'd3'\n");
    write_script(&dir, "d1.lua", "return 1\n");
    write_script(&dir, "d2.lua", "return 2\n");
    write_script(&dir, "d3.lua", "return 3\n");

    match analyze(&entry, 2) {
        Err(LuapackError::DependencyLimitExceeded { count, limit, .. }) => {
            assert_eq!(count, 3);
            assert_eq!(limit, 2);
        }
        other => panic!("expected DependencyLimitExceeded, got {other:?}"),
    }
}
