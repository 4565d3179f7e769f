//! Module path resolution
//!
//! Maps one textual module reference to a concrete filesystem classification:
//! a runtime builtin, a Lua source file, or a precompiled native artifact.
//!
//! Search templates are computed once at construction, from three sources in
//! fixed priority order: project-local conventional subdirectories, the
//! `LUA_PATH`/`LUA_CPATH` environment snapshot, and a best-effort query of
//! the LuaRocks package manager. Resolution never lists directories, so the
//! outcome depends only on template order and the files probed.

use crate::error::{LuapackError, Result};
use crate::models::ModuleReference;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Module names satisfied by the Lua runtime itself
pub const LUA_BUILTINS: &[&str] = &[
    "coroutine", "debug", "io", "math", "os", "package", "string", "table", "utf8", "bit32",
];

/// Extension of Lua source files
pub const SOURCE_EXTENSION: &str = "lua";

/// Native library extensions, preferred platform format first
#[cfg(target_os = "macos")]
pub const NATIVE_EXTENSIONS: &[&str] = &["dylib", "so", "dll", "a"];
#[cfg(target_os = "windows")]
pub const NATIVE_EXTENSIONS: &[&str] = &["dll", "so", "dylib", "a"];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const NATIVE_EXTENSIONS: &[&str] = &["so", "dylib", "dll", "a"];

/// Outcome of a search-path discovery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// Template pattern strings, e.g. `/usr/share/lua/5.4/?.lua`
    Available(Vec<String>),
    /// The discovery tool is missing or timed out; coverage is reduced
    Unavailable,
}

/// Capability for discovering extra search-path templates
///
/// The production implementation shells out to LuaRocks; tests substitute a
/// deterministic stub so no process is ever spawned.
pub trait SearchPathDiscovery {
    fn discover(&self) -> Discovery;

    /// Name of this discovery source for diagnostics
    fn name(&self) -> &str;
}

/// Queries `luarocks path` for the rocks tree search patterns
pub struct LuaRocksDiscovery {
    timeout: Duration,
}

impl LuaRocksDiscovery {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run one `luarocks path` query, returning stdout on clean exit.
    /// Any failure mode (missing binary, non-zero exit, timeout) yields None.
    fn query(&self, flag: &str) -> Option<String> {
        let mut child = Command::new("luarocks")
            .arg("path")
            .arg(flag)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .ok()?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if !status.success() {
                        return None;
                    }
                    // the path listing fits the pipe buffer, so reading
                    // after exit cannot block
                    let mut stdout = String::new();
                    child.stdout.take()?.read_to_string(&mut stdout).ok()?;
                    return Some(stdout);
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return None;
                    }
                    std::thread::sleep(Duration::from_millis(20));
                }
                Err(_) => return None,
            }
        }
    }
}

impl Default for LuaRocksDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPathDiscovery for LuaRocksDiscovery {
    fn discover(&self) -> Discovery {
        let mut patterns = Vec::new();
        for flag in ["--lr-path", "--lr-cpath"] {
            if let Some(output) = self.query(flag) {
                patterns.extend(
                    output
                        .split(';')
                        .map(str::trim)
                        .filter(|entry| !entry.is_empty())
                        .map(String::from),
                );
            }
        }
        if patterns.is_empty() {
            Discovery::Unavailable
        } else {
            Discovery::Available(patterns)
        }
    }

    fn name(&self) -> &str {
        "luarocks"
    }
}

/// A fixed list of template patterns; for tests and for disabling discovery
pub struct StaticDiscovery {
    patterns: Vec<String>,
}

impl StaticDiscovery {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// A discovery source that always reports unavailable
    pub fn unavailable() -> Self {
        Self { patterns: Vec::new() }
    }
}

impl SearchPathDiscovery for StaticDiscovery {
    fn discover(&self) -> Discovery {
        if self.patterns.is_empty() {
            Discovery::Unavailable
        } else {
            Discovery::Available(self.patterns.clone())
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Resolves textual module references to filesystem artifacts
pub struct ModulePathResolver {
    templates: Vec<PathBuf>,
}

impl ModulePathResolver {
    /// Build a resolver rooted at the entry script's directory.
    ///
    /// `LUA_PATH`/`LUA_CPATH` are snapshotted here and never re-read during
    /// an analysis.
    pub fn new(project_root: &Path, discovery: &dyn SearchPathDiscovery) -> Self {
        let lua_path = std::env::var("LUA_PATH").unwrap_or_default();
        let lua_cpath = std::env::var("LUA_CPATH").unwrap_or_default();
        Self::from_sources(project_root, &lua_path, &lua_cpath, discovery)
    }

    fn from_sources(
        project_root: &Path,
        lua_path: &str,
        lua_cpath: &str,
        discovery: &dyn SearchPathDiscovery,
    ) -> Self {
        let mut templates = Vec::new();
        let mut seen = HashSet::new();
        let mut push = |dir: PathBuf| {
            if seen.insert(dir.clone()) {
                templates.push(dir);
            }
        };

        // project-local conventional subdirectories come first
        push(project_root.to_path_buf());
        for sub in ["src", "lua", "lib"] {
            push(project_root.join(sub));
        }

        for snapshot in [lua_path, lua_cpath] {
            for dir in harvest_template_dirs(snapshot) {
                push(dir);
            }
        }

        if let Discovery::Available(patterns) = discovery.discover() {
            for pattern in &patterns {
                for dir in harvest_template_dirs(pattern) {
                    push(dir);
                }
            }
        }

        Self { templates }
    }

    /// The template directories, in search priority order
    pub fn templates(&self) -> &[PathBuf] {
        &self.templates
    }

    /// Classify one module reference
    pub fn resolve(&self, reference: &str, requester: &Path) -> Result<ModuleReference> {
        if self.is_builtin(reference) {
            return Ok(ModuleReference::Builtin);
        }

        if reference.starts_with("./") || reference.starts_with("../") {
            self.resolve_relative(reference, requester)
        } else {
            self.resolve_dotted(reference, requester)
        }
    }

    /// The leading dot-separated segment decides; no filesystem access
    fn is_builtin(&self, reference: &str) -> bool {
        let head = reference.split('.').next().unwrap_or(reference);
        LUA_BUILTINS.contains(&head)
    }

    /// References with an explicit `./` or `../` marker resolve against the
    /// requesting file's own directory.
    fn resolve_relative(&self, reference: &str, requester: &Path) -> Result<ModuleReference> {
        let base = requester.parent().unwrap_or(Path::new("."));
        let candidate = base.join(reference);
        let mut searched = Vec::new();

        if reference.ends_with(&format!(".{}", SOURCE_EXTENSION)) {
            if let Some(found) = probe(&candidate, &mut searched) {
                return Ok(ModuleReference::SourceFile(found));
            }
        } else {
            if let Some(found) = probe_shapes(&candidate, SOURCE_EXTENSION, &mut searched) {
                return Ok(ModuleReference::SourceFile(found));
            }
            for ext in NATIVE_EXTENSIONS {
                if let Some(found) = probe_shapes(&candidate, ext, &mut searched) {
                    return Ok(ModuleReference::NativeArtifact(found));
                }
            }
        }

        Err(LuapackError::module_not_found(reference, requester, searched))
    }

    /// Dotted references translate to paths and walk the template list;
    /// every template is tried for source files before any native retry.
    fn resolve_dotted(&self, reference: &str, requester: &Path) -> Result<ModuleReference> {
        let translated = reference.replace('.', std::path::MAIN_SEPARATOR_STR);
        let mut searched = Vec::new();

        for template in &self.templates {
            let candidate = template.join(&translated);
            if let Some(found) = probe_shapes(&candidate, SOURCE_EXTENSION, &mut searched) {
                return Ok(ModuleReference::SourceFile(found));
            }
        }

        for ext in NATIVE_EXTENSIONS {
            for template in &self.templates {
                let candidate = template.join(&translated);
                if let Some(found) = probe_shapes(&candidate, ext, &mut searched) {
                    return Ok(ModuleReference::NativeArtifact(found));
                }
            }
        }

        Err(LuapackError::module_not_found(reference, requester, searched))
    }
}

/// Extract the directory portions of a `;`-separated template pattern list,
/// e.g. `/usr/share/lua/5.4/?.lua;./?.lua` -> the two directories.
fn harvest_template_dirs(patterns: &str) -> Vec<PathBuf> {
    patterns
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let dir = match entry.find('?') {
                Some(idx) => &entry[..idx],
                None => entry,
            };
            let dir = dir.trim_end_matches(['/', '\\']);
            if dir.is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            }
        })
        .collect()
}

/// The two lookup shapes for one candidate base: `<base>.<ext>` and the
/// package-as-directory convention `<base>/init.<ext>`.
fn probe_shapes(candidate: &Path, ext: &str, searched: &mut Vec<PathBuf>) -> Option<PathBuf> {
    let direct = PathBuf::from(format!("{}.{}", candidate.display(), ext));
    if let Some(found) = probe(&direct, searched) {
        return Some(found);
    }
    let init = candidate.join(format!("init.{}", ext));
    probe(&init, searched)
}

/// Record the attempt and return the canonical path when the file exists
fn probe(path: &Path, searched: &mut Vec<PathBuf>) -> Option<PathBuf> {
    searched.push(path.to_path_buf());
    if path.is_file() {
        Some(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
    } else {
        None
    }
}
