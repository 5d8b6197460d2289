//! The read-only filesystem contract the analysis engine is driven by.

/// A rooted, read-only view over a source tree.
///
/// Implementations decide how paths are rooted (a checkout on disk, an
/// in-memory fixture, a tarball) — the engine never writes and never asks for
/// anything outside this trait. `Sync` so the engine can fan the
/// discovery-and-parse pass out across `rayon`'s thread pool.
pub trait VirtualFs: Sync {
    /// List every path under `prefix`, relative to the root. `prefix` may be
    /// `""` to list the whole tree. Order is not significant; callers sort
    /// when determinism matters.
    fn list(&self, prefix: &str) -> Vec<String>;

    /// Read the full contents of `path` as UTF-8 text. `None` when the path
    /// does not exist or is not valid UTF-8 — the engine treats both as
    /// "missing" and records a diagnostic rather than failing.
    fn read(&self, path: &str) -> Option<String>;
}

/// An in-memory `VirtualFs` fixture, used by tests and by embedders that
/// already hold file contents in memory (e.g. from an upstream checkout step).
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: rustc_hash::FxHashMap<String, String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl VirtualFs for MemoryFs {
    fn list(&self, prefix: &str) -> Vec<String> {
        self.files
            .keys()
            .filter(|p| p.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn read(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}
