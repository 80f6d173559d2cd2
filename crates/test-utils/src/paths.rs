//! Temporary directory layouts for tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Themes shipped with the repository.
pub fn bundled_themes_dir() -> PathBuf {
    workspace_root().join("themes")
}

/// A scratch directory holding `themes/`, `posters/`, `cache/` and `fonts/`.
///
/// Everything is removed when the value is dropped.
pub struct TestWorkspace {
    root: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        for sub in ["themes", "posters", "cache", "fonts"] {
            std::fs::create_dir_all(root.path().join(sub)).expect("create sub dir");
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.root.path().join("themes")
    }

    pub fn posters_dir(&self) -> PathBuf {
        self.root.path().join("posters")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.path().join("cache")
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.root.path().join("fonts")
    }

    /// Write `<themes>/<id>.json` with the given content.
    pub fn write_theme(&self, id: &str, json: &str) -> PathBuf {
        let path = self.themes_dir().join(format!("{}.json", id));
        std::fs::write(&path, json).expect("write theme");
        path
    }

    /// Files currently in `posters/`, sorted.
    pub fn posters(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.posters_dir())
            .expect("read posters dir")
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        files
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_cargo_toml() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn test_workspace_layout() {
        let ws = TestWorkspace::new();
        assert!(ws.themes_dir().is_dir());
        assert!(ws.posters_dir().is_dir());
        assert!(ws.cache_dir().is_dir());
        assert!(ws.fonts_dir().is_dir());
        assert!(ws.posters().is_empty());
    }
}
