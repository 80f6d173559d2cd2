//! Directory-backed theme store.
//!
//! Each theme lives in `<dir>/<id>.json`, where `<id>` is the file stem used
//! on the command line (e.g. `feature_based`, `noir`).

use std::fs;
use std::path::{Path, PathBuf};

use poster_common::theme::theme_slug;
use poster_common::{PosterError, PosterResult, Theme};
use tracing::{debug, info, warn};

const THEME_EXTENSION: &str = "json";

/// Whether `save` may replace an existing theme file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Fail with `ThemeExists` if the identifier is taken.
    Forbid,
    /// The user confirmed replacing the existing theme.
    Confirmed,
}

/// Identifier plus the metadata shown in theme listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSummary {
    pub id: String,
    pub display_name: String,
    pub description: Option<String>,
}

/// Loads, lists and saves themes in a directory.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    dir: PathBuf,
}

impl ThemeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, THEME_EXTENSION))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Theme identifiers in lexicographic order.
    ///
    /// Creates the directory when it does not exist yet.
    pub fn list_available(&self) -> PosterResult<Vec<String>> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            debug!(dir = %self.dir.display(), "Created theme directory");
            return Ok(Vec::new());
        }

        let mut themes: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|s| s.to_str()) == Some(THEME_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .collect();

        themes.sort();
        Ok(themes)
    }

    /// Read and validate a theme file.
    pub fn try_load(&self, id: &str) -> PosterResult<Theme> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(PosterError::ThemeNotFound(id.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        Theme::from_json(&content).map_err(|e| {
            PosterError::invalid_parameter(format!("theme '{}'", id), e.to_string())
        })
    }

    /// Load a theme, substituting the built-in default when it is missing or invalid.
    pub fn load(&self, id: &str) -> Theme {
        match self.try_load(id) {
            Ok(theme) => {
                info!(
                    theme = id,
                    name = theme.display_name(id),
                    description = theme.description.as_deref().unwrap_or(""),
                    "Loaded theme"
                );
                theme
            }
            Err(PosterError::ThemeNotFound(_)) => {
                warn!(
                    path = %self.path_for(id).display(),
                    "Theme file not found. Using default feature_based theme."
                );
                Theme::feature_based()
            }
            Err(e) => {
                warn!(theme = id, error = %e, "Theme file unusable. Using default feature_based theme.");
                Theme::feature_based()
            }
        }
    }

    /// Display name and description for a listing; never fails.
    pub fn describe(&self, id: &str) -> ThemeSummary {
        match self.try_load(id) {
            Ok(theme) => ThemeSummary {
                id: id.to_string(),
                display_name: theme.display_name(id).to_string(),
                description: theme.description.clone().filter(|d| !d.is_empty()),
            },
            Err(_) => ThemeSummary {
                id: id.to_string(),
                display_name: id.to_string(),
                description: None,
            },
        }
    }

    pub fn list_summaries(&self) -> PosterResult<Vec<ThemeSummary>> {
        Ok(self
            .list_available()?
            .iter()
            .map(|id| self.describe(id))
            .collect())
    }

    /// Save `theme` under the identifier derived from `name`.
    ///
    /// The stored document's `name` is the display string as typed. Returns
    /// the identifier the theme was written under.
    pub fn save(&self, theme: &Theme, name: &str, overwrite: Overwrite) -> PosterResult<String> {
        let id = theme_slug(name);
        if id.is_empty() {
            return Err(PosterError::InvalidThemeName(name.to_string()));
        }

        let path = self.path_for(&id);
        if path.exists() && overwrite == Overwrite::Forbid {
            return Err(PosterError::ThemeExists(id));
        }

        let mut named = theme.clone();
        named.name = Some(name.to_string());

        let what = format!("theme '{}'", id);
        let json = named
            .to_json_pretty()
            .map_err(|e| PosterError::persistence(&what, e))?;
        fs::create_dir_all(&self.dir).map_err(|e| PosterError::persistence(&what, e))?;
        fs::write(&path, json).map_err(|e| PosterError::persistence(&what, e))?;

        info!(theme = %id, path = %path.display(), "Theme saved");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for() {
        let store = ThemeStore::new("themes");
        assert_eq!(store.path_for("noir"), PathBuf::from("themes/noir.json"));
    }

    #[test]
    fn test_list_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(tmp.path().join("themes"));
        assert!(store.list_available().unwrap().is_empty());
        assert!(store.dir().is_dir());
    }
}
