//! Interactive terminal editor.
//!
//! Holds the working city, country, distance and theme, lets the user tweak
//! theme colors and save them, and runs generation in the background so the
//! prompt stays responsive. At most one generation is in flight at a time.

use std::fmt::Display;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use poster_common::{HexColor, PosterError, PosterResult, Theme};
use storage::{Overwrite, ThemeStore};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::composer::{PosterComposer, PosterRequest, DEFAULT_DISTANCE, DEFAULT_THEME};

pub const HELP: &str = "\
Commands:
  city <name>            set the city
  country <name>         set the country
  distance <meters>      set the map radius
  theme <id>             switch to a saved theme
  themes                 list saved themes
  colors                 show the current theme's colors
  set <key> <#hex>       change a color (e.g. set road_primary #FF8800)
  save <display name>    save the current colors as a theme
  generate               render a poster with the current settings
  status                 show the current settings and last result
  help                   show this help
  quit                   leave the editor";

/// Handle to the single background generation task.
///
/// Starting a second generation while one is running is refused.
#[derive(Default)]
pub struct GenerationSlot {
    task: Option<JoinHandle<PosterResult<PathBuf>>>,
}

/// Returned by [`GenerationSlot::try_start`] when a generation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBusy;

impl GenerationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    pub fn try_start<F>(&mut self, generation: F) -> Result<(), SlotBusy>
    where
        F: Future<Output = PosterResult<PathBuf>> + Send + 'static,
    {
        if self.task.is_some() {
            return Err(SlotBusy);
        }
        self.task = Some(tokio::spawn(generation));
        Ok(())
    }

    /// Wait for the running generation; pending forever when idle.
    ///
    /// Cancel safe: dropping the future leaves the task in the slot.
    pub async fn finished(&mut self) -> PosterResult<PathBuf> {
        let Some(task) = self.task.as_mut() else {
            return std::future::pending().await;
        };
        let joined = task.await;
        self.task = None;
        joined.map_err(|e| PosterError::Internal(format!("generation task failed: {}", e)))?
    }
}

/// Most recently modified PNG in `dir`.
pub fn latest_poster(dir: &Path) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("png"))
        .filter_map(|path| {
            let modified = path.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}

/// Editor settings that are not part of the theme.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub city: String,
    pub country: String,
    pub distance: u32,
    pub theme_id: String,
    pub theme: Theme,
    pub status: String,
}

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Editor<W: Write> {
    state: EditorState,
    store: ThemeStore,
    composer: Arc<PosterComposer>,
    slot: GenerationSlot,
    pending_overwrite: Option<String>,
    last_poster: Option<PathBuf>,
    out: W,
}

impl<W: Write> Editor<W> {
    /// Start with the default theme loaded from `store`.
    pub fn new(store: ThemeStore, composer: Arc<PosterComposer>, out: W) -> Self {
        let theme = store.load(DEFAULT_THEME);
        let last_poster = latest_poster(composer.posters_dir());
        Self {
            state: EditorState {
                city: String::new(),
                country: String::new(),
                distance: DEFAULT_DISTANCE,
                theme_id: DEFAULT_THEME.to_string(),
                theme,
                status: "Ready".to_string(),
            },
            store,
            composer,
            slot: GenerationSlot::new(),
            pending_overwrite: None,
            last_poster,
            out,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn last_poster(&self) -> Option<&Path> {
        self.last_poster.as_deref()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands from `input` until `quit` or end of input.
    pub async fn run<R>(mut self, input: R) -> PosterResult<W>
    where
        R: AsyncBufRead + Unpin,
    {
        self.say("City Map Poster Generator (type 'help' for commands)");
        if let Some(path) = &self.last_poster {
            let msg = format!("Last poster: {}", path.display());
            self.say(msg);
        }

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if self.handle_line(&line) == Flow::Quit {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                result = self.slot.finished(), if self.slot.is_busy() => {
                    self.on_generation_finished(result);
                }
            }
        }

        if self.slot.is_busy() {
            self.say("Waiting for the running generation to finish...");
            let result = self.slot.finished().await;
            self.on_generation_finished(result);
        }
        Ok(self.out)
    }

    /// Apply one line of input.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        let line = line.trim();

        if let Some(name) = self.pending_overwrite.take() {
            if matches!(line.to_lowercase().as_str(), "y" | "yes") {
                self.save_theme(&name, Overwrite::Confirmed);
            } else {
                self.say("Save cancelled");
            }
            return Flow::Continue;
        }

        if line.is_empty() {
            return Flow::Continue;
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        debug!(command, arg, "Editor command");

        match command.to_lowercase().as_str() {
            "city" => {
                self.state.city = arg.to_string();
                self.say(format!("City: {}", arg));
            }
            "country" => {
                self.state.country = arg.to_string();
                self.say(format!("Country: {}", arg));
            }
            "distance" => match arg.parse::<u32>() {
                Ok(d) if d > 0 => {
                    self.state.distance = d;
                    self.say(format!("Distance: {} m", d));
                }
                _ => self.error("Invalid distance"),
            },
            "theme" => self.switch_theme(arg),
            "themes" => self.list_themes(),
            "colors" => self.show_colors(),
            "set" => self.set_color(arg),
            "save" => self.save_theme(arg, Overwrite::Forbid),
            "generate" => self.generate(),
            "status" => self.show_status(),
            "help" => self.say(HELP),
            "quit" | "exit" => return Flow::Quit,
            other => self.error(format!("Unknown command '{}' (type 'help')", other)),
        }
        Flow::Continue
    }

    /// Record the outcome of a background generation.
    pub fn on_generation_finished(&mut self, result: PosterResult<PathBuf>) {
        match result {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                self.state.status = format!("Saved: {}", name);
                let msg = format!("{}\nPoster: {}", self.state.status, path.display());
                self.say(msg);
                self.last_poster = Some(path);
            }
            Err(e) => {
                self.state.status = format!("Error: {}", e);
                let msg = self.state.status.clone();
                self.say(msg);
            }
        }
    }

    fn switch_theme(&mut self, id: &str) {
        if !self.store.exists(id) {
            let available = self.store.list_available().unwrap_or_default().join(", ");
            self.error(format!("Theme '{}' not found. Available themes: {}", id, available));
            return;
        }
        self.state.theme = self.store.load(id);
        self.state.theme_id = id.to_string();
        let msg = format!("Theme: {}", self.state.theme.display_name(id));
        self.say(msg);
    }

    fn list_themes(&mut self) {
        match self.store.list_summaries() {
            Ok(themes) => {
                let text = crate::cli::format_theme_list(&themes);
                self.say(text.trim_end());
            }
            Err(e) => self.error(e),
        }
    }

    fn show_colors(&mut self) {
        let lines: Vec<String> = self
            .state
            .theme
            .color_entries()
            .into_iter()
            .map(|(key, color)| format!("  {:<18} {}", key, color))
            .collect();
        self.say(lines.join("\n"));
    }

    fn set_color(&mut self, arg: &str) {
        let Some((key, value)) = arg.split_once(char::is_whitespace) else {
            self.error("Usage: set <key> <#hex>");
            return;
        };
        let result = HexColor::parse(value.trim())
            .and_then(|color| self.state.theme.set_color(key, color));
        match result {
            Ok(()) => self.say(format!("{} = {}", key, value.trim())),
            Err(e) => self.error(e),
        }
    }

    fn save_theme(&mut self, name: &str, overwrite: Overwrite) {
        match self.store.save(&self.state.theme, name, overwrite) {
            Ok(id) => {
                info!(theme = %id, "Theme saved from editor");
                self.state.theme.name = Some(name.to_string());
                self.state.theme_id = id.clone();
                self.say(format!("Theme saved as '{}'", id));
            }
            Err(PosterError::ThemeExists(id)) => {
                self.pending_overwrite = Some(name.to_string());
                self.say(format!("Theme '{}' already exists. Overwrite? [y/N]", id));
            }
            Err(PosterError::InvalidThemeName(_)) => self.error("Invalid theme name"),
            Err(e) => self.error(format!("Could not save theme: {}", e)),
        }
    }

    fn generate(&mut self) {
        if self.state.city.is_empty() || self.state.country.is_empty() {
            self.error("City and Country required");
            return;
        }

        let request = PosterRequest::new(
            &self.state.city,
            &self.state.country,
            &self.state.theme_id,
            self.state.distance,
        );
        // Captured by value: later edits do not affect this run
        let theme = self.state.theme.clone();
        let composer = Arc::clone(&self.composer);

        let started = self
            .slot
            .try_start(async move { composer.generate(&request, &theme).await });
        match started {
            Ok(()) => {
                self.state.status = "Generating... (progress is logged)".to_string();
                let msg = self.state.status.clone();
                self.say(msg);
            }
            Err(SlotBusy) => self.say("A poster is already being generated"),
        }
    }

    fn show_status(&mut self) {
        let s = &self.state;
        let msg = format!(
            "City: {}\nCountry: {}\nDistance: {} m\nTheme: {}\nStatus: {}",
            if s.city.is_empty() { "-" } else { &s.city },
            if s.country.is_empty() { "-" } else { &s.country },
            s.distance,
            s.theme_id,
            s.status
        );
        self.say(msg);
    }

    fn error(&mut self, msg: impl Display) {
        self.say(format!("Error: {}", msg));
    }

    fn say(&mut self, msg: impl Display) {
        if let Err(e) = writeln!(self.out, "{}", msg) {
            debug!(error = %e, "Editor output dropped");
        }
    }
}
