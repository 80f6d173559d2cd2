//! City map poster generator.
//!
//! Renders a poster of a city's street network:
//! - Geocodes the city via Nominatim
//! - Downloads streets, water and parks from the Overpass API (cached on disk)
//! - Draws them with a JSON color theme and writes a PNG to `posters/`
//!
//! `--gui` starts an interactive editor instead of a single run.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use poster_cli::cli::{banner, format_theme_list, USAGE_EXAMPLES};
use poster_cli::composer::{DEFAULT_DISTANCE, DEFAULT_THEME};
use poster_cli::{Editor, PosterComposer, PosterConfig, PosterRequest};
use storage::ThemeStore;

#[derive(Parser, Debug)]
#[command(name = "city-poster")]
#[command(about = "Generate beautiful map posters for any city")]
struct Args {
    /// City name
    #[arg(short = 'c', long)]
    city: Option<String>,

    /// Country name
    #[arg(short = 'C', long)]
    country: Option<String>,

    /// Theme name
    #[arg(short = 't', long, default_value = DEFAULT_THEME)]
    theme: String,

    /// Map radius in meters
    #[arg(short = 'd', long, default_value_t = DEFAULT_DISTANCE)]
    distance: u32,

    /// List all available themes
    #[arg(long)]
    list_themes: bool,

    /// Start the interactive editor
    #[arg(short = 'g', long)]
    gui: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Theme directory (overrides THEMES_DIR)
    #[arg(long)]
    themes_dir: Option<PathBuf>,

    /// Output directory (overrides POSTERS_DIR)
    #[arg(long)]
    posters_dir: Option<PathBuf>,

    /// Map data cache directory (overrides CACHE_DIR)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Font directory (overrides FONTS_DIR)
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    if std::env::args_os().len() == 1 {
        println!("{}", USAGE_EXAMPLES);
        return Ok(());
    }

    let args = Args::parse();

    // Initialize tracing (RUST_LOG takes precedence over --log-level)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    let code = run(args).await?;
    std::process::exit(code);
}

async fn run(args: Args) -> Result<i32> {
    let mut config = PosterConfig::from_env();
    if let Some(dir) = args.themes_dir.clone() {
        config.themes_dir = dir;
    }
    if let Some(dir) = args.posters_dir.clone() {
        config.posters_dir = dir;
    }
    if let Some(dir) = args.cache_dir.clone() {
        config.cache_dir = dir;
    }
    if let Some(dir) = args.fonts_dir.clone() {
        config.fonts_dir = dir;
    }
    config.validate().map_err(anyhow::Error::msg)?;

    let store = ThemeStore::new(&config.themes_dir);

    if args.gui {
        info!("Starting interactive editor");
        let composer = Arc::new(PosterComposer::from_config(&config)?);
        let editor = Editor::new(store, composer, std::io::stdout());
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        editor.run(stdin).await?;
        return Ok(0);
    }

    if args.list_themes {
        print!("{}", format_theme_list(&store.list_summaries()?));
        return Ok(0);
    }

    let (Some(city), Some(country)) = (args.city.clone(), args.country.clone()) else {
        println!("Error: --city and --country are required.\n");
        println!("{}", USAGE_EXAMPLES);
        return Ok(1);
    };

    let available = store.list_available()?;
    if !available.contains(&args.theme) {
        println!("Error: Theme '{}' not found.", args.theme);
        println!("Available themes: {}", available.join(", "));
        return Ok(1);
    }

    println!("{}", banner("City Map Poster Generator"));

    let theme = store.load(&args.theme);
    let request = PosterRequest::new(city, country, &args.theme, args.distance);
    let composer = PosterComposer::from_config(&config)?;

    match composer.generate(&request, &theme).await {
        Ok(path) => {
            println!("\n✓ Done! Poster saved as {}", path.display());
            println!("\n{}", banner("✓ Poster generation complete!"));
            Ok(0)
        }
        Err(e) => {
            error!(error = %e, kind = ?e.kind(), "Poster generation failed");
            println!("\n✗ Error: {}", e);
            Ok(e.exit_code())
        }
    }
}
