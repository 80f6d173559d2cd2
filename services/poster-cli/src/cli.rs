//! User-facing text for the command-line driver.

use storage::ThemeSummary;

/// Printed when the program is run without arguments.
pub const USAGE_EXAMPLES: &str = r#"
City Map Poster Generator
=========================

Usage:
  city-poster --city <city> --country <country> [options]

Examples:
  # Iconic grid patterns
  city-poster -c "New York" -C "USA" -t noir -d 12000           # Manhattan grid
  city-poster -c "Barcelona" -C "Spain" -t warm_beige -d 8000   # Eixample district grid

  # Waterfront & canals
  city-poster -c "Venice" -C "Italy" -t blueprint -d 4000       # Canal network
  city-poster -c "Amsterdam" -C "Netherlands" -t ocean -d 6000  # Concentric canals
  city-poster -c "Dubai" -C "UAE" -t midnight_blue -d 15000     # Palm & coastline

  # Radial patterns
  city-poster -c "Paris" -C "France" -t pastel_dream -d 10000   # Haussmann boulevards
  city-poster -c "Moscow" -C "Russia" -t noir -d 12000          # Ring roads

  # Organic old cities
  city-poster -c "Tokyo" -C "Japan" -t japanese_ink -d 15000    # Dense organic streets
  city-poster -c "Marrakech" -C "Morocco" -t terracotta -d 5000 # Medina maze
  city-poster -c "Rome" -C "Italy" -t warm_beige -d 8000        # Ancient street layout

  # Coastal cities
  city-poster -c "San Francisco" -C "USA" -t sunset -d 10000    # Peninsula grid
  city-poster -c "Sydney" -C "Australia" -t ocean -d 12000      # Harbor city

  # River cities
  city-poster -c "London" -C "UK" -t noir -d 15000              # Thames curves
  city-poster -c "Budapest" -C "Hungary" -t copper_patina -d 8000  # Danube split

  # List themes
  city-poster --list-themes

  # Interactive editor
  city-poster --gui

Options:
  --city, -c        City name (required)
  --country, -C     Country name (required)
  --theme, -t       Theme name (default: feature_based)
  --distance, -d    Map radius in meters (default: 29000)
  --list-themes     List all available themes
  --gui, -g         Start the interactive editor

Distance guide:
  4000-6000m   Small/dense cities (Venice, Amsterdam old center)
  8000-12000m  Medium cities, focused downtown (Paris, Barcelona)
  15000-20000m Large metros, full city view (Tokyo, Mumbai)

Available themes can be found in the 'themes/' directory.
Generated posters are saved to 'posters/' directory.
"#;

/// Theme listing: identifier, display name and (if any) description per theme.
pub fn format_theme_list(themes: &[ThemeSummary]) -> String {
    if themes.is_empty() {
        return "No themes found in the themes directory.\n".to_string();
    }

    let mut out = String::from("\nAvailable Themes:\n");
    out.push_str(&"-".repeat(60));
    out.push('\n');
    for theme in themes {
        out.push_str(&format!("  {}\n", theme.id));
        out.push_str(&format!("    {}\n", theme.display_name));
        if let Some(description) = &theme.description {
            out.push_str(&format!("    {}\n", description));
        }
        out.push('\n');
    }
    out
}

pub fn banner(title: &str) -> String {
    let rule = "=".repeat(50);
    format!("{}\n{}\n{}", rule, title, rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_list_layout() {
        let themes = vec![
            ThemeSummary {
                id: "noir".into(),
                display_name: "Noir".into(),
                description: Some("Black and white".into()),
            },
            ThemeSummary {
                id: "plain".into(),
                display_name: "plain".into(),
                description: None,
            },
        ];
        let out = format_theme_list(&themes);
        assert!(out.contains("Available Themes:"));
        assert!(out.contains("  noir\n    Noir\n    Black and white\n"));
        assert!(out.contains("  plain\n    plain\n\n"));
    }

    #[test]
    fn test_empty_theme_list() {
        assert!(format_theme_list(&[]).starts_with("No themes found"));
    }

    #[test]
    fn test_usage_mentions_every_flag() {
        for flag in ["--city", "--country", "--theme", "--distance", "--list-themes", "--gui"] {
            assert!(USAGE_EXAMPLES.contains(flag), "missing {}", flag);
        }
    }
}
