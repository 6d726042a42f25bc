// Entry point for the RGB Minesweeper terminal application
// Initializes configuration and language settings, then launches the session loop

use std::error::Error;

// Module declarations
mod rgb_color; // Cross-platform color capability handling
mod rgb_game;  // Core game logic and configuration
mod rgb_lang;  // Multi-language string resources
mod rgb_ui;    // Terminal UI rendering and event handling

use rgb_game::load_or_create_config;
use rgb_lang::Lang;
use rgb_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    // Load or create user preferences (icons, indicator, language)
    let mut cfg = load_or_create_config();

    // Initialize language resources based on saved or system language
    let lang = Lang::new(&cfg.language);

    // Launch the session loop
    run_ui(&mut cfg, &lang)
}
