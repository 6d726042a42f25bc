use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Resolve one palette entry against the current terminal's color capabilities.
/// Format mirrors the sampled values: ((R, G, B), ANSI_256_Index, ANSI_16_Color)
fn resolve(rgb: (u8, u8, u8), index256: u8, basic: Color) -> Color {
    let support = ColorSupport::stdout();
    if support.has_16m {
        // 1. TrueColor support: Return the exact sampled RGB value
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    } else if support.has_256 {
        // 2. 256-color support (e.g., macOS Terminal): Return a stable 16-255 index
        Color::Indexed(index256)
    } else {
        // 3. Basic 16-color support: Return the closest ANSI variant
        basic
    }
}

/// Numeral color for a revealed cell, one vibrant hue per count
pub fn number_color(adj: u8) -> Color {
    match adj {
        1 => resolve((0, 255, 0), 46, Color::LightGreen), // bright green
        2 => resolve((0, 191, 255), 39, Color::LightCyan), // deep sky blue
        3 => resolve((255, 165, 0), 214, Color::LightYellow), // orange
        4 => resolve((75, 0, 130), 54, Color::Blue),      // indigo
        5 => resolve((255, 20, 147), 198, Color::LightMagenta), // deep pink
        6 => resolve((0, 255, 255), 51, Color::Cyan),     // cyan
        7 => resolve((255, 255, 0), 226, Color::Yellow),  // yellow
        8 => resolve((128, 0, 128), 90, Color::Magenta),  // purple
        _ => resolve((242, 242, 242), 255, Color::White),
    }
}

/// Background of a revealed safe cell, graded by its count
pub fn open_bg(adj: u8) -> Color {
    let r = (100 + u16::from(adj) * 20).min(255) as u8;
    let g = (100 + u16::from(adj) * 10).min(255) as u8;
    resolve((r, g, 100), 235 + adj.min(8), Color::DarkGray)
}

/// Dark backdrop behind the whole minefield
pub fn board_bg() -> Color {
    resolve((18, 18, 18), 233, Color::Black)
}

/// Slightly lighter dark for covered cells
pub fn covered_bg() -> Color {
    resolve((34, 34, 34), 235, Color::Black)
}

/// Covered cell glyph
pub fn covered_fg() -> Color {
    resolve((204, 204, 204), 250, Color::Gray)
}

/// Exploded / uncovered mine background
pub fn mine_bg() -> Color {
    resolve((255, 0, 0), 196, Color::Red)
}

/// Mine glyph drawn over the danger background
pub fn mine_fg() -> Color {
    resolve((18, 18, 18), 233, Color::Black)
}

/// Gold flag marker
pub fn flag_color() -> Color {
    resolve((255, 215, 0), 220, Color::Yellow)
}

/// Cell under the pointer / keyboard cursor
pub fn cursor_bg() -> Color {
    resolve((59, 120, 255), 63, Color::LightBlue)
}

/// Win banner text
pub fn win_color() -> Color {
    resolve((0, 255, 0), 46, Color::LightGreen)
}

/// Loss banner text
pub fn loss_color() -> Color {
    resolve((255, 0, 0), 196, Color::LightRed)
}
