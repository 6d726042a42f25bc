// Core game logic and configuration management
// Handles board generation, reveal/flag rules, win detection, and preference persistence

use directories::ProjectDirs;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Board construction failures
/// Validation runs before any cell is allocated, so a session never starts
/// on a configuration the placement loop could not satisfy
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("board dimensions must be positive, got {0}x{1}")]
    InvalidDimensions(usize, usize),
    #[error("mine count {mines} must be below the cell total {cells}")]
    TooManyMines { mines: usize, cells: usize },
}

/// User preferences
/// Persisted to disk as TOML; game state itself is never persisted
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub show_indicator: bool, // Show cursor position indicator
    pub ascii_icons: bool,    // Use ASCII fallback icons
    pub language: String,     // Language code ("en" or "zh")
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("zh") {
            "zh".to_string()
        } else {
            "en".to_string()
        };

        Config {
            show_indicator: false,
            ascii_icons: false,
            language: lang,
        }
    }
}

/// A single cell on the minesweeper board
#[derive(Clone, Copy)]
pub struct Cell {
    pub mine: bool, // Contains a mine
    pub adj: u8,    // Adjacent mine count (0-8)
}

/// Per-cell state as the renderer sees it, queried fresh each frame
/// The drawing side reads these snapshots and never touches board state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellView {
    Covered { flagged: bool },
    Mine,
    Open(u8),
}

/// Main game state
/// The board planes stay private; mutation goes through reveal/toggle_flag/concede
/// and reads go through the view/check_win queries
#[derive(Clone)]
pub struct Game {
    pub w: usize,               // Board width
    pub h: usize,               // Board height
    pub mines: usize,           // Total mine count
    pub cursor: (usize, usize), // Current cursor position
    board: Vec<Cell>,           // Board cells (mines + adjacency counts)
    revealed: Vec<bool>,        // Cell reveal status, monotonic
    flagged: Vec<bool>,         // Cell flag status
    game_over: bool,            // Set on mine reveal or concede, monotonic
}

impl Game {
    /// Create a new game with a random mine layout
    /// Mines are placed at construction and never relocated afterwards
    pub fn new(w: usize, h: usize, mines: usize) -> Result<Self, GameError> {
        let mut g = Self::empty(w, h, mines)?;
        g.place_mines();
        g.compute_adjacency();
        Ok(g)
    }

    /// Create a game with a fixed mine layout
    /// Coordinates must be distinct and in bounds; deterministic counterpart
    /// of new() for tests that cannot depend on RNG output
    #[cfg(test)]
    pub fn with_mines(w: usize, h: usize, layout: &[(usize, usize)]) -> Result<Self, GameError> {
        let mut g = Self::empty(w, h, layout.len())?;
        for &(x, y) in layout {
            let idx = g.index(x, y);
            g.board[idx].mine = true;
        }
        g.compute_adjacency();
        Ok(g)
    }

    fn empty(w: usize, h: usize, mines: usize) -> Result<Self, GameError> {
        if w == 0 || h == 0 {
            return Err(GameError::InvalidDimensions(w, h));
        }
        if mines >= w * h {
            return Err(GameError::TooManyMines { mines, cells: w * h });
        }
        Ok(Game {
            w,
            h,
            mines,
            cursor: (0, 0),
            board: vec![
                Cell {
                    mine: false,
                    adj: 0
                };
                w * h
            ],
            revealed: vec![false; w * h],
            flagged: vec![false; w * h],
            game_over: false,
        })
    }

    /// Convert (x, y) coordinates to flat array index
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    /// Randomly place mines on the board
    /// The mines < w*h check in empty() keeps the rejection loop finite
    fn place_mines(&mut self) {
        let mut rng = thread_rng();
        let n = self.w * self.h;
        let mut placed = 0;
        while placed < self.mines {
            let i = rng.gen_range(0..n);
            if !self.board[i].mine {
                self.board[i].mine = true;
                placed += 1;
            }
        }
    }

    /// Compute the adjacent mine count for every cell from the placed layout
    fn compute_adjacency(&mut self) {
        for y in 0..self.h {
            for x in 0..self.w {
                let mut adj = 0u8;
                for oy in y.saturating_sub(1)..=(y + 1).min(self.h - 1) {
                    for ox in x.saturating_sub(1)..=(x + 1).min(self.w - 1) {
                        if ox == x && oy == y {
                            continue;
                        }
                        if self.board[self.index(ox, oy)].mine {
                            adj += 1
                        }
                    }
                }
                let idx = self.index(x, y);
                self.board[idx].adj = adj;
            }
        }
    }

    fn open(&mut self, idx: usize) {
        self.revealed[idx] = true;
        self.flagged[idx] = false;
    }

    /// Reveal a cell at (x, y)
    /// - A mine ends the game and uncovers every mine on the board
    /// - A zero-count cell expands across its contiguous zero region via an
    ///   explicit worklist, stopping at the numbered boundary
    /// - Flag state does not protect a cell from being revealed
    pub fn reveal(&mut self, x: usize, y: usize) {
        let idx = self.index(x, y);
        if self.game_over || self.revealed[idx] {
            return;
        }
        if self.board[idx].mine {
            self.game_over = true;
            self.reveal_all_mines();
            return;
        }
        self.open(idx);
        // Worklist flood fill: each cell is marked revealed before it is
        // enqueued, so no coordinate enters the list twice
        let mut pending = vec![(x, y)];
        while let Some((cx, cy)) = pending.pop() {
            if self.board[self.index(cx, cy)].adj != 0 {
                continue;
            }
            for oy in cy.saturating_sub(1)..=(cy + 1).min(self.h - 1) {
                for ox in cx.saturating_sub(1)..=(cx + 1).min(self.w - 1) {
                    let nidx = self.index(ox, oy);
                    if !self.revealed[nidx] {
                        self.open(nidx);
                        pending.push((ox, oy));
                    }
                }
            }
        }
    }

    /// Uncover every mine cell; idempotent
    pub fn reveal_all_mines(&mut self) {
        for i in 0..self.w * self.h {
            if self.board[i].mine {
                self.revealed[i] = true;
                self.flagged[i] = false;
            }
        }
    }

    /// End the game without a mine hit, uncovering all mines
    /// Rendered identically to a loss
    pub fn concede(&mut self) {
        self.game_over = true;
        self.reveal_all_mines();
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Toggle flag state for a cell
    /// No-op once the cell is revealed or the game has ended
    pub fn toggle_flag(&mut self, x: usize, y: usize) {
        let idx = self.index(x, y);
        if self.game_over || self.revealed[idx] {
            return;
        }
        self.flagged[idx] = !self.flagged[idx];
    }

    /// Check if all non-mine cells have been revealed (win condition)
    pub fn check_win(&self) -> bool {
        for i in 0..self.w * self.h {
            if !self.board[i].mine && !self.revealed[i] {
                return false;
            }
        }
        true
    }

    /// Get the mine counter display value (total mines - flagged cells)
    /// Can be negative if the player places too many flags
    pub fn remaining_mines(&self) -> isize {
        let flagged = self.flagged.iter().filter(|b| **b).count();
        self.mines as isize - flagged as isize
    }

    pub fn step_cursor(&mut self, dx: isize, dy: isize) {
        let nx = (self.cursor.0 as isize + dx).clamp(0, (self.w - 1) as isize) as usize;
        let ny = (self.cursor.1 as isize + dy).clamp(0, (self.h - 1) as isize) as usize;
        self.cursor = (nx, ny);
    }

    /// Read-only snapshot of a single cell for the renderer
    pub fn view(&self, x: usize, y: usize) -> CellView {
        let idx = self.index(x, y);
        if !self.revealed[idx] {
            CellView::Covered {
                flagged: self.flagged[idx],
            }
        } else if self.board[idx].mine {
            CellView::Mine
        } else {
            CellView::Open(self.board[idx].adj)
        }
    }
}

/// Get the configuration file path
/// Uses platform-specific config directory (e.g., ~/.config/rgbswpr/rgbswpr.toml on Linux)
/// Falls back to current directory if ProjectDirs is unavailable
pub fn config_path() -> Option<PathBuf> {
    if let Ok(exe) = env::current_exe() {
        if let Some(name) = exe.file_stem().and_then(|s| s.to_str()) {
            if let Some(proj) = ProjectDirs::from("com", "rgbswpr", name) {
                let mut path = proj.config_dir().to_path_buf();
                path.push(format!("{}.toml", name));
                return Some(path);
            } else {
                // fallback to current directory
                if let Ok(mut path) = env::current_dir() {
                    path.push(format!("{}.toml", name));
                    return Some(path);
                }
            }
        }
    }
    None
}

/// Load configuration from disk, or create default if not found
pub fn load_or_create_config() -> Config {
    if let Some(path) = config_path() {
        if path.exists() {
            if let Ok(s) = fs::read_to_string(&path) {
                if let Ok(cfg) = toml::from_str::<Config>(&s) {
                    return cfg;
                }
            }
        }
        let cfg = Config::default();
        if let Ok(s) = toml::to_string(&cfg) {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(&path, s);
        }
        return cfg;
    }
    Config::default()
}

/// Save configuration to disk as TOML
pub fn save_config(cfg: &Config) {
    if let Some(path) = config_path() {
        if let Ok(s) = toml::to_string(cfg) {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(&path, s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 board with one mine in the corner; every safe cell counts 1
    fn corner_mine_board() -> Game {
        Game::with_mines(3, 3, &[(0, 0)]).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            Game::new(0, 5, 1),
            Err(GameError::InvalidDimensions(0, 5))
        ));
        assert!(matches!(
            Game::new(5, 0, 1),
            Err(GameError::InvalidDimensions(5, 0))
        ));
        assert!(matches!(
            Game::new(0, 0, 0),
            Err(GameError::InvalidDimensions(0, 0))
        ));
    }

    #[test]
    fn test_new_rejects_mine_overflow() {
        assert!(matches!(
            Game::new(5, 5, 25),
            Err(GameError::TooManyMines { mines: 25, cells: 25 })
        ));
        assert!(matches!(
            Game::new(2, 2, 7),
            Err(GameError::TooManyMines { mines: 7, cells: 4 })
        ));
        // One free cell is enough
        assert!(Game::new(5, 5, 24).is_ok());
        // A mineless board is a valid (if trivial) configuration
        assert!(Game::new(4, 4, 0).is_ok());
    }

    #[test]
    fn test_mine_count_invariant() {
        for (w, h, m) in [(10, 10, 10), (9, 9, 1), (16, 16, 40), (3, 2, 5)] {
            let g = Game::new(w, h, m).unwrap();
            let placed = g.board.iter().filter(|c| c.mine).count();
            assert_eq!(placed, m, "board {}x{} with {} mines", w, h, m);
        }
    }

    #[test]
    fn test_adjacency_brute_force() {
        // Recompute every count directly from the placed layout
        let g = Game::new(9, 9, 10).unwrap();
        for y in 0..g.h {
            for x in 0..g.w {
                let mut expect = 0u8;
                for oy in y.saturating_sub(1)..=(y + 1).min(g.h - 1) {
                    for ox in x.saturating_sub(1)..=(x + 1).min(g.w - 1) {
                        if (ox, oy) != (x, y) && g.board[g.index(ox, oy)].mine {
                            expect += 1;
                        }
                    }
                }
                assert_eq!(g.board[g.index(x, y)].adj, expect, "cell ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_corner_mine_neighbor_counts() {
        let g = corner_mine_board();
        // Every cell of a 3x3 board neighbors the corner, so all eight
        // safe cells count exactly one mine
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) == (0, 0) {
                    continue;
                }
                assert_eq!(g.board[g.index(x, y)].adj, 1);
            }
        }
    }

    #[test]
    fn test_reveal_numbered_cell_does_not_expand() {
        let mut g = corner_mine_board();
        g.reveal(2, 2);
        let opened = g.revealed.iter().filter(|r| **r).count();
        assert_eq!(opened, 1);
        assert_eq!(g.view(2, 2), CellView::Open(1));
    }

    #[test]
    fn test_win_by_revealing_every_safe_cell() {
        let mut g = corner_mine_board();
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (0, 0) {
                    g.reveal(x, y);
                }
            }
        }
        assert!(g.check_win());
        assert!(!g.is_over());
        assert_eq!(g.view(0, 0), CellView::Covered { flagged: false });
    }

    #[test]
    fn test_reveal_mine_loses() {
        let mut g = corner_mine_board();
        g.reveal(0, 0);
        assert!(g.is_over());
        assert!(!g.check_win());
        // Exactly the mine cell is open, the eight safe cells stay covered
        let opened = g.revealed.iter().filter(|r| **r).count();
        assert_eq!(opened, 1);
        assert_eq!(g.view(0, 0), CellView::Mine);
    }

    #[test]
    fn test_loss_reveals_every_mine_and_nothing_else() {
        let mut g = Game::with_mines(5, 5, &[(0, 0), (4, 4), (2, 3)]).unwrap();
        g.reveal(1, 1);
        assert!(!g.is_over());
        let opened_before: Vec<usize> =
            (0..25).filter(|i| g.revealed[*i]).collect();
        g.reveal(4, 4);
        assert!(g.is_over());
        for y in 0..5 {
            for x in 0..5 {
                let idx = g.index(x, y);
                if g.board[idx].mine {
                    assert!(g.revealed[idx], "mine ({}, {}) stayed covered", x, y);
                } else {
                    assert_eq!(
                        g.revealed[idx],
                        opened_before.contains(&idx),
                        "safe cell ({}, {}) changed on loss",
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn test_flood_fill_covers_mineless_board() {
        let mut g = Game::with_mines(4, 4, &[]).unwrap();
        g.reveal(0, 0);
        assert!(g.revealed.iter().all(|r| *r));
        assert!(g.check_win());
    }

    #[test]
    fn test_flood_fill_opens_zero_region_plus_boundary() {
        let mut g = Game::with_mines(5, 5, &[(4, 4)]).unwrap();
        g.reveal(0, 0);
        // The zero region spans the board; the numbered ring around the mine
        // is opened as its boundary, only the mine itself stays covered
        for y in 0..5 {
            for x in 0..5 {
                if (x, y) == (4, 4) {
                    assert_eq!(g.view(x, y), CellView::Covered { flagged: false });
                } else {
                    assert!(g.revealed[g.index(x, y)], "cell ({}, {})", x, y);
                }
            }
        }
        assert!(g.check_win());
    }

    #[test]
    fn test_reveal_is_monotonic() {
        let mut g = corner_mine_board();
        g.reveal(2, 2);
        g.toggle_flag(2, 2);
        g.reveal(2, 2);
        g.toggle_flag(1, 1);
        assert!(g.revealed[g.index(2, 2)]);
    }

    #[test]
    fn test_flag_toggle_pairing() {
        let mut g = corner_mine_board();
        assert_eq!(g.view(1, 1), CellView::Covered { flagged: false });
        g.toggle_flag(1, 1);
        assert_eq!(g.view(1, 1), CellView::Covered { flagged: true });
        g.toggle_flag(1, 1);
        assert_eq!(g.view(1, 1), CellView::Covered { flagged: false });
    }

    #[test]
    fn test_flag_on_revealed_cell_is_noop() {
        let mut g = corner_mine_board();
        g.reveal(2, 2);
        g.toggle_flag(2, 2);
        assert_eq!(g.view(2, 2), CellView::Open(1));
        assert!(!g.flagged[g.index(2, 2)]);
    }

    #[test]
    fn test_flag_does_not_block_reveal() {
        let mut g = corner_mine_board();
        g.toggle_flag(2, 2);
        g.reveal(2, 2);
        assert_eq!(g.view(2, 2), CellView::Open(1));
        // A flagged mine is not protected either
        let mut g = corner_mine_board();
        g.toggle_flag(0, 0);
        g.reveal(0, 0);
        assert!(g.is_over());
        assert_eq!(g.view(0, 0), CellView::Mine);
    }

    #[test]
    fn test_no_mutation_after_game_over() {
        let mut g = corner_mine_board();
        g.reveal(0, 0);
        g.reveal(1, 1);
        assert_eq!(g.view(1, 1), CellView::Covered { flagged: false });
        g.toggle_flag(1, 1);
        assert_eq!(g.view(1, 1), CellView::Covered { flagged: false });
    }

    #[test]
    fn test_concede_matches_loss_presentation() {
        let mut g = Game::with_mines(5, 5, &[(0, 0), (4, 4)]).unwrap();
        g.reveal(2, 2);
        g.concede();
        assert!(g.is_over());
        assert!(!g.check_win());
        assert_eq!(g.view(0, 0), CellView::Mine);
        assert_eq!(g.view(4, 4), CellView::Mine);
        // Conceding twice changes nothing
        let snapshot = g.revealed.clone();
        g.concede();
        assert_eq!(g.revealed, snapshot);
    }

    #[test]
    fn test_reveal_all_mines_is_idempotent() {
        let mut g = Game::with_mines(4, 4, &[(1, 1), (3, 0)]).unwrap();
        g.reveal_all_mines();
        let snapshot = g.revealed.clone();
        g.reveal_all_mines();
        assert_eq!(g.revealed, snapshot);
    }

    #[test]
    fn test_check_win_requires_every_safe_cell() {
        let mut g = corner_mine_board();
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (0, 0) && (x, y) != (1, 2) {
                    g.reveal(x, y);
                }
            }
        }
        assert!(!g.check_win());
        g.reveal(1, 2);
        assert!(g.check_win());
    }

    #[test]
    fn test_win_ignores_flag_state() {
        let mut g = corner_mine_board();
        g.toggle_flag(0, 0);
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (0, 0) {
                    g.reveal(x, y);
                }
            }
        }
        assert!(g.check_win());
    }

    #[test]
    fn test_remaining_mines_counter() {
        let mut g = Game::with_mines(3, 3, &[(0, 0), (1, 0)]).unwrap();
        assert_eq!(g.remaining_mines(), 2);
        g.toggle_flag(2, 2);
        g.toggle_flag(2, 1);
        assert_eq!(g.remaining_mines(), 0);
        g.toggle_flag(2, 0);
        assert_eq!(g.remaining_mines(), -1);
    }

    #[test]
    fn test_step_cursor_clamps_to_board() {
        let mut g = corner_mine_board();
        g.step_cursor(-1, -1);
        assert_eq!(g.cursor, (0, 0));
        g.step_cursor(5, 5);
        assert_eq!(g.cursor, (2, 2));
        g.step_cursor(-1, 0);
        assert_eq!(g.cursor, (1, 2));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let cfg = Config {
            show_indicator: true,
            ascii_icons: false,
            language: "zh".to_string(),
        };
        let s = toml::to_string(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert!(back.show_indicator);
        assert!(!back.ascii_icons);
        assert_eq!(back.language, "zh");
    }
}
