// Multi-language support module
// Provides localized UI strings for English and Chinese

#[derive(Clone)]
pub struct Assets {
    // Board frame
    pub board_title: &'static str,

    // Status bar
    pub status_mines_fmt: &'static str, // " Mines: {} "
    pub hint_new: &'static str,
    pub hint_concede: &'static str,
    pub hint_quit: &'static str,

    // Win/Loss banners
    pub win_title: &'static str,
    pub win_message: &'static str,
    pub loss_title: &'static str,
    pub loss_message: &'static str,

    // Terminal size messages
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str, // "Minimum size required: {} x {}"
    pub tsmsg_title: &'static str,
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        board_title: "RGB Minesweeper",

        status_mines_fmt: " Mines: {} ",
        hint_new: "N: New",
        hint_concede: "Esc: Give up",
        hint_quit: "Q: Quit",

        win_title: "Success",
        win_message: "You Win!",
        loss_title: "Failure",
        loss_message: "Game Over!",

        tsmsg_line1: "Terminal layout too small",
        tsmsg_line2: "Minimum size required: {} x {}",
        tsmsg_title: "Resize needed",
    }
}

/// Returns Chinese language assets
pub fn chinese_assets() -> Assets {
    Assets {
        board_title: "RGB 扫雷",

        status_mines_fmt: " 地雷：{} ",
        hint_new: "N: 新游戏",
        hint_concede: "Esc: 认输",
        hint_quit: "Q: 退出",

        win_title: "成功",
        win_message: "你赢了！",
        loss_title: "失败",
        loss_message: "游戏结束！",

        tsmsg_line1: "终端屏幕布局过小",
        tsmsg_line2: "最小需要尺寸：{} x {}",
        tsmsg_title: "需要调整大小",
    }
}

/// Main language manager struct
/// Holds the active string assets for the session
pub struct Lang {
    pub assets: Assets,
}

impl Lang {
    /// Creates a new Lang instance from a language code
    /// Normalizes input (e.g., "zh-CN" → "zh") and defaults to English for unsupported languages
    pub fn new(lang_code: &str) -> Self {
        let normalized = lang_code.to_lowercase();
        Lang {
            assets: if normalized.starts_with("zh") {
                chinese_assets()
            } else {
                english_assets()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_normalizes_region_codes() {
        assert_eq!(Lang::new("zh-CN").assets.win_message, chinese_assets().win_message);
        assert_eq!(Lang::new("ZH-Hant-TW").assets.win_message, chinese_assets().win_message);
        assert_eq!(Lang::new("en-US").assets.win_message, english_assets().win_message);
    }

    #[test]
    fn test_lang_falls_back_to_english() {
        let lang = Lang::new("fr-FR");
        assert_eq!(lang.assets.win_message, english_assets().win_message);
    }
}
