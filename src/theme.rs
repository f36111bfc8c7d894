//! Color palettes and their resolution from config.
//!
//! Ships a dark (Catppuccin Mocha) and a light (Catppuccin Latte) palette;
//! `scheme = "custom"` starts from dark and applies hex overrides on top.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

/// Shorthand for a 24-bit palette entry.
const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panels
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,

    // Status bar
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Dialogs
    pub dialog_border_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub dim_fg: Color,
}

impl ThemeColors {
    /// Catppuccin Mocha.
    pub fn dark() -> Self {
        Self {
            tree_fg: rgb(0xcdd6f4),
            tree_selected_bg: rgb(0x45475a),
            tree_selected_fg: rgb(0xcdd6f4),
            tree_dir_fg: rgb(0x89b4fa),
            tree_file_fg: rgb(0xcdd6f4),

            status_fg: rgb(0xcdd6f4),

            border_fg: rgb(0x585b70),
            border_focused_fg: rgb(0x89b4fa),

            dialog_border_fg: rgb(0x89b4fa),

            error_fg: rgb(0xf38ba8),
            warning_fg: rgb(0xf9e2af),
            success_fg: rgb(0xa6e3a1),
            info_fg: rgb(0x89b4fa),
            dim_fg: rgb(0x6c7086),
        }
    }

    /// Catppuccin Latte.
    pub fn light() -> Self {
        Self {
            tree_fg: rgb(0x4c4f69),
            tree_selected_bg: rgb(0xccd0da),
            tree_selected_fg: rgb(0x4c4f69),
            tree_dir_fg: rgb(0x1e66f5),
            tree_file_fg: rgb(0x4c4f69),

            status_fg: rgb(0x4c4f69),

            border_fg: rgb(0xacb0be),
            border_focused_fg: rgb(0x1e66f5),

            dialog_border_fg: rgb(0x1e66f5),

            error_fg: rgb(0xd20f39),
            warning_fg: rgb(0xdf8e1d),
            success_fg: rgb(0x40a02b),
            info_fg: rgb(0x1e66f5),
            dim_fg: rgb(0x9ca0b0),
        }
    }

    /// Overlay parsed hex overrides from the config's `[theme.custom]` table.
    /// Malformed values leave the slot at its palette default.
    fn apply_overrides(&mut self, custom: &ThemeColorsConfig) {
        let mut set = |slot: &mut Color, value: &Option<String>| {
            if let Some(color) = value.as_deref().and_then(parse_hex_color) {
                *slot = color;
            }
        };
        set(&mut self.tree_fg, &custom.tree_fg);
        set(&mut self.tree_selected_bg, &custom.tree_selected_bg);
        set(&mut self.tree_selected_fg, &custom.tree_selected_fg);
        set(&mut self.tree_dir_fg, &custom.tree_dir_fg);
        set(&mut self.tree_file_fg, &custom.tree_file_fg);
        set(&mut self.status_fg, &custom.status_fg);
        set(&mut self.border_fg, &custom.border_fg);
        set(&mut self.border_focused_fg, &custom.border_focused_fg);
        set(&mut self.dialog_border_fg, &custom.dialog_border_fg);
    }
}

/// Parse `"#rrggbb"` (hash optional) into a `Color`. `None` when malformed.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb)
}

/// Resolve the configured scheme to a concrete palette.
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref() {
        Some("light") => ThemeColors::light(),
        Some("custom") => {
            let mut theme = ThemeColors::dark();
            if let Some(custom) = &config.custom {
                theme.apply_overrides(custom);
            }
            theme
        }
        // "dark", unset, or anything unrecognized.
        _ => ThemeColors::dark(),
    }
}
