//! TOML configuration with layered overrides.
//!
//! Lowest to highest priority: built-in defaults, the global
//! `~/.config/mover-tui/config.toml`, a project-local `.mover-tui.toml`,
//! the file named by `$MOVER_TUI_CONFIG`, the file named by `--config`,
//! and finally individual CLI flags. Every field is optional so partial
//! layers stack cleanly.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Ask for confirmation before starting a move.
    pub confirm_move: Option<bool>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
}

impl GeneralConfig {
    fn overlay(self, over: &GeneralConfig) -> Self {
        Self {
            confirm_move: over.confirm_move.or(self.confirm_move),
            mouse: over.mouse.or(self.mouse),
        }
    }
}

/// Tree panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Use unicode icons in front of entries (false = ASCII fallback).
    pub use_icons: Option<bool>,
}

impl TreeConfig {
    fn overlay(self, over: &TreeConfig) -> Self {
        Self {
            use_icons: over.use_icons.or(self.use_icons),
        }
    }
}

/// Per-slot color overrides, all optional hex strings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub tree_dir_fg: Option<String>,
    pub tree_file_fg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub border_focused_fg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides, applied when scheme is "custom".
    pub custom: Option<ThemeColorsConfig>,
}

impl ThemeConfig {
    fn overlay(self, over: &ThemeConfig) -> Self {
        Self {
            scheme: over.scheme.clone().or(self.scheme),
            // The whole custom table is replaced, not merged per color.
            custom: over.custom.clone().or(self.custom),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tree: TreeConfig,
    pub theme: ThemeConfig,
}

/// Candidate config files, highest priority first. The `--config` path is
/// handled separately by `load`.
fn config_candidates() -> Vec<PathBuf> {
    let env_file = std::env::var("MOVER_TUI_CONFIG").ok().map(PathBuf::from);
    let local = std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".mover-tui.toml"));
    let global = dirs::config_dir().map(|dir| dir.join("mover-tui").join("config.toml"));
    [env_file, local, global].into_iter().flatten().collect()
}

/// Read and parse one TOML layer. A missing file is silently skipped; a
/// malformed one is skipped with a warning on stderr (the TUI has not
/// started yet at load time).
fn read_config(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content)
        .map_err(|e| {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
        })
        .ok()
}

impl AppConfig {
    /// Layer `over` on top of `self`; `over`'s `Some` values win.
    pub fn merge(self, over: &AppConfig) -> AppConfig {
        AppConfig {
            general: self.general.overlay(&over.general),
            tree: self.tree.overlay(&over.tree),
            theme: self.theme.overlay(&over.theme),
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit file from `--config`; `cli_overrides`
    /// is a partial config built from the other CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = config_candidates()
            .iter()
            .rev()
            .filter_map(|path| read_config(path))
            .fold(AppConfig::default(), |layered, file| layered.merge(&file));

        if let Some(file) = cli_config_path.and_then(read_config) {
            config = config.merge(&file);
        }
        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }
        config
    }

    // ── Getters with built-in defaults ───────────────────────────────────────

    /// Whether to confirm before starting a move.
    pub fn confirm_move(&self) -> bool {
        self.general.confirm_move.unwrap_or(true)
    }

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    /// Whether to use unicode icons.
    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(true)
    }
}
