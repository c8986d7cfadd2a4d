use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Which optional fields a result row shows. The name is always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFieldSelection {
    pub set: bool,
    pub mana_cost: bool,
    pub type_line: bool,
    pub ability: bool,
    pub power_toughness: bool,
}

impl Default for DisplayFieldSelection {
    fn default() -> Self {
        Self {
            set: true,
            mana_cost: true,
            type_line: true,
            ability: true,
            power_toughness: true,
        }
    }
}

impl DisplayFieldSelection {
    pub fn none() -> Self {
        Self {
            set: false,
            mana_cost: false,
            type_line: false,
            ability: false,
            power_toughness: false,
        }
    }
}

/// Source of the user's display preferences.
pub trait PreferenceStore {
    fn display_fields(&self) -> DisplayFieldSelection;
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub display: Option<DisplayConfig>,
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub set: Option<bool>,
    pub mana_cost: Option<bool>,
    pub type_line: Option<bool>,
    pub ability: Option<bool>,
    pub power_toughness: Option<bool>,
    pub color: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub cards_path: Option<String>,
}

impl ConfigFile {
    pub fn cards_path(&self) -> Option<PathBuf> {
        self.store
            .as_ref()
            .and_then(|s| s.cards_path.as_deref())
            .map(PathBuf::from)
    }

    pub fn color(&self) -> Option<bool> {
        self.display.as_ref().and_then(|d| d.color)
    }
}

impl PreferenceStore for ConfigFile {
    fn display_fields(&self) -> DisplayFieldSelection {
        let d = self.display.clone().unwrap_or_default();
        DisplayFieldSelection {
            set: d.set.unwrap_or(true),
            mana_cost: d.mana_cost.unwrap_or(true),
            type_line: d.type_line.unwrap_or(true),
            ability: d.ability.unwrap_or(true),
            power_toughness: d.power_toughness.unwrap_or(true),
        }
    }
}

/// Platform config directory path: `<config_dir>/familiar/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("familiar").join("config.toml"))
}

/// Load config by cascading CWD `.familiar.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".familiar.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let bd = base.display.unwrap_or_default();
    let od = overlay.display.unwrap_or_default();
    let bs = base.store.unwrap_or_default();
    let os = overlay.store.unwrap_or_default();

    ConfigFile {
        display: Some(DisplayConfig {
            set: od.set.or(bd.set),
            mana_cost: od.mana_cost.or(bd.mana_cost),
            type_line: od.type_line.or(bd.type_line),
            ability: od.ability.or(bd.ability),
            power_toughness: od.power_toughness.or(bd.power_toughness),
            color: od.color.or(bd.color),
        }),
        store: Some(StoreConfig {
            cards_path: os.cards_path.or(bs.cards_path),
        }),
    }
}

/// Save the config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to_path(config, &path)?;
    Ok(path)
}

pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
