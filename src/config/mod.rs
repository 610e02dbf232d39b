mod farmer;
mod settings;
mod state;

pub use farmer::Farmer;
pub use settings::{Config, Cooperative, MilkSettings, PdfSettings, TipsSettings};
pub use state::{Counter, MilkDelivery, Payment, Quality, State};

use crate::error::{MaziwaError, Result};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.maziwa/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "maziwa") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.maziwa/
    let home = dirs_home().ok_or_else(|| {
        MaziwaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".maziwa"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs_home() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Resolve the PDF output directory: expand ~, anchor relative paths at
/// the config directory.
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(MaziwaError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| MaziwaError::ConfigParse { path, source: e })
}

/// Save config.toml (used by set-price)
pub fn save_config(config_dir: &Path, config: &Config) -> Result<()> {
    let path = config_dir.join("config.toml");
    let content = toml::to_string_pretty(config).map_err(|e| {
        MaziwaError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Load farmers.toml keyed by farmer id. BTreeMap keeps listings and the
/// rewritten file in stable id order.
pub fn load_farmers(config_dir: &Path) -> Result<BTreeMap<String, Farmer>> {
    let path = config_dir.join("farmers.toml");
    if !path.exists() {
        return Err(MaziwaError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| MaziwaError::ConfigParse { path, source: e })
}

/// Save farmers.toml (used by register)
pub fn save_farmers(config_dir: &Path, farmers: &BTreeMap<String, Farmer>) -> Result<()> {
    let path = config_dir.join("farmers.toml");
    let content = toml::to_string_pretty(farmers).map_err(|e| {
        MaziwaError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Load state.toml (creates default if missing)
pub fn load_state(config_dir: &Path) -> Result<State> {
    let path = config_dir.join("state.toml");
    if !path.exists() {
        return Ok(State::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| MaziwaError::ConfigParse { path, source: e })
}

/// Save state.toml
pub fn save_state(config_dir: &Path, state: &State) -> Result<()> {
    let path = config_dir.join("state.toml");
    let content = toml::to_string_pretty(state).map_err(|e| {
        MaziwaError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[cooperative]
name = "Your Cooperative Name"
location = "Mbarara"
# phone = "+256-700-000000"        # optional
# email = "office@yourcoop.org"    # optional

[milk]
price_per_liter = 1200.0
currency = "UGX"
currency_symbol = "UGX "

[pdf]
output_dir = "~/.maziwa/output"

# [tips]
# model = "gemini-1.5-flash"
"#;

/// Template content for farmers.toml
pub const FARMERS_TEMPLATE: &str = r#"# Register farmers here or with 'maziwa register'. The table name
# (e.g., [FARM001]) is the farmer id used by the other commands.
#
# Example:
#   maziwa record --farmer FARM001 --quantity 25 --quality good

[FARM001]
name = "John Doe"
phone = "0700123456"
location = "Mbarara"
join_date = "2023-01-15"
active = true
"#;
