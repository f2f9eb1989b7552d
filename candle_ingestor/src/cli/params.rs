use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use shared_utils::env::get_env_var_opt;

use crate::view::ViewState;

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_PATH_VAR: &str = "CANDLE_DASH_CONFIG";

/// Splits a comma-separated symbol list, trimming blanks.
pub fn parse_symbols(symbols: &str) -> Vec<String> {
    symbols
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The `--config` flag if given, else `$CANDLE_DASH_CONFIG` if set.
pub fn resolve_config_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| get_env_var_opt(CONFIG_PATH_VAR).map(PathBuf::from))
}

/// Reads a stored view state; a missing file starts from the defaults.
pub fn load_view_state(path: &Path) -> anyhow::Result<ViewState> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ViewState::default()),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read view state {}", path.display()));
        }
    };
    serde_json::from_str(&content)
        .with_context(|| format!("invalid view state in {}", path.display()))
}

pub fn save_view_state(path: &Path, state: &ViewState) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json).with_context(|| format!("failed to write view state {}", path.display()))
}
