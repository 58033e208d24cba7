//! Configuration loading and parameter file resolution

use crate::params::ScoringParams;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Parameter file resolution priority order:
/// 1. Explicit path argument (highest priority)
/// 2. Environment variable
/// 3. Platform config directory (`<config_dir>/qice/params.toml`)
/// 4. Compiled defaults (fallback - the inherited policy values)
pub fn resolve_params_file(
    explicit_path: Option<&str>,
    env_var_name: &str,
) -> Option<PathBuf> {
    // Priority 1: Explicit argument
    if let Some(path) = explicit_path {
        return Some(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return Some(PathBuf::from(path));
    }

    // Priority 3: Platform config directory
    if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join("qice").join("params.toml");
        if candidate.exists() {
            return Some(candidate);
        }
    }

    // Priority 4: Caller falls back to compiled defaults
    None
}

/// Load scoring parameters from a TOML file
///
/// Fields absent from the file keep their compiled defaults, so a parameter
/// file only needs to name the knobs it changes.
pub fn load_params(path: &Path) -> Result<ScoringParams> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

/// Resolve and load scoring parameters, falling back to compiled defaults
/// when no parameter file exists anywhere in the priority chain
pub fn load_params_or_default(
    explicit_path: Option<&str>,
    env_var_name: &str,
) -> Result<ScoringParams> {
    match resolve_params_file(explicit_path, env_var_name) {
        Some(path) => load_params(&path),
        None => Ok(ScoringParams::default()),
    }
}
