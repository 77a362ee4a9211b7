use directories::ProjectDirs;
use std::path::PathBuf;

pub const CONFIG_ENV: &str = "BIOLOGREEN_CONFIG";
pub const CONFIG_FILE_NAME: &str = "biologreen.toml";

/// Per-user config file, e.g. `~/.config/biologreen/biologreen.toml` on Linux.
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "biologreen", "biologreen")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Candidate config locations, highest priority first.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        if !explicit.is_empty() {
            paths.push(PathBuf::from(explicit));
        }
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    if let Some(user) = user_config_file() {
        paths.push(user);
    }
    paths
}
