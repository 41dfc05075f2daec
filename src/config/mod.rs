use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "base_url")]
    pub api_url: Option<String>,
    pub timeout: Option<usize>,
    pub proxy: Option<String>,
    pub rate: Option<u32>,
    pub language: Option<String>,
    pub batch_size: Option<u32>,
    pub max_id: Option<u32>,
    pub scroll_threshold: Option<f64>,
    pub scroll_debounce_ms: Option<u64>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".pokegrid").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# pokegrid config
#
# Location (default):
#   ~/.pokegrid/config.yml

# API
api_url: https://pokeapi.co/api/v2
timeout: 10
# Requests per second (0 disables limiting)
rate: 20
# Language tag used to pick the species text
language: en
# proxy: http://127.0.0.1:8080

# Catalog
batch_size: 20
max_id: 1025

# Scrolling
scroll_threshold: 800
scroll_debounce_ms: 100

# Session (optional)
# category: Fire
# search: chu

# Output (optional)
# output: ./catalog.html
# output_format: html

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}
