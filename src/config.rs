use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use tracing::warn;

pub const APP_DIR: &str = "ringtimer";
pub const CONFIG_FILE: &str = "config.json";
pub const COMMANDS_FILE: &str = "commands.jsonl";
pub const LOG_FILE: &str = "ringtimer.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] io::Error),
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub notifications_enabled: bool,
    pub toast_secs: u64,
    pub commands_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "default".into(),
            notifications_enabled: true,
            toast_secs: 5,
            commands_path: None,
        }
    }
}

impl Config {
    pub fn load(dir: &Path) -> Self {
        load_json(&dir.join(CONFIG_FILE))
    }

    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir)?;
        save_json(&dir.join(CONFIG_FILE), self)
    }
}

/// Working-directory data dir, created on first use.
pub fn app_dir() -> PathBuf {
    let path = PathBuf::from(".").join(APP_DIR);
    if let Err(err) = fs::create_dir_all(&path) {
        warn!(error = %err, path = %path.display(), "could not create data directory");
    }
    path
}

pub fn get_path(filename: &str) -> PathBuf {
    app_dir().join(filename)
}

/// Missing or unreadable files fall back to `T::default()`.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    let Ok(raw) = fs::read_to_string(path) else {
        return T::default();
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(error = %err, path = %path.display(), "ignoring malformed json, using defaults");
        T::default()
    })
}

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
    fs::write(path, serde_json::to_string_pretty(data)?)?;
    Ok(())
}
