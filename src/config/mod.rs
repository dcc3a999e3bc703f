use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod state;

pub const CONFIG_FILE_NAME: &str = "mealsheet.conf";
pub const STATE_FILE_NAME: &str = "state.json";
pub const AUDIT_DB_NAME: &str = "mealsheet.sqlite";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// JSON file holding the active spreadsheet id
    pub state_file: String,
    /// SQLite database holding the internal audit log
    pub database: String,
    /// Telegram user ids allowed to run `/update`
    #[serde(default)]
    pub admin_ids: Vec<i64>,
    /// Zero-based worksheet index inside the spreadsheet (1 = second tab)
    #[serde(default = "default_worksheet_index")]
    pub worksheet_index: usize,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    #[serde(default = "default_sheets_api_url")]
    pub sheets_api_url: String,
    #[serde(default = "default_telegram_token_env")]
    pub telegram_token_env: String,
    #[serde(default = "default_sheets_token_env")]
    pub sheets_token_env: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_worksheet_index() -> usize {
    1
}
fn default_poll_timeout() -> u64 {
    30
}
fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}
fn default_sheets_api_url() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}
fn default_telegram_token_env() -> String {
    "TELEGRAM_BOT_TOKEN".to_string()
}
fn default_sheets_token_env() -> String {
    "GOOGLE_SHEETS_TOKEN".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Defaults for a configuration rooted at `dir`
    pub fn with_dir(dir: &Path) -> Self {
        Self {
            state_file: dir.join(STATE_FILE_NAME).to_string_lossy().to_string(),
            database: dir.join(AUDIT_DB_NAME).to_string_lossy().to_string(),
            admin_ids: Vec::new(),
            worksheet_index: default_worksheet_index(),
            poll_timeout_secs: default_poll_timeout(),
            telegram_api_url: default_telegram_api_url(),
            sheets_api_url: default_sheets_api_url(),
            telegram_token_env: default_telegram_token_env(),
            sheets_token_env: default_sheets_token_env(),
            log_level: default_log_level(),
        }
    }

    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mealsheet")
    }

    /// Return the full path of the config file inside `dir`
    pub fn config_file(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Load configuration from `dir`, or return defaults if the file is missing
    pub fn load(dir: &Path) -> AppResult<Self> {
        let path = Self::config_file(dir);

        if !path.exists() {
            return Ok(Self::with_dir(dir));
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(cfg)
    }

    /// Write the configuration to `dir`
    pub fn save(&self, dir: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(Self::config_file(dir)).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// Admin allow-list as a set
    pub fn admins(&self) -> HashSet<i64> {
        self.admin_ids.iter().copied().collect()
    }

    /// Initialize configuration, state and audit files inside `dir`
    pub fn init_all(dir: &Path, is_test: bool) -> AppResult<Self> {
        fs::create_dir_all(dir)?;

        let config = if Self::config_file(dir).exists() {
            Self::load(dir)?
        } else {
            Self::with_dir(dir)
        };

        if !is_test {
            config.save(dir)?;
        }

        // Never clobber an already linked sheet
        let state_path = Path::new(&config.state_file);
        if !state_path.exists() {
            state::JsonStateFile::new(state_path).write_empty()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let yaml = "state_file: /tmp/s.json\ndatabase: /tmp/a.sqlite\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.worksheet_index, 1);
        assert_eq!(cfg.poll_timeout_secs, 30);
        assert!(cfg.admin_ids.is_empty());
        assert_eq!(cfg.telegram_token_env, "TELEGRAM_BOT_TOKEN");
    }

    #[test]
    fn save_then_load_keeps_admins() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::with_dir(dir.path());
        cfg.admin_ids = vec![123456789, 42];
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, cfg);
        assert!(loaded.admins().contains(&42));
    }

    #[test]
    fn init_all_creates_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::init_all(dir.path(), false).unwrap();
        assert!(Config::config_file(dir.path()).exists());
        assert!(Path::new(&cfg.state_file).exists());
    }
}
