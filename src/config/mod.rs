use serde::{Deserialize, Serialize};

use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_API_URL: &str = "https://684e7f1bf0c9c9848d284a81.mockapi.io/mock/notes";
pub const DEFAULT_PREFERENCES_PATH: &str = "preferences.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Collection endpoint of the remote notes resource
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// File the theme preference is persisted to
    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            preferences_path: default_preferences_path(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from(DEFAULT_PREFERENCES_PATH)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

fn load_from_file(path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

fn load_from_env() -> Config {
    let mut config = Config::default();

    if let Ok(api_url) = env::var("NOTES_API_URL") {
        config.api_url = api_url;
    }
    if let Ok(path) = env::var("NOTES_PREFERENCES_PATH") {
        config.preferences_path = PathBuf::from(path);
    }

    config
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Retrieve env variable
    let config_path =
        env::var("NOTES_CLIENT_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return load_from_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, loading configuration from environment variables and defaults"
    );
    Ok(load_from_env())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "api_url: http://localhost:8000/notes\npreferences_path: /tmp/prefs.yaml\n",
        )
        .unwrap();

        let config = load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000/notes");
        assert_eq!(config.preferences_path, PathBuf::from("/tmp/prefs.yaml"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api_url: http://localhost:8000/notes\n").unwrap();

        let config = load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.preferences_path, PathBuf::from(DEFAULT_PREFERENCES_PATH));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api_url: [unterminated\n").unwrap();

        assert!(matches!(
            load_from_file(path.to_str().unwrap()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(matches!(
            load_from_file("/definitely/not/here.yaml"),
            Err(ConfigError::Read { .. })
        ));
    }
}
