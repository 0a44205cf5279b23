use std::{env, fs, path::Path, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_CATALOGUE_URL: &str = "https://podcast-api.netlify.app";
pub const DEFAULT_DATA_DIR: &str = ".casthour";
pub const LOCAL_DB_FILE: &str = "casthour.db";
pub const CONFIG_ENV: &str = "CASTHOUR_CONFIG";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub catalogue_base_url: String,
    pub data_dir: PathBuf,
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalogue_base_url: DEFAULT_CATALOGUE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: format!("casthour/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    pub fn local_db_path(&self) -> PathBuf {
        self.data_dir.join(LOCAL_DB_FILE)
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "api_url")]
    catalogue_base_url: Option<String>,
    data_dir: Option<String>,
    http_timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

/// `config.json` in the working directory, unless `CASTHOUR_CONFIG` points elsewhere.
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

pub fn load_config() -> AppConfig {
    load_config_from(&config_path())
}

pub fn load_config_from(cfg_path: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();

    match fs::read_to_string(cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if let Some(url) = parsed.catalogue_base_url {
                    let url = url.trim().trim_end_matches('/');
                    if url.is_empty() {
                        warn!("Empty catalogue_base_url in {}; keeping default.", cfg_path.display());
                    } else {
                        cfg.catalogue_base_url = url.to_string();
                    }
                    if raw.contains("\"api_url\"") {
                        warn!("`api_url` is deprecated; rename it to `catalogue_base_url`.");
                    }
                }
                if let Some(dir) = parsed.data_dir {
                    cfg.data_dir = PathBuf::from(dir);
                }
                if let Some(secs) = parsed.http_timeout_secs {
                    cfg.http_timeout_secs = secs.clamp(1, 300);
                }
                if let Some(ua) = parsed.user_agent.filter(|s| !s.trim().is_empty()) {
                    cfg.user_agent = ua;
                }
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse {} ({}). Using defaults.", cfg_path.display(), err);
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", cfg_path.display());
        }
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.json"));
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.catalogue_base_url, DEFAULT_CATALOGUE_URL);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let file = write_config(r#"{ "catalogue_base_url": "http://localhost:9000/", "http_timeout_secs": 0 }"#);
        let cfg = load_config_from(file.path());
        assert_eq!(cfg.catalogue_base_url, "http://localhost:9000");
        assert_eq!(cfg.http_timeout_secs, 1);
        assert_eq!(cfg.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn legacy_api_url_alias_is_accepted() {
        let file = write_config(r#"{ "api_url": "http://example.test" }"#);
        assert_eq!(load_config_from(file.path()).catalogue_base_url, "http://example.test");
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let file = write_config("not json at all");
        assert_eq!(load_config_from(file.path()), AppConfig::default());
    }

    #[test]
    fn db_path_lives_in_data_dir() {
        let cfg = AppConfig {
            data_dir: PathBuf::from("/tmp/ch"),
            ..AppConfig::default()
        };
        assert_eq!(cfg.local_db_path(), PathBuf::from("/tmp/ch").join(LOCAL_DB_FILE));
    }
}
