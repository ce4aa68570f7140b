use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use zapper_core::Timing;

const APP_DIR: &str = "zapper";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_HISTORY_PATH: &str = "PyWhatKit_DB.txt";
pub const DEFAULT_MESSAGE_PATH: &str = "mensagens/mensagem_padrao.txt";
pub const DEFAULT_ROSTER_PATH: &str = "dados/clientes.csv";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub timing: Timing,
    pub paths: PathsConfig,
    pub delivery: DeliveryConfig,
}

/// File locations. `log` stays `None` unless configured so the store can
/// fall back to its data directory.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub log: Option<PathBuf>,
    pub history: PathBuf,
    pub message: PathBuf,
    pub roster: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log: None,
            history: PathBuf::from(DEFAULT_HISTORY_PATH),
            message: PathBuf::from(DEFAULT_MESSAGE_PATH),
            roster: PathBuf::from(DEFAULT_ROSTER_PATH),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryConfig {
    pub program: Option<String>,
    pub args: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid delivery.program value: must not be blank")]
    EmptyDeliveryProgram,
    #[error("invalid paths.{field} value: must not be empty")]
    EmptyPath { field: &'static str },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    timing: Option<TimingFile>,
    paths: Option<PathsFile>,
    delivery: Option<DeliveryFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimingFile {
    wait_seconds: Option<u64>,
    interval_seconds: Option<u64>,
    close_seconds: Option<u64>,
    tab_close: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PathsFile {
    log: Option<PathBuf>,
    history: Option<PathBuf>,
    message: Option<PathBuf>,
    roster: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeliveryFile {
    program: Option<String>,
    args: Option<Vec<String>>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(timing) = parsed.timing {
        if let Some(wait) = timing.wait_seconds {
            config.timing.wait_seconds = wait;
        }
        if let Some(interval) = timing.interval_seconds {
            config.timing.interval_seconds = interval;
        }
        if let Some(close) = timing.close_seconds {
            config.timing.close_seconds = close;
        }
        if let Some(tab_close) = timing.tab_close {
            config.timing.tab_close = tab_close;
        }
        config.timing = config.timing.clamped();
    }

    if let Some(paths) = parsed.paths {
        if let Some(log) = paths.log {
            config.paths.log = Some(non_empty_path(log, "log")?);
        }
        if let Some(history) = paths.history {
            config.paths.history = non_empty_path(history, "history")?;
        }
        if let Some(message) = paths.message {
            config.paths.message = non_empty_path(message, "message")?;
        }
        if let Some(roster) = paths.roster {
            config.paths.roster = non_empty_path(roster, "roster")?;
        }
    }

    if let Some(delivery) = parsed.delivery {
        if let Some(program) = delivery.program {
            let program = program.trim();
            if program.is_empty() {
                return Err(ConfigError::EmptyDeliveryProgram);
            }
            config.delivery.program = Some(program.to_string());
        }
        if let Some(args) = delivery.args {
            config.delivery.args = args;
        }
    }

    Ok(config)
}

fn non_empty_path(path: PathBuf, field: &'static str) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath { field });
    }
    Ok(path)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, ConfigError, ConfigFile, DeliveryFile, PathsFile, TimingFile,
    };
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use zapper_core::timing::{MIN_INTERVAL_SECONDS, MIN_WAIT_SECONDS};

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            timing: Some(TimingFile {
                wait_seconds: Some(20),
                interval_seconds: Some(10),
                close_seconds: Some(1),
                tab_close: Some(false),
            }),
            paths: Some(PathsFile {
                log: Some(PathBuf::from("logs/sent.jsonl")),
                history: None,
                message: Some(PathBuf::from("msg.txt")),
                roster: None,
            }),
            delivery: Some(DeliveryFile {
                program: Some(" python3 ".to_string()),
                args: Some(vec!["send.py".to_string(), "{number}".to_string()]),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.timing.wait_seconds, 20);
        assert_eq!(merged.timing.interval_seconds, 10);
        assert_eq!(merged.timing.close_seconds, 1);
        assert!(!merged.timing.tab_close);
        assert_eq!(merged.paths.log, Some(PathBuf::from("logs/sent.jsonl")));
        assert_eq!(merged.paths.message, PathBuf::from("msg.txt"));
        assert_eq!(merged.paths.roster, PathBuf::from(super::DEFAULT_ROSTER_PATH));
        assert_eq!(merged.delivery.program.as_deref(), Some("python3"));
        assert_eq!(merged.delivery.args.len(), 2);
    }

    #[test]
    fn merge_config_clamps_timing() {
        let parsed = ConfigFile {
            timing: Some(TimingFile {
                wait_seconds: Some(1),
                interval_seconds: Some(0),
                ..TimingFile::default()
            }),
            ..ConfigFile::default()
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.timing.wait_seconds, MIN_WAIT_SECONDS);
        assert_eq!(merged.timing.interval_seconds, MIN_INTERVAL_SECONDS);
    }

    #[test]
    fn merge_config_rejects_blank_program() {
        let parsed = ConfigFile {
            delivery: Some(DeliveryFile {
                program: Some("   ".to_string()),
                args: None,
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDeliveryProgram));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
    }

    #[test]
    fn load_at_path_skips_missing_optional_file() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        assert!(load_at_path(&missing, false).expect("load").is_none());
    }

    #[test]
    fn delivery_stays_unset_without_a_delivery_section() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[timing]\nwait_seconds = 15\n").expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert!(config.delivery.program.is_none());
        assert!(config.delivery.args.is_empty());

        let defaults = super::AppConfig::default();
        assert!(defaults.delivery.program.is_none());
        assert!(defaults.delivery.args.is_empty());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[timing]\nwait_seconds = 15\n[paths]\nhistory = \"db.txt\"\n[delivery]\nprogram = \"helper\"\nargs = [\"{number}\", \"{message}\"]\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.timing.wait_seconds, 15);
        assert_eq!(config.paths.history, PathBuf::from("db.txt"));
        assert_eq!(config.delivery.program.as_deref(), Some("helper"));
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[timing]\nsnooze = 3\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn load_at_path_rejects_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "").expect("write config");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&path, perms).expect("chmod");

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }
}
