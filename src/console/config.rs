//! Configuration for the console.
//!
//! Settings come from command-line arguments (parsed with `arrrg`), the
//! environment, and an optional YAML file, in that order of precedence.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};
use crate::session::TOKEN_FILE_NAME;

/// Name of the directory under `$HOME` used when `QAPAL_HOME` is unset.
const HOME_DIR_NAME: &str = ".qapal";

/// Name of the config file looked up in the qapal home directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Command-line arguments for the qapal console.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ConsoleArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend base URL (default: http://localhost:8000/api/)", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 30)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Where to persist the session token.
    #[arrrg(optional, "File holding the session token", "PATH")]
    pub token_file: Option<String>,

    /// YAML configuration file.
    #[arrrg(optional, "YAML configuration file", "PATH")]
    pub config: Option<String>,

    /// Keep the session token in memory only.
    #[arrrg(flag, "Do not persist the session token")]
    pub no_persist: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Contents of the optional YAML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Backend base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Where to persist the session token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,

    /// Whether to use ANSI colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl ConfigFile {
    /// Read a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|err| Error::io(format!("cannot read {}: {err}", path.display()), err))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Resolved configuration for a console run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Backend base URL.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Token file; `None` keeps the token in memory only.
    pub token_path: Option<PathBuf>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ConsoleConfig {
    /// Creates a configuration with default values and no token file.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token_path: None,
            use_color: true,
        }
    }

    /// Resolve arguments against the process environment.
    pub fn from_args(args: ConsoleArgs) -> Result<Self> {
        Self::resolve(args, |name| std::env::var(name).ok())
    }

    /// Resolve arguments against the environment lookup `env`.
    ///
    /// An explicit `--config` file must exist; the default
    /// `<qapal home>/config.yaml` is read only when present.
    pub fn resolve(args: ConsoleArgs, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let home = qapal_home(&env);
        let file = match (&args.config, &home) {
            (Some(path), _) => ConfigFile::from_file(path)?,
            (None, Some(home)) if home.join(CONFIG_FILE_NAME).is_file() => {
                ConfigFile::from_file(home.join(CONFIG_FILE_NAME))?
            }
            _ => ConfigFile::default(),
        };

        let base_url = args
            .base_url
            .or_else(|| env("QAPAL_BASE_URL"))
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = args
            .timeout_secs
            .or(file.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(Error::validation(
                "timeout must be at least one second",
                Some("timeout_secs".to_string()),
            ));
        }
        let token_path = if args.no_persist {
            None
        } else {
            args.token_file
                .map(PathBuf::from)
                .or(file.token_file)
                .or_else(|| home.map(|h| h.join(TOKEN_FILE_NAME)))
        };
        let use_color = !args.no_color && file.color.unwrap_or(true);

        Ok(Self {
            base_url,
            timeout,
            token_path,
            use_color,
        })
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `$QAPAL_HOME`, else `$HOME/.qapal`.
fn qapal_home(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    env("QAPAL_HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            env("HOME")
                .filter(|h| !h.is_empty())
                .map(|h| PathBuf::from(h).join(HOME_DIR_NAME))
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = ConsoleConfig::resolve(ConsoleArgs::default(), env_of(&[])).unwrap();
        assert_eq!(config, ConsoleConfig::new());
    }

    #[test]
    fn token_lives_under_home() {
        let config =
            ConsoleConfig::resolve(ConsoleArgs::default(), env_of(&[("HOME", "/home/pal")]))
                .unwrap();
        assert_eq!(
            config.token_path,
            Some(PathBuf::from("/home/pal/.qapal/token"))
        );

        let config = ConsoleConfig::resolve(
            ConsoleArgs::default(),
            env_of(&[("HOME", "/home/pal"), ("QAPAL_HOME", "/srv/qapal")]),
        )
        .unwrap();
        assert_eq!(config.token_path, Some(PathBuf::from("/srv/qapal/token")));
    }

    #[test]
    fn args_beat_env_beat_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qapal.yaml");
        fs::write(
            &path,
            "base_url: http://file.example/api/\ntimeout_secs: 5\ncolor: false\n",
        )
        .unwrap();

        let args = ConsoleArgs {
            config: Some(path.display().to_string()),
            ..ConsoleArgs::default()
        };
        let config = ConsoleConfig::resolve(
            args,
            env_of(&[("QAPAL_BASE_URL", "http://env.example/api/")]),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://env.example/api/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.use_color);

        let args = ConsoleArgs {
            base_url: Some("http://arg.example/api/".to_string()),
            timeout_secs: Some(9),
            config: Some(path.display().to_string()),
            ..ConsoleArgs::default()
        };
        let config = ConsoleConfig::resolve(
            args,
            env_of(&[("QAPAL_BASE_URL", "http://env.example/api/")]),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://arg.example/api/");
        assert_eq!(config.timeout, Duration::from_secs(9));
    }

    #[test]
    fn default_config_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().display().to_string();
        let config =
            ConsoleConfig::resolve(ConsoleArgs::default(), env_of(&[("QAPAL_HOME", &home)]))
                .unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        fs::write(dir.path().join(CONFIG_FILE_NAME), "token_file: /tmp/qapal-token\n").unwrap();
        let config =
            ConsoleConfig::resolve(ConsoleArgs::default(), env_of(&[("QAPAL_HOME", &home)]))
                .unwrap();
        assert_eq!(config.token_path, Some(PathBuf::from("/tmp/qapal-token")));
    }

    #[test]
    fn no_persist_drops_token_file() {
        let args = ConsoleArgs {
            token_file: Some("/tmp/token".to_string()),
            no_persist: true,
            ..ConsoleArgs::default()
        };
        let config = ConsoleConfig::resolve(args, env_of(&[("HOME", "/home/pal")])).unwrap();
        assert_eq!(config.token_path, None);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let args = ConsoleArgs {
            config: Some("/definitely/not/here.yaml".to_string()),
            ..ConsoleArgs::default()
        };
        let err = ConsoleConfig::resolve(args, env_of(&[])).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qapal.yaml");
        fs::write(&path, "base_ur1: typo\n").unwrap();
        let err = ConfigFile::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let args = ConsoleArgs {
            timeout_secs: Some(0),
            ..ConsoleArgs::default()
        };
        assert!(
            ConsoleConfig::resolve(args, env_of(&[]))
                .unwrap_err()
                .is_validation()
        );
    }
}
