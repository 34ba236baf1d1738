//! Shared configuration for Mediola tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `mediola_core::GatewayConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mediola_core::GatewayConfig;
use mediola_core::config::{DEFAULT_SCAN_INTERVAL_SECS, validate_scan_interval};

/// Keyring service name; entries are keyed `<profile>/password`.
pub const KEYRING_SERVICE: &str = "mediola";

/// Environment variable consulted for the gateway password.
pub const PASSWORD_ENV: &str = "MEDIOLA_PASSWORD";

/// Environment variable consulted for the gateway user.
pub const USERNAME_ENV: &str = "MEDIOLA_USERNAME";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "MEDIOLA_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named gateway profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit override, then `default_profile`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Polling interval in seconds.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            scan_interval: default_scan_interval(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL_SECS
}
fn default_timeout() -> u64 {
    10
}

/// A named gateway profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Gateway host or `host:port` (e.g., "192.168.1.50").
    pub host: String,

    /// Gateway user (`XC_USER`).
    pub username: Option<String>,

    /// Gateway password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override the polling interval.
    pub scan_interval: Option<u64>,

    /// Override the request timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `MEDIOLA_CONFIG`, then platform conventions.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "mediola", "mediola").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mediola");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment. A missing file yields defaults.
///
/// Environment keys use `__` for nesting, e.g.
/// `MEDIOLA_DEFAULTS__SCAN_INTERVAL=30`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MEDIOLA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the gateway user: profile, then `MEDIOLA_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the gateway password from the credential chain.
///
/// Order: `password_env` variable, `MEDIOLA_PASSWORD`, system keyring,
/// plaintext in the profile.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_password,
    )
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(pw));
    }

    // 2. Global env var
    if let Some(pw) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Some(pw) = keyring(profile_name) {
        return Ok(SecretString::from(pw));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name).ok()?.get_password().ok()
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

impl Profile {
    /// Effective polling interval in seconds.
    pub fn scan_interval_secs(&self, defaults: &Defaults) -> u64 {
        self.scan_interval.unwrap_or(defaults.scan_interval)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "host".into(),
                reason: "must not be empty".into(),
            });
        }
        if let Some(secs) = self.scan_interval {
            validate_scan_interval(secs).map_err(|e| ConfigError::Validation {
                field: "scan_interval".into(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Build a `GatewayConfig` from a profile, without CLI flag overrides.
pub fn profile_to_gateway_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<GatewayConfig, ConfigError> {
    profile.validate()?;
    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    let scan_interval = profile.scan_interval_secs(defaults);
    validate_scan_interval(scan_interval).map_err(|e| ConfigError::Validation {
        field: "scan_interval".into(),
        reason: e.to_string(),
    })?;
    let timeout = profile.timeout.unwrap_or(defaults.timeout);

    Ok(GatewayConfig::new(profile.host.clone(), username, password)
        .with_scan_interval(Duration::from_secs(scan_interval))
        .with_timeout(Duration::from_secs(timeout)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
scan_interval = 20

[profiles.home]
host = "192.168.1.50"
username = "admin"
password = "plain"

[profiles.cabin]
host = "10.0.0.8:8080"
scan_interval = 60
password_env = "CABIN_GATEWAY_PW"
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_profiles_from_toml() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("home"));
        assert_eq!(cfg.defaults.scan_interval, 20);
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.profiles.len(), 2);
        assert_eq!(cfg.profile("cabin").unwrap().scan_interval, Some(60));
        assert_eq!(cfg.active_profile_name(None), "home");
        assert_eq!(cfg.active_profile_name(Some("cabin")), "cabin");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.scan_interval, 15);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn unknown_profile() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("nope"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                host: "gateway.local".into(),
                username: Some("admin".into()),
                ..Profile::default()
            },
        );

        save_config_to(&path, &cfg).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn scan_interval_out_of_range_is_rejected() {
        let profile = Profile {
            host: "192.168.1.50".into(),
            scan_interval: Some(4),
            ..Profile::default()
        };
        let err = profile.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation { ref field, .. } if field == "scan_interval"),
            "{err:?}"
        );

        let ok = Profile {
            scan_interval: Some(300),
            ..profile
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(Profile::default().validate().is_err());
    }

    #[test]
    fn password_chain_order() {
        let profile = Profile {
            host: "h".into(),
            password: Some("plain".into()),
            password_env: Some("CUSTOM_PW".into()),
            ..Profile::default()
        };
        let none = |_: &str| None;

        let custom = |name: &str| (name == "CUSTOM_PW").then(|| "custom".to_string());
        let pw = resolve_password_with(&profile, "p", custom, none).unwrap();
        assert_eq!(pw.expose_secret(), "custom");

        let global = |name: &str| (name == PASSWORD_ENV).then(|| "global".to_string());
        let pw = resolve_password_with(&profile, "p", global, none).unwrap();
        assert_eq!(pw.expose_secret(), "global");

        let stored = |_: &str| Some("keyring".to_string());
        let pw = resolve_password_with(&profile, "p", none, stored).unwrap();
        assert_eq!(pw.expose_secret(), "keyring");

        let pw = resolve_password_with(&profile, "p", none, none).unwrap();
        assert_eq!(pw.expose_secret(), "plain");
    }

    #[test]
    fn no_password_anywhere() {
        let profile = Profile {
            host: "h".into(),
            ..Profile::default()
        };
        let none = |_: &str| None;
        let err = resolve_password_with(&profile, "p", none, none).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }
}
