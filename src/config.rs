//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/did-dnssec/did-dnssec.toml`
//! 3. Explicit config: `--config <path>` or `DID_DNSSEC_CONFIG`
//! 4. Environment variables: `DID_DNSSEC_*` prefix

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::record::DEFAULT_TTL;

pub const APP_NAME: &str = "did-dnssec";
pub const ENV_PREFIX: &str = "DID_DNSSEC";

/// Resolver settings for live DNS lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DnsSettings {
    /// Nameservers to query; empty means the system resolver configuration
    pub nameservers: Vec<IpAddr>,
    /// Port used with `nameservers`
    pub port: u16,
    /// Per-query timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DnsSettings {
    fn default() -> Self {
        Self {
            nameservers: vec![],
            port: 53,
            timeout_secs: 5,
        }
    }
}

/// Raw DNS settings for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDnsSettings {
    pub nameservers: Option<Vec<IpAddr>>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub ttl: Option<u32>,
    pub dns: RawDnsSettings,
}

/// Unified configuration for did-dnssec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// TTL of created records
    pub ttl: u32,
    /// DNS resolver settings
    pub dns: DnsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            dns: DnsSettings::default(),
        }
    }
}

/// Get the XDG config directory for did-dnssec.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            ttl: overlay.ttl.unwrap_or(self.ttl),
            dns: DnsSettings {
                nameservers: overlay
                    .dns
                    .nameservers
                    .clone()
                    .unwrap_or_else(|| self.dns.nameservers.clone()),
                port: overlay.dns.port.unwrap_or(self.dns.port),
                timeout_secs: overlay.dns.timeout_secs.unwrap_or(self.dns.timeout_secs),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            debug!("loading config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current.apply_env_overrides(None)
    }

    /// Apply `DID_DNSSEC_*` variables as explicit overrides.
    ///
    /// `source` replaces the process environment when given.
    /// Nested keys use `__`: `DID_DNSSEC_DNS__TIMEOUT_SECS`. Nameservers are
    /// a comma separated list.
    pub fn apply_env_overrides(
        mut self,
        source: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(source),
            )
            .build()
            .map_err(config_err)?;

        if let Some(ttl) = optional::<u32>(&config, "ttl")? {
            self.ttl = ttl;
        }
        if let Some(port) = optional::<u16>(&config, "dns.port")? {
            self.dns.port = port;
        }
        if let Some(timeout) = optional::<u64>(&config, "dns.timeout_secs")? {
            self.dns.timeout_secs = timeout;
        }
        if let Some(list) = optional::<String>(&config, "dns.nameservers")? {
            self.dns.nameservers = parse_nameservers(&list)?;
        }
        Ok(self)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# did-dnssec configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/did-dnssec/did-dnssec.toml
#   File:   --config <path> or DID_DNSSEC_CONFIG
#   Env:    DID_DNSSEC_* environment variables (explicit overrides)

# TTL of the records written by `create`
# ttl = 3600

[dns]
# Nameservers for `resolve`; empty uses the system resolver configuration
# nameservers = ["1.1.1.1", "9.9.9.9"]

# Port of the nameservers above
# port = 53

# Per-query timeout in seconds
# timeout_secs = 5
"#
        .to_string()
    }
}

/// Missing keys are None, malformed values are errors.
fn optional<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn parse_nameservers(list: &str) -> Result<Vec<IpAddr>, ApplicationError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|e| ApplicationError::Config {
                message: format!("invalid nameserver {s:?}: {e}"),
            })
        })
        .collect()
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn given_defaults_when_created_then_uses_standard_values() {
        let settings = Settings::default();
        assert_eq!(settings.ttl, 3600);
        assert_eq!(settings.dns.port, 53);
        assert_eq!(settings.dns.timeout_secs, 5);
        assert!(settings.dns.nameservers.is_empty());
    }

    #[test]
    fn given_env_vars_when_applying_overrides_then_replaces_values() {
        let settings = Settings::default()
            .apply_env_overrides(env(&[
                ("DID_DNSSEC_TTL", "300"),
                ("DID_DNSSEC_DNS__PORT", "5353"),
                ("DID_DNSSEC_DNS__TIMEOUT_SECS", "2"),
                ("DID_DNSSEC_DNS__NAMESERVERS", "192.0.2.53, 2001:db8::53"),
            ]))
            .unwrap();

        assert_eq!(settings.ttl, 300);
        assert_eq!(settings.dns.port, 5353);
        assert_eq!(settings.dns.timeout_secs, 2);
        assert_eq!(
            settings.dns.nameservers,
            vec![
                "192.0.2.53".parse::<IpAddr>().unwrap(),
                "2001:db8::53".parse::<IpAddr>().unwrap()
            ]
        );
    }

    #[test]
    fn given_invalid_env_value_when_applying_overrides_then_fails() {
        let result =
            Settings::default().apply_env_overrides(env(&[("DID_DNSSEC_DNS__NAMESERVERS", "nope")]));
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_no_env_vars_when_applying_overrides_then_keeps_values() {
        let settings = Settings::default().apply_env_overrides(env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_template_when_uncommented_then_parses() {
        let uncommented: String = Settings::template()
            .lines()
            .filter(|l| (l.starts_with("# ") && l.contains(" = ")) || l.starts_with('['))
            .map(|l| format!("{}\n", l.trim_start_matches("# ")))
            .collect();
        let raw: RawSettings = toml::from_str(&uncommented).unwrap();
        let settings = Settings::default().merge_with(&raw);
        assert_eq!(settings.ttl, 3600);
        assert_eq!(settings.dns.nameservers.len(), 2);
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips_through_toml() {
        let mut settings = Settings::default();
        settings.dns.nameservers = vec!["192.0.2.1".parse().unwrap()];
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
