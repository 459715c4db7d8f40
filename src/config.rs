// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Daemon configuration.
//!
//! The configuration file is YAML with three sections. Section names are
//! case-sensitive; option names are not. Unknown sections and options are
//! ignored, unset options keep their defaults, and everything is validated
//! once when the file is loaded.
//!
//! ```yaml
//! Server:
//!   bind: tcp://127.0.0.1:4242
//! NSDMaster:
//!   clientcert: /etc/nsd/nsd_control.pem
//!   clientkey: /etc/nsd/nsd_control.key
//!   servercert: /etc/nsd/nsd_server.pem
//!   controlhost: localhost
//!   controlport: 8952
//! Zones:
//!   dir: /var/lib/nsd/zones
//!   pattern: slave
//!   filepattern: "%1/%2/%s.zone"
//! ```
//!
//! | Section | Option | Default |
//! |---------|--------|---------|
//! | `Server` | `bind` | unset (required to serve) |
//! | `NSDMaster` | `clientcert`, `clientkey` | required |
//! | `NSDMaster` | `servercert` | unset (server certificate not pinned) |
//! | `NSDMaster` | `controlhost` | `localhost` |
//! | `NSDMaster` | `controlport` | `8952` |
//! | `Zones` | `dir`, `filepattern` | required |
//! | `Zones` | `pattern` | unset |

use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{BIND_TCP_SCHEME, DEFAULT_CONTROL_HOST, DEFAULT_CONTROL_PORT};
use crate::errors::ConfigError;
use crate::file_pattern::FilePattern;

const SECTION_SERVER: &str = "Server";
const SECTION_NSD_MASTER: &str = "NSDMaster";
const SECTION_ZONES: &str = "Zones";

/// Known sections and the options each one accepts (lowercase)
static KNOWN_OPTIONS: [(&str, &[&str]); 3] = [
    (SECTION_SERVER, &["bind"]),
    (
        SECTION_NSD_MASTER,
        &["clientcert", "clientkey", "servercert", "controlhost", "controlport"],
    ),
    (SECTION_ZONES, &["dir", "pattern", "filepattern"]),
];

/// `Server` section: where the RPC endpoint listens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// `host:port`, `tcp://host:port` or `tcp://*:port`
    pub bind: Option<String>,
}

impl ServerConfig {
    /// Normalize `bind` into a `host:port` string usable by a TCP listener.
    ///
    /// `tcp://*:4242` becomes `0.0.0.0:4242`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bind` is unset or has no numeric port.
    pub fn listen_address(&self) -> Result<String, ConfigError> {
        let bind = self.bind.as_deref().ok_or(ConfigError::MissingOption {
            section: SECTION_SERVER,
            option: "bind",
        })?;

        let address = bind.strip_prefix(BIND_TCP_SCHEME).unwrap_or(bind);
        let address = match address.strip_prefix("*:") {
            Some(port) => format!("0.0.0.0:{port}"),
            None => address.to_string(),
        };

        match address.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(address),
            _ => Err(ConfigError::InvalidBind(bind.to_string())),
        }
    }
}

/// `NSDMaster` section: how to reach NSD's control socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsdMasterConfig {
    /// PEM client certificate (`nsd_control.pem`)
    pub client_cert: PathBuf,
    /// PEM client key (`nsd_control.key`)
    pub client_key: PathBuf,
    /// PEM server certificate to pin (`nsd_server.pem`)
    pub server_cert: Option<PathBuf>,
    pub control_host: String,
    pub control_port: u16,
}

/// `Zones` section: where zone files go and which NSD pattern new zones use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonesConfig {
    /// Base directory for zone files
    pub dir: PathBuf,
    /// Default NSD pattern passed to `addzone`
    pub pattern: Option<String>,
    /// Zone file path template, relative to `dir`
    pub file_pattern: FilePattern,
}

/// Fully validated daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub nsd_master: NsdMasterConfig,
    pub zones: ZonesConfig,
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a required option is missing or malformed.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let mut raw = RawConfig::parse(content)?;

        let server = ServerConfig {
            bind: raw.take(SECTION_SERVER, "bind"),
        };

        let control_port = match raw.take(SECTION_NSD_MASTER, "controlport") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort {
                    section: SECTION_NSD_MASTER,
                    option: "controlport",
                    value,
                })?,
            None => DEFAULT_CONTROL_PORT,
        };

        let nsd_master = NsdMasterConfig {
            client_cert: raw.required(SECTION_NSD_MASTER, "clientcert")?.into(),
            client_key: raw.required(SECTION_NSD_MASTER, "clientkey")?.into(),
            server_cert: raw.take(SECTION_NSD_MASTER, "servercert").map(PathBuf::from),
            control_host: raw
                .take(SECTION_NSD_MASTER, "controlhost")
                .unwrap_or_else(|| DEFAULT_CONTROL_HOST.to_string()),
            control_port,
        };

        let zones = ZonesConfig {
            dir: raw.required(SECTION_ZONES, "dir")?.into(),
            pattern: raw.take(SECTION_ZONES, "pattern"),
            file_pattern: FilePattern::new(raw.required(SECTION_ZONES, "filepattern")?)?,
        };

        Ok(Self {
            server,
            nsd_master,
            zones,
        })
    }
}

/// Known options as strings, keyed by section then lowercase option name.
struct RawConfig {
    sections: BTreeMap<&'static str, BTreeMap<String, String>>,
}

impl RawConfig {
    fn parse(content: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_yaml::from_str(content)?;
        let root = match document {
            Value::Mapping(root) => root,
            Value::Null => serde_yaml::Mapping::new(),
            _ => return Err(ConfigError::NotMapping("document root".to_string())),
        };

        let mut sections = BTreeMap::new();
        for (key, value) in root {
            let Some(name) = key.as_str() else {
                debug!(section = ?key, "Ignoring non-string configuration section");
                continue;
            };
            let Some((section, known)) = KNOWN_OPTIONS.iter().find(|(s, _)| *s == name) else {
                debug!(section = %name, "Ignoring unknown configuration section");
                continue;
            };

            let options = match value {
                Value::Mapping(options) => options,
                Value::Null => serde_yaml::Mapping::new(),
                _ => return Err(ConfigError::NotMapping((*section).to_string())),
            };

            let mut parsed = BTreeMap::new();
            for (option, value) in options {
                let Some(option) = option.as_str().map(str::to_lowercase) else {
                    continue;
                };
                if !known.contains(&option.as_str()) {
                    debug!(section = %section, option = %option, "Ignoring unknown configuration option");
                    continue;
                }
                if let Some(value) = scalar_to_string(section, &option, value)? {
                    parsed.insert(option, value);
                }
            }
            sections.insert(*section, parsed);
        }

        Ok(Self { sections })
    }

    /// Remove an option, treating empty strings as unset.
    fn take(&mut self, section: &'static str, option: &'static str) -> Option<String> {
        self.sections
            .get_mut(section)
            .and_then(|options| options.remove(option))
            .filter(|value| !value.trim().is_empty())
    }

    fn required(
        &mut self,
        section: &'static str,
        option: &'static str,
    ) -> Result<String, ConfigError> {
        self.take(section, option)
            .ok_or(ConfigError::MissingOption { section, option })
    }
}

fn scalar_to_string(section: &str, option: &str, value: Value) -> Result<Option<String>, ConfigError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(ConfigError::NotScalar {
            section: section.to_string(),
            option: option.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
