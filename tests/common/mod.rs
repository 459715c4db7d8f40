// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

#![allow(dead_code)]

use nsd_rpcd::config::Config;
use nsd_rpcd::nsd::{ControlClient, ControlCommand, ControlError};
use nsd_rpcd::service::ZoneService;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for NSD's control socket.
///
/// Tracks which zones exist so the lifecycle behaves like a real server:
/// `addzone` fails for a known zone, `zonestatus`, `reload` and `delzone`
/// fail for an unknown one. Every call is recorded.
#[derive(Default)]
pub struct FakeNsd {
    zones: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    stats: Mutex<String>,
    offline: Mutex<bool>,
}

impl FakeNsd {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Calls received so far, formatted as `command arg...`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn has_zone(&self, name: &str) -> bool {
        self.zones.lock().unwrap().contains(name)
    }

    pub fn set_stats(&self, stats: &str) {
        *self.stats.lock().unwrap() = stats.to_string();
    }

    /// Make every further call fail as if the socket were unreachable
    pub fn go_offline(&self) {
        *self.offline.lock().unwrap() = true;
    }
}

impl ControlClient for FakeNsd {
    fn call(&self, command: ControlCommand, args: &[&str]) -> Result<String, ControlError> {
        let mut line = command.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line);

        if *self.offline.lock().unwrap() {
            return Err(ControlError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }

        let mut zones = self.zones.lock().unwrap();
        let name = args.first().copied().unwrap_or_default().to_string();
        let response = match command {
            ControlCommand::AddZone if zones.contains(&name) => {
                format!("error zone {name} already exists")
            }
            ControlCommand::AddZone => {
                zones.insert(name);
                "ok".to_string()
            }
            ControlCommand::DelZone => {
                if zones.remove(&name) {
                    "ok".to_string()
                } else {
                    format!("error zone {name} not found")
                }
            }
            ControlCommand::ZoneStatus if zones.contains(&name) => {
                format!("zone:\t{name}\n\tstate: ok")
            }
            ControlCommand::Reload | ControlCommand::Notify | ControlCommand::Transfer
                if zones.contains(&name) =>
            {
                "ok".to_string()
            }
            ControlCommand::ZoneStatus
            | ControlCommand::Reload
            | ControlCommand::Notify
            | ControlCommand::Transfer => format!("error zone {name} not found"),
            ControlCommand::Reconfig => "reconfig start, read /etc/nsd/nsd.conf\nok".to_string(),
            ControlCommand::Stats | ControlCommand::StatsNoReset => {
                self.stats.lock().unwrap().clone()
            }
        };
        Ok(response)
    }
}

/// Directory holding the PEM fixtures
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Configuration file contents pointing zone storage at `zones_dir`
pub fn config_yaml(zones_dir: &Path, filepattern: &str) -> String {
    let fixtures = fixtures_dir();
    format!(
        r#"
Server:
  bind: tcp://127.0.0.1:4242
NSDMaster:
  ClientCert: {cert}
  ClientKey: {key}
Zones:
  dir: {dir}
  pattern: slave
  filepattern: "{filepattern}"
"#,
        cert = fixtures.join("nsd_control.pem").display(),
        key = fixtures.join("nsd_control.key").display(),
        dir = zones_dir.display(),
    )
}

/// Service backed by a [`FakeNsd`], configured through a YAML document
pub fn fake_service(zones_dir: &Path, filepattern: &str) -> (ZoneService<Arc<FakeNsd>>, Arc<FakeNsd>) {
    let config = Config::from_yaml_str(&config_yaml(zones_dir, filepattern)).unwrap();
    let nsd = FakeNsd::new();
    (ZoneService::new(Arc::clone(&nsd), config.zones), nsd)
}

/// Minimal zone file for `name`
pub fn zone_data(name: &str) -> String {
    format!(
        "$ORIGIN {name}.\n$TTL 3600\n@ IN SOA ns1.{name}. hostmaster.{name}. 1 3600 600 86400 300\n@ IN NS ns1.{name}.\n"
    )
}
