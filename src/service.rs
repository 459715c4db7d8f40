// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone control service.
//!
//! [`ZoneService`] implements the zone lifecycle on top of a [`ControlClient`]
//! and the zone file directory:
//!
//! - `add_zone` - `addzone`, write the zone file, `reload`
//! - `update_zone` - `zonestatus`, overwrite the zone file, `reload`
//! - `del_zone` - `delzone`, remove the zone file
//! - `zone_status`, `reload_zone`, `notify_zone`, `transfer_zone`, `reconfig` - pass-through
//! - `stats` - `stats` / `stats_noreset`, parsed into a map
//!
//! Every operation returns a [`ZoneResult`]. NSD failures are reported inside
//! the result; only channel, filesystem and protocol faults surface as
//! [`ServiceError`].
//!
//! Operations are synchronous and take no locks: concurrent calls on the same
//! zone are not serialized, and zone files are overwritten in place.
//!
//! # Example
//!
//! ```rust,no_run
//! use nsd_rpcd::config::Config;
//! use nsd_rpcd::nsd::NsdControlClient;
//! use nsd_rpcd::service::ZoneService;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::load_file("/etc/nsd-rpcd.yaml")?;
//! let client = NsdControlClient::from_config(&config.nsd_master)?;
//! let service = ZoneService::new(client, config.zones);
//!
//! let result = service.add_zone("example.com", "$ORIGIN example.com.\n", None)?;
//! assert!(result.is_success());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::ZonesConfig;
use crate::constants::{
    NSD_ERROR_MARKER, NSD_SUCCESS_TOKEN, OP_ADD_ZONE, OP_DEL_ZONE, OP_NOTIFY_ZONE, OP_RECONFIG, OP_RELOAD_ZONE, OP_STATS,
    OP_TRANSFER_ZONE, OP_UPDATE_ZONE, OP_ZONE_STATUS,
};
use crate::errors::{FilePatternError, ServiceError};
use crate::metrics::{
    record_control_command, record_operation, record_zone_file_removed, record_zone_file_written,
};
use crate::nsd::{ControlClient, ControlCommand};
use crate::result::{ResultCode, ZoneResult};
use crate::zone_name::ZoneName;

/// Returns `true` if a control response reports a failure.
///
/// The substring `"error "` anywhere in the text is the only discriminator.
#[must_use]
pub fn is_error_response(response: &str) -> bool {
    response.contains(NSD_ERROR_MARKER)
}

/// Wrap a pass-through response: 2400 on the error marker, 1000 otherwise.
#[must_use]
pub fn classify(response: String) -> ZoneResult {
    if is_error_response(&response) {
        ZoneResult::command_failed(response)
    } else {
        ZoneResult::completed(response)
    }
}

/// Parse `key=value` lines, splitting each on its first `=`.
///
/// # Errors
///
/// Returns [`ServiceError::MalformedStats`] for any line without `=`,
/// blank lines and an empty response included.
pub fn parse_stats(response: &str) -> Result<BTreeMap<String, String>, ServiceError> {
    response
        .split('\n')
        .map(|line| {
            line.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| ServiceError::MalformedStats {
                    line: line.to_string(),
                })
        })
        .collect()
}

/// Zone lifecycle operations against one NSD instance.
#[derive(Debug)]
pub struct ZoneService<C> {
    client: C,
    zones: ZonesConfig,
}

impl<C: ControlClient> ZoneService<C> {
    #[must_use]
    pub fn new(client: C, zones: ZonesConfig) -> Self {
        Self { client, zones }
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    #[must_use]
    pub fn zones(&self) -> &ZonesConfig {
        &self.zones
    }

    /// Absolute zone file location for an already filtered `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file pattern cannot be resolved for `name`.
    pub fn zone_file_path(&self, name: &str) -> Result<PathBuf, FilePatternError> {
        self.zones.file_pattern.zone_file_path(&self.zones.dir, name)
    }

    // ===== Lifecycle operations =====

    /// Create a zone in NSD, write its zone file and reload it.
    ///
    /// `pattern` falls back to `Zones.pattern`. Nothing is written and no
    /// reload happens unless NSD answers `addzone` with exactly `ok`. An empty
    /// `zonedata` skips the write but still reloads. A name whose zone file
    /// path would leave `Zones.dir` yields 2005 before NSD is contacted.
    ///
    /// # Errors
    ///
    /// Returns an error if the control channel fails or the zone file cannot be written.
    pub fn add_zone(
        &self,
        name: &str,
        zonedata: &str,
        pattern: Option<&str>,
    ) -> Result<ZoneResult, ServiceError> {
        self.with_zone(OP_ADD_ZONE, name, |zone| {
            let path = match self.checked_zone_path(zone) {
                Ok(path) => path,
                Err(rejected) => return Ok(rejected),
            };
            let pattern = pattern
                .filter(|pattern| !pattern.is_empty())
                .or(self.zones.pattern.as_deref());

            let mut args = vec![zone.as_str()];
            args.extend(pattern);

            let response = self.control(ControlCommand::AddZone, &args)?;
            if response != NSD_SUCCESS_TOKEN {
                return Ok(ZoneResult::from_code(ResultCode::ObjectExists).with_nsdresult(response));
            }

            if !zonedata.is_empty() {
                self.write_zone_file(zone, &path, zonedata)?;
            }
            self.reload(zone)
        })
    }

    /// Replace the zone file of an existing zone and reload it.
    ///
    /// # Errors
    ///
    /// Returns an error if the control channel fails or the zone file cannot be written.
    pub fn update_zone(&self, name: &str, zonedata: &str) -> Result<ZoneResult, ServiceError> {
        self.with_zone(OP_UPDATE_ZONE, name, |zone| {
            let path = match self.checked_zone_path(zone) {
                Ok(path) => path,
                Err(rejected) => return Ok(rejected),
            };
            let response = self.control(ControlCommand::ZoneStatus, &[zone.as_str()])?;
            if is_error_response(&response) {
                return Ok(ZoneResult::from_code(ResultCode::ObjectMissing).with_nsdresult(response));
            }

            self.write_zone_file(zone, &path, zonedata)?;
            self.reload(zone)
        })
    }

    /// Remove a zone from NSD and delete its zone file.
    ///
    /// A missing zone file or directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the control channel fails or an existing zone file cannot be removed.
    pub fn del_zone(&self, name: &str) -> Result<ZoneResult, ServiceError> {
        self.with_zone(OP_DEL_ZONE, name, |zone| {
            let path = match self.checked_zone_path(zone) {
                Ok(path) => path,
                Err(rejected) => return Ok(rejected),
            };
            let response = self.control(ControlCommand::DelZone, &[zone.as_str()])?;
            if is_error_response(&response) {
                return Ok(ZoneResult::command_failed(response));
            }

            self.remove_zone_file(zone, path)?;
            Ok(ZoneResult::completed(response))
        })
    }

    // ===== Pass-through operations =====

    /// # Errors
    ///
    /// Returns an error if the control channel fails.
    pub fn zone_status(&self, name: &str) -> Result<ZoneResult, ServiceError> {
        self.pass_through(OP_ZONE_STATUS, ControlCommand::ZoneStatus, name)
    }

    /// # Errors
    ///
    /// Returns an error if the control channel fails.
    pub fn reload_zone(&self, name: &str) -> Result<ZoneResult, ServiceError> {
        self.pass_through(OP_RELOAD_ZONE, ControlCommand::Reload, name)
    }

    /// # Errors
    ///
    /// Returns an error if the control channel fails.
    pub fn notify_zone(&self, name: &str) -> Result<ZoneResult, ServiceError> {
        self.pass_through(OP_NOTIFY_ZONE, ControlCommand::Notify, name)
    }

    /// # Errors
    ///
    /// Returns an error if the control channel fails.
    pub fn transfer_zone(&self, name: &str) -> Result<ZoneResult, ServiceError> {
        self.pass_through(OP_TRANSFER_ZONE, ControlCommand::Transfer, name)
    }

    /// Make NSD re-read its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the control channel fails.
    pub fn reconfig(&self) -> Result<ZoneResult, ServiceError> {
        info!(operation = OP_RECONFIG, "Zone operation requested");
        let result = classify(self.control(ControlCommand::Reconfig, &[])?);
        Ok(finish(OP_RECONFIG, result))
    }

    /// Fetch server statistics, resetting the counters unless `noreset` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the control channel fails or a line of the response
    /// is not `key=value`.
    pub fn stats(&self, noreset: bool) -> Result<ZoneResult, ServiceError> {
        info!(operation = OP_STATS, noreset = noreset, "Zone operation requested");
        let command = if noreset {
            ControlCommand::StatsNoReset
        } else {
            ControlCommand::Stats
        };

        let response = self.control(command, &[])?;
        let result = if is_error_response(&response) {
            ZoneResult::command_failed(response)
        } else {
            ZoneResult::from_code(ResultCode::Success).with_stats(parse_stats(&response)?)
        };
        Ok(finish(OP_STATS, result))
    }

    // ===== Internals =====

    /// Filter `raw`, run `op` on the result and record the outcome.
    ///
    /// A name that is empty after filtering yields 2005 without calling `op`.
    fn with_zone<F>(&self, operation: &'static str, raw: &str, op: F) -> Result<ZoneResult, ServiceError>
    where
        F: FnOnce(&ZoneName) -> Result<ZoneResult, ServiceError>,
    {
        let result = match ZoneName::parse(raw) {
            Ok(zone) => {
                info!(operation = operation, zone = %zone, "Zone operation requested");
                op(&zone)?
            }
            Err(e) => {
                warn!(operation = operation, error = %e, "Rejected zone name");
                ZoneResult::error(ResultCode::ParameterSyntax, e.to_string())
            }
        };
        Ok(finish(operation, result))
    }

    fn pass_through(
        &self,
        operation: &'static str,
        command: ControlCommand,
        name: &str,
    ) -> Result<ZoneResult, ServiceError> {
        self.with_zone(operation, name, |zone| {
            Ok(classify(self.control(command, &[zone.as_str()])?))
        })
    }

    /// Zone file location for `zone`, or a 2005 result if it would leave `Zones.dir`.
    fn checked_zone_path(&self, zone: &ZoneName) -> Result<PathBuf, ZoneResult> {
        self.zone_file_path(zone.as_str()).map_err(|e| {
            warn!(zone = %zone, error = %e, "Rejected zone file path");
            ZoneResult::error(ResultCode::ParameterSyntax, e.to_string())
        })
    }

    fn reload(&self, zone: &ZoneName) -> Result<ZoneResult, ServiceError> {
        Ok(classify(self.control(ControlCommand::Reload, &[zone.as_str()])?))
    }

    /// Issue a control command, recording its outcome and latency.
    fn control(&self, command: ControlCommand, args: &[&str]) -> Result<String, ServiceError> {
        let start = Instant::now();
        match self.client.call(command, args) {
            Ok(response) => {
                let status = if is_error_response(&response) {
                    "error"
                } else {
                    "success"
                };
                record_control_command(command.as_str(), status, start.elapsed());
                Ok(response)
            }
            Err(e) => {
                record_control_command(command.as_str(), "failure", start.elapsed());
                error!(command = %command, error = %e, "NSD control channel failed");
                Err(e.into())
            }
        }
    }

    fn write_zone_file(&self, zone: &ZoneName, path: &Path, zonedata: &str) -> Result<(), ServiceError> {
        if let Some(directory) = path.parent() {
            fs::create_dir_all(directory).map_err(|source| ServiceError::Io {
                path: directory.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, zonedata).map_err(|source| ServiceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        record_zone_file_written();
        info!(zone = %zone, path = %path.display(), bytes = zonedata.len(), "Wrote zone file");
        Ok(())
    }

    fn remove_zone_file(&self, zone: &ZoneName, path: PathBuf) -> Result<(), ServiceError> {
        match fs::remove_file(&path) {
            Ok(()) => {
                record_zone_file_removed();
                info!(zone = %zone, path = %path.display(), "Removed zone file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(zone = %zone, path = %path.display(), "No zone file to remove");
                Ok(())
            }
            Err(source) => Err(ServiceError::Io { path, source }),
        }
    }
}

fn finish(operation: &'static str, result: ZoneResult) -> ZoneResult {
    record_operation(operation, result.code().as_u16());
    if !result.is_success() {
        warn!(
            operation = operation,
            code = result.code().as_u16(),
            nsdresult = result.nsdresult().unwrap_or_default(),
            "Zone operation failed"
        );
    }
    result
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
