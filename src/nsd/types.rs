// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Types for the NSD remote-control protocol.

use std::fmt;
use std::path::PathBuf;

/// Commands understood by `nsd-control` that this daemon issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    AddZone,
    DelZone,
    ZoneStatus,
    Reload,
    Notify,
    Transfer,
    Reconfig,
    Stats,
    StatsNoReset,
}

impl ControlCommand {
    /// Wire name of the command
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddZone => "addzone",
            Self::DelZone => "delzone",
            Self::ZoneStatus => "zonestatus",
            Self::Reload => "reload",
            Self::Notify => "notify",
            Self::Transfer => "transfer",
            Self::Reconfig => "reconfig",
            Self::Stats => "stats",
            Self::StatsNoReset => "stats_noreset",
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures of the control channel itself.
///
/// A command that NSD executed and answered with `error ...` is *not* a
/// `ControlError`; that text is returned as a normal response.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// TCP connection to the control port failed
    #[error("Failed to connect to NSD control at {address}: {source}")]
    Connect {
        /// `host:port` that was dialed
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// TLS setup or handshake failed
    #[error("NSD control TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Reading or writing the control stream failed
    #[error("NSD control I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `controlhost` is not a valid DNS name or IP address
    #[error("Invalid control host name '{0}'")]
    InvalidServerName(String),

    /// A PEM file could not be loaded
    #[error("Failed to load {path}: {reason}")]
    Certificate {
        /// PEM file path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
