// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! NSD remote-control client.
//!
//! NSD exposes an administrative TLS socket (`control-port`, 8952 by default)
//! used by `nsd-control`. Each command is a fresh TLS session authenticated by
//! a client certificate: the client sends one line, NSD answers with free-form
//! text and closes the connection.
//!
//! # Architecture
//!
//! The zone service only depends on the [`ControlClient`] trait, a single
//! `call(command, args) -> text` capability. [`NsdControlClient`] is the TLS
//! implementation used by the daemon; tests substitute a scripted client.
//!
//! # Example
//!
//! ```rust,no_run
//! use nsd_rpcd::config::Config;
//! use nsd_rpcd::nsd::{ControlClient, ControlCommand, NsdControlClient};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::load_file("/etc/nsd-rpcd.yaml")?;
//! let client = NsdControlClient::from_config(&config.nsd_master)?;
//!
//! let status = client.call(ControlCommand::ZoneStatus, &["example.com"])?;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;
pub mod verifier;

pub use client::NsdControlClient;
pub use types::{ControlCommand, ControlError};
pub use verifier::NsdServerVerifier;

use std::sync::Arc;

/// The capability the zone service needs from the control channel.
///
/// Implementations return NSD's response text with surrounding whitespace
/// removed. An `error ...` response is still `Ok`; only channel failures are
/// reported as [`ControlError`].
pub trait ControlClient: Send + Sync {
    /// Issue `command` with `args` and return the trimmed response.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, TLS session or stream I/O fails.
    fn call(&self, command: ControlCommand, args: &[&str]) -> Result<String, ControlError>;
}

impl<T: ControlClient + ?Sized> ControlClient for Arc<T> {
    fn call(&self, command: ControlCommand, args: &[&str]) -> Result<String, ControlError> {
        (**self).call(command, args)
    }
}
