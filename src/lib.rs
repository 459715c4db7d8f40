// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # nsd-rpcd - Dynamic zone management for NSD
//!
//! nsd-rpcd is a small control-plane daemon written in Rust that lets remote callers
//! create, update and delete zones on a running NSD 4 server without editing its
//! configuration by hand.
//!
//! ## Overview
//!
//! Each operation combines an NSD remote-control command with zone file
//! management on local disk:
//!
//! - Zone names are filtered down to a safe character set
//! - Zone file locations are derived from a configurable path template
//! - Commands are issued over NSD's TLS control channel (`nsd-control` protocol)
//! - Results are reported with EPP-style numeric codes
//!
//! ## Modules
//!
//! - [`config`] - YAML configuration loading and validation
//! - [`zone_name`] - Zone name filtering
//! - [`file_pattern`] - Zone file path templates
//! - [`result`] - The `ZoneResult` returned by every operation
//! - [`nsd`] - NSD remote-control client
//! - [`service`] - Zone lifecycle operations
//! - [`rpc`] - JSON-RPC 2.0 adapter over HTTP
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust
//! use nsd_rpcd::file_pattern::FilePattern;
//! use nsd_rpcd::zone_name::filter_zone_name;
//!
//! let name = filter_zone_name("www.example.com");
//! let pattern = FilePattern::new("%z/%y/%s.zone").unwrap();
//!
//! assert_eq!(pattern.resolve(&name).unwrap(), "com/example/www.example.com.zone");
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod file_pattern;
pub mod metrics;
pub mod nsd;
pub mod result;
pub mod rpc;
pub mod service;
pub mod zone_name;
