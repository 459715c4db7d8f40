// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for nsd-rpcd.
//!
//! This module provides specialized error types for:
//! - Configuration loading and validation (fatal at startup)
//! - Zone file pattern resolution
//! - Zone name validation
//! - Hard faults raised by the zone service (filesystem, control channel)
//! - JSON-RPC request failures
//!
//! Business-level failures reported by NSD (zone exists, zone missing, command
//! failed) are *not* errors in this sense. They are returned as
//! [`crate::result::ZoneResult::Error`] values.

use std::path::PathBuf;
use thiserror::Error;

use crate::constants::{
    JSONRPC_INTERNAL_ERROR, JSONRPC_INVALID_PARAMS, JSONRPC_INVALID_REQUEST,
    JSONRPC_METHOD_NOT_FOUND, JSONRPC_PARSE_ERROR,
};
use crate::nsd::ControlError;

/// Errors produced while loading and validating the configuration file.
///
/// All of these are fatal: the daemon refuses to start.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document root or a known section is not a mapping
    #[error("Configuration {0} must be a mapping")]
    NotMapping(String),

    /// A section or option value has an unsupported shape (e.g. a nested mapping)
    #[error("Option '{section}.{option}' must be a scalar value")]
    NotScalar {
        /// Section name
        section: String,
        /// Option name
        option: String,
    },

    /// A required option was not set
    #[error("Required option '{section}.{option}' is not set")]
    MissingOption {
        /// Section name
        section: &'static str,
        /// Option name
        option: &'static str,
    },

    /// A numeric option could not be parsed
    #[error("Option '{section}.{option}' has invalid value '{value}': expected a port number")]
    InvalidPort {
        /// Section name
        section: &'static str,
        /// Option name
        option: &'static str,
        /// Offending value
        value: String,
    },

    /// The `Server.bind` value could not be turned into a socket address
    #[error("Invalid bind address '{0}'")]
    InvalidBind(String),

    /// `Zones.filepattern` is unusable
    #[error(transparent)]
    FilePattern(#[from] FilePatternError),
}

/// Errors produced while resolving a zone file path template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilePatternError {
    /// The template lacks the mandatory `%s` token
    #[error("%s missing in filepattern definition '{0}'")]
    MissingNameToken(String),

    /// The resolved path refers to a parent directory
    #[error("Zone file path '{0}' escapes the zone directory")]
    EscapesBaseDir(String),
}

/// Errors produced while validating a caller-supplied zone name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneNameError {
    /// Nothing was left after removing disallowed characters
    #[error("Zone name '{0}' contains no valid characters")]
    Empty(String),

    #[error("Zone name '{0}' has an empty label")]
    EmptyLabel(String),
}

/// Hard faults raised by the zone service.
///
/// These propagate through the transport's generic error path instead of
/// being wrapped in a result envelope.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The control channel to NSD failed (connect, TLS, I/O)
    #[error(transparent)]
    Control(#[from] ControlError),

    /// A zone file or its directory could not be written or removed
    #[error("Zone file operation on {path} failed: {source}")]
    Io {
        /// Path that was being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A `stats` response line did not have the `key=value` shape
    #[error("Malformed stats line '{line}': expected key=value")]
    MalformedStats {
        /// The offending line
        line: String,
    },
}

/// Failures of a JSON-RPC call, each mapped to a JSON-RPC error code.
#[derive(Error, Debug)]
pub enum RpcError {
    /// The request body is not JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// The request is JSON but not a JSON-RPC 2.0 request object
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Parameters are missing, of the wrong type or too many
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// The operation hit a hard fault
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The blocking task running the operation did not complete
    #[error("Operation aborted: {0}")]
    Aborted(String),
}

impl RpcError {
    /// JSON-RPC 2.0 error code for this failure
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::Parse(_) => JSONRPC_PARSE_ERROR,
            Self::InvalidRequest(_) => JSONRPC_INVALID_REQUEST,
            Self::MethodNotFound(_) => JSONRPC_METHOD_NOT_FOUND,
            Self::InvalidParams(_) => JSONRPC_INVALID_PARAMS,
            Self::Service(_) | Self::Aborted(_) => JSONRPC_INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
