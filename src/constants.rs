// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for nsd-rpcd.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// NSD Control Protocol Constants
// ============================================================================

/// Default host of the NSD remote-control socket
pub const DEFAULT_CONTROL_HOST: &str = "localhost";

/// Default NSD remote-control port (`control-port` in nsd.conf)
pub const DEFAULT_CONTROL_PORT: u16 = 8952;

/// Version announced in the request preamble (`NSDCT1`)
pub const NSD_CONTROL_VERSION: u8 = 1;

/// Response NSD sends for a command that completed without output
pub const NSD_SUCCESS_TOKEN: &str = "ok";

/// Substring that marks a failed control command.
///
/// NSD has no structured error codes; every failure response starts with
/// `error ` followed by a description.
pub const NSD_ERROR_MARKER: &str = "error ";

// ============================================================================
// Result Codes
// ============================================================================

/// Command completed successfully
pub const CODE_SUCCESS: u16 = 1000;

/// Parameter value syntax error (zone name empty after filtering)
pub const CODE_PARAMETER_SYNTAX: u16 = 2005;

/// Object exists (`addzone` rejected)
pub const CODE_OBJECT_EXISTS: u16 = 2302;

/// Object does not exist (`zonestatus` failed before an update)
pub const CODE_OBJECT_MISSING: u16 = 2303;

/// Command failed (response carried the error marker)
pub const CODE_COMMAND_FAILED: u16 = 2400;

pub const MSG_SUCCESS: &str = "Command completed successfully";
pub const MSG_PARAMETER_SYNTAX: &str = "Parameter value syntax error";
pub const MSG_OBJECT_EXISTS: &str = "Object exists";
pub const MSG_OBJECT_MISSING: &str = "Object does not exists";
pub const MSG_COMMAND_FAILED: &str = "Command failed";

// ============================================================================
// Zone File Pattern Tokens
// ============================================================================

/// Mandatory token replaced by the full zone name
pub const TOKEN_ZONE_NAME: &str = "%s";

/// Character-position tokens, index `i` maps to character `i` of the name
pub const CHAR_TOKENS: [&str; 3] = ["%1", "%2", "%3"];

/// Label tokens, most significant label first
pub const LABEL_TOKENS: [&str; 3] = ["%z", "%y", "%x"];

// ============================================================================
// Server Constants
// ============================================================================

/// Scheme prefix accepted on `Server.bind` for compatibility with zerorpc-style endpoints
pub const BIND_TCP_SCHEME: &str = "tcp://";

/// HTTP path of the JSON-RPC endpoint
pub const RPC_PATH: &str = "/rpc";

/// HTTP path of the health endpoint
pub const HEALTH_PATH: &str = "/health";

/// HTTP path of the Prometheus endpoint
pub const METRICS_PATH: &str = "/metrics";

/// JSON-RPC protocol version accepted and returned
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 error codes
pub const JSONRPC_PARSE_ERROR: i64 = -32700;
pub const JSONRPC_INVALID_REQUEST: i64 = -32600;
pub const JSONRPC_METHOD_NOT_FOUND: i64 = -32601;
pub const JSONRPC_INVALID_PARAMS: i64 = -32602;
pub const JSONRPC_INTERNAL_ERROR: i64 = -32603;

/// Number of tokio worker threads
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Operation Names
// ============================================================================

/// Operation names, as exposed through the RPC adapter and used as metric labels
pub const OP_ADD_ZONE: &str = "addZone";
pub const OP_UPDATE_ZONE: &str = "updateZone";
pub const OP_DEL_ZONE: &str = "delZone";
pub const OP_ZONE_STATUS: &str = "zoneStatus";
pub const OP_RELOAD_ZONE: &str = "reloadZone";
pub const OP_NOTIFY_ZONE: &str = "notifyZone";
pub const OP_TRANSFER_ZONE: &str = "transferZone";
pub const OP_RECONFIG: &str = "reconfig";
pub const OP_STATS: &str = "stats";
