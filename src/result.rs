// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Result envelope returned by every zone operation.
//!
//! Every operation produces exactly one [`ZoneResult`]. Success and error share
//! the same shape (`code`, `msg`, optional `nsdresult` and `stats`) and
//! serialize to the same flat mapping. Callers tell them apart by `code`.
//!
//! # Example
//!
//! ```rust
//! use nsd_rpcd::result::{ResultCode, ZoneResult};
//!
//! let result = ZoneResult::command_failed("error zone example.com not found");
//! assert!(!result.is_success());
//! assert_eq!(result.code(), ResultCode::CommandFailed);
//!
//! let json = serde_json::to_value(&result).unwrap();
//! assert_eq!(json["code"], 2400);
//! assert_eq!(json["nsdresult"], "error zone example.com not found");
//! ```

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{
    CODE_COMMAND_FAILED, CODE_OBJECT_EXISTS, CODE_OBJECT_MISSING, CODE_PARAMETER_SYNTAX,
    CODE_SUCCESS, MSG_COMMAND_FAILED, MSG_OBJECT_EXISTS, MSG_OBJECT_MISSING,
    MSG_PARAMETER_SYNTAX, MSG_SUCCESS,
};

/// Numeric result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// 1000
    Success,
    /// 2005, the zone name is empty after filtering
    ParameterSyntax,
    /// 2302, `addzone` rejected
    ObjectExists,
    /// 2303, the zone to update does not exist
    ObjectMissing,
    /// 2400, NSD reported an error
    CommandFailed,
}

impl ResultCode {
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::Success => CODE_SUCCESS,
            Self::ParameterSyntax => CODE_PARAMETER_SYNTAX,
            Self::ObjectExists => CODE_OBJECT_EXISTS,
            Self::ObjectMissing => CODE_OBJECT_MISSING,
            Self::CommandFailed => CODE_COMMAND_FAILED,
        }
    }

    /// Default human-readable message for the code
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Success => MSG_SUCCESS,
            Self::ParameterSyntax => MSG_PARAMETER_SYNTAX,
            Self::ObjectExists => MSG_OBJECT_EXISTS,
            Self::ObjectMissing => MSG_OBJECT_MISSING,
            Self::CommandFailed => MSG_COMMAND_FAILED,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

impl Serialize for ResultCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// Fields shared by success and error results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultBody {
    pub code: ResultCode,
    pub msg: String,
    /// Raw (trimmed) control-protocol response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsdresult: Option<String>,
    /// Parsed `stats` output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<BTreeMap<String, String>>,
}

/// Outcome of a zone operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ZoneResult {
    Success(ResultBody),
    Error(ResultBody),
}

impl ZoneResult {
    /// Build a success result with no extra fields.
    #[must_use]
    pub fn success(code: ResultCode, msg: impl Into<String>) -> Self {
        Self::Success(ResultBody {
            code,
            msg: msg.into(),
            nsdresult: None,
            stats: None,
        })
    }

    /// Build an error result with no extra fields.
    #[must_use]
    pub fn error(code: ResultCode, msg: impl Into<String>) -> Self {
        Self::Error(ResultBody {
            code,
            msg: msg.into(),
            nsdresult: None,
            stats: None,
        })
    }

    /// Code 1000 carrying the raw response.
    #[must_use]
    pub fn completed(nsdresult: impl Into<String>) -> Self {
        Self::success(ResultCode::Success, MSG_SUCCESS).with_nsdresult(nsdresult)
    }

    /// Code 2400 carrying the raw response.
    #[must_use]
    pub fn command_failed(nsdresult: impl Into<String>) -> Self {
        Self::error(ResultCode::CommandFailed, MSG_COMMAND_FAILED).with_nsdresult(nsdresult)
    }

    /// Result using the default message of `code`; only 1000 is a success.
    #[must_use]
    pub fn from_code(code: ResultCode) -> Self {
        if code == ResultCode::Success {
            Self::success(code, code.default_message())
        } else {
            Self::error(code, code.default_message())
        }
    }

    #[must_use]
    pub fn with_nsdresult(mut self, nsdresult: impl Into<String>) -> Self {
        self.body_mut().nsdresult = Some(nsdresult.into());
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: BTreeMap<String, String>) -> Self {
        self.body_mut().stats = Some(stats);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn body(&self) -> &ResultBody {
        match self {
            Self::Success(body) | Self::Error(body) => body,
        }
    }

    fn body_mut(&mut self) -> &mut ResultBody {
        match self {
            Self::Success(body) | Self::Error(body) => body,
        }
    }

    #[must_use]
    pub fn code(&self) -> ResultCode {
        self.body().code
    }

    #[must_use]
    pub fn msg(&self) -> &str {
        &self.body().msg
    }

    #[must_use]
    pub fn nsdresult(&self) -> Option<&str> {
        self.body().nsdresult.as_deref()
    }

    #[must_use]
    pub fn stats(&self) -> Option<&BTreeMap<String, String>> {
        self.body().stats.as_ref()
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod result_tests;
