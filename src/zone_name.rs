// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone name normalization.
//!
//! Caller-supplied zone names are reduced to the characters `-`, `_`, `.`,
//! ASCII letters and ASCII digits before they reach NSD or the filesystem.
//! Everything else is silently dropped, so the result is always safe to use
//! as a control-protocol argument.
//!
//! A filtered name with a leading dot or an empty label (`..`) is rejected,
//! so it can never expand into a parent directory reference inside a zone
//! file path. A single trailing dot is accepted.

use std::fmt;

use crate::errors::ZoneNameError;

/// Returns `true` if `c` may appear in a filtered zone name.
#[must_use]
pub fn is_valid_zone_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Remove every character outside the allowed set, keeping the order of the rest.
///
/// # Example
///
/// ```rust
/// use nsd_rpcd::zone_name::filter_zone_name;
///
/// assert_eq!(filter_zone_name("exa mple!.com"), "example.com");
/// ```
#[must_use]
pub fn filter_zone_name(raw: &str) -> String {
    raw.chars().filter(|c| is_valid_zone_char(*c)).collect()
}

/// A filtered, non-empty zone name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneName(String);

impl ZoneName {
    /// Filter `raw` and wrap the result.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneNameError::Empty`] if no allowed character remains and
    /// [`ZoneNameError::EmptyLabel`] if the filtered name starts with `.` or
    /// contains `..`.
    pub fn parse(raw: &str) -> Result<Self, ZoneNameError> {
        let filtered = filter_zone_name(raw);
        if filtered.is_empty() {
            return Err(ZoneNameError::Empty(raw.to_string()));
        }
        if filtered.starts_with('.') || filtered.contains("..") {
            return Err(ZoneNameError::EmptyLabel(filtered));
        }
        Ok(Self(filtered))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ZoneName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "zone_name_tests.rs"]
mod zone_name_tests;
