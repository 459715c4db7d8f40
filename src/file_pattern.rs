// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone file path resolution.
//!
//! Zone files are laid out under `Zones.dir` using the `Zones.filepattern`
//! template. The template lets operators shard large numbers of zone files
//! into balanced subdirectories, either by leading characters of the name or
//! by its labels.
//!
//! # Tokens
//!
//! | Token | Replacement |
//! |-------|-------------|
//! | `%1`, `%2`, `%3` | 1st/2nd/3rd character of the name, empty if it is the last character or beyond |
//! | `%z`, `%y`, `%x` | labels taken from the right of the name, leftmost label never used |
//! | `%s` | the full zone name (mandatory) |
//!
//! # Example
//!
//! ```rust
//! use nsd_rpcd::file_pattern::resolve;
//!
//! assert_eq!(
//!     resolve("%z/%y/%s.zone", "www.example.com").unwrap(),
//!     "com/example/www.example.com.zone"
//! );
//! assert_eq!(resolve("%1/%s.zone", "ab").unwrap(), "a/ab.zone");
//! ```

use std::path::{Component, Path, PathBuf};

use crate::constants::{CHAR_TOKENS, LABEL_TOKENS, TOKEN_ZONE_NAME};
use crate::errors::FilePatternError;

/// Resolve `template` for zone `name` into a path relative to the zone directory.
///
/// Substitution order is fixed: character tokens, the `%s` presence check,
/// label tokens, `%s`, then a single pass collapsing `//` into `/`.
///
/// # Errors
///
/// Returns [`FilePatternError::MissingNameToken`] if the template has no `%s`.
pub fn resolve(template: &str, name: &str) -> Result<String, FilePatternError> {
    let mut path = template.to_string();

    let name_len = name.chars().count();
    for (index, token) in CHAR_TOKENS.iter().enumerate() {
        if path.contains(token) {
            let replacement = if name_len > index + 1 {
                name.chars().nth(index).map(String::from).unwrap_or_default()
            } else {
                String::new()
            };
            path = path.replace(token, &replacement);
        }
    }

    if !path.contains(TOKEN_ZONE_NAME) {
        return Err(FilePatternError::MissingNameToken(template.to_string()));
    }

    // Reversed labels without the leftmost one: www.example.com -> [com, example]
    let mut parts: Vec<&str> = name.split('.').rev().collect();
    parts.pop();
    for (index, token) in LABEL_TOKENS.iter().enumerate() {
        if path.contains(token) {
            path = path.replace(token, parts.get(index).copied().unwrap_or_default());
        }
    }

    path = path.replace(TOKEN_ZONE_NAME, name);
    Ok(path.replace("//", "/"))
}

/// A validated `Zones.filepattern` template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    template: String,
}

impl FilePattern {
    /// Validate `template`.
    ///
    /// # Errors
    ///
    /// Returns [`FilePatternError::MissingNameToken`] if the template has no `%s`.
    pub fn new(template: impl Into<String>) -> Result<Self, FilePatternError> {
        let template = template.into();
        if !template.contains(TOKEN_ZONE_NAME) {
            return Err(FilePatternError::MissingNameToken(template));
        }
        Ok(Self { template })
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Resolve the template for `name`, relative to the zone directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a character token expanded into something that
    /// removed the `%s` token from the template.
    pub fn resolve(&self, name: &str) -> Result<String, FilePatternError> {
        resolve(&self.template, name)
    }

    /// Absolute location of the zone file for `name` below `base_dir`.
    ///
    /// A leading separator left by an empty first substitution stays inside `base_dir`.
    ///
    /// # Errors
    ///
    /// See [`FilePattern::resolve`]. Also returns
    /// [`FilePatternError::EscapesBaseDir`] if the resolved path contains a
    /// `..` component.
    pub fn zone_file_path(&self, base_dir: &Path, name: &str) -> Result<PathBuf, FilePatternError> {
        let relative = self.resolve(name)?;
        let relative = relative.trim_start_matches('/');
        if Path::new(relative)
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            return Err(FilePatternError::EscapesBaseDir(relative.to_string()));
        }
        Ok(base_dir.join(relative))
    }
}

#[cfg(test)]
#[path = "file_pattern_tests.rs"]
mod file_pattern_tests;
