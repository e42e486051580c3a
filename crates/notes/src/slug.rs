//! URL-safe note identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use notekeep_core::{DomainError, DomainResult};

/// Maximum slug length, in characters.
pub const MAX_SLUG_LEN: usize = 100;

/// URL-safe unique token identifying a note.
///
/// A slug is lowercase, at most [`MAX_SLUG_LEN`] characters, and consists of
/// alphanumerics (unicode-aware), `-` and `_`. Uniqueness across all notes is
/// enforced by the store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validate a user-supplied slug.
    pub fn parse(value: &str) -> DomainResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::validation("slug cannot be empty"));
        }
        if value.chars().count() > MAX_SLUG_LEN {
            return Err(DomainError::validation(format!(
                "slug cannot be longer than {MAX_SLUG_LEN} characters"
            )));
        }
        if !value
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::validation(
                "slug may only contain letters, digits, hyphens and underscores",
            ));
        }
        Ok(Self(value.to_string()))
    }

    /// Derive a slug from a title, deterministically.
    ///
    /// Alphanumeric runs are kept (lowercased), everything between them
    /// collapses into a single hyphen, and the result is truncated to
    /// [`MAX_SLUG_LEN`] characters. Returns `None` when the title contains
    /// nothing a slug could be made of.
    pub fn derive(title: &str) -> Option<Self> {
        let mut out = String::new();
        let mut pending_separator = false;

        for c in title.chars() {
            if c.is_alphanumeric() {
                if pending_separator && !out.is_empty() {
                    out.push('-');
                }
                pending_separator = false;
                // Some lowercase mappings expand into marks (e.g. U+0130);
                // keep only the alphanumeric part.
                for lower in c.to_lowercase().filter(|l| l.is_alphanumeric()) {
                    out.push(lower);
                }
            } else {
                pending_separator = true;
            }
        }

        let truncated: String = out.chars().take(MAX_SLUG_LEN).collect();
        let trimmed = truncated.trim_end_matches('-');
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Slug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Slug {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
