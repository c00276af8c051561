//! Entry-name handling.
//!
//! Two independent concerns live here:
//!
//! - [`sanitize`] maps an arbitrary entry name onto an [`Identifier`] that a
//!   caller's namespace accepts. It never fails. Distinct names may map to the
//!   same identifier; the namespace decides what a repeated bind means.
//! - [`validate_entry_name`] decides whether a name can become a blob file
//!   stem inside the store directory.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Prepended when a sanitized name does not start with a letter.
pub const IDENTIFIER_PREFIX: &str = "x";

/// Maximum identifier length in characters.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Substituted when sanitizing yields nothing.
pub const FALLBACK_IDENTIFIER: &str = "unnamed";

/// Characters that may not appear in a store name or an entry name.
pub const RESERVED_PATH_CHARS: &[char] = &['/', '\\', '*', ':', '?', '"', '<', '>', '|'];

/// Entry names longer than this (in bytes) cannot be blob file stems on
/// common filesystems once the extension is appended.
const MAX_ENTRY_NAME_BYTES: usize = 240;

/// A name that is valid in the caller's namespace.
///
/// Non-empty, at most [`MAX_IDENTIFIER_LEN`] characters, starts with an ASCII
/// letter, and otherwise contains only `_` and alphanumerics below U+00FF.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Check an already-formed identifier.
    pub fn new(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        if is_valid_identifier(&s) {
            Ok(Self(s))
        } else {
            Err(TypeError::InvalidIdentifier(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

fn is_kept(ch: char) -> bool {
    (ch as u32) < 255 && ch.is_alphanumeric()
}

fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    s.chars().count() <= MAX_IDENTIFIER_LEN && chars.all(|ch| ch == '_' || is_kept(ch))
}

/// Map an arbitrary entry name onto a valid [`Identifier`].
///
/// Every character that is not alphanumeric, or whose code point is 255 or
/// above, becomes `_`. A result that does not start with an ASCII letter gets
/// [`IDENTIFIER_PREFIX`] in front. The result is cut to
/// [`MAX_IDENTIFIER_LEN`] characters, and an empty result becomes
/// [`FALLBACK_IDENTIFIER`].
///
/// # Examples
///
/// ```
/// use varstash_types::sanitize;
///
/// assert_eq!(sanitize("velocity").as_str(), "velocity");
/// assert_eq!(sanitize("1bad name!").as_str(), "x1bad_name_");
/// assert_eq!(sanitize("").as_str(), "unnamed");
/// ```
pub fn sanitize(name: &str) -> Identifier {
    let replaced: String = name
        .chars()
        .map(|ch| if is_kept(ch) { ch } else { '_' })
        .collect();

    if replaced.is_empty() {
        return Identifier(FALLBACK_IDENTIFIER.to_string());
    }

    let prefixed = if replaced.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
        replaced
    } else {
        format!("{IDENTIFIER_PREFIX}{replaced}")
    };

    Identifier(prefixed.chars().take(MAX_IDENTIFIER_LEN).collect())
}

/// Validate that `name` can be stored as a blob file stem.
pub fn validate_entry_name(name: &str) -> Result<(), TypeError> {
    let reject = |reason: String| {
        Err(TypeError::InvalidEntryName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return reject("entry name must not be empty".into());
    }
    if name == "." || name == ".." {
        return reject("entry name must not be '.' or '..'".into());
    }
    if let Some(ch) = name.chars().find(|ch| RESERVED_PATH_CHARS.contains(ch)) {
        return reject(format!("contains reserved character: {ch:?}"));
    }
    if let Some(ch) = name.chars().find(|ch| ch.is_control()) {
        return reject(format!("contains control character: {ch:?}"));
    }
    if name.len() > MAX_ENTRY_NAME_BYTES {
        return reject(format!(
            "longer than {MAX_ENTRY_NAME_BYTES} bytes ({})",
            name.len()
        ));
    }
    Ok(())
}
