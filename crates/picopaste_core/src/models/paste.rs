//! Paste identifier model.

use crate::constants::{PASTE_ID_ALPHABET, PASTE_ID_LENGTH};
use std::fmt;

/// Short opaque identifier naming a paste.
///
/// Always exactly [`PASTE_ID_LENGTH`] characters drawn from
/// [`PASTE_ID_ALPHABET`], so it can be embedded in a URL path segment as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PasteId(String);

impl PasteId {
    /// Parse a caller-supplied identifier.
    ///
    /// # Returns
    /// `Some(PasteId)` when `value` matches the identifier format.
    pub fn parse(value: &str) -> Option<Self> {
        is_valid_id(value).then(|| Self(value.to_string()))
    }

    /// Wrap a key read back from the store without re-validating it.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Return the identifier as the raw key bytes used by the store.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Check whether `value` matches the identifier format.
pub fn is_valid_id(value: &str) -> bool {
    value.len() == PASTE_ID_LENGTH && value.bytes().all(|b| PASTE_ID_ALPHABET.contains(&b))
}

impl fmt::Display for PasteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PasteId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for PasteId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_id(&value) {
            Ok(Self(value))
        } else {
            Err(format!("invalid paste id '{}'", value))
        }
    }
}

impl From<PasteId> for String {
    fn from(value: PasteId) -> Self {
        value.0
    }
}
