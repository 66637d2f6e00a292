//! Content deduplication over the paste store.
//!
//! Submissions whose bytes exactly equal an existing paste resolve to that
//! paste's identifier instead of being stored again. Equality is always a
//! byte-for-byte comparison; the digest mode only uses BLAKE3 to locate the
//! candidate row before comparing.
//!
//! The default scan mode reads every stored paste on each lookup, which is
//! O(n) per submission. That is the scalability ceiling of this service;
//! switch to [`DedupMode::Digest`] for stores that outgrow it.

use crate::db::paste::content_digest;
use crate::db::PasteStore;
use crate::error::AppError;
use crate::models::PasteId;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Strategy used to find an existing paste with identical content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    /// Linear scan in store key order; first exact match wins.
    #[default]
    Scan,
    /// Digest index lookup confirmed by exact comparison.
    Digest,
}

impl FromStr for DedupMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scan" => Ok(Self::Scan),
            "digest" => Ok(Self::Digest),
            other => Err(format!("unknown dedup mode '{}'", other)),
        }
    }
}

impl fmt::Display for DedupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan => f.write_str("scan"),
            Self::Digest => f.write_str("digest"),
        }
    }
}

/// Content to identifier view over a [`PasteStore`].
pub struct DedupIndex<'a> {
    store: &'a PasteStore,
    mode: DedupMode,
}

impl<'a> DedupIndex<'a> {
    /// Bind a lookup view to `store`.
    pub fn new(store: &'a PasteStore, mode: DedupMode) -> Self {
        Self { store, mode }
    }

    /// Find the identifier of a stored paste with exactly `content`.
    ///
    /// # Returns
    /// `Ok(Some(id))` on a match, `Ok(None)` when no paste has these bytes.
    ///
    /// # Errors
    /// Propagates storage errors from the scan or index lookup.
    pub fn lookup(&self, content: &[u8]) -> Result<Option<PasteId>, AppError> {
        match self.mode {
            DedupMode::Scan => self.scan_lookup(content),
            DedupMode::Digest => self.digest_lookup(content),
        }
    }

    fn scan_lookup(&self, content: &[u8]) -> Result<Option<PasteId>, AppError> {
        for row in self.store.scan()? {
            let (id, stored) = row?;
            if stored == content {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    fn digest_lookup(&self, content: &[u8]) -> Result<Option<PasteId>, AppError> {
        let digest = content_digest(content);
        let Some(id) = self.store.id_for_digest(&digest)? else {
            return Ok(None);
        };
        match self.store.get(&id)? {
            Some(stored) if stored == content => Ok(Some(id)),
            Some(_) => {
                tracing::warn!(
                    "Digest index entry {} does not match submitted bytes; falling back to scan",
                    id
                );
                self.scan_lookup(content)
            }
            None => Err(AppError::StorageMessage(format!(
                "Digest index references missing paste '{}'",
                id
            ))),
        }
    }
}
