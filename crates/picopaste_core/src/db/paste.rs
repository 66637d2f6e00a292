//! Paste storage operations backed by redb.

use super::tables::{PASTES, PASTE_DIGESTS};
use crate::{error::AppError, models::PasteId};
use redb::{ReadOnlyTable, ReadTransaction, ReadableDatabase, ReadableTable, ReadableTableMetadata};
use std::collections::HashSet;
use std::ops::Bound;
use std::sync::Arc;

/// BLAKE3 digest used as the content index key.
pub(crate) fn content_digest(content: &[u8]) -> [u8; 32] {
    *blake3::hash(content).as_bytes()
}

fn decode_key(bytes: &[u8]) -> Result<PasteId, AppError> {
    String::from_utf8(bytes.to_vec())
        .map(PasteId::from_stored)
        .map_err(|_| AppError::StorageMessage("Stored paste key is not valid UTF-8".to_string()))
}

/// Accessor for paste-related redb tables.
///
/// Rows are insert-only: once an identifier maps to content it is never
/// rewritten or removed.
pub struct PasteStore {
    db: Arc<redb::Database>,
}

impl PasteStore {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Returns
    /// A new [`PasteStore`] accessor bound to `db`.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTE_DIGESTS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new paste row and its digest index row atomically.
    ///
    /// The existence check and the insert share one write transaction, and
    /// redb admits a single writer at a time, so two concurrent puts of the
    /// same identifier can never both succeed.
    ///
    /// # Arguments
    /// - `id`: Identifier to claim.
    /// - `content`: Paste bytes, stored without any envelope.
    ///
    /// # Returns
    /// `Ok(())` once the transaction is committed durably.
    ///
    /// # Errors
    /// Returns [`AppError::IdentifierTaken`] when `id` is already mapped, or a
    /// store fault when redb fails.
    pub fn put(&self, id: &PasteId, content: &[u8]) -> Result<(), AppError> {
        let digest = content_digest(content);
        let write_txn = self.db.begin_write()?;
        let taken = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let taken = pastes.get(id.as_bytes())?.is_some();
            if !taken {
                pastes.insert(id.as_bytes(), content)?;

                // The first paste stored for a digest keeps the index entry.
                let mut digests = write_txn.open_table(PASTE_DIGESTS)?;
                if digests.get(digest.as_slice())?.is_none() {
                    digests.insert(digest.as_slice(), id.as_bytes())?;
                }
            }
            taken
        };
        if taken {
            write_txn.abort()?;
            return Err(AppError::IdentifierTaken(id.to_string()));
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch paste content by id.
    ///
    /// # Returns
    /// `Ok(Some(bytes))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn get(&self, id: &PasteId) -> Result<Option<Vec<u8>>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        Ok(pastes.get(id.as_bytes())?.map(|value| value.value().to_vec()))
    }

    /// Check whether `id` is mapped, without copying its content.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn has(&self, id: &PasteId) -> Result<bool, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        Ok(pastes.get(id.as_bytes())?.is_some())
    }

    /// Number of stored pastes.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn len(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        Ok(pastes.len()?)
    }

    /// Whether the store holds no pastes.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }

    /// Start a lazy scan over every stored paste.
    ///
    /// The scan reads one snapshot: pastes committed after this call are not
    /// observed. Call `scan` again to restart from the beginning.
    ///
    /// # Errors
    /// Returns an error when the read transaction cannot be opened.
    pub fn scan(&self) -> Result<PasteScan, AppError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(PASTES)?;
        Ok(PasteScan {
            table,
            _txn: txn,
            cursor: None,
            done: false,
        })
    }

    /// Look up the identifier recorded for a content digest.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn id_for_digest(&self, digest: &[u8; 32]) -> Result<Option<PasteId>, AppError> {
        let read_txn = self.db.begin_read()?;
        let digests = read_txn.open_table(PASTE_DIGESTS)?;
        match digests.get(digest.as_slice())? {
            Some(value) => Ok(Some(decode_key(value.value())?)),
            None => Ok(None),
        }
    }

    /// Whether the digest index row count disagrees with the paste rows.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub(crate) fn needs_reconcile_digest_index(&self) -> Result<bool, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes_table = read_txn.open_table(PASTES)?;
        let pastes = pastes_table.len()?;
        let digests = read_txn.open_table(PASTE_DIGESTS)?.len()?;
        // Duplicate content stored by a dedup race leaves fewer digest rows
        // than pastes, so only rows missing for distinct content count.
        if digests > pastes {
            return Ok(true);
        }
        if digests == pastes {
            return Ok(false);
        }
        let mut distinct = HashSet::new();
        for item in pastes_table.iter()? {
            let (_, value) = item?;
            distinct.insert(content_digest(value.value()));
        }
        Ok(distinct.len() as u64 != digests)
    }

    /// Rebuild the digest index from the canonical paste rows.
    ///
    /// For content stored under several identifiers the entry with the lowest
    /// key wins, matching the scan order used by dedup lookups.
    ///
    /// # Returns
    /// Number of digest rows written.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn rebuild_digest_index(&self) -> Result<u64, AppError> {
        let write_txn = self.db.begin_write()?;
        let mut written = 0;
        {
            write_txn.delete_table(PASTE_DIGESTS)?;
            let pastes = write_txn.open_table(PASTES)?;
            let mut digests = write_txn.open_table(PASTE_DIGESTS)?;
            for item in pastes.iter()? {
                let (key, value) = item?;
                let digest = content_digest(value.value());
                if digests.get(digest.as_slice())?.is_none() {
                    digests.insert(digest.as_slice(), key.value())?;
                    written += 1;
                }
            }
        }
        write_txn.commit()?;
        Ok(written)
    }
}

/// Lazy, finite iterator over `(id, content)` pairs in key order.
///
/// Each step seeks past the previously returned key inside the snapshot held
/// by the scan, so only one row is materialized at a time.
pub struct PasteScan {
    table: ReadOnlyTable<&'static [u8], &'static [u8]>,
    _txn: ReadTransaction,
    cursor: Option<Vec<u8>>,
    done: bool,
}

impl PasteScan {
    fn next_row(&mut self) -> Result<Option<(PasteId, Vec<u8>)>, AppError> {
        let lower = match self.cursor.as_deref() {
            Some(last) => Bound::Excluded(last),
            None => Bound::Unbounded,
        };
        let mut range = self.table.range::<&[u8]>((lower, Bound::Unbounded))?;
        let row = match range.next() {
            Some(item) => {
                let (key, value) = item?;
                Some((key.value().to_vec(), value.value().to_vec()))
            }
            None => None,
        };
        drop(range);

        match row {
            Some((key, content)) => {
                let id = decode_key(&key)?;
                self.cursor = Some(key);
                Ok(Some((id, content)))
            }
            None => Ok(None),
        }
    }
}

impl Iterator for PasteScan {
    type Item = Result<(PasteId, Vec<u8>), AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
