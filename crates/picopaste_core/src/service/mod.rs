//! Submit/fetch orchestration over the paste store.

use crate::admission::{Admission, AdmissionController};
use crate::config::Config;
use crate::db::Database;
use crate::dedup::{DedupIndex, DedupMode};
use crate::error::AppError;
use crate::models::{ClientKey, PasteId};
use crate::naming;
use std::sync::Arc;


/// Entry point used by the HTTP layer to store and read pastes.
pub struct PasteService {
    db: Arc<Database>,
    admission: AdmissionController,
    dedup_mode: DedupMode,
    max_paste_size: usize,
}

impl PasteService {
    /// Build a service over an already opened database.
    ///
    /// # Arguments
    /// - `db`: Shared database handle, opened once per process.
    /// - `config`: Admission, dedup and size settings.
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        Self {
            db,
            admission: AdmissionController::new(config.rate_limit_max, config.rate_limit_window),
            dedup_mode: config.dedup_mode,
            max_paste_size: config.max_paste_size,
        }
    }

    /// Shared database handle.
    pub fn store(&self) -> &Arc<Database> {
        &self.db
    }

    /// Admission controller guarding submissions.
    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// Store `content` on behalf of `client` and return its identifier.
    ///
    /// Byte-identical content already in the store resolves to the existing
    /// identifier without writing.
    ///
    /// # Returns
    /// The identifier mapped to `content`.
    ///
    /// # Errors
    /// - [`AppError::EmptyContent`] for an empty body.
    /// - [`AppError::PayloadTooLarge`] above the configured size.
    /// - [`AppError::RateLimited`] when `client` exhausted its window.
    /// - A store fault when the database fails.
    pub fn submit(&self, client: &ClientKey, content: &[u8]) -> Result<PasteId, AppError> {
        self.submit_admitted(client, content).map(|(id, _)| id)
    }

    /// Like [`Self::submit`], also returning the admission budget left for
    /// `client` in its current window.
    ///
    /// # Errors
    /// Same as [`Self::submit`].
    pub fn submit_admitted(
        &self,
        client: &ClientKey,
        content: &[u8],
    ) -> Result<(PasteId, u32), AppError> {
        if content.is_empty() {
            return Err(AppError::EmptyContent);
        }
        if content.len() > self.max_paste_size {
            return Err(AppError::PayloadTooLarge {
                limit: self.max_paste_size,
            });
        }
        let remaining = match self.admission.allow(client) {
            Admission::Allowed { remaining } => remaining,
            Admission::Limited { retry_after } => {
                return Err(AppError::RateLimited { retry_after });
            }
        };

        let pastes = &self.db.pastes;
        if let Some(existing) = DedupIndex::new(pastes, self.dedup_mode).lookup(content)? {
            tracing::debug!("Submission matches existing paste {}", existing);
            return Ok((existing, remaining));
        }

        loop {
            let id = naming::generate_unique_id(|candidate| pastes.has(candidate))?;
            match pastes.put(&id, content) {
                Ok(()) => {
                    tracing::info!("Stored paste {} ({} bytes)", id, content.len());
                    return Ok((id, remaining));
                }
                // Claimed by a concurrent writer between `has` and `put`.
                Err(AppError::IdentifierTaken(taken)) => {
                    tracing::debug!("Paste id {} taken concurrently; drawing another", taken);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Read the content stored under `id`.
    ///
    /// # Errors
    /// [`AppError::NotFound`] for malformed or unknown identifiers, or a store
    /// fault when the database fails.
    pub fn fetch(&self, id: &str) -> Result<Vec<u8>, AppError> {
        let id = PasteId::parse(id).ok_or(AppError::NotFound)?;
        self.db.pastes.get(&id)?.ok_or(AppError::NotFound)
    }
}
