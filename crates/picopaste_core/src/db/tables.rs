//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical paste rows: raw identifier bytes to raw content bytes.
pub const PASTES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("pastes");
/// Content digest index: BLAKE3 digest of the content to identifier bytes.
pub const PASTE_DIGESTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("paste_digests");
