//! Shared constants used across Picopaste crates.

/// Default HTTP port for the paste server.
pub const DEFAULT_PORT: u16 = 8080;

/// Default database directory when `PICOPASTE_DB_PATH` is unset.
pub const DEFAULT_DB_PATH: &str = "/tmp/db";

/// Default maximum paste size accepted by the service (4 MiB).
pub const DEFAULT_MAX_PASTE_SIZE: usize = 4 * 1024 * 1024;

/// Default number of write requests admitted per client per window.
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 2;

/// Default admission window length in seconds.
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 30;

/// Number of characters in a paste identifier.
pub const PASTE_ID_LENGTH: usize = 8;

/// Symbols a paste identifier is drawn from. Every symbol is URL path safe.
pub const PASTE_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-.~";

/// Exclusive owner lock held by the process that has the database open.
pub const DB_OWNER_LOCK_FILE_NAME: &str = "db.owner.lock";
