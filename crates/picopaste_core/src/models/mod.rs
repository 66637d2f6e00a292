//! Domain models shared by the store, service and HTTP layer.

/// Client identity used for admission control.
pub mod client;
/// Paste identifiers.
pub mod paste;

#[cfg(test)]
mod tests;

pub use client::ClientKey;
pub use paste::PasteId;
