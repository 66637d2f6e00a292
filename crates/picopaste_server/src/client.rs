//! Client origin resolution for admission control.

use crate::ClientKey;
use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Derive the admission bucket key for a request.
///
/// # Arguments
/// - `headers`: Request headers.
/// - `peer`: Socket address of the connected peer, when known.
/// - `trust_proxy`: Prefer the last `X-Forwarded-For` hop over the peer.
///
/// # Returns
/// The client key, or [`ClientKey::unknown`] when no origin is available.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> ClientKey {
    if trust_proxy {
        if let Some(ip) = forwarded_ip(headers) {
            return ClientKey::from(ip);
        }
    }
    peer.map(|addr| ClientKey::from(addr.ip()))
        .unwrap_or_else(ClientKey::unknown)
}

/// The hop appended by the trusted proxy. Earlier hops are client-supplied.
fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(FORWARDED_FOR_HEADER)?
        .to_str()
        .ok()?
        .rsplit(',')
        .next()?
        .trim()
        .parse()
        .ok()
}
