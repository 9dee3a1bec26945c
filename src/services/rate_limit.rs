use axum::{
    extract::ConnectInfo,
    http::{HeaderMap, Request},
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower_governor::{GovernorError, key_extractor::KeyExtractor};

/// Rate-limit bucket key: the client's IP address.
///
/// Sensor gateways often sit behind a reverse proxy, so forwarded headers are
/// consulted before the socket peer. Requests with no identifiable address
/// (e.g. no `ConnectInfo` in tests) share the loopback bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(client_ip(req.headers(), peer))
    }
}

/// Resolve the client address: first hop of `X-Forwarded-For`, then
/// `X-Real-IP`, then the socket peer, then loopback.
#[must_use]
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> IpAddr {
    header_ip(headers, "x-forwarded-for", |v| v.split(',').next())
        .or_else(|| header_ip(headers, "x-real-ip", Some))
        .or(peer)
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn header_ip<'h>(
    headers: &'h HeaderMap,
    name: &str,
    pick: impl FnOnce(&'h str) -> Option<&'h str>,
) -> Option<IpAddr> {
    let value = headers.get(name)?.to_str().ok()?;
    pick(value)?.trim().parse().ok()
}
