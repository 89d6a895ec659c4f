//! Admission middleware
//!
//! Resolves the client identity from the connection's peer address, asks the
//! registry for that identity's bucket and either forwards the request or
//! rejects it with 429. Nothing is queued: denial is immediate.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::LimitScope;
use crate::error::{GatewayError, GatewayResult};
use crate::metrics::{ACTIVE_CLIENTS, IDENTITY_FAILURES, REQUEST_TOTAL, REQUESTS_ADMITTED, REQUESTS_REJECTED};
use crate::state::AppState;

// Identity every request maps to in global scope
pub const GLOBAL_IDENTITY: &str = "global";

pub async fn admission(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    match check_admission(&state, &req) {
        Ok(()) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}

fn check_admission(state: &AppState, req: &Request) -> GatewayResult<()> {
    REQUEST_TOTAL.inc();

    let identity = match state.scope {
        LimitScope::Global => GLOBAL_IDENTITY.to_string(),
        LimitScope::PerClient => identity_from_request(req).inspect_err(|_| IDENTITY_FAILURES.inc())?,
    };

    let bucket = state.registry.get_or_create(&identity);
    ACTIVE_CLIENTS.set(state.registry.len() as f64);

    if !bucket.try_admit() {
        REQUESTS_REJECTED.inc();
        tracing::debug!(%identity, "rate limit exceeded");
        return Err(GatewayError::RateLimitExceeded(identity));
    }

    REQUESTS_ADMITTED.inc();
    Ok(())
}

// Client IP from the peer address, port discarded
pub fn identity_from_request(req: &Request) -> GatewayResult<String> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .ok_or_else(|| GatewayError::ClientIdentityUnresolvable("<no peer address>".to_string()))?;

    split_host(&peer).map(str::to_string)
}

/// Splits `host:port` or `[host]:port` and returns the host.
///
/// Anything else (no port separator, unbracketed IPv6, stray brackets, empty
/// host) is an error rather than a fallback identity.
pub fn split_host(addr: &str) -> GatewayResult<&str> {
    let unresolvable = || GatewayError::ClientIdentityUnresolvable(addr.to_string());

    let host = if let Some(rest) = addr.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or_else(unresolvable)?;
        if !after.starts_with(':') || host.contains('[') {
            return Err(unresolvable());
        }
        host
    } else {
        let (host, _port) = addr.rsplit_once(':').ok_or_else(unresolvable)?;
        if host.contains(':') {
            return Err(unresolvable());
        }
        host
    };

    if host.is_empty() || host.contains(['[', ']']) {
        return Err(unresolvable());
    }
    Ok(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    #[test]
    fn splits_ipv4_and_ipv6() {
        assert_eq!(split_host("127.0.0.1:54321").unwrap(), "127.0.0.1");
        assert_eq!(split_host("[::1]:8080").unwrap(), "::1");
        assert_eq!(split_host("[fe80::1%eth0]:80").unwrap(), "fe80::1%eth0");
        assert_eq!(split_host("localhost:1").unwrap(), "localhost");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "127.0.0.1", "::1:80", "[::1]", "[::1]80", ":80", "a]b:80", "[[::1]:80"] {
            assert!(
                matches!(split_host(bad), Err(GatewayError::ClientIdentityUnresolvable(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn identity_comes_from_connect_info() {
        let addr: SocketAddr = "192.168.1.7:40000".parse().unwrap();
        let req = http::Request::builder()
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap();
        assert_eq!(identity_from_request(&req).unwrap(), "192.168.1.7");
    }

    #[test]
    fn missing_peer_address_is_unresolvable() {
        let req = http::Request::builder().body(Body::empty()).unwrap();
        assert!(matches!(
            identity_from_request(&req),
            Err(GatewayError::ClientIdentityUnresolvable(_))
        ));
    }
}
