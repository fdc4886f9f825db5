//! Requester fingerprint extraction.
//!
//! The storefront sits behind Cloudflare and Fly.io, so the socket peer is
//! usually a proxy. Proxy headers are checked first, in order:
//! `CF-Connecting-IP`, `X-Forwarded-For` (first hop), `X-Real-IP`,
//! `Fly-Client-IP`. The socket peer is the fallback, then `"unknown"`.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{Extensions, HeaderMap, request::Parts};

use souq_core::RequesterFingerprint;

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

/// Client address reported by an upstream proxy.
#[must_use]
pub fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    // X-Forwarded-For lists the client first, then each proxy hop
    let first_forwarded = || {
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };

    header_ip(headers, "cf-connecting-ip")
        .or_else(first_forwarded)
        .or_else(|| header_ip(headers, "x-real-ip"))
        .or_else(|| header_ip(headers, "fly-client-ip"))
}

/// Socket peer recorded by `into_make_service_with_connect_info`.
#[must_use]
pub fn peer_ip(extensions: &Extensions) -> Option<IpAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// Best available client address.
#[must_use]
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> Option<IpAddr> {
    forwarded_ip(headers).or_else(|| peer_ip(extensions))
}

/// Extractor yielding the requester fingerprint used by the duplicate guard.
///
/// Never rejects: a request with no usable address gets the `unknown`
/// fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFingerprint(pub RequesterFingerprint);

impl<S> FromRequestParts<S> for ClientFingerprint
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let fingerprint = client_ip(&parts.headers, &parts.extensions)
            .map_or_else(RequesterFingerprint::unknown, RequesterFingerprint::from);
        Ok(Self(fingerprint))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_cloudflare_header_wins() {
        let map = headers(&[
            ("x-forwarded-for", "10.0.0.1, 172.16.0.1"),
            ("cf-connecting-ip", "41.100.2.3"),
        ]);
        assert_eq!(forwarded_ip(&map), Some("41.100.2.3".parse().unwrap()));
    }

    #[test]
    fn test_first_forwarded_hop() {
        let map = headers(&[("x-forwarded-for", " 105.98.1.1 , 172.16.0.1")]);
        assert_eq!(forwarded_ip(&map), Some("105.98.1.1".parse().unwrap()));
    }

    #[test]
    fn test_garbage_headers_fall_through() {
        let map = headers(&[("cf-connecting-ip", "not-an-ip"), ("fly-client-ip", "::1")]);
        assert_eq!(forwarded_ip(&map), Some("::1".parse().unwrap()));
    }

    #[test]
    fn test_peer_fallback() {
        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 9], 40000))));
        assert_eq!(
            client_ip(&HeaderMap::new(), &extensions),
            Some("192.168.1.9".parse().unwrap())
        );
        assert_eq!(client_ip(&HeaderMap::new(), &Extensions::new()), None);
    }

    #[tokio::test]
    async fn test_extractor_defaults_to_unknown() {
        let (mut parts, ()) = axum::http::Request::new(()).into_parts();
        let ClientFingerprint(fingerprint) =
            ClientFingerprint::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(fingerprint.is_unknown());
    }
}
