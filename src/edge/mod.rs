//! Edge network request metadata.
//!
//! The edge network in front of the service knows things the origin does not:
//! the client's country and ASN, the point of presence that answered, and the
//! negotiated TLS parameters. This module carries those values as a request
//! extension and derives them from forwarded headers when running as an origin.

use axum::http::{header, HeaderMap, Request};
use serde::{Deserialize, Serialize};

/// Two-letter country code of the client.
pub const CF_IPCOUNTRY: &str = "cf-ipcountry";
/// Edge trace identifier, `<id>-<COLO>`.
pub const CF_RAY: &str = "cf-ray";
/// Client IP as seen by the edge.
pub const CF_CONNECTING_IP: &str = "cf-connecting-ip";
pub const X_EDGE_ASN: &str = "x-edge-asn";
pub const X_EDGE_TLS_CIPHER: &str = "x-edge-tls-cipher";
pub const X_EDGE_TLS_VERSION: &str = "x-edge-tls-version";
pub const X_EDGE_TRUST_SCORE: &str = "x-edge-trust-score";

/// Attributes supplied by the edge network. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeMetadata {
    pub country: Option<String>,
    pub colo: Option<String>,
    pub asn: Option<u32>,
    pub tls_cipher: Option<String>,
    pub tls_version: Option<String>,
    pub client_trust_score: Option<u8>,
}

impl EdgeMetadata {
    /// Derive metadata from headers forwarded by the edge. Missing or
    /// malformed values are left empty.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            country: header_str(headers, CF_IPCOUNTRY).map(str::to_owned),
            colo: header_str(headers, CF_RAY).and_then(colo_from_ray).map(str::to_owned),
            asn: header_str(headers, X_EDGE_ASN).and_then(|v| v.trim().parse().ok()),
            tls_cipher: header_str(headers, X_EDGE_TLS_CIPHER).map(str::to_owned),
            tls_version: header_str(headers, X_EDGE_TLS_VERSION).map(str::to_owned),
            client_trust_score: header_str(headers, X_EDGE_TRUST_SCORE)
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The point-of-presence code at the end of a ray id (`7d0c1e2f3a4b5c6d-LHR`).
fn colo_from_ray(ray: &str) -> Option<&str> {
    match ray.rsplit_once('-') {
        Some((id, colo)) if !id.is_empty() && !colo.is_empty() => Some(colo),
        _ => None,
    }
}

/// Case-insensitive header lookup. Non-UTF-8 values count as absent.
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Absolute URL of a request.
///
/// Origin-form URIs (HTTP/1.1) are completed from the `Host` header and
/// `x-forwarded-proto`; without a host only the path and query are returned.
pub fn request_url<B>(request: &Request<B>) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let headers = request.headers();
    match header_str(headers, header::HOST.as_str()) {
        Some(host) => {
            let scheme = header_str(headers, "x-forwarded-proto").unwrap_or("http");
            format!("{scheme}://{host}{path}")
        }
        None => path.to_string(),
    }
}
