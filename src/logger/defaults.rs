//! Request metadata captured once when a logger is created.

use axum::http::{header, HeaderMap, Request};

use crate::config::LoggerSettings;
use crate::edge::{header_str, request_url, EdgeMetadata, CF_CONNECTING_IP, CF_RAY};
use crate::logger::entry::{Meta, MetaValue};

/// Sent as `referer` when the request has none.
pub const DEFAULT_REFERER: &str = "empty";
/// Sent as `x_forwarded_for` when the request has none.
pub const DEFAULT_FORWARDED_FOR: &str = "0.0.0.0";

/// Fields shared by every line of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultLogData {
    pub app: String,
    pub env: String,
    pub meta: Meta,
}

impl DefaultLogData {
    /// Build the default data for `request`. Never fails: missing headers and
    /// missing edge metadata fall back to defaults or are left out.
    pub fn from_request<B>(request: &Request<B>, settings: &LoggerSettings) -> Self {
        let headers = request.headers();
        let edge = request.extensions().get::<EdgeMetadata>();
        let mut meta = Meta::new();

        put(&mut meta, "ua", header_str(headers, header::USER_AGENT.as_str()));
        meta.insert(
            "referer".into(),
            header_str(headers, header::REFERER.as_str())
                .unwrap_or(DEFAULT_REFERER)
                .into(),
        );
        put(&mut meta, "ip", header_str(headers, CF_CONNECTING_IP));
        put(&mut meta, "countryCode", edge.and_then(|e| e.country.as_deref()));
        put(&mut meta, "colo", edge.and_then(|e| e.colo.as_deref()));
        meta.insert("url".into(), request_url(request).into());
        meta.insert("method".into(), request.method().as_str().into());
        meta.insert(
            "x_forwarded_for".into(),
            forwarded_for(headers).unwrap_or(DEFAULT_FORWARDED_FOR).into(),
        );
        put(&mut meta, "asn", edge.and_then(|e| e.asn));
        put(&mut meta, "cfRay", header_str(headers, CF_RAY));
        put(&mut meta, "tlsCipher", edge.and_then(|e| e.tls_cipher.as_deref()));
        put(&mut meta, "tlsVersion", edge.and_then(|e| e.tls_version.as_deref()));
        put(&mut meta, "clientTrustScore", edge.and_then(|e| e.client_trust_score));

        Self {
            app: settings.app_name.clone(),
            env: settings.env.clone(),
            meta,
        }
    }
}

// Some edge rules forward the header under its underscored name.
fn forwarded_for(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, "x-forwarded-for").or_else(|| header_str(headers, "x_forwarded_for"))
}

fn put<V: Into<MetaValue>>(meta: &mut Meta, key: &str, value: Option<V>) {
    if let Some(value) = value {
        meta.insert(key.to_string(), value.into());
    }
}
