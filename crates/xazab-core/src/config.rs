//! Payment URI settings supplied by the host application.

use serde::{Deserialize, Serialize};

use crate::types::COIN_DECIMAL_POINT;

/// Scheme token carried by payment URIs that name an address.
pub const DEFAULT_URI_SCHEME: &str = "xazab";

/// Schemes still honoured for request-URL-only URIs (no address part).
pub const LEGACY_URI_SCHEMES: [&str; 1] = ["pay"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UriConfig {
    pub scheme: String,
    pub legacy_schemes: Vec<String>,
    /// Decimal places between the `amount` field and minor units.
    pub decimal_point: u32,
}

impl Default for UriConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_URI_SCHEME.to_string(),
            legacy_schemes: LEGACY_URI_SCHEMES.iter().map(|s| s.to_string()).collect(),
            decimal_point: COIN_DECIMAL_POINT,
        }
    }
}

impl UriConfig {
    /// Whether `scheme` may introduce a URI without an address.
    pub fn accepts_request_scheme(&self, scheme: &str) -> bool {
        scheme == self.scheme || self.legacy_schemes.iter().any(|legacy| legacy == scheme)
    }
}
