use chrono::{DateTime, Utc};
use serde::Serialize;

/// Liveness payload served at `GET /healthz`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    #[serde(serialize_with = "crate::serde::to_rfc3339_ms")]
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

impl HealthStatus {
    /// A healthy report stamped with the local clock. Pass the calling
    /// service's `CARGO_PKG_VERSION`.
    pub fn healthy(version: &'static str) -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now(),
            version,
        }
    }
}
