//! Public-sharing lifecycle of a routine.
//!
//! `Private -> Shared { token, expires_at } -> Private`. Sharing is always
//! time-bounded; the expiry sweep returns expired shares to `Private`.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharingState {
    Private,
    Shared {
        token: Option<String>,
        expires_at: DateTime<Utc>,
    },
}

impl SharingState {
    /// Build the state from the raw routine fields. A public routine without
    /// an expiry is treated as private: it can never be swept, so it is never
    /// considered shared.
    pub fn from_fields(
        is_public: bool,
        token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        match (is_public, expires_at) {
            (true, Some(expires_at)) => Self::Shared { token, expires_at },
            _ => Self::Private,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared { .. })
    }

    /// Strictly past expiry. A share expiring exactly at `now` is still live.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Private => false,
            Self::Shared { expires_at, .. } => *expires_at < now,
        }
    }
}
