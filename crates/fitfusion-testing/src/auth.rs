//! Mock caller identity for HTTP tests.
//!
//! Services behind the gateway receive `x-fitfusion-user-id` once the gateway
//! has verified the session. Tests inject the header directly so no real
//! gateway is needed.

use fitfusion_auth_types::USER_ID_HEADER;
use http::{HeaderName, HeaderValue};

/// Caller identity injected into test requests.
pub struct MockAuth {
    pub user_id: String,
}

impl MockAuth {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// The header name/value pair as the gateway would inject it.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id).expect("test user id must be a valid header"),
        )
    }
}
