//! Auth types shared across FitFusion services.
//!
//! Session verification happens at the gateway; services only read the
//! caller identity it injects.

pub mod identity;

pub use identity::{CallerIdentity, USER_ID_HEADER};
