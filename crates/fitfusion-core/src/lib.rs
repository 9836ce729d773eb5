//! Service plumbing shared by FitFusion services: tracing setup, health
//! payloads, HTTP middleware, the JSON error body and serde helpers.

pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
