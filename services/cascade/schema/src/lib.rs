//! sea-orm entities for the cascade service's document store.

pub mod documents;
