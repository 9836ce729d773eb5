pub mod plan;
pub mod repository;
pub mod types;
