pub mod analytics;
pub mod cascade;
pub mod executor;
pub mod guard;
pub mod planner;
pub mod sweeper;
