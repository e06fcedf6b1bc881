pub mod progress;
pub mod project;
pub mod schedule;
