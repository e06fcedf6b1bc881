pub mod cache;
pub mod dto;
pub mod progress_service;

pub use cache::ProgressCache;
pub use dto::{round_to, CurveRowDto};
pub use progress_service::ProgressService;
