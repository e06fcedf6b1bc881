pub mod monitoring;

pub use monitoring::{MonitoringSummary, MonitoringUseCase, ScheduleStatus};
