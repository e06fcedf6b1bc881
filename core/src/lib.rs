pub mod calendar;
pub mod config;
pub mod engine;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use calendar::Calendar;
pub use config::{CalendarConfig, Config};
pub use engine::{compute, normalize, ProgressReport};
pub use model::progress::{ActivityCurve, CumulativePoint};
pub use model::project::{Activity, Project, ProjectSnapshot, SubActivity};
pub use model::schedule::{ScheduleEntry, ScheduleOwner, WeekSlot};
pub use repository::{FileProjectRepository, ProjectRepository};
pub use service::{CurveRowDto, ProgressService};
pub use usecase::{MonitoringSummary, MonitoringUseCase, ScheduleStatus};
