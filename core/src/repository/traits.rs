use crate::model::project::{Project, ProjectSnapshot};
use crate::model::schedule::ScheduleEntry;
use anyhow::Result;
use uuid::Uuid;

/// Source of project rows for the progress engine.
pub trait ProjectRepository {
    fn list_projects(&self) -> Result<Vec<Project>>;
    /// All rows for one project, or `None` if the project doesn't exist.
    fn load_snapshot(&self, project_id: &Uuid) -> Result<Option<ProjectSnapshot>>;
    /// Inserts the entry, replacing any entry with the same owner and week.
    fn upsert_entry(&self, entry: ScheduleEntry) -> Result<()>;
}
