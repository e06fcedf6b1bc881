use anyhow::{anyhow, Result};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::CalendarConfig;
use crate::engine::{self, ProgressReport};
use crate::model::progress::{ActivityCurve, CumulativePoint};
use crate::model::project::Project;
use crate::model::schedule::ScheduleEntry;
use crate::repository::ProjectRepository;
use crate::service::cache::ProgressCache;

pub struct ProgressService<R: ProjectRepository> {
    repo: R,
    config: CalendarConfig,
    cache: ProgressCache,
}

impl<R: ProjectRepository> ProgressService<R> {
    pub fn new(repo: R, config: CalendarConfig) -> Self {
        Self {
            repo,
            config,
            cache: ProgressCache::new(),
        }
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.repo.list_projects()
    }

    /// Full engine output for the project's current snapshot.
    pub fn report(&self, project_id: &Uuid) -> Result<ProgressReport> {
        let snapshot = self
            .repo
            .load_snapshot(project_id)?
            .ok_or_else(|| anyhow!("Project with ID {} not found", project_id))?;

        let fingerprint = snapshot.fingerprint();
        if let Some(report) = self.cache.get(*project_id, fingerprint) {
            debug!(project = %project_id, "progress cache hit");
            return Ok(report);
        }

        info!(
            project = %project_id,
            activities = snapshot.activities.len(),
            entries = snapshot.entries.len(),
            "computing progress"
        );
        let report = engine::compute(&snapshot, &self.config);
        self.cache.insert(*project_id, fingerprint, report.clone());
        Ok(report)
    }

    pub fn project_curve(&self, project_id: &Uuid) -> Result<Vec<CumulativePoint>> {
        Ok(self.report(project_id)?.series)
    }

    pub fn activity_curves(&self, project_id: &Uuid) -> Result<Vec<ActivityCurve>> {
        Ok(self.report(project_id)?.activities)
    }

    /// Saves a schedule entry and drops the project's cached results.
    pub fn record_entry(&self, project_id: &Uuid, entry: ScheduleEntry) -> Result<()> {
        self.repo.upsert_entry(entry)?;
        self.invalidate(project_id);
        Ok(())
    }

    pub fn invalidate(&self, project_id: &Uuid) {
        self.cache.invalidate(*project_id);
    }

    pub fn cached_reports(&self) -> usize {
        self.cache.len()
    }
}
