use crate::model::schedule::WeekSlot;
use crate::repository::ProjectRepository;
use crate::service::progress_service::ProgressService;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum ScheduleStatus {
    /// The project has no schedule entries at all.
    NoData,
    /// Plans exist but no actual progress has been reported.
    AwaitingActuals,
    Ahead,
    OnTrack,
    Behind,
}

impl ScheduleStatus {
    /// Positive deviation means actual trails plan.
    pub fn classify(deviation: f64, tolerance: f64) -> Self {
        if deviation > tolerance {
            ScheduleStatus::Behind
        } else if deviation < -tolerance {
            ScheduleStatus::Ahead
        } else {
            ScheduleStatus::OnTrack
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonitoringSummary {
    pub project_id: Uuid,
    pub project_name: String,
    pub as_of: Option<WeekSlot>,
    pub plan: Option<f64>,
    pub actual: Option<f64>,
    pub deviation: Option<f64>,
    pub total_weeks: usize,
    pub reported_weeks: usize,
    pub status: ScheduleStatus,
}

pub struct MonitoringUseCase<'a, R: ProjectRepository> {
    progress: &'a ProgressService<R>,
    tolerance: f64,
}

impl<'a, R: ProjectRepository> MonitoringUseCase<'a, R> {
    pub fn new(progress: &'a ProgressService<R>, tolerance: f64) -> Self {
        Self {
            progress,
            tolerance,
        }
    }

    /// Where the project stands at its latest reported week.
    pub fn summary(&self, project_id: &Uuid) -> Result<MonitoringSummary> {
        let report = self.progress.report(project_id)?;
        let total_weeks = report.calendar.len();

        let mut summary = MonitoringSummary {
            project_id: *project_id,
            project_name: report.project.name.clone(),
            as_of: None,
            plan: None,
            actual: None,
            deviation: None,
            total_weeks,
            reported_weeks: report.reported_weeks.len(),
            status: ScheduleStatus::NoData,
        };
        if !report.has_data() {
            return Ok(summary);
        }

        // Last week with actuals, or the end of the calendar when none yet.
        let point = match report.reported_weeks.last() {
            Some(slot) => report.series.iter().find(|p| p.slot() == *slot),
            None => report.series.last(),
        };
        if let Some(point) = point {
            summary.as_of = Some(point.slot());
            summary.plan = point.cumulative_plan;
            summary.actual = point.cumulative_actual;
            summary.deviation = point.cumulative_deviation;
            summary.status = match point.cumulative_deviation {
                Some(deviation) => ScheduleStatus::classify(deviation, self.tolerance),
                None => ScheduleStatus::AwaitingActuals,
            };
        }
        Ok(summary)
    }

    pub fn summaries(&self) -> Result<Vec<MonitoringSummary>> {
        self.progress
            .list_projects()?
            .iter()
            .map(|p| self.summary(&p.id))
            .collect()
    }
}
