pub mod aggregate;
pub mod arena;
pub mod densify;
pub mod weights;

use crate::calendar::Calendar;
use crate::config::CalendarConfig;
use crate::model::progress::{ActivityCurve, CumulativePoint};
use crate::model::project::{Project, ProjectSnapshot};
use crate::model::schedule::WeekSlot;

pub use aggregate::{activity_series, cumulative_series, reported_actual_weeks};
pub use arena::ProjectTree;
pub use weights::normalize;

/// Everything computed for one project in a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub project: Project,
    pub calendar: Calendar,
    pub series: Vec<CumulativePoint>,
    pub activities: Vec<ActivityCurve>,
    /// Calendar weeks in which some leaf reported an actual value, ascending.
    pub reported_weeks: Vec<WeekSlot>,
}

impl ProgressReport {
    pub fn has_data(&self) -> bool {
        !self.series.is_empty()
    }
}

/// Runs the whole engine for one snapshot. Pure: same input, same output.
pub fn compute(snapshot: &ProjectSnapshot, config: &CalendarConfig) -> ProgressReport {
    let calendar = Calendar::for_project(&snapshot.project, config);
    let tree = ProjectTree::build(snapshot);
    ProgressReport {
        project: snapshot.project.clone(),
        calendar,
        series: cumulative_series(&tree, &calendar),
        activities: activity_series(&tree, &calendar),
        reported_weeks: reported_actual_weeks(&tree, &calendar),
    }
}
