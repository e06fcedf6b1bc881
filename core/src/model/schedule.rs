use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The row a schedule entry hangs off. An entry belongs to exactly one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id")]
pub enum ScheduleOwner {
    Activity(Uuid),
    SubActivity(Uuid),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub owner: ScheduleOwner,
    pub month: u32,
    pub year: i32,
    pub week: u32,

    // None means "not reported yet", which is not the same as 0.
    pub plan_percentage: Option<f64>,
    pub actual_percentage: Option<f64>,
}

impl ScheduleEntry {
    pub fn new(
        owner: ScheduleOwner,
        year: i32,
        month: u32,
        week: u32,
        plan_percentage: Option<f64>,
        actual_percentage: Option<f64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            month,
            year,
            week,
            plan_percentage,
            actual_percentage,
        }
    }

    pub fn slot(&self) -> WeekSlot {
        WeekSlot::new(self.year, self.month, self.week)
    }
}

/// One week bucket. Field order gives chronological `Ord`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekSlot {
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

impl WeekSlot {
    pub fn new(year: i32, month: u32, week: u32) -> Self {
        Self { year, month, week }
    }
}

impl fmt::Display for WeekSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02} W{}", self.year, self.month, self.week)
    }
}
