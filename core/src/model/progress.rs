use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::schedule::WeekSlot;

/// One point of the S-curve. Safe to hand straight to a chart or a response body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CumulativePoint {
    pub month: u32,
    pub year: i32,
    pub week: u32,
    pub cumulative_plan: Option<f64>,
    pub cumulative_actual: Option<f64>,
    pub cumulative_deviation: Option<f64>,
}

impl CumulativePoint {
    pub fn new(slot: WeekSlot, plan: Option<f64>, actual: Option<f64>) -> Self {
        let deviation = match (plan, actual) {
            (Some(p), Some(a)) => Some(p - a),
            _ => None,
        };
        Self {
            month: slot.month,
            year: slot.year,
            week: slot.week,
            cumulative_plan: plan,
            cumulative_actual: actual,
            cumulative_deviation: deviation,
        }
    }

    pub fn slot(&self) -> WeekSlot {
        WeekSlot::new(self.year, self.month, self.week)
    }
}

/// Cumulative contribution of a single activity to the project total.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCurve {
    pub activity_id: Uuid,
    pub name: String,
    /// Normalized share of the project, in percent.
    pub share: f64,
    pub points: Vec<CumulativePoint>,
}
