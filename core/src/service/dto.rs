use serde::{Deserialize, Serialize};

use crate::model::progress::CumulativePoint;

/// Rounds for display. Never used on values that feed further sums.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CurveRowDto {
    pub label: String, // "2024-03 W2"
    pub plan: Option<f64>,
    pub actual: Option<f64>,
    pub deviation: Option<f64>,
}

impl CurveRowDto {
    pub fn from_point(point: &CumulativePoint, places: u32) -> Self {
        let round = |v: Option<f64>| v.map(|v| round_to(v, places));
        Self {
            label: point.slot().to_string(),
            plan: round(point.cumulative_plan),
            actual: round(point.cumulative_actual),
            deviation: round(point.cumulative_deviation),
        }
    }
}
