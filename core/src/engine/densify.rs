use tracing::debug;

use crate::calendar::Calendar;
use crate::model::schedule::ScheduleEntry;

/// One leaf's values for one calendar week.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeekValue {
    pub plan: Option<f64>,
    pub actual: Option<f64>,
}

impl WeekValue {
    pub fn is_reported(&self) -> bool {
        self.plan.is_some() || self.actual.is_some()
    }
}

/// Spreads sparse schedule entries over every week of the calendar.
///
/// The result always has `calendar.len()` items. Weeks without an entry stay
/// `None` on both sides rather than 0, so "not reported" and "reported zero"
/// remain distinguishable. Entries outside the calendar are skipped, and a
/// later entry for the same week replaces an earlier one.
pub fn densify<'a, I>(calendar: &Calendar, entries: I) -> Vec<WeekValue>
where
    I: IntoIterator<Item = &'a ScheduleEntry>,
{
    let mut series = vec![WeekValue::default(); calendar.len()];

    for entry in entries {
        let slot = entry.slot();
        match calendar.index_of(slot) {
            Some(idx) => {
                series[idx] = WeekValue {
                    plan: finite(entry.plan_percentage),
                    actual: finite(entry.actual_percentage).map(|a| a.max(0.0)),
                };
            }
            None => debug!(entry = %entry.id, %slot, "schedule entry outside calendar, ignored"),
        }
    }

    series
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarConfig;
    use crate::model::schedule::ScheduleOwner;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn calendar() -> Calendar {
        Calendar::generate(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 3, 31),
            &CalendarConfig::default(),
        )
    }

    fn entry(month: u32, week: u32, plan: Option<f64>, actual: Option<f64>) -> ScheduleEntry {
        ScheduleEntry::new(ScheduleOwner::SubActivity(Uuid::nil()), 2024, month, week, plan, actual)
    }

    #[test]
    fn test_length_matches_calendar() {
        let cal = calendar();
        assert_eq!(densify(&cal, &Vec::<ScheduleEntry>::new()).len(), 12);

        let entries = vec![
            entry(1, 1, Some(5.0), None),
            entry(2, 3, Some(5.0), Some(1.0)),
            entry(7, 1, Some(5.0), Some(1.0)),
            entry(12, 4, Some(5.0), Some(1.0)),
        ];
        assert_eq!(densify(&cal, &entries).len(), 12);
    }

    #[test]
    fn test_gaps_are_null_not_zero() {
        let cal = calendar();
        let entries = vec![entry(1, 2, Some(0.0), Some(0.0))];
        let series = densify(&cal, &entries);

        assert_eq!(series[0], WeekValue { plan: None, actual: None });
        assert_eq!(series[1], WeekValue { plan: Some(0.0), actual: Some(0.0) });
        assert!(series[1].is_reported());
        assert!(!series[2].is_reported());
    }

    #[test]
    fn test_out_of_range_and_bad_values() {
        let cal = calendar();
        let entries = vec![
            entry(4, 1, Some(50.0), Some(50.0)),
            entry(1, 5, Some(50.0), Some(50.0)),
            entry(2, 1, Some(f64::NAN), Some(-3.0)),
        ];
        let series = densify(&cal, &entries);

        assert!(series.iter().filter(|w| w.is_reported()).count() == 1);
        assert_eq!(series[4], WeekValue { plan: None, actual: Some(0.0) });
    }

    #[test]
    fn test_duplicate_week_last_wins() {
        let cal = calendar();
        let entries = vec![entry(3, 2, Some(1.0), None), entry(3, 2, Some(2.0), Some(1.5))];
        let series = densify(&cal, &entries);
        assert_eq!(series[9], WeekValue { plan: Some(2.0), actual: Some(1.5) });
    }
}
