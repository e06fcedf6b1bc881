//! Week buckets a project's contract spans.
//!
//! Each month is cut into `weeks_per_month` slots, so the calendar is just a
//! start month, a month count and the partition size. Slot lookups are plain
//! arithmetic.

use chrono::{Datelike, Local, NaiveDate};
use tracing::debug;

use crate::config::CalendarConfig;
use crate::model::project::Project;
use crate::model::schedule::WeekSlot;
use crate::time::{month_offset, months_between, parse_contract_date};

/// Spans longer than this are treated as bad data.
pub const MAX_SPAN_MONTHS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    start: (i32, u32),
    months: u32,
    weeks_per_month: u32,
}

impl Calendar {
    /// Builds the calendar from contract dates. Never fails: a missing or
    /// inverted range degrades to January..December of a single year.
    pub fn generate(start: Option<NaiveDate>, end: Option<NaiveDate>, config: &CalendarConfig) -> Self {
        let weeks_per_month = config.weeks_per_month();

        if let (Some(s), Some(e)) = (start, end) {
            match months_between(s, e) {
                Some(months) if months <= MAX_SPAN_MONTHS => {
                    return Self {
                        start: (s.year(), s.month()),
                        months,
                        weeks_per_month,
                    };
                }
                _ => debug!(%s, %e, "contract range unusable, using default span"),
            }
        }

        let year = start
            .or(end)
            .map(|d| d.year())
            .or(config.default_year)
            .unwrap_or_else(|| Local::now().year());
        Self::default_span(year, weeks_per_month)
    }

    pub fn for_project(project: &Project, config: &CalendarConfig) -> Self {
        let parse = |raw: &Option<String>| {
            raw.as_deref().and_then(|s| match parse_contract_date(s) {
                Ok(d) => Some(d),
                Err(err) => {
                    debug!(project = %project.id, "{}", err);
                    None
                }
            })
        };
        Self::generate(parse(&project.contract_start), parse(&project.contract_end), config)
    }

    fn default_span(year: i32, weeks_per_month: u32) -> Self {
        Self {
            start: (year, 1),
            months: 12,
            weeks_per_month,
        }
    }

    pub fn weeks_per_month(&self) -> u32 {
        self.weeks_per_month
    }

    /// (year, month) pairs from start to end, inclusive.
    pub fn months(&self) -> Vec<(i32, u32)> {
        (0..self.months).map(|i| month_offset(self.start, i)).collect()
    }

    pub fn weeks(&self) -> Vec<WeekSlot> {
        self.months()
            .into_iter()
            .flat_map(|(year, month)| {
                (1..=self.weeks_per_month).map(move |week| WeekSlot::new(year, month, week))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        (self.months * self.weeks_per_month) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of `slot` in `weeks()`, or `None` if it falls outside the calendar.
    pub fn index_of(&self, slot: WeekSlot) -> Option<usize> {
        if slot.month == 0 || slot.month > 12 || slot.week == 0 || slot.week > self.weeks_per_month {
            return None;
        }
        let (start_year, start_month) = self.start;
        let month_index = (slot.year as i64 - start_year as i64) * 12 + slot.month as i64
            - start_month as i64;
        if month_index < 0 || month_index >= self.months as i64 {
            return None;
        }
        Some(month_index as usize * self.weeks_per_month as usize + (slot.week - 1) as usize)
    }

    pub fn contains(&self, slot: WeekSlot) -> bool {
        self.index_of(slot).is_some()
    }
}
