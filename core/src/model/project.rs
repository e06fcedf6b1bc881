use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::schedule::{ScheduleEntry, ScheduleOwner};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,

    // Kept as the raw strings the intake form stores. The calendar parses
    // them and falls back to a default span when they don't parse.
    pub contract_start: Option<String>,
    pub contract_end: Option<String>,
}

impl Project {
    pub fn new(name: String, contract_start: Option<String>, contract_end: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            contract_start,
            contract_end,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub order: u32,
    /// Share of the project, in percent. `None` counts as 0.
    #[serde(default)]
    pub weight: Option<f64>,
}

impl Activity {
    pub fn new(project_id: Uuid, name: String, order: u32, weight: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            name,
            order,
            weight,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubActivity {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    /// Share of the parent activity's contract value, in percent.
    #[serde(default)]
    pub weight: f64,
}

impl SubActivity {
    pub fn new(activity_id: Uuid, name: String, weight: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity_id,
            name,
            weight,
        }
    }
}

/// Everything the engine needs for one project, as flat rows.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectSnapshot {
    pub project: Project,
    pub activities: Vec<Activity>,
    pub sub_activities: Vec<SubActivity>,
    pub entries: Vec<ScheduleEntry>,
}

impl ProjectSnapshot {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            activities: Vec::new(),
            sub_activities: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Content hash over every input the engine and the reports read. Used as
    /// a cache key, so any edit to names, dates, weights or entries yields a
    /// different value. Independent of process and platform.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = Fingerprint::default();
        hasher.uuid(self.project.id);
        hasher.text(&self.project.name);
        hasher.opt_text(self.project.contract_start.as_deref());
        hasher.opt_text(self.project.contract_end.as_deref());

        hasher.count(self.activities.len());
        for activity in &self.activities {
            hasher.uuid(activity.id);
            hasher.uuid(activity.project_id);
            hasher.text(&activity.name);
            hasher.u32(activity.order);
            hasher.opt_f64(activity.weight);
        }
        hasher.count(self.sub_activities.len());
        for sub in &self.sub_activities {
            hasher.uuid(sub.id);
            hasher.uuid(sub.activity_id);
            hasher.text(&sub.name);
            hasher.f64(sub.weight);
        }
        hasher.count(self.entries.len());
        for entry in &self.entries {
            match entry.owner {
                ScheduleOwner::Activity(id) => {
                    hasher.u8(0);
                    hasher.uuid(id);
                }
                ScheduleOwner::SubActivity(id) => {
                    hasher.u8(1);
                    hasher.uuid(id);
                }
            }
            hasher.i32(entry.year);
            hasher.u32(entry.month);
            hasher.u32(entry.week);
            hasher.opt_f64(entry.plan_percentage);
            hasher.opt_f64(entry.actual_percentage);
        }
        hasher.0.finalize()
    }
}

/// Length-prefixed, little-endian feed into blake3 so adjacent fields can't
/// run into each other.
#[derive(Default)]
struct Fingerprint(blake3::Hasher);

impl Fingerprint {
    fn u8(&mut self, value: u8) {
        self.0.update(&[value]);
    }

    fn u32(&mut self, value: u32) {
        self.0.update(&value.to_le_bytes());
    }

    fn i32(&mut self, value: i32) {
        self.0.update(&value.to_le_bytes());
    }

    fn count(&mut self, value: usize) {
        self.0.update(&(value as u64).to_le_bytes());
    }

    fn f64(&mut self, value: f64) {
        self.0.update(&value.to_bits().to_le_bytes());
    }

    fn opt_f64(&mut self, value: Option<f64>) {
        match value {
            Some(v) => {
                self.u8(1);
                self.f64(v);
            }
            None => self.u8(0),
        }
    }

    fn uuid(&mut self, value: Uuid) {
        self.0.update(value.as_bytes());
    }

    fn text(&mut self, value: &str) {
        self.count(value.len());
        self.0.update(value.as_bytes());
    }

    fn opt_text(&mut self, value: Option<&str>) {
        match value {
            Some(v) => {
                self.u8(1);
                self.text(v);
            }
            None => self.u8(0),
        }
    }
}
