//! Indexed, in-memory form of one project's activity tree.
//!
//! Built once from the flat rows of a [`ProjectSnapshot`] so the aggregator
//! walks plain vectors instead of looking parents up by id.

use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::model::project::{Activity, Project, ProjectSnapshot, SubActivity};
use crate::model::schedule::{ScheduleEntry, ScheduleOwner};

#[derive(Debug)]
pub struct ActivityNode<'a> {
    pub activity: &'a Activity,
    pub sub_activities: Vec<usize>,
    pub entries: Vec<&'a ScheduleEntry>,
}

#[derive(Debug)]
pub struct SubActivityNode<'a> {
    pub sub_activity: &'a SubActivity,
    pub entries: Vec<&'a ScheduleEntry>,
}

#[derive(Debug)]
pub struct ProjectTree<'a> {
    pub project: &'a Project,
    /// Sorted by display order, then id.
    pub activities: Vec<ActivityNode<'a>>,
    pub sub_activities: Vec<SubActivityNode<'a>>,
}

impl<'a> ProjectTree<'a> {
    pub fn build(snapshot: &'a ProjectSnapshot) -> Self {
        let project = &snapshot.project;

        let mut activity_rows: Vec<&Activity> = snapshot
            .activities
            .iter()
            .filter(|a| {
                let ours = a.project_id == project.id;
                if !ours {
                    debug!(activity = %a.id, "activity belongs to another project, dropped");
                }
                ours
            })
            .collect();
        activity_rows.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));

        let mut activities: Vec<ActivityNode> = activity_rows
            .into_iter()
            .map(|activity| ActivityNode {
                activity,
                sub_activities: Vec::new(),
                entries: Vec::new(),
            })
            .collect();
        let activity_index: HashMap<Uuid, usize> = activities
            .iter()
            .enumerate()
            .map(|(i, node)| (node.activity.id, i))
            .collect();

        let mut sub_activities = Vec::new();
        let mut sub_index: HashMap<Uuid, usize> = HashMap::new();
        for sub in &snapshot.sub_activities {
            match activity_index.get(&sub.activity_id) {
                Some(&parent) => {
                    let idx = sub_activities.len();
                    sub_activities.push(SubActivityNode {
                        sub_activity: sub,
                        entries: Vec::new(),
                    });
                    activities[parent].sub_activities.push(idx);
                    sub_index.insert(sub.id, idx);
                }
                None => debug!(sub_activity = %sub.id, "sub-activity without known parent, dropped"),
            }
        }

        for entry in &snapshot.entries {
            let attached = match entry.owner {
                ScheduleOwner::Activity(id) => activity_index
                    .get(&id)
                    .map(|&i| activities[i].entries.push(entry))
                    .is_some(),
                ScheduleOwner::SubActivity(id) => sub_index
                    .get(&id)
                    .map(|&i| sub_activities[i].entries.push(entry))
                    .is_some(),
            };
            if !attached {
                debug!(entry = %entry.id, "schedule entry without known owner, dropped");
            }
        }

        Self {
            project,
            activities,
            sub_activities,
        }
    }
}
