//! Weighted cumulative progress over the project calendar.

use crate::calendar::Calendar;
use crate::engine::arena::ProjectTree;
use crate::engine::densify::{densify, WeekValue};
use crate::engine::weights::normalize;
use crate::model::progress::{ActivityCurve, CumulativePoint};
use crate::model::schedule::{ScheduleEntry, WeekSlot};

/// A schedule-carrying node: a sub-activity, or an activity with no breakdown.
#[derive(Debug)]
pub struct Leaf<'t, 'a> {
    pub activity_index: usize,
    /// Share of the whole project, in percent.
    pub weight: f64,
    pub entries: &'t [&'a ScheduleEntry],
}

/// Flattens the tree into leaves with their effective project weight.
///
/// Sub-activity weight is its normalized share of the parent times the
/// parent's normalized share of the project. An activity with sub-activities
/// ignores its own direct schedule.
pub fn leaves<'t, 'a>(tree: &'t ProjectTree<'a>) -> Vec<Leaf<'t, 'a>> {
    let activity_weights: Vec<f64> = tree
        .activities
        .iter()
        .map(|node| node.activity.weight.unwrap_or(0.0))
        .collect();
    let activity_shares = normalize(&activity_weights);

    let mut leaves = Vec::new();
    for (i, (node, share)) in tree.activities.iter().zip(activity_shares).enumerate() {
        if node.sub_activities.is_empty() {
            leaves.push(Leaf {
                activity_index: i,
                weight: share,
                entries: &node.entries,
            });
            continue;
        }

        let sub_weights: Vec<f64> = node
            .sub_activities
            .iter()
            .map(|&s| tree.sub_activities[s].sub_activity.weight)
            .collect();
        for (&s, sub_share) in node.sub_activities.iter().zip(normalize(&sub_weights)) {
            leaves.push(Leaf {
                activity_index: i,
                weight: share * sub_share / 100.0,
                entries: &tree.sub_activities[s].entries,
            });
        }
    }
    leaves
}

/// One leaf's weight and its values for every calendar week.
#[derive(Debug, Clone)]
pub struct DenseLeaf {
    pub activity_index: usize,
    pub weight: f64,
    pub weeks: Vec<WeekValue>,
}

/// Densifies every leaf over the calendar.
pub fn densify_leaves(tree: &ProjectTree, calendar: &Calendar) -> Vec<DenseLeaf> {
    leaves(tree)
        .into_iter()
        .map(|leaf| DenseLeaf {
            activity_index: leaf.activity_index,
            weight: leaf.weight,
            weeks: densify(calendar, leaf.entries.iter().copied()),
        })
        .collect()
}

/// True when some leaf has a value in some calendar week. Entries outside the
/// calendar and schedules shadowed by sub-activities don't count.
fn has_reports(dense: &[DenseLeaf]) -> bool {
    dense
        .iter()
        .any(|leaf| leaf.weeks.iter().any(WeekValue::is_reported))
}

/// Project-wide cumulative plan, actual and deviation for every calendar week.
///
/// Empty when no schedule data lands in the calendar.
pub fn cumulative_series(tree: &ProjectTree, calendar: &Calendar) -> Vec<CumulativePoint> {
    let dense = densify_leaves(tree, calendar);
    if !has_reports(&dense) {
        return Vec::new();
    }
    accumulate(calendar, &dense)
}

/// Per-activity contribution curves. They add up to [`cumulative_series`].
pub fn activity_series(tree: &ProjectTree, calendar: &Calendar) -> Vec<ActivityCurve> {
    let dense = densify_leaves(tree, calendar);
    if !has_reports(&dense) {
        return Vec::new();
    }

    let activity_weights: Vec<f64> = tree
        .activities
        .iter()
        .map(|node| node.activity.weight.unwrap_or(0.0))
        .collect();
    let shares = normalize(&activity_weights);

    tree.activities
        .iter()
        .zip(shares)
        .enumerate()
        .map(|(i, (node, share))| ActivityCurve {
            activity_id: node.activity.id,
            name: node.activity.name.clone(),
            share,
            points: accumulate(calendar, dense.iter().filter(|l| l.activity_index == i)),
        })
        .collect()
}

/// Weeks, in order, where at least one leaf has an actual value after densifying.
pub fn reported_actual_weeks(tree: &ProjectTree, calendar: &Calendar) -> Vec<WeekSlot> {
    let dense = densify_leaves(tree, calendar);
    calendar
        .weeks()
        .into_iter()
        .enumerate()
        .filter(|(week, _)| dense.iter().any(|leaf| leaf.weeks[*week].actual.is_some()))
        .map(|(_, slot)| slot)
        .collect()
}

fn accumulate<'l, L>(calendar: &Calendar, leaves: L) -> Vec<CumulativePoint>
where
    L: IntoIterator<Item = &'l DenseLeaf>,
{
    let dense: Vec<&DenseLeaf> = leaves.into_iter().collect();

    let mut cumulative_plan = 0.0;
    let mut cumulative_actual = 0.0;
    let mut plan_seen = false;
    let mut actual_seen = false;

    calendar
        .weeks()
        .into_iter()
        .enumerate()
        .map(|(week, slot)| {
            let mut period_plan = 0.0;
            let mut period_actual = 0.0;
            for leaf in &dense {
                let value = leaf.weeks[week];
                plan_seen |= value.plan.is_some();
                actual_seen |= value.actual.is_some();
                period_plan += leaf.weight * value.plan.unwrap_or(0.0) / 100.0;
                period_actual += leaf.weight * value.actual.unwrap_or(0.0) / 100.0;
            }
            cumulative_plan += period_plan;
            cumulative_actual += period_actual;

            CumulativePoint::new(
                slot,
                plan_seen.then_some(cumulative_plan),
                actual_seen.then_some(cumulative_actual),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarConfig;
    use crate::model::project::{Activity, Project, ProjectSnapshot, SubActivity};
    use crate::model::schedule::ScheduleOwner;

    const EPS: f64 = 1e-9;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map(|a| (a - b).abs() < EPS).unwrap_or(false)
    }

    fn calendar() -> Calendar {
        let config = CalendarConfig { weeks_per_month: 4, default_year: Some(2024) };
        Calendar::generate(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
            chrono::NaiveDate::from_ymd_opt(2024, 2, 28),
            &config,
        )
    }

    /// Two activities, each with one sub-activity weighted 100.
    fn two_activity_snapshot(weight_a: f64, weight_b: f64) -> (ProjectSnapshot, [uuid::Uuid; 2]) {
        let project = Project::new("Irrigation block 7".to_string(), None, None);
        let a = Activity::new(project.id, "A".to_string(), 1, Some(weight_a));
        let b = Activity::new(project.id, "B".to_string(), 2, Some(weight_b));
        let sub_a = SubActivity::new(a.id, "A1".to_string(), 100.0);
        let sub_b = SubActivity::new(b.id, "B1".to_string(), 100.0);
        let ids = [sub_a.id, sub_b.id];

        let mut snapshot = ProjectSnapshot::new(project);
        snapshot.entries = vec![
            ScheduleEntry::new(ScheduleOwner::SubActivity(sub_a.id), 2024, 1, 1, Some(10.0), Some(8.0)),
            ScheduleEntry::new(ScheduleOwner::SubActivity(sub_b.id), 2024, 1, 1, Some(20.0), Some(15.0)),
        ];
        snapshot.activities = vec![a, b];
        snapshot.sub_activities = vec![sub_a, sub_b];
        (snapshot, ids)
    }

    #[test]
    fn test_two_activity_scenario() {
        let (snapshot, _) = two_activity_snapshot(60.0, 40.0);
        let tree = ProjectTree::build(&snapshot);
        let series = cumulative_series(&tree, &calendar());

        assert_eq!(series.len(), 8);
        let first = &series[0];
        assert_eq!((first.year, first.month, first.week), (2024, 1, 1));
        assert!(close(first.cumulative_plan, 14.0));
        assert!(close(first.cumulative_actual, 10.8));
        assert!(close(first.cumulative_deviation, 3.2));

        // Nothing reported afterwards: totals carry forward unchanged.
        for point in &series[1..] {
            assert!(close(point.cumulative_plan, 14.0));
            assert!(close(point.cumulative_actual, 10.8));
        }
    }

    #[test]
    fn test_over_allocated_weights_are_normalized() {
        let (snapshot, _) = two_activity_snapshot(70.0, 50.0);
        let tree = ProjectTree::build(&snapshot);
        let total: f64 = leaves(&tree).iter().map(|l| l.weight).sum();
        assert!((total - 100.0).abs() < EPS);

        let series = cumulative_series(&tree, &calendar());
        let plan = 70.0 / 120.0 * 10.0 + 50.0 / 120.0 * 20.0;
        let actual = 70.0 / 120.0 * 8.0 + 50.0 / 120.0 * 15.0;
        assert!(close(series[0].cumulative_plan, plan));
        assert!(close(series[0].cumulative_actual, actual));
    }

    #[test]
    fn test_leaf_without_entries_contributes_zero() {
        let (mut snapshot, _) = two_activity_snapshot(60.0, 40.0);
        let silent = SubActivity::new(snapshot.activities[0].id, "A2".to_string(), 100.0);
        snapshot.sub_activities.push(silent);

        let tree = ProjectTree::build(&snapshot);
        let series = cumulative_series(&tree, &calendar());

        // A's 60% is now split evenly between A1 and the silent A2.
        assert!(close(series[0].cumulative_plan, 30.0 * 10.0 / 100.0 + 8.0));
        for point in &series {
            assert!(point.cumulative_plan.map(f64::is_finite).unwrap_or(false));
            assert!(point.cumulative_actual.map(f64::is_finite).unwrap_or(false));
        }
    }

    #[test]
    fn test_no_schedule_data_yields_empty_series() {
        let (mut snapshot, _) = two_activity_snapshot(60.0, 40.0);
        snapshot.entries.clear();
        let tree = ProjectTree::build(&snapshot);
        assert!(cumulative_series(&tree, &calendar()).is_empty());
        assert!(activity_series(&tree, &calendar()).is_empty());
    }

    #[test]
    fn test_unreported_sides_stay_null_until_first_report() {
        let (mut snapshot, ids) = two_activity_snapshot(60.0, 40.0);
        snapshot.entries = vec![
            ScheduleEntry::new(ScheduleOwner::SubActivity(ids[0]), 2024, 1, 2, Some(10.0), None),
            ScheduleEntry::new(ScheduleOwner::SubActivity(ids[0]), 2024, 1, 4, Some(0.0), Some(5.0)),
        ];
        let tree = ProjectTree::build(&snapshot);
        let series = cumulative_series(&tree, &calendar());

        assert_eq!(series[0].cumulative_plan, None);
        assert_eq!(series[0].cumulative_deviation, None);
        assert!(close(series[1].cumulative_plan, 6.0));
        assert_eq!(series[1].cumulative_actual, None);
        assert!(close(series[2].cumulative_plan, 6.0));
        assert!(close(series[3].cumulative_actual, 3.0));
        assert!(close(series[3].cumulative_deviation, 3.0));
        assert_eq!(
            reported_actual_weeks(&tree, &calendar()),
            vec![WeekSlot::new(2024, 1, 4)]
        );
    }

    #[test]
    fn test_plan_is_monotonic_and_output_deterministic() {
        let (mut snapshot, ids) = two_activity_snapshot(35.0, 65.0);
        for (n, week) in (1..=4).enumerate() {
            snapshot.entries.push(ScheduleEntry::new(
                ScheduleOwner::SubActivity(ids[n % 2]),
                2024,
                2,
                week,
                Some(week as f64 * 3.3),
                Some(week as f64),
            ));
        }
        let tree = ProjectTree::build(&snapshot);
        let series = cumulative_series(&tree, &calendar());

        let plans: Vec<f64> = series.iter().filter_map(|p| p.cumulative_plan).collect();
        assert!(plans.windows(2).all(|w| w[1] >= w[0]));

        let again = cumulative_series(&ProjectTree::build(&snapshot), &calendar());
        assert_eq!(
            serde_json::to_vec(&series).unwrap(),
            serde_json::to_vec(&again).unwrap()
        );
    }

    #[test]
    fn test_activity_curves_add_up_to_project() {
        let (snapshot, _) = two_activity_snapshot(60.0, 40.0);
        let tree = ProjectTree::build(&snapshot);
        let cal = calendar();
        let project = cumulative_series(&tree, &cal);
        let curves = activity_series(&tree, &cal);

        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].name, "A");
        assert!((curves[0].share - 60.0).abs() < EPS);
        for (week, point) in project.iter().enumerate() {
            let sum: f64 = curves
                .iter()
                .filter_map(|c| c.points[week].cumulative_plan)
                .sum();
            assert!(close(point.cumulative_plan, sum));
        }
    }

    #[test]
    fn test_activity_without_breakdown_uses_direct_schedule() {
        let project = Project::new("Pump house".to_string(), None, None);
        let activity = Activity::new(project.id, "Civil".to_string(), 1, None);
        let mut snapshot = ProjectSnapshot::new(project);
        snapshot.entries.push(ScheduleEntry::new(
            ScheduleOwner::Activity(activity.id),
            2024,
            1,
            1,
            Some(25.0),
            Some(20.0),
        ));
        snapshot.activities.push(activity);

        let tree = ProjectTree::build(&snapshot);
        let series = cumulative_series(&tree, &calendar());
        assert!(close(series[0].cumulative_plan, 25.0));
        assert!(close(series[0].cumulative_deviation, 5.0));
    }

    #[test]
    fn test_entries_outside_calendar_yield_empty_series() {
        let (mut snapshot, ids) = two_activity_snapshot(60.0, 40.0);
        snapshot.entries = vec![ScheduleEntry::new(
            ScheduleOwner::SubActivity(ids[0]),
            2030,
            1,
            1,
            Some(10.0),
            Some(10.0),
        )];
        let tree = ProjectTree::build(&snapshot);
        assert!(cumulative_series(&tree, &calendar()).is_empty());
        assert!(activity_series(&tree, &calendar()).is_empty());
        assert!(reported_actual_weeks(&tree, &calendar()).is_empty());
    }

    #[test]
    fn test_shadowed_direct_schedule_yields_empty_series() {
        let (mut snapshot, _) = two_activity_snapshot(60.0, 40.0);
        // Activity A has a breakdown, so its own schedule is ignored.
        snapshot.entries = vec![ScheduleEntry::new(
            ScheduleOwner::Activity(snapshot.activities[0].id),
            2024,
            1,
            1,
            Some(10.0),
            Some(10.0),
        )];
        let tree = ProjectTree::build(&snapshot);
        assert!(cumulative_series(&tree, &calendar()).is_empty());
        assert!(activity_series(&tree, &calendar()).is_empty());
        assert!(reported_actual_weeks(&tree, &calendar()).is_empty());
    }

    #[test]
    fn test_reported_weeks_follow_last_entry_for_a_week() {
        let (mut snapshot, ids) = two_activity_snapshot(60.0, 40.0);
        let owner = ScheduleOwner::SubActivity(ids[0]);
        snapshot.entries = vec![
            ScheduleEntry::new(owner, 2024, 1, 2, Some(10.0), Some(5.0)),
            ScheduleEntry::new(owner, 2024, 1, 2, Some(10.0), None),
            ScheduleEntry::new(owner, 2024, 1, 3, Some(5.0), Some(f64::NAN)),
            ScheduleEntry::new(owner, 2024, 2, 1, Some(5.0), Some(4.0)),
        ];
        let tree = ProjectTree::build(&snapshot);
        let series = cumulative_series(&tree, &calendar());

        assert_eq!(
            reported_actual_weeks(&tree, &calendar()),
            vec![WeekSlot::new(2024, 2, 1)]
        );
        // The week the curve has no actual for is not a reported week either.
        assert_eq!(series[1].cumulative_actual, None);
        assert_eq!(series[2].cumulative_actual, None);
        assert!(close(series[4].cumulative_actual, 0.6 * 4.0));
    }
}
