use scurve_core::service::dto::{round_to, CurveRowDto};
use scurve_core::{ActivityCurve, CumulativePoint, MonitoringSummary};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct CurveRow {
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "Plan %")]
    plan: String,
    #[tabled(rename = "Actual %")]
    actual: String,
    #[tabled(rename = "Deviation")]
    deviation: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "As of")]
    as_of: String,
    #[tabled(rename = "Plan %")]
    plan: String,
    #[tabled(rename = "Actual %")]
    actual: String,
    #[tabled(rename = "Deviation")]
    deviation: String,
    #[tabled(rename = "Reported")]
    reported: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{}", v)).unwrap_or_else(|| "-".to_string())
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

pub fn show_curve(points: &[CumulativePoint], places: u32) {
    if points.is_empty() {
        println!("No schedule data for this project.");
        return;
    }

    let rows: Vec<CurveRow> = points
        .iter()
        .map(|p| {
            let dto = CurveRowDto::from_point(p, places);
            CurveRow {
                week: dto.label,
                plan: cell(dto.plan),
                actual: cell(dto.actual),
                deviation: cell(dto.deviation),
            }
        })
        .collect();

    println!("{}", styled(Table::new(rows)));
}

pub fn show_activity_curves(curves: &[ActivityCurve], places: u32) {
    for curve in curves {
        println!(
            "\n\x1b[1;36m{}\x1b[0m (share {}%)",
            curve.name,
            round_to(curve.share, places)
        );
        show_curve(&curve.points, places);
    }
}

pub fn show_summaries(summaries: &[MonitoringSummary], places: u32) {
    if summaries.is_empty() {
        println!("No projects found.");
        return;
    }

    let round = |v: Option<f64>| cell(v.map(|v| round_to(v, places)));
    let rows: Vec<SummaryRow> = summaries
        .iter()
        .map(|s| SummaryRow {
            project: s.project_name.clone(),
            as_of: s.as_of.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string()),
            plan: round(s.plan),
            actual: round(s.actual),
            deviation: round(s.deviation),
            reported: format!("{}/{}", s.reported_weeks, s.total_weeks),
            status: format!("{:?}", s.status),
        })
        .collect();

    println!("{}", styled(Table::new(rows)));
}
