mod chart;
mod curve;
mod logging;

use anyhow::{anyhow, Result};
use clap::{Args, Parser};
use scurve_core::repository::default_data_dir;
use scurve_core::{
    Config, FileProjectRepository, MonitoringUseCase, ProgressService, Project, ScheduleEntry,
    ScheduleOwner,
};
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "scurve")]
#[command(about = "Weighted plan vs. actual progress curves for irrigation works", long_about = None)]
struct Cli {
    /// Directory holding projects.json and config.json (default: ~/.scurve)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log engine decisions (dropped rows, ignored entries)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List all projects
    Projects,
    /// Print the cumulative plan/actual series of a project
    Curve {
        /// Project id, id prefix or exact name
        project: String,
        /// Emit the raw series as JSON
        #[arg(long)]
        json: bool,
        /// Also print one curve per activity
        #[arg(long)]
        activities: bool,
    },
    /// Show where projects stand at their latest reported week
    Summary {
        /// Project id, id prefix or exact name (default: all projects)
        project: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Record plan/actual percentages for one week
    Record {
        #[command(flatten)]
        owner: OwnerArgs,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        week: u32,
        #[arg(long)]
        plan: Option<f64>,
        #[arg(long)]
        actual: Option<f64>,
    },
    /// Draw the S-curve in the terminal
    Chart {
        /// Project id, id prefix or exact name
        project: String,
    },
    /// Print the effective configuration
    Config {
        /// Write the effective configuration to config.json
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct OwnerArgs {
    /// Activity that owns the entry (when it has no sub-activities)
    #[arg(long)]
    activity: Option<Uuid>,
    /// Sub-activity that owns the entry
    #[arg(long)]
    sub_activity: Option<Uuid>,
}

impl OwnerArgs {
    fn owner(&self) -> Result<ScheduleOwner> {
        match (self.activity, self.sub_activity) {
            (Some(id), None) => Ok(ScheduleOwner::Activity(id)),
            (None, Some(id)) => Ok(ScheduleOwner::SubActivity(id)),
            _ => Err(anyhow!("Exactly one of --activity or --sub-activity is required")),
        }
    }
}

/// Finds a project by full id, unique id prefix or exact name.
fn resolve_project(projects: &[Project], key: &str) -> Result<Project> {
    if let Ok(id) = Uuid::parse_str(key) {
        if let Some(p) = projects.iter().find(|p| p.id == id) {
            return Ok(p.clone());
        }
    }
    if let Some(p) = projects.iter().find(|p| p.name == key) {
        return Ok(p.clone());
    }

    let matches: Vec<&Project> = projects
        .iter()
        .filter(|p| p.id.to_string().starts_with(key))
        .collect();
    match matches.len() {
        1 => Ok(matches[0].clone()),
        0 => Err(anyhow!("Unknown project: '{}'", key)),
        _ => Err(anyhow!("Ambiguous project: '{}' matches {} projects", key, matches.len())),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let config = Config::load(&data_dir)?;
    debug!(dir = %data_dir.display(), ?config, "loaded configuration");

    let repo = FileProjectRepository::new(Some(data_dir.clone()))?;
    let service = ProgressService::new(repo.clone(), config.calendar.clone());
    let places = config.decimal_places;

    match cli.command {
        Some(Commands::Projects) => {
            let projects = service.list_projects()?;
            if projects.is_empty() {
                println!("No projects found.");
            } else {
                println!("{:<10} {:<12} {:<12} {}", "ID", "Start", "End", "Name");
                println!("{:-<10} {:-<12} {:-<12} {:-<20}", "", "", "", "");
                for p in projects {
                    println!(
                        "{:<10} {:<12} {:<12} {}",
                        short_id(&p.id),
                        p.contract_start.as_deref().unwrap_or("-"),
                        p.contract_end.as_deref().unwrap_or("-"),
                        p.name
                    );
                }
            }
        }
        Some(Commands::Curve { project, json, activities }) => {
            let project = resolve_project(&service.list_projects()?, &project)?;
            let report = service.report(&project.id)?;
            if json {
                if activities {
                    println!("{}", serde_json_pretty(&report.activities)?);
                } else {
                    println!("{}", serde_json_pretty(&report.series)?);
                }
            } else {
                println!("\x1b[1;36m{}\x1b[0m", project.name);
                curve::show_curve(&report.series, places);
                if activities {
                    curve::show_activity_curves(&report.activities, places);
                }
            }
        }
        Some(Commands::Summary { project, json }) => {
            let usecase = MonitoringUseCase::new(&service, config.deviation_tolerance);
            let summaries = match project {
                Some(key) => {
                    let project = resolve_project(&service.list_projects()?, &key)?;
                    vec![usecase.summary(&project.id)?]
                }
                None => usecase.summaries()?,
            };
            if json {
                println!("{}", serde_json_pretty(&summaries)?);
            } else {
                curve::show_summaries(&summaries, places);
            }
        }
        Some(Commands::Record { owner, year, month, week, plan, actual }) => {
            let owner = owner.owner()?;
            let project_id = repo
                .project_of(&owner)?
                .ok_or_else(|| anyhow!("No project owns {:?}", owner))?;
            let entry = ScheduleEntry::new(owner, year, month, week, plan, actual);
            let slot = entry.slot();
            service.record_entry(&project_id, entry)?;
            println!("Recorded {} for project {}", slot, project_id);
        }
        Some(Commands::Chart { project }) => {
            let project = resolve_project(&service.list_projects()?, &project)?;
            let report = service.report(&project.id)?;
            chart::run(&report, places)?;
        }
        Some(Commands::Config { init }) => {
            if init {
                config.save(&data_dir)?;
            }
            println!("{}", serde_json_pretty(&config)?);
        }
        None => {
            let usecase = MonitoringUseCase::new(&service, config.deviation_tolerance);
            curve::show_summaries(&usecase.summaries()?, places);
        }
    }
    Ok(())
}

fn short_id(id: &Uuid) -> String {
    let id_str = id.to_string();
    let short_id = if id_str.len() > 8 { &id_str[..8] } else { &id_str };
    short_id.to_string()
}

fn serde_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
