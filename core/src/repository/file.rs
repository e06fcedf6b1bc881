use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json;
use uuid::Uuid;

use crate::model::project::{Activity, Project, ProjectSnapshot, SubActivity};
use crate::model::schedule::{ScheduleEntry, ScheduleOwner};
use crate::repository::traits::ProjectRepository;

const DEFAULT_FILE_NAME: &str = "projects.json";

/// On-disk layout: flat tables, linked by id.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Dataset {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub sub_activities: Vec<SubActivity>,
    #[serde(default)]
    pub schedule_entries: Vec<ScheduleEntry>,
}

impl Dataset {
    /// Resolves which project an entry belongs to through its owner.
    fn project_of(&self, owner: &ScheduleOwner) -> Option<Uuid> {
        let activity_id = match owner {
            ScheduleOwner::Activity(id) => *id,
            ScheduleOwner::SubActivity(id) => self.sub_activities.iter().find(|s| s.id == *id)?.activity_id,
        };
        self.activities
            .iter()
            .find(|a| a.id == activity_id)
            .map(|a| a.project_id)
    }
}

#[derive(Clone)]
pub struct FileProjectRepository {
    file_path: PathBuf,
}

impl FileProjectRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)?;
        path.push(DEFAULT_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Dataset::default())?;
            writer.flush()?;
        }

        Ok(FileProjectRepository { file_path: path })
    }

    pub fn read_dataset(&self) -> Result<Dataset> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let dataset = serde_json::from_reader(reader)
            .with_context(|| format!("Invalid dataset file {}", self.file_path.display()))?;
        Ok(dataset)
    }

    pub fn write_dataset(&self, dataset: &Dataset) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, dataset)?;
        writer.flush()?;
        Ok(())
    }
}

/// `~/.scurve`, where data and config live unless told otherwise.
pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".scurve"))
}

impl ProjectRepository for FileProjectRepository {
    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.read_dataset()?.projects)
    }

    fn load_snapshot(&self, project_id: &Uuid) -> Result<Option<ProjectSnapshot>> {
        let dataset = self.read_dataset()?;
        let Some(project) = dataset.projects.iter().find(|p| p.id == *project_id).cloned() else {
            return Ok(None);
        };

        let activities: Vec<Activity> = dataset
            .activities
            .iter()
            .filter(|a| a.project_id == *project_id)
            .cloned()
            .collect();
        let sub_activities: Vec<SubActivity> = dataset
            .sub_activities
            .iter()
            .filter(|s| activities.iter().any(|a| a.id == s.activity_id))
            .cloned()
            .collect();
        let entries: Vec<ScheduleEntry> = dataset
            .schedule_entries
            .iter()
            .filter(|e| match e.owner {
                ScheduleOwner::Activity(id) => activities.iter().any(|a| a.id == id),
                ScheduleOwner::SubActivity(id) => sub_activities.iter().any(|s| s.id == id),
            })
            .cloned()
            .collect();

        Ok(Some(ProjectSnapshot {
            project,
            activities,
            sub_activities,
            entries,
        }))
    }

    fn upsert_entry(&self, entry: ScheduleEntry) -> Result<()> {
        let mut dataset = self.read_dataset()?;
        if dataset.project_of(&entry.owner).is_none() {
            return Err(anyhow!("Schedule owner {:?} not found", entry.owner));
        }

        if let Some(pos) = dataset
            .schedule_entries
            .iter()
            .position(|e| e.owner == entry.owner && e.slot() == entry.slot())
        {
            dataset.schedule_entries[pos] = entry;
        } else {
            dataset.schedule_entries.push(entry);
        }
        self.write_dataset(&dataset)
    }
}

impl FileProjectRepository {
    /// Project owning the given schedule owner, if any.
    pub fn project_of(&self, owner: &ScheduleOwner) -> Result<Option<Uuid>> {
        Ok(self.read_dataset()?.project_of(owner))
    }
}
