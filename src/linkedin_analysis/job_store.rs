// src/linkedin_analysis/job_store.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::SearchOptions;
use crate::core::{Database, FsOps, JobRepository};
use crate::environment::EnvironmentConfig;
use crate::types::JobRecord;

/// Where analyzed jobs go: a JSON append file, the SQLite table, or both.
pub struct JobStore {
    json_path: Option<PathBuf>,
    database: Option<Database>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub json_records: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

impl JobStore {
    pub fn new(json_path: Option<PathBuf>, database: Option<Database>) -> Self {
        Self {
            json_path,
            database,
        }
    }

    /// Open the sinks enabled in the options
    pub async fn open(environment: &EnvironmentConfig, options: &SearchOptions) -> Result<Self> {
        let json_path = options
            .save_to_json_file
            .then(|| environment.jobs_json_path.clone());
        let database = if options.save_to_database {
            Some(Database::new(&environment.database_path).await?)
        } else {
            None
        };
        Ok(Self::new(json_path, database))
    }

    pub fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    pub async fn save(&self, jobs: &[JobRecord]) -> Result<SaveSummary> {
        let mut summary = SaveSummary::default();
        if jobs.is_empty() {
            return Ok(summary);
        }

        if let Some(path) = &self.json_path {
            summary.json_records = FsOps::append_json_records(path, jobs).await?;
        }

        if let Some(database) = &self.database {
            let repo = JobRepository::new(database.pool());
            for job in jobs {
                if repo.insert(job).await? {
                    summary.inserted += 1;
                } else {
                    summary.duplicates += 1;
                }
            }
        }

        info!(
            "Saved {} jobs ({} new in database, {} already stored)",
            jobs.len(),
            summary.inserted,
            summary.duplicates
        );
        Ok(summary)
    }

    /// Stored jobs, from the database when enabled, else from the JSON file
    pub async fn load_all(&self) -> Result<Vec<JobRecord>> {
        if let Some(database) = &self.database {
            return JobRepository::new(database.pool()).list_all().await;
        }
        match &self.json_path {
            Some(path) => FsOps::read_json_array(path).await,
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: String,
    url: &'a str,
    position_name: &'a str,
    company: &'a str,
    location: &'a str,
    contract_type: &'a str,
    applicants: Option<i64>,
    contract_time: &'a str,
    experience: &'a str,
    posted_date: &'a str,
    apply: Option<bool>,
    email: String,
    reason_not_apply: String,
    list_tech_no_knowledge: String,
    list_tags: String,
    applied: Option<bool>,
    could_not_apply_due_to_questions: Option<bool>,
    scraped_at: String,
}

impl<'a> CsvRow<'a> {
    fn from_job(job: &'a JobRecord) -> Self {
        let text = |value: &'a Option<String>| value.as_deref().unwrap_or_default();
        Self {
            id: job.id.to_string(),
            url: text(&job.url),
            position_name: text(&job.position_name),
            company: text(&job.company),
            location: text(&job.location),
            contract_type: text(&job.contract_type),
            applicants: job.applicants,
            contract_time: text(&job.contract_time),
            experience: text(&job.experience),
            posted_date: text(&job.posted_date),
            apply: job.apply,
            email: job.email.join("; "),
            reason_not_apply: job.reason_not_apply.join("; "),
            list_tech_no_knowledge: job.list_tech_no_knowledge.join("; "),
            list_tags: job.list_tags.join("; "),
            applied: job.applied,
            could_not_apply_due_to_questions: job.could_not_apply_due_to_questions,
            scraped_at: job.scraped_at.to_rfc3339(),
        }
    }
}

/// Write jobs to a CSV file, one row per job; list columns are `; `-joined
pub fn export_csv(jobs: &[JobRecord], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    for job in jobs {
        writer
            .serialize(CsvRow::from_job(job))
            .with_context(|| format!("Failed to write {}", job.display_name()))?;
    }
    writer.flush().context("Failed to flush CSV file")?;

    info!("Exported {} jobs to {}", jobs.len(), path.display());
    Ok(jobs.len())
}
