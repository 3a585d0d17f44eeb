// src/core/database.rs
//! SQLite persistence of analyzed jobs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::FsOps;
use crate::types::JobRecord;

// ===== Core Database Connection Management =====

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create new database connection with automatic setup
    pub async fn new(database_path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!("Database connection established: {}", database_path.display());

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database, used by tests and dry runs
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get pool reference for custom operations
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS linkedin_jobs (
                id TEXT PRIMARY KEY,
                description_hash TEXT NOT NULL UNIQUE,
                search_position TEXT,
                search_country TEXT,
                url TEXT,
                position_name TEXT,
                company TEXT,
                location TEXT,
                contract_type TEXT,
                applicants INTEGER,
                contract_time TEXT,
                experience TEXT,
                description TEXT NOT NULL,
                posted_date TEXT,
                apply BOOLEAN,
                email TEXT NOT NULL DEFAULT '[]',
                reason_not_apply TEXT NOT NULL DEFAULT '[]',
                list_tech_no_knowledge TEXT NOT NULL DEFAULT '[]',
                list_tags TEXT NOT NULL DEFAULT '[]',
                easy_apply_questions TEXT NOT NULL DEFAULT '[]',
                applied BOOLEAN,
                could_not_apply_due_to_questions BOOLEAN,
                scraped_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_linkedin_jobs_apply ON linkedin_jobs(apply);")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_linkedin_jobs_company ON linkedin_jobs(company);",
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

// ===== Job Models =====

/// Row layout of `linkedin_jobs`; list columns hold JSON arrays.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredJob {
    pub id: String,
    pub description_hash: String,
    pub search_position: Option<String>,
    pub search_country: Option<String>,
    pub url: Option<String>,
    pub position_name: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub contract_type: Option<String>,
    pub applicants: Option<i64>,
    pub contract_time: Option<String>,
    pub experience: Option<String>,
    pub description: String,
    pub posted_date: Option<String>,
    pub apply: Option<bool>,
    pub email: String,
    pub reason_not_apply: String,
    pub list_tech_no_knowledge: String,
    pub list_tags: String,
    pub easy_apply_questions: String,
    pub applied: Option<bool>,
    pub could_not_apply_due_to_questions: Option<bool>,
    pub scraped_at: DateTime<Utc>,
}

impl StoredJob {
    pub fn into_record(self) -> Result<JobRecord> {
        let id = Uuid::parse_str(&self.id)
            .with_context(|| format!("Invalid job id in database: {}", self.id))?;

        Ok(JobRecord {
            id,
            search_position: self.search_position,
            search_country: self.search_country,
            url: self.url,
            position_name: self.position_name,
            company: self.company,
            location: self.location,
            contract_type: self.contract_type,
            applicants: self.applicants,
            contract_time: self.contract_time,
            experience: self.experience,
            description: self.description,
            posted_date: self.posted_date,
            apply: self.apply,
            email: decode_list(&self.email)?,
            reason_not_apply: decode_list(&self.reason_not_apply)?,
            list_tech_no_knowledge: decode_list(&self.list_tech_no_knowledge)?,
            list_tags: decode_list(&self.list_tags)?,
            easy_apply_questions: decode_list(&self.easy_apply_questions)?,
            applied: self.applied,
            could_not_apply_due_to_questions: self.could_not_apply_due_to_questions,
            description_hash: self.description_hash,
            scraped_at: self.scraped_at,
        })
    }
}

fn encode_list(values: &[String]) -> Result<String> {
    serde_json::to_string(values).context("Failed to encode list column")
}

fn decode_list(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| format!("Invalid list column: {}", raw))
}

// ===== Job Repository =====

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a job; returns false when the same description was already stored
    pub async fn insert(&self, job: &JobRecord) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO linkedin_jobs (
                id, description_hash, search_position, search_country, url,
                position_name, company, location, contract_type, applicants,
                contract_time, experience, description, posted_date, apply,
                email, reason_not_apply, list_tech_no_knowledge, list_tags,
                easy_apply_questions, applied, could_not_apply_due_to_questions, scraped_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(job.id.to_string())
        .bind(&job.description_hash)
        .bind(&job.search_position)
        .bind(&job.search_country)
        .bind(&job.url)
        .bind(&job.position_name)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.contract_type)
        .bind(job.applicants)
        .bind(&job.contract_time)
        .bind(&job.experience)
        .bind(&job.description)
        .bind(&job.posted_date)
        .bind(job.apply)
        .bind(encode_list(&job.email)?)
        .bind(encode_list(&job.reason_not_apply)?)
        .bind(encode_list(&job.list_tech_no_knowledge)?)
        .bind(encode_list(&job.list_tags)?)
        .bind(encode_list(&job.easy_apply_questions)?)
        .bind(job.applied)
        .bind(job.could_not_apply_due_to_questions)
        .bind(job.scraped_at)
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to insert job {}", job.display_name()))?;

        let inserted = result.rows_affected() > 0;
        if !inserted {
            debug!("Job already stored: {}", job.description_hash);
        }
        Ok(inserted)
    }

    pub async fn find_by_hash(&self, description_hash: &str) -> Result<Option<JobRecord>> {
        let row = sqlx::query_as::<_, StoredJob>(
            "SELECT * FROM linkedin_jobs WHERE description_hash = ?",
        )
        .bind(description_hash)
        .fetch_optional(self.pool)
        .await?;

        row.map(StoredJob::into_record).transpose()
    }

    /// All stored jobs, oldest first
    pub async fn list_all(&self) -> Result<Vec<JobRecord>> {
        let rows = sqlx::query_as::<_, StoredJob>(
            "SELECT * FROM linkedin_jobs ORDER BY scraped_at ASC, id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(StoredJob::into_record).collect()
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM linkedin_jobs")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job(description: &str) -> JobRecord {
        let mut job = JobRecord::new(description);
        job.position_name = Some("Backend Engineer".to_string());
        job.company = Some("Acme".to_string());
        job.applicants = Some(42);
        job.apply = Some(false);
        job.reason_not_apply = vec!["Programming Language".to_string()];
        job.list_tags = vec!["java".to_string(), "spring".to_string()];
        job
    }

    #[tokio::test]
    async fn test_insert_and_find_by_hash() {
        let db = Database::in_memory().await.unwrap();
        db.health_check().await.unwrap();
        let repo = JobRepository::new(db.pool());

        let job = sample_job("Java developer");
        assert!(repo.insert(&job).await.unwrap());

        let stored = repo.find_by_hash(&job.description_hash).await.unwrap().unwrap();
        assert_eq!(stored.id, job.id);
        assert_eq!(stored.applicants, Some(42));
        assert_eq!(stored.list_tags, vec!["java", "spring"]);
        assert_eq!(stored.reason_not_apply, vec!["Programming Language"]);
        assert!(stored.email.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_description_is_ignored() {
        let db = Database::in_memory().await.unwrap();
        let repo = JobRepository::new(db.pool());

        assert!(repo.insert(&sample_job("Same text")).await.unwrap());
        assert!(!repo.insert(&sample_job("Same text")).await.unwrap());
        assert!(repo.insert(&sample_job("Other text")).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_hash() {
        let db = Database::in_memory().await.unwrap();
        let repo = JobRepository::new(db.pool());
        assert!(repo.find_by_hash("missing").await.unwrap().is_none());
    }
}
