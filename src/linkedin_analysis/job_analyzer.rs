// src/linkedin_analysis/job_analyzer.rs
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use super::form_scraper::{plan_answers, scrape_easy_apply_form, AnswerBook, FormPlan};
use crate::config::SearchOptions;
use crate::eligibility::EligibilityEngine;
use crate::types::JobRecord;

/// Runs the eligibility engine over scraped jobs.
#[derive(Clone)]
pub struct JobAnalyzer {
    engine: EligibilityEngine,
    options: SearchOptions,
}

impl JobAnalyzer {
    pub fn new(engine: EligibilityEngine, options: SearchOptions) -> Self {
        Self { engine, options }
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Decide one job and write the verdict into it
    pub async fn analyze_job(&self, mut job: JobRecord) -> Result<JobRecord> {
        info!("Check if apply: {}", job.display_name());

        let verdict = self
            .engine
            .evaluate(&job.description)
            .await
            .with_context(|| format!("Failed to analyze {}", job.display_name()))?;

        if verdict.apply {
            info!("Apply: {}", job.display_name());
        } else {
            info!(
                "Do not apply to {}: {}",
                job.display_name(),
                verdict.reason_labels().join(", ")
            );
        }

        job.apply_verdict(&verdict);
        Ok(job)
    }

    /// Analyze jobs concurrently, at most `max_concurrent_jobs` at a time.
    /// Failed jobs are logged and left out; the rest keep their input order.
    pub async fn analyze_batch(&self, jobs: Vec<JobRecord>) -> Vec<JobRecord> {
        let total = jobs.len();
        let permits = Arc::new(Semaphore::new(self.options.max_concurrent_jobs.max(1)));
        let mut tasks = JoinSet::new();

        for (index, job) in jobs.into_iter().enumerate() {
            let analyzer = self.clone();
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                (index, analyzer.analyze_job(job).await)
            });
        }

        let mut analyzed = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(job))) => analyzed.push((index, job)),
                Ok((index, Err(e))) => error!("Skipping job #{}: {:#}", index, e),
                Err(e) => error!("Job analysis task failed: {}", e),
            }
        }

        analyzed.sort_by_key(|(index, _)| *index);
        if analyzed.len() < total {
            warn!("Analyzed {} of {} jobs", analyzed.len(), total);
        } else {
            info!("Analyzed {} jobs", total);
        }
        analyzed.into_iter().map(|(_, job)| job).collect()
    }

    /// Easy Apply only for eligible jobs that do not ask for an email application
    pub fn should_easy_apply(&self, job: &JobRecord) -> bool {
        job.apply == Some(true) && job.email.is_empty() && self.options.use_easy_apply
    }

    /// Plan the answers for one Easy Apply step and record the outcome on the job.
    /// Unanswered questions are appended to `unanswered_path`.
    pub async fn plan_easy_apply(
        &self,
        job: &mut JobRecord,
        form_html: &str,
        answers: &AnswerBook,
        unanswered_path: &Path,
    ) -> Result<FormPlan> {
        let plan = plan_answers(scrape_easy_apply_form(form_html), answers);
        plan.record_on(job);
        plan.save_missing(unanswered_path).await?;

        if plan.is_complete() {
            info!(
                "Easy Apply ready for {}: {} answers",
                job.display_name(),
                plan.actions.len()
            );
        } else {
            warn!(
                "Cannot Easy Apply to {}: {} missing, {} rejected answers",
                job.display_name(),
                plan.missing.len(),
                plan.rejected.len()
            );
        }
        Ok(plan)
    }
}
