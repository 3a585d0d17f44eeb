// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::core::{ConfigManager, Database, FsOps, TranslationClient};
use crate::eligibility::{EligibilityEngine, NoopTranslator, Translator};
use crate::linkedin_analysis::form_scraper::detect_apply_step;
use crate::linkedin_analysis::{
    export_csv, parse_job_page, AnswerBook, JobAnalyzer, JobScraper, JobStore,
};
use crate::types::JobRecord;

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Decide which LinkedIn jobs are worth applying to")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Environment configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate one job description and print the verdict
    Analyze {
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Analyze saved job-view pages and store the results
    Scrape {
        #[arg(required = true)]
        pages: Vec<PathBuf>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        country: Option<String>,
    },
    /// Download a job posting and analyze it
    Fetch { url: String },
    /// Plan the answers of a saved Easy Apply form page
    Form {
        page: PathBuf,
        /// Saved job-view page the form belongs to
        #[arg(long)]
        job: Option<PathBuf>,
    },
    /// Export stored jobs to a CSV file
    Export { csv: PathBuf },
    /// Initialize the jobs database
    InitDb,
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = ConfigManager::load(cli.config.as_deref())?;
    config.ensure_directories().await?;

    match cli.command {
        Command::Analyze { file, text } => {
            let description = match (file, text) {
                (Some(path), _) => FsOps::read_file_safe(&path).await?,
                (None, Some(text)) => text,
                (None, None) => anyhow::bail!("Either --file or --text is required"),
            };

            let engine = build_engine(&config).await?;
            let verdict = engine.evaluate(&description).await?;
            print_json(&verdict)?;
        }

        Command::Scrape {
            pages,
            position,
            country,
        } => {
            let position = position.or_else(|| config.options.positions.first().cloned());
            let country = country.or_else(|| config.options.countries.first().cloned());

            let mut jobs = Vec::with_capacity(pages.len());
            for page in &pages {
                let html = FsOps::read_file_safe(page).await?;
                let job = parse_job_page(&html)
                    .with_context(|| format!("Failed to parse {}", page.display()))?;
                jobs.push(job.with_search(position.clone(), country.clone()));
            }

            let analyzer = JobAnalyzer::new(build_engine(&config).await?, config.options.clone());
            let jobs = analyzer.analyze_batch(jobs).await;
            for job in jobs.iter().filter(|j| analyzer.should_easy_apply(j)) {
                info!("Easy Apply candidate: {}", job.display_name());
            }

            let store = JobStore::open(&config.environment, &config.options).await?;
            let summary = store.save(&jobs).await?;
            println!(
                "{} jobs analyzed, {} to apply, {} new in database",
                jobs.len(),
                jobs.iter().filter(|j| j.apply == Some(true)).count(),
                summary.inserted
            );
        }

        Command::Fetch { url } => {
            let job = JobScraper::new()?.fetch_job_posting(&url).await?;
            let analyzer = JobAnalyzer::new(build_engine(&config).await?, config.options.clone());
            let job = analyzer.analyze_job(job).await?;

            JobStore::open(&config.environment, &config.options)
                .await?
                .save(std::slice::from_ref(&job))
                .await?;
            print_json(&job)?;
        }

        Command::Form { page, job } => {
            let form_html = FsOps::read_file_safe(&page).await?;
            let answers = AnswerBook::load(&config.environment.answers_path).await?;
            let analyzer = JobAnalyzer::new(build_engine(&config).await?, config.options.clone());

            let mut record = match job {
                Some(path) => {
                    let html = FsOps::read_file_safe(&path).await?;
                    analyzer.analyze_job(parse_job_page(&html)?).await?
                }
                None => JobRecord::new(String::new()),
            };

            let plan = analyzer
                .plan_easy_apply(
                    &mut record,
                    &form_html,
                    &answers,
                    &config.environment.unanswered_questions_path,
                )
                .await?;
            info!("Next wizard step: {:?}", detect_apply_step(&form_html));
            print_json(&plan)?;
        }

        Command::Export { csv } => {
            let database = if config.environment.database_path.exists() {
                Some(Database::new(&config.environment.database_path).await?)
            } else {
                None
            };
            let store = JobStore::new(Some(config.environment.jobs_json_path.clone()), database);
            let jobs = store.load_all().await?;
            let count = export_csv(&jobs, &csv)?;
            println!("Exported {} jobs to {}", count, csv.display());
        }

        Command::InitDb => {
            let db = Database::new(&config.environment.database_path).await?;
            db.health_check().await?;
            println!(
                "Database ready: {}",
                config.environment.database_path.display()
            );
        }
    }

    Ok(())
}

/// Load the model and taxonomy and wire the configured translator
pub async fn build_engine(config: &ConfigManager) -> Result<EligibilityEngine> {
    let translator: Arc<dyn Translator> = match TranslationClient::from_settings(&config.translator)? {
        Some(client) => {
            info!("Translating descriptions with {}", client.base_url());
            Arc::new(client)
        }
        None => Arc::new(NoopTranslator),
    };

    let engine = EligibilityEngine::load(
        &config.environment.model_path,
        &config.environment.taxonomy_path,
        config.rules.clone(),
        translator,
    )
    .await
    .context("Failed to load the eligibility engine")?;

    Ok(engine.with_translation_timeout(config.translator.timeout))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scrape_command() {
        let cli = Cli::try_parse_from([
            "jobscout",
            "scrape",
            "a.html",
            "b.html",
            "--position",
            "Python Developer",
        ])
        .unwrap();
        match cli.command {
            Command::Scrape {
                pages, position, ..
            } => {
                assert_eq!(pages.len(), 2);
                assert_eq!(position.as_deref(), Some("Python Developer"));
            }
            _ => panic!("expected scrape"),
        }
    }

    #[test]
    fn test_analyze_requires_input() {
        assert!(Cli::try_parse_from(["jobscout", "analyze"]).is_err());
        assert!(Cli::try_parse_from(["jobscout", "analyze", "--text", "python"]).is_ok());
        assert!(
            Cli::try_parse_from(["jobscout", "analyze", "--text", "x", "--file", "y"]).is_err()
        );
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["jobscout", "init-db", "--config", "other.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("other.yaml")));
        assert!(matches!(cli.command, Command::InitDb));
    }
}
