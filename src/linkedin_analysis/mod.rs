// src/linkedin_analysis/mod.rs
//! LinkedIn job pages: scraping, eligibility analysis, Easy Apply planning, storage

pub mod form_scraper;
pub mod job_analyzer;
pub mod job_scraper;
pub mod job_store;

pub use form_scraper::{AnswerBook, ApplyStep, FormPlan, FormQuestion, QuestionKind};
pub use job_analyzer::JobAnalyzer;
pub use job_scraper::{parse_job_page, JobScraper};
pub use job_store::{export_csv, JobStore, SaveSummary};
