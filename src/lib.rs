//! Eligibility decisions for LinkedIn job postings
//!
//! [`eligibility`] holds the decision engine; the other modules scrape job
//! pages, plan Easy Apply answers and persist the analyzed jobs.

pub mod cli;
pub mod config;
pub mod core;
pub mod eligibility;
pub mod environment;
pub mod linkedin_analysis;
pub mod types;
pub mod utils;

pub use config::{RuleConfiguration, RulesFile, SearchOptions, TranslatorSettings};
pub use eligibility::{EligibilityEngine, EngineError, Reason, Verdict};
pub use types::JobRecord;
