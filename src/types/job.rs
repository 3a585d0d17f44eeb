// src/types/job.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::eligibility::Verdict;
use crate::utils::content_hash;

/// One scraped job posting with its eligibility verdict and application status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
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
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default)]
    pub reason_not_apply: Vec<String>,
    #[serde(default)]
    pub list_tech_no_knowledge: Vec<String>,
    #[serde(default)]
    pub list_tags: Vec<String>,
    #[serde(default)]
    pub easy_apply_questions: Vec<String>,
    pub applied: Option<bool>,
    pub could_not_apply_due_to_questions: Option<bool>,
    pub description_hash: String,
    pub scraped_at: DateTime<Utc>,
}

impl JobRecord {
    /// New record for a scraped description; the hash is taken before any cleanup
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            id: Uuid::new_v4(),
            search_position: None,
            search_country: None,
            url: None,
            position_name: None,
            company: None,
            location: None,
            contract_type: None,
            applicants: None,
            contract_time: None,
            experience: None,
            description_hash: content_hash(&description),
            description,
            posted_date: None,
            apply: None,
            email: Vec::new(),
            reason_not_apply: Vec::new(),
            list_tech_no_knowledge: Vec::new(),
            list_tags: Vec::new(),
            easy_apply_questions: Vec::new(),
            applied: None,
            could_not_apply_due_to_questions: None,
            scraped_at: Utc::now(),
        }
    }

    pub fn with_search(mut self, position: Option<String>, country: Option<String>) -> Self {
        self.search_position = position;
        self.search_country = country;
        self
    }

    /// Copy a verdict into the record. The description is replaced by its
    /// cleaned form; `description_hash` keeps identifying the scraped text.
    pub fn apply_verdict(&mut self, verdict: &Verdict) {
        self.apply = Some(verdict.apply);
        self.email = verdict.email.clone();
        self.reason_not_apply = verdict.reason_labels();
        self.list_tech_no_knowledge = verdict.unknown_technologies.iter().cloned().collect();
        self.list_tags = verdict.tags.iter().cloned().collect();
        self.description = verdict.clean_description.clone();
    }

    /// Label used in log lines
    pub fn display_name(&self) -> String {
        format!(
            "{} at {}",
            self.position_name.as_deref().unwrap_or("Unknown position"),
            self.company.as_deref().unwrap_or("unknown company")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::Reason;
    use std::collections::BTreeSet;

    #[test]
    fn test_new_record_hashes_scraped_description() {
        let record = JobRecord::new("Rust developer\nRemote");
        assert_eq!(record.description_hash, content_hash("Rust developer\nRemote"));
        assert!(record.apply.is_none());
        assert_ne!(record.id, JobRecord::new("Rust developer\nRemote").id);
    }

    #[test]
    fn test_apply_verdict_copies_decision() {
        let mut record = JobRecord::new("Java developer\nFluent German");
        let hash = record.description_hash.clone();
        let verdict = Verdict {
            apply: false,
            email: vec!["jobs@acme.com".to_string()],
            reasons: BTreeSet::from([Reason::ProgrammingLanguage, Reason::LanguageRequirement]),
            unknown_technologies: BTreeSet::from(["java".to_string()]),
            tags: BTreeSet::from(["german".to_string(), "java".to_string()]),
            clean_description: "java developer. fluent german".to_string(),
        };

        record.apply_verdict(&verdict);

        assert_eq!(record.apply, Some(false));
        assert_eq!(
            record.reason_not_apply,
            vec!["Language Requirement", "Programming Language"]
        );
        assert_eq!(record.list_tech_no_knowledge, vec!["java"]);
        assert_eq!(record.list_tags, vec!["german", "java"]);
        assert_eq!(record.description, "java developer. fluent german");
        assert_eq!(record.description_hash, hash);
    }

    #[test]
    fn test_display_name_defaults() {
        let mut record = JobRecord::new("text");
        assert_eq!(record.display_name(), "Unknown position at unknown company");
        record.position_name = Some("Backend Engineer".to_string());
        record.company = Some("Acme".to_string());
        assert_eq!(record.display_name(), "Backend Engineer at Acme");
    }
}
