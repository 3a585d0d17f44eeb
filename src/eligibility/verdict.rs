// src/eligibility/verdict.rs
//! Checker outcomes and their fusion into a [`Verdict`]

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::technology_check::TechnologyOutcome;

/// Why a job was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "Language Requirement")]
    LanguageRequirement,
    #[serde(rename = "Seniority")]
    Seniority,
    #[serde(rename = "Experience")]
    Experience,
    #[serde(rename = "Technology Group")]
    TechnologyGroup,
    #[serde(rename = "Programming Language")]
    ProgrammingLanguage,
    #[serde(rename = "Backend Web Framework")]
    BackendWebFramework,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LanguageRequirement => "Language Requirement",
            Self::Seniority => "Seniority",
            Self::Experience => "Experience",
            Self::TechnologyGroup => "Technology Group",
            Self::ProgrammingLanguage => "Programming Language",
            Self::BackendWebFramework => "Backend Web Framework",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single-reason checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub apply: bool,
    pub reason: Option<Reason>,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self {
            apply: true,
            reason: None,
        }
    }

    pub fn reject(reason: Reason) -> Self {
        Self {
            apply: false,
            reason: Some(reason),
        }
    }
}

/// The apply/no-apply decision for one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub apply: bool,
    pub email: Vec<String>,
    pub reasons: BTreeSet<Reason>,
    pub unknown_technologies: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub clean_description: String,
}

impl Verdict {
    /// Reason labels as plain strings, in a stable order
    pub fn reason_labels(&self) -> Vec<String> {
        self.reasons.iter().map(|r| r.to_string()).collect()
    }
}

/// Combine the checker outcomes; the job is applied to only when every check passes.
pub fn aggregate(
    language: CheckOutcome,
    experience: CheckOutcome,
    technology: TechnologyOutcome,
    email: Vec<String>,
    clean_description: String,
) -> Verdict {
    let mut reasons = technology.reasons;
    reasons.extend(language.reason);
    reasons.extend(experience.reason);

    Verdict {
        apply: language.apply && experience.apply && technology.apply,
        email,
        reasons,
        unknown_technologies: technology.unknown_technologies,
        tags: technology.tags,
        clean_description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn technology(apply: bool, reasons: &[Reason]) -> TechnologyOutcome {
        TechnologyOutcome {
            apply,
            reasons: reasons.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_is_conjunction_of_checks() {
        let outcomes = [CheckOutcome::pass(), CheckOutcome::reject(Reason::Experience)];
        for language in outcomes {
            for experience in outcomes {
                for tech_ok in [true, false] {
                    let tech = if tech_ok {
                        technology(true, &[])
                    } else {
                        technology(false, &[Reason::TechnologyGroup])
                    };
                    let verdict = aggregate(language, experience, tech, vec![], String::new());
                    assert_eq!(verdict.apply, language.apply && experience.apply && tech_ok);
                }
            }
        }
    }

    #[test]
    fn test_reasons_are_unioned() {
        let verdict = aggregate(
            CheckOutcome::reject(Reason::LanguageRequirement),
            CheckOutcome::reject(Reason::Seniority),
            technology(false, &[Reason::ProgrammingLanguage, Reason::TechnologyGroup]),
            vec!["jobs@acme.com".to_string()],
            "clean".to_string(),
        );
        assert_eq!(
            verdict.reason_labels(),
            vec![
                "Language Requirement",
                "Seniority",
                "Technology Group",
                "Programming Language"
            ]
        );
        assert_eq!(verdict.email, vec!["jobs@acme.com"]);
        assert_eq!(verdict.clean_description, "clean");
    }

    #[test]
    fn test_reasons_serialize_as_labels() {
        let json = serde_json::to_string(&Reason::BackendWebFramework).unwrap();
        assert_eq!(json, "\"Backend Web Framework\"");
        let back: Reason = serde_json::from_str("\"Technology Group\"").unwrap();
        assert_eq!(back, Reason::TechnologyGroup);
    }
}
