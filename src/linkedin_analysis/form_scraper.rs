// src/linkedin_analysis/form_scraper.rs
//! Easy Apply form parsing and answer planning
//!
//! A form page is parsed into questions, the questions are looked up in the
//! user's answer book and the result is a [`FormPlan`] a browser driver can
//! replay. Unknown questions block the application and are reported so the
//! user can answer them before the next run.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::core::FsOps;
use crate::types::JobRecord;
use crate::utils::collapse_whitespace;

const SELECT_PLACEHOLDER: &str = "Select an option";
const OPTION_LABEL_ATTR: &str = "data-test-text-selectable-option__label";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Free text input
    Input,
    /// `<select>` drop-down
    Select,
    /// Radio or checkbox fieldset
    Choice,
    /// Typeahead combobox: type the answer, then pick the first suggestion
    FillSelect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormQuestion {
    pub label: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
}

/// Parse every question of an Easy Apply step, in document order
pub fn scrape_easy_apply_form(html: &str) -> Vec<FormQuestion> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let controls: HashMap<&str, ElementRef> = select_all(root, "input[id], select[id], textarea[id]")
        .into_iter()
        .filter_map(|el| el.value().id().map(|id| (id, el)))
        .collect();

    let mut questions = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |question: FormQuestion| {
        if !question.label.is_empty() && seen.insert(question.label.clone()) {
            questions.push(question);
        }
    };

    for label in select_all(root, "label[for]") {
        let Some(control) = label.value().attr("for").and_then(|id| controls.get(id)) else {
            continue;
        };
        let Some(kind) = control_kind(control) else {
            continue;
        };

        let options = if kind == QuestionKind::Select {
            select_options(control)
        } else {
            Vec::new()
        };
        push(FormQuestion {
            label: visible_text(label),
            kind,
            options,
        });
    }

    for fieldset in select_all(root, "fieldset") {
        let Some(legend) = first_child(fieldset, "legend") else {
            continue;
        };
        let options = select_all(fieldset, "label")
            .into_iter()
            .map(|l| {
                l.value()
                    .attr(OPTION_LABEL_ATTR)
                    .map(str::to_string)
                    .unwrap_or_else(|| visible_text(l))
            })
            .filter(|o| !o.is_empty())
            .collect();

        push(FormQuestion {
            label: visible_text(legend),
            kind: QuestionKind::Choice,
            options,
        });
    }

    debug!("Parsed {} Easy Apply questions", questions.len());
    questions
}

fn control_kind(control: &ElementRef) -> Option<QuestionKind> {
    let element = control.value();
    match element.name() {
        "select" => Some(QuestionKind::Select),
        "textarea" => Some(QuestionKind::Input),
        "input" => {
            if element.attr("role") == Some("combobox") {
                return Some(QuestionKind::FillSelect);
            }
            match element.attr("type").unwrap_or("text") {
                "radio" | "checkbox" | "hidden" | "submit" | "file" => None,
                _ => Some(QuestionKind::Input),
            }
        }
        _ => None,
    }
}

fn select_options(control: &ElementRef) -> Vec<String> {
    select_all(*control, "option")
        .into_iter()
        .map(|o| collapse_whitespace(&o.text().collect::<String>()))
        .filter(|o| !o.is_empty() && o != SELECT_PLACEHOLDER)
        .collect()
}

/// Screen-reader duplicates are skipped: `aria-hidden` spans hold the visible text.
fn visible_text(element: ElementRef) -> String {
    if let Some(hidden) = first_child(element, "span[aria-hidden=true]") {
        let text = collapse_whitespace(&hidden.text().collect::<Vec<_>>().join(" "));
        if !text.is_empty() {
            return text;
        }
    }
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn select_all<'a>(root: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => root.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn first_child<'a>(root: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    select_all(root, selector).into_iter().next()
}

// ===== Answers =====

/// The user's prepared answers, keyed by the exact question text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerBook {
    answers: BTreeMap<String, String>,
}

impl AnswerBook {
    pub fn new(answers: BTreeMap<String, String>) -> Self {
        Self { answers }
    }

    /// Load a JSON object of question to answer
    pub async fn load(path: &Path) -> Result<Self> {
        let answers = FsOps::read_json_map(path).await?;
        info!("Loaded {} Easy Apply answers", answers.len());
        Ok(Self::new(answers))
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.answers.get(question).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FormAction {
    Fill { question: String, answer: String },
    SelectOption { question: String, answer: String },
    ChooseOption { question: String, answer: String },
    FillAndPick { question: String, answer: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPlan {
    pub questions: Vec<FormQuestion>,
    pub actions: Vec<FormAction>,
    /// Questions absent from the answer book
    pub missing: Vec<String>,
    /// Questions whose answer is not one of the offered options
    pub rejected: Vec<String>,
}

impl FormPlan {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.rejected.is_empty()
    }

    pub fn question_labels(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.label.clone()).collect()
    }

    /// Record the questions and the blocked state on the job
    pub fn record_on(&self, job: &mut JobRecord) {
        job.easy_apply_questions = self.question_labels();
        job.could_not_apply_due_to_questions = Some(!self.is_complete());
        if !self.is_complete() {
            job.applied = Some(false);
        }
    }

    /// Append the unanswered questions to the side file the user fills in
    pub async fn save_missing(&self, path: &Path) -> Result<usize> {
        if self.missing.is_empty() {
            return Ok(0);
        }
        let added = FsOps::append_unique_strings(path, &self.missing).await?;
        info!("Questions without answers: {:?}", self.missing);
        Ok(added)
    }
}

/// Match questions against the answer book. An incomplete plan carries no actions.
pub fn plan_answers(questions: Vec<FormQuestion>, answers: &AnswerBook) -> FormPlan {
    let mut plan = FormPlan::default();

    for question in &questions {
        let Some(answer) = answers.get(&question.label) else {
            plan.missing.push(question.label.clone());
            continue;
        };

        let offered = question.options.is_empty()
            || question
                .options
                .iter()
                .any(|o| o.eq_ignore_ascii_case(answer));
        if !offered {
            plan.rejected.push(question.label.clone());
            continue;
        }

        let question_label = question.label.clone();
        let answer = answer.to_string();
        plan.actions.push(match question.kind {
            QuestionKind::Input => FormAction::Fill {
                question: question_label,
                answer,
            },
            QuestionKind::Select => FormAction::SelectOption {
                question: question_label,
                answer,
            },
            QuestionKind::Choice => FormAction::ChooseOption {
                question: question_label,
                answer,
            },
            QuestionKind::FillSelect => FormAction::FillAndPick {
                question: question_label,
                answer,
            },
        });
    }

    if !plan.is_complete() {
        plan.actions.clear();
    }
    plan.questions = questions;
    plan
}

// ===== Wizard navigation =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStep {
    Submit,
    Review,
    Next,
    Unknown,
}

/// Which wizard button the current step offers
pub fn detect_apply_step(html: &str) -> ApplyStep {
    let document = Html::parse_document(html);
    let labels: Vec<String> = select_all(document.root_element(), "button[aria-label]")
        .into_iter()
        .filter_map(|b| b.value().attr("aria-label").map(str::to_string))
        .collect();

    let offers = |needle: &str| labels.iter().any(|l| l.contains(needle));
    if offers("Submit application") {
        ApplyStep::Submit
    } else if offers("Review") {
        ApplyStep::Review
    } else if offers("Continue to next step") {
        ApplyStep::Next
    } else {
        ApplyStep::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"
<html><body><form>
  <div class="fb-dash-form-element">
    <label for="phone"><span aria-hidden="true">Mobile phone number</span><span class="visually-hidden">Mobile phone number</span></label>
    <input id="phone" type="text">
  </div>
  <div class="fb-dash-form-element">
    <label for="english">What is your level of proficiency in English?</label>
    <select id="english">
      <option>Select an option</option>
      <option>Native or bilingual</option>
      <option>Professional</option>
    </select>
  </div>
  <fieldset>
    <legend><span><span aria-hidden="true">Do you require visa sponsorship?</span></span></legend>
    <div><input id="visa-yes" type="radio"><label for="visa-yes" data-test-text-selectable-option__label="Yes">Yes</label></div>
    <div><input id="visa-no" type="radio"><label for="visa-no" data-test-text-selectable-option__label="No">No</label></div>
  </fieldset>
  <div class="fb-dash-form-element">
    <label for="city"><span aria-hidden="true">Location (city)</span></label>
    <input id="city" role="combobox" type="text">
  </div>
  <button aria-label="Continue to next step">Next</button>
</form></body></html>"#;

    fn answers(pairs: &[(&str, &str)]) -> AnswerBook {
        AnswerBook::new(
            pairs
                .iter()
                .map(|(q, a)| (q.to_string(), a.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_scrape_question_kinds() {
        let questions = scrape_easy_apply_form(FORM);
        let summary: Vec<(&str, QuestionKind)> = questions
            .iter()
            .map(|q| (q.label.as_str(), q.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Mobile phone number", QuestionKind::Input),
                (
                    "What is your level of proficiency in English?",
                    QuestionKind::Select
                ),
                ("Location (city)", QuestionKind::FillSelect),
                ("Do you require visa sponsorship?", QuestionKind::Choice),
            ]
        );
        assert_eq!(questions[1].options, vec!["Native or bilingual", "Professional"]);
        assert_eq!(questions[3].options, vec!["Yes", "No"]);
    }

    #[test]
    fn test_complete_plan() {
        let book = answers(&[
            ("Mobile phone number", "600000000"),
            ("What is your level of proficiency in English?", "Professional"),
            ("Location (city)", "Madrid"),
            ("Do you require visa sponsorship?", "No"),
        ]);
        let plan = plan_answers(scrape_easy_apply_form(FORM), &book);

        assert!(plan.is_complete());
        assert_eq!(plan.actions.len(), 4);
        assert_eq!(
            plan.actions[2],
            FormAction::FillAndPick {
                question: "Location (city)".to_string(),
                answer: "Madrid".to_string()
            }
        );

        let mut job = JobRecord::new("text");
        plan.record_on(&mut job);
        assert_eq!(job.could_not_apply_due_to_questions, Some(false));
        assert_eq!(job.easy_apply_questions.len(), 4);
        assert!(job.applied.is_none());
    }

    #[test]
    fn test_missing_answer_blocks_application() {
        let book = answers(&[("Mobile phone number", "600000000")]);
        let plan = plan_answers(scrape_easy_apply_form(FORM), &book);

        assert!(!plan.is_complete());
        assert!(plan.actions.is_empty());
        assert_eq!(plan.missing.len(), 3);

        let mut job = JobRecord::new("text");
        plan.record_on(&mut job);
        assert_eq!(job.could_not_apply_due_to_questions, Some(true));
        assert_eq!(job.applied, Some(false));
    }

    #[test]
    fn test_answer_outside_options_is_rejected() {
        let book = answers(&[
            ("Mobile phone number", "600000000"),
            ("What is your level of proficiency in English?", "Fluent"),
            ("Location (city)", "Madrid"),
            ("Do you require visa sponsorship?", "no"),
        ]);
        let plan = plan_answers(scrape_easy_apply_form(FORM), &book);
        assert!(plan.missing.is_empty());
        assert_eq!(
            plan.rejected,
            vec!["What is your level of proficiency in English?"]
        );
        assert!(plan.actions.is_empty());
    }

    #[tokio::test]
    async fn test_save_missing_questions() {
        let path = std::env::temp_dir()
            .join(format!("jobscout-form-{}", uuid::Uuid::new_v4()))
            .join("questions_no_answer.json");
        let plan = plan_answers(scrape_easy_apply_form(FORM), &AnswerBook::default());

        assert_eq!(plan.save_missing(&path).await.unwrap(), 4);
        assert_eq!(plan.save_missing(&path).await.unwrap(), 0);
    }

    #[test]
    fn test_detect_apply_step() {
        assert_eq!(detect_apply_step(FORM), ApplyStep::Next);
        assert_eq!(
            detect_apply_step(r#"<button aria-label="Review your application">Review</button>"#),
            ApplyStep::Review
        );
        assert_eq!(
            detect_apply_step(
                r#"<button aria-label="Review">r</button><button aria-label="Submit application">s</button>"#
            ),
            ApplyStep::Submit
        );
        assert_eq!(detect_apply_step("<p>done</p>"), ApplyStep::Unknown);
    }
}
