// src/linkedin_analysis/job_scraper.rs
use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::types::JobRecord;
use crate::utils::{collapse_whitespace, first_integer};

const LINKEDIN_BASE_URL: &str = "https://www.linkedin.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct JobScraper {
    client: Client,
}

impl JobScraper {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Download a job posting and parse it into a record
    pub async fn fetch_job_posting(&self, url: &str) -> Result<JobRecord> {
        info!("Fetching job post: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch job post")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        let mut job = parse_job_page(&html)?;
        if job.url.is_none() {
            job.url = Some(url.to_string());
        }
        Ok(job)
    }
}

/// Parse a job page: the logged-in job view first, then the public posting
/// layout, then generic selectors.
pub fn parse_job_page(html: &str) -> Result<JobRecord> {
    let document = Html::parse_document(html);

    let job = parse_job_view(&document)
        .or_else(|| parse_public_posting(&document))
        .or_else(|| parse_generic_job(&document))
        .context("Failed to extract job content from page")?;

    info!("Extracted job: {}", job.display_name());
    Ok(job)
}

fn parse_job_view(document: &Html) -> Option<JobRecord> {
    let root = first_element(document.root_element(), &[".job-view-layout"])?;
    let article = first_element(root, &["article"])?;
    let (description, posted_date) = split_description(&lines_of(article));
    if description.is_empty() {
        return None;
    }

    let mut job = JobRecord::new(description);
    job.posted_date = posted_date;
    job.url = first_element(root, &["a[href]"])
        .and_then(|a| a.value().attr("href"))
        .map(absolute_url);
    job.position_name = find_text_by_selectors(
        root,
        &[
            "h2.jobs-unified-top-card__job-title",
            ".job-details-jobs-unified-top-card__job-title",
            "h1",
        ],
    );

    if let Some(primary) = find_text_by_selectors(
        root,
        &[
            "div.jobs-unified-top-card__primary-description",
            ".job-details-jobs-unified-top-card__primary-description-container",
        ],
    ) {
        apply_primary_description(&mut job, &primary);
    }

    if let Some(insight) = find_text_by_selectors(root, &["li.jobs-unified-top-card__job-insight"]) {
        let mut parts = insight.split('·').map(str::trim);
        job.contract_time = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
        job.experience = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    }

    Some(job)
}

fn parse_public_posting(document: &Html) -> Option<JobRecord> {
    let root = document.root_element();
    let body = first_element(
        root,
        &[
            ".show-more-less-html__markup",
            ".jobs-box__html-content",
            ".jobs-description__container",
            ".jobs-description-content__text",
            "[data-test-id='job-description']",
        ],
    )?;
    let description = lines_of(body).join("\n");
    if description.is_empty() {
        return None;
    }

    let mut job = JobRecord::new(description);
    job.position_name = find_text_by_selectors(
        root,
        &[
            "h1.top-card-layout__title",
            "h1[data-test-id='job-title']",
            ".jobs-unified-top-card__job-title",
        ],
    );
    job.company = find_text_by_selectors(
        root,
        &[
            ".topcard__org-name-link",
            ".top-card-layout__card .top-card-layout__second-subline",
            "a[data-test-id='job-poster-name']",
        ],
    );
    job.location = find_text_by_selectors(
        root,
        &[
            ".topcard__flavor--bullet",
            "[data-test-id='job-location']",
            ".jobs-unified-top-card__bullet",
        ],
    );
    job.applicants = find_text_by_selectors(root, &[".num-applicants__caption"])
        .as_deref()
        .and_then(first_integer);

    Some(job)
}

fn parse_generic_job(document: &Html) -> Option<JobRecord> {
    warn!("Falling back to generic job parsing");
    let root = document.root_element();

    let body = first_element(
        root,
        &[
            "[class*='description']",
            "[class*='content']",
            "main",
            "article",
        ],
    )?;
    let description = lines_of(body).join("\n");
    if description.is_empty() {
        return None;
    }

    let mut job = JobRecord::new(description);
    job.position_name = find_text_by_selectors(root, &["h1", "[class*='job-title']"]);
    job.company = find_text_by_selectors(root, &["[class*='company']", "[class*='employer']"]);
    Some(job)
}

/// `Company · City, Region (Remote) · 87 applicants`
fn apply_primary_description(job: &mut JobRecord, primary: &str) {
    let parts: Vec<&str> = primary.split('·').collect();

    job.company = parts
        .first()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    if let Some(place) = parts.get(1) {
        let place = place.lines().next().unwrap_or_default();
        let mut pieces = place.splitn(2, '(');
        job.location = pieces
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        job.contract_type = pieces
            .next()
            .and_then(|rest| rest.split(')').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    job.applicants = parts.get(2).and_then(|s| first_integer(s));
}

/// The article keeps one line per text node. "About the job" is dropped and the
/// last line carries the posting date.
fn split_description(lines: &[String]) -> (String, Option<String>) {
    let lines: Vec<String> = lines
        .iter()
        .map(|line| line.replace("About the job", "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    match lines.split_last() {
        Some((last, rest)) if !rest.is_empty() => {
            let posted = last.replace("Posted on", "").replace('.', "");
            let posted = posted.trim();
            (
                rest.join("\n"),
                (!posted.is_empty()).then(|| posted.to_string()),
            )
        }
        Some((only, _)) => (only.clone(), None),
        None => (String::new(), None),
    }
}

fn lines_of(element: ElementRef) -> Vec<String> {
    element
        .text()
        .flat_map(str::lines)
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

fn first_element<'a>(root: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| root.select(&selector).next())
}

fn find_text_by_selectors(root: ElementRef, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = root.select(&selector).next() {
                let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn absolute_url(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}/{}", LINKEDIN_BASE_URL, href.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB_VIEW: &str = r#"
<html><body>
<div class="job-view-layout">
  <a href="/jobs/view/3712345678/">Backend Engineer</a>
  <h2 class="jobs-unified-top-card__job-title"> Backend Engineer </h2>
  <div class="jobs-unified-top-card__primary-description">
    Acme Corp · Paris, Île-de-France, France (Hybrid) · 87 applicants
  </div>
  <ul><li class="jobs-unified-top-card__job-insight">Full-time · Mid-Senior level</li></ul>
  <article>
    <h2>About the job</h2>
    <p>We build APIs.</p>
    <ul><li>Python</li><li>3+ years of experience</li></ul>
    <p>Posted on Jan 5, 2024.</p>
  </article>
</div>
</body></html>"#;

    #[test]
    fn test_parse_job_view() {
        let job = parse_job_page(JOB_VIEW).unwrap();
        assert_eq!(
            job.url.as_deref(),
            Some("https://www.linkedin.com/jobs/view/3712345678/")
        );
        assert_eq!(job.position_name.as_deref(), Some("Backend Engineer"));
        assert_eq!(job.company.as_deref(), Some("Acme Corp"));
        assert_eq!(job.location.as_deref(), Some("Paris, Île-de-France, France"));
        assert_eq!(job.contract_type.as_deref(), Some("Hybrid"));
        assert_eq!(job.applicants, Some(87));
        assert_eq!(job.contract_time.as_deref(), Some("Full-time"));
        assert_eq!(job.experience.as_deref(), Some("Mid-Senior level"));
        assert_eq!(job.posted_date.as_deref(), Some("Jan 5, 2024"));
        assert_eq!(
            job.description,
            "We build APIs.\nPython\n3+ years of experience"
        );
    }

    #[test]
    fn test_primary_description_without_contract_type() {
        let mut job = JobRecord::new("text");
        apply_primary_description(&mut job, "Acme · Berlin, Germany · Over 200 applicants");
        assert_eq!(job.location.as_deref(), Some("Berlin, Germany"));
        assert!(job.contract_type.is_none());
        assert_eq!(job.applicants, Some(200));
    }

    #[test]
    fn test_public_posting_fallback() {
        let html = r#"
<html><body>
  <h1 class="top-card-layout__title">Data Engineer</h1>
  <a class="topcard__org-name-link">Globex</a>
  <span class="topcard__flavor--bullet">Madrid, Spain</span>
  <div class="show-more-less-html__markup"><p>Spark and Scala</p><p>Fluent Spanish</p></div>
</body></html>"#;
        let job = parse_job_page(html).unwrap();
        assert_eq!(job.position_name.as_deref(), Some("Data Engineer"));
        assert_eq!(job.company.as_deref(), Some("Globex"));
        assert_eq!(job.location.as_deref(), Some("Madrid, Spain"));
        assert_eq!(job.description, "Spark and Scala\nFluent Spanish");
    }

    #[test]
    fn test_page_without_content_fails() {
        assert!(parse_job_page("<html><body><p>nothing</p></body></html>").is_err());
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("/jobs/view/1"), "https://www.linkedin.com/jobs/view/1");
        assert_eq!(absolute_url("https://example.com/x"), "https://example.com/x");
    }
}
