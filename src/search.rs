use anyhow::Result;
use log::info;
use std::fmt;

use crate::extract;
use crate::fetch::Fetcher;
use crate::models::JobRecord;

pub const MISSING_INPUT_MESSAGE: &str = "Please provide both a company name and a job position.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingCompany,
    MissingPosition,
    MissingBoth,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", MISSING_INPUT_MESSAGE)
    }
}

impl std::error::Error for ValidationError {}

/// Form input that has been checked and is safe to search with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub company: String,
    pub position: String,
}

impl SearchQuery {
    pub fn new(company: &str, position: &str) -> Result<Self, ValidationError> {
        let company = company.trim();
        let position = position.trim();

        match (company.is_empty(), position.is_empty()) {
            (true, true) => Err(ValidationError::MissingBoth),
            (true, false) => Err(ValidationError::MissingCompany),
            (false, true) => Err(ValidationError::MissingPosition),
            (false, false) => Ok(Self {
                company: company.to_string(),
                position: position.to_string(),
            }),
        }
    }
}

/// Keeps records whose title contains `position`, ignoring case.
/// An empty `position` keeps everything; callers validate input first.
pub fn filter_by_position(records: Vec<JobRecord>, position: &str) -> Vec<JobRecord> {
    let needle = position.to_lowercase();
    records
        .into_iter()
        .filter(|job| job.title.to_lowercase().contains(&needle))
        .collect()
}

/// Fetches the company's jobs page, extracts its listings and keeps the ones
/// matching `position`. An empty result is not an error.
pub fn search_jobs(fetcher: &Fetcher, company: &str, position: &str) -> Result<Vec<JobRecord>> {
    let doc = fetcher.fetch(company)?;
    let jobs = extract::extract_jobs(&doc);
    let scanned = jobs.len();

    let matches = filter_by_position(jobs, position);
    info!(
        "{} of {} listing(s) at {} match '{}'",
        matches.len(),
        scanned,
        company,
        position
    );

    Ok(matches)
}

pub fn run_query(fetcher: &Fetcher, query: &SearchQuery) -> Result<Vec<JobRecord>> {
    search_jobs(fetcher, &query.company, &query.position)
}
