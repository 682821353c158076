use anyhow::{Context, Result};

use crate::models::JobRecord;

pub fn found_message(count: usize, position: &str, company: &str) -> String {
    format!(
        "Found {} job opening(s) for '{}' at {}:",
        count, position, company
    )
}

pub fn not_found_message(position: &str, company: &str) -> String {
    format!("No job openings found for '{}' at {}.", position, company)
}

pub fn error_message(err: &anyhow::Error) -> String {
    format!("An error occurred: {:#}", err)
}

pub fn link_line(job: &JobRecord) -> String {
    match &job.url {
        Some(url) => format!("Link: {}", url),
        None => "Link: (not available)".to_string(),
    }
}

/// Title, company, location and link, one per line.
pub fn record_lines(job: &JobRecord) -> [String; 4] {
    [
        format!("Title: {}", job.title),
        format!("Company: {}", job.company),
        format!("Location: {}", job.location),
        link_line(job),
    ]
}

pub fn results_text(jobs: &[JobRecord], position: &str, company: &str) -> String {
    if jobs.is_empty() {
        return format!("{}\n", not_found_message(position, company));
    }

    let mut out = found_message(jobs.len(), position, company);
    out.push('\n');
    for job in jobs {
        out.push('\n');
        for line in record_lines(job) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&"-".repeat(40));
        out.push('\n');
    }
    out
}

pub fn results_json(jobs: &[JobRecord]) -> Result<String> {
    serde_json::to_string_pretty(jobs).context("Failed to serialize job records")
}
