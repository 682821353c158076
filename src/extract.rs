use log::debug;
use scraper::{ElementRef, Selector};
use std::fmt;
use std::sync::LazyLock;

use crate::fetch::Document;
use crate::models::JobRecord;

static RESULT_ITEM: LazyLock<Selector> =
    LazyLock::new(|| css("ul[class*='jobs-search__results-list'] > li"));
static POSTING_LINK: LazyLock<Selector> =
    LazyLock::new(|| css("a[class*='base-card__full-link']"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| css("h3"));
static COMPANY: LazyLock<Selector> =
    LazyLock::new(|| css("h4[class*='base-search-card__subtitle'] > a"));
static LOCATION: LazyLock<Selector> =
    LazyLock::new(|| css("span[class='job-search-card__location']"));

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector must parse")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Title,
    Company,
    Location,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Title => write!(f, "title"),
            MissingField::Company => write!(f, "company"),
            MissingField::Location => write!(f, "location"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub jobs: Vec<JobRecord>,
    /// Listing entries dropped for lack of a required field.
    pub skipped: usize,
}

/// Listings of `doc` in document order; malformed entries are left out.
pub fn extract_jobs(doc: &Document) -> Vec<JobRecord> {
    extract(doc).jobs
}

/// Walks the search results list in document order. Malformed entries are
/// counted and dropped; a page without the list yields nothing.
pub fn extract(doc: &Document) -> Extraction {
    let mut extraction = Extraction::default();

    for (index, item) in doc.html().select(&RESULT_ITEM).enumerate() {
        match parse_item(item) {
            Ok(job) => extraction.jobs.push(job),
            Err(missing) => {
                debug!("Skipping listing #{}: no {}", index + 1, missing);
                extraction.skipped += 1;
            }
        }
    }

    debug!(
        "Extracted {} listing(s), skipped {}",
        extraction.jobs.len(),
        extraction.skipped
    );
    extraction
}

fn parse_item(item: ElementRef) -> Result<JobRecord, MissingField> {
    let url = item
        .select(&POSTING_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string);

    let title = first_text(item, &TITLE).ok_or(MissingField::Title)?;
    let company = first_text(item, &COMPANY).ok_or(MissingField::Company)?;
    let location = first_text(item, &LOCATION).ok_or(MissingField::Location)?;

    Ok(JobRecord {
        title,
        company,
        location,
        url,
    })
}

fn first_text(item: ElementRef, selector: &Selector) -> Option<String> {
    let element = item.select(selector).next()?;
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
