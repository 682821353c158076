use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use scraper::Html;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;

// --- Target URL ---

/// Turns a free-form company name into the path segment used on the jobs site.
/// Only spaces are replaced; everything else passes through untouched.
pub fn company_slug(company: &str) -> String {
    company.replace(' ', "-")
}

pub fn jobs_url(region: &str, company: &str) -> String {
    format!(
        "https://{}.linkedin.com/jobs/{}-jobs",
        region,
        company_slug(company)
    )
}

// --- Document ---

/// A retrieved page, parsed and ready for selector queries.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

// --- Fetch service trait ---

pub trait FetchService {
    /// Retrieves the rendered markup of `url`.
    fn scrape(&self, url: &str) -> Result<String>;
    fn name(&self) -> &str;
}

// --- Scrapfly service ---

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    result: ScrapeResult,
}

#[derive(Debug, Deserialize)]
struct ScrapeResult {
    #[serde(default)]
    content: String,
    status_code: u16,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeApiError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Scrapfly's own clients wait this long; anti-bot scrapes routinely exceed a minute.
pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(160);

#[derive(Debug)]
pub struct ScrapflyService {
    api_key: String,
    api_url: String,
    accept_language: String,
    asp: bool,
    client: reqwest::blocking::Client,
}

impl ScrapflyService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(SCRAPE_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            accept_language: config.accept_language.clone(),
            asp: config.asp,
            client,
        })
    }
}

impl FetchService for ScrapflyService {
    fn scrape(&self, url: &str) -> Result<String> {
        let asp = if self.asp { "true" } else { "false" };
        // Errors are stripped of their URL: the query string carries the API key.
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("url", url),
                ("asp", asp),
                ("headers[accept-language]", self.accept_language.as_str()),
            ])
            .send()
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to Scrapfly")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!(
                "Scrapfly request failed with status {}: {}",
                status,
                describe_api_error(&body)
            ));
        }

        let scraped: ScrapeResponse = response
            .json()
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse Scrapfly response")?;
        scraped_content(scraped)
    }

    fn name(&self) -> &str {
        "scrapfly"
    }
}

fn describe_api_error(body: &str) -> String {
    match serde_json::from_str::<ScrapeApiError>(body) {
        Ok(ScrapeApiError {
            message,
            code: Some(code),
        }) => format!("{} ({})", message, code),
        Ok(err) => err.message,
        Err(_) => body.trim().to_string(),
    }
}

fn scraped_content(response: ScrapeResponse) -> Result<String> {
    let result = response.result;

    if !(200..300).contains(&result.status_code) || result.success == Some(false) {
        return Err(anyhow!(
            "Target page returned status {}{}",
            result.status_code,
            result
                .reason
                .map(|reason| format!(": {}", reason))
                .unwrap_or_default()
        ));
    }

    Ok(result.content)
}

// --- Fetcher ---

pub struct Fetcher {
    service: Box<dyn FetchService>,
    region: String,
}

impl Fetcher {
    pub fn new(service: Box<dyn FetchService>, region: &str) -> Self {
        Self {
            service,
            region: region.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let service = ScrapflyService::new(config)?;
        Ok(Self::new(Box::new(service), &config.region))
    }

    /// Fetches the jobs page for `company`. Nothing is cached; every call hits the network.
    pub fn fetch(&self, company: &str) -> Result<Document> {
        let url = jobs_url(&self.region, company);
        info!("Fetching {} via {}", url, self.service.name());

        let markup = self
            .service
            .scrape(&url)
            .with_context(|| format!("Failed to fetch {}", url))?;
        debug!("Fetched {} bytes from {}", markup.len(), url);

        Ok(Document::parse(&markup))
    }
}
