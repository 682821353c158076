use serde::{Deserialize, Serialize};

/// One listing pulled off a company's jobs page.
///
/// `title`, `company` and `location` are never empty; the extractor drops
/// any entry that lacks one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: Option<String>,
}
