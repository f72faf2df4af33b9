//! Topic summaries from Wikipedia

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Error, Result};

const BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

/// Sentences kept from an article introduction
pub const SUMMARY_SENTENCES: usize = 3;

/// Outcome of a topic lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// Opening sentences of the article
    Article(String),
    /// The topic names several articles
    Ambiguous,
    /// No article matches
    NotFound,
}

/// Looks up short topic summaries
#[async_trait(?Send)]
pub trait Encyclopedia {
    /// Summary of `topic`
    async fn summary(&self, topic: &str) -> Result<Summary>;
}

#[derive(Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Wikipedia REST client
pub struct Wikipedia {
    client: reqwest::Client,
}

impl Wikipedia {
    /// Create a client using a shared HTTP client
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl Encyclopedia for Wikipedia {
    async fn summary(&self, topic: &str) -> Result<Summary> {
        let title = topic.trim().replace(' ', "_");
        let url = format!("{BASE_URL}/{}?redirect=true", urlencoding::encode(&title));

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Summary::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::service("wikipedia", format!("{status}: {body}")));
        }

        let page: PageSummary = response.json().await?;
        Ok(classify(page))
    }
}

fn classify(page: PageSummary) -> Summary {
    if page.kind == "disambiguation" {
        return Summary::Ambiguous;
    }
    let text = first_sentences(&page.extract, SUMMARY_SENTENCES);
    if text.is_empty() {
        Summary::NotFound
    } else {
        Summary::Article(text)
    }
}

/// The first `count` sentences of `text`
#[must_use]
pub fn first_sentences(text: &str, count: usize) -> String {
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen == count {
                    return text[..=i].trim().to_string();
                }
            }
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sentences() {
        let text = "Rust is a language. It is fast. It is safe. It has a mascot.";
        assert_eq!(
            first_sentences(text, 3),
            "Rust is a language. It is fast. It is safe."
        );
        assert_eq!(first_sentences("Version 1.88 shipped.", 1), "Version 1.88 shipped.");
        assert_eq!(first_sentences("No terminator", 3), "No terminator");
    }

    #[test]
    fn test_disambiguation_page() {
        let page: PageSummary = serde_json::from_str(
            r#"{"type":"disambiguation","title":"Mercury","extract":"Mercury may refer to:"}"#,
        )
        .unwrap();
        assert_eq!(classify(page), Summary::Ambiguous);
    }

    #[test]
    fn test_standard_page() {
        let page: PageSummary = serde_json::from_str(
            r#"{"type":"standard","extract":"A. B. C. D."}"#,
        )
        .unwrap();
        assert_eq!(classify(page), Summary::Article("A. B. C.".to_string()));
    }
}
