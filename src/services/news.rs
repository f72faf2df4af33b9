//! Top headlines from NewsAPI

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Error, Result};

const BASE_URL: &str = "https://newsapi.org/v2/top-headlines";

/// Fetches headline titles
#[async_trait(?Send)]
pub trait NewsService {
    /// Current headline titles, most prominent first
    async fn headlines(&self) -> Result<Vec<String>>;
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Deserialize)]
struct ApiArticle {
    title: Option<String>,
}

/// NewsAPI client for one country
pub struct NewsApi {
    client: reqwest::Client,
    api_key: String,
    country: String,
}

impl NewsApi {
    /// Create a client using a shared HTTP client
    #[must_use]
    pub const fn new(client: reqwest::Client, api_key: String, country: String) -> Self {
        Self {
            client,
            api_key,
            country,
        }
    }
}

#[async_trait(?Send)]
impl NewsService for NewsApi {
    async fn headlines(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(BASE_URL)
            .query(&[("country", self.country.as_str())])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::service("news", format!("{status}: {body}")));
        }

        let data: ApiResponse = response.json().await?;
        let titles = titles(data);
        tracing::debug!(country = %self.country, count = titles.len(), "fetched headlines");
        Ok(titles)
    }
}

fn titles(data: ApiResponse) -> Vec<String> {
    data.articles
        .into_iter()
        .map(|a| {
            a.title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "No title available".to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_titles_are_placeholders() {
        let json = r#"{"status":"ok","totalResults":2,"articles":[
            {"title":"Markets rally"},
            {"title":null}
        ]}"#;
        let data: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(titles(data), vec!["Markets rally", "No title available"]);
    }
}
