//! Spoken news briefing

use async_trait::async_trait;

use super::Task;
use crate::Result;
use crate::assistant::Context;
use crate::dates::parse_count;
use crate::services;

/// Headlines read when the requested count is missing or below one
pub const DEFAULT_HEADLINES: usize = 5;

/// Reads top headlines aloud
pub struct News;

#[async_trait(?Send)]
impl Task for News {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let Some(news) = ctx.services.news.take() else {
            ctx.say("News API key not configured. Please add it to your .env file.")
                .await;
            return Ok(());
        };

        ctx.say("Fetching the latest news headlines. Please hold on for a moment.")
            .await;
        let fetched = services::call("news", ctx.config.timeouts.http, news.headlines()).await;
        ctx.services.news = Some(news);

        let headlines = match fetched {
            Ok(headlines) => headlines,
            Err(e) => {
                tracing::warn!(error = %e, "news fetch failed");
                ctx.say("Sorry, I couldn't fetch the news. Please try again later.")
                    .await;
                return Ok(());
            }
        };

        if headlines.is_empty() {
            ctx.say("There are currently no news headlines available.")
                .await;
            return Ok(());
        }

        let answer = ctx
            .ask("How many headlines would you like to hear? Please say a number.")
            .await;
        let count = headline_count(&answer);

        for title in headlines.iter().take(count) {
            ctx.say(title).await;
        }
        Ok(())
    }
}

/// Requested headline count, defaulting when unparseable or below one
fn headline_count(answer: &str) -> usize {
    parse_count(answer)
        .filter(|n| *n >= 1)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_HEADLINES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_count() {
        assert_eq!(headline_count("3"), 3);
        assert_eq!(headline_count("seven"), 7);
        assert_eq!(headline_count("abc"), DEFAULT_HEADLINES);
        assert_eq!(headline_count("0"), DEFAULT_HEADLINES);
        assert_eq!(headline_count("-2"), DEFAULT_HEADLINES);
    }
}
