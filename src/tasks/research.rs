//! Spoken encyclopedia lookups

use async_trait::async_trait;

use super::{Task, is_yes, open_url};
use crate::Result;
use crate::assistant::Context;
use crate::services::{self, Summary, launcher};

/// Reads an encyclopedia summary and offers a web search
pub struct Research;

#[async_trait(?Send)]
impl Task for Research {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let topic = ctx.ask("What topic would you like to research?").await;
        if topic.is_empty() {
            ctx.say("I didn't catch the topic.").await;
            return Ok(());
        }

        let looked_up = services::call(
            "encyclopedia",
            ctx.config.timeouts.http,
            ctx.services.encyclopedia.summary(&topic),
        )
        .await;

        let reply = match looked_up {
            Ok(Summary::Article(text)) => format!("Here's a brief summary of {topic}: {text}"),
            Ok(Summary::Ambiguous) => {
                format!("There are multiple topics related to {topic}. Can you specify further?")
            }
            Ok(Summary::NotFound) => {
                format!("Sorry, I couldn't find any information about {topic}.")
            }
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "encyclopedia lookup failed");
                format!("Sorry, I couldn't retrieve information about {topic}.")
            }
        };
        ctx.say(&reply).await;

        let answer = ctx
            .ask("Would you like me to perform a Google search as well?")
            .await;
        if is_yes(&answer) {
            open_url(ctx, &launcher::google_search_url(&topic)).await?;
        }
        Ok(())
    }
}
