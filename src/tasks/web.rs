//! Browser-backed tasks: search, maps, job listings and "open"

use async_trait::async_trait;

use super::{Task, open_url};
use crate::Result;
use crate::assistant::Context;
use crate::services::{self, launcher};

/// Employment types recognized when searching for jobs
const EMPLOYMENT_TYPES: &[&str] = &["full-time", "part-time", "contract", "remote"];

/// Google search for a spoken query
pub struct WebSearch;

#[async_trait(?Send)]
impl Task for WebSearch {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let query = ctx.ask("What would you like me to search for?").await;
        if query.is_empty() {
            ctx.say("I didn't catch what to search for.").await;
            return Ok(());
        }

        open_url(ctx, &launcher::google_search_url(&query)).await?;
        ctx.say(&format!("Here are the results for {query}")).await;
        Ok(())
    }
}

/// Opens a configured website or program, falling back to a search
pub struct Open;

#[async_trait(?Send)]
impl Task for Open {
    async fn run(&self, ctx: &mut Context, command: &str) -> Result<()> {
        let mut keyword = command.replace("open", "").trim().to_string();
        if keyword.is_empty() {
            keyword = ctx.ask("What would you like me to open?").await;
            if keyword.is_empty() {
                ctx.say("I didn't catch what to open.").await;
                return Ok(());
            }
        }

        if let Some(url) = ctx.config.launch.websites.get(&keyword).cloned() {
            ctx.say(&format!("Opening {keyword}")).await;
            return open_url(ctx, &url).await;
        }

        if let Some(program) = ctx.config.launch.apps.get(&keyword).cloned() {
            ctx.say(&format!("Launching {keyword}")).await;
            let launched = services::call(
                "launcher",
                ctx.config.timeouts.launch,
                ctx.services.launcher.launch_app(&program),
            )
            .await;
            if let Err(e) = launched {
                tracing::warn!(program = %program, error = %e, "launch failed");
                ctx.say(&format!(
                    "Unable to launch {keyword}. Please check installation path."
                ))
                .await;
            }
            return Ok(());
        }

        ctx.say(&format!(
            "I couldn't find {keyword} in my apps or websites. Searching on Google."
        ))
        .await;
        open_url(ctx, &launcher::google_search_url(&keyword)).await
    }
}

/// Shows a place on Google Maps
pub struct FindLocation;

#[async_trait(?Send)]
impl Task for FindLocation {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let place = ctx.ask("Which location would you like to find?").await;
        if place.is_empty() {
            ctx.say("I didn't catch that. Please try again.").await;
            return Ok(());
        }

        ctx.say(&format!("Finding the location of {place}.")).await;
        open_url(ctx, &launcher::maps_url(&place)).await
    }
}

/// Opens Indeed listings for a job type and location
pub struct JobSearch;

#[async_trait(?Send)]
impl Task for JobSearch {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let job = ctx
            .ask("What type of job are you looking for? (e.g., software developer, data analyst, etc.)")
            .await;
        let location = ctx
            .ask("Which location are you looking to work in? (e.g., New York, Remote, etc.)")
            .await;
        let employment = ctx
            .ask("What type of employment are you looking for? (e.g., full-time, part-time, contract, remote)")
            .await;

        if job.is_empty() || location.is_empty() {
            ctx.say("I need both a job type and a location to search.")
                .await;
            return Ok(());
        }

        let employment = employment.replace(' ', "-");
        if EMPLOYMENT_TYPES.contains(&employment.as_str()) {
            ctx.say(&format!("Searching for {employment} {job} jobs in {location}."))
                .await;
        } else {
            ctx.say(&format!("Searching for {job} jobs in {location}."))
                .await;
        }

        open_url(ctx, &launcher::indeed_url(&job, &location)).await?;
        ctx.say(&format!("Here are the job listings for {job} in {location}."))
            .await;
        Ok(())
    }
}
