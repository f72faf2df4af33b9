//! Task handlers
//!
//! Each handler prompts for what it needs, calls at most one collaborator
//! (bounded by [`services::call`]) and speaks the outcome. Errors that
//! escape a handler are answered with a generic apology by the assistant.

mod calendar;
mod files;
mod joke;
mod mail;
mod meeting;
mod news;
mod research;
mod speed;
mod system;
mod time;
mod timers;
mod weather;
mod web;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::assistant::Context;
use crate::router::Intent;
use crate::services;
use crate::Result;

pub use joke::JOKES;

/// A handler for one intent
#[async_trait(?Send)]
pub trait Task {
    /// Handle `command`, talking to the user through `ctx`
    async fn run(&self, ctx: &mut Context, command: &str) -> Result<()>;
}

/// Intent -> handler table
pub struct TaskRegistry {
    tasks: HashMap<Intent, Box<dyn Task>>,
}

impl TaskRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Registry with every built-in handler
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Intent::CurrentTime, time::CurrentTime);
        registry.register(Intent::JobSearch, web::JobSearch);
        registry.register(Intent::Research, research::Research);
        registry.register(Intent::WebSearch, web::WebSearch);
        registry.register(Intent::Calendar, calendar::Calendar);
        registry.register(Intent::FindLocation, web::FindLocation);
        registry.register(Intent::Open, web::Open);
        registry.register(Intent::Weather, weather::Weather);
        registry.register(Intent::SendEmail, mail::SendEmail);
        registry.register(Intent::SystemInfo, system::SystemInfo);
        registry.register(Intent::CreateTextFile, files::CreateTextFile);
        registry.register(Intent::PlayMusic, files::PlayMusic);
        registry.register(Intent::SetAlarm, timers::SetAlarm);
        registry.register(Intent::Screenshot, files::Screenshot);
        registry.register(Intent::SpeedTest, speed::SpeedTest);
        registry.register(Intent::ScheduleMeeting, meeting::ScheduleMeeting);
        registry.register(Intent::StudyTimer, timers::StudyTimer);
        registry.register(Intent::Notes, files::Notes);
        registry.register(Intent::News, news::News);
        registry.register(Intent::Joke, joke::Joke);
        registry
    }

    /// Add or replace the handler for `intent`
    pub fn register(&mut self, intent: Intent, task: impl Task + 'static) {
        self.tasks.insert(intent, Box::new(task));
    }

    /// Handler for `intent`
    #[must_use]
    pub fn get(&self, intent: Intent) -> Option<&dyn Task> {
        self.tasks.get(&intent).map(AsRef::as_ref)
    }

    /// Number of registered handlers
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no handler is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Open a URL through the launcher, bounded by the launch timeout
async fn open_url(ctx: &Context, url: &str) -> Result<()> {
    services::call(
        "launcher",
        ctx.config.timeouts.launch,
        ctx.services.launcher.open_url(url),
    )
    .await
}

/// Whether a spoken answer means yes
fn is_yes(answer: &str) -> bool {
    answer.split_whitespace().any(|w| {
        matches!(
            w.trim_matches(|c: char| !c.is_alphanumeric()),
            "yes" | "yeah" | "yep" | "sure"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{Route, TRIGGERS};

    #[test]
    fn test_every_routed_intent_has_a_handler() {
        let registry = TaskRegistry::standard();
        for trigger in TRIGGERS {
            if let Route::Task(intent) = trigger.route {
                assert!(registry.get(intent).is_some(), "{intent:?} has no handler");
            }
        }
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("yes"));
        assert!(is_yes("yes, please"));
        assert!(is_yes("sure thing"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yesterday"));
    }
}
