//! Intent routing
//!
//! A command is matched against an ordered table of trigger phrases by
//! substring; the first entry with any matching phrase wins. Order matters:
//! "research" contains "search", so research is listed first.

/// A task the assistant can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    CurrentTime,
    JobSearch,
    Research,
    WebSearch,
    Calendar,
    FindLocation,
    Open,
    Weather,
    SendEmail,
    SystemInfo,
    CreateTextFile,
    PlayMusic,
    SetAlarm,
    Screenshot,
    SpeedTest,
    ScheduleMeeting,
    StudyTimer,
    Notes,
    News,
    Joke,
}

/// Where a command goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// End the session
    Exit,
    /// Run a task handler
    Task(Intent),
    /// Hand the command to the conversational fallback
    Chat,
}

/// One row of the routing table
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub route: Route,
    pub phrases: &'static [&'static str],
}

const fn task(intent: Intent, phrases: &'static [&'static str]) -> Trigger {
    Trigger {
        route: Route::Task(intent),
        phrases,
    }
}

/// Built-in routing table, in priority order
pub const TRIGGERS: &[Trigger] = &[
    Trigger {
        route: Route::Exit,
        phrases: &["exit", "quit"],
    },
    task(Intent::CurrentTime, &["current time", "what time is it"]),
    task(Intent::JobSearch, &["find job", "search job"]),
    task(Intent::Research, &["research", "topic"]),
    task(Intent::WebSearch, &["search"]),
    task(Intent::Calendar, &["calendar"]),
    task(Intent::FindLocation, &["find location", "where is"]),
    task(Intent::Open, &["open"]),
    task(Intent::Weather, &["weather", "report"]),
    task(Intent::SendEmail, &["send email"]),
    task(Intent::SystemInfo, &["system info"]),
    task(Intent::CreateTextFile, &["create text file"]),
    task(Intent::PlayMusic, &["play music", "music"]),
    task(Intent::SetAlarm, &["set alarm"]),
    task(Intent::Screenshot, &["take a screenshot", "screenshot"]),
    task(Intent::SpeedTest, &["internet speed", "speed"]),
    task(Intent::ScheduleMeeting, &["meeting"]),
    task(Intent::StudyTimer, &["study timer", "timer"]),
    task(Intent::Notes, &["note"]),
    task(Intent::News, &["current news", "news"]),
    task(Intent::Joke, &["tell me a joke", "joke"]),
];

/// Maps commands to routes using an ordered trigger table
#[derive(Debug, Clone)]
pub struct Router {
    triggers: Vec<Trigger>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Router over the built-in table
    #[must_use]
    pub fn new() -> Self {
        Self::with_triggers(TRIGGERS.to_vec())
    }

    /// Router over a custom table
    #[must_use]
    pub const fn with_triggers(triggers: Vec<Trigger>) -> Self {
        Self { triggers }
    }

    /// Route a normalized command; anything unmatched goes to chat
    #[must_use]
    pub fn route(&self, command: &str) -> Route {
        let route = self
            .triggers
            .iter()
            .find(|t| t.phrases.iter().any(|p| command.contains(p)))
            .map_or(Route::Chat, |t| t.route);

        tracing::debug!(command, ?route, "routed command");
        route
    }

    /// The table in priority order
    #[must_use]
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let router = Router::new();
        assert_eq!(
            router.route("search the weather report"),
            Route::Task(Intent::WebSearch)
        );
        assert_eq!(
            router.route("research black holes"),
            Route::Task(Intent::Research)
        );
        assert_eq!(
            router.route("search job openings"),
            Route::Task(Intent::JobSearch)
        );
    }

    #[test]
    fn test_unmatched_goes_to_chat() {
        let router = Router::new();
        assert_eq!(router.route("hello"), Route::Chat);
        assert_eq!(router.route(""), Route::Chat);
    }

    #[test]
    fn test_exit_beats_everything() {
        let router = Router::new();
        assert_eq!(router.route("quit the music"), Route::Exit);
        assert_eq!(router.route("exit"), Route::Exit);
    }

    #[test]
    fn test_every_intent_is_reachable() {
        let router = Router::new();
        for trigger in router.triggers() {
            let first = trigger.phrases[0];
            assert_eq!(router.route(first), trigger.route, "phrase {first:?}");
        }
    }

    #[test]
    fn test_custom_table() {
        let router = Router::with_triggers(vec![task(Intent::Joke, &["laugh"])]);
        assert_eq!(router.route("make me laugh"), Route::Task(Intent::Joke));
        assert_eq!(router.route("tell me a joke"), Route::Chat);
    }
}
