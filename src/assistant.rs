//! The command loop
//!
//! One command is in flight at a time: capture, route, run one handler or
//! the conversational fallback, speak, repeat until exit or end of input.

use chrono::Timelike;

use crate::chat::ConversationalFallback;
use crate::config::Config;
use crate::input::InputAdapter;
use crate::router::{Route, Router};
use crate::services::{Clock, Services};
use crate::speech::Speaker;
use crate::tasks::TaskRegistry;

/// Spoken when a handler fails
pub const APOLOGY: &str = "Sorry, something went wrong while handling that.";

/// Spoken before the session ends
pub const FAREWELL: &str = "Goodbye!";

/// Everything a handler may use during one session
pub struct Context {
    pub config: Config,
    pub input: InputAdapter,
    pub speaker: Box<dyn Speaker>,
    pub services: Services,
    pub clock: Box<dyn Clock>,
}

impl Context {
    /// Print and speak
    pub async fn say(&mut self, text: &str) {
        self.speaker.speak(text).await;
    }

    /// Capture the next command or answer
    pub async fn listen(&mut self) -> String {
        self.input.capture(self.speaker.as_mut()).await
    }

    /// Speak a prompt, then capture the answer
    pub async fn ask(&mut self, prompt: &str) -> String {
        self.say(prompt).await;
        self.listen().await
    }

    /// Read a typed line for values that must be exact
    pub fn type_line(&mut self, prompt: &str) -> String {
        self.input.read_typed(prompt)
    }
}

/// Whether the loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The assistant session
pub struct Assistant {
    ctx: Context,
    router: Router,
    tasks: TaskRegistry,
    chat: ConversationalFallback,
}

impl Assistant {
    /// Assemble a session from its parts
    #[must_use]
    pub const fn new(
        ctx: Context,
        router: Router,
        tasks: TaskRegistry,
        chat: ConversationalFallback,
    ) -> Self {
        Self {
            ctx,
            router,
            tasks,
            chat,
        }
    }

    /// Session state, for inspection after a run
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.ctx
    }

    /// Speak the time-of-day greeting
    pub async fn greet(&mut self) {
        let greeting = greeting(self.ctx.clock.now().hour(), &self.ctx.config.name);
        self.ctx.say(&greeting).await;
    }

    /// Greet, then handle commands until exit or end of input
    pub async fn run(&mut self) {
        self.greet().await;

        loop {
            let command = self.ctx.listen().await;
            if self.ctx.input.is_closed() {
                tracing::info!("input closed, ending session");
                break;
            }
            if command.is_empty() {
                continue;
            }
            if self.handle(&command).await == Flow::Exit {
                break;
            }
        }
    }

    /// Handle one normalized command
    pub async fn handle(&mut self, command: &str) -> Flow {
        tracing::info!(command, "received command");

        match self.router.route(command) {
            Route::Exit => {
                self.ctx.say(FAREWELL).await;
                return Flow::Exit;
            }
            Route::Task(intent) => {
                let Some(task) = self.tasks.get(intent) else {
                    tracing::error!(?intent, "no handler registered");
                    self.ctx.say(APOLOGY).await;
                    return Flow::Continue;
                };
                if let Err(e) = task.run(&mut self.ctx, command).await {
                    tracing::error!(?intent, error = %e, "task failed");
                    self.ctx.say(APOLOGY).await;
                }
            }
            Route::Chat => {
                let reply = self.chat.respond(command).await;
                self.ctx.say(&reply).await;
            }
        }

        Flow::Continue
    }
}

/// Greeting for the hour of day (0-23)
#[must_use]
pub fn greeting(hour: u32, name: &str) -> String {
    let salutation = if hour < 12 {
        "Good morning! It's a bright new day, full of possibilities!"
    } else if hour < 18 {
        "Good afternoon! I hope your day is going well."
    } else {
        "Good evening! I'm here to assist you with whatever you need."
    };
    format!("{salutation} I am {name}, your virtual assistant. How can I assist you today?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_by_hour() {
        assert!(greeting(7, "ELSA").starts_with("Good morning!"));
        assert!(greeting(12, "ELSA").starts_with("Good afternoon!"));
        assert!(greeting(17, "ELSA").starts_with("Good afternoon!"));
        assert!(greeting(18, "ELSA").starts_with("Good evening!"));
        assert!(greeting(23, "ELSA").ends_with(
            "I am ELSA, your virtual assistant. How can I assist you today?"
        ));
    }
}
