//! Conversational fallback
//!
//! Commands no task claims are answered here: by the generative
//! collaborator when the session enabled it, otherwise (or when it fails,
//! times out, or returns nothing) by the static response table.

mod gemini;
mod responses;

use std::time::Duration;

pub use gemini::{GeminiClient, Generator};
pub use responses::{DEFAULT_KEY, StaticResponses};

use crate::config::Config;
use crate::services;

/// Answers free-form commands
pub struct ConversationalFallback {
    generator: Option<Box<dyn Generator>>,
    use_generative: bool,
    responses: StaticResponses,
    timeout: Duration,
}

impl ConversationalFallback {
    /// Fallback with an explicit generator and table
    #[must_use]
    pub fn new(
        generator: Option<Box<dyn Generator>>,
        use_generative: bool,
        responses: StaticResponses,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            use_generative,
            responses,
            timeout,
        }
    }

    /// Build from configuration
    ///
    /// A missing Gemini key or an unreadable responses file is logged and
    /// degrades to the static built-in table.
    #[must_use]
    pub fn from_config(config: &Config, use_generative: bool) -> Self {
        let generator: Option<Box<dyn Generator>> = match config.api_keys.gemini.clone() {
            Some(key) => {
                match GeminiClient::new(key, config.chat.model.clone(), config.timeouts.http) {
                    Ok(client) => Some(Box::new(client)),
                    Err(e) => {
                        tracing::warn!(error = %e, "generative chat unavailable");
                        None
                    }
                }
            }
            None => {
                if use_generative {
                    tracing::warn!("GEMINI_API_KEY not set, using static responses");
                }
                None
            }
        };

        let responses = config
            .chat
            .responses_file
            .as_deref()
            .map_or_else(StaticResponses::built_in, |path| {
                StaticResponses::load(path).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load responses file");
                    StaticResponses::built_in()
                })
            });

        Self::new(generator, use_generative, responses, config.timeouts.http)
    }

    /// Whether replies come from the generative collaborator
    #[must_use]
    pub fn is_generative(&self) -> bool {
        self.use_generative && self.generator.is_some()
    }

    /// Reply to a command; never empty
    pub async fn respond(&self, command: &str) -> String {
        if self.use_generative
            && let Some(generator) = &self.generator
        {
            match services::call("gemini", self.timeout, generator.generate(command)).await {
                Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
                Ok(_) => tracing::debug!("empty generative reply, using static table"),
                Err(e) => tracing::warn!(error = %e, "generative reply failed, using static table"),
            }
        }

        self.responses.lookup(command).to_string()
    }
}
