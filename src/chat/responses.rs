//! Static response table

use std::collections::HashMap;
use std::path::Path;

use crate::Result;

/// Key holding the reply for unknown phrases
pub const DEFAULT_KEY: &str = "default";

const DEFAULT_REPLY: &str = "Sorry, I didn't understand that. Can you please repeat?";

const BUILT_IN: &[(&str, &str)] = &[
    ("hello", "Hi there! How can I help you today?"),
    ("how are you", "I am doing great! How about you?"),
    ("what is your name", "I am ELSA, your virtual assistant."),
    ("bye", "Goodbye! Have a great day!"),
    (
        "what can you do",
        "I can assist with various tasks like opening apps, sending emails, telling jokes, and more. Just ask!",
    ),
    ("who created you", "I was created by a talented developer!"),
    ("thank you", "You're welcome!"),
    (
        "what is your purpose",
        "My purpose is to assist you with tasks and provide information.",
    ),
    (
        "how old are you",
        "I am as old as the lines of code I am made of!",
    ),
    (DEFAULT_KEY, DEFAULT_REPLY),
];

/// Immutable phrase -> reply table with a guaranteed default
#[derive(Debug, Clone)]
pub struct StaticResponses {
    table: HashMap<String, String>,
}

impl Default for StaticResponses {
    fn default() -> Self {
        Self::built_in()
    }
}

impl StaticResponses {
    /// The built-in table
    #[must_use]
    pub fn built_in() -> Self {
        Self {
            table: BUILT_IN
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Built-in table overlaid with extra entries
    ///
    /// Keys are normalized; blank replies are ignored so the default can
    /// never be emptied.
    #[must_use]
    pub fn with_overrides<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut responses = Self::built_in();
        for (phrase, reply) in entries {
            let reply = reply.into();
            if reply.trim().is_empty() {
                continue;
            }
            responses.table.insert(normalize(phrase.as_ref()), reply);
        }
        responses
    }

    /// Load a TOML table of `phrase = "reply"` on top of the built-in table
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a string table
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: HashMap<String, String> = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), entries = entries.len(), "loaded static responses");
        Ok(Self::with_overrides(entries))
    }

    /// Reply for a phrase; unknown phrases get the default reply
    #[must_use]
    pub fn lookup(&self, phrase: &str) -> &str {
        self.table
            .get(&normalize(phrase))
            .or_else(|| self.table.get(DEFAULT_KEY))
            .map_or(DEFAULT_REPLY, String::as_str)
    }

    /// Number of entries, including the default
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Never true; the default entry is always present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn normalize(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let responses = StaticResponses::built_in();
        assert_eq!(
            responses.lookup("  Hello "),
            "Hi there! How can I help you today?"
        );
        assert_eq!(responses.lookup("THANK YOU"), "You're welcome!");
    }

    #[test]
    fn test_unknown_gets_default() {
        let responses = StaticResponses::built_in();
        let default = responses.lookup(DEFAULT_KEY);
        assert_eq!(responses.lookup("what is the meaning of life"), default);
        assert_eq!(responses.lookup(""), default);
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let responses = StaticResponses::built_in();
        assert_eq!(responses.lookup("bye"), responses.lookup("bye"));
    }

    #[test]
    fn test_overrides_cannot_blank_default() {
        let responses = StaticResponses::with_overrides([
            ("Good Morning", "Good morning to you too!"),
            ("default", "  "),
        ]);
        assert_eq!(responses.lookup("good morning"), "Good morning to you too!");
        assert_eq!(responses.lookup("nonsense"), DEFAULT_REPLY);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.toml");
        std::fs::write(&path, "\"good night\" = \"Sleep well!\"\n").unwrap();

        let responses = StaticResponses::load(&path).unwrap();
        assert_eq!(responses.lookup("Good Night"), "Sleep well!");
        assert_eq!(responses.len(), BUILT_IN.len() + 1);
    }
}
