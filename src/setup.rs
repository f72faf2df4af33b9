//! Interactive first-run setup wizard (`elsa setup`)

use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, Password, Select};

use crate::config::file::{
    AssistantFileConfig, ChatFileConfig, ElsaConfigFile, EmailFileConfig, NewsFileConfig,
    VoiceFileConfig,
};

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or config cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("ELSA Setup\n");

    let existing = crate::config::file::load_config_file();
    let config_path = crate::config::file::config_file_path()
        .unwrap_or_else(|| PathBuf::from("~/.config/elsa/config.toml"));

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. Identity
    let name: String = Input::new()
        .with_prompt("Assistant name")
        .default(existing.assistant.name.clone().unwrap_or_else(|| "ELSA".to_string()))
        .interact_text()?;
    let wake_word: String = Input::new()
        .with_prompt("Wake word")
        .default(
            existing
                .assistant
                .wake_word
                .clone()
                .unwrap_or_else(|| name.to_lowercase()),
        )
        .interact_text()?;

    let mut api_keys = existing.api_keys;

    // 2. Voice
    let enable_voice = Confirm::new()
        .with_prompt("Enable voice input and spoken replies?")
        .default(existing.voice.enabled.unwrap_or(true))
        .interact()?;

    let voice = if enable_voice {
        let stt_providers = ["whisper", "deepgram"];
        let stt_idx = Select::new()
            .with_prompt("Speech recognition provider")
            .items(&stt_providers)
            .default(default_index(&stt_providers, existing.voice.stt_provider.as_deref()))
            .interact()?;
        let stt_provider = stt_providers[stt_idx];
        match stt_provider {
            "deepgram" => ask_key(&mut api_keys.deepgram, "Deepgram", "DEEPGRAM_API_KEY")?,
            _ => ask_key(&mut api_keys.openai, "OpenAI", "OPENAI_API_KEY")?,
        }

        let tts_providers = ["system", "openai", "elevenlabs"];
        let tts_idx = Select::new()
            .with_prompt("Speech output engine")
            .items(&tts_providers)
            .default(default_index(&tts_providers, existing.voice.tts_provider.as_deref()))
            .interact()?;
        let tts_provider = tts_providers[tts_idx];
        match tts_provider {
            "openai" => ask_key(&mut api_keys.openai, "OpenAI", "OPENAI_API_KEY")?,
            "elevenlabs" => ask_key(&mut api_keys.elevenlabs, "ElevenLabs", "ELEVENLABS_API_KEY")?,
            _ => {}
        }

        VoiceFileConfig {
            enabled: Some(true),
            stt_provider: Some(stt_provider.to_string()),
            tts_provider: Some(tts_provider.to_string()),
            ..existing.voice
        }
    } else {
        VoiceFileConfig {
            enabled: Some(false),
            ..existing.voice
        }
    };

    // 3. Conversational fallback
    ask_key(&mut api_keys.gemini, "Gemini", "GEMINI_API_KEY")?;
    let generative = if api_keys.gemini.is_some() {
        let choices = ["ask at startup", "always generative", "always static"];
        let current = match existing.chat.generative {
            None => 0,
            Some(true) => 1,
            Some(false) => 2,
        };
        let idx = Select::new()
            .with_prompt("Conversational replies")
            .items(&choices)
            .default(current)
            .interact()?;
        match idx {
            1 => Some(true),
            2 => Some(false),
            _ => None,
        }
    } else {
        Some(false)
    };

    // 4. Information services
    ask_key(&mut api_keys.openweather, "OpenWeatherMap", "OPENWEATHER_API_KEY")?;
    ask_key(&mut api_keys.news, "NewsAPI", "NEWS_API_KEY")?;
    let country: String = Input::new()
        .with_prompt("News country code")
        .default(existing.news.country.clone().unwrap_or_else(|| "in".to_string()))
        .interact_text()?;

    // 5. Email (optional)
    let email = if Confirm::new()
        .with_prompt("Configure outgoing email?")
        .default(existing.email.address.is_some())
        .interact()?
    {
        ask_email(existing.email)?
    } else {
        existing.email
    };

    // 6. Build and write config
    let config_file = ElsaConfigFile {
        assistant: AssistantFileConfig {
            name: Some(name),
            wake_word: Some(wake_word),
        },
        voice,
        chat: ChatFileConfig {
            generative,
            ..existing.chat
        },
        api_keys,
        email,
        news: NewsFileConfig {
            country: Some(country),
        },
        paths: existing.paths,
        websites: existing.websites,
        apps: existing.apps,
    };

    write_config(&config_path, &config_file)?;
    println!("\nConfig written to {}", config_path.display());
    println!("\nSetup complete! Run `elsa -v` to start.");

    Ok(())
}

/// Index of `current` in `options`, or the first option
fn default_index(options: &[&str], current: Option<&str>) -> usize {
    current
        .and_then(|c| options.iter().position(|o| o.eq_ignore_ascii_case(c)))
        .unwrap_or(0)
}

/// Show a key as `abcd...wxyz`
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

/// Prompt for an API key, keeping the current one on a blank answer
fn ask_key(slot: &mut Option<String>, service: &str, env_hint: &str) -> anyhow::Result<()> {
    let prompt = match slot.as_deref() {
        Some(current) => format!("{service} API key (current: {}, leave blank to keep)", mask(current)),
        None => format!("{service} API key ({env_hint}, leave blank to skip)"),
    };

    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim();
    if !input.is_empty() {
        *slot = Some(input.to_string());
    }
    Ok(())
}

/// Prompt for the sending account
fn ask_email(existing: EmailFileConfig) -> anyhow::Result<EmailFileConfig> {
    let address: String = Input::new()
        .with_prompt("Sender address")
        .default(existing.address.clone().unwrap_or_default())
        .interact_text()?;

    let password = Password::new()
        .with_prompt("App password (leave blank to keep)")
        .allow_empty_password(true)
        .interact()?;

    let smtp_host: String = Input::new()
        .with_prompt("SMTP host")
        .default(
            existing
                .smtp_host
                .clone()
                .unwrap_or_else(|| "smtp.gmail.com".to_string()),
        )
        .interact_text()?;

    let smtp_port: u16 = Input::new()
        .with_prompt("SMTP port")
        .default(existing.smtp_port.unwrap_or(465))
        .interact_text()?;

    Ok(EmailFileConfig {
        address: Some(address),
        password: if password.is_empty() {
            existing.password
        } else {
            Some(password)
        },
        smtp_host: Some(smtp_host),
        smtp_port: Some(smtp_port),
    })
}

/// Serialize and write the config file
fn write_config(path: &Path, config: &ElsaConfigFile) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, toml::to_string_pretty(config)?)?;

    Ok(())
}
