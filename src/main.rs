use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use elsa::chat::ConversationalFallback;
use elsa::input::{ConsoleChannel, InputAdapter, TextChannel};
use elsa::services::{Services, SystemClock};
use elsa::speech::{Speaker, VoiceSpeaker};
use elsa::tasks::TaskRegistry;
use elsa::voice::{AudioCapture, AudioPlayback, PLAYBACK_SAMPLE_RATE, sine_tone};
use elsa::{Assistant, Config, Context, Router};

/// ELSA - voice-driven personal assistant
#[derive(Parser)]
#[command(name = "elsa", version, about)]
struct Cli {
    /// Type commands instead of speaking them
    #[arg(long, env = "ELSA_TEXT")]
    text: bool,

    /// Answer unmatched commands with the generative model
    #[arg(long, conflicts_with = "static_chat")]
    generative: bool,

    /// Answer unmatched commands from the static response table
    #[arg(long)]
    static_chat: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test speech output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn,elsa=info",
        1 => "info,elsa=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker(),
            Command::TestTts { text } => test_tts(&text).await,
            Command::Setup => elsa::setup::run_setup(),
        };
    }

    let config = Config::load_with_options(cli.text)?;
    tracing::debug!(
        name = %config.name,
        wake_word = %config.wake_word,
        "loaded configuration"
    );

    let use_generative = if cli.generative {
        true
    } else if cli.static_chat {
        false
    } else if let Some(generative) = config.chat.generative {
        generative
    } else {
        ask_generative()
    };

    tracing::info!(
        voice = config.voice.enabled,
        generative = use_generative,
        "starting assistant"
    );

    let chat = ConversationalFallback::from_config(&config, use_generative);
    let services = Services::from_config(&config)?;
    let speaker = VoiceSpeaker::from_config(&config);
    let input = InputAdapter::from_config(&config);

    if input.has_voice() {
        tracing::info!("listening, say \"{}\" followed by a command", config.wake_word);
    } else {
        tracing::info!("text mode, type a command");
    }

    let ctx = Context {
        config,
        input,
        speaker: Box::new(speaker),
        services,
        clock: Box::new(SystemClock),
    };

    let mut assistant = Assistant::new(ctx, Router::new(), TaskRegistry::standard(), chat);
    assistant.run().await;

    Ok(())
}

/// Ask once whether unmatched commands go to the generative model
fn ask_generative() -> bool {
    match ConsoleChannel.read_line("Enable generative chat mode? (yes/no): ") {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "yes" | "y"),
        Err(e) => {
            tracing::debug!(error = %e, "no answer, using static replies");
            false
        }
    }
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    println!("Sample rate: {} Hz", elsa::voice::SAMPLE_RATE);
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.take_buffer();
        let energy = calculate_rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "█".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check that the right input device is the default.");

    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Test speaker output with a sine wave
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;
    let samples = sine_tone(440, 2000, PLAYBACK_SAMPLE_RATE);

    println!(
        "Playing {} samples at {} Hz...",
        samples.len(),
        PLAYBACK_SAMPLE_RATE
    );
    playback.play(samples)?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Test the configured speech engine
#[allow(clippy::future_not_send)]
async fn test_tts(text: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    println!(
        "Testing {:?} speech with text: \"{text}\"\n",
        config.voice.tts_provider
    );

    let mut speaker = VoiceSpeaker::from_config(&config);
    if !speaker.has_engine() {
        anyhow::bail!("no speech engine available, check the voice settings and API keys");
    }
    speaker.speak(text).await;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
