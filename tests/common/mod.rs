//! Shared test utilities

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use elsa::chat::{ConversationalFallback, Generator, StaticResponses};
use elsa::config::PathsConfig;
use elsa::input::{InputAdapter, Listener, TextChannel};
use elsa::services::{
    Clock, Encyclopedia, Launcher, Mailer, NewsService, OutgoingEmail, ScreenCapture,
    Services, SpeedReport, SpeedTester, Summary, SystemProbe, SystemReport, WeatherReport,
    WeatherService,
};
use elsa::speech::Speaker;
use elsa::tasks::TaskRegistry;
use elsa::{Assistant, Config, Context, Error, Result, Router};

/// Friday 2024-10-11 15:00
#[must_use]
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 11)
        .expect("valid date")
        .and_hms_opt(15, 0, 0)
        .expect("valid time")
}

/// Listener replaying canned results, unintelligible once exhausted
pub struct ScriptedListener {
    results: VecDeque<Result<String>>,
}

impl ScriptedListener {
    pub fn new(results: Vec<Result<String>>) -> Self {
        Self {
            results: results.into(),
        }
    }
}

#[async_trait(?Send)]
impl Listener for ScriptedListener {
    async fn listen(&mut self) -> Result<String> {
        self.results.pop_front().unwrap_or(Err(Error::Unintelligible))
    }
}

/// Text channel replaying lines, then reporting end of input
pub struct ScriptedText {
    lines: VecDeque<String>,
    pub prompts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedText {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(ToString::to_string).collect(),
            prompts: Rc::default(),
        }
    }
}

impl TextChannel for ScriptedText {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.lines.pop_front().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "end of script",
            ))
        })
    }
}

/// Speaker recording everything said
#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    pub spoken: Rc<RefCell<Vec<String>>>,
    pub beeps: Rc<Cell<usize>>,
}

#[async_trait(?Send)]
impl Speaker for RecordingSpeaker {
    async fn speak(&mut self, text: &str) {
        self.spoken.borrow_mut().push(text.to_string());
    }

    async fn beep(&mut self, _freq_hz: u32, _duration_ms: u64) {
        self.beeps.set(self.beeps.get() + 1);
    }
}

/// Clock that advances only when slept on
pub struct FakeClock {
    now: Cell<NaiveDateTime>,
}

impl FakeClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }
}

#[async_trait(?Send)]
impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }

    async fn sleep(&self, duration: Duration) {
        let step = chrono::Duration::from_std(duration).expect("duration in range");
        self.now.set(self.now.get() + step);
    }
}

pub struct FakeNews(pub Vec<String>);

#[async_trait(?Send)]
impl NewsService for FakeNews {
    async fn headlines(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

pub struct FakeWeather(pub Option<WeatherReport>);

#[async_trait(?Send)]
impl WeatherService for FakeWeather {
    async fn current(&self, _city: &str) -> Result<Option<WeatherReport>> {
        Ok(self.0.clone())
    }
}

pub struct FakeEncyclopedia(pub Summary);

#[async_trait(?Send)]
impl Encyclopedia for FakeEncyclopedia {
    async fn summary(&self, _topic: &str) -> Result<Summary> {
        Ok(self.0.clone())
    }
}

pub struct FakeSpeed;

#[async_trait(?Send)]
impl SpeedTester for FakeSpeed {
    async fn measure(&self) -> Result<SpeedReport> {
        Ok(SpeedReport {
            download_mbps: 94.5,
            upload_mbps: 12.25,
        })
    }
}

/// Mailer recording every message
#[derive(Clone, Default)]
pub struct FakeMailer {
    pub sent: Rc<RefCell<Vec<OutgoingEmail>>>,
}

#[async_trait(?Send)]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        self.sent.borrow_mut().push(email.clone());
        Ok(())
    }
}

/// Launcher recording URLs, paths and programs
#[derive(Clone, Default)]
pub struct FakeLauncher {
    pub opened: Rc<RefCell<Vec<String>>>,
}

#[async_trait(?Send)]
impl Launcher for FakeLauncher {
    async fn open_url(&self, url: &str) -> Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }

    async fn open_path(&self, path: &Path) -> Result<()> {
        self.opened.borrow_mut().push(path.display().to_string());
        Ok(())
    }

    async fn launch_app(&self, program: &str) -> Result<()> {
        self.opened.borrow_mut().push(program.to_string());
        Ok(())
    }
}

/// Screen capture writing an empty file
pub struct FakeScreen;

#[async_trait(?Send)]
impl ScreenCapture for FakeScreen {
    async fn capture(&self, path: &Path) -> Result<()> {
        std::fs::write(path, b"")?;
        Ok(())
    }
}

pub struct FakeSystem;

#[async_trait(?Send)]
impl SystemProbe for FakeSystem {
    async fn snapshot(&self) -> Result<SystemReport> {
        Ok(SystemReport {
            os: "Linux".to_string(),
            release: "6.1".to_string(),
            host: "desk".to_string(),
            processor: "Test CPU".to_string(),
            cpu_usage: 12.5,
            battery: None,
        })
    }
}

/// Generator with a fixed reply
pub struct FakeGenerator(pub String);

#[async_trait(?Send)]
impl Generator for FakeGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Collaborators with every optional service present
#[must_use]
pub fn test_services(launcher: &FakeLauncher, mailer: &FakeMailer) -> Services {
    Services {
        weather: Some(Box::new(FakeWeather(Some(WeatherReport {
            temperature: 21.5,
            description: "clear sky".to_string(),
            humidity: 40,
            wind_speed: 3.2,
        })))),
        news: Some(Box::new(FakeNews(
            (1..=8).map(|i| format!("Headline {i}")).collect(),
        ))),
        encyclopedia: Box::new(FakeEncyclopedia(Summary::Article(
            "Rust is a systems programming language.".to_string(),
        ))),
        speed: Box::new(FakeSpeed),
        mailer: Some(Box::new(mailer.clone())),
        launcher: Box::new(launcher.clone()),
        screen: Box::new(FakeScreen),
        system: Box::new(FakeSystem),
    }
}

/// A text-mode assistant wired to fakes, writing under a temp directory
pub struct Session {
    pub assistant: Assistant,
    pub spoken: Rc<RefCell<Vec<String>>>,
    pub beeps: Rc<Cell<usize>>,
    pub launcher: FakeLauncher,
    pub mailer: FakeMailer,
    pub dir: TempDir,
}

impl Session {
    /// Session typing `lines` in order
    pub fn typed(lines: &[&str]) -> Self {
        Self::build(lines, None, |_| {})
    }

    /// Session with a generative reply and adjusted services
    pub fn build(
        lines: &[&str],
        generated: Option<&str>,
        adjust: impl FnOnce(&mut Services),
    ) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");

        let mut config = Config::default();
        config.voice.enabled = false;
        config.paths = PathsConfig::under(dir.path());

        let launcher = FakeLauncher::default();
        let mailer = FakeMailer::default();
        let mut services = test_services(&launcher, &mailer);
        adjust(&mut services);

        let speaker = RecordingSpeaker::default();
        let spoken = Rc::clone(&speaker.spoken);
        let beeps = Rc::clone(&speaker.beeps);

        let input = InputAdapter::new(
            None,
            Box::new(ScriptedText::new(lines)),
            config.wake_word.clone(),
            config.voice.max_attempts,
        );

        let chat = ConversationalFallback::new(
            generated.map(|reply| Box::new(FakeGenerator(reply.to_string())) as Box<dyn Generator>),
            generated.is_some(),
            StaticResponses::built_in(),
            Duration::from_secs(1),
        );

        let ctx = Context {
            config,
            input,
            speaker: Box::new(speaker),
            services,
            clock: Box::new(FakeClock::at(fixed_now())),
        };

        Self {
            assistant: Assistant::new(ctx, Router::new(), TaskRegistry::standard(), chat),
            spoken,
            beeps,
            launcher,
            mailer,
            dir,
        }
    }

    /// Everything spoken so far
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.borrow().clone()
    }

    /// Everything opened through the launcher so far
    pub fn opened(&self) -> Vec<String> {
        self.launcher.opened.borrow().clone()
    }
}
