//! External collaborators
//!
//! Every service sits behind a trait so tasks can be exercised with fakes,
//! and every call is bounded by [`call`].

pub mod clock;
pub mod encyclopedia;
pub mod launcher;
pub mod mail;
pub mod news;
pub mod screen;
pub mod speedtest;
pub mod system;
pub mod weather;

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

pub use clock::{Clock, SystemClock};
pub use encyclopedia::{Encyclopedia, Summary, Wikipedia};
pub use launcher::{Launcher, SystemLauncher};
pub use mail::{Mailer, OutgoingEmail, SmtpMailer};
pub use news::{NewsApi, NewsService};
pub use screen::{ScreenCapture, ScreenshotTool};
pub use speedtest::{CloudflareSpeedTest, SpeedReport, SpeedTester};
pub use system::{SystemProbe, SystemReport, SysinfoProbe};
pub use weather::{OpenWeatherMap, WeatherReport, WeatherService};

use crate::config::Config;
use crate::{Error, Result};

/// Await `fut`, failing with [`Error::Timeout`] after `limit`
///
/// # Errors
///
/// Returns the future's own error, or a timeout naming `service`
pub async fn call<T, F>(service: &'static str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(service, ?limit, "collaborator timed out");
            Err(Error::Timeout {
                service,
                after: limit,
            })
        }
    }
}

/// HTTP client with a request timeout
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialized
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("elsa/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Run a program to completion, returning its stdout
///
/// # Errors
///
/// Returns [`Error::Launch`] if the program cannot be spawned, exits with
/// failure, or outlives `limit`
pub(crate) async fn run_program(program: &str, args: &[&str], limit: Duration) -> Result<String> {
    let child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::Launch(format!("failed to start {program}: {e}")))?;

    let output = tokio::time::timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| Error::Launch(format!("{program} timed out after {limit:?}")))?
        .map_err(|e| Error::Launch(format!("{program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Launch(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Start a program without waiting for it
///
/// # Errors
///
/// Returns [`Error::Launch`] if the program cannot be spawned
pub(crate) fn spawn_detached(program: &str, args: &[&str]) -> Result<()> {
    std::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|e| Error::Launch(format!("failed to start {program}: {e}")))
}

/// The collaborators available to task handlers
///
/// Optional services are `None` when their credentials are missing; the
/// matching task speaks a configuration notice instead of running.
pub struct Services {
    pub weather: Option<Box<dyn WeatherService>>,
    pub news: Option<Box<dyn NewsService>>,
    pub encyclopedia: Box<dyn Encyclopedia>,
    pub speed: Box<dyn SpeedTester>,
    pub mailer: Option<Box<dyn Mailer>>,
    pub launcher: Box<dyn Launcher>,
    pub screen: Box<dyn ScreenCapture>,
    pub system: Box<dyn SystemProbe>,
}

impl Services {
    /// Real collaborators built from configuration
    ///
    /// A mail transport that cannot be built disables only the email task.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let t = &config.timeouts;
        let client = http_client(t.http)?;

        let weather: Option<Box<dyn WeatherService>> = config
            .api_keys
            .openweather
            .clone()
            .map(|key| Box::new(OpenWeatherMap::new(client.clone(), key)) as Box<dyn WeatherService>);

        let news: Option<Box<dyn NewsService>> = config.api_keys.news.clone().map(|key| {
            Box::new(NewsApi::new(client.clone(), key, config.news.country.clone()))
                as Box<dyn NewsService>
        });

        let mailer: Option<Box<dyn Mailer>> = config
            .email
            .as_ref()
            .and_then(|email| optional("email", SmtpMailer::new(email, t.email)))
            .map(|mailer| Box::new(mailer) as Box<dyn Mailer>);

        Ok(Self {
            weather,
            news,
            encyclopedia: Box::new(Wikipedia::new(client)),
            speed: Box::new(CloudflareSpeedTest::new(http_client(t.speed_test)?)),
            mailer,
            launcher: Box::new(SystemLauncher::new(t.launch)),
            screen: Box::new(ScreenshotTool::new(t.launch)),
            system: Box::new(SysinfoProbe),
        })
    }
}

/// Keep a collaborator that failed to build out of the session
fn optional<T>(service: &'static str, built: Result<T>) -> Option<T> {
    built
        .inspect_err(|e| tracing::warn!(service, error = %e, "collaborator unavailable, task disabled"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailConfig;

    #[test]
    fn test_failed_collaborator_is_dropped() {
        let failed: Result<u8> = Err(Error::Email("invalid smtp host".to_string()));
        assert!(optional("email", failed).is_none());
        assert_eq!(optional("email", Ok(3)), Some(3));
    }

    #[tokio::test]
    async fn test_bad_mail_settings_do_not_fail_startup() {
        let mut config = Config::default();
        config.email = Some(EmailConfig {
            address: "me@example.com".to_string(),
            password: "secret".to_string(),
            smtp_host: String::new(),
            smtp_port: 465,
        });

        let services = Services::from_config(&config).unwrap();
        assert!(services.weather.is_none());
        assert!(services.news.is_none());
    }

    #[tokio::test]
    async fn test_call_passes_result_through() {
        let value = call("test", Duration::from_secs(1), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_times_out() {
        let result: Result<()> = call("slow", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(
            result,
            Err(Error::Timeout {
                service: "slow",
                ..
            })
        ));
    }
}
