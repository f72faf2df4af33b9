//! Opening URLs, files and programs with the desktop's handlers

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::{run_program, spawn_detached};
use crate::{Error, Result};

/// Hands things to the desktop environment
#[async_trait(?Send)]
pub trait Launcher {
    /// Open a URL in the default browser
    async fn open_url(&self, url: &str) -> Result<()>;

    /// Open a file with its default application
    async fn open_path(&self, path: &Path) -> Result<()>;

    /// Start a program by name or path
    async fn launch_app(&self, program: &str) -> Result<()>;
}

/// Launcher using the platform opener (`xdg-open`, `open`, `start`)
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    timeout: Duration,
}

impl SystemLauncher {
    /// Create a launcher; `timeout` bounds the opener command
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn open(&self, target: &str) -> Result<()> {
        tracing::debug!(target, "opening");
        if cfg!(target_os = "windows") {
            run_program("cmd", &["/C", "start", "", target], self.timeout).await?;
        } else if cfg!(target_os = "macos") {
            run_program("open", &[target], self.timeout).await?;
        } else {
            let opener = ["xdg-open", "gio", "sensible-browser"]
                .into_iter()
                .find(|p| which::which(p).is_ok())
                .ok_or_else(|| Error::Launch("no desktop opener found (install xdg-utils)".to_string()))?;
            if opener == "gio" {
                run_program(opener, &["open", target], self.timeout).await?;
            } else {
                run_program(opener, &[target], self.timeout).await?;
            }
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl Launcher for SystemLauncher {
    async fn open_url(&self, url: &str) -> Result<()> {
        self.open(url).await
    }

    async fn open_path(&self, path: &Path) -> Result<()> {
        let target = path
            .to_str()
            .ok_or_else(|| Error::Launch(format!("non-UTF-8 path {}", path.display())))?;
        self.open(target).await
    }

    async fn launch_app(&self, program: &str) -> Result<()> {
        tracing::debug!(program, "launching");
        if cfg!(target_os = "macos") && !program.starts_with('/') {
            return run_program("open", &["-a", program], self.timeout).await.map(|_| ());
        }
        if cfg!(target_os = "windows") {
            return run_program("cmd", &["/C", "start", "", program], self.timeout)
                .await
                .map(|_| ());
        }
        let resolved = which::which(program)
            .map_err(|e| Error::Launch(format!("{program} not found: {e}")))?;
        spawn_detached(&resolved.to_string_lossy(), &[])
    }
}

/// Google search URL for a query
#[must_use]
pub fn google_search_url(query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(query.trim())
    )
}

/// Google Maps URL for a place
#[must_use]
pub fn maps_url(place: &str) -> String {
    format!(
        "https://www.google.com/maps/place/{}",
        urlencoding::encode(place.trim())
    )
}

/// Indeed listing URL for a job type and location
#[must_use]
pub fn indeed_url(job: &str, location: &str) -> String {
    let slug = |s: &str| {
        s.split_whitespace()
            .map(|w| urlencoding::encode(w).into_owned())
            .collect::<Vec<_>>()
            .join("-")
    };
    format!(
        "https://www.indeed.com/q-{}-l-{}-jobs.html",
        slug(job),
        slug(location)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            google_search_url("rust async book"),
            "https://www.google.com/search?q=rust%20async%20book"
        );
        assert_eq!(
            maps_url("Eiffel Tower"),
            "https://www.google.com/maps/place/Eiffel%20Tower"
        );
        assert_eq!(
            indeed_url("data analyst", "new york"),
            "https://www.indeed.com/q-data-analyst-l-new-york-jobs.html"
        );
    }
}
