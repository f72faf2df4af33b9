//! Screenshots via whichever capture tool is installed

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::run_program;
use crate::{Error, Result};

/// Captures the whole screen to a PNG file
#[async_trait(?Send)]
pub trait ScreenCapture {
    /// Write a screenshot to `path`
    async fn capture(&self, path: &Path) -> Result<()>;
}

/// Candidate tools in preference order, with arguments preceding the path
const TOOLS: &[(&str, &[&str])] = &[
    ("screencapture", &["-x"]),
    ("grim", &[]),
    ("gnome-screenshot", &["-f"]),
    ("spectacle", &["-b", "-n", "-o"]),
    ("scrot", &["-o"]),
    ("import", &["-window", "root"]),
];

/// Screenshot through an external command
#[derive(Debug, Clone)]
pub struct ScreenshotTool {
    timeout: Duration,
}

impl ScreenshotTool {
    /// Create a capturer; `timeout` bounds the tool's run
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait(?Send)]
impl ScreenCapture for ScreenshotTool {
    async fn capture(&self, path: &Path) -> Result<()> {
        let (tool, args) = TOOLS
            .iter()
            .find(|(tool, _)| which::which(tool).is_ok())
            .ok_or_else(|| Error::Launch("no screenshot tool installed".to_string()))?;

        let target = path
            .to_str()
            .ok_or_else(|| Error::Launch(format!("non-UTF-8 path {}", path.display())))?;
        let mut argv: Vec<&str> = args.to_vec();
        argv.push(target);

        tracing::debug!(tool, path = %path.display(), "taking screenshot");
        run_program(tool, &argv, self.timeout).await?;

        if !path.exists() {
            return Err(Error::Launch(format!("{tool} did not write {}", path.display())));
        }
        Ok(())
    }
}
