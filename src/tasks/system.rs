//! Spoken host and CPU report

use async_trait::async_trait;

use super::Task;
use crate::Result;
use crate::assistant::Context;
use crate::services;

/// Describes the host machine
pub struct SystemInfo;

#[async_trait(?Send)]
impl Task for SystemInfo {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        ctx.say("Let me gather some details about your system...")
            .await;
        let report = services::call(
            "system info",
            ctx.config.timeouts.http,
            ctx.services.system.snapshot(),
        )
        .await?;
        ctx.say(&report.describe()).await;
        Ok(())
    }
}
