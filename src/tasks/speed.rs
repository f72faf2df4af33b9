//! Internet speed test

use async_trait::async_trait;

use super::Task;
use crate::Result;
use crate::assistant::Context;
use crate::services;

/// Measures download and upload throughput
pub struct SpeedTest;

#[async_trait(?Send)]
impl Task for SpeedTest {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        ctx.say("Testing your internet speed. This may take a moment.")
            .await;
        let measured = services::call(
            "speed test",
            ctx.config.timeouts.speed_test,
            ctx.services.speed.measure(),
        )
        .await;

        match measured {
            Ok(report) => {
                ctx.say(&format!(
                    "Your download speed is {:.2} Mbps and your upload speed is {:.2} Mbps.",
                    report.download_mbps, report.upload_mbps
                ))
                .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "speed test failed");
                ctx.say("Sorry, I couldn't measure your internet speed.")
                    .await;
            }
        }
        Ok(())
    }
}
