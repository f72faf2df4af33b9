//! Current time of day

use async_trait::async_trait;

use super::Task;
use crate::Result;
use crate::assistant::Context;

/// Speaks the current local time
pub struct CurrentTime;

#[async_trait(?Send)]
impl Task for CurrentTime {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let now = ctx.clock.now();
        ctx.say(&format!("The current time is {}", now.format("%I:%M %p")))
            .await;
        Ok(())
    }
}
