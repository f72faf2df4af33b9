//! Wall clock and sleeping

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

/// Source of local time and delays
#[async_trait(?Send)]
pub trait Clock {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;

    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// The real local clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait(?Send)]
impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
