//! Blocking alarm and study timer

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveTime, Timelike};

use super::Task;
use crate::Result;
use crate::assistant::Context;
use crate::dates::extract_number;

/// How often the alarm checks the clock
pub const ALARM_POLL: Duration = Duration::from_secs(10);

/// Tone length for alarms and timers
const BEEP_MS: u64 = 1000;

/// Waits for a typed `HH:MM` and then wakes the user
pub struct SetAlarm;

#[async_trait(?Send)]
impl Task for SetAlarm {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        ctx.say("Please type the time to set the alarm, in HH:MM format.")
            .await;
        let typed = ctx.type_line("Enter alarm time (HH:MM): ");

        let Ok(alarm) = NaiveTime::parse_from_str(&typed, "%H:%M") else {
            ctx.say("Invalid time format. Please try again in HH:MM format.")
                .await;
            return Ok(());
        };

        ctx.say(&format!("Alarm is set for {typed}")).await;

        loop {
            let now = ctx.clock.now();
            if now.hour() == alarm.hour() && now.minute() == alarm.minute() {
                break;
            }
            ctx.clock.sleep(ALARM_POLL).await;
        }

        ctx.say("Wake up! Time to get up!").await;
        ctx.speaker.beep(1000, BEEP_MS).await;
        Ok(())
    }
}

/// A study period followed by a break
pub struct StudyTimer;

#[async_trait(?Send)]
impl Task for StudyTimer {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let answer = ctx.ask("How many minutes would you like to study?").await;
        let Some(study) = extract_number(&answer) else {
            ctx.say("I couldn't understand the study time. Please say it again.")
                .await;
            return Ok(());
        };

        let answer = ctx
            .ask("How many minutes of break would you like to take?")
            .await;
        let Some(rest) = extract_number(&answer) else {
            ctx.say("I couldn't understand the break time. Please say it again.")
                .await;
            return Ok(());
        };

        ctx.say(&format!("Starting study timer for {study} minutes."))
            .await;
        ctx.clock.sleep(minutes(study)).await;
        ctx.say("Time's up! Take a break.").await;
        ctx.speaker.beep(1000, BEEP_MS).await;

        ctx.say(&format!("Starting break time for {rest} minutes."))
            .await;
        ctx.clock.sleep(minutes(rest)).await;
        ctx.speaker.beep(800, BEEP_MS).await;
        ctx.say("Break time is over. Let's get back to studying!")
            .await;
        Ok(())
    }
}

const fn minutes(n: u64) -> Duration {
    Duration::from_secs(n.saturating_mul(60))
}
