//! Meeting scheduling into the meetings file

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeDelta};

use super::files::append;
use super::{Task, is_yes};
use crate::Result;
use crate::assistant::Context;
use crate::dates::{RECORD_FORMAT, extract_number, parse_datetime};

/// A meeting as written to the meetings file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRecord {
    pub title: String,
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
    pub end: NaiveDateTime,
    pub reminder: Option<NaiveDateTime>,
}

impl MeetingRecord {
    /// The block appended to the meetings file, including the blank line
    #[must_use]
    pub fn render(&self) -> String {
        let mut block = format!(
            "Meeting: {}\nDate and Time: {}\nDuration: {} minutes\nEnd Time: {}\n",
            self.title,
            self.start.format(RECORD_FORMAT),
            self.duration_minutes,
            self.end.format(RECORD_FORMAT),
        );
        if let Some(reminder) = self.reminder {
            block.push_str("Reminder Time: ");
            block.push_str(&reminder.format(RECORD_FORMAT).to_string());
            block.push('\n');
        }
        block.push('\n');
        block
    }
}

/// Records a meeting with an optional reminder
pub struct ScheduleMeeting;

#[async_trait(?Send)]
impl Task for ScheduleMeeting {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let title = ctx.ask("Please tell me the meeting title.").await;
        let when = ctx
            .ask("When is the meeting? Please specify the date and time.")
            .await;
        let duration = ctx.ask("How long is the meeting in minutes?").await;

        let start = match parse_datetime(&when, ctx.clock.now()) {
            Ok(start) => start,
            Err(e) => {
                tracing::debug!(error = %e, "meeting time rejected");
                ctx.say("I couldn't understand the date and time. Please try again.")
                    .await;
                return Ok(());
            }
        };

        let Some((duration_minutes, end)) = extract_number(&duration)
            .and_then(|n| i64::try_from(n).ok())
            .and_then(|minutes| Some((minutes, offset(start, minutes, true)?)))
        else {
            ctx.say("I couldn't understand the meeting duration. Please try again.")
                .await;
            return Ok(());
        };

        let answer = ctx
            .ask("Do you want to set a reminder for this meeting? Say 'yes' or 'no'.")
            .await;
        let reminder = if is_yes(&answer) {
            let lead = ctx
                .ask("How many minutes before the meeting do you want the reminder?")
                .await;
            let Some((minutes, reminder)) = extract_number(&lead)
                .and_then(|n| i64::try_from(n).ok())
                .and_then(|minutes| Some((minutes, offset(start, minutes, false)?)))
            else {
                ctx.say("I couldn't understand the reminder time. Please try again.")
                    .await;
                return Ok(());
            };
            ctx.say(&format!(
                "Reminder set for {minutes} minutes before the meeting."
            ))
            .await;
            Some(reminder)
        } else {
            None
        };

        let record = MeetingRecord {
            title,
            start,
            duration_minutes,
            end,
            reminder,
        };
        append(&ctx.config.paths.meetings_file, &record.render())?;
        tracing::info!(title = %record.title, start = %record.start, "meeting scheduled");

        ctx.say(&format!(
            "Meeting titled '{}' has been scheduled for {}.",
            record.title,
            record.start.format(RECORD_FORMAT)
        ))
        .await;
        Ok(())
    }
}

/// `start` moved `minutes` later (or earlier); `None` when out of range
fn offset(start: NaiveDateTime, minutes: i64, later: bool) -> Option<NaiveDateTime> {
    let delta = TimeDelta::try_minutes(minutes)?;
    if later {
        start.checked_add_signed(delta)
    } else {
        start.checked_sub_signed(delta)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_render_with_reminder() {
        let start = NaiveDate::from_ymd_opt(2024, 10, 12)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let record = MeetingRecord {
            title: "standup".to_string(),
            start,
            duration_minutes: 15,
            end: offset(start, 15, true).unwrap(),
            reminder: offset(start, 10, false),
        };
        assert_eq!(
            record.render(),
            "Meeting: standup\nDate and Time: 2024-10-12 09:00\nDuration: 15 minutes\nEnd Time: 2024-10-12 09:15\nReminder Time: 2024-10-12 08:50\n\n"
        );
    }

    #[test]
    fn test_render_without_reminder() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let record = MeetingRecord {
            title: "review".to_string(),
            start,
            duration_minutes: 60,
            end: offset(start, 60, true).unwrap(),
            reminder: None,
        };
        let block = record.render();
        assert!(block.contains("End Time: 2025-01-01 00:30\n"));
        assert!(!block.contains("Reminder"));
        assert!(block.ends_with("\n\n"));
    }

    #[test]
    fn test_offset_out_of_range() {
        let start = NaiveDate::from_ymd_opt(2024, 10, 12)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(offset(start, 9_999_999_999_999, true), None);
        assert_eq!(offset(start, i64::MAX, false), None);
        assert!(offset(start, 30, true).is_some());
    }
}
