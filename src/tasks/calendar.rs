//! Month calendar display

use async_trait::async_trait;

use super::Task;
use crate::Result;
use crate::assistant::Context;
use crate::dates::{extract_number, month_name, parse_month, render_month};

/// Prints a month grid
pub struct Calendar;

#[async_trait(?Send)]
impl Task for Calendar {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let year = ctx.ask("Please tell me the year you want to view.").await;
        let month = ctx
            .ask("Now, please tell me the month you want to view.")
            .await;

        let year = extract_number(&year)
            .and_then(|y| i32::try_from(y).ok())
            .filter(|y| (1..=9999).contains(y));
        let month = parse_month(&month);

        let rendered = year.zip(month).and_then(|(y, m)| {
            Some((y, month_name(m)?, render_month(y, m)?))
        });

        match rendered {
            Some((year, name, grid)) => {
                ctx.say(&format!("Here is the calendar for {name} {year}."))
                    .await;
                println!("{grid}");
            }
            None => {
                ctx.say("Sorry, I couldn't fetch the calendar.").await;
            }
        }
        Ok(())
    }
}
