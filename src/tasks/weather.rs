//! Current weather conditions

use async_trait::async_trait;

use super::Task;
use crate::Result;
use crate::assistant::Context;
use crate::services;

/// Current conditions for a spoken city
pub struct Weather;

#[async_trait(?Send)]
impl Task for Weather {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let Some(weather) = ctx.services.weather.take() else {
            ctx.say("Weather API key not configured. Please add OPENWEATHER_API_KEY to your .env file.")
                .await;
            return Ok(());
        };

        let city = ctx.ask("Which city's weather would you like to know?").await;
        let report = if city.is_empty() {
            None
        } else {
            Some(services::call("weather", ctx.config.timeouts.http, weather.current(&city)).await)
        };
        ctx.services.weather = Some(weather);

        let Some(report) = report else {
            ctx.say("I didn't catch the city name.").await;
            return Ok(());
        };
        let report = report?;

        let reply = match report {
            Some(r) => format!(
                "The temperature in {city} is {:.1}°C with {}. Humidity is at {}% and wind speed is {} m/s.",
                r.temperature, r.description, r.humidity, r.wind_speed
            ),
            None => format!("Sorry, I couldn't find weather information for {city}."),
        };
        ctx.say(&reply).await;
        Ok(())
    }
}
