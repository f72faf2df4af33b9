//! Random jokes

use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::Task;
use crate::Result;
use crate::assistant::Context;

/// Jokes told on request
pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people in the world: those who understand binary and those who don't.",
    "A SQL query walks into a bar, goes up to two tables and asks: can I join you?",
    "Why did the developer go broke? Because they used up all their cache.",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "Why do Java developers wear glasses? Because they don't C sharp.",
    "To understand recursion, you must first understand recursion.",
    "The best thing about a boolean is that even if you are wrong, you are only off by a bit.",
    "Knock knock. Race condition. Who's there?",
    "I told my computer I needed a break, and it said no problem, it would go to sleep.",
];

/// Tells a random joke
pub struct Joke;

#[async_trait(?Send)]
impl Task for Joke {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let joke = JOKES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("I'm all out of jokes.");
        ctx.say(joke).await;
        Ok(())
    }
}
