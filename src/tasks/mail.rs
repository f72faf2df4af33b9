//! Email composed by voice and sent over SMTP

use async_trait::async_trait;

use super::Task;
use crate::Result;
use crate::assistant::Context;
use crate::services::{self, Mailer, OutgoingEmail, mail::is_valid_email};

/// Typed recipient attempts before giving up
const RECIPIENT_ATTEMPTS: usize = 3;

/// Composes and sends an email
pub struct SendEmail;

#[async_trait(?Send)]
impl Task for SendEmail {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let Some(mailer) = ctx.services.mailer.take() else {
            ctx.say("Email credentials not configured. Please add EMAIL_ADDRESS and EMAIL_PASSWORD to your .env file.")
                .await;
            return Ok(());
        };
        let sent = compose_and_send(ctx, mailer.as_ref()).await;
        ctx.services.mailer = Some(mailer);

        match sent {
            None => {}
            Some(Ok(())) => ctx.say("Email has been sent successfully.").await,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "email failed");
                ctx.say("Sorry, I couldn't send the email.").await;
            }
        }
        Ok(())
    }
}

/// Prompt for recipient, subject and body, then send; `None` when cancelled
async fn compose_and_send(ctx: &mut Context, mailer: &dyn Mailer) -> Option<Result<()>> {
    // Typed for accuracy
    let mut recipient = None;
    for _ in 0..RECIPIENT_ATTEMPTS {
        ctx.say("Please type the recipient's email address.").await;
        let typed = ctx.type_line("Enter recipient's email: ");
        if is_valid_email(&typed) {
            recipient = Some(typed);
            break;
        }
        if ctx.input.is_closed() {
            return None;
        }
        ctx.say("That doesn't seem to be a valid email address. Please try again.")
            .await;
    }
    let Some(to) = recipient else {
        ctx.say("I couldn't get a valid email address, so I cancelled the email.")
            .await;
        return None;
    };

    let subject = ctx.ask("What would you like the subject to be?").await;
    let body = ctx.ask("What should I include in the email body?").await;
    let email = OutgoingEmail { to, subject, body };

    Some(services::call("email", ctx.config.timeouts.email, mailer.send(&email)).await)
}
