use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{error, info};

use crate::{
    abstract_trait::{EmailMessage, MailerTrait},
    config::SmtpConfig,
    utils::AppError,
};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| AppError::InternalError(format!("Invalid SMTP_FROM: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::InternalError(format!("Invalid SMTP relay: {e}")))?
            .port(config.port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailerTrait for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::BadRequest(format!("Invalid recipient address: {e}")))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| AppError::InternalError(format!("Failed to build email: {e}")))?;

        match self.transport.send(email).await {
            Ok(_) => {
                info!("Sent '{}' to {}", message.subject, message.to);
                Ok(())
            }
            Err(e) => {
                error!("SMTP delivery to {} failed: {e}", message.to);
                Err(AppError::UpstreamError(format!("SMTP delivery failed: {e}")))
            }
        }
    }
}

/// Stands in for SMTP when it is not configured; the message goes to the log.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl MailerTrait for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "SMTP not configured, email not sent:\n{}",
            message.html
        );
        Ok(())
    }
}

pub mod templates {
    use crate::abstract_trait::EmailMessage;

    fn layout(title: &str, body: &str) -> String {
        format!(
            "<!doctype html><html><body style=\"font-family:sans-serif;color:#1f2937\">\
             <h2 style=\"color:#0f766e\">{title}</h2>{body}\
             <p style=\"color:#6b7280;font-size:12px\">Home Sweet Loan</p></body></html>"
        )
    }

    pub fn welcome(to: &str, name: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Welcome to Home Sweet Loan".to_string(),
            html: layout(
                &format!("Hi {name}, welcome aboard!"),
                "<p>Start by setting up your categories, then plan your first monthly budget.</p>",
            ),
        }
    }

    pub fn password_reset(to: &str, name: &str, link: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Reset your Home Sweet Loan password".to_string(),
            html: layout(
                "Password reset",
                &format!(
                    "<p>Hi {name}, we received a request to reset your password.</p>\
                     <p><a href=\"{link}\">Choose a new password</a></p>\
                     <p>This link expires in one hour. If you did not ask for it, ignore this email.</p>"
                ),
            ),
        }
    }

    pub fn payment_receipt(
        to: &str,
        name: &str,
        order_id: &str,
        plan_name: &str,
        amount: i64,
        expires_at: &str,
    ) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: format!("Payment received for order {order_id}"),
            html: layout(
                "Thank you for your payment",
                &format!(
                    "<p>Hi {name}, your payment of IDR {amount} for <b>{plan_name}</b> was successful.</p>\
                     <p>Order: {order_id}<br/>Premium active until: {expires_at}</p>"
                ),
            ),
        }
    }

    pub fn member_invitation(to: &str, inviter: &str, group_name: &str, link: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: format!("{inviter} invited you to {group_name}"),
            html: layout(
                "You have been invited",
                &format!(
                    "<p>{inviter} invited you to join <b>{group_name}</b> on Home Sweet Loan.</p>\
                     <p><a href=\"{link}\">Review the invitation</a></p>"
                ),
            ),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn reset_email_contains_link() {
            let email = password_reset(
                "a@b.id",
                "Ayu",
                "http://localhost:3000/reset-password?token=abc",
            );

            assert_eq!(email.to, "a@b.id");
            assert!(email.html.contains("reset-password?token=abc"));
        }
    }
}
