//! SMTP delivery for verification-code email.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::kernel::traits::BaseMailer;

/// Mailer backed by an authenticated SMTP relay.
///
/// The configured username doubles as the From address.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, username: &str, password: &str) -> Result<Self> {
        let from = username
            .parse::<Mailbox>()
            .context("EMAIL_USER is not a valid mailbox address")?;
        let credentials = Credentials::new(username.to_owned(), password.to_owned());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .context("failed to configure SMTP relay")?
            .credentials(credentials)
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl BaseMailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse::<Mailbox>()
                .context("invalid recipient address")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_owned())
            .context("failed to build email")?;

        self.transport
            .send(message)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }
}
