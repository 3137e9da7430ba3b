use anyhow::anyhow;
use lettre::{
    message::{header::ContentType, MessageBuilder, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use siasis_email_contracts::{Email, EmailBody, EmailService};
use siasis_models::{email_address::EmailAddressWithName, Sensitive};
use siasis_utils::Apply;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: Sensitive<String>,
}

impl EmailServiceImpl {
    pub async fn new(
        url: &str,
        credentials: Option<SmtpCredentials>,
        from: EmailAddressWithName,
    ) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?
            .apply_map(credentials, |builder, SmtpCredentials { username, password }| {
                builder.credentials(Credentials::new(username, password.0))
            })
            .build();

        Ok(Self { from, transport })
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let builder = Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
            .subject(email.subject);

        let message = match email.body {
            EmailBody::Text(text) => builder.header(ContentType::TEXT_PLAIN).body(text)?,
            EmailBody::Alternative { text, html } => {
                builder.multipart(MultiPart::alternative_plain_html(text, html))?
            }
        };

        Ok(message)
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = self.build_message(email)?;

        let response = self.transport.send(message).await?;
        debug!(code = %response.code(), "smtp server responded");

        Ok(response.is_positive())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_sut() -> EmailServiceImpl {
        EmailServiceImpl::new(
            "smtp://localhost:2525",
            Some(SmtpCredentials {
                username: "solicitudes@siasis.edu.pe".into(),
                password: "app-password".to_owned().into(),
            }),
            "SIASIS <solicitudes@siasis.edu.pe>".parse().unwrap(),
        )
        .await
        .unwrap()
    }

    fn formatted(message: Message) -> String {
        String::from_utf8(message.formatted()).unwrap()
    }

    #[tokio::test]
    async fn alternative_with_reply_to() {
        // Arrange
        let sut = make_sut().await;

        // Act
        let message = sut
            .build_message(Email {
                recipient: "ventas@siasis.edu.pe".parse().unwrap(),
                subject: "New lead".into(),
                body: EmailBody::Alternative {
                    text: "plain body".into(),
                    html: "<p>html body</p>".into(),
                },
                reply_to: Some("lead@example.com".parse().unwrap()),
            })
            .unwrap();

        // Assert
        let source = formatted(message);
        assert!(source.contains("To: ventas@siasis.edu.pe"));
        assert!(source.contains("Reply-To: lead@example.com"));
        assert!(source.contains("Subject: New lead"));
        assert!(source.contains("multipart/alternative"));
        assert!(source.contains("plain body"));
        assert!(source.contains("<p>html body</p>"));
    }

    #[tokio::test]
    async fn text_without_reply_to() {
        let sut = make_sut().await;

        let message = sut
            .build_message(Email {
                recipient: "ventas@siasis.edu.pe".parse().unwrap(),
                subject: "Email Deliverability Test".into(),
                body: EmailBody::Text("It works".into()),
                reply_to: None,
            })
            .unwrap();

        let source = formatted(message);
        assert!(!source.contains("Reply-To"));
        assert!(source.contains("text/plain"));
    }
}
