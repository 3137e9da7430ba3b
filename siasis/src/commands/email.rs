use anyhow::ensure;
use clap::Subcommand;
use siasis_config::Config;
use siasis_email_contracts::{Email, EmailBody, EmailService};
use siasis_models::email_address::EmailAddressWithName;
use tracing::info;

use crate::email::MailSettings;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test {
        /// Defaults to the configured notification recipient
        recipient: Option<EmailAddressWithName>,
    },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: Option<EmailAddressWithName>) -> anyhow::Result<()> {
    let settings = MailSettings::from_config(config.notification)?;
    let email_service = settings.connect().await?;
    email_service.ping().await?;

    let recipient = recipient.unwrap_or(settings.recipient);
    info!(%recipient, "Sending test email");

    let ok = email_service
        .send(Email {
            recipient,
            subject: "Prueba de envío de correo".into(),
            body: EmailBody::Text(
                "El envío de correos de SIASIS parece estar funcionando.".into(),
            ),
            reply_to: None,
        })
        .await?;

    ensure!(ok, "Failed to send email");

    Ok(())
}
