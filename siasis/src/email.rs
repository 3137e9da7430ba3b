use anyhow::{bail, Context};
use siasis_config::NotificationConfig;
use siasis_email_impl::{EmailServiceImpl, SmtpCredentials};
use siasis_models::email_address::{EmailAddress, EmailAddressWithName};
use tracing::info;

const USERNAME_ENV: &str = "SIASIS_NOTIFICATION__USERNAME";
const PASSWORD_ENV: &str = "SIASIS_NOTIFICATION__PASSWORD";
const RECIPIENT_ENV: &str = "SIASIS_NOTIFICATION__RECIPIENT";

/// Mail settings for notifications, checked before anything is sent.
#[derive(Debug)]
pub struct MailSettings {
    pub smtp_url: String,
    pub from: EmailAddressWithName,
    pub credentials: SmtpCredentials,
    pub recipient: EmailAddressWithName,
}

impl MailSettings {
    /// Fails listing every missing key if the username, password or
    /// recipient is absent or empty.
    pub fn from_config(config: NotificationConfig) -> anyhow::Result<Self> {
        let username = config.username.filter(|username| !username.is_empty());
        let password = config.password.filter(|password| !password.is_empty());
        let recipient = config.recipient.filter(|recipient| !recipient.is_empty());

        let missing = [
            (username.is_none(), USERNAME_ENV),
            (password.is_none(), PASSWORD_ENV),
            (recipient.is_none(), RECIPIENT_ENV),
        ]
        .into_iter()
        .filter_map(|(missing, key)| missing.then_some(key))
        .collect::<Vec<_>>();

        let (Some(username), Some(password), Some(recipient)) = (username, password, recipient)
        else {
            bail!("Missing mail configuration: {}", missing.join(", "));
        };

        let from = username
            .parse::<EmailAddress>()
            .with_context(|| format!("Invalid {USERNAME_ENV}: {username:?}"))?
            .with_name(config.sender_name);
        let recipient = recipient
            .parse::<EmailAddressWithName>()
            .with_context(|| format!("Invalid {RECIPIENT_ENV}: {recipient:?}"))?;

        Ok(Self {
            smtp_url: config.smtp_url,
            from,
            credentials: SmtpCredentials {
                username,
                password,
            },
            recipient,
        })
    }

    /// Connect to the SMTP server
    pub async fn connect(&self) -> anyhow::Result<EmailServiceImpl> {
        info!(smtp_url = %self.smtp_url, "Connecting to smtp server");
        EmailServiceImpl::new(
            &self.smtp_url,
            Some(self.credentials.clone()),
            self.from.clone(),
        )
        .await
        .context("Failed to connect to SMTP server")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use siasis_models::Sensitive;

    use super::*;

    fn config() -> NotificationConfig {
        NotificationConfig {
            smtp_url: "smtps://smtp.gmail.com".into(),
            sender_name: "SIASIS - Solicitudes".into(),
            username: Some("solicitudes@siasis.edu.pe".into()),
            password: Some(Sensitive("app-password".into())),
            recipient: Some("ventas@siasis.edu.pe".into()),
        }
    }

    #[test]
    fn ok() {
        let settings = MailSettings::from_config(config()).unwrap();

        assert_eq!(settings.from.0.name.as_deref(), Some("SIASIS - Solicitudes"));
        assert_eq!(settings.from.0.email.to_string(), "solicitudes@siasis.edu.pe");
        assert_eq!(settings.recipient.0.email.to_string(), "ventas@siasis.edu.pe");
        assert_eq!(settings.credentials.username, "solicitudes@siasis.edu.pe");
    }

    #[test]
    fn missing_keys_are_listed() {
        let err = MailSettings::from_config(NotificationConfig {
            username: None,
            recipient: Some(String::new()),
            ..config()
        })
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing mail configuration: SIASIS_NOTIFICATION__USERNAME, SIASIS_NOTIFICATION__RECIPIENT"
        );
    }

    #[test]
    fn empty_password_is_missing() {
        let err = MailSettings::from_config(NotificationConfig {
            password: Some(Sensitive(String::new())),
            ..config()
        })
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing mail configuration: SIASIS_NOTIFICATION__PASSWORD"
        );
    }

    #[test]
    fn invalid_username() {
        let err = MailSettings::from_config(NotificationConfig {
            username: Some("solicitudes".into()),
            ..config()
        })
        .unwrap_err();

        assert!(err.to_string().contains(USERNAME_ENV));
    }
}
