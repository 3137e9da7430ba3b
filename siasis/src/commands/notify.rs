use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use siasis_config::Config;
use siasis_core_notification_contracts::{LeadNotification, NotificationService, NOT_PROVIDED};
use siasis_core_notification_impl::{NotificationFeatureConfig, NotificationServiceImpl};
use siasis_shared_impl::time::TimeServiceImpl;
use siasis_templates_impl::TemplateServiceImpl;

use crate::email::MailSettings;

/// Submission fields, as mapped from the dispatch payload by the workflow.
#[derive(Debug, Args)]
pub struct NotifyCommand {
    /// Full name of the person requesting the implementation
    #[arg(long = "nombre-completo", env = "SOLICITUD_NOMBRE_COMPLETO", default_value = NOT_PROVIDED)]
    pub full_name: String,
    /// Role of the requester at the institution
    #[arg(long = "cargo", env = "SOLICITUD_CARGO", default_value = NOT_PROVIDED)]
    pub role_title: String,
    #[arg(long, env = "SOLICITUD_EMAIL", default_value = NOT_PROVIDED)]
    pub email: String,
    #[arg(long = "telefono", env = "SOLICITUD_TELEFONO", default_value = NOT_PROVIDED)]
    pub phone: String,
    /// Name of the educational institution
    #[arg(long = "institucion", env = "SOLICITUD_INSTITUCION", default_value = NOT_PROVIDED)]
    pub institution: String,
    #[arg(long = "mensaje", env = "SOLICITUD_MENSAJE", default_value = NOT_PROVIDED)]
    pub message: String,
}

impl NotifyCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let settings = MailSettings::from_config(config.notification)?;
        let email = settings.connect().await?;
        let template = TemplateServiceImpl::new().context("Failed to load email templates")?;

        let notification = NotificationServiceImpl::new(
            TimeServiceImpl,
            email,
            template,
            NotificationFeatureConfig {
                recipient: Arc::new(settings.recipient),
            },
        );

        notification
            .notify(self.into())
            .await
            .context("Failed to send lead notification")
    }
}

impl From<NotifyCommand> for LeadNotification {
    fn from(value: NotifyCommand) -> Self {
        Self {
            full_name: or_not_provided(value.full_name),
            role_title: or_not_provided(value.role_title),
            email: or_not_provided(value.email),
            phone: or_not_provided(value.phone),
            institution: or_not_provided(value.institution),
            message: or_not_provided(value.message),
        }
    }
}

/// The workflow sets every variable, so a field missing from the dispatch
/// payload arrives as an empty string.
fn or_not_provided(value: String) -> String {
    if value.trim().is_empty() {
        NOT_PROVIDED.into()
    } else {
        value
    }
}
