use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use siasis_core_notification_contracts::{LeadNotification, NotificationService, NotifyError};
use siasis_email_contracts::{Email, EmailBody, EmailService};
use siasis_models::email_address::{EmailAddress, EmailAddressWithName};
use siasis_shared_contracts::time::TimeService;
use siasis_templates_contracts::{LeadNotificationTemplate, TemplateService};
use tracing::{info, warn};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

#[derive(Debug, Clone)]
pub struct NotificationServiceImpl<Time, Email, Template> {
    time: Time,
    email: Email,
    template: Template,
    config: NotificationFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct NotificationFeatureConfig {
    pub recipient: Arc<EmailAddressWithName>,
}

impl<Time, EmailS, Template> NotificationServiceImpl<Time, EmailS, Template> {
    pub fn new(
        time: Time,
        email: EmailS,
        template: Template,
        config: NotificationFeatureConfig,
    ) -> Self {
        Self {
            time,
            email,
            template,
            config,
        }
    }
}

impl<Time, EmailS, Template> NotificationService for NotificationServiceImpl<Time, EmailS, Template>
where
    Time: TimeService,
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn notify(&self, lead: LeadNotification) -> Result<(), NotifyError> {
        info!(
            recipient = %self.config.recipient,
            full_name = %lead.full_name,
            email = %lead.email,
            institution = %lead.institution,
            "Sending lead notification"
        );

        let reply_to = lead
            .email
            .parse::<EmailAddress>()
            .inspect_err(|err| warn!(email = %lead.email, "Not setting reply-to: {err}"))
            .ok()
            .map(Into::into);

        let rendered = self.template.render(&LeadNotificationTemplate {
            full_name: lead.full_name,
            role_title: lead.role_title,
            email: lead.email,
            phone: lead.phone,
            institution: lead.institution.clone(),
            message: lead.message,
            requested_at: format_requested_at(self.time.now()),
        })?;

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("Nueva Solicitud de Implementación - {}", lead.institution),
            body: EmailBody::Alternative {
                text: rendered.text,
                html: rendered.html,
            },
            reply_to,
        };

        if !self.email.send(email).await? {
            return Err(NotifyError::Send);
        }

        info!("Lead notification sent");

        Ok(())
    }
}

/// Formats a point in time as a Spanish date in Lima local time, e.g.
/// `19 de octubre de 2026, 09:05`.
fn format_requested_at(time: DateTime<Utc>) -> String {
    // Lima is UTC-5 all year round.
    let lima = (time - TimeDelta::hours(5)).naive_utc();
    format!(
        "{} de {} de {}, {:02}:{:02}",
        lima.day(),
        MONTHS[lima.month0() as usize],
        lima.year(),
        lima.hour(),
        lima.minute()
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use siasis_core_notification_contracts::NOT_PROVIDED;
    use siasis_email_contracts::MockEmailService;
    use siasis_shared_contracts::time::MockTimeService;
    use siasis_templates_contracts::{MockTemplateService, RenderedTemplate};
    use siasis_utils::assert_matches;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 14, 5, 9).unwrap()
    }

    fn config() -> NotificationFeatureConfig {
        NotificationFeatureConfig {
            recipient: Arc::new("ventas@siasis.edu.pe".parse().unwrap()),
        }
    }

    fn lead() -> LeadNotification {
        LeadNotification {
            full_name: "María Quispe".into(),
            role_title: "Directora".into(),
            email: "maria@example.com".into(),
            phone: "961863783".into(),
            institution: "I.E. 20935 Asunción 8".into(),
            message: "Queremos implementar SIASIS.".into(),
        }
    }

    fn template(lead: &LeadNotification) -> LeadNotificationTemplate {
        LeadNotificationTemplate {
            full_name: lead.full_name.clone(),
            role_title: lead.role_title.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            institution: lead.institution.clone(),
            message: lead.message.clone(),
            requested_at: "19 de octubre de 2026, 09:05".into(),
        }
    }

    fn rendered() -> RenderedTemplate {
        RenderedTemplate {
            html: "<p>lead</p>".into(),
            text: "lead".into(),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let config = config();
        let lead = lead();

        let time = MockTimeService::new().with_now(now());
        let template = MockTemplateService::new().with_render(template(&lead), rendered());
        let email = MockEmailService::new().with_send(
            Email {
                recipient: (*config.recipient).clone(),
                subject: "Nueva Solicitud de Implementación - I.E. 20935 Asunción 8".into(),
                body: EmailBody::Alternative {
                    text: "lead".into(),
                    html: "<p>lead</p>".into(),
                },
                reply_to: Some("maria@example.com".parse().unwrap()),
            },
            true,
        );

        let sut = NotificationServiceImpl::new(time, email, template, config);

        // Act
        let result = sut.notify(lead).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn missing_email_has_no_reply_to() {
        // Arrange
        let config = config();
        let lead = LeadNotification {
            email: NOT_PROVIDED.into(),
            ..lead()
        };

        let time = MockTimeService::new().with_now(now());
        let template = MockTemplateService::new().with_render(template(&lead), rendered());
        let email = MockEmailService::new().with_send(
            Email {
                recipient: (*config.recipient).clone(),
                subject: "Nueva Solicitud de Implementación - I.E. 20935 Asunción 8".into(),
                body: EmailBody::Alternative {
                    text: "lead".into(),
                    html: "<p>lead</p>".into(),
                },
                reply_to: None,
            },
            true,
        );

        let sut = NotificationServiceImpl::new(time, email, template, config);

        // Act
        let result = sut.notify(lead).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn send_rejected() {
        // Arrange
        let config = config();
        let lead = lead();

        let time = MockTimeService::new().with_now(now());
        let template = MockTemplateService::new().with_render(template(&lead), rendered());
        let email = MockEmailService::new().with_send(
            Email {
                recipient: (*config.recipient).clone(),
                subject: "Nueva Solicitud de Implementación - I.E. 20935 Asunción 8".into(),
                body: EmailBody::Alternative {
                    text: "lead".into(),
                    html: "<p>lead</p>".into(),
                },
                reply_to: Some("maria@example.com".parse().unwrap()),
            },
            false,
        );

        let sut = NotificationServiceImpl::new(time, email, template, config);

        // Act
        let result = sut.notify(lead).await;

        // Assert
        assert_matches!(result, Err(NotifyError::Send));
    }

    #[test]
    fn requested_at() {
        for ((y, mo, d, h, mi), expected) in [
            ((2026, 10, 19, 14, 5), "19 de octubre de 2026, 09:05"),
            ((2026, 1, 1, 3, 0), "31 de diciembre de 2025, 22:00"),
            ((2026, 3, 1, 4, 59), "28 de febrero de 2026, 23:59"),
        ] {
            let time = Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap();
            assert_eq!(format_requested_at(time), expected);
        }
    }
}
