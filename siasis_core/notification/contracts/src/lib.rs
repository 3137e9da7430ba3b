use std::future::Future;

use thiserror::Error;

/// Placeholder for fields missing from the dispatch event.
pub const NOT_PROVIDED: &str = "No proporcionado";

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait NotificationService: Send + Sync + 'static {
    /// Email a lead received through the automation platform to the sales
    /// team.
    fn notify(
        &self,
        lead: LeadNotification,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Lead fields as they arrive from the dispatch event. Values are not
/// validated again here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadNotification {
    pub full_name: String,
    pub role_title: String,
    pub email: String,
    pub phone: String,
    pub institution: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("The smtp server did not accept the notification email.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
