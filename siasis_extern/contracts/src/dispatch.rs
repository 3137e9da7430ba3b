use std::future::Future;

use siasis_models::submission::DispatchEvent;
use thiserror::Error;

/// Hands a submission off to the automation platform, which later runs the
/// notifier out of band.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait DispatchApiService: Send + Sync + 'static {
    /// Trigger the automation job for the given event. Makes exactly one
    /// attempt.
    fn dispatch(
        &self,
        event: DispatchEvent,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// The display text of each variant is safe to show to the client.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No API token is configured, so no request was sent.
    #[error("Error inesperado al procesar la solicitud")]
    NotConfigured,
    /// The automation platform answered with something other than
    /// `204 No Content`.
    #[error("Error al gatillar workflow: {status}")]
    Rejected { status: u16, body: String },
    #[error("Error inesperado al procesar la solicitud")]
    Transport(#[source] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockDispatchApiService {
    pub fn with_dispatch(mut self, event: DispatchEvent, result: Result<(), DispatchError>) -> Self {
        self.expect_dispatch()
            .once()
            .with(mockall::predicate::eq(event))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
