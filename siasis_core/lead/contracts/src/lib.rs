use std::future::Future;

use siasis_extern_contracts::dispatch::DispatchError;
use siasis_models::submission::{RawSubmission, Submission, ValidationErrors};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait LeadService: Send + Sync + 'static {
    /// Validate a submission from the landing page form and hand it off to
    /// the automation platform.
    ///
    /// Returns the normalized submission on success.
    fn submit(
        &self,
        submission: RawSubmission,
    ) -> impl Future<Output = Result<Submission, LeadSubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum LeadSubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[cfg(feature = "mock")]
impl MockLeadService {
    pub fn with_submit(
        mut self,
        submission: RawSubmission,
        result: Result<Submission, LeadSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
