use siasis_core_lead_contracts::{LeadService, LeadSubmitError};
use siasis_extern_contracts::dispatch::{DispatchApiService, DispatchError};
use siasis_models::submission::{DispatchEvent, RawSubmission, Submission};
use siasis_shared_contracts::time::TimeService;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct LeadServiceImpl<Time, DispatchApi> {
    time: Time,
    dispatch_api: DispatchApi,
}

impl<Time, DispatchApi> LeadServiceImpl<Time, DispatchApi> {
    pub fn new(time: Time, dispatch_api: DispatchApi) -> Self {
        Self { time, dispatch_api }
    }
}

impl<Time, DispatchApi> LeadService for LeadServiceImpl<Time, DispatchApi>
where
    Time: TimeService,
    DispatchApi: DispatchApiService,
{
    async fn submit(&self, submission: RawSubmission) -> Result<Submission, LeadSubmitError> {
        let submission = submission.validate().inspect_err(|err| {
            warn!(errors = ?err.messages(), "Rejected invalid submission");
        })?;

        info!(
            email = submission.email.as_str(),
            institution = submission.institution.as_str(),
            "Submission validated"
        );

        let event = DispatchEvent {
            submission: submission.clone(),
            timestamp: self.time.now(),
        };

        if let Err(err) = self.dispatch_api.dispatch(event).await {
            let detail = match &err {
                DispatchError::NotConfigured => "dispatch token missing".to_owned(),
                DispatchError::Rejected { status, body } => format!("status {status}: {body}"),
                DispatchError::Transport(err) => format!("{err:#}"),
            };
            error!(
                full_name = submission.full_name.as_str(),
                institution = submission.institution.as_str(),
                %detail,
                "Failed to dispatch submission"
            );
            return Err(err.into());
        }

        Ok(submission)
    }
}
