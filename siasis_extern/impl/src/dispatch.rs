use std::sync::Arc;

use anyhow::{anyhow, ensure, Context};
use chrono::SecondsFormat;
use reqwest::{header, StatusCode};
use serde::Serialize;
use siasis_extern_contracts::dispatch::{DispatchApiService, DispatchError};
use siasis_models::{submission::DispatchEvent, Sensitive};
use tracing::{error, info, warn};
use url::Url;

use crate::http::HttpClient;

/// https://docs.github.com/en/rest/repos/repos#create-a-repository-dispatch-event
const API_ENDPOINT: &str = "https://api.github.com/";

pub const EVENT_TYPE: &str = "solicitud-implementacion-siasis";

#[derive(Debug, Clone)]
pub struct DispatchApiServiceImpl {
    config: DispatchApiServiceConfig,
    http: HttpClient,
}

#[derive(Debug, Clone)]
pub struct DispatchApiServiceConfig {
    dispatches_url: Arc<Url>,
    token: Option<Sensitive<Arc<str>>>,
    api_version: Arc<str>,
}

impl DispatchApiServiceConfig {
    pub fn new(
        endpoint_override: Option<Url>,
        owner: &str,
        repo: &str,
        token: Option<String>,
        api_version: &str,
    ) -> anyhow::Result<Self> {
        for (name, value) in [("owner", owner), ("repo", repo)] {
            ensure!(
                !value.is_empty()
                    && value
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')),
                "Invalid dispatch {name}: {value:?}"
            );
        }

        let endpoint = match endpoint_override {
            Some(endpoint) => endpoint,
            None => API_ENDPOINT.parse()?,
        };
        let dispatches_url = endpoint
            .join(&format!("repos/{owner}/{repo}/dispatches"))
            .context("Failed to build dispatches URL")?;

        let token = token.filter(|token| !token.is_empty());
        if token.is_none() {
            warn!("No dispatch token configured, submissions will be rejected");
        }

        Ok(Self {
            dispatches_url: dispatches_url.into(),
            token: token.map(|token| Sensitive(token.into())),
            api_version: api_version.into(),
        })
    }

    pub fn dispatches_url(&self) -> &Url {
        &self.dispatches_url
    }
}

impl DispatchApiServiceImpl {
    pub fn new(config: DispatchApiServiceConfig, http: HttpClient) -> Self {
        Self { config, http }
    }
}

impl DispatchApiService for DispatchApiServiceImpl {
    async fn dispatch(&self, event: DispatchEvent) -> Result<(), DispatchError> {
        let Some(token) = &self.config.token else {
            error!("Cannot dispatch submission: no dispatch token configured");
            return Err(DispatchError::NotConfigured);
        };

        let submission = &event.submission;
        let request = DispatchRequest {
            event_type: EVENT_TYPE,
            client_payload: ClientPayload {
                nombre_completo: &submission.full_name,
                cargo: &submission.role_title,
                email: &submission.email,
                telefono: &submission.phone,
                institucion: &submission.institution,
                mensaje: &submission.message,
                timestamp: event
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        };

        info!(url = %self.config.dispatches_url, "Triggering workflow");

        let response = self
            .http
            .post((*self.config.dispatches_url).clone())
            .header(header::ACCEPT, "application/vnd.github+json")
            .bearer_auth(&***token)
            .header("X-GitHub-Api-Version", &*self.config.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                error!("Failed to send dispatch request: {err}");
                DispatchError::Transport(err.into())
            })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            info!("Workflow triggered");
            return Ok(());
        }

        let body = response.text().await.map_err(|err| {
            error!(%status, "Failed to read dispatch response: {err}");
            DispatchError::Transport(anyhow!(err).context("Failed to read dispatch response"))
        })?;
        error!(%status, %body, "Dispatch request was rejected");

        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Serialize)]
struct DispatchRequest<'a> {
    event_type: &'static str,
    client_payload: ClientPayload<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientPayload<'a> {
    nombre_completo: &'a str,
    cargo: &'a str,
    email: &'a str,
    telefono: &'a str,
    institucion: &'a str,
    mensaje: &'a str,
    timestamp: String,
}
