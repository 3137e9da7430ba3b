use anyhow::Context;
use siasis_api_rest::RestServer;
use siasis_config::Config;
use siasis_core_lead_impl::LeadServiceImpl;
use siasis_extern_impl::{
    dispatch::{DispatchApiServiceConfig, DispatchApiServiceImpl},
    http::HttpClient,
};
use siasis_shared_impl::time::TimeServiceImpl;
use tracing::info;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let dispatch = config.dispatch;
    let dispatch_config = DispatchApiServiceConfig::new(
        dispatch.endpoint_override,
        &dispatch.owner,
        &dispatch.repo,
        dispatch.token.map(|token| token.0),
        &dispatch.api_version,
    )
    .context("Invalid dispatch configuration")?;
    info!(url = %dispatch_config.dispatches_url(), "Dispatching submissions");

    let http = HttpClient::new()?;
    let dispatch_api = DispatchApiServiceImpl::new(dispatch_config, http);
    let lead = LeadServiceImpl::new(TimeServiceImpl, dispatch_api);

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    RestServer::new(lead)
        .serve(config.http.host, config.http.port)
        .await
}
