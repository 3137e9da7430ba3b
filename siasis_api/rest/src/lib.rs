use std::net::IpAddr;

use anyhow::Context;
use axum::Router;
use siasis_core_lead_contracts::LeadService;
use tokio::net::TcpListener;
use tracing::info;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Lead> {
    lead: Lead,
}

impl<Lead> RestServer<Lead>
where
    Lead: LeadService,
{
    pub fn new(lead: Lead) -> Self {
        Self { lead }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        info!("Listening on {}", listener.local_addr()?);
        self.serve_on(listener).await
    }

    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        axum::serve(listener, self.router())
            .await
            .context("Failed to start HTTP server")
    }

    fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router())
            .merge(routes::lead::router(self.lead.into()));

        // Outermost layer last: the trace span needs the request id.
        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}
