use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{
        header::{self, AsHeaderName},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::info;

const DISPATCH_ROUTE: &str = "/repos/:owner/:repo/dispatches";

#[derive(Debug, Clone)]
pub struct DispatchServerConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
}

/// Every request the testing server received, accepted or not.
#[derive(Debug, Clone, Default)]
pub struct ReceivedDispatches(Arc<Mutex<Vec<ReceivedDispatch>>>);

#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedDispatch {
    pub owner: String,
    pub repo: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub api_version: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

impl ReceivedDispatches {
    pub fn all(&self) -> Vec<ReceivedDispatch> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, dispatch: ReceivedDispatch) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(dispatch);
    }
}

pub async fn start_server(
    host: IpAddr,
    port: u16,
    config: DispatchServerConfig,
) -> anyhow::Result<()> {
    info!("Starting repository dispatch testing server on {host}:{port}");
    info!("Dispatch endpoint: http://{host}:{port}{DISPATCH_ROUTE}");
    info!(
        "Accepting dispatches for {}/{} with token {:?}",
        config.owner, config.repo, config.token
    );

    let router = router(config, ReceivedDispatches::default());

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router)
        .await
        .context("Failed to start HTTP server")
}

/// Start the testing server on a random local port in the background.
pub async fn spawn(
    config: DispatchServerConfig,
) -> anyhow::Result<(SocketAddr, ReceivedDispatches)> {
    let received = ReceivedDispatches::default();
    let router = router(config, received.clone());

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .context("Failed to bind to random port")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, router).await });

    Ok((addr, received))
}

pub fn router(config: DispatchServerConfig, received: ReceivedDispatches) -> Router<()> {
    Router::new()
        .route(DISPATCH_ROUTE, routing::post(dispatch))
        .with_state(Arc::new(ServerState { config, received }))
}

struct ServerState {
    config: DispatchServerConfig,
    received: ReceivedDispatches,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: &'static str,
    documentation_url: &'static str,
    status: String,
}

async fn dispatch(
    State(state): State<Arc<ServerState>>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = header_value(&headers, header::AUTHORIZATION);
    let body = serde_json::from_slice::<Value>(&body).ok();

    state.received.push(ReceivedDispatch {
        owner: owner.clone(),
        repo: repo.clone(),
        authorization: authorization.clone(),
        accept: header_value(&headers, header::ACCEPT),
        api_version: header_value(&headers, "x-github-api-version"),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body: body.clone(),
    });

    let config = &state.config;
    let expected_authorization = format!("Bearer {}", config.token);
    if authorization.as_deref() != Some(expected_authorization.as_str()) {
        return error(StatusCode::UNAUTHORIZED, "Bad credentials");
    }

    if owner != config.owner || repo != config.repo {
        return error(StatusCode::NOT_FOUND, "Not Found");
    }

    let valid = body.as_ref().is_some_and(|body| {
        body.get("event_type").is_some_and(Value::is_string)
            && body.get("client_payload").is_some_and(Value::is_object)
    });
    if !valid {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid request.");
    }

    info!(%owner, %repo, "Accepted repository dispatch");
    StatusCode::NO_CONTENT.into_response()
}

fn header_value(headers: &HeaderMap, name: impl AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

fn error(status: StatusCode, message: &'static str) -> Response {
    let response = ErrorResponse {
        message,
        documentation_url: "https://docs.github.com/rest/repos/repos#create-a-repository-dispatch-event",
        status: status.as_u16().to_string(),
    };
    (status, Json(response)).into_response()
}
