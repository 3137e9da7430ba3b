use std::net::{Ipv4Addr, SocketAddr};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use siasis_extern_contracts::dispatch::{DispatchApiService, DispatchError};
use siasis_extern_impl::{
    dispatch::{DispatchApiServiceConfig, DispatchApiServiceImpl, EVENT_TYPE},
    http::HttpClient,
};
use siasis_models::submission::{DispatchEvent, RawSubmission};
use siasis_testing::dispatch::{DispatchServerConfig, ReceivedDispatches};
use siasis_utils::assert_matches;

const TOKEN: &str = "test-token";
const OWNER: &str = "siasis";
const REPO: &str = "siasis-landing";

#[tokio::test]
async fn success() {
    let (sut, received) = make_sut(OWNER, REPO, Some(TOKEN)).await;

    let result = sut.dispatch(event()).await;

    result.unwrap();
    let received = received.all();
    assert_eq!(received.len(), 1);
    let dispatch = &received[0];
    assert_eq!(dispatch.authorization.as_deref(), Some("Bearer test-token"));
    assert_eq!(dispatch.accept.as_deref(), Some("application/vnd.github+json"));
    assert_eq!(dispatch.api_version.as_deref(), Some("2022-11-28"));
    assert_eq!(dispatch.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        dispatch.body,
        Some(json!({
            "event_type": EVENT_TYPE,
            "client_payload": {
                "nombreCompleto": "María Quispe",
                "cargo": "Directora",
                "email": "maria@example.com",
                "telefono": "+51 961 863 783",
                "institucion": "I.E. 20935 Asunción 8",
                "mensaje": "Queremos implementar SIASIS.",
                "timestamp": "2026-10-19T14:05:09.000Z",
            },
        }))
    );
}

#[tokio::test]
async fn bad_credentials() {
    let (sut, received) = make_sut(OWNER, REPO, Some("wrong-token")).await;

    let result = sut.dispatch(event()).await;

    assert_matches!(
        result,
        Err(DispatchError::Rejected { status: 401, body }) if body.contains("Bad credentials")
    );
    assert_eq!(received.all().len(), 1);
}

#[tokio::test]
async fn unknown_repository() {
    let (sut, _) = make_sut(OWNER, "other-repo", Some(TOKEN)).await;

    let result = sut.dispatch(event()).await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Error al gatillar workflow: 404");
    assert_matches!(err, DispatchError::Rejected { status: 404, body } if !body.is_empty());
}

#[tokio::test]
async fn not_configured() {
    let (sut, received) = make_sut(OWNER, REPO, None).await;

    let result = sut.dispatch(event()).await;

    assert_matches!(result, Err(DispatchError::NotConfigured));
    assert!(received.all().is_empty());
}

#[tokio::test]
async fn transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        listener.local_addr().unwrap()
    };
    let sut = make_sut_for(addr, OWNER, REPO, Some(TOKEN));

    let result = sut.dispatch(event()).await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Error inesperado al procesar la solicitud");
    assert_matches!(err, DispatchError::Transport(_));
}

fn event() -> DispatchEvent {
    let submission = RawSubmission {
        full_name: Some("María Quispe".into()),
        role_title: Some("Directora".into()),
        email: Some("Maria@Example.com".into()),
        phone: Some("+51 961 863 783".into()),
        institution: Some("I.E. 20935 Asunción 8".into()),
        message: Some("Queremos implementar SIASIS.".into()),
    }
    .validate()
    .unwrap();

    DispatchEvent {
        submission,
        timestamp: Utc.with_ymd_and_hms(2026, 10, 19, 14, 5, 9).unwrap(),
    }
}

async fn make_sut(
    owner: &str,
    repo: &str,
    token: Option<&str>,
) -> (DispatchApiServiceImpl, ReceivedDispatches) {
    let (addr, received) = siasis_testing::dispatch::spawn(DispatchServerConfig {
        token: TOKEN.into(),
        owner: OWNER.into(),
        repo: REPO.into(),
    })
    .await
    .unwrap();

    (make_sut_for(addr, owner, repo, token), received)
}

fn make_sut_for(
    addr: SocketAddr,
    owner: &str,
    repo: &str,
    token: Option<&str>,
) -> DispatchApiServiceImpl {
    let config = DispatchApiServiceConfig::new(
        Some(format!("http://{addr}/").parse().unwrap()),
        owner,
        repo,
        token.map(Into::into),
        "2022-11-28",
    )
    .unwrap();

    DispatchApiServiceImpl::new(config, HttpClient::new().unwrap())
}
