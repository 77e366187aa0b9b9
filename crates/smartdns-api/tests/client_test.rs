#![allow(clippy::unwrap_used)]
// Integration tests for `SmartDnsClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use smartdns_api::{Error, ErrorCode, SmartDnsClient, WireTimestamp};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SmartDnsClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = SmartDnsClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "pw".to_string().into();
    client.login("admin", &secret).await.unwrap();
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_logout() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}

// ── Client listing tests ────────────────────────────────────────────

#[tokio::test]
async fn test_get_clients_sends_pagination_and_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/client"))
        .and(query_param("page_num", "2"))
        .and(query_param("page_size", "10"))
        .and(query_param("client_ip", "192.168.1.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "client_list": [{
                "id": 7,
                "client_ip": "192.168.1.5",
                "mac": "aa:bb:cc:dd:ee:ff",
                "hostname": "laptop",
                "last_query_timestamp": 1_700_000_000_000_i64
            }],
            "total_count": 37
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .get_clients(&pairs(&[
            ("page_num", "2"),
            ("page_size", "10"),
            ("client_ip", "192.168.1.5"),
        ]))
        .await
        .unwrap();

    assert_eq!(page.total_count, 37);
    assert_eq!(page.client_list.len(), 1);
    assert_eq!(page.client_list[0].id, 7);
    assert_eq!(
        page.client_list[0].last_query_timestamp,
        Some(WireTimestamp::EpochMillis(1_700_000_000_000))
    );
}

#[tokio::test]
async fn test_get_clients_null_payload_is_missing_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/client"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"client_list": null, "total_count": 0})),
        )
        .mount(&server)
        .await;

    let result = client.get_clients(&[]).await;
    assert!(
        matches!(result, Err(Error::MissingPayload)),
        "expected MissingPayload, got: {result:?}"
    );
}

#[tokio::test]
async fn test_get_clients_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/client"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_clients(&[]).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
    assert_eq!(err.code(), ErrorCode::InvalidResponse);
}

#[tokio::test]
async fn test_get_clients_401_is_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/client"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_clients(&[]).await.unwrap_err();
    assert!(err.is_session_expired(), "got: {err:?}");
}

#[tokio::test]
async fn test_session_expired_code_in_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/client"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"error": "token gone", "code": "session_expired"})),
        )
        .mount(&server)
        .await;

    let err = client.get_clients(&[]).await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired), "got: {err:?}");
}

#[tokio::test]
async fn test_structured_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/client"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "bad page size", "code": "invalid_parameter"})),
        )
        .mount(&server)
        .await;

    let err = client.get_clients(&[]).await.unwrap_err();
    match err {
        Error::Api {
            ref message,
            ref code,
            status,
        } => {
            assert_eq!(message, "bad page size");
            assert_eq!(code.as_deref(), Some("invalid_parameter"));
            assert_eq!(status, 400);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert_eq!(err.code(), ErrorCode::InvalidParameter);
}

// ── Client deletion tests ───────────────────────────────────────────

#[tokio::test]
async fn test_delete_client() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/client/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_client_by_id(42).await.unwrap();
}

#[tokio::test]
async fn test_delete_client_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/client/42"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.delete_client_by_id(42).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ServerError);
}

// ── Upstream server tests ───────────────────────────────────────────

#[tokio::test]
async fn test_get_upstream_servers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/upstream-server"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "upstream_servers": [
                {
                    "host": "dns.google",
                    "ip": "8.8.8.8",
                    "port": 53,
                    "server_type": "udp",
                    "status": "normal",
                    "query_success_rate": 99.5,
                    "avg_time": 12.3,
                    "total_query_count": 1000,
                    "total_query_success": 995
                },
                {
                    "host": "one.one.one.one",
                    "ip": "1.1.1.1",
                    "port": 853,
                    "server_type": "tls",
                    "status": "abnormal",
                    "query_success_rate": 0,
                    "avg_time": -1,
                    "total_query_count": 0,
                    "total_query_success": 0
                }
            ]
        })))
        .mount(&server)
        .await;

    let servers = client.get_upstream_servers().await.unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].ip, "8.8.8.8");
    assert_eq!(servers[1].port, 853);
    assert!(servers[1].avg_time < 0.0);
}

#[tokio::test]
async fn test_get_upstream_servers_missing_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/upstream-server"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client.get_upstream_servers().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoData);
}
