use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::AuthClient;
use crate::error::AuthError;

fn client_for(server: &MockServer) -> AuthClient {
    AuthClient::new(server.uri(), Some("anon-key".to_owned())).expect("client must build")
}

#[tokio::test]
async fn test_valid_token_resolves_user() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer good-token"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "user-1",
            "email": "dreamer@example.com"
        })))
        .mount(&server)
        .await;

    let user = client.get_user("good-token").await.unwrap();
    assert_eq!(user.id, "user-1");
    assert_eq!(user.email.as_deref(), Some("dreamer@example.com"));
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let err = client.get_user("stale-token").await.unwrap_err();
    assert!(err.is_unauthenticated());
}

#[tokio::test]
async fn test_provider_outage_is_not_unauthorized() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client.get_user("good-token").await.unwrap_err();
    assert!(!err.is_unauthenticated());
    assert!(matches!(err, AuthError::HttpStatus { code: 502, .. }));
}

#[tokio::test]
async fn test_email_may_be_absent() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "user-2"})),
        )
        .mount(&server)
        .await;

    let user = client.get_user("good-token").await.unwrap();
    assert_eq!(user.id, "user-2");
    assert!(user.email.is_none());
}
