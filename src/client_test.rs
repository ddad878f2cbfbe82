use super::*;
use crate::error::StoreError;
use crate::storage::MemoryStorage;
use crate::test_support::ScriptedTransport;

type Client = AuthClient<ScriptedTransport, MemoryStorage>;

fn client() -> Client {
    AuthClient::new(ScriptedTransport::new(), MemoryStorage::new())
}

fn stored(client: &Client) -> Option<UserSession> {
    client.store().load()
}

fn seed(client: &Client, token: &str) -> UserSession {
    let session: UserSession =
        serde_json::from_value(json!({ "name": "A", "email": "a@b.com", "token": token })).unwrap();
    client.store().save(&session).unwrap();
    session
}

// =============================================================================
// sign_in
// =============================================================================

#[tokio::test]
async fn sign_in_with_token_stores_response_exactly() {
    let client = client();
    let body = json!({ "name": "A", "email": "a@b.com", "token": "t1" });
    client.transport().respond("/signin", 200, body.clone());

    let session = client.sign_in("a@b.com", "pw").await.unwrap();

    let expected: UserSession = serde_json::from_value(body).unwrap();
    assert_eq!(session, expected);
    assert_eq!(stored(&client), Some(expected.clone()));
    assert_eq!(client.current_user(), Some(expected));
}

#[tokio::test]
async fn sign_in_sends_credentials_without_bearer() {
    let client = client();
    seed(&client, "old");
    client.transport().respond("/signin", 200, json!({ "token": "t1" }));

    client.sign_in(" a@b.com ", "pw").await.unwrap();

    let sent = client.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].body, Some(json!({ "email": "a@b.com", "password": "pw" })));
    assert_eq!(sent[0].bearer, None);
}

#[tokio::test]
async fn sign_in_without_token_leaves_store_unchanged() {
    let client = client();
    let prior = seed(&client, "t0");
    client.transport().respond("/signin", 200, json!({ "name": "A", "email": "a@b.com" }));

    let session = client.sign_in("a@b.com", "pw").await.unwrap();

    assert!(!session.is_valid());
    assert_eq!(stored(&client), Some(prior));
}

#[tokio::test]
async fn sign_in_rejected_uses_server_message_and_keeps_store() {
    let client = client();
    let prior = seed(&client, "t0");
    client.transport().respond("/signin", 401, json!({ "message": "Bad credentials" }));

    let err = client.sign_in("a@b.com", "wrong").await.unwrap_err();

    assert!(matches!(err, AuthError::Server { status: 401, .. }));
    assert_eq!(err.message(), "Bad credentials");
    assert_eq!(stored(&client), Some(prior));
}

#[tokio::test]
async fn sign_in_rejected_without_message_uses_fallback() {
    let client = client();
    client.transport().respond_empty("/signin", 500);

    let err = client.sign_in("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.message(), LOGIN_FAILED);
}

#[tokio::test]
async fn sign_in_network_failure_uses_fallback() {
    let client = client();
    client.transport().fail("/signin");

    let err = client.sign_in("a@b.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::Network(_)));
    assert_eq!(err.message(), LOGIN_FAILED);
    assert_eq!(stored(&client), None);
}

#[tokio::test]
async fn sign_in_blank_fields_rejected_before_request() {
    let client = client();

    let err = client.sign_in("   ", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
    let err = client.sign_in("a@b.com", "").await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));

    assert!(client.transport().sent().is_empty());
}

#[tokio::test]
async fn sign_in_unexpected_body_shape_is_server_error() {
    let client = client();
    client.transport().respond("/signin", 200, json!("just a string"));

    let err = client.sign_in("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.message(), LOGIN_FAILED);
    assert_eq!(stored(&client), None);
}

// =============================================================================
// sign_up
// =============================================================================

#[tokio::test]
async fn sign_up_without_token_returns_record_and_stores_nothing() {
    let client = client();
    client
        .transport()
        .respond("/signup", 201, json!({ "name": "A", "email": "a@b.com" }));

    let session = client.sign_up("A", "a@b.com", "pw").await.unwrap();

    assert_eq!(session.name.as_deref(), Some("A"));
    assert!(!session.is_valid());
    assert_eq!(stored(&client), None);
}

#[tokio::test]
async fn sign_up_with_access_token_persists_session() {
    let client = client();
    client.transport().respond(
        "/signup",
        201,
        json!({ "access_token": "jwt", "token_type": "Bearer", "expires_in": 86_400_000 }),
    );

    let session = client.sign_up("A", "a@b.com", "pw").await.unwrap();

    assert_eq!(session.bearer_token(), Some("jwt"));
    assert_eq!(stored(&client), Some(session));
}

#[tokio::test]
async fn jwt_sign_in_is_stored_verbatim_and_used_as_bearer() {
    let client = client();
    let body = json!({ "token": "t1", "access_token": "jwt", "token_type": "Bearer", "expires_in": 3600 });
    client.transport().respond("/signin", 200, body.clone());
    client.transport().respond("/profile", 200, json!({ "email": "a@b.com" }));

    client.sign_in("a@b.com", "pw").await.unwrap();
    let raw = client.store().storage().get_item("user").unwrap().unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&raw).unwrap(), body);

    client.get_profile().await.unwrap();
    assert_eq!(client.transport().sent()[1].bearer.as_deref(), Some("jwt"));
}

#[tokio::test]
async fn sign_up_sends_trimmed_identity() {
    let client = client();
    client.transport().respond("/signup", 201, json!({}));

    client.sign_up("  A ", " a@b.com ", " pw ").await.unwrap();

    let sent = client.transport().sent();
    assert_eq!(
        sent[0].body,
        Some(json!({ "name": "A", "email": "a@b.com", "password": " pw " }))
    );
}

#[tokio::test]
async fn sign_up_conflict_surfaces_server_message() {
    let client = client();
    client
        .transport()
        .respond("/signup", 409, json!({ "message": "Email is already in use" }));

    let err = client.sign_up("A", "a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.message(), "Email is already in use");
}

#[tokio::test]
async fn sign_up_failure_defaults_to_registration_failed() {
    let client = client();
    client.transport().fail("/signup");

    let err = client.sign_up("A", "a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.message(), REGISTRATION_FAILED);
}

#[tokio::test]
async fn sign_up_requires_all_fields() {
    let client = client();
    for (name, email, password) in [("", "a@b.com", "pw"), ("A", " ", "pw"), ("A", "a@b.com", "")] {
        let err = client.sign_up(name, email, password).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)), "{name:?} {email:?} {password:?}");
    }
    assert!(client.transport().sent().is_empty());
}

// =============================================================================
// sign_out
// =============================================================================

#[tokio::test]
async fn sign_out_sends_bearer_and_clears_store() {
    let client = client();
    seed(&client, "t1");
    client.transport().respond_empty("/signout", 200);

    client.sign_out().await.unwrap();

    assert_eq!(client.transport().sent()[0].bearer.as_deref(), Some("t1"));
    assert_eq!(stored(&client), None);
}

#[tokio::test]
async fn sign_out_clears_store_when_network_fails() {
    let client = client();
    seed(&client, "t1");
    client.transport().fail("/signout");

    client.sign_out().await.unwrap();
    assert_eq!(stored(&client), None);
}

#[tokio::test]
async fn sign_out_clears_store_when_server_rejects() {
    let client = client();
    seed(&client, "t1");
    client.transport().respond("/signout", 401, json!({ "message": "expired" }));

    client.sign_out().await.unwrap();
    assert_eq!(stored(&client), None);
}

// =============================================================================
// get_profile
// =============================================================================

#[tokio::test]
async fn get_profile_reads_token_fresh_each_call() {
    let client = client();
    client.transport().respond("/profile", 200, json!({ "name": "A", "email": "a@b.com" }));
    client.transport().respond("/profile", 200, json!({ "name": "A", "email": "a@b.com" }));

    seed(&client, "t1");
    client.get_profile().await.unwrap();
    seed(&client, "t2");
    let profile = client.get_profile().await.unwrap();

    let bearers: Vec<_> = client.transport().sent().into_iter().map(|r| r.bearer).collect();
    assert_eq!(bearers, vec![Some("t1".to_owned()), Some("t2".to_owned())]);
    assert_eq!(profile.email.as_deref(), Some("a@b.com"));
}

#[tokio::test]
async fn get_profile_401_is_authorization_expired() {
    let client = client();
    seed(&client, "t1");
    client.transport().respond("/profile", 401, json!({ "message": "Token expired" }));

    let err = client.get_profile().await.unwrap_err();
    assert!(err.is_authorization_expired());
}

#[tokio::test]
async fn get_profile_403_is_server_error() {
    let client = client();
    seed(&client, "t1");
    client.transport().respond("/profile", 403, json!({ "message": "Forbidden" }));

    let err = client.get_profile().await.unwrap_err();
    assert!(matches!(err, AuthError::Server { status: 403, .. }));
    assert_eq!(stored(&client).and_then(|s| s.token).as_deref(), Some("t1"));
}

// =============================================================================
// update_profile
// =============================================================================

#[tokio::test]
async fn update_profile_merges_response_and_preserves_token() {
    let client = client();
    seed(&client, "t1");
    client
        .transport()
        .respond("/profile", 200, json!({ "name": "Alice", "email": "a@b.com" }));

    let patch = ProfilePatch { name: Some("Alice".to_owned()), email: None };
    let merged = client.update_profile(&patch).await.unwrap();

    assert_eq!(merged.name.as_deref(), Some("Alice"));
    assert_eq!(merged.token.as_deref(), Some("t1"));
    assert_eq!(stored(&client), Some(merged));

    let sent = client.transport().sent();
    assert_eq!(sent[0].method, Method::Put);
    assert_eq!(sent[0].body, Some(json!({ "name": "Alice" })));
    assert_eq!(sent[0].bearer.as_deref(), Some("t1"));
}

#[tokio::test]
async fn update_profile_empty_patch_rejected() {
    let client = client();
    let patch = ProfilePatch { name: Some("   ".to_owned()), email: None };

    let err = client.update_profile(&patch).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
    assert!(client.transport().sent().is_empty());
}

#[tokio::test]
async fn update_profile_without_stored_session_returns_unpersisted_record() {
    let client = client();
    client.transport().respond("/profile", 200, json!({ "name": "Alice" }));

    let patch = ProfilePatch { name: Some("Alice".to_owned()), email: None };
    let merged = client.update_profile(&patch).await.unwrap();

    assert_eq!(merged.name.as_deref(), Some("Alice"));
    assert_eq!(stored(&client), None);
}

#[tokio::test]
async fn update_profile_401_leaves_clearing_to_caller() {
    let client = client();
    let prior = seed(&client, "t1");
    client.transport().respond_empty("/profile", 401);

    let patch = ProfilePatch { name: Some("Alice".to_owned()), email: None };
    let err = client.update_profile(&patch).await.unwrap_err();

    assert!(err.is_authorization_expired());
    assert_eq!(stored(&client), Some(prior));
}

// =============================================================================
// change_password
// =============================================================================

#[tokio::test]
async fn change_password_posts_camel_case_body() {
    let client = client();
    seed(&client, "t1");
    client.transport().respond_empty("/change-password", 204);

    client.change_password("old", "new").await.unwrap();

    let sent = client.transport().sent();
    assert_eq!(sent[0].path, "/change-password");
    assert_eq!(sent[0].body, Some(json!({ "currentPassword": "old", "newPassword": "new" })));
    assert_eq!(sent[0].bearer.as_deref(), Some("t1"));
}

#[tokio::test]
async fn change_password_wrong_current_surfaces_message() {
    let client = client();
    seed(&client, "t1");
    client
        .transport()
        .respond("/change-password", 400, json!({ "message": "Current password is incorrect" }));

    let err = client.change_password("bad", "new").await.unwrap_err();
    assert_eq!(err.message(), "Current password is incorrect");
}

#[tokio::test]
async fn change_password_requires_both_values() {
    let client = client();
    assert!(matches!(client.change_password("", "new").await, Err(AuthError::Validation(_))));
    assert!(matches!(client.change_password("old", "").await, Err(AuthError::Validation(_))));
    assert!(client.transport().sent().is_empty());
}

// =============================================================================
// store errors
// =============================================================================

#[test]
fn store_error_converts_into_auth_error() {
    let err: AuthError = StoreError::MissingToken.into();
    assert!(matches!(err, AuthError::Storage(StoreError::MissingToken)));
}
