use crate::helpers::{spawn_app, TEST_PUBLIC_KEY};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

fn change_event(user_id: &str, body: &str) -> String {
    serde_json::json!({
        "type": "INSERT",
        "table": "notifications",
        "schema": "public",
        "record": { "id": 1, "user_id": user_id, "body": body }
    })
    .to_string()
}

#[tokio::test]
async fn the_provider_response_is_relayed_for_a_valid_change_event() {
    // arrange
    let app = spawn_app().await;
    app.seed_profile("u-42", Some("dev-token-abc"));

    // act
    let response = app.post_webhook(change_event("u-42", "Hello")).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        Some("application/json"),
        response
            .headers()
            .get("Content-Type")
            .and_then(|value| value.to_str().ok())
    );
    assert_eq!(
        r#"{"name":"projects/p/messages/1"}"#,
        response.text().await.unwrap()
    );

    let sends = app.cloud.push_sends.lock().unwrap();
    assert_eq!(1, sends.len());
    assert_eq!(Some("Bearer tok-xyz"), sends[0].authorization.as_deref());
    assert_eq!(
        serde_json::json!({
            "message": {
                "token": "dev-token-abc",
                "notification": {
                    "title": "Notification from Supabase",
                    "body": "Hello",
                }
            }
        }),
        sends[0].body
    );
}

#[tokio::test]
async fn the_credential_exchange_sends_a_signed_bearer_grant() {
    // arrange
    let app = spawn_app().await;
    app.seed_profile("u-42", Some("dev-token-abc"));

    // act
    let response = app.post_webhook(change_event("u-42", "Hello")).await;

    // assert
    assert_eq!(200, response.status().as_u16());

    let exchanges = app.cloud.token_exchanges.lock().unwrap();
    assert_eq!(1, exchanges.len());
    assert_eq!(
        "urn:ietf:params:oauth:grant-type:jwt-bearer",
        exchanges[0].grant_type
    );

    #[derive(serde::Deserialize)]
    struct Claims {
        iss: String,
        scope: String,
    }
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[app.token_uri.clone()]);
    let decoded = decode::<Claims>(
        &exchanges[0].assertion,
        &DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap(),
        &validation,
    )
    .expect("The assertion did not verify against the service account's public key.");
    assert_eq!("relay@p.iam.gserviceaccount.com", decoded.claims.iss);
    assert_eq!(
        "https://www.googleapis.com/auth/firebase.messaging",
        decoded.claims.scope
    );
}

#[tokio::test]
async fn each_request_triggers_an_independent_credential_exchange_and_delivery() {
    // arrange
    let app = spawn_app().await;
    app.seed_profile("u-42", Some("dev-token-abc"));

    // act
    app.post_webhook(change_event("u-42", "first")).await;
    app.post_webhook(change_event("u-42", "second")).await;

    // assert
    assert_eq!(2, app.cloud.token_exchanges.lock().unwrap().len());
    assert_eq!(2, app.cloud.push_sends.lock().unwrap().len());
}

#[tokio::test]
async fn malformed_payloads_are_rejected_before_any_outbound_call() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        ("{}".to_string(), "an empty object"),
        ("not json".to_string(), "a body that is not JSON"),
        (
            r#"{"type":"INSERT","table":"notifications","schema":"public"}"#.to_string(),
            "a payload with no record",
        ),
        (
            r#"{"type":"INSERT","table":"notifications","schema":"public","record":{"id":"1","user_id":"u-42","body":"Hello"}}"#
                .to_string(),
            "a record with a string id",
        ),
        (
            r#"{"type":"UPDATE","table":"notifications","schema":"public","record":{"id":1,"user_id":"u-42","body":"Hello"}}"#
                .to_string(),
            "a non-insert change event",
        ),
        (
            r#"{"type":"INSERT","table":"notifications","schema":"public","record":{"id":1,"user_id":"u-42"}}"#
                .to_string(),
            "a record with no body",
        ),
    ];

    for (body, description) in test_cases {
        // act
        let response = app.post_webhook(body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
    }
    assert_eq!(0, *app.cloud.profile_lookups.lock().unwrap());
    assert_eq!(0, app.cloud.token_exchanges.lock().unwrap().len());
    assert_eq!(0, app.cloud.push_sends.lock().unwrap().len());
}

#[tokio::test]
async fn an_empty_user_id_is_rejected_before_the_lookup() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.post_webhook(change_event("", "Hello")).await;

    // assert
    assert_eq!(400, response.status().as_u16());
    assert_eq!(0, *app.cloud.profile_lookups.lock().unwrap());
}

#[tokio::test]
async fn an_unknown_recipient_fails_before_the_credential_exchange() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.post_webhook(change_event("u-unknown", "Hello")).await;

    // assert
    assert_eq!(500, response.status().as_u16());
    assert_eq!(1, *app.cloud.profile_lookups.lock().unwrap());
    assert_eq!(0, app.cloud.token_exchanges.lock().unwrap().len());
    assert_eq!(0, app.cloud.push_sends.lock().unwrap().len());
}

#[tokio::test]
async fn a_profile_without_a_stored_token_fails_before_the_credential_exchange() {
    // arrange
    let app = spawn_app().await;
    app.seed_profile("u-42", None);

    // act
    let response = app.post_webhook(change_event("u-42", "Hello")).await;

    // assert
    assert_eq!(500, response.status().as_u16());
    assert_eq!(0, app.cloud.token_exchanges.lock().unwrap().len());
    assert_eq!(0, app.cloud.push_sends.lock().unwrap().len());
}

#[tokio::test]
async fn a_rejected_credential_exchange_fails_without_a_delivery_attempt() {
    // arrange
    let app = spawn_app().await;
    app.seed_profile("u-42", Some("dev-token-abc"));
    app.set_token_response(400, r#"{"error":"invalid_grant"}"#);

    // act
    let response = app.post_webhook(change_event("u-42", "Hello")).await;

    // assert
    assert_eq!(500, response.status().as_u16());
    assert_eq!(1, app.cloud.token_exchanges.lock().unwrap().len());
    assert_eq!(0, app.cloud.push_sends.lock().unwrap().len());
}

#[tokio::test]
async fn a_record_store_failure_fails_before_the_credential_exchange() {
    // arrange
    let app = spawn_app().await;
    app.seed_profile("u-42", Some("dev-token-abc"));
    app.fail_profile_lookups(500, r#"{"message":"canceling statement due to statement timeout"}"#);

    // act
    let response = app.post_webhook(change_event("u-42", "Hello")).await;

    // assert
    assert_eq!(500, response.status().as_u16());
    assert_eq!(1, *app.cloud.profile_lookups.lock().unwrap());
    assert_eq!(0, app.cloud.token_exchanges.lock().unwrap().len());
    assert_eq!(0, app.cloud.push_sends.lock().unwrap().len());
}

#[tokio::test]
async fn a_push_provider_failure_surfaces_as_a_bad_gateway_without_a_retry() {
    // arrange
    let app = spawn_app().await;
    app.seed_profile("u-42", Some("dev-token-abc"));
    app.set_push_response(500, r#"{"error":{"status":"UNAVAILABLE"}}"#);

    // act
    let response = app.post_webhook(change_event("u-42", "Hello")).await;

    // assert
    assert_eq!(502, response.status().as_u16());
    assert_eq!(1, app.cloud.push_sends.lock().unwrap().len());
}
