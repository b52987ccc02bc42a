pub mod utils;

use axum::http::StatusCode;
use serde_json::{Value, json};
use utils::{add_sentence, auth_header, create_test_app, signup_key};

/// End-to-end: a contributor signs up, analyzes a few samples, submits them and a reviewer works
/// them through the validation ladder.
#[test_log::test(tokio::test)]
async fn test_e2e_curation_flow() {
    let server = create_test_app();

    // Step 1: sign up on the basic plan
    let signup: Value = server
        .post("/signup")
        .json(&json!({"email": "contributor@example.com", "plan": "basic"}))
        .await
        .json();
    assert_eq!(signup["message"], "User created successfully");
    assert_eq!(signup["requests_limit"], 1000);
    let key = signup["api_key"].as_str().unwrap().to_string();
    assert!(key.starts_with("sk_live_"));

    // Step 2: analyze two samples; each one is charged and logged
    let samples = ["Magacaygu waa Cali, waxaan ku noolahay Hargeysa.", "Maxaa tahay saaxiib?"];
    for (i, text) in samples.iter().enumerate() {
        let body: Value = server
            .post("/analyze")
            .add_header("authorization", &auth_header(&key))
            .json(&json!({"text": text}))
            .await
            .json();
        assert_eq!(body["user_plan"], "basic");
        assert_eq!(body["requests_remaining"], 999 - i as i64);
    }

    let account: Value = server.get("/account").add_header("authorization", &auth_header(&key)).await.json();
    assert_eq!(account["requests_used"], 2);
    assert_eq!(account["requests_remaining"], 998);
    let usage = account["recent_usage"].as_array().unwrap();
    assert_eq!(usage.len(), 2);
    assert!(usage.iter().all(|u| u["endpoint"] == "/analyze"));

    // Step 3: submit both samples to the dataset
    let first = add_sentence(&server, samples[0]).await;
    let second = add_sentence(&server, samples[1]).await;

    // resubmitting is rejected and stores nothing
    let dup = server.post("/sentences").json(&json!({"text": samples[0]})).await;
    dup.assert_status_bad_request();
    assert_eq!(dup.json::<Value>()["error"], "duplicate_text");

    let stats: Value = server.get("/stats").await.json();
    assert_eq!(stats["total_sentences"], 2);
    assert_eq!(stats["validated_sentences"], 0);

    // Step 4: validate one sentence, scholar-approve the other
    server
        .put(&format!("/sentences/{first}/validate"))
        .await
        .assert_status_ok();
    server
        .put(&format!("/sentences/{second}/validate"))
        .add_query_param("scholar_approved", true)
        .await
        .assert_status_ok();

    let stats: Value = server.get("/stats").await.json();
    assert_eq!(stats["validated_sentences"], 2);
    assert_eq!(stats["scholar_approved"], 1);

    let validated: Value = server.get("/sentences").add_query_param("validated", true).await.json();
    assert_eq!(validated["sentences"].as_array().unwrap().len(), 2);
    let pending: Value = server.get("/sentences").add_query_param("validated", false).await.json();
    assert!(pending["sentences"].as_array().unwrap().is_empty());

    // Step 5: re-validating without approval clears the scholar flag
    server
        .put(&format!("/sentences/{second}/validate"))
        .await
        .assert_status_ok();
    let detail: Value = server.get(&format!("/sentences/{second}")).await.json();
    assert_eq!(detail["validated"], true);
    assert_eq!(detail["scholar_approved"], false);

    // Step 6: delete one and check it is gone everywhere
    server.delete(&format!("/sentences/{first}")).await.assert_status_ok();
    server.get(&format!("/sentences/{first}")).await.assert_status_not_found();

    let stats: Value = server.get("/stats").await.json();
    assert_eq!(stats["total_sentences"], 1);

    // dataset routes are not metered
    let account: Value = server.get("/account").add_header("authorization", &auth_header(&key)).await.json();
    assert_eq!(account["requests_used"], 2);
}

/// A free key runs dry after 100 analyses and stays usable for `/account`.
#[test_log::test(tokio::test)]
async fn test_free_plan_exhaustion() {
    let server = create_test_app();
    let key = signup_key(&server, "free@example.com", "free").await;

    for _ in 0..100 {
        server
            .post("/analyze")
            .add_header("authorization", &auth_header(&key))
            .json(&json!({"text": "Nabad"}))
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/analyze")
        .add_header("authorization", &auth_header(&key))
        .json(&json!({"text": "Nabad"}))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.json::<Value>()["error"], "quota_exceeded");

    let account: Value = server.get("/account").add_header("authorization", &auth_header(&key)).await.json();
    assert_eq!(account["requests_used"], 100);
    assert_eq!(account["requests_remaining"], 0);
    assert_eq!(account["recent_usage"].as_array().unwrap().len(), 20);
}

#[test_log::test(tokio::test)]
async fn test_keys_are_isolated_between_accounts() {
    let server = create_test_app();
    let alice = signup_key(&server, "alice@example.com", "free").await;
    let bob = signup_key(&server, "bob@example.com", "premium").await;
    assert_ne!(alice, bob);

    server
        .post("/analyze")
        .add_header("authorization", &auth_header(&alice))
        .json(&json!({"text": "Nabad"}))
        .await
        .assert_status_ok();

    let bob_account: Value = server.get("/account").add_header("authorization", &auth_header(&bob)).await.json();
    assert_eq!(bob_account["email"], "bob@example.com");
    assert_eq!(bob_account["requests_used"], 0);
    assert_eq!(bob_account["requests_limit"], 10_000);
}

#[test_log::test(tokio::test)]
async fn test_openapi_document_served() {
    let server = create_test_app();

    let response = server.get("/openapi.json").await;
    response.assert_status_ok();
    let doc: Value = response.json();
    assert!(doc["paths"]["/analyze"]["post"].is_object());
    assert!(doc["paths"]["/sentences/{sentence_id}/validate"]["put"].is_object());

    server.get("/docs").await.assert_status_ok();
}

#[test_log::test(tokio::test)]
async fn test_unknown_route_is_not_found() {
    let server = create_test_app();
    server.get("/admin").await.assert_status_not_found();
}
