//! Integration tests for the identity reputation service
//!
//! These tests spin the real router on an ephemeral listener and drive it
//! over HTTP: request validation on the write surface, the identity read
//! surface, and full write-then-query flows.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use vouchnet::api::{create_identity_router, ApiState};
use vouchnet::engine::IdentityService;
use vouchnet::storage::MemoryStorage;

// ============================================================================
// Test Helpers
// ============================================================================

/// Spawns the service with in-memory storage, returns its base URL
async fn spawn_server() -> String {
    let storage = Arc::new(MemoryStorage::new());
    let service = Arc::new(IdentityService::new(storage));
    let app = create_identity_router(ApiState { service });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{addr}")
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> reqwest::Response {
    client.post(url).json(&body).send().await.unwrap()
}

async fn vouch(client: &reqwest::Client, base: &str, from: &str, to: &str) {
    let res = post_json(
        client,
        format!("{base}/vouch"),
        json!({"from": from, "signature": "sig", "nonce": "nonce", "to": to}),
    )
    .await;
    assert!(res.status().is_success());
}

async fn prove(client: &reqwest::Client, base: &str, user: &str, balance: u64) {
    let res = post_json(
        client,
        format!("{base}/prove"),
        json!({"user": user, "balance": balance}),
    )
    .await;
    assert!(res.status().is_success());
}

async fn punish(client: &reqwest::Client, base: &str, user: &str, amount: u64) {
    let res = post_json(
        client,
        format!("{base}/punish"),
        json!({"user": user, "amount": amount}),
    )
    .await;
    assert!(res.status().is_success());
}

async fn idt(client: &reqwest::Client, base: &str, user: &str) -> Value {
    let res = client
        .get(format!("{base}/idt/{user}"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    res.json().await.unwrap()
}

// ============================================================================
// Request Validation
// ============================================================================

mod validation {
    use super::*;

    #[tokio::test]
    async fn test_vouch_accepted() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let res = post_json(
            &client,
            format!("{base}/vouch"),
            json!({"from": "alice", "signature": "sig", "nonce": "nonce", "to": "bob"}),
        )
        .await;

        assert_eq!(res.status(), 200);
        assert_eq!(
            res.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"success": true, "message": "Vouch accepted"}));
    }

    #[tokio::test]
    async fn test_vouch_missing_fields() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        // Absent field
        let res = post_json(
            &client,
            format!("{base}/vouch"),
            json!({"from": "alice", "signature": "sig", "nonce": "nonce"}),
        )
        .await;
        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Missing required fields"})
        );

        // Empty field
        let res = post_json(
            &client,
            format!("{base}/vouch"),
            json!({"from": "", "signature": "sig", "nonce": "nonce", "to": "bob"}),
        )
        .await;
        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Missing required fields"})
        );
    }

    #[tokio::test]
    async fn test_vouch_invalid_json() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/vouch"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"success": false, "message": "Invalid JSON"}));
    }

    #[tokio::test]
    async fn test_prove_accepted_and_validated() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let res = post_json(
            &client,
            format!("{base}/prove"),
            json!({"user": "alice", "balance": 100}),
        )
        .await;
        assert_eq!(res.status(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"success": true, "message": "Proof accepted"}));

        // Missing balance
        let res = post_json(&client, format!("{base}/prove"), json!({"user": "alice"})).await;
        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Missing required fields"})
        );

        // Negative balance does not decode as an unsigned amount
        let res = post_json(
            &client,
            format!("{base}/prove"),
            json!({"user": "alice", "balance": -5}),
        )
        .await;
        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"success": false, "message": "Invalid JSON"}));
    }

    #[tokio::test]
    async fn test_punish_accepted_and_validated() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let res = post_json(
            &client,
            format!("{base}/punish"),
            json!({"user": "alice", "amount": 10}),
        )
        .await;
        assert_eq!(res.status(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"success": true, "message": "Punish accepted"}));

        let res = post_json(&client, format!("{base}/punish"), json!({"user": "alice"})).await;
        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Missing required fields"})
        );
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let res = client.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.text().await.unwrap(), "OK");
    }
}

// ============================================================================
// Identity Queries
// ============================================================================

mod identity_queries {
    use super::*;

    #[tokio::test]
    async fn test_idt_unknown_user_is_zero() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let body = idt(&client, &base, "ghost").await;
        assert_eq!(body, json!({"user": "ghost", "balance": 0, "penalty": 0}));
    }

    #[tokio::test]
    async fn test_penalty_chain_over_http() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        vouch(&client, &base, "alice", "bob").await;
        vouch(&client, &base, "bob", "carol").await;
        punish(&client, &base, "alice", 5).await;
        punish(&client, &base, "bob", 100).await;
        punish(&client, &base, "carol", 1000).await;

        // carol: 1000; bob: 100 + 100; alice: 5 + 20. With no proof, the
        // balance is the negated penalty aggregate.
        let body = idt(&client, &base, "alice").await;
        assert_eq!(body["penalty"], 25);
        assert_eq!(body["balance"], -25);
    }

    #[tokio::test]
    async fn test_top_vouchers_over_http() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let vouchers: &[(&str, u64)] = &[
            ("alice", 10),
            ("bruce", 20),
            ("carol", 30),
            ("dana", 40),
            ("erin", 50),
            ("frank", 100),
        ];
        for (user, balance) in vouchers {
            vouch(&client, &base, user, "bob").await;
            prove(&client, &base, user, *balance).await;
        }

        let body = idt(&client, &base, "bob").await;
        assert_eq!(body["balance"], 24);
        assert_eq!(body["penalty"], 0);
    }

    #[tokio::test]
    async fn test_proof_replacement_over_http() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        prove(&client, &base, "alice", 10).await;
        prove(&client, &base, "alice", 250).await;

        let body = idt(&client, &base, "alice").await;
        assert_eq!(body["balance"], 250);
    }

    #[tokio::test]
    async fn test_vouch_and_punish_full_flow() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        vouch(&client, &base, "carol", "bob").await;
        prove(&client, &base, "bob", 100).await;
        prove(&client, &base, "carol", 100).await;
        punish(&client, &base, "bob", 50).await;

        // carol is tainted through her vouch for bob, then boosts him.
        let body = idt(&client, &base, "bob").await;
        assert_eq!(body["balance"], 59);
        assert_eq!(body["penalty"], 50);

        let body = idt(&client, &base, "carol").await;
        assert_eq!(body["penalty"], 5);
        assert_eq!(body["balance"], 95);
    }
}
