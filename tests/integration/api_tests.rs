//! API integration tests against a running server with a seeded database

use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

const BASE_URL: &str = "http://localhost:5000/api/v1";

/// Sign up a fresh user and return its token
async fn signup_and_login(client: &Client) -> String {
    let email = format!("reader-{}@example.com", unique_suffix());

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "firstname": "Test",
            "lastname": "Reader",
            "email": email,
            "password": "secret1"
        }))
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Unique per call and per test run
fn unique_suffix() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{}-{}", nanos, COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// First available book in the catalog
async fn available_book(client: &Client) -> i64 {
    let books: Value = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    books
        .as_array()
        .expect("books array")
        .iter()
        .find(|b| b["available"] == true)
        .and_then(|b| b["id"].as_i64())
        .expect("No available book")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_books_with_genres() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let books = body.as_array().expect("books array");
    assert!(!books.is_empty());
    assert!(books.iter().all(|b| b["genres"].is_array() && b["available"].is_boolean()));
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": "nobody@example.com", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_cycle() {
    let client = Client::new();
    let alice = signup_and_login(&client).await;
    let bob = signup_and_login(&client).await;
    let book_id = available_book(&client).await;

    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .bearer_auth(&alice)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["available"], false);

    // Second borrower is refused
    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .bearer_auth(&bob)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Only the holder can return it
    let response = client
        .delete(format!("{}/books/{}/return", BASE_URL, book_id))
        .bearer_auth(&bob)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let loans: Value = client
        .get(format!("{}/me/loans", BASE_URL))
        .bearer_auth(&alice)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(loans.as_array().map(|l| l.len()), Some(1));
    assert_eq!(loans[0]["book"]["id"].as_i64(), Some(book_id));

    let response = client
        .delete(format!("{}/books/{}/return", BASE_URL, book_id))
        .bearer_auth(&alice)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["available"], true);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_single_winner() {
    let client = Client::new();
    let book_id = available_book(&client).await;

    let mut tokens = Vec::new();
    for _ in 0..8 {
        tokens.push(signup_and_login(&client).await);
    }

    let requests = tokens.iter().map(|token| {
        client
            .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
            .bearer_auth(token)
            .send()
    });
    let responses = futures_join(requests).await;

    let ok = responses.iter().filter(|s| **s == 200).count();
    let conflicts = responses.iter().filter(|s| **s == 409).count();
    assert_eq!(ok, 1);
    assert_eq!(conflicts, 7);

    // Put the book back
    for token in &tokens {
        let _ = client
            .delete(format!("{}/books/{}/return", BASE_URL, book_id))
            .bearer_auth(token)
            .send()
            .await;
    }
}

async fn futures_join<F>(requests: impl Iterator<Item = F>) -> Vec<u16>
where
    F: std::future::Future<Output = reqwest::Result<reqwest::Response>> + Send + 'static,
{
    let handles: Vec<_> = requests.map(tokio::spawn).collect();
    let mut statuses = Vec::new();
    for handle in handles {
        let response = handle.await.expect("task panicked").expect("request failed");
        statuses.push(response.status().as_u16());
    }
    statuses
}

#[tokio::test]
#[ignore]
async fn test_profile_update_returns_fresh_token() {
    let client = Client::new();
    let token = signup_and_login(&client).await;
    let email = format!("renamed-{}@example.com", unique_suffix());

    let response = client
        .put(format!("{}/me/profile", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "firstname": "New", "lastname": "Name", "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email.as_str());
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/me/loans", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
