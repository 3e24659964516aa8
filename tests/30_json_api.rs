mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

async fn sign_in(server: &TestServer, email: &str, password: &str) -> Result<String> {
    let resp = common::client()
        .post(server.url("/api/signin"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["token_type"], "Bearer");
    Ok(body["access_token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn sign_in_issues_prefixed_token() -> Result<()> {
    let server = common::start_server().await?;
    server.add_user(7, "Ann", "Ann@Example.com", "secret")?;

    assert_eq!(sign_in(&server, "ann@example.com", "secret").await?, "20197");

    let output = server.ctl().args(["token", "issue", "7"]).output()?;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "20197");
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_400_authentication() -> Result<()> {
    let server = common::start_server().await?;
    server.add_user(7, "Ann", "ann@example.com", "secret")?;

    let resp = common::client()
        .post(server.url("/api/signin"))
        .json(&json!({"email": "ann@example.com", "password": "wrong"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await?;
    assert_eq!(body["type"], "authentication");
    assert_eq!(body["error"], "Invalid authentication details");
    Ok(())
}

#[tokio::test]
async fn items_require_bearer_token() -> Result<()> {
    let server = common::start_server().await?;

    let resp = common::client().get(server.url("/api/items")).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await?;
    assert_eq!(body["type"], "unauthorized");
    Ok(())
}

#[tokio::test]
async fn price_policy_and_isolation() -> Result<()> {
    let server = common::start_server().await?;
    server.add_user(1, "Ann", "ann@example.com", "a")?;
    server.add_user(2, "Bob", "bob@example.com", "b")?;
    let ann = sign_in(&server, "ann@example.com", "a").await?;
    let bob = sign_in(&server, "bob@example.com", "b").await?;
    let client = common::client();

    let resp = client
        .post(server.url("/api/items"))
        .bearer_auth(&ann)
        .json(&json!({"name": "max", "price": 100000}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    for body in [json!({"name": "over", "price": 100001}), json!({"name": "text", "price": "5"})] {
        let resp = client.post(server.url("/api/items")).bearer_auth(&ann).json(&body).send().await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await?;
        assert_eq!(body["type"], "validation");
        assert_eq!(body["fields"], json!(["price"]));
    }

    let resp = client
        .post(server.url("/api/items"))
        .bearer_auth(&bob)
        .json(&json!({"name": "desk", "price": 90}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let listed: Value = client.get(server.url("/api/items")).bearer_auth(&ann).send().await?.json().await?;
    assert_eq!(listed, json!([{"name": "max", "price": 100000}]));
    let listed: Value = client.get(server.url("/api/items")).bearer_auth(&bob).send().await?.json().await?;
    assert_eq!(listed, json!([{"name": "desk", "price": 90}]));
    Ok(())
}
