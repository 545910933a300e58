//! End-to-end checks of the stub service routes over real sockets

mod common;

use anyhow::Result;
use common::{fixture, TestServer};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

fn trusting_client() -> Result<Client> {
    let ca = std::fs::read(fixture("ca.pem"))?;
    Ok(Client::builder()
        .add_root_certificate(reqwest::Certificate::from_pem(&ca)?)
        .timeout(Duration::from_secs(10))
        .build()?)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_routes_on_both_listeners() -> Result<()> {
    let server = TestServer::start(Duration::from_millis(50)).await?;
    let client = trusting_client()?;

    for base in [&server.plain_url, &server.secure_url] {
        let values: Value = client.get(format!("{}/api/values", base)).send().await?.json().await?;
        assert_eq!(values, json!(["value1", "value2"]), "GET /api/values on {}", base);

        let value: Value = client.get(format!("{}/api/values/7", base)).send().await?.json().await?;
        assert_eq!(value, json!("value"));

        let slow: Vec<String> = client
            .get(format!("{}/api/values/slow", base))
            .send()
            .await?
            .json()
            .await?;
        assert!(slow[0].starts_with("value1-"));
        assert!(slow[1].starts_with("value2-"));
    }

    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_writes_return_empty_ok() -> Result<()> {
    let server = TestServer::start(Duration::from_millis(50)).await?;
    let client = trusting_client()?;
    let base = &server.secure_url;

    let response = client
        .post(format!("{}/api/values", base))
        .json(&"posted")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.bytes().await?.is_empty());

    let response = client
        .put(format!("{}/api/values/3", base))
        .json(&"updated")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.delete(format!("{}/api/values/3", base)).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bad_id_and_descriptor() -> Result<()> {
    let server = TestServer::start(Duration::from_millis(50)).await?;
    let client = trusting_client()?;

    let response = client.get(format!("{}/api/values/seven", server.plain_url)).send().await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let root: Value = client.get(format!("{}/", server.plain_url)).send().await?.json().await?;
    assert_eq!(root["status"], "running");
    assert_eq!(root["endpoints"]["slow"], "/api/values/slow");

    server.stop().await
}
