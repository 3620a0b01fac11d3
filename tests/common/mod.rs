#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{header, Response, StatusCode};
use serde_json::{json, Value};

use board_api::auth::TokenKeys;
use board_api::config::AppConfig;
use board_api::database::MemoryStore;

pub const SECRET: &[u8] = b"integration-test-secret";
pub const PASSWORD: &str = "qwe123";

/// The real router on a free port, backed by a fresh in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development(SECRET.to_vec());
        config.server.port = port;

        let app = board_api::app(Arc::new(MemoryStore::new()), &config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, email: &str, password: &str, confirmation: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/register"))
            .json(&json!({ "email": email, "password": password, "password1": confirmation }))
            .send()
            .await?)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/auth"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Register, log in, and return the `name=value` identity cookie
    pub async fn sign_up(&self, email: &str) -> Result<String> {
        let res = self.register(email, PASSWORD, PASSWORD).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let res = self.authenticate(email, PASSWORD).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "auth failed: {}", res.status());
        identity_cookie(&res).context("auth response set no cookie")
    }

    pub async fn create_item(&self, cookie: &str, title: &str, text: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/items"))
            .header(header::COOKIE, cookie)
            .json(&json!({ "title": title, "text": text }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        Ok(res.json().await?)
    }
}

/// `JWT_Token=...` from a response's Set-Cookie headers
pub fn identity_cookie(res: &Response) -> Option<String> {
    set_cookie_header(res)
        .and_then(|raw| raw.split(';').next().map(|pair| pair.trim().to_string()))
        .filter(|pair| !pair.ends_with('='))
}

/// The raw Set-Cookie header for the identity cookie
pub fn set_cookie_header(res: &Response) -> Option<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("JWT_Token="))
        .map(str::to_string)
}

pub fn keys() -> TokenKeys {
    TokenKeys::from_secret(SECRET, 48)
}
