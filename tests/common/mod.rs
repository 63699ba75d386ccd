#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use insight_server::config::AppConfig;
use insight_server::database::MemoryRecordStore;
use insight_server::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryRecordStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).with_context(|| {
            format!("response body is not JSON: {}", String::from_utf8_lossy(&self.body))
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `Set-Cookie` header for `name`, if any
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{}=", name)))
            .map(str::to_string)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Router over a fresh in-memory store with development defaults.
pub fn spawn_app() -> TestApp {
    spawn_app_with(&[])
}

/// Like `spawn_app`, with extra configuration variables layered on top.
pub fn spawn_app_with(vars: &[(&str, &str)]) -> TestApp {
    init_tracing();

    let mut env: HashMap<String, String> = HashMap::new();
    env.insert("STORE_BACKEND".into(), "memory".into());
    env.insert("JWT_SECRET".into(), SECRET.into());
    for (k, v) in vars {
        env.insert(k.to_string(), v.to_string());
    }
    let config = AppConfig::from_lookup(|name| env.get(name).cloned()).expect("test configuration");

    let store = Arc::new(MemoryRecordStore::new());
    let state = AppState::new(store.clone(), &config).expect("test state");

    TestApp {
        router: app(state.clone()),
        state,
        store,
    }
}

impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok(TestResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.request(Request::builder().uri(uri).body(Body::empty())?).await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())?;
        self.request(request).await
    }

    pub async fn send_json(&self, method: Method, uri: &str, body: &Value) -> Result<TestResponse> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.request(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Result<TestResponse> {
        self.send_json(Method::POST, uri, body).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> Result<TestResponse> {
        self.send_json(Method::PUT, uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> Result<TestResponse> {
        self.request(Request::builder().method(Method::DELETE).uri(uri).body(Body::empty())?)
            .await
    }

    /// POST `body` to `uri` and return the `insertedId` of the acknowledgment
    pub async fn insert(&self, uri: &str, body: &Value) -> Result<String> {
        let res = self.post_json(uri, body).await?;
        anyhow::ensure!(res.status == StatusCode::OK, "insert into {} failed: {}", uri, res.status);
        let ack = res.json()?;
        ack["insertedId"]
            .as_str()
            .map(str::to_string)
            .context("acknowledgment without insertedId")
    }

    /// Log in through POST /jwt and return a `Cookie` header value
    pub async fn login(&self, claims: &Value) -> Result<String> {
        let res = self.post_json("/jwt", claims).await?;
        anyhow::ensure!(res.status == StatusCode::OK, "login failed: {}", res.status);
        let set_cookie = res.set_cookie("token").context("no token cookie")?;
        let pair = set_cookie.split(';').next().unwrap_or_default();
        Ok(pair.to_string())
    }
}
