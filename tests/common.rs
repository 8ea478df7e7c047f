#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use personalchat_auth::config::{extract_config, ConfigV1};
use personalchat_auth::models::{Credential, Identity};
use personalchat_auth::routes::create_router;
use personalchat_auth::startup::build_state;
use personalchat_auth::verifiers::{Verifier, VerifyError};
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
verifier:
  type: "plain"
  name: "Test accounts"
  accounts:
    - token: tok-123
      id: u1
      name: Ann
    - token: tok-null
    - token: tok-bad
      error: network unreachable
bind_address: 127.0.0.1:8091
"#;

pub fn load_test_config() -> ConfigV1 {
    extract_config(Figment::new().merge(Yaml::string(TEST_CONFIG)))
        .expect("Failed to parse test config YAML")
}

pub fn build_app(config: ConfigV1) -> Router {
    create_router(build_state(&config))
}

pub fn json_request(method: Method, path: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(path);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request")
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Polls `GET /state` until it leaves `loading`.
pub async fn settled_state(app: &Router) -> Value {
    for _ in 0..200 {
        let (_, body) = send(app, json_request(Method::GET, "/state", None)).await;
        if body["state"] != "loading" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("state never left loading");
}

pub type Outcome = Result<Option<Identity>, VerifyError>;

/// Verifier whose answers are released by the test, one gate per token.
/// Unknown tokens never answer.
pub struct ScriptedVerifier {
    scripts: HashMap<String, (Arc<Notify>, Outcome)>,
    pub calls: AtomicUsize,
}

impl ScriptedVerifier {
    pub fn new(scripts: Vec<(&str, Outcome)>) -> Arc<Self> {
        Arc::new(ScriptedVerifier {
            scripts: scripts
                .into_iter()
                .map(|(token, outcome)| (token.to_string(), (Arc::new(Notify::new()), outcome)))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn release(&self, token: &str) {
        self.scripts[token].0.notify_one();
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Verifier for ScriptedVerifier {
    fn get_name(&self) -> &str {
        "scripted"
    }

    fn get_type(&self) -> &str {
        "test"
    }

    async fn verify(&self, credential: &Credential) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.scripts.get(credential.token()) {
            Some((gate, outcome)) => {
                gate.notified().await;
                outcome.clone()
            }
            None => futures::future::pending().await,
        }
    }
}

pub fn ann() -> Identity {
    Identity::new("u1", Some("Ann".to_string()))
}
