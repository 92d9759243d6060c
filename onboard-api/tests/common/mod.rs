//! Common test utilities for API tests
//!
//! This module provides shared infrastructure for the API tests:
//! - In-memory database with migrations and the default paths
//! - Router built around a scripted or unavailable completion provider
//! - Request helpers returning status and JSON body

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use onboard_api::app::{build_router, AppState};
use onboard_api::config::Config;
use onboard_shared::classifier::{
    CompletionError, CompletionProvider, PathClassifier, UnavailableProvider,
};
use onboard_shared::db::migrations::run_migrations;
use onboard_shared::db::pool::{create_pool, DatabaseConfig};
use onboard_shared::db::DbPool;
use onboard_shared::models::onboarding_path::OnboardingPath;
use serde_json::Value;
use std::sync::Arc;
use tower::Service as _;

/// Completion provider answering every prompt with the same text
pub struct ScriptedProvider {
    pub reply: String,
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, CompletionError> {
        Ok(self.reply.clone())
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: DbPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Context whose completion service is unreachable, so every
    /// classification takes the fallback
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_provider(Arc::new(UnavailableProvider)).await
    }

    /// Context whose completion service always answers `reply`
    pub async fn with_reply(reply: &str) -> anyhow::Result<Self> {
        Self::with_provider(Arc::new(ScriptedProvider {
            reply: reply.to_string(),
        }))
        .await
    }

    pub async fn with_provider(provider: Arc<dyn CompletionProvider>) -> anyhow::Result<Self> {
        let config = Config::from_lookup(|key: &str| match key {
            "JWT_SECRET" => Some("test-secret-key-at-least-32-characters".to_string()),
            "DB_PATH" => Some(":memory:".to_string()),
            _ => None,
        })?;

        let db = create_pool(DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;
        OnboardingPath::seed_defaults(&db).await?;

        let state = AppState::with_classifier(db.clone(), config.clone(), PathClassifier::new(provider));
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request and returns the status with the parsed JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, body)
    }

    /// Signs up and returns the session token
    pub async fn signup(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/signup",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Submits the onboarding profile for `token`
    pub async fn submit_profile(&self, token: &str, role: &str) -> (StatusCode, Value) {
        self.send(
            "PUT",
            "/api/users/profile",
            Some(token),
            Some(serde_json::json!({
                "role": role,
                "team_size": "6-20 people",
                "goal": "Grow revenue and hire a team"
            })),
        )
        .await
    }
}
