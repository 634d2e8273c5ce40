//! 集成测试公共工具
//!
//! 每个 TestApp 持有独立的内存数据库，通过 oneshot 直接驱动路由

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
};
use fitness_service::{routes, state::AppState};
use fitness_shared::config::ServerConfig;
use fitness_shared::test_utils::test_pool;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("响应体不是合法 JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("响应体不是合法 UTF-8")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// 统一响应中的 data 字段
    pub fn data(&self) -> Value {
        self.json()["data"].clone()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_server(ServerConfig::default()).await
    }

    pub async fn with_server(server: ServerConfig) -> Self {
        let pool = test_pool().await;
        let router = routes::app(AppState::new(pool.clone()), &server);
        Self { router, pool }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// 通过 API 创建每日记录，返回 ID
    pub async fn create_entry(&self, date: &str, weight: Option<f64>, calories: Option<f64>) -> i64 {
        let resp = self
            .post(
                "/api/daily-entries",
                serde_json::json!({ "date": date, "weight": weight, "calories": calories }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.text());
        resp.data()["id"].as_i64().unwrap()
    }

    /// 通过 API 创建运动记录，返回 ID
    pub async fn create_exercise(&self, entry_id: i64, exercise_type: &str, details: &str) -> i64 {
        let resp = self
            .post(
                "/api/exercises",
                serde_json::json!({ "entryId": entry_id, "type": exercise_type, "details": details }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.text());
        resp.data()["id"].as_i64().unwrap()
    }
}
