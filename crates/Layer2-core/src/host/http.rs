//! HTTP value types and handler traits
//!
//! 실제 라우팅/디스패치는 호스트 애플리케이션의 몫입니다.
//! 여기에는 플러그인이 선언하는 핸들러의 형태만 정의합니다.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// HttpMethod - 지원 메서드 (닫힌 집합)
// ============================================================================

/// 플러그인 라우트가 사용할 수 있는 메서드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 지원하지 않는 메서드 문자열
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

// ============================================================================
// Request / Response
// ============================================================================

/// 요청
#[derive(Debug, Clone)]
pub struct Request {
    pub method: HttpMethod,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

impl Request {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: Value::Null,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// 응답
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    pub fn ok() -> Self {
        Self::new(200, Value::Null)
    }

    pub fn json(body: Value) -> Self {
        Self::new(200, body).with_header("content-type", "application/json")
    }

    pub fn not_found() -> Self {
        Self::new(404, Value::String("Not Found".into()))
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Handler traits
// ============================================================================

/// 라우트 핸들러
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, request: &Request) -> anyhow::Result<Response>;
}

/// 미들웨어 처리 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// 다음 핸들러로 진행
    Continue,
    /// 여기서 응답
    Respond(Response),
}

/// 미들웨어
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: &Request) -> anyhow::Result<Flow>;
}

// ============================================================================
// 클로저 어댑터
// ============================================================================

struct FnRoute<F>(F);

#[async_trait]
impl<F, Fut> RouteHandler for FnRoute<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Response>> + Send,
{
    async fn handle(&self, request: &Request) -> anyhow::Result<Response> {
        (self.0)(request.clone()).await
    }
}

/// 클로저로 라우트 핸들러 생성
pub fn route_fn<F, Fut>(f: F) -> Arc<dyn RouteHandler>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Response>> + Send + 'static,
{
    Arc::new(FnRoute(f))
}

struct FnMiddleware<F>(F);

#[async_trait]
impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Flow>> + Send,
{
    async fn handle(&self, request: &Request) -> anyhow::Result<Flow> {
        (self.0)(request.clone()).await
    }
}

/// 클로저로 미들웨어 생성
pub fn middleware_fn<F, Fut>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Flow>> + Send + 'static,
{
    Arc::new(FnMiddleware(f))
}
