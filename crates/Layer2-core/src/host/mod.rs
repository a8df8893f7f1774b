//! # Host Application Interface
//!
//! 플러그인이 라우트/미들웨어를 설치하는 대상인 호스트 애플리케이션 계약.
//!
//! 매니저는 `HostApp`을 통해서만 호스트에 마운트하며, 요청 매칭과 디스패치는
//! 호스트가 담당합니다. 언마운트 기능은 없습니다.

mod http;

pub use http::{
    middleware_fn, route_fn, Flow, HttpMethod, Middleware, Request, Response, RouteHandler,
    UnknownMethod,
};

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// 호스트 애플리케이션이 제공하는 마운트 기능
pub trait HostApp: Send + Sync {
    /// 라우트 설치
    fn mount_route(&self, method: HttpMethod, path: &str, handler: Arc<dyn RouteHandler>);

    /// 미들웨어 설치
    fn mount_middleware(&self, path: &str, handler: Arc<dyn Middleware>);
}

// ============================================================================
// AssetInterceptor - 정적 자산 매핑
// ============================================================================

/// 자산 매핑 인터셉터
///
/// 호스트에 정적 파일 제공 기능이 없으므로 항상 404로 응답합니다.
pub struct AssetInterceptor {
    from: String,
    to: String,
}

impl AssetInterceptor {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// 인터셉터가 마운트될 경로 패턴
    pub fn mount_path(&self) -> String {
        format!("{}/*", self.to.trim_end_matches('/'))
    }

    pub fn source(&self) -> &str {
        &self.from
    }
}

#[async_trait]
impl Middleware for AssetInterceptor {
    async fn handle(&self, request: &Request) -> anyhow::Result<Flow> {
        tracing::debug!(
            "Asset request {} -> {} (no static serving available)",
            request.path,
            self.from
        );
        Ok(Flow::Respond(Response::not_found()))
    }
}

// ============================================================================
// MountTable - 마운트 기록용 HostApp
// ============================================================================

/// 마운트된 항목
#[derive(Clone)]
pub enum Mount {
    Route {
        method: HttpMethod,
        path: String,
        handler: Arc<dyn RouteHandler>,
    },
    Middleware {
        path: String,
        handler: Arc<dyn Middleware>,
    },
}

impl Mount {
    pub fn path(&self) -> &str {
        match self {
            Self::Route { path, .. } | Self::Middleware { path, .. } => path,
        }
    }
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Route { method, path, .. } => write!(f, "Route({} {})", method, path),
            Self::Middleware { path, .. } => write!(f, "Middleware({})", path),
        }
    }
}

/// 모든 마운트를 순서대로 기록하는 인메모리 호스트
///
/// 마운트 순서가 디스패치 우선순위이므로 순서를 그대로 보존합니다.
#[derive(Default)]
pub struct MountTable {
    mounts: RwLock<Vec<Mount>>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// 전체 마운트 (설치 순서)
    pub fn mounts(&self) -> Vec<Mount> {
        self.mounts.read().clone()
    }

    /// 라우트 목록 (method, path)
    pub fn routes(&self) -> Vec<(HttpMethod, String)> {
        self.mounts
            .read()
            .iter()
            .filter_map(|m| match m {
                Mount::Route { method, path, .. } => Some((*method, path.clone())),
                Mount::Middleware { .. } => None,
            })
            .collect()
    }

    /// 미들웨어 경로 목록
    pub fn middleware_paths(&self) -> Vec<String> {
        self.mounts
            .read()
            .iter()
            .filter_map(|m| match m {
                Mount::Middleware { path, .. } => Some(path.clone()),
                Mount::Route { .. } => None,
            })
            .collect()
    }

    /// 특정 라우트의 핸들러
    pub fn route(&self, method: HttpMethod, path: &str) -> Option<Arc<dyn RouteHandler>> {
        self.mounts.read().iter().find_map(|m| match m {
            Mount::Route {
                method: m_method,
                path: m_path,
                handler,
            } if *m_method == method && m_path == path => Some(Arc::clone(handler)),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.mounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.read().is_empty()
    }
}

impl HostApp for MountTable {
    fn mount_route(&self, method: HttpMethod, path: &str, handler: Arc<dyn RouteHandler>) {
        self.mounts.write().push(Mount::Route {
            method,
            path: path.to_string(),
            handler,
        });
    }

    fn mount_middleware(&self, path: &str, handler: Arc<dyn Middleware>) {
        self.mounts.write().push(Mount::Middleware {
            path: path.to_string(),
            handler,
        });
    }
}
