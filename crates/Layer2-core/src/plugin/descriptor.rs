//! Plugin Descriptor - 플러그인 메타데이터와 훅 정의
//!
//! 등록 이후에는 변경되지 않습니다. 매니저는 `Arc<PluginDescriptor>`로 공유합니다.

use super::schema::{ConfigSchema, PluginConfig};
use super::traits::{hook_fn, HookKind, LifecycleHook, PluginContext};
use crate::host::{Middleware, RouteHandler};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use trellis_foundation::{Error, Result};

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();
static VERSION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9_@/-]+$").expect("valid name pattern"))
}

fn version_pattern() -> &'static Regex {
    VERSION_PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+(-[a-zA-Z0-9-]+)?$").expect("valid version pattern")
    })
}

/// 이름 형식 검사 (`^[a-z0-9-_@/]+$`)
pub fn is_valid_name(name: &str) -> bool {
    name_pattern().is_match(name)
}

/// 버전 형식 검사 (`1.2.3`, `1.2.3-beta`)
pub fn is_valid_version(version: &str) -> bool {
    version_pattern().is_match(version)
}

// ============================================================================
// 선언 항목
// ============================================================================

/// 라우트 선언
///
/// 메서드는 문자열 그대로 보관하고 로드 시점에 검사합니다.
#[derive(Clone)]
pub struct RouteSpec {
    pub path: String,
    pub method: String,
    pub handler: Arc<dyn RouteHandler>,
}

impl RouteSpec {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        handler: Arc<dyn RouteHandler>,
    ) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            handler,
        }
    }
}

impl std::fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RouteSpec({} {})", self.method, self.path)
    }
}

/// 미들웨어 선언 (경로 기본값 `*`)
#[derive(Clone)]
pub struct MiddlewareSpec {
    pub path: Option<String>,
    pub handler: Arc<dyn Middleware>,
}

impl MiddlewareSpec {
    pub const DEFAULT_PATH: &'static str = "*";

    pub fn new(handler: Arc<dyn Middleware>) -> Self {
        Self {
            path: None,
            handler,
        }
    }

    pub fn at(path: impl Into<String>, handler: Arc<dyn Middleware>) -> Self {
        Self {
            path: Some(path.into()),
            handler,
        }
    }

    pub fn mount_path(&self) -> &str {
        self.path.as_deref().unwrap_or(Self::DEFAULT_PATH)
    }
}

impl std::fmt::Debug for MiddlewareSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MiddlewareSpec({})", self.mount_path())
    }
}

/// 정적 자산 매핑
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMapping {
    pub from: String,
    pub to: String,
}

impl AssetMapping {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// 플러그인이 제공하는 명령
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCommand {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PluginCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// 라이프사이클 훅 묶음
#[derive(Clone, Default)]
pub struct PluginHooks {
    pub init: Option<Arc<dyn LifecycleHook>>,
    pub setup: Option<Arc<dyn LifecycleHook>>,
    pub teardown: Option<Arc<dyn LifecycleHook>>,
}

impl PluginHooks {
    pub fn get(&self, kind: HookKind) -> Option<&Arc<dyn LifecycleHook>> {
        match kind {
            HookKind::Init => self.init.as_ref(),
            HookKind::Setup => self.setup.as_ref(),
            HookKind::Teardown => self.teardown.as_ref(),
        }
    }
}

// ============================================================================
// PluginDescriptor
// ============================================================================

/// 플러그인 디스크립터 - 플러그인의 모든 메타데이터와 훅
#[derive(Clone)]
pub struct PluginDescriptor {
    /// 고유 이름 (예: "email", "@acme/billing")
    pub name: String,

    pub version: String,

    pub description: Option<String>,

    pub author: Option<String>,

    pub license: Option<String>,

    /// 먼저 등록/로드되어야 하는 플러그인
    pub dependencies: Vec<String>,

    /// 권고용 (로드 순서에 영향 없음)
    pub peer_dependencies: Vec<String>,

    pub config_schema: Option<ConfigSchema>,

    pub default_config: PluginConfig,

    pub hooks: PluginHooks,

    pub routes: Vec<RouteSpec>,

    pub middleware: Vec<MiddlewareSpec>,

    pub assets: Vec<AssetMapping>,

    pub commands: Vec<PluginCommand>,

    /// 클라이언트 측 확장 (해석하지 않고 전달만 함)
    pub client_extensions: Vec<Value>,
}

impl PluginDescriptor {
    /// 새 디스크립터 생성
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            author: None,
            license: None,
            dependencies: vec![],
            peer_dependencies: vec![],
            config_schema: None,
            default_config: PluginConfig::new(),
            hooks: PluginHooks::default(),
            routes: vec![],
            middleware: vec![],
            assets: vec![],
            commands: vec![],
            client_extensions: vec![],
        }
    }

    /// 이름/버전 형식 검사
    pub fn validate_identity(&self) -> Result<()> {
        if !is_valid_name(&self.name) {
            return Err(Error::Identity {
                field: "name",
                value: self.name.clone(),
            });
        }
        if !is_valid_version(&self.version) {
            return Err(Error::Identity {
                field: "version",
                value: self.version.clone(),
            });
        }
        Ok(())
    }

    /// 빌더 패턴: 설명 설정
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// 빌더 패턴: 작성자 설정
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// 빌더 패턴: 의존성 추가
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    pub fn with_peer_dependency(mut self, name: impl Into<String>) -> Self {
        self.peer_dependencies.push(name.into());
        self
    }

    pub fn with_config_schema(mut self, schema: ConfigSchema) -> Self {
        self.config_schema = Some(schema);
        self
    }

    /// 빌더 패턴: 기본 설정 (object가 아니면 무시)
    pub fn with_default_config(mut self, config: Value) -> Self {
        if let Value::Object(map) = config {
            self.default_config = map;
        }
        self
    }

    pub fn with_hook(mut self, kind: HookKind, hook: Arc<dyn LifecycleHook>) -> Self {
        match kind {
            HookKind::Init => self.hooks.init = Some(hook),
            HookKind::Setup => self.hooks.setup = Some(hook),
            HookKind::Teardown => self.hooks.teardown = Some(hook),
        }
        self
    }

    pub fn on_init<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Arc<PluginContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.with_hook(HookKind::Init, hook_fn(f))
    }

    pub fn on_setup<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Arc<PluginContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.with_hook(HookKind::Setup, hook_fn(f))
    }

    pub fn on_teardown<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Arc<PluginContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.with_hook(HookKind::Teardown, hook_fn(f))
    }

    /// 빌더 패턴: 라우트 추가
    pub fn with_route(
        mut self,
        method: impl Into<String>,
        path: impl Into<String>,
        handler: Arc<dyn RouteHandler>,
    ) -> Self {
        self.routes.push(RouteSpec::new(method, path, handler));
        self
    }

    pub fn with_middleware(mut self, spec: MiddlewareSpec) -> Self {
        self.middleware.push(spec);
        self
    }

    pub fn with_asset(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.assets.push(AssetMapping::new(from, to));
        self
    }

    pub fn with_command(mut self, command: PluginCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_client_extension(mut self, extension: Value) -> Self {
        self.client_extensions.push(extension);
        self
    }
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("dependencies", &self.dependencies)
            .field("routes", &self.routes)
            .field("middleware", &self.middleware)
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{middleware_fn, route_fn, Flow, Response};
    use serde_json::json;

    #[test]
    fn test_name_format() {
        for name in ["email", "auth-jwt", "my_plugin", "@acme/billing", "v2"] {
            assert!(is_valid_name(name), "{name} should be valid");
        }
        for name in ["Bad Name!", "Email", "", "a b", "emoji✓"] {
            assert!(!is_valid_name(name), "{name} should be invalid");
        }
    }

    #[test]
    fn test_version_format() {
        for version in ["1.0.0", "0.12.3", "2.0.0-beta", "1.0.0-rc-1"] {
            assert!(is_valid_version(version), "{version} should be valid");
        }
        // 숫자는 ASCII만 허용
        for version in ["1.0", "v1.0.0", "1.0.0-", "1.0.0+build", "latest", "١.٠.٠", "１.0.0"] {
            assert!(!is_valid_version(version), "{version} should be invalid");
        }
    }

    #[test]
    fn test_validate_identity() {
        let ok = PluginDescriptor::new("email", "1.0.0");
        assert!(ok.validate_identity().is_ok());

        let bad_name = PluginDescriptor::new("Bad Name!", "1.0.0");
        assert!(matches!(
            bad_name.validate_identity(),
            Err(Error::Identity { field: "name", .. })
        ));

        let bad_version = PluginDescriptor::new("email", "one");
        assert!(matches!(
            bad_version.validate_identity(),
            Err(Error::Identity { field: "version", .. })
        ));
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = PluginDescriptor::new("notifications", "1.2.0")
            .with_description("Sends notifications")
            .with_author("Trellis")
            .with_license("MIT")
            .with_dependency("email")
            .with_peer_dependency("sms")
            .with_default_config(json!({ "retries": 3 }))
            .with_route("GET", "/notifications", route_fn(|_| async { Ok(Response::ok()) }))
            .with_middleware(MiddlewareSpec::new(middleware_fn(|_| async {
                Ok(Flow::Continue)
            })))
            .with_asset("./public", "/notifications/static")
            .with_command(PluginCommand::new("notify:test").with_description("Send a test"))
            .with_client_extension(json!({ "widget": "bell" }))
            .on_init(|_| async { Ok(()) });

        assert_eq!(descriptor.dependencies, vec!["email"]);
        assert_eq!(descriptor.peer_dependencies, vec!["sms"]);
        assert_eq!(descriptor.default_config["retries"], json!(3));
        assert_eq!(descriptor.routes[0].method, "GET");
        assert_eq!(descriptor.middleware[0].mount_path(), "*");
        assert_eq!(descriptor.assets[0].to, "/notifications/static");
        assert_eq!(descriptor.commands[0].name, "notify:test");
        assert!(descriptor.hooks.get(HookKind::Init).is_some());
        assert!(descriptor.hooks.get(HookKind::Teardown).is_none());
    }

    #[test]
    fn test_non_object_default_config_ignored() {
        let descriptor = PluginDescriptor::new("x", "1.0.0").with_default_config(json!([1, 2]));
        assert!(descriptor.default_config.is_empty());
    }
}
