//! Plugin traits - 라이프사이클 훅과 플러그인 컨텍스트

use super::schema::PluginConfig;
use crate::host::HostApp;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use trellis_foundation::{EnvSource, Logger};
use tracing::warn;

// ============================================================================
// LifecycleHook - init / setup / teardown
// ============================================================================

/// 훅 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Init,
    Setup,
    Teardown,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Setup => "setup",
            Self::Teardown => "teardown",
        }
    }
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 라이프사이클 훅
///
/// 훅은 임의 지점에서 대기할 수 있으며, 매니저는 완료될 때까지 기다립니다.
/// 시간 제한은 없습니다.
#[async_trait]
pub trait LifecycleHook: Send + Sync {
    async fn call(&self, ctx: Arc<PluginContext>) -> anyhow::Result<()>;
}

struct FnHook<F>(F);

#[async_trait]
impl<F, Fut> LifecycleHook for FnHook<F>
where
    F: Fn(Arc<PluginContext>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn call(&self, ctx: Arc<PluginContext>) -> anyhow::Result<()> {
        (self.0)(ctx).await
    }
}

/// 클로저로 훅 생성
pub fn hook_fn<F, Fut>(f: F) -> Arc<dyn LifecycleHook>
where
    F: Fn(Arc<PluginContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(FnHook(f))
}

// ============================================================================
// GlobalRegistry - 플러그인 간 공유 자원
// ============================================================================

/// placeholder DB 접근자가 조회하는 전역 이름
pub const DATABASE_GLOBAL: &str = "database";

/// 매니저 단위 공유 자원 저장소
///
/// 먼저 로드된 플러그인이 등록한 자원을 이후 플러그인이 조회합니다.
#[derive(Default)]
pub struct GlobalRegistry {
    values: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl GlobalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 자원 등록 (같은 이름이면 교체)
    pub fn register(&self, name: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        let name = name.into();
        if self.values.write().insert(name.clone(), value).is_some() {
            warn!("Global '{}' was replaced", name);
        }
    }

    /// 타입을 지정해 조회 (타입이 다르면 None)
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let value = self.values.read().get(name).cloned()?;
        value.downcast::<T>().ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.read().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.values.read().keys().cloned().collect();
        names.sort();
        names
    }
}

// ============================================================================
// PluginUtils - 유틸리티 묶음
// ============================================================================

/// 플러그인에 제공되는 유틸리티
#[derive(Clone)]
pub struct PluginUtils {
    env: Arc<dyn EnvSource>,
    logger: Arc<dyn Logger>,
    globals: Arc<GlobalRegistry>,
}

impl PluginUtils {
    pub fn new(
        env: Arc<dyn EnvSource>,
        logger: Arc<dyn Logger>,
        globals: Arc<GlobalRegistry>,
    ) -> Self {
        Self {
            env,
            logger,
            globals,
        }
    }

    /// 환경 변수 (없으면 fallback)
    pub fn env(&self, key: &str, fallback: &str) -> String {
        self.env.get_or(key, fallback)
    }

    /// 플러그인 로거 아래 스코프 로거 생성
    pub fn create_logger(&self, scope: &str) -> Arc<dyn Logger> {
        self.logger.child(scope)
    }

    /// 전역 자원 등록
    pub fn register_global<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
        self.globals.register(name, Arc::new(value));
    }

    /// 전역 자원 조회
    pub fn global<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.globals.get(name)
    }

    /// 지정 시간 대기
    pub async fn delay(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// DB 접근자 (placeholder)
    ///
    /// 별도 DB 계층이 없으므로 `"database"` 전역으로 등록된 값을 돌려줍니다.
    pub fn database<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.globals.get(DATABASE_GLOBAL)
    }
}

// ============================================================================
// ContextDirectory - 로드된 컨텍스트의 이름 인덱스
// ============================================================================

/// 현재 로드된 플러그인 컨텍스트를 이름으로 찾는 디렉터리
///
/// 매니저가 로드/언로드 시점에 갱신합니다. 리로드되면 같은 이름이
/// 새 컨텍스트를 가리키므로, 의존 플러그인은 항상 최신 컨텍스트를 봅니다.
/// 컨텍스트 소유권은 레지스트리에 있고 여기에는 `Weak`만 둡니다.
#[derive(Default)]
pub struct ContextDirectory {
    contexts: RwLock<HashMap<String, Weak<PluginContext>>>,
}

impl ContextDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn publish(&self, name: &str, context: &Arc<PluginContext>) {
        self.contexts
            .write()
            .insert(name.to_string(), Arc::downgrade(context));
    }

    pub(crate) fn withdraw(&self, name: &str) {
        self.contexts.write().remove(name);
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<PluginContext>> {
        self.contexts.read().get(name).and_then(Weak::upgrade)
    }
}

// ============================================================================
// PluginContext - 로드마다 새로 만드는 컨텍스트
// ============================================================================

/// 플러그인 컨텍스트 - 훅에 전달되는 스코프 기능 묶음
///
/// 의존성 컨텍스트는 이름으로 `ContextDirectory`에서 매번 조회합니다.
/// 의존 플러그인이 언로드되면 None, 리로드되면 새 컨텍스트가 나옵니다.
pub struct PluginContext {
    plugin: String,
    host: Arc<dyn HostApp>,
    config: PluginConfig,
    logger: Arc<dyn Logger>,
    utils: PluginUtils,
    dependencies: Vec<String>,
    directory: Arc<ContextDirectory>,
}

impl PluginContext {
    pub fn new(
        plugin: impl Into<String>,
        host: Arc<dyn HostApp>,
        config: PluginConfig,
        logger: Arc<dyn Logger>,
        utils: PluginUtils,
        dependencies: Vec<String>,
        directory: Arc<ContextDirectory>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            host,
            config,
            logger,
            utils,
            dependencies,
            directory,
        }
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin
    }

    /// 호스트 애플리케이션 핸들
    pub fn host(&self) -> &Arc<dyn HostApp> {
        &self.host
    }

    // ========================================================================
    // 설정
    // ========================================================================

    /// 유효 설정 (기본값 + 호출자 설정)
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// 설정을 타입으로 역직렬화
    pub fn config_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.config.clone()))
    }

    // ========================================================================
    // 로깅 / 유틸리티
    // ========================================================================

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    pub fn utils(&self) -> &PluginUtils {
        &self.utils
    }

    // ========================================================================
    // 의존성
    // ========================================================================

    /// 로드된 의존 플러그인의 컨텍스트 (선언하지 않은 이름은 None)
    pub fn dependency(&self, name: &str) -> Option<Arc<PluginContext>> {
        if !self.dependencies.iter().any(|dep| dep == name) {
            return None;
        }
        self.directory.lookup(name)
    }

    /// 현재 로드되어 있는 의존성 이름
    pub fn loaded_dependencies(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .dependencies
            .iter()
            .filter(|dep| self.directory.lookup(dep).is_some())
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("plugin", &self.plugin)
            .field("config", &self.config)
            .field("logger", &self.logger.scope())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}
