//! Plugin Manager - 플러그인 라이프사이클 관리
//!
//! 등록 → 의존성 순서 로드 → 언로드/리로드를 담당합니다.
//!
//! - 변경 작업은 `&mut self`로만 가능하므로 한 번에 하나씩 순차 실행됩니다.
//! - 로드 실패 시 이미 로드된 플러그인은 되돌리지 않습니다.
//! - 호스트에 설치한 라우트/미들웨어는 언로드해도 제거되지 않습니다.

use super::descriptor::{PluginCommand, PluginDescriptor};
use super::events::{EventBus, EventType, PluginEvent};
use super::registry::{LoadedPlugin, PluginRegistry, PluginState};
use super::resolver::resolve_order;
use super::schema::{ConfigValidator, PluginConfig};
use super::traits::{ContextDirectory, GlobalRegistry, HookKind, PluginContext, PluginUtils};
use crate::host::{AssetInterceptor, HostApp, HttpMethod};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use trellis_foundation::{EnvSource, Error, HostSettings, Logger, ProcessEnv, Result, TracingLogger};

/// 플러그인 매니저 - 전체 플러그인 시스템 관리
pub struct PluginManager {
    /// 플러그인 레지스트리
    registry: PluginRegistry,

    /// 마운트 대상 호스트
    host: Arc<dyn HostApp>,

    /// 환경 변수 조회
    env: Arc<dyn EnvSource>,

    /// 루트 로거 (플러그인마다 child 생성)
    logger: Arc<dyn Logger>,

    /// 플러그인 간 공유 자원
    globals: Arc<GlobalRegistry>,

    /// 이벤트 버스
    event_bus: Arc<EventBus>,

    /// 로드된 컨텍스트 이름 인덱스 (의존성 조회용)
    contexts: Arc<ContextDirectory>,
}

impl PluginManager {
    /// 새 매니저 생성
    pub fn new(host: Arc<dyn HostApp>) -> Self {
        Self {
            registry: PluginRegistry::new(),
            host,
            env: Arc::new(ProcessEnv),
            logger: TracingLogger::shared("plugins"),
            globals: Arc::new(GlobalRegistry::new()),
            event_bus: Arc::new(EventBus::new()),
            contexts: Arc::new(ContextDirectory::new()),
        }
    }

    /// 빌더 패턴: 환경 변수 소스 지정
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// 빌더 패턴: 루트 로거 지정
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_globals(mut self, globals: Arc<GlobalRegistry>) -> Self {
        self.globals = globals;
        self
    }

    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    // ========================================================================
    // 등록
    // ========================================================================

    /// 플러그인 등록
    ///
    /// 모든 검사를 통과해야만 레지스트리에 저장됩니다.
    pub async fn register(&mut self, descriptor: PluginDescriptor, config: PluginConfig) -> Result<()> {
        descriptor.validate_identity()?;

        let name = descriptor.name.clone();

        if self.registry.contains(&name) {
            return Err(Error::AlreadyRegistered(name));
        }

        if let Some(missing) = descriptor
            .dependencies
            .iter()
            .find(|dep| !self.registry.contains(dep))
        {
            return Err(Error::MissingDependency {
                plugin: name,
                dependency: missing.clone(),
            });
        }

        for peer in &descriptor.peer_dependencies {
            if !self.registry.contains(peer) {
                warn!("Plugin {} peer dependency {} is not registered", name, peer);
            }
        }

        // 스키마는 호출자가 넘긴 설정만 검사하고, 기본값은 그 뒤에 병합
        if let Some(schema) = &descriptor.config_schema {
            let result = ConfigValidator::validate(&config, schema);
            if !result.valid {
                return Err(Error::ConfigValidation {
                    plugin: name,
                    errors: result.errors,
                });
            }
        }

        let mut effective = descriptor.default_config.clone();
        effective.extend(config);

        let version = descriptor.version.clone();
        if let Err(rejected) = self
            .registry
            .insert(LoadedPlugin::new(Arc::new(descriptor), effective))
        {
            return Err(Error::AlreadyRegistered(rejected.name().to_string()));
        }

        info!("Registered plugin: {} (v{})", name, version);
        self.event_bus
            .publish(PluginEvent::new(EventType::Registered, &name))
            .await;

        Ok(())
    }

    /// 호스트 설정 기반 등록
    ///
    /// 비활성화된 플러그인은 건너뛰고 `Ok(false)`를 반환합니다.
    pub async fn register_from_settings(
        &mut self,
        descriptor: PluginDescriptor,
        settings: &HostSettings,
    ) -> Result<bool> {
        if settings.is_disabled(&descriptor.name) {
            info!("Plugin {} is disabled by settings", descriptor.name);
            return Ok(false);
        }

        let config = settings.plugin_config(&descriptor.name);
        self.register(descriptor, config).await?;
        Ok(true)
    }

    // ========================================================================
    // 로드/언로드
    // ========================================================================

    /// 등록된 모든 플러그인을 의존성 순서대로 로드
    ///
    /// 첫 실패에서 중단하며, 그 전에 로드된 플러그인은 그대로 유지됩니다.
    pub async fn load_all(&mut self) -> Result<()> {
        let order = self.load_order()?;
        debug!("Plugin load order: {}", order.join(", "));

        for name in order {
            self.load_plugin(&name).await?;
        }

        Ok(())
    }

    /// 플러그인 로드 (이미 로드된 경우 아무것도 하지 않음)
    pub async fn load_plugin(&mut self, name: &str) -> Result<()> {
        let plugin = self
            .registry
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("Plugin {} not found", name)))?;

        if plugin.is_loaded() {
            debug!("Plugin {} is already loaded", name);
            return Ok(());
        }

        let descriptor = Arc::clone(plugin.descriptor());
        let config = plugin.config().clone();

        info!("Loading plugin: {} (v{})", name, descriptor.version);

        let context = match self.activate(&descriptor, config).await {
            Ok(context) => context,
            Err(e) => {
                error!("Plugin {} failed to load: {}", name, e);
                self.event_bus
                    .publish(PluginEvent::new(EventType::LoadFailed, name).with_detail(e.to_string()))
                    .await;
                return Err(e);
            }
        };

        self.contexts.publish(name, &context);
        if let Some(plugin) = self.registry.get_mut(name) {
            plugin.mark_loaded(context);
        }

        self.event_bus
            .publish(PluginEvent::new(EventType::Loaded, name))
            .await;

        info!("Plugin {} loaded successfully", name);
        Ok(())
    }

    /// 플러그인 언로드 (로드되지 않았으면 아무것도 하지 않음)
    pub async fn unload_plugin(&mut self, name: &str) -> Result<()> {
        let Some(plugin) = self.registry.get(name) else {
            debug!("Unload skipped, plugin {} is not registered", name);
            return Ok(());
        };

        let Some(context) = plugin.context().cloned() else {
            debug!("Unload skipped, plugin {} is not loaded", name);
            return Ok(());
        };

        info!("Unloading plugin: {}", name);

        if let Some(hook) = plugin.descriptor().hooks.get(HookKind::Teardown).cloned() {
            if let Err(e) = hook.call(Arc::clone(&context)).await {
                let err = Error::hook(name, HookKind::Teardown.as_str(), e);
                error!("{}", err);
                return Err(err);
            }
        }

        self.contexts.withdraw(name);
        if let Some(plugin) = self.registry.get_mut(name) {
            plugin.mark_unloaded();
        }
        drop(context);

        self.event_bus
            .publish(PluginEvent::new(EventType::Unloaded, name))
            .await;

        info!("Plugin {} unloaded", name);
        Ok(())
    }

    /// 플러그인 리로드 (언로드 후 로드)
    pub async fn reload(&mut self, name: &str) -> Result<()> {
        if !self.registry.contains(name) {
            return Err(Error::NotFound(format!("Plugin {} not found", name)));
        }

        info!("Reloading plugin: {}", name);

        self.unload_plugin(name).await?;
        self.load_plugin(name).await?;

        self.event_bus
            .publish(PluginEvent::new(EventType::Reloaded, name))
            .await;

        Ok(())
    }

    /// 컨텍스트 생성 → init → setup → 마운트
    async fn activate(
        &self,
        descriptor: &PluginDescriptor,
        config: PluginConfig,
    ) -> Result<Arc<PluginContext>> {
        let context = Arc::new(self.build_context(descriptor, config));

        for kind in [HookKind::Init, HookKind::Setup] {
            if let Some(hook) = descriptor.hooks.get(kind) {
                debug!("Running {} hook for plugin {}", kind, descriptor.name);
                hook.call(Arc::clone(&context))
                    .await
                    .map_err(|e| Error::hook(&descriptor.name, kind.as_str(), e))?;
            }
        }

        // 마운트 전에 모든 메서드를 검사
        let routes = descriptor
            .routes
            .iter()
            .map(|route| {
                route
                    .method
                    .parse::<HttpMethod>()
                    .map(|method| (method, route))
                    .map_err(|unknown| Error::UnsupportedMethod {
                        plugin: descriptor.name.clone(),
                        method: unknown.0,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        for middleware in &descriptor.middleware {
            debug!(
                "Plugin {} mounting middleware at {}",
                descriptor.name,
                middleware.mount_path()
            );
            self.host
                .mount_middleware(middleware.mount_path(), Arc::clone(&middleware.handler));
        }

        for (method, route) in routes {
            debug!("Plugin {} mounting route {} {}", descriptor.name, method, route.path);
            self.host
                .mount_route(method, &route.path, Arc::clone(&route.handler));
        }

        for asset in &descriptor.assets {
            let interceptor = AssetInterceptor::new(&asset.from, &asset.to);
            let path = interceptor.mount_path();
            debug!("Plugin {} mounting asset interceptor at {}", descriptor.name, path);
            self.host.mount_middleware(&path, Arc::new(interceptor));
        }

        Ok(context)
    }

    fn build_context(&self, descriptor: &PluginDescriptor, config: PluginConfig) -> PluginContext {
        let logger = self.logger.child(&descriptor.name);
        let utils = PluginUtils::new(
            Arc::clone(&self.env),
            Arc::clone(&logger),
            Arc::clone(&self.globals),
        );

        PluginContext::new(
            descriptor.name.clone(),
            Arc::clone(&self.host),
            config,
            logger,
            utils,
            descriptor.dependencies.clone(),
            Arc::clone(&self.contexts),
        )
    }

    // ========================================================================
    // 접근자
    // ========================================================================

    pub fn get_plugin(&self, name: &str) -> Option<&LoadedPlugin> {
        self.registry.get(name)
    }

    /// 등록 순서대로 전체 플러그인
    pub fn get_all_plugins(&self) -> Vec<&LoadedPlugin> {
        self.registry.iter().collect()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.registry.get(name).is_some_and(|p| p.is_loaded())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// 현재 레지스트리 기준 로드 순서
    pub fn load_order(&self) -> Result<Vec<String>> {
        resolve_order(self.registry.descriptors())
    }

    /// 로드된 플러그인이 제공하는 명령 (플러그인 이름, 명령)
    pub fn commands(&self) -> Vec<(&str, &PluginCommand)> {
        self.registry
            .iter()
            .filter(|p| p.is_loaded())
            .flat_map(|p| p.descriptor().commands.iter().map(move |c| (p.name(), c)))
            .collect()
    }

    pub fn host(&self) -> &Arc<dyn HostApp> {
        &self.host
    }

    pub fn globals(&self) -> &Arc<GlobalRegistry> {
        &self.globals
    }

    /// 이벤트 버스 접근
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// 플러그인 요약 정보
    pub fn summary(&self) -> PluginSummary {
        PluginSummary {
            total: self.registry.len(),
            registered: self.registry.count_in(PluginState::Registered),
            loaded: self.registry.count_in(PluginState::Loaded),
            unloaded: self.registry.count_in(PluginState::Unloaded),
        }
    }
}

/// 플러그인 시스템 요약
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginSummary {
    pub total: usize,
    pub registered: usize,
    pub loaded: usize,
    pub unloaded: usize,
}
