//! trellis-core: Core Runtime for Trellis
//!
//! Layer2 - 플러그인 조합 레이어
//!
//! # 주요 모듈
//!
//! - `host`: 호스트 애플리케이션 인터페이스 (라우트/미들웨어 마운트)
//! - `plugin`: 플러그인 등록, 의존성 순서 로드, 언로드/리로드
//!
//! # 사용 예시
//!
//! ```ignore
//! use trellis_core::{MountTable, PluginConfig, PluginDescriptor, PluginManager};
//! use trellis_foundation::{init_logging_from, SettingsLoader};
//!
//! let settings = SettingsLoader::new(&std::env::current_dir()?).load_all();
//! init_logging_from(&settings);
//!
//! let host = MountTable::shared();
//! let mut plugins = PluginManager::new(host.clone());
//!
//! plugins
//!     .register(PluginDescriptor::new("email", "1.0.0"), PluginConfig::new())
//!     .await?;
//! plugins
//!     .register(
//!         PluginDescriptor::new("notifications", "1.0.0").with_dependency("email"),
//!         PluginConfig::new(),
//!     )
//!     .await?;
//!
//! // email → notifications 순서로 로드
//! plugins.load_all().await?;
//! ```

// Core modules
pub mod host;
pub mod plugin;

// Re-exports: Host
pub use host::{
    middleware_fn, route_fn, AssetInterceptor, Flow, HostApp, HttpMethod, Middleware, Mount,
    MountTable, Request, Response, RouteHandler,
};

// Re-exports: Plugin
pub use plugin::{
    // Resolver
    resolve_order,
    // Events
    EventBus,
    EventType,
    // Context
    GlobalRegistry,
    HookKind,
    LifecycleHook,
    // Registry
    LoadedPlugin,
    // Descriptor
    MiddlewareSpec,
    PluginCommand,
    // Schema
    ConfigSchema,
    ConfigValidator,
    PluginConfig,
    PluginContext,
    PluginDescriptor,
    PluginEvent,
    // Manager
    PluginManager,
    PluginState,
    PluginSummary,
    PluginUtils,
    PropertySchema,
    PropertyType,
    ValidationResult,
};

// Layer1 re-exports
pub use trellis_foundation::{Error, Result};

/// Layer2 버전
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
