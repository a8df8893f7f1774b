//! # Plugin System
//!
//! 호스트 애플리케이션 기능 조합용 플러그인 시스템
//!
//! ## 개요
//!
//! 플러그인은 선언형 디스크립터로 다음을 제공합니다:
//! - 설정 스키마와 기본 설정
//! - 라이프사이클 훅 (init / setup / teardown)
//! - 라우트, 미들웨어, 정적 자산 매핑
//! - 명령과 클라이언트 확장 (전달만 함)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PluginManager                           │
//! │  ┌───────────────────────────────────────────────────────┐ │
//! │  │            PluginRegistry (Vec + name index)           │ │
//! │  │  ┌────────────┬────────────┬────────────────────┐    │ │
//! │  │  │ email      │ notify     │ billing            │    │ │
//! │  │  │ (loaded)   │ (loaded)   │ (registered)       │    │ │
//! │  │  └────────────┴────────────┴────────────────────┘    │ │
//! │  └───────────────────────────────────────────────────────┘ │
//! │        │ resolve_order              │ mount                 │
//! │  ┌─────┴───────────────┐   ┌────────┴──────────────────┐   │
//! │  │  PluginContext      │   │  HostApp                  │   │
//! │  │  - config / logger  │   │  - mount_route            │   │
//! │  │  - PluginUtils      │   │  - mount_middleware       │   │
//! │  │  - dependencies     │   └───────────────────────────┘   │
//! │  └─────────────────────┘                                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 예시
//!
//! ```ignore
//! let host = MountTable::shared();
//! let mut manager = PluginManager::new(host.clone());
//!
//! manager.register(
//!     PluginDescriptor::new("email", "1.0.0")
//!         .with_default_config(json!({ "host": "localhost" }))
//!         .on_init(|ctx| async move {
//!             ctx.logger().info("email ready");
//!             Ok(())
//!         }),
//!     PluginConfig::new(),
//! ).await?;
//!
//! manager.load_all().await?;
//! ```

mod descriptor;
mod events;
mod manager;
mod registry;
mod resolver;
mod schema;
mod traits;

pub use descriptor::{
    is_valid_name, is_valid_version, AssetMapping, MiddlewareSpec, PluginCommand,
    PluginDescriptor, PluginHooks, RouteSpec,
};
pub use events::{EventBus, EventType, PluginEvent, PluginEventHandler};
pub use manager::{PluginManager, PluginSummary};
pub use registry::{LoadedPlugin, PluginRegistry, PluginState};
pub use resolver::resolve_order;
pub use schema::{
    CheckOutcome, ConfigSchema, ConfigValidator, CustomValidator, PluginConfig, PropertySchema,
    PropertyType, ValidationResult,
};
pub use traits::{
    hook_fn, ContextDirectory, GlobalRegistry, HookKind, LifecycleHook, PluginContext, PluginUtils,
    DATABASE_GLOBAL,
};
