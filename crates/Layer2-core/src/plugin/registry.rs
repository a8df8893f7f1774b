//! Plugin Registry - 플러그인 저장소
//!
//! 모든 `LoadedPlugin`을 하나의 Vec에 보관하고 이름 인덱스로 조회합니다.
//! 항목은 제거되지 않으므로 인덱스는 등록 이후 고정되며,
//! 순회 순서는 등록 순서와 같습니다.

use super::descriptor::PluginDescriptor;
use super::schema::PluginConfig;
use super::traits::PluginContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 플러그인 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginState {
    /// 등록됨 (로드 실패 시에도 이 상태 유지)
    Registered,
    /// 로드됨
    Loaded,
    /// 언로드됨
    Unloaded,
}

impl std::fmt::Display for PluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registered => write!(f, "registered"),
            Self::Loaded => write!(f, "loaded"),
            Self::Unloaded => write!(f, "unloaded"),
        }
    }
}

/// 매니저가 추적하는 플러그인 레코드
///
/// `context`는 상태가 `Loaded`일 때만 존재합니다.
pub struct LoadedPlugin {
    descriptor: Arc<PluginDescriptor>,
    config: PluginConfig,
    state: PluginState,
    context: Option<Arc<PluginContext>>,
    registered_at: chrono::DateTime<chrono::Utc>,
}

impl LoadedPlugin {
    pub(crate) fn new(descriptor: Arc<PluginDescriptor>, config: PluginConfig) -> Self {
        Self {
            descriptor,
            config,
            state: PluginState::Registered,
            context: None,
            registered_at: chrono::Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &Arc<PluginDescriptor> {
        &self.descriptor
    }

    /// 병합된 유효 설정 (기본값 + 호출자 설정)
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn state(&self) -> PluginState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == PluginState::Loaded
    }

    pub fn context(&self) -> Option<&Arc<PluginContext>> {
        self.context.as_ref()
    }

    pub fn registered_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.registered_at
    }

    pub(crate) fn mark_loaded(&mut self, context: Arc<PluginContext>) {
        self.state = PluginState::Loaded;
        self.context = Some(context);
    }

    /// 언로드 상태로 전환하고 보관하던 컨텍스트를 돌려줌
    pub(crate) fn mark_unloaded(&mut self) -> Option<Arc<PluginContext>> {
        self.state = PluginState::Unloaded;
        self.context.take()
    }
}

impl std::fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("name", &self.descriptor.name)
            .field("version", &self.descriptor.version)
            .field("state", &self.state)
            .field("config", &self.config)
            .finish()
    }
}

/// 플러그인 레지스트리 - 등록 순서를 보존하는 아레나
#[derive(Default)]
pub struct PluginRegistry {
    entries: Vec<LoadedPlugin>,
    index: HashMap<String, usize>,
}

impl PluginRegistry {
    /// 새 레지스트리 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드 추가
    ///
    /// 이미 있는 이름이면 레코드를 그대로 돌려줍니다.
    pub(crate) fn insert(&mut self, plugin: LoadedPlugin) -> std::result::Result<(), LoadedPlugin> {
        if self.index.contains_key(plugin.name()) {
            return Err(plugin);
        }

        let slot = self.entries.len();
        debug!("Registry slot {} -> {}", slot, plugin.name());
        self.index.insert(plugin.name().to_string(), slot);
        self.entries.push(plugin);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LoadedPlugin> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut LoadedPlugin> {
        match self.index.get(name) {
            Some(&slot) => self.entries.get_mut(slot),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// 등록 순서대로 순회
    pub fn iter(&self) -> impl Iterator<Item = &LoadedPlugin> {
        self.entries.iter()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.entries.iter().map(|p| p.descriptor.as_ref())
    }

    pub fn count_in(&self, state: PluginState) -> usize {
        self.entries.iter().filter(|p| p.state == state).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
