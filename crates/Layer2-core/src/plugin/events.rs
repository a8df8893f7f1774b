//! Plugin Events - 라이프사이클 이벤트 버스

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

// ============================================================================
// PluginEvent - 라이프사이클 이벤트
// ============================================================================

/// 플러그인 라이프사이클 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginEvent {
    /// 이벤트 타입
    pub event_type: EventType,

    /// 대상 플러그인
    pub plugin: String,

    /// 타임스탬프
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// 부가 정보 (실패 메시지 등)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl PluginEvent {
    /// 새 이벤트 생성
    pub fn new(event_type: EventType, plugin: impl Into<String>) -> Self {
        Self {
            event_type,
            plugin: plugin.into(),
            timestamp: chrono::Utc::now(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// 이벤트 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Registered,
    Loaded,
    LoadFailed,
    Unloaded,
    Reloaded,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registered => write!(f, "registered"),
            Self::Loaded => write!(f, "loaded"),
            Self::LoadFailed => write!(f, "load_failed"),
            Self::Unloaded => write!(f, "unloaded"),
            Self::Reloaded => write!(f, "reloaded"),
        }
    }
}

// ============================================================================
// PluginEventHandler - 이벤트 핸들러 트레이트
// ============================================================================

/// 이벤트 핸들러 트레이트
#[async_trait]
pub trait PluginEventHandler: Send + Sync {
    /// 핸들러 이름
    fn name(&self) -> &str;

    /// 관심 있는 이벤트 타입들
    fn interested_events(&self) -> Vec<EventType>;

    /// 이벤트 처리
    async fn handle(&self, event: &PluginEvent);
}

// ============================================================================
// EventBus - 이벤트 버스 (발행/구독)
// ============================================================================

/// 이벤트 버스 - 이벤트 발행 및 구독 관리
pub struct EventBus {
    /// 브로드캐스트 채널 발신자
    sender: broadcast::Sender<PluginEvent>,

    /// 등록된 핸들러
    handlers: RwLock<HashMap<String, Arc<dyn PluginEventHandler>>>,

    /// 이벤트 히스토리 (최근 N개)
    history: RwLock<Vec<PluginEvent>>,

    /// 히스토리 최대 크기
    history_size: usize,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_capacity(256, 100)
    }

    /// 용량 지정하여 생성
    pub fn with_capacity(channel_capacity: usize, history_size: usize) -> Self {
        let (sender, _) = broadcast::channel(channel_capacity);
        Self {
            sender,
            handlers: RwLock::new(HashMap::new()),
            history: RwLock::new(Vec::with_capacity(history_size)),
            history_size,
        }
    }

    /// 이벤트 핸들러 등록
    pub async fn register_handler(&self, handler: Arc<dyn PluginEventHandler>) {
        let name = handler.name().to_string();
        let mut handlers = self.handlers.write().await;
        handlers.insert(name, handler);
    }

    /// 이벤트 핸들러 제거
    pub async fn unregister_handler(&self, name: &str) {
        let mut handlers = self.handlers.write().await;
        handlers.remove(name);
    }

    /// 이벤트 발행
    pub async fn publish(&self, event: PluginEvent) {
        debug!("Publishing event: {} ({})", event.event_type, event.plugin);

        {
            let mut history = self.history.write().await;
            if self.history_size > 0 && history.len() >= self.history_size {
                history.remove(0);
            }
            if self.history_size > 0 {
                history.push(event.clone());
            }
        }

        // 구독자가 없어도 OK
        let _ = self.sender.send(event.clone());

        let handlers: Vec<_> = self.handlers.read().await.values().cloned().collect();
        for handler in handlers {
            if handler.interested_events().contains(&event.event_type) {
                handler.handle(&event).await;
            }
        }
    }

    /// 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<PluginEvent> {
        self.sender.subscribe()
    }

    /// 이벤트 히스토리 조회
    pub async fn history(&self) -> Vec<PluginEvent> {
        self.history.read().await.clone()
    }

    /// 특정 타입의 이벤트 히스토리 조회
    pub async fn history_by_type(&self, event_type: EventType) -> Vec<PluginEvent> {
        let history = self.history.read().await;
        history
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// 특정 플러그인의 이벤트 히스토리
    pub async fn history_for(&self, plugin: &str) -> Vec<PluginEvent> {
        let history = self.history.read().await;
        history
            .iter()
            .filter(|e| e.plugin == plugin)
            .cloned()
            .collect()
    }

    /// 히스토리 클리어
    pub async fn clear_history(&self) {
        self.history.write().await.clear();
    }

    /// 등록된 핸들러 수
    pub async fn handler_count(&self) -> usize {
        self.handlers.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
