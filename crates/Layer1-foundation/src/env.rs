//! Environment - 환경 변수 조회
//!
//! 플러그인은 프로세스 환경에 직접 접근하지 않고 `EnvSource`를 통해 조회합니다.
//! 테스트에서는 `MapEnv`로 고정된 값을 주입합니다.

use std::collections::HashMap;
use std::env;

/// 환경 변수 소스
pub trait EnvSource: Send + Sync {
    /// 값 조회 (없으면 None)
    fn get(&self, key: &str) -> Option<String>;

    /// 값 조회, 없으면 fallback
    fn get_or(&self, key: &str, fallback: &str) -> String {
        self.get(key).unwrap_or_else(|| fallback.to_string())
    }
}

/// 프로세스 환경 변수
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// 고정된 맵 기반 환경
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl FromIterator<(String, String)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}
