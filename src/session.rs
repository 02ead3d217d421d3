//! Session Attributes
//!
//! 세션 저장소 자체는 이 크레이트 범위 밖. 업스트림 세션 레이어가
//! 요청마다 읽기 전용 스냅샷을 request extension으로 넣어줌.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// 소셜 연결 정보가 저장되는 세션 키
pub const SESSION_USER_CONNECTION: &str = "MY_USER_CONNECTION";

/// 요청 범위 세션 스냅샷
#[derive(Debug, Clone, Default)]
pub struct Session {
    attributes: Arc<HashMap<String, Value>>,
}

impl Session {
    pub fn new(attributes: HashMap<String, Value>) -> Self {
        Self {
            attributes: Arc::new(attributes),
        }
    }

    /// 테스트/업스트림용 빌더
    pub fn with_attribute<T: Serialize>(self, key: &str, value: &T) -> serde_json::Result<Self> {
        let mut attributes = Arc::unwrap_or_clone(self.attributes);
        attributes.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(Self::new(attributes))
    }

    /// 타입 지정 조회
    ///
    /// 키가 없으면 `Ok(None)`, 디코딩 실패는 `Err`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> serde_json::Result<Option<T>> {
        match self.attributes.get(key) {
            Some(value) => serde_json::from_value(value.clone()).map(Some),
            None => Ok(None),
        }
    }
}
