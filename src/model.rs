//! Model and View
//!
//! 핸들러와 에러 모두 `ModelAndView`를 반환하고, 실제 HTML 렌더링은
//! `advice::render_views` 미들웨어가 담당함.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

// ============ View Names ============

pub const HOME_VIEW: &str = "home";
pub const ERROR_404_VIEW: &str = "errors/404";
pub const ERROR_CUSTOM_VIEW: &str = "errors/custom";
pub const ERROR_CATEGORY_VIEW: &str = "errors/category";
pub const PRODUCT_MAP_VIEW: &str = "products/map";

// ============ Attribute Names ============

pub const ERROR_PAGE_TITLE_ATTRIBUTE: &str = "errortitle";
pub const ERROR_PAGE_MESSAGE_ATTRIBUTE: &str = "errormessage";
pub const LOCATION_ERROR_ATTRIBUTE: &str = "mappingError";
pub const CATEGORY_ATTRIBUTE: &str = "category";
pub const NEW_URL_ATTRIBUTE: &str = "newurl";

/// 뷰 렌더링 컨텍스트
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Model(Map<String, Value>);

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// 값 설정 (같은 이름이 있으면 덮어씀)
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// 같은 이름이 없을 때만 설정
    pub fn insert_if_absent(&mut self, name: &str, value: impl Into<Value>) {
        self.0.entry(name.to_string()).or_insert_with(|| value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// null/누락은 false
    pub fn get_bool(&self, name: &str) -> bool {
        self.0.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 렌더링 시점에 요청 locale로 해석될 메시지
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMessage {
    pub attribute: String,
    pub key: String,
    pub args: Vec<String>,
}

/// 뷰 이름 + 모델 + 상태 코드
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAndView {
    view: String,
    model: Model,
    status: StatusCode,
    messages: Vec<PendingMessage>,
}

impl ModelAndView {
    pub fn new(view: &str) -> Self {
        Self {
            view: view.to_string(),
            model: Model::new(),
            status: StatusCode::OK,
            messages: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn add_object(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.model.insert(name, value);
        self
    }

    /// 다국어 메시지 속성 추가 (렌더링 시 해석)
    pub fn add_message(mut self, name: &str, key: &str, args: &[&str]) -> Self {
        self.messages.push(PendingMessage {
            attribute: name.to_string(),
            key: key.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        });
        self
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn messages(&self) -> &[PendingMessage] {
        &self.messages
    }

    pub fn take_messages(&mut self) -> Vec<PendingMessage> {
        std::mem::take(&mut self.messages)
    }
}

/// 렌더 미들웨어가 꺼내갈 수 있도록 response extension에 보관.
/// 미들웨어 없이 쓰면 빈 body가 나감.
impl IntoResponse for ModelAndView {
    fn into_response(self) -> Response {
        let mut response = self.status.into_response();
        response.extensions_mut().insert(self);
        response
    }
}
