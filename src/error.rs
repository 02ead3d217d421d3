//! Error Handling Module
//!
//! Maps the application's error kinds onto error views.
//! Uses thiserror for domain errors and integrates with tracing for structured logging.

use askama::{Html, MarkupDisplay};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::messages::LOCATION_ERROR_MESSAGE_KEY;
use crate::model::{
    ModelAndView, CATEGORY_ATTRIBUTE, ERROR_404_VIEW, ERROR_CATEGORY_VIEW, ERROR_CUSTOM_VIEW,
    ERROR_PAGE_MESSAGE_ATTRIBUTE, ERROR_PAGE_TITLE_ATTRIBUTE, HOME_VIEW, LOCATION_ERROR_ATTRIBUTE,
    NEW_URL_ATTRIBUTE, PRODUCT_MAP_VIEW,
};

/// 웹 에러 타입
///
/// # Design Decision
///
/// 각 에러 variant는 하나의 뷰에 매핑됨 (terminal, 재시도 없음).
/// 원래 request attribute로 전달되던 값(category, postName, location,
/// postTitle)은 variant 필드로 들고 다님.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Category {category} not supported for post {post_name}")]
    CategoryNotSupported { category: String, post_name: String },

    #[error("Resource not found")]
    ResourceNotFound,

    #[error("Contact not found")]
    ContactNotFound,

    #[error("Could not geolocate {location}")]
    GeoLocation { location: String },

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Duplicate post name: {post_title}")]
    DuplicatePostName { post_title: String },

    #[error("Post not found")]
    PostNotFound,

    // ============ 500 Internal Server Error ============
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WebError {
    /// 에러 → 뷰 매핑 테이블
    pub fn to_model_and_view(&self) -> ModelAndView {
        match self {
            WebError::CategoryNotSupported { category, post_name } => {
                tracing::info!(%category, %post_name, "post category not supported");
                ModelAndView::new(ERROR_CATEGORY_VIEW)
                    .with_status(StatusCode::NOT_FOUND)
                    .add_object(CATEGORY_ATTRIBUTE, category.as_str())
                    .add_object(NEW_URL_ATTRIBUTE, format!("/post/{post_name}"))
            }
            WebError::ResourceNotFound => {
                tracing::info!("resource not found");
                ModelAndView::new(ERROR_404_VIEW).with_status(StatusCode::NOT_FOUND)
            }
            WebError::ContactNotFound => {
                tracing::debug!("In ContactNotFound error handler");
                custom_error(
                    StatusCode::NOT_FOUND,
                    "Contact Missing in Action!",
                    "We'll find the rascal, don't you worry".to_string(),
                )
            }
            WebError::GeoLocation { location } => {
                tracing::info!(%location, "geolocation failed");
                ModelAndView::new(PRODUCT_MAP_VIEW).add_message(
                    LOCATION_ERROR_ATTRIBUTE,
                    LOCATION_ERROR_MESSAGE_KEY,
                    &[location.as_str()],
                )
            }
            WebError::AccountDisabled => {
                tracing::warn!("disabled account attempted sign in");
                ModelAndView::new(HOME_VIEW)
            }
            WebError::DuplicatePostName { post_title } => {
                tracing::warn!(%post_title, "duplicate post name");
                // 메시지는 <br />를 포함해 escape 없이 렌더링되므로 제목만 escape
                custom_error(
                    StatusCode::CONFLICT,
                    "Duplicate Post Name",
                    format!(
                        "\"{}\" exists.<br /> Please rename your post title and try again.",
                        MarkupDisplay::new_unsafe(post_title, Html)
                    ),
                )
            }
            WebError::PostNotFound => {
                tracing::info!("post not found");
                custom_error(
                    StatusCode::NOT_FOUND,
                    "Post Not Found",
                    "No post retrieved for your ID or Post Name".to_string(),
                )
            }
            WebError::Internal(_) => {
                // 내부 에러는 페이지에 상세 정보 노출 안 함
                tracing::error!("Internal error: {:?}", self);
                custom_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something Went Wrong",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
        }
    }
}

fn custom_error(status: StatusCode, title: &str, message: String) -> ModelAndView {
    ModelAndView::new(ERROR_CUSTOM_VIEW)
        .with_status(status)
        .add_object(ERROR_PAGE_TITLE_ATTRIBUTE, title)
        .add_object(ERROR_PAGE_MESSAGE_ATTRIBUTE, message)
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        self.to_model_and_view().into_response()
    }
}

/// anyhow 에러를 WebError로 변환
///
/// 로그는 뷰 매핑 시점에 한 번만 남김. context 체인은 `{:#}`로 보존.
impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        WebError::Internal(format!("{err:#}"))
    }
}
