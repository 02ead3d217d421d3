//! Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/` - 홈 페이지
//! - `/health` - 헬스 체크
//! - 그 외 경로 - `errors/404`

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{error::WebError, AppState};

pub mod health;
pub mod home;

/// 라우터 생성
///
/// 렌더 미들웨어는 fallback을 포함한 모든 라우트를 감쌈.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health_check))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::advice::render_views,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> WebError {
    WebError::ResourceNotFound
}
