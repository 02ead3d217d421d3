//! Blog Web Layer Library
//!
//! # Overview
//!
//! 서버 렌더링 블로그의 프레젠테이션 계층:
//! 모든 페이지 모델에 공통 속성을 주입하고, 애플리케이션 에러를 에러 뷰로 매핑함.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Web Layer                          │
//! │                                                           │
//! │  ┌─────────┐   ┌──────────┐   ┌──────────┐   ┌─────────┐  │
//! │  │ Routes  │──►│  Advice  │──►│  Views   │   │Messages │  │
//! │  └────┬────┘   └────┬─────┘   └──────────┘   └─────────┘  │
//! │       │             │                                     │
//! │   WebError ──► ModelAndView                               │
//! └───────────────────────────────────────────────────────────┘
//!          ▲                         ▲
//!          │                         │
//!   Authentication / Session   SiteOptions / ApplicationSettings
//!    (upstream layers)              (Config)
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리 (SiteOptions, ApplicationSettings)
//! - `error`: 에러 타입 및 에러 뷰 매핑
//! - `advice`: 공통 모델 속성 + 렌더 미들웨어
//! - `model`: `Model`, `ModelAndView`, 뷰 이름 상수
//! - `messages`: 다국어 메시지 번들
//! - `views`: askama 템플릿 렌더러
//! - `routes`: HTTP 엔드포인트
//! - `session`, `types`: 업스트림이 넣어주는 세션/인증 값 객체
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blog_web::{config::Config, routes, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let app = routes::create_router(AppState::new(config));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod advice;
pub mod config;
pub mod error;
pub mod messages;
pub mod model;
pub mod routes;
pub mod session;
pub mod types;
pub mod views;

// Re-exports for convenience
pub use config::Config;
pub use error::WebError;
pub use model::{Model, ModelAndView};

use messages::MessageSource;
use views::{TemplateViews, ViewRenderer};

/// 애플리케이션 전역 상태 (읽기 전용)
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub messages: Arc<MessageSource>,
    pub views: Arc<dyn ViewRenderer>,
}

impl AppState {
    /// 기본 메시지 번들 + askama 렌더러
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            messages: Arc::new(MessageSource::default()),
            views: Arc::new(TemplateViews),
        }
    }

    pub fn with_messages(mut self, messages: MessageSource) -> Self {
        self.messages = Arc::new(messages);
        self
    }
}
