//! Configuration Module
//!
//! # Interview Q&A
//!
//! Q: 환경변수 vs 설정 파일, 어떤 방식을 선택했고 왜인가?
//! A: 환경변수를 선택
//!    - 12-Factor App 원칙 준수
//!    - 배포 환경별 설정 분리 용이
//!    - 로컬 개발은 `.env` 파일 (dotenvy)
//!
//! Q: 설정 검증은 어떻게 하는가?
//! A: from_env()에서 값 검증 → 잘못된 값이면 즉시 실패 (fail-fast)
//!
//! `SiteOptions`와 `ApplicationSettings`는 시작 시 한 번 로드되고
//! 모든 페이지 모델에 그대로 노출됨 (읽기 전용).

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트 (기본값: 8080)
    pub port: u16,

    /// 환경 (development, staging, production)
    pub environment: Environment,

    /// 사이트 옵션 (템플릿에 `siteOptions`로 노출)
    pub site_options: SiteOptions,

    /// 애플리케이션 설정 (템플릿에 `appSettings`로 노출)
    pub app_settings: ApplicationSettings,

    /// `messages*.properties` 디렉토리 (옵션)
    pub messages_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// 사이트 전역 옵션
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteOptions {
    pub site_name: String,
    pub site_description: String,
    pub add_google_analytics: bool,
    pub google_analytics_tracking_id: String,
}

/// 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSettings {
    pub base_url: String,
    pub demo_site: bool,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            site_name: "NixMash Blog".to_string(),
            site_description: String::new(),
            add_google_analytics: false,
            google_analytics_tracking_id: String::new(),
        }
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            demo_site: false,
        }
    }
}

impl Config {
    /// 환경변수에서 설정 로드
    ///
    /// # Optional Environment Variables
    ///
    /// - `PORT`: 서버 포트 (기본값: 8080)
    /// - `ENVIRONMENT`: development | staging | production
    /// - `SITE_NAME`, `SITE_DESCRIPTION`
    /// - `SITE_ADD_GOOGLE_ANALYTICS`: true | false
    /// - `SITE_GOOGLE_ANALYTICS_TRACKING_ID`
    /// - `APP_BASE_URL`, `APP_DEMO_SITE`
    /// - `MESSAGES_DIR`: 다국어 메시지 디렉토리
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 key 조회 함수로 설정 구성
    ///
    /// 테스트에서 프로세스 환경변수를 건드리지 않기 위해 분리.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let site_defaults = SiteOptions::default();
        let app_defaults = ApplicationSettings::default();

        let site_options = SiteOptions {
            site_name: lookup("SITE_NAME").unwrap_or(site_defaults.site_name),
            site_description: lookup("SITE_DESCRIPTION").unwrap_or(site_defaults.site_description),
            add_google_analytics: match lookup("SITE_ADD_GOOGLE_ANALYTICS") {
                Some(raw) => parse_bool(&raw)
                    .context("SITE_ADD_GOOGLE_ANALYTICS must be a boolean")?,
                None => site_defaults.add_google_analytics,
            },
            google_analytics_tracking_id: lookup("SITE_GOOGLE_ANALYTICS_TRACKING_ID")
                .unwrap_or(site_defaults.google_analytics_tracking_id),
        };

        let app_settings = ApplicationSettings {
            base_url: lookup("APP_BASE_URL").unwrap_or(app_defaults.base_url),
            demo_site: match lookup("APP_DEMO_SITE") {
                Some(raw) => parse_bool(&raw).context("APP_DEMO_SITE must be a boolean")?,
                None => app_defaults.demo_site,
            },
        };

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            environment,
            site_options,
            app_settings,
            messages_dir: lookup("MESSAGES_DIR").map(PathBuf::from),
        })
    }

    /// 프로덕션 환경인지 확인
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("invalid boolean: {other:?}"),
    }
}
