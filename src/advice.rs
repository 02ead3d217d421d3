//! Global Model Attributes
//!
//! 모든 페이지 모델에 공통 속성을 주입하고 뷰를 렌더링하는 미들웨어.
//!
//! ```text
//! request ──► GlobalAttributes::from_parts ──► handler / WebError
//!                                                   │
//!                                              ModelAndView
//!                                                   │
//!            HTML ◄── ViewRenderer ◄── merge globals + resolve messages
//! ```
//!
//! | attribute                | source                                    |
//! |--------------------------|-------------------------------------------|
//! | `currentUser`            | `Authentication` principal (or null)      |
//! | `isDemoUser`             | principal name == `"user"`                |
//! | `currentUserConnection`  | session `MY_USER_CONNECTION` (or null)    |
//! | `appSettings`            | `Config::app_settings`                    |
//! | `siteOptions`            | `Config::site_options`                    |
//! | `displayGoogleAnalytics` | flag && !(admin \|\| post user)           |

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        request::Parts,
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::config::{ApplicationSettings, SiteOptions};
use crate::messages::Locale;
use crate::model::{Model, ModelAndView};
use crate::session::{Session, SESSION_USER_CONNECTION};
use crate::types::{Authentication, CurrentUser, UserConnection, DEMO_USERNAME};
use crate::AppState;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// 요청 범위 공통 모델 속성
#[derive(Debug, Clone)]
pub struct GlobalAttributes {
    pub current_user: Option<CurrentUser>,
    pub is_demo_user: bool,
    pub current_user_connection: Option<UserConnection>,
    pub app_settings: ApplicationSettings,
    pub site_options: SiteOptions,
    pub display_google_analytics: bool,
}

impl GlobalAttributes {
    pub fn resolve(
        authentication: Option<&Authentication>,
        session: Option<&Session>,
        site_options: &SiteOptions,
        app_settings: &ApplicationSettings,
    ) -> Self {
        let current_user = current_user(authentication);
        let display_google_analytics =
            display_google_analytics(site_options, current_user.as_ref());

        Self {
            is_demo_user: is_demo_user(authentication),
            current_user_connection: session.and_then(user_connection),
            app_settings: app_settings.clone(),
            site_options: site_options.clone(),
            display_google_analytics,
            current_user,
        }
    }

    /// request extension에서 인증/세션 정보를 읽음
    pub fn from_parts(parts: &Parts, state: &AppState) -> Self {
        Self::resolve(
            parts.extensions.get::<Authentication>(),
            parts.extensions.get::<Session>(),
            &state.config.site_options,
            &state.config.app_settings,
        )
    }

    /// 핸들러가 이미 넣은 같은 이름의 속성은 유지
    pub fn apply(&self, model: &mut Model) {
        model.insert_if_absent("currentUser", to_value(&self.current_user));
        model.insert_if_absent("isDemoUser", self.is_demo_user);
        model.insert_if_absent(
            "currentUserConnection",
            to_value(&self.current_user_connection),
        );
        model.insert_if_absent("appSettings", to_value(&self.app_settings));
        model.insert_if_absent("siteOptions", to_value(&self.site_options));
        model.insert_if_absent("displayGoogleAnalytics", self.display_google_analytics);
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

pub fn current_user(authentication: Option<&Authentication>) -> Option<CurrentUser> {
    authentication.map(|auth| auth.principal().clone())
}

/// principal 이름이 정확히 "user"인 경우만 데모 계정
pub fn is_demo_user(authentication: Option<&Authentication>) -> bool {
    authentication.is_some_and(|auth| auth.name() == DEMO_USERNAME)
}

/// 관리자/작성자에게는 analytics 스크립트를 노출하지 않음
pub fn display_google_analytics(site_options: &SiteOptions, user: Option<&CurrentUser>) -> bool {
    let display_user = user.map_or(true, |u| !(u.is_admin() || u.is_post_user()));
    site_options.add_google_analytics && display_user
}

fn user_connection(session: &Session) -> Option<UserConnection> {
    match session.get::<UserConnection>(SESSION_USER_CONNECTION) {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!(error = %e, key = SESSION_USER_CONNECTION, "undecodable session attribute");
            None
        }
    }
}

/// 렌더 미들웨어
///
/// 응답에 `ModelAndView`가 있으면 공통 속성을 병합하고 HTML로 렌더링.
/// 그 외 응답(JSON 등)은 그대로 통과.
pub async fn render_views(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let globals = GlobalAttributes::from_parts(&parts, &state);
    let locale = Locale::from_headers(&parts.headers);

    let mut response = next.run(Request::from_parts(parts, body)).await;

    let Some(mut mav) = response.extensions_mut().remove::<ModelAndView>() else {
        return response;
    };

    for pending in mav.take_messages() {
        let message = state
            .messages
            .get_message(&pending.key, &pending.args, &locale);
        mav.model_mut().insert(&pending.attribute, message);
    }
    globals.apply(mav.model_mut());

    // 핸들러/내부 레이어가 설정한 status, header(Set-Cookie 등)는 유지하고 body만 교체
    match state.views.render(mav.view(), mav.model()) {
        Ok(html) => {
            let headers = response.headers_mut();
            headers.remove(CONTENT_LENGTH);
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
            *response.body_mut() = Body::from(html);
            response
        }
        Err(e) => {
            tracing::error!(view = mav.view(), error = %e, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn site(add_google_analytics: bool) -> SiteOptions {
        SiteOptions {
            add_google_analytics,
            ..SiteOptions::default()
        }
    }

    fn auth(name: &str, roles: &[Role]) -> Authentication {
        Authentication::new(CurrentUser::new(1, name, roles))
    }

    #[test]
    fn test_demo_user_exact_match() {
        assert!(is_demo_user(Some(&auth("user", &[Role::User]))));
        assert!(!is_demo_user(Some(&auth("User", &[Role::User]))));
        assert!(!is_demo_user(Some(&auth("user2", &[Role::User]))));
        assert!(!is_demo_user(None));
    }

    #[test]
    fn test_demo_user_uses_authentication_name() {
        let principal = CurrentUser::new(1, "user", &[Role::User]);
        let auth = Authentication::with_name("facebook:user", principal);
        assert!(!is_demo_user(Some(&auth)));
    }

    #[test]
    fn test_current_user_null_without_authentication() {
        assert!(current_user(None).is_none());

        let attrs = GlobalAttributes::resolve(None, None, &site(true), &ApplicationSettings::default());
        let mut model = Model::new();
        attrs.apply(&mut model);
        assert_eq!(model.get("currentUser"), Some(&Value::Null));
        assert_eq!(model.get("currentUserConnection"), Some(&Value::Null));
        assert!(!model.get_bool("isDemoUser"));
    }

    #[test]
    fn test_analytics_hidden_for_admin_and_post_user() {
        for roles in [&[Role::Admin][..], &[Role::PostUser][..], &[Role::Admin, Role::PostUser][..]] {
            let user = CurrentUser::new(1, "staff", roles);
            assert!(!display_google_analytics(&site(true), Some(&user)));
            assert!(!display_google_analytics(&site(false), Some(&user)));
        }
    }

    #[test]
    fn test_analytics_follows_flag_otherwise() {
        let reader = CurrentUser::new(2, "reader", &[Role::User]);
        assert!(display_google_analytics(&site(true), Some(&reader)));
        assert!(!display_google_analytics(&site(false), Some(&reader)));
        assert!(display_google_analytics(&site(true), None));
        assert!(!display_google_analytics(&site(false), None));
    }

    #[test]
    fn test_user_connection_from_session() {
        let connection = UserConnection {
            provider_id: "github".to_string(),
            provider_user_id: "7".to_string(),
            display_name: "octo".to_string(),
            profile_url: None,
            image_url: None,
        };
        let session = Session::default()
            .with_attribute(SESSION_USER_CONNECTION, &connection)
            .unwrap();

        let attrs = GlobalAttributes::resolve(
            None,
            Some(&session),
            &site(false),
            &ApplicationSettings::default(),
        );
        assert_eq!(attrs.current_user_connection, Some(connection));
    }

    #[test]
    fn test_undecodable_connection_is_absent() {
        let session = Session::default()
            .with_attribute(SESSION_USER_CONNECTION, &42)
            .unwrap();
        let attrs = GlobalAttributes::resolve(
            None,
            Some(&session),
            &site(false),
            &ApplicationSettings::default(),
        );
        assert!(attrs.current_user_connection.is_none());
    }

    #[test]
    fn test_apply_keeps_handler_attributes() {
        let attrs = GlobalAttributes::resolve(
            Some(&auth("user", &[Role::User])),
            None,
            &site(true),
            &ApplicationSettings::default(),
        );
        let mut model = Model::new();
        model.insert("displayGoogleAnalytics", false);
        attrs.apply(&mut model);

        assert!(!model.get_bool("displayGoogleAnalytics"));
        assert!(model.get_bool("isDemoUser"));
        assert_eq!(
            model.get("siteOptions").and_then(|s| s.get("addGoogleAnalytics")),
            Some(&Value::Bool(true))
        );
        assert_eq!(
            model.get("currentUser").and_then(|u| u.get("username")),
            Some(&Value::String("user".to_string()))
        );
    }
}
