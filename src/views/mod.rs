//! View rendering
//!
//! Resolves a logical view name plus its model to HTML. The askama-backed
//! [`TemplateViews`] knows the views this layer produces; templates live
//! under `templates/` and share `base.html`.

use askama::Template;
use serde_json::Value;
use thiserror::Error;

use crate::model::{
    Model, CATEGORY_ATTRIBUTE, ERROR_404_VIEW, ERROR_CATEGORY_VIEW, ERROR_CUSTOM_VIEW,
    ERROR_PAGE_MESSAGE_ATTRIBUTE, ERROR_PAGE_TITLE_ATTRIBUTE, HOME_VIEW, LOCATION_ERROR_ATTRIBUTE,
    NEW_URL_ATTRIBUTE, PRODUCT_MAP_VIEW,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("View {view} requires model attribute {attribute}")]
    MissingAttribute {
        view: &'static str,
        attribute: &'static str,
    },

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// 뷰 이름 + 모델 → HTML
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, model: &Model) -> Result<String, RenderError>;
}

/// Shared chrome derived from the global model attributes.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub site_name: String,
    pub site_description: String,
    pub base_url: String,
    pub signed_in: bool,
    pub user_name: String,
    pub connection_name: String,
    pub is_demo_user: bool,
    pub display_analytics: bool,
    pub tracking_id: String,
}

impl Layout {
    pub fn from_model(model: &Model) -> Self {
        let site = model.get("siteOptions");
        let settings = model.get("appSettings");
        let user = model.get("currentUser").filter(|v| !v.is_null());
        let connection = model.get("currentUserConnection").filter(|v| !v.is_null());

        Self {
            site_name: nested_str(site, "siteName"),
            site_description: nested_str(site, "siteDescription"),
            base_url: nested_str(settings, "baseUrl")
                .trim_end_matches('/')
                .to_string(),
            signed_in: user.is_some(),
            user_name: nested_str(user, "displayName"),
            connection_name: nested_str(connection, "displayName"),
            is_demo_user: model.get_bool("isDemoUser"),
            display_analytics: model.get_bool("displayGoogleAnalytics"),
            tracking_id: nested_str(site, "googleAnalyticsTrackingId"),
        }
    }
}

fn nested_str(parent: Option<&Value>, field: &str) -> String {
    parent
        .and_then(|value| value.get(field))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ============ Templates ============

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundPage {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "errors/custom.html")]
pub struct CustomErrorPage {
    pub layout: Layout,
    pub title: String,
    /// Trusted markup, rendered unescaped.
    pub message: String,
}

#[derive(Template)]
#[template(path = "errors/category.html")]
pub struct CategoryErrorPage {
    pub layout: Layout,
    pub category: String,
    pub new_url: String,
}

#[derive(Template)]
#[template(path = "products/map.html")]
pub struct ProductMapPage {
    pub layout: Layout,
    pub mapping_error: String,
}

/// askama 템플릿 기반 렌더러
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateViews;

impl TemplateViews {
    fn required(
        model: &Model,
        view: &'static str,
        attribute: &'static str,
    ) -> Result<String, RenderError> {
        model
            .get_str(attribute)
            .map(str::to_string)
            .ok_or(RenderError::MissingAttribute { view, attribute })
    }
}

impl ViewRenderer for TemplateViews {
    fn render(&self, view: &str, model: &Model) -> Result<String, RenderError> {
        let layout = Layout::from_model(model);

        let html = match view {
            HOME_VIEW => HomePage { layout }.render()?,
            ERROR_404_VIEW => NotFoundPage { layout }.render()?,
            ERROR_CUSTOM_VIEW => CustomErrorPage {
                layout,
                title: Self::required(model, ERROR_CUSTOM_VIEW, ERROR_PAGE_TITLE_ATTRIBUTE)?,
                message: Self::required(model, ERROR_CUSTOM_VIEW, ERROR_PAGE_MESSAGE_ATTRIBUTE)?,
            }
            .render()?,
            ERROR_CATEGORY_VIEW => CategoryErrorPage {
                layout,
                category: Self::required(model, ERROR_CATEGORY_VIEW, CATEGORY_ATTRIBUTE)?,
                new_url: Self::required(model, ERROR_CATEGORY_VIEW, NEW_URL_ATTRIBUTE)?,
            }
            .render()?,
            PRODUCT_MAP_VIEW => ProductMapPage {
                layout,
                // 지도 페이지는 에러 없이도 렌더링됨
                mapping_error: model
                    .get_str(LOCATION_ERROR_ATTRIBUTE)
                    .unwrap_or_default()
                    .to_string(),
            }
            .render()?,
            other => return Err(RenderError::UnknownView(other.to_string())),
        };

        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model_with_site() -> Model {
        let mut model = Model::new();
        model.insert(
            "siteOptions",
            json!({
                "siteName": "Test Blog",
                "siteDescription": "",
                "addGoogleAnalytics": true,
                "googleAnalyticsTrackingId": "UA-99"
            }),
        );
        model.insert("appSettings", json!({ "baseUrl": "http://blog.test/", "demoSite": false }));
        model.insert("currentUser", Value::Null);
        model.insert("isDemoUser", false);
        model.insert("displayGoogleAnalytics", false);
        model
    }

    #[test]
    fn test_layout_from_model() {
        let mut model = model_with_site();
        model.insert("currentUser", json!({ "displayName": "Keith" }));
        model.insert("displayGoogleAnalytics", true);

        let layout = Layout::from_model(&model);
        assert_eq!(layout.site_name, "Test Blog");
        assert_eq!(layout.base_url, "http://blog.test");
        assert!(layout.signed_in);
        assert_eq!(layout.user_name, "Keith");
        assert!(layout.display_analytics);
        assert_eq!(layout.tracking_id, "UA-99");
    }

    #[test]
    fn test_custom_error_renders_message_unescaped() {
        let mut model = model_with_site();
        model.insert("errortitle", "Duplicate Post Name");
        model.insert("errormessage", "\"A &amp; B\" exists.<br /> Please rename");

        let html = TemplateViews.render("errors/custom", &model).unwrap();
        assert!(html.contains("<h1>Duplicate Post Name</h1>"));
        assert!(html.contains("exists.<br /> Please rename"));
        assert!(html.contains("&amp; B"));
    }

    #[test]
    fn test_category_view() {
        let mut model = model_with_site();
        model.insert("category", "java");
        model.insert("newurl", "/post/hello");

        let html = TemplateViews.render("errors/category", &model).unwrap();
        assert!(html.contains("java"));
        assert!(html.contains("/post/hello"));
    }

    #[test]
    fn test_analytics_snippet_follows_flag() {
        let mut model = model_with_site();
        let html = TemplateViews.render("home", &model).unwrap();
        assert!(!html.contains("googletagmanager"));

        model.insert("displayGoogleAnalytics", true);
        let html = TemplateViews.render("home", &model).unwrap();
        assert!(html.contains("googletagmanager"));
        assert!(html.contains("UA-99"));
    }

    #[test]
    fn test_missing_attribute() {
        let model = model_with_site();
        let err = TemplateViews.render("errors/custom", &model).unwrap_err();
        assert!(matches!(
            err,
            RenderError::MissingAttribute { attribute: "errortitle", .. }
        ));
    }

    #[test]
    fn test_unknown_view() {
        let err = TemplateViews.render("admin/dashboard", &Model::new()).unwrap_err();
        assert!(matches!(err, RenderError::UnknownView(name) if name == "admin/dashboard"));
    }

    #[test]
    fn test_map_view_without_error() {
        let html = TemplateViews.render("products/map", &model_with_site()).unwrap();
        assert!(!html.contains("alert-warning"));
    }
}
