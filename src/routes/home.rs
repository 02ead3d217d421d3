//! Home Page

use crate::model::{ModelAndView, HOME_VIEW};

/// GET /
pub async fn home() -> ModelAndView {
    ModelAndView::new(HOME_VIEW)
}
