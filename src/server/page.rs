//! Landing page rendering

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use crate::records::{NewsItem, Review, Service};

pub const STUDIO_NAME: &str = "Aerial Gymnastics Studio";

/// Everything the landing page shows
#[derive(Debug, Template)]
#[template(path = "index.html")]
pub struct LandingPage {
    pub studio_name: &'static str,
    pub news: Vec<NewsItem>,
    pub services: Vec<Service>,
    pub reviews: Vec<Review>,
}

impl Default for LandingPage {
    fn default() -> Self {
        Self {
            studio_name: STUDIO_NAME,
            news: Vec::new(),
            services: Vec::new(),
            reviews: Vec::new(),
        }
    }
}

/// Generic failure page. Never includes error details.
#[derive(Debug, Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub studio_name: &'static str,
}

impl Default for ErrorPage {
    fn default() -> Self {
        Self { studio_name: STUDIO_NAME }
    }
}

/// Wrapper to render Askama templates as Axum responses.
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(rendered) => Html(rendered).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Template render failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
