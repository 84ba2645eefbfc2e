//! Server-rendered HTML for the landing page.
//!
//! The structs here are filled from already-fetched data and rendered by the
//! askama templates under `templates/`.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tf_core::{split_lead, Article, LatestNews, PriceTick};

/// Renders a template into a response, 500 if rendering fails.
pub fn render_template<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", e),
            )
                .into_response()
        }
    }
}

/// One news section: lead card on the left, the remaining titles on the right,
/// or only an error message.
pub struct SectionView {
    pub id: &'static str,
    pub heading: &'static str,
    pub error: Option<String>,
    pub lead: Option<Article>,
    pub rest: Vec<Article>,
}

impl SectionView {
    pub fn new(id: &'static str, heading: &'static str, content: Result<Vec<Article>, String>) -> Self {
        match content {
            Ok(articles) => {
                let (lead, rest) = split_lead(&articles);
                Self {
                    id,
                    heading,
                    error: None,
                    lead: lead.cloned(),
                    rest: rest.into_iter().cloned().collect(),
                }
            }
            Err(message) => Self { id, heading, error: Some(message), lead: None, rest: Vec::new() },
        }
    }
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingPage {
    /// Ticks twice over so the CSS loop can wrap at -50%.
    pub marquee: Vec<PriceTick>,
    pub sections: Vec<SectionView>,
    pub latest: LatestNews,
    pub more_href: Option<String>,
}

impl LandingPage {
    /// `visible` is how many latest cards are shown; "See More..." asks for
    /// twice as many.
    pub fn new(
        prices: &[PriceTick],
        crypto: SectionView,
        tech: SectionView,
        latest: LatestNews,
        visible: usize,
    ) -> Self {
        let more_href = latest
            .has_more
            .then(|| format!("/?visible={}", visible.max(1) * 2));
        Self {
            marquee: prices.iter().chain(prices.iter()).cloned().collect(),
            sections: vec![crypto, tech],
            latest,
            more_href,
        }
    }
}
