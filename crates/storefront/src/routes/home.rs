//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::PageContext;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: PageContext,
}

/// Display the landing page.
#[instrument(skip_all)]
pub async fn index(page: PageContext) -> impl IntoResponse {
    IndexTemplate { page }
}
