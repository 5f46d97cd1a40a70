//! Product listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::PageContext;
use crate::models::Product;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
}

/// Display the product listing.
#[instrument(skip_all)]
pub async fn index(page: PageContext) -> impl IntoResponse {
    ProductsTemplate {
        page,
        products: Product::catalog(),
    }
}
