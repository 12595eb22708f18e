use axum::Router;

pub mod categories;
pub mod common;
pub mod products;
pub mod reviews;
pub mod system;

/// Router for the catalog resources.
pub fn router() -> Router {
    Router::new()
        .merge(products::router())
        .merge(categories::router())
        .merge(reviews::router())
}
