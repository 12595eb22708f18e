use axum::{
    Json,
    extract::{FromRequest, Request},
    response::Response,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use shop_catalog::{Category, CategoryWithCount, Product, ProductReviews, Review};

use crate::app::errors;

// -------------------------
// Request bodies
// -------------------------

/// JSON body extractor whose rejections are `400` validation errors.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(value)),
            Err(rejection) => Err(errors::body_rejection(rejection)),
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn category_to_json(c: Category) -> serde_json::Value {
    json!({
        "id": c.id,
        "name": c.name,
    })
}

pub fn category_with_count_to_json(row: CategoryWithCount) -> serde_json::Value {
    json!({
        "id": row.category.id,
        "name": row.category.name,
        "products_count": row.products_count,
    })
}

pub fn product_to_json(p: Product) -> serde_json::Value {
    json!({
        "id": p.id,
        "title": p.title,
        "description": p.description,
        "price": p.price,
        "category_id": p.category_id,
    })
}

pub fn product_reviews_to_json(row: ProductReviews) -> serde_json::Value {
    let reviews = row
        .reviews
        .into_iter()
        .map(|r| json!({ "text": r.text, "stars": r.stars }))
        .collect::<Vec<_>>();

    let mut value = product_to_json(row.product);
    value["reviews"] = json!(reviews);
    value["rating"] = json!(row.rating);
    value
}

pub fn review_to_json(r: Review) -> serde_json::Value {
    json!({
        "id": r.id,
        "text": r.text,
        "stars": r.stars,
        "product_id": r.product_id,
    })
}
