use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    response::Response,
    routing::get,
};

use shop_catalog::{Review, ReviewDraft};
use shop_core::{Entity, ReviewId};

use crate::app::dto::{self, Payload};
use crate::app::errors;
use crate::app::routes::common::{self, Operation};
use crate::app::services::AppServices;

/// Every path is served with and without its trailing slash.
pub fn router() -> Router {
    let collection = get(list_reviews).post(create_review);
    let item = get(fetch_review).put(update_review).delete(delete_review);

    Router::new()
        .route("/reviews/", collection.clone())
        .route("/reviews", collection)
        .route("/reviews/:id/", item.clone())
        .route("/reviews/:id", item)
}

pub async fn list_reviews(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.store().list_reviews().await {
        Ok(reviews) => {
            let items = reviews
                .into_iter()
                .map(dto::review_to_json)
                .collect::<Vec<_>>();
            common::respond(Operation::List, Json(items))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_review(
    Extension(services): Extension<Arc<AppServices>>,
    Payload(body): Payload<ReviewDraft>,
) -> Response {
    let new = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::validation_error(e),
    };

    match services.store().create_review(new).await {
        Ok(review) => {
            common::record_write(Review::RESOURCE, Operation::Create, review.id.get());
            common::respond(Operation::Create, Json(dto::review_to_json(review)))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn fetch_review(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ReviewId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().get_review(id).await {
        Ok(review) => common::respond(Operation::Fetch, Json(dto::review_to_json(review))),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_review(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Payload(body): Payload<ReviewDraft>,
) -> Response {
    let id: ReviewId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let new = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::validation_error(e),
    };

    match services.store().update_review(id, new).await {
        Ok(review) => {
            common::record_write(Review::RESOURCE, Operation::Update, id.get());
            common::respond(Operation::Update, Json(dto::review_to_json(review)))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_review(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ReviewId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().delete_review(id).await {
        Ok(()) => {
            common::record_write(Review::RESOURCE, Operation::Delete, id.get());
            common::respond(Operation::Delete, ())
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
