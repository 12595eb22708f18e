use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    response::Response,
    routing::get,
};

use shop_catalog::{Category, CategoryDraft};
use shop_core::{CategoryId, Entity};

use crate::app::dto::{self, Payload};
use crate::app::errors;
use crate::app::routes::common::{self, Operation};
use crate::app::services::AppServices;

/// Every path is served with and without its trailing slash.
pub fn router() -> Router {
    let collection = get(list_categories).post(create_category);
    let item = get(fetch_category).put(update_category).delete(delete_category);

    Router::new()
        .route("/categories/", collection.clone())
        .route("/categories", collection)
        .route("/categories/:id/", item.clone())
        .route("/categories/:id", item)
}

/// Categories with the number of products currently in each.
pub async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.store().list_categories_with_counts().await {
        Ok(rows) => {
            let items = rows
                .into_iter()
                .map(dto::category_with_count_to_json)
                .collect::<Vec<_>>();
            common::respond(Operation::List, Json(items))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Payload(body): Payload<CategoryDraft>,
) -> Response {
    let new = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::validation_error(e),
    };

    match services.store().create_category(new).await {
        Ok(category) => {
            common::record_write(Category::RESOURCE, Operation::Create, category.id.get());
            common::respond(Operation::Create, Json(dto::category_to_json(category)))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn fetch_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: CategoryId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().get_category(id).await {
        Ok(category) => common::respond(Operation::Fetch, Json(dto::category_to_json(category))),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Payload(body): Payload<CategoryDraft>,
) -> Response {
    let id: CategoryId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let new = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::validation_error(e),
    };

    match services.store().update_category(id, new).await {
        Ok(category) => {
            common::record_write(Category::RESOURCE, Operation::Update, id.get());
            common::respond(Operation::Update, Json(dto::category_to_json(category)))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: CategoryId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().delete_category(id).await {
        Ok(()) => {
            common::record_write(Category::RESOURCE, Operation::Delete, id.get());
            common::respond(Operation::Delete, ())
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
