use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    response::Response,
    routing::get,
};

use shop_catalog::{Product, ProductDraft};
use shop_core::{Entity, ProductId};

use crate::app::dto::{self, Payload};
use crate::app::errors;
use crate::app::routes::common::{self, Operation};
use crate::app::services::AppServices;

/// Every path is served with and without its trailing slash.
pub fn router() -> Router {
    let collection = get(list_products).post(create_product);
    let item = get(fetch_product).put(update_product).delete(delete_product);

    Router::new()
        .route("/products/", collection.clone())
        .route("/products", collection)
        .route("/products/reviews", get(list_products_with_reviews))
        .route("/products/reviews/", get(list_products_with_reviews))
        .route("/products/:id/", item.clone())
        .route("/products/:id", item)
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.store().list_products().await {
        Ok(products) => {
            let items = products
                .into_iter()
                .map(dto::product_to_json)
                .collect::<Vec<_>>();
            common::respond(Operation::List, Json(items))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Every product with its reviews (creation order) and average rating.
pub async fn list_products_with_reviews(
    Extension(services): Extension<Arc<AppServices>>,
) -> Response {
    match services.store().list_products_with_reviews().await {
        Ok(rows) => {
            let items = rows
                .into_iter()
                .map(dto::product_reviews_to_json)
                .collect::<Vec<_>>();
            common::respond(Operation::List, Json(items))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Payload(body): Payload<ProductDraft>,
) -> Response {
    let new = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::validation_error(e),
    };

    match services.store().create_product(new).await {
        Ok(product) => {
            common::record_write(Product::RESOURCE, Operation::Create, product.id.get());
            common::respond(Operation::Create, Json(dto::product_to_json(product)))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn fetch_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ProductId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().get_product(id).await {
        Ok(product) => common::respond(Operation::Fetch, Json(dto::product_to_json(product))),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Payload(body): Payload<ProductDraft>,
) -> Response {
    let id: ProductId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let new = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::validation_error(e),
    };

    match services.store().update_product(id, new).await {
        Ok(product) => {
            common::record_write(Product::RESOURCE, Operation::Update, id.get());
            common::respond(Operation::Update, Json(dto::product_to_json(product)))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ProductId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().delete_product(id).await {
        Ok(()) => {
            common::record_write(Product::RESOURCE, Operation::Delete, id.get());
            common::respond(Operation::Delete, ())
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
