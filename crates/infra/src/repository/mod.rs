//! Repository interfaces per catalog entity, plus their storage backends.
//!
//! ## Cascade rules
//!
//! Every backend must uphold referential integrity:
//!
//! - deleting a category deletes its products, and through them their reviews;
//! - deleting a product deletes its reviews;
//! - creating or updating a product/review that references a missing parent is a
//!   validation failure on the reference field, and nothing is written.
//!
//! Lookups of missing ids return [`DomainError::NotFound`] wrapped in
//! [`StoreError::Domain`].

use async_trait::async_trait;
use thiserror::Error;

use shop_catalog::{
    Category, CategoryWithCount, NewCategory, NewProduct, NewReview, Product, ProductReviews,
    Review,
};
use shop_core::{CategoryId, DomainError, ProductId, ReviewId};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Client-facing failure (validation or not found).
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Message used when a referenced parent record does not exist.
pub(crate) fn missing_reference(field: &str, id: i64) -> StoreError {
    StoreError::Domain(DomainError::field(
        field,
        format!("Invalid pk \"{id}\" - object does not exist."),
    ))
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories in creation order, with the number of products referencing each.
    async fn list_categories_with_counts(&self) -> StoreResult<Vec<CategoryWithCount>>;

    async fn get_category(&self, id: CategoryId) -> StoreResult<Category>;

    async fn create_category(&self, new: NewCategory) -> StoreResult<Category>;

    async fn update_category(&self, id: CategoryId, new: NewCategory) -> StoreResult<Category>;

    /// Deletes the category together with its products and their reviews.
    async fn delete_category(&self, id: CategoryId) -> StoreResult<()>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products in creation order.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    /// All products joined with their reviews and average rating.
    async fn list_products_with_reviews(&self) -> StoreResult<Vec<ProductReviews>>;

    async fn get_product(&self, id: ProductId) -> StoreResult<Product>;

    /// Fails validation on `category_id` when the category does not exist.
    async fn create_product(&self, new: NewProduct) -> StoreResult<Product>;

    async fn update_product(&self, id: ProductId, new: NewProduct) -> StoreResult<Product>;

    /// Deletes the product together with its reviews.
    async fn delete_product(&self, id: ProductId) -> StoreResult<()>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// All reviews in creation order.
    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;

    async fn get_review(&self, id: ReviewId) -> StoreResult<Review>;

    /// Fails validation on `product_id` when the product does not exist.
    async fn create_review(&self, new: NewReview) -> StoreResult<Review>;

    async fn update_review(&self, id: ReviewId, new: NewReview) -> StoreResult<Review>;

    async fn delete_review(&self, id: ReviewId) -> StoreResult<()>;
}

/// Full catalog persistence (all three repositories behind one handle).
pub trait CatalogStore: CategoryRepository + ProductRepository + ReviewRepository {}

impl<T> CatalogStore for T where T: CategoryRepository + ProductRepository + ReviewRepository {}
