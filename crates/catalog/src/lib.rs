//! Catalog domain module.
//!
//! Categories, products and reviews with their input validation rules and the
//! review rating aggregation, implemented as plain domain logic (no IO, no HTTP,
//! no storage).

pub mod category;
pub mod product;
pub mod rating;
pub mod review;
pub mod rules;

pub use category::{Category, CategoryDraft, CategoryWithCount, NewCategory};
pub use product::{NewProduct, Product, ProductDraft};
pub use rating::{ProductReviews, ReviewSummary, average_rating};
pub use review::{NewReview, Review, ReviewDraft};
