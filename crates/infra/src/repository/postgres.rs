//! Postgres-backed catalog store.
//!
//! Referential integrity is enforced by the schema: foreign keys with
//! `ON DELETE CASCADE` remove dependent products and reviews, and inserts that
//! reference a missing parent fail with a foreign-key violation, which is mapped
//! to a validation error on the reference field.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use shop_catalog::{
    Category, CategoryWithCount, NewCategory, NewProduct, NewReview, Product, ProductReviews,
    Review,
};
use shop_core::{CategoryId, DomainError, Entity, ProductId, ReviewId};

use super::{
    CategoryRepository, ProductRepository, ReviewRepository, StoreError, StoreResult,
    missing_reference,
};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(100) NOT NULL,
        description TEXT NULL,
        price NUMERIC(10, 2) NOT NULL,
        category_id BIGINT NOT NULL REFERENCES categories (id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id BIGSERIAL PRIMARY KEY,
        text VARCHAR(300) NOT NULL,
        stars NUMERIC(3, 1) NOT NULL DEFAULT 1.0,
        product_id BIGINT NOT NULL REFERENCES products (id) ON DELETE CASCADE
    )
    "#,
];

/// Catalog store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and creates the catalog tables if they do not exist yet.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("catalog schema ready");
        Ok(())
    }
}

fn category_from_row(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: CategoryId::new(row.try_get("id")?),
        name: row.try_get("name")?,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        price: row.try_get::<Decimal, _>("price")?,
        category_id: CategoryId::new(row.try_get("category_id")?),
    })
}

fn review_from_row(row: &PgRow) -> Result<Review, sqlx::Error> {
    Ok(Review {
        id: ReviewId::new(row.try_get("id")?),
        text: row.try_get("text")?,
        stars: row.try_get::<Decimal, _>("stars")?,
        product_id: ProductId::new(row.try_get("product_id")?),
    })
}

/// Maps a foreign-key violation to a validation error on `field`.
fn reference_error(err: sqlx::Error, field: &str, id: i64) -> StoreError {
    let foreign_key = matches!(&err, sqlx::Error::Database(db) if db.is_foreign_key_violation());
    if foreign_key {
        missing_reference(field, id)
    } else {
        StoreError::Database(err)
    }
}

fn not_found<E: Entity>(id: impl Into<i64>) -> StoreError {
    DomainError::not_found(E::RESOURCE, id).into()
}

#[async_trait]
impl CategoryRepository for PostgresCatalogStore {
    async fn list_categories_with_counts(&self) -> StoreResult<Vec<CategoryWithCount>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, COUNT(p.id) AS products_count
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let count: i64 = row.try_get("products_count")?;
            out.push(CategoryWithCount {
                category: category_from_row(row)?,
                products_count: count.max(0) as u64,
            });
        }
        Ok(out)
    }

    async fn get_category(&self, id: CategoryId) -> StoreResult<Category> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(category_from_row(&row)?),
            None => Err(not_found::<Category>(id)),
        }
    }

    async fn create_category(&self, new: NewCategory) -> StoreResult<Category> {
        let row = sqlx::query("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
            .bind(&new.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(category_from_row(&row)?)
    }

    async fn update_category(&self, id: CategoryId, new: NewCategory) -> StoreResult<Category> {
        let row = sqlx::query("UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id.get())
            .bind(&new.name)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(category_from_row(&row)?),
            None => Err(not_found::<Category>(id)),
        }
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<Category>(id));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PostgresCatalogStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT id, title, description, price, category_id FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(product_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_products_with_reviews(&self) -> StoreResult<Vec<ProductReviews>> {
        let products = self.list_products().await?;

        let mut by_product: HashMap<ProductId, Vec<Review>> = HashMap::new();
        for review in self.list_reviews().await? {
            by_product.entry(review.product_id).or_default().push(review);
        }

        Ok(products
            .into_iter()
            .map(|p| {
                let reviews = by_product.remove(&p.id).unwrap_or_default();
                ProductReviews::new(p, reviews)
            })
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> StoreResult<Product> {
        let row = sqlx::query(
            "SELECT id, title, description, price, category_id FROM products WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(product_from_row(&row)?),
            None => Err(not_found::<Product>(id)),
        }
    }

    async fn create_product(&self, new: NewProduct) -> StoreResult<Product> {
        let category_id = new.category_id.get();
        let row = sqlx::query(
            r#"
            INSERT INTO products (title, description, price, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, price, category_id
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| reference_error(e, "category_id", category_id))?;
        Ok(product_from_row(&row)?)
    }

    async fn update_product(&self, id: ProductId, new: NewProduct) -> StoreResult<Product> {
        let category_id = new.category_id.get();
        let row = sqlx::query(
            r#"
            UPDATE products
            SET title = $2, description = $3, price = $4, category_id = $5
            WHERE id = $1
            RETURNING id, title, description, price, category_id
            "#,
        )
        .bind(id.get())
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| reference_error(e, "category_id", category_id))?;
        match row {
            Some(row) => Ok(product_from_row(&row)?),
            None => Err(not_found::<Product>(id)),
        }
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<Product>(id));
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for PostgresCatalogStore {
    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let rows = sqlx::query("SELECT id, text, stars, product_id FROM reviews ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(review_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_review(&self, id: ReviewId) -> StoreResult<Review> {
        let row = sqlx::query("SELECT id, text, stars, product_id FROM reviews WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(review_from_row(&row)?),
            None => Err(not_found::<Review>(id)),
        }
    }

    async fn create_review(&self, new: NewReview) -> StoreResult<Review> {
        let product_id = new.product_id.get();
        let row = sqlx::query(
            r#"
            INSERT INTO reviews (text, stars, product_id)
            VALUES ($1, $2, $3)
            RETURNING id, text, stars, product_id
            "#,
        )
        .bind(&new.text)
        .bind(new.stars)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| reference_error(e, "product_id", product_id))?;
        Ok(review_from_row(&row)?)
    }

    async fn update_review(&self, id: ReviewId, new: NewReview) -> StoreResult<Review> {
        let product_id = new.product_id.get();
        let row = sqlx::query(
            r#"
            UPDATE reviews
            SET text = $2, stars = $3, product_id = $4
            WHERE id = $1
            RETURNING id, text, stars, product_id
            "#,
        )
        .bind(id.get())
        .bind(&new.text)
        .bind(new.stars)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| reference_error(e, "product_id", product_id))?;
        match row {
            Some(row) => Ok(review_from_row(&row)?),
            None => Err(not_found::<Review>(id)),
        }
    }

    async fn delete_review(&self, id: ReviewId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<Review>(id));
        }
        Ok(())
    }
}
