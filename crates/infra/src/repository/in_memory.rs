//! In-memory catalog store for tests/dev.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use shop_catalog::{
    Category, CategoryWithCount, NewCategory, NewProduct, NewReview, Product, ProductReviews,
    Review,
};
use shop_core::{CategoryId, DomainError, Entity, ProductId, ReviewId};

use super::{
    CategoryRepository, ProductRepository, ReviewRepository, StoreError, StoreResult,
    missing_reference,
};

/// Auto-increment table keyed by id; iteration order is creation order.
#[derive(Debug)]
struct Table<V> {
    rows: BTreeMap<i64, V>,
    next_id: i64,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<V: Clone + Entity> Table<V> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> V) -> V {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(row.id().into(), row.clone());
        row
    }

    fn get(&self, id: i64) -> StoreResult<V> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(V::RESOURCE, id).into())
    }

    fn replace(&mut self, id: i64, row: V) -> StoreResult<V> {
        match self.rows.get_mut(&id) {
            Some(slot) => {
                *slot = row.clone();
                Ok(row)
            }
            None => Err(DomainError::not_found(V::RESOURCE, id).into()),
        }
    }

    fn remove(&mut self, id: i64) -> StoreResult<V> {
        self.rows
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(V::RESOURCE, id).into())
    }

    fn all(&self) -> Vec<V> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    categories: Table<Category>,
    products: Table<Product>,
    reviews: Table<Review>,
}

impl Tables {
    fn delete_product_cascade(&mut self, id: ProductId) -> StoreResult<()> {
        self.products.remove(id.get())?;
        self.reviews.rows.retain(|_, r| r.product_id != id);
        Ok(())
    }
}

/// Catalog store held in process memory.
///
/// A single lock guards all three tables, so cascades and parent checks are
/// atomic with the write they belong to.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Tables>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogStore {
    async fn list_categories_with_counts(&self) -> StoreResult<Vec<CategoryWithCount>> {
        let tables = self.read()?;
        let mut counts: HashMap<CategoryId, u64> = HashMap::new();
        for product in tables.products.rows.values() {
            *counts.entry(product.category_id).or_default() += 1;
        }

        Ok(tables
            .categories
            .rows
            .values()
            .map(|c| CategoryWithCount {
                products_count: counts.get(&c.id).copied().unwrap_or(0),
                category: c.clone(),
            })
            .collect())
    }

    async fn get_category(&self, id: CategoryId) -> StoreResult<Category> {
        self.read()?.categories.get(id.get())
    }

    async fn create_category(&self, new: NewCategory) -> StoreResult<Category> {
        let mut tables = self.write()?;
        Ok(tables
            .categories
            .insert_with(|id| new.into_category(CategoryId::new(id))))
    }

    async fn update_category(&self, id: CategoryId, new: NewCategory) -> StoreResult<Category> {
        let mut tables = self.write()?;
        tables.categories.replace(id.get(), new.into_category(id))
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.categories.remove(id.get())?;

        let orphaned: Vec<ProductId> = tables
            .products
            .rows
            .values()
            .filter(|p| p.category_id == id)
            .map(|p| p.id)
            .collect();
        for product_id in orphaned {
            tables.delete_product_cascade(product_id)?;
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalogStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.read()?.products.all())
    }

    async fn list_products_with_reviews(&self) -> StoreResult<Vec<ProductReviews>> {
        let tables = self.read()?;
        let mut by_product: HashMap<ProductId, Vec<Review>> = HashMap::new();
        for review in tables.reviews.rows.values() {
            by_product
                .entry(review.product_id)
                .or_default()
                .push(review.clone());
        }

        Ok(tables
            .products
            .rows
            .values()
            .map(|p| {
                let reviews = by_product.remove(&p.id).unwrap_or_default();
                ProductReviews::new(p.clone(), reviews)
            })
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> StoreResult<Product> {
        self.read()?.products.get(id.get())
    }

    async fn create_product(&self, new: NewProduct) -> StoreResult<Product> {
        let mut tables = self.write()?;
        if !tables.categories.rows.contains_key(&new.category_id.get()) {
            return Err(missing_reference("category_id", new.category_id.get()));
        }
        Ok(tables
            .products
            .insert_with(|id| new.into_product(ProductId::new(id))))
    }

    async fn update_product(&self, id: ProductId, new: NewProduct) -> StoreResult<Product> {
        let mut tables = self.write()?;
        if !tables.products.rows.contains_key(&id.get()) {
            return Err(DomainError::not_found(Product::RESOURCE, id).into());
        }
        if !tables.categories.rows.contains_key(&new.category_id.get()) {
            return Err(missing_reference("category_id", new.category_id.get()));
        }
        tables.products.replace(id.get(), new.into_product(id))
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<()> {
        self.write()?.delete_product_cascade(id)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryCatalogStore {
    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.read()?.reviews.all())
    }

    async fn get_review(&self, id: ReviewId) -> StoreResult<Review> {
        self.read()?.reviews.get(id.get())
    }

    async fn create_review(&self, new: NewReview) -> StoreResult<Review> {
        let mut tables = self.write()?;
        if !tables.products.rows.contains_key(&new.product_id.get()) {
            return Err(missing_reference("product_id", new.product_id.get()));
        }
        Ok(tables
            .reviews
            .insert_with(|id| new.into_review(ReviewId::new(id))))
    }

    async fn update_review(&self, id: ReviewId, new: NewReview) -> StoreResult<Review> {
        let mut tables = self.write()?;
        if !tables.reviews.rows.contains_key(&id.get()) {
            return Err(DomainError::not_found(Review::RESOURCE, id).into());
        }
        if !tables.products.rows.contains_key(&new.product_id.get()) {
            return Err(missing_reference("product_id", new.product_id.get()));
        }
        tables.reviews.replace(id.get(), new.into_review(id))
    }

    async fn delete_review(&self, id: ReviewId) -> StoreResult<()> {
        self.write()?.reviews.remove(id.get()).map(|_| ())
    }
}
