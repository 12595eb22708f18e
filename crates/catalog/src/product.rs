use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shop_core::{CategoryId, Entity, ProductId, ValidationErrors};

use crate::rules::{DecimalRule, TextRule, optional_text, required_id};

pub const TITLE: TextRule = TextRule::between(2, 100);
pub const PRICE: DecimalRule = DecimalRule::new(10, 2);

/// A catalog product. Always belongs to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: CategoryId,
}

impl Entity for Product {
    type Id = ProductId;
    const RESOURCE: &'static str = "Product";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Unvalidated create/update payload.
///
/// Fields stay raw JSON so a badly typed value is reported on its own field
/// instead of failing the whole body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductDraft {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub price: Option<Value>,
    pub category_id: Option<Value>,
}

/// Validated product fields, ready to persist.
///
/// `category_id` is well-formed but not yet known to exist; the store checks
/// that when writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: CategoryId,
}

impl ProductDraft {
    pub fn validate(self) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = TITLE.required(&mut errors, "title", self.title);
        let description = optional_text(&mut errors, "description", self.description);
        let price = PRICE.required(&mut errors, "price", self.price);
        let category_id = required_id(&mut errors, "category_id", self.category_id);

        match (title, price, category_id) {
            (Some(title), Some(price), Some(category_id)) if errors.is_empty() => Ok(NewProduct {
                title,
                description,
                price,
                category_id: CategoryId::new(category_id),
            }),
            _ => Err(errors),
        }
    }
}

impl NewProduct {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            category_id: self.category_id,
        }
    }
}
