use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shop_core::{Entity, ProductId, ReviewId, ValidationErrors};

use crate::rules::{DecimalRule, TextRule, required_id};

pub const TEXT: TextRule = TextRule::max(300);
pub const STARS: DecimalRule = DecimalRule::new(3, 1);

/// Stars given when a review omits them (`1.0`).
pub fn default_stars() -> Decimal {
    Decimal::new(10, 1)
}

/// A product review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub text: String,
    pub stars: Decimal,
    pub product_id: ProductId,
}

impl Entity for Review {
    type Id = ReviewId;
    const RESOURCE: &'static str = "Review";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Unvalidated create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReviewDraft {
    pub text: Option<Value>,
    pub stars: Option<Value>,
    pub product_id: Option<Value>,
}

/// Validated review fields, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub text: String,
    pub stars: Decimal,
    pub product_id: ProductId,
}

impl ReviewDraft {
    pub fn validate(self) -> Result<NewReview, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let text = TEXT.required(&mut errors, "text", self.text);
        let stars = match self.stars {
            Some(stars) => STARS.validate(&mut errors, "stars", &stars),
            None => Some(default_stars()),
        };
        let product_id = required_id(&mut errors, "product_id", self.product_id);

        match (text, stars, product_id) {
            (Some(text), Some(stars), Some(product_id)) if errors.is_empty() => Ok(NewReview {
                text,
                stars,
                product_id: ProductId::new(product_id),
            }),
            _ => Err(errors),
        }
    }
}

impl NewReview {
    pub fn into_review(self, id: ReviewId) -> Review {
        Review {
            id,
            text: self.text,
            stars: self.stars,
            product_id: self.product_id,
        }
    }
}
