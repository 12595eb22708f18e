//! Review aggregation: average star rating and embedded review summaries.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{Product, Review};

/// Review fields embedded in a product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub text: String,
    pub stars: Decimal,
}

/// Product joined with its reviews and their average rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReviews {
    pub product: Product,
    pub reviews: Vec<ReviewSummary>,
    /// `None` when the product has no reviews.
    pub rating: Option<Decimal>,
}

/// Arithmetic mean rounded to one decimal place (half away from zero).
///
/// The result always carries exactly one fractional digit (`4.0`, not `4`).
///
/// Returns `None` for an empty slice; an unreviewed product has no rating,
/// not a zero rating.
pub fn average_rating(stars: &[Decimal]) -> Option<Decimal> {
    if stars.is_empty() {
        return None;
    }
    let total: Decimal = stars.iter().copied().sum();
    let mean = total / Decimal::from(stars.len());
    let mut rating = mean.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rating.rescale(1);
    Some(rating)
}

impl ProductReviews {
    /// Joins a product with its reviews.
    ///
    /// Reviews are ordered by id, i.e. in the order they were created.
    pub fn new(product: Product, mut reviews: Vec<Review>) -> Self {
        reviews.retain(|r| r.product_id == product.id);
        reviews.sort_by_key(|r| r.id);

        let stars: Vec<Decimal> = reviews.iter().map(|r| r.stars).collect();
        let rating = average_rating(&stars);
        let reviews = reviews
            .into_iter()
            .map(|r| ReviewSummary {
                text: r.text,
                stars: r.stars,
            })
            .collect();

        Self {
            product,
            reviews,
            rating,
        }
    }
}
