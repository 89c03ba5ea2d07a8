//! Catalog product entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use loomline_core::{Price, ProductId};

/// A purchasable catalog product.
///
/// Mutated only through the product repository; the `upload_time` column is
/// bumped on every write, so "most recent" means "most recently touched".
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub images: Vec<String>,
    pub category: String,
    pub available_colors: Vec<String>,
    pub available_sizes: Vec<String>,
    pub published: bool,
    pub upload_time: DateTime<Utc>,
}

/// Fields for creating a product. `upload_time` is stamped by the repository.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub images: Vec<String>,
    pub category: String,
    pub available_colors: Vec<String>,
    pub available_sizes: Vec<String>,
    pub published: bool,
}

/// Partial update for a product. `None` fields are left untouched; any update
/// (even an empty one) bumps `upload_time`.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub available_colors: Option<Vec<String>>,
    pub available_sizes: Option<Vec<String>>,
    pub published: Option<bool>,
}

impl ProductUpdate {
    /// True when no field is being changed (the write still bumps
    /// `upload_time`).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.images.is_none()
            && self.category.is_none()
            && self.available_colors.is_none()
            && self.available_sizes.is_none()
            && self.published.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_is_empty() {
        assert!(ProductUpdate::default().is_empty());

        let update = ProductUpdate {
            published: Some(true),
            ..ProductUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
