//! Product repository: typed access to the catalog.
//!
//! No business logic lives here beyond what the column types enforce;
//! identifier validation happens in `loomline_core` before a `ProductId`
//! can exist.

use sqlx::{PgPool, Postgres, QueryBuilder};

use loomline_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductUpdate};

const PRODUCT_COLUMNS: &str = "id, name, price, description, images, category, \
     available_colors, available_sizes, published, upload_time";

/// Catalog listing filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub published: bool,
    pub category: Option<String>,
}

/// Sort direction for `upload_time` ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Repository for catalog operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List products matching the filter, ordered by `upload_time`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        sort: SortDirection,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE published = "
        ));
        query.push_bind(filter.published);

        if let Some(category) = &filter.category {
            query.push(" AND category = ");
            query.push_bind(category);
        }

        query.push(match sort {
            SortDirection::Ascending => " ORDER BY upload_time ASC",
            SortDirection::Descending => " ORDER BY upload_time DESC",
        });

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Insert a new product, stamping `upload_time`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, fields: NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO shop.product \
                 (name, price, description, images, category, \
                  available_colors, available_sizes, published, upload_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now()) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.description)
        .bind(&fields.images)
        .bind(&fields.category)
        .bind(&fields.available_colors)
        .bind(&fields.available_sizes)
        .bind(fields.published)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a partial update. Always bumps `upload_time`, even when the
    /// provided fields match the stored values (last write bumps recency).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<(), RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE shop.product SET upload_time = now()");

        if let Some(name) = &update.name {
            query.push(", name = ");
            query.push_bind(name);
        }
        if let Some(price) = update.price {
            query.push(", price = ");
            query.push_bind(price);
        }
        if let Some(description) = &update.description {
            query.push(", description = ");
            query.push_bind(description);
        }
        if let Some(images) = &update.images {
            query.push(", images = ");
            query.push_bind(images);
        }
        if let Some(category) = &update.category {
            query.push(", category = ");
            query.push_bind(category);
        }
        if let Some(colors) = &update.available_colors {
            query.push(", available_colors = ");
            query.push_bind(colors);
        }
        if let Some(sizes) = &update.available_sizes {
            query.push(", available_sizes = ");
            query.push_bind(sizes);
        }
        if let Some(published) = update.published {
            query.push(", published = ");
            query.push_bind(published);
        }

        query.push(" WHERE id = ");
        query.push_bind(id.as_uuid());

        let result = query.build().execute(self.pool).await?;

        // A row that exists is always touched (the upload_time bump), so
        // zero rows affected can only mean the ID does not exist.
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set the `published` flag. A restricted case of [`Self::update`];
    /// idempotent, and bumps `upload_time` like every other write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_published(
        &self,
        id: ProductId,
        published: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.product SET published = $1, upload_time = now() WHERE id = $2",
        )
        .bind(published)
        .bind(id.as_uuid())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
