//! Catalog API routes.
//!
//! Reads are public; writes require the admin capability.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use loomline_core::{Price, ProductId};

use crate::db::{ProductFilter, ProductRepository, SortDirection};
use crate::error::{AppError, Result};
use crate::middleware::{AccessGate, CurrentActor};
use crate::models::{NewProduct, Product, ProductUpdate};
use crate::state::AppState;

fn default_published() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Defaults to the public view; admins pass `published=false` for drafts.
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub category: Option<String>,
    /// `asc` (default) or `desc` by last-touched time.
    #[serde(default)]
    pub sort: Option<String>,
}

impl ProductListQuery {
    fn sort_direction(&self) -> SortDirection {
        match self.sort.as_deref() {
            Some("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

/// List catalog products.
///
/// GET /api/products?published=true&category=shirts&sort=desc
///
/// # Errors
///
/// 500 if the store is unavailable.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = ProductFilter {
        published: query.published,
        category: query.category.clone(),
    };

    let products = ProductRepository::new(state.pool())
        .list(&filter, query.sort_direction())
        .await?;
    Ok(Json(products))
}

/// Get one product by id.
///
/// GET /api/products/{id}
///
/// # Errors
///
/// 400 for a malformed id, 404 when no product has it.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;

    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product".to_string()))?;
    Ok(Json(product))
}

/// Fields for creating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub available_colors: Vec<String>,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

/// Create a product.
///
/// POST /api/products
///
/// # Errors
///
/// 403 for non-admin actors, 400 for invalid fields.
pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    AccessGate::new(state.pool()).require_admin(&actor).await?;

    if request.name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    let product = ProductRepository::new(state.pool())
        .create(NewProduct {
            name: request.name,
            price: request.price,
            description: request.description,
            images: request.images,
            category: request.category,
            available_colors: request.available_colors,
            available_sizes: request.available_sizes,
            published: request.published,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Partial update payload; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub available_colors: Option<Vec<String>>,
    pub available_sizes: Option<Vec<String>>,
    pub published: Option<bool>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        Self {
            name: request.name,
            price: request.price,
            description: request.description,
            images: request.images,
            category: request.category,
            available_colors: request.available_colors,
            available_sizes: request.available_sizes,
            published: request.published,
        }
    }
}

/// Apply a partial update and return the updated product.
///
/// PUT /api/products/{id}
///
/// # Errors
///
/// 403 for non-admin actors, 400 for a malformed id, 404 when no product
/// has it.
pub async fn update(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    AccessGate::new(state.pool()).require_admin(&actor).await?;
    let id = parse_id(&id)?;

    let repo = ProductRepository::new(state.pool());
    repo.update(id, &request.into()).await?;

    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product".to_string()))?;
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct SetPublishedRequest {
    pub published: bool,
}

/// Set a product's visibility.
///
/// PATCH /api/products/{id}/published
///
/// # Errors
///
/// 403 for non-admin actors, 400 for a malformed id, 404 when no product
/// has it.
pub async fn set_published(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Json(request): Json<SetPublishedRequest>,
) -> Result<StatusCode> {
    AccessGate::new(state.pool()).require_admin(&actor).await?;
    let id = parse_id(&id)?;

    ProductRepository::new(state.pool())
        .set_published(id, request.published)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_wire_format() {
        let json = r#"{
            "name": "Linen Shirt",
            "price": "19.99",
            "description": "Breathable",
            "category": "shirts",
            "availableColors": ["Indigo"],
            "availableSizes": ["M", "L"],
            "published": true
        }"#;

        let request: CreateProductRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Linen Shirt");
        assert_eq!(request.price.minor_units(), 1999);
        assert_eq!(request.available_sizes, vec!["M", "L"]);
        assert!(request.images.is_empty());
    }

    #[test]
    fn test_create_request_rejects_negative_price() {
        let json = r#"{"name": "Linen Shirt", "price": "-1.00"}"#;
        assert!(serde_json::from_str::<CreateProductRequest>(json).is_err());
    }

    #[test]
    fn test_update_request_defaults_to_untouched() {
        let request: UpdateProductRequest = serde_json::from_str("{}").unwrap();
        let update: ProductUpdate = request.into();
        assert!(update.is_empty());
    }

    #[test]
    fn test_sort_direction_parsing() {
        let query = |sort: Option<&str>| ProductListQuery {
            published: true,
            category: None,
            sort: sort.map(String::from),
        };

        assert_eq!(query(Some("asc")).sort_direction(), SortDirection::Ascending);
        assert_eq!(
            query(Some("desc")).sort_direction(),
            SortDirection::Descending
        );
        // Only an explicit `desc` flips the order.
        assert_eq!(query(None).sort_direction(), SortDirection::Ascending);
        assert_eq!(
            query(Some("sideways")).sort_direction(),
            SortDirection::Ascending
        );
    }
}
