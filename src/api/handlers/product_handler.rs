//! Catalog handlers. Reads are public; writes are admin only.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::admin_middleware;
use crate::api::AppState;
use crate::domain::{NewProduct, Product, ProductUpdate};
use crate::errors::AppResult;
use crate::types::MessageResponse;

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut error = ValidationError::new("range");
        error.message = Some("Price must be zero or greater".into());
        return Err(error);
    }
    Ok(())
}

/// New catalog product
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 2, max = 150))]
    #[schema(example = "Tablet")]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    #[schema(value_type = f64, example = 499.99)]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Stock must be zero or greater"))]
    #[schema(example = 25)]
    pub stock: i32,
    #[validate(range(min = 1, message = "Category ID must be positive"))]
    #[schema(example = 1)]
    pub category_id: i32,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
            category_id: request.category_id,
        }
    }
}

/// Partial product update
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 2, max = 150))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock must be zero or greater"))]
    pub stock: Option<i32>,
    #[validate(range(min = 1, message = "Category ID must be positive"))]
    pub category_id: Option<i32>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
            category_id: request.category_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsBody {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductBody {
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductsByCategoryBody {
    pub products_by_category: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProductBody {
    pub new_product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedProductBody {
    pub updated_product: Product,
}

/// Public catalog routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_products))
        .route("/:id", get(get_product))
        .route("/category/:category_id", get(get_products_by_category))
}

/// Admin catalog routes. The caller layers authentication on top.
pub fn product_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/addproduct", post(add_product))
        .route("/admin/updateproduct/:id", patch(update_product))
        .route("/admin/deleteproduct/:id", delete(delete_product))
        .route_layer(middleware::from_fn(admin_middleware))
}

/// List every product with its category
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = ProductsBody)
    )
)]
pub async fn get_all_products(State(state): State<AppState>) -> AppResult<Json<ProductsBody>> {
    let products = state.product_service.get_all_products().await?;
    Ok(Json(ProductsBody { products }))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product", body = ProductBody),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ProductBody>> {
    let product = state.product_service.get_product_info(id).await?;
    Ok(Json(ProductBody { product }))
}

/// List products of one category
#[utoipa::path(
    get,
    path = "/products/category/{categoryId}",
    tag = "Products",
    params(
        ("categoryId" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Products in the category", body = ProductsByCategoryBody)
    )
)]
pub async fn get_products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> AppResult<Json<ProductsByCategoryBody>> {
    let products = state
        .product_service
        .get_products_by_category(category_id)
        .await?;

    Ok(Json(ProductsByCategoryBody {
        products_by_category: products,
    }))
}

/// Add a product (admin only)
#[utoipa::path(
    post,
    path = "/products/admin/addproduct",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = NewProductBody),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn add_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Json<NewProductBody>> {
    let new_product = state.product_service.add_new_product(payload.into()).await?;
    Ok(Json(NewProductBody { new_product }))
}

/// Update a product (admin only)
#[utoipa::path(
    patch,
    path = "/products/admin/updateproduct/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = UpdatedProductBody),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<UpdatedProductBody>> {
    let updated_product = state
        .product_service
        .update_product(id, payload.into())
        .await?;

    Ok(Json(UpdatedProductBody { updated_product }))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/products/admin/deleteproduct/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.product_service.delete_product(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        assert!(non_negative_price(&Decimal::from(-1)).is_err());
        assert!(non_negative_price(&Decimal::ZERO).is_ok());
        assert!(non_negative_price(&Decimal::new(1999, 2)).is_ok());
    }
}
