//! Product service - catalog reads and admin maintenance.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewProduct, Product, ProductUpdate};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn get_all_products(&self) -> AppResult<Vec<Product>>;

    async fn get_product_info(&self, id: i32) -> AppResult<Product>;

    async fn get_products_by_category(&self, category_id: i32) -> AppResult<Vec<Product>>;

    async fn add_new_product(&self, product: NewProduct) -> AppResult<Product>;

    async fn update_product(&self, id: i32, update: ProductUpdate) -> AppResult<Product>;

    async fn delete_product(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_category(&self, category_id: i32) -> AppResult<()> {
        self.uow
            .categories()
            .find_by_id(category_id)
            .await?
            .ok_or_not_found("Category")
            .map(|_| ())
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn get_all_products(&self) -> AppResult<Vec<Product>> {
        self.uow.products().list().await
    }

    async fn get_product_info(&self, id: i32) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")
    }

    async fn get_products_by_category(&self, category_id: i32) -> AppResult<Vec<Product>> {
        self.uow.products().list_by_category(category_id).await
    }

    async fn add_new_product(&self, product: NewProduct) -> AppResult<Product> {
        self.ensure_category(product.category_id).await?;

        let product = self.uow.products().create(product).await?;
        tracing::info!("Product {} added to category {}", product.id, product.category_id);
        Ok(product)
    }

    async fn update_product(&self, id: i32, update: ProductUpdate) -> AppResult<Product> {
        if let Some(category_id) = update.category_id {
            self.ensure_category(category_id).await?;
        }

        let product = self.uow.products().update(id, update).await?;
        tracing::info!("Product {} updated", product.id);
        Ok(product)
    }

    async fn delete_product(&self, id: i32) -> AppResult<()> {
        self.uow.products().delete(id).await?;
        tracing::info!("Product {} deleted", id);
        Ok(())
    }
}
