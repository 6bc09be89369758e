//! Catalog store: products joined with their category.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::entities::{
    category::{self, Entity as CategoryEntity},
    product::{self, ActiveModel, Entity as ProductEntity},
};
use crate::domain::{Category, NewProduct, Product, ProductUpdate};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by ID
    async fn list(&self) -> AppResult<Vec<Product>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<Product>>;

    /// Current unit price of every existing product among `ids`.
    ///
    /// Ids with no matching product are absent from the map.
    async fn current_prices(&self, ids: &[i32]) -> AppResult<HashMap<i32, Decimal>>;

    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// Apply a partial update; fails with NotFound if the product is absent
    async fn update(&self, id: i32, update: ProductUpdate) -> AppResult<Product>;

    /// Fails with NotFound if the product is absent
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed product repository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_category(&self, model: product::Model) -> AppResult<Product> {
        let category = CategoryEntity::find_by_id(model.category_id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Category")?;

        Ok(model.into_domain(Category::from(category)))
    }
}

fn join_category(
    rows: Vec<(product::Model, Option<category::Model>)>,
) -> AppResult<Vec<Product>> {
    rows.into_iter()
        .map(|(product, category)| {
            let category = category.ok_or_else(|| {
                AppError::internal(format!("Product {} has no category", product.id))
            })?;
            Ok(product.into_domain(Category::from(category)))
        })
        .collect()
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn list(&self) -> AppResult<Vec<Product>> {
        let rows = ProductEntity::find()
            .find_also_related(CategoryEntity)
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        join_category(rows)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let row = ProductEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match row {
            Some(row) => Ok(join_category(vec![row])?.pop()),
            None => Ok(None),
        }
    }

    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<Product>> {
        let rows = ProductEntity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .find_also_related(CategoryEntity)
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        join_category(rows)
    }

    async fn current_prices(&self, ids: &[i32]) -> AppResult<HashMap<i32, Decimal>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, Decimal)> = ProductEntity::find()
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Price)
            .filter(product::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().collect())
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(new_product.name),
            description: Set(new_product.description),
            price: Set(new_product.price),
            stock: Set(new_product.stock),
            category_id: Set(new_product.category_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        self.with_category(model).await
    }

    async fn update(&self, id: i32, update: ProductUpdate) -> AppResult<Product> {
        let existing = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Product")?;

        let mut active: ActiveModel = existing.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = update.price {
            active.price = Set(price);
        }
        if let Some(stock) = update.stock {
            active.stock = Set(stock);
        }
        if let Some(category_id) = update.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        self.with_category(model).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Product"));
        }

        Ok(())
    }
}
