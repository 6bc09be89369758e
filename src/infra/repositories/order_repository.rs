//! Order store: headers and their snapshotted lines.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::{
    order::{self, ActiveModel, Entity as OrderEntity},
    order_item::{self, Entity as OrderItemEntity},
};
use crate::domain::{NewOrderItem, Order, OrderStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::unit_of_work::run_in_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a PLACED header and all its lines in one transaction
    async fn create_with_items(&self, user_id: i32, items: Vec<NewOrderItem>) -> AppResult<Order>;

    /// Find an order with its lines
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>>;

    /// Orders owned by `user_id`, ordered by ID
    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<Order>>;

    /// Overwrite the status; lines are untouched
    async fn update_status(&self, id: i32, status: OrderStatus) -> AppResult<Order>;

    /// Remove header and lines in one transaction
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed order repository
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_items(&self, header: &order::Model) -> AppResult<Vec<order_item::Model>> {
        header
            .find_related(OrderItemEntity)
            .order_by_asc(order_item::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn create_with_items(&self, user_id: i32, items: Vec<NewOrderItem>) -> AppResult<Order> {
        run_in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let now = chrono::Utc::now();
                let header = ActiveModel {
                    user_id: Set(user_id),
                    status: Set(OrderStatus::Placed.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let mut lines = Vec::with_capacity(items.len());
                for item in items {
                    let line = order_item::ActiveModel {
                        order_id: Set(header.id),
                        product_id: Set(item.product_id),
                        quantity: Set(item.quantity),
                        price: Set(item.price),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    lines.push(line);
                }

                header.into_domain(lines)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>> {
        let Some(header) = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let items = self.load_items(&header).await?;
        header.into_domain(items).map(Some)
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<Order>> {
        let rows = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_asc(order::Column::Id)
            .find_with_related(OrderItemEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        rows.into_iter()
            .map(|(header, items)| header.into_domain(items))
            .collect()
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> AppResult<Order> {
        let header = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Order")?;

        let mut active: ActiveModel = header.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now());

        let header = active.update(&self.db).await.map_err(AppError::from)?;
        let items = self.load_items(&header).await?;
        header.into_domain(items)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        run_in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                OrderItemEntity::delete_many()
                    .filter(order_item::Column::OrderId.eq(id))
                    .exec(txn)
                    .await?;

                let result = OrderEntity::delete_by_id(id).exec(txn).await?;
                if result.rows_affected == 0 {
                    return Err(AppError::not_found("Order"));
                }

                Ok(())
            })
        })
        .await
    }
}
