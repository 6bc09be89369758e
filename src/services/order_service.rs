//! Order service - placing orders and managing their lifecycle.
//!
//! Sole writer of orders and their lines. Prices are snapshotted at
//! creation and never re-read from the catalog afterwards.

use async_trait::async_trait;
use std::sync::Arc;

use super::pricing;
use crate::domain::{
    AdminOrderDetails, Order, OrderDetails, OrderStatus, OwnerProfile, StatusInfo, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Place an order for `user_id` from a list of product ids.
    ///
    /// Unknown ids are skipped; fails if none of them exist.
    async fn create_order(&self, user_id: i32, product_ids: Vec<i32>) -> AppResult<Order>;

    /// Order with the full owner profile
    async fn get_order_info(&self, order_id: i32) -> AppResult<OrderDetails>;

    /// Every order owned by `user_id`; empty when there are none
    async fn get_user_orders(&self, user_id: i32) -> AppResult<Vec<OrderDetails>>;

    /// Overwrite the status of an order
    async fn update_order_status(
        &self,
        order_id: i32,
        status: OrderStatus,
    ) -> AppResult<OrderDetails>;

    /// Remove an order and its lines
    async fn delete_order(&self, order_id: i32) -> AppResult<()>;

    /// Order with the `{id, name, email}` owner projection
    async fn admin_get_order_info(&self, order_id: i32) -> AppResult<AdminOrderDetails>;

    /// Status and timestamps only
    async fn get_order_status(&self, order_id: i32) -> AppResult<StatusInfo>;
}

/// Concrete implementation of OrderService using Unit of Work.
pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_order(&self, order_id: i32) -> AppResult<Order> {
        self.uow
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_not_found("Order")
    }

    async fn owner(&self, user_id: i32) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")
    }

    async fn with_owner(&self, order: Order) -> AppResult<OrderDetails> {
        let user = self.owner(order.user_id).await?;
        Ok(OrderDetails {
            order,
            user: OwnerProfile::from(user),
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn create_order(&self, user_id: i32, product_ids: Vec<i32>) -> AppResult<Order> {
        let distinct = pricing::distinct_ids(&product_ids);
        let prices = self.uow.products().current_prices(&distinct).await?;

        let lines = pricing::snapshot(&product_ids, &prices);
        if lines.is_empty() {
            return Err(AppError::validation(
                "Order must contain at least one existing product",
            ));
        }

        let order = self.uow.orders().create_with_items(user_id, lines).await?;
        tracing::info!(
            "Order {} created for user {} ({} items, total {})",
            order.id,
            user_id,
            order.items.len(),
            order.total()
        );

        Ok(order)
    }

    async fn get_order_info(&self, order_id: i32) -> AppResult<OrderDetails> {
        let order = self.find_order(order_id).await?;
        self.with_owner(order).await
    }

    async fn get_user_orders(&self, user_id: i32) -> AppResult<Vec<OrderDetails>> {
        let orders = self.uow.orders().list_by_user(user_id).await?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let profile = OwnerProfile::from(self.owner(user_id).await?);
        Ok(orders
            .into_iter()
            .map(|order| OrderDetails {
                order,
                user: profile.clone(),
            })
            .collect())
    }

    async fn update_order_status(
        &self,
        order_id: i32,
        status: OrderStatus,
    ) -> AppResult<OrderDetails> {
        let order = self.uow.orders().update_status(order_id, status).await?;
        tracing::info!("Order {} status set to {}", order.id, order.status);

        self.with_owner(order).await
    }

    async fn delete_order(&self, order_id: i32) -> AppResult<()> {
        self.uow.orders().delete(order_id).await?;
        tracing::info!("Order {} deleted", order_id);
        Ok(())
    }

    async fn admin_get_order_info(&self, order_id: i32) -> AppResult<AdminOrderDetails> {
        let order = self.find_order(order_id).await?;
        let user = self.owner(order.user_id).await?;

        Ok(AdminOrderDetails {
            order,
            user: user.into(),
        })
    }

    async fn get_order_status(&self, order_id: i32) -> AppResult<StatusInfo> {
        let order = self.find_order(order_id).await?;
        Ok(StatusInfo::from(&order))
    }
}
