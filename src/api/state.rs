//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, OrderService, ProductService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub product_service: Arc<dyn ProductService>,
    pub order_service: Arc<dyn OrderService>,
    /// Database handle for health checks; absent when services are wired
    /// to something other than a live connection.
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Wire every service to a live database connection.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::new(&container, Some(database))
    }

    /// Build state from any service container.
    pub fn new(container: &dyn ServiceContainer, database: Option<Arc<Database>>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            product_service: container.products(),
            order_service: container.orders(),
            database,
        }
    }
}
