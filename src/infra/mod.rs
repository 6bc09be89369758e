//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - SeaORM entities and repositories
//! - Unit of Work handed to the services

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CategoryRepository, CategoryStore, OrderRepository, OrderStore, ProductRepository,
    ProductStore, UserRepository, UserStore,
};
pub use unit_of_work::{run_in_transaction, Persistence, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCategoryRepository, MockOrderRepository, MockProductRepository, MockUserRepository,
};
