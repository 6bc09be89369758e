//! Domain layer - Core business entities and logic
//!
//! Plain data and value objects, independent of storage and transport.

pub mod order;
pub mod password;
pub mod product;
pub mod user;

pub use order::{
    AdminOrderDetails, NewOrderItem, Order, OrderDetails, OrderItem, OrderStatus, StatusInfo,
};
pub use password::Password;
pub use product::{Category, NewProduct, Product, ProductUpdate};
pub use user::{NewUser, OwnerProfile, OwnerSummary, ProfileUpdate, Role, User};
