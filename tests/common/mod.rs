//! In-memory Unit of Work shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use marketplace_api::config::Config;
use marketplace_api::domain::{
    Category, NewOrderItem, NewProduct, NewUser, Order, OrderItem, OrderStatus, Product,
    ProductUpdate, ProfileUpdate, Role, User,
};
use marketplace_api::errors::{AppError, AppResult};
use marketplace_api::infra::{
    CategoryRepository, OrderRepository, ProductRepository, UnitOfWork, UserRepository,
};

pub const ACCESS_SECRET: &str = "integration-access-secret-32-chars-long";
pub const REFRESH_SECRET: &str = "integration-refresh-secret-32-chars-long";

pub fn test_config() -> Config {
    Config::new(ACCESS_SECRET, REFRESH_SECRET).unwrap()
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    categories: BTreeMap<i32, Category>,
    products: BTreeMap<i32, Product>,
    orders: BTreeMap<i32, Order>,
    next_id: i32,
    next_item_id: i32,
}

impl Tables {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Every repository over one set of in-memory tables.
///
/// `fail_writes` makes order writes fail before anything is stored,
/// the way an aborted transaction leaves the database untouched.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn order_count(&self) -> usize {
        self.tables().orders.len()
    }

    pub fn order_item_count(&self) -> usize {
        self.tables().orders.values().map(|o| o.items.len()).sum()
    }

    /// Insert a user directly, bypassing registration.
    pub fn insert_user(&self, email: &str, name: &str, role: Role) -> User {
        let mut tables = self.tables();
        let user = User {
            id: tables.id(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            name: Some(name.to_string()),
            address: Some("1 Test Lane".to_string()),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    /// Insert a category and products with the given whole-unit prices.
    pub fn insert_products(&self, prices: &[i64]) -> Vec<Product> {
        let mut tables = self.tables();
        let category = Category {
            id: tables.id(),
            name: "Electronics".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.categories.insert(category.id, category.clone());

        prices
            .iter()
            .map(|price| {
                let product = Product {
                    id: tables.id(),
                    name: format!("Product {}", price),
                    description: None,
                    price: Decimal::from(*price),
                    stock: 10,
                    category_id: category.id,
                    category: category.clone(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                };
                tables.products.insert(product.id, product.clone());
                product
            })
            .collect()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut tables = self.tables();
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("email"));
        }
        let user = User {
            id: tables.id(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            address: new_user.address,
            role: new_user.role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> AppResult<User> {
        let mut tables = self.tables();
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User"))?;
        if let Some(name) = update.name {
            user.name = Some(name);
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(address) = update.address {
            user.address = Some(address);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.tables().users.values().cloned().collect())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>> {
        Ok(self.tables().categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        Ok(self
            .tables()
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn create(&self, name: String) -> AppResult<Category> {
        let mut tables = self.tables();
        let category = Category {
            id: tables.id(),
            name,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Product>> {
        Ok(self.tables().products.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        Ok(self.tables().products.get(&id).cloned())
    }

    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<Product>> {
        Ok(self
            .tables()
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn current_prices(&self, ids: &[i32]) -> AppResult<HashMap<i32, Decimal>> {
        let tables = self.tables();
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.get(id).map(|p| (p.id, p.price)))
            .collect())
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let mut tables = self.tables();
        let category = tables
            .categories
            .get(&new_product.category_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Category"))?;
        let product = Product {
            id: tables.id(),
            name: new_product.name,
            description: new_product.description,
            price: new_product.price,
            stock: new_product.stock,
            category_id: category.id,
            category,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: i32, update: ProductUpdate) -> AppResult<Product> {
        let mut tables = self.tables();
        let category = match update.category_id {
            Some(category_id) => Some(
                tables
                    .categories
                    .get(&category_id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("Category"))?,
            ),
            None => None,
        };
        let product = tables
            .products
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Product"))?;
        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(description) = update.description {
            product.description = Some(description);
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(stock) = update.stock {
            product.stock = stock;
        }
        if let Some(category) = category {
            product.category_id = category.id;
            product.category = category;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.tables()
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Product"))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create_with_items(&self, user_id: i32, items: Vec<NewOrderItem>) -> AppResult<Order> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::internal("simulated write failure"));
        }

        let mut tables = self.tables();
        let order_id = tables.id();
        let now = Utc::now();
        let items = items
            .into_iter()
            .map(|line| {
                tables.next_item_id += 1;
                OrderItem {
                    id: tables.next_item_id,
                    order_id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.price,
                    created_at: now,
                }
            })
            .collect();

        let order = Order {
            id: order_id,
            user_id,
            status: OrderStatus::Placed,
            created_at: now,
            updated_at: now,
            items,
        };
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>> {
        Ok(self.tables().orders.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<Order>> {
        Ok(self
            .tables()
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> AppResult<Order> {
        let mut tables = self.tables();
        let order = tables
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Order"))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::internal("simulated write failure"));
        }
        self.tables()
            .orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Order"))
    }
}

/// Unit of Work handing out the same [`MemoryStore`] for every repository.
#[derive(Clone, Default)]
pub struct InMemoryUnitOfWork {
    pub store: Arc<MemoryStore>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnitOfWork for InMemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.store.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.store.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.store.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.store.clone()
    }
}
