//! Seed command - demo catalog and an optional admin account.
//!
//! Safe to run repeatedly: existing rows are left as they are.

use rust_decimal::Decimal;

use crate::cli::args::SeedArgs;
use crate::config::{Config, SEED_CATEGORY, SEED_PRODUCTS};
use crate::domain::{NewProduct, NewUser, Password, Role};
use crate::errors::AppResult;
use crate::infra::{Database, Persistence, UnitOfWork};

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let uow = Persistence::new(db.get_connection());

    seed_catalog(&uow).await?;

    if let (Some(email), Some(password)) = (args.admin_email, args.admin_password) {
        seed_admin(&uow, email, &password).await?;
    }

    Ok(())
}

/// Create the seed category and any of its products that are missing.
pub async fn seed_catalog<U: UnitOfWork>(uow: &U) -> AppResult<()> {
    let category = match uow.categories().find_by_name(SEED_CATEGORY).await? {
        Some(category) => category,
        None => {
            let category = uow.categories().create(SEED_CATEGORY.to_string()).await?;
            tracing::info!("Created category {}", category.name);
            category
        }
    };

    let existing = uow.products().list_by_category(category.id).await?;

    for (name, description, price, stock) in SEED_PRODUCTS {
        if existing.iter().any(|product| product.name == *name) {
            tracing::debug!("Product {} already present", name);
            continue;
        }

        let product = uow
            .products()
            .create(NewProduct {
                name: name.to_string(),
                description: Some(description.to_string()),
                price: Decimal::from(*price),
                stock: *stock,
                category_id: category.id,
            })
            .await?;
        tracing::info!("Created product {} ({})", product.name, product.price);
    }

    Ok(())
}

/// Create an ADMIN account unless the email is already registered.
pub async fn seed_admin<U: UnitOfWork>(uow: &U, email: String, password: &str) -> AppResult<()> {
    if uow.users().find_by_email(&email).await?.is_some() {
        tracing::warn!("User {} already exists, admin not created", email);
        return Ok(());
    }

    let password_hash = Password::new(password)?.into_string();
    let admin = uow
        .users()
        .create(NewUser {
            email,
            password_hash,
            name: Some("Administrator".to_string()),
            address: None,
            role: Role::Admin,
        })
        .await?;

    tracing::info!("Created admin {} ({})", admin.id, admin.email);
    Ok(())
}
