//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, order_handler, product_handler, tracking_handler, user_handler,
};
use crate::domain::{
    AdminOrderDetails, Category, Order, OrderDetails, OrderItem, OrderStatus, OwnerProfile,
    OwnerSummary, Product, Role, StatusInfo,
};
use crate::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        version = "0.1.0",
        description = "Accounts, product catalog, order placement and order tracking",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh,
        auth_handler::logout,
        user_handler::get_current_user,
        user_handler::update_current_user,
        user_handler::list_users,
        user_handler::get_user,
        product_handler::get_all_products,
        product_handler::get_product,
        product_handler::get_products_by_category,
        product_handler::add_product,
        product_handler::update_product,
        product_handler::delete_product,
        order_handler::create_order,
        order_handler::get_order_info,
        order_handler::get_user_orders,
        order_handler::update_order_status,
        order_handler::delete_order,
        order_handler::admin_get_order_info,
        tracking_handler::get_status,
        tracking_handler::update_status,
    ),
    components(
        schemas(
            Role,
            OwnerProfile,
            OwnerSummary,
            Category,
            Product,
            OrderStatus,
            OrderItem,
            Order,
            OrderDetails,
            AdminOrderDetails,
            StatusInfo,
            MessageResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RegisterResponse,
            auth_handler::LoginResponse,
            auth_handler::AccessTokenResponse,
            user_handler::UpdateProfileRequest,
            user_handler::UserBody,
            user_handler::UpdatedUserBody,
            user_handler::UsersBody,
            product_handler::CreateProductRequest,
            product_handler::UpdateProductRequest,
            product_handler::ProductsBody,
            product_handler::ProductBody,
            product_handler::ProductsByCategoryBody,
            product_handler::NewProductBody,
            product_handler::UpdatedProductBody,
            order_handler::CreateOrderRequest,
            order_handler::UpdateStatusRequest,
            order_handler::OrderLineSummary,
            order_handler::UserOrderSummary,
            order_handler::OrderBody,
            order_handler::OrderInfoBody,
            order_handler::AdminOrderInfoBody,
            order_handler::UserOrdersBody,
            order_handler::UpdatedOrderBody,
            tracking_handler::StatusInfoBody,
            tracking_handler::UpdatedStatusBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Users", description = "Profiles"),
        (name = "Products", description = "Catalog"),
        (name = "Orders", description = "Order placement and lifecycle"),
        (name = "Tracking", description = "Order status")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /auth/login or /auth/register"))
                        .build(),
                ),
            );
        }
    }
}
