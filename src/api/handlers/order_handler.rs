//! Order handlers.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    Extension,
    routing::{delete, get, patch, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{admin_middleware, ensure_owner, CurrentUser};
use crate::api::AppState;
use crate::domain::{AdminOrderDetails, Order, OrderDetails, OrderItem, OrderStatus};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Place an order from a list of product ids
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(range(min = 1, message = "User ID must be positive"))]
    #[schema(example = 5)]
    pub user_id: i32,
    #[validate(length(min = 1, message = "At least one product is required"))]
    #[schema(example = json!([1, 2]))]
    pub product_ids: Vec<i32>,
}

/// New order status
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Order line as listed under a user's orders
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineSummary {
    pub product_id: i32,
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub price: Decimal,
}

impl From<OrderItem> for OrderLineSummary {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Compact order view used by `/orders/users/{userId}`
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserOrderSummary {
    pub order_id: i32,
    pub user_id: i32,
    pub status: OrderStatus,
    pub items: Vec<OrderLineSummary>,
}

impl From<OrderDetails> for UserOrderSummary {
    fn from(details: OrderDetails) -> Self {
        let order = details.order;
        Self {
            order_id: order.id,
            user_id: order.user_id,
            status: order.status,
            items: order.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderBody {
    pub order: Order,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfoBody {
    pub order_info: OrderDetails,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderInfoBody {
    pub order_info: AdminOrderDetails,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserOrdersBody {
    pub user_orders: Vec<UserOrderSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedOrderBody {
    pub updated_order: OrderDetails,
}

/// Create order routes. The caller layers authentication on top.
pub fn order_routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/update-status/:order_id", patch(update_order_status))
        .route("/admin/info/:order_id", get(admin_get_order_info))
        .route_layer(middleware::from_fn(admin_middleware));

    Router::new()
        .route("/create", post(create_order))
        .route("/info/:order_id", get(get_order_info))
        .route("/users/:user_id", get(get_user_orders))
        .route("/delete/:order_id", delete(delete_order))
        .merge(admin)
}

/// Place an order
#[utoipa::path(
    post,
    path = "/orders/create",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order placed with snapshotted prices", body = OrderBody),
        (status = 400, description = "Validation error or no existing products"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - ordering for another user")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<Json<OrderBody>> {
    ensure_owner(&current_user, payload.user_id)?;

    let order = state
        .order_service
        .create_order(payload.user_id, payload.product_ids)
        .await?;

    Ok(Json(OrderBody { order }))
}

/// Get an order with its owner
#[utoipa::path(
    get,
    path = "/orders/info/{orderId}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("orderId" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with owner profile", body = OrderInfoBody),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order_info(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(order_id): Path<i32>,
) -> AppResult<Json<OrderInfoBody>> {
    let order_info = state.order_service.get_order_info(order_id).await?;
    ensure_owner(&current_user, order_info.order.user_id)?;
    Ok(Json(OrderInfoBody { order_info }))
}

/// List the orders of a user
#[utoipa::path(
    get,
    path = "/orders/users/{userId}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("userId" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Orders owned by the user", body = UserOrdersBody),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the owner")
    )
)]
pub async fn get_user_orders(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<UserOrdersBody>> {
    ensure_owner(&current_user, user_id)?;

    let orders = state.order_service.get_user_orders(user_id).await?;
    Ok(Json(UserOrdersBody {
        user_orders: orders.into_iter().map(Into::into).collect(),
    }))
}

/// Overwrite the status of an order (admin only)
#[utoipa::path(
    patch,
    path = "/orders/update-status/{orderId}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("orderId" = i32, Path, description = "Order ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Order updated", body = UpdatedOrderBody),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<UpdatedOrderBody>> {
    let updated_order = state
        .order_service
        .update_order_status(order_id, payload.status)
        .await?;

    Ok(Json(UpdatedOrderBody { updated_order }))
}

/// Delete an order and its lines
#[utoipa::path(
    delete,
    path = "/orders/delete/{orderId}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("orderId" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(order_id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let existing = state.order_service.get_order_info(order_id).await?;
    ensure_owner(&current_user, existing.order.user_id)?;

    state.order_service.delete_order(order_id).await?;
    Ok(Json(MessageResponse::new("Order deleted successfully")))
}

/// Get an order with the narrow owner projection (admin only)
#[utoipa::path(
    get,
    path = "/orders/admin/info/{orderId}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("orderId" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with owner id, name and email", body = AdminOrderInfoBody),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn admin_get_order_info(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> AppResult<Json<AdminOrderInfoBody>> {
    let order_info = state.order_service.admin_get_order_info(order_id).await?;
    Ok(Json(AdminOrderInfoBody { order_info }))
}
