//! Tracking handlers: status lookup and update on top of the order service.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::order_handler::UpdateStatusRequest;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::admin_middleware;
use crate::api::AppState;
use crate::domain::{Order, StatusInfo};
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfoBody {
    pub status_info: StatusInfo,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedStatusBody {
    pub updated_status: Order,
}

/// Create tracking routes. The caller layers authentication on top.
pub fn tracking_routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/update/:order_id", patch(update_status))
        .route_layer(middleware::from_fn(admin_middleware));

    Router::new()
        .route("/status/:order_id", get(get_status))
        .merge(admin)
}

/// Current status of an order
#[utoipa::path(
    get,
    path = "/tracking/status/{orderId}",
    tag = "Tracking",
    security(("bearer_auth" = [])),
    params(
        ("orderId" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Status and timestamps", body = StatusInfoBody),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> AppResult<Json<StatusInfoBody>> {
    let status_info = state.order_service.get_order_status(order_id).await?;
    Ok(Json(StatusInfoBody { status_info }))
}

/// Move an order to a new status (admin only)
#[utoipa::path(
    patch,
    path = "/tracking/update/{orderId}",
    tag = "Tracking",
    security(("bearer_auth" = [])),
    params(
        ("orderId" = i32, Path, description = "Order ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = UpdatedStatusBody),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<UpdatedStatusBody>> {
    let details = state
        .order_service
        .update_order_status(order_id, payload.status)
        .await?;

    Ok(Json(UpdatedStatusBody {
        updated_status: details.order,
    }))
}
