//! User handlers.

use axum::{
    extract::{Extension, Path, State},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{admin_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{OwnerProfile, ProfileUpdate};
use crate::errors::AppResult;

/// Self-service profile update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    #[schema(example = "7 Harbour Road")]
    pub address: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            address: request.address,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserBody {
    pub user: OwnerProfile,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedUserBody {
    pub updated_user: OwnerProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersBody {
    pub users: Vec<OwnerProfile>,
}

/// Create user routes. The caller layers authentication on top.
pub fn user_routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/allUsers", get(list_users))
        .route_layer(middleware::from_fn(admin_middleware));

    Router::new()
        .route("/me", get(get_current_user).patch(update_current_user))
        .route("/:id", get(get_user))
        .merge(admin)
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserBody),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserBody>> {
    let user = state.user_service.get_user(current_user.id).await?;
    Ok(Json(UserBody { user: user.into() }))
}

/// Update the current user's profile
#[utoipa::path(
    patch,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UpdatedUserBody),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UpdatedUserBody>> {
    let user = state
        .user_service
        .update_profile(current_user.id, payload.into())
        .await?;

    Ok(Json(UpdatedUserBody {
        updated_user: user.into(),
    }))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/users/allUsers",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of all users", body = UsersBody),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UsersBody>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(UsersBody {
        users: users.into_iter().map(OwnerProfile::from).collect(),
    }))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserBody),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserBody>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserBody { user: user.into() }))
}
