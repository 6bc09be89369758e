//! Access control gate: bearer authentication and role checks.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::api::AppState;
use crate::domain::Role;
use crate::errors::AppError;

/// Identity taken from a verified access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// JWT authentication middleware.
///
/// Rejects with 401 unless the request carries a valid
/// `Authorization: Bearer` access token, then injects [`CurrentUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_access_token(bearer.token())?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.user_id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Admin-only gate. Must run after [`auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let current_user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    authorize(current_user, &[Role::Admin])?;

    Ok(next.run(request).await)
}

/// Pass if the user's role is one of `allowed`, otherwise Forbidden.
pub fn authorize(user: &CurrentUser, allowed: &[Role]) -> Result<(), AppError> {
    let permitted = allowed.iter().any(|role| match (role, user.role) {
        (Role::Admin, Role::Admin) | (Role::User, Role::User) => true,
        (Role::Admin, Role::User) | (Role::User, Role::Admin) => false,
    });

    if permitted {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Pass if `user` owns the resource or is an admin, otherwise Forbidden.
pub fn ensure_owner(user: &CurrentUser, owner_id: i32) -> Result<(), AppError> {
    if user.is_admin() || user.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser { id: 1, role }
    }

    #[test]
    fn test_authorize_matches_roles() {
        assert!(authorize(&user(Role::Admin), &[Role::Admin]).is_ok());
        assert!(authorize(&user(Role::User), &[Role::User, Role::Admin]).is_ok());
        assert!(matches!(
            authorize(&user(Role::User), &[Role::Admin]),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_authorize_with_no_roles_denies() {
        assert!(authorize(&user(Role::Admin), &[]).is_err());
    }

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(&user(Role::User), 1).is_ok());
        assert!(matches!(
            ensure_owner(&user(Role::User), 2),
            Err(AppError::Forbidden)
        ));
        assert!(ensure_owner(&user(Role::Admin), 2).is_ok());
    }
}
