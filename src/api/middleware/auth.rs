//! Session authentication middleware.
//!
//! The session token travels either as `Authorization: Bearer <token>` or
//! as the `session` cookie set at login. Every request that carries one is
//! resolved against the user store, so role changes and deletions apply
//! to sessions that are already open.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{User, UserRole};
use crate::errors::AppError;
use crate::services::Viewer;

/// Authenticated user resolved from the session token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::user(self.id, self.is_admin())
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Handlers that need a session take `CurrentUser`; the request is
/// rejected with 401 when no valid session was resolved.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Bearer header first, then the session cookie
fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// Resolve the session, if any, and attach `CurrentUser` to the request.
///
/// An invalid or stale token is treated as no session; only store
/// failures abort the request.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(request.headers()) {
        match state.auth_service.verify_token(&token) {
            Ok(claims) => match state.user_service.get_user(claims.sub).await {
                Ok(user) => {
                    request.extensions_mut().insert(CurrentUser::from(user));
                }
                Err(AppError::NotFound) => {
                    tracing::debug!(user_id = %claims.sub, "Session for a deleted account");
                }
                Err(e) => return Err(e),
            },
            Err(e) => tracing::debug!("Ignoring invalid session token: {}", e),
        }
    }

    Ok(next.run(request).await)
}

/// Reject requests without a resolved session.
pub async fn auth_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    if request.extensions().get::<CurrentUser>().is_none() {
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}

/// Reject requests whose session does not belong to an ADMIN.
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    require_admin(user)?;
    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
