//! Authentication route handlers.

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    error::{AppError, clear_sentry_user, set_sentry_user},
    middleware::{OptionalUser, clear_current_user, set_current_user},
    models::CurrentUser,
    services::EmailAuthBackend,
    state::AppState,
};

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

/// Login form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Log in with email and password.
///
/// POST /auth/login
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if the credentials don't match an account.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<CurrentUser>, AppError> {
    let user = EmailAuthBackend::new(state.pool())
        .authenticate(&form.email, &form.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(user.id.as_i32(), Some(user.email.as_str()));

    Ok(Json(current))
}

/// Log out and drop the session.
///
/// POST /auth/logout
///
/// # Errors
///
/// Returns `AppError::Session` if the session can't be deleted.
pub async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in user, or `null`.
///
/// GET /auth/me
pub async fn me(OptionalUser(user): OptionalUser) -> Json<Option<CurrentUser>> {
    Json(user)
}
