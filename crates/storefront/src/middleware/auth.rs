//! Authentication middleware and extractors.
//!
//! A session is either anonymous or holds the logged-in [`UserId`] under
//! [`session_keys::USER_ID`]. [`login_user`] and [`logout_user`] are the only
//! transitions between the two. The user record is loaded from the store on
//! every request, so a deleted account stops being logged in immediately.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use safehub_core::UserId;

use crate::db::users::UserRepository;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{User, session_keys};
use crate::state::AppState;

/// Where anonymous visitors are sent when a route requires login.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires an authenticated user.
///
/// If the user is not logged in, the handler does not run and the request is
/// redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Error returned when authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// The session layer is missing from the stack.
    MissingSession,
    /// The session or the user store could not be read.
    Failed(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::MissingSession => {
                tracing::error!("Session layer missing; RequireAuth cannot run");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Self::Failed(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::MissingSession)?;
        let app_state = AppState::from_ref(state);

        current_user(session, app_state.pool())
            .await
            .map_err(AuthRejection::Failed)?
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if the user is not logged in.
pub struct OptionalAuth(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session, AppState::from_ref(state).pool()).await?,
            None => None,
        };

        Ok(Self(user))
    }
}

/// Load the logged-in user for this session.
///
/// A session whose user no longer exists is downgraded to anonymous.
///
/// # Errors
///
/// Returns an error if the session or the user store cannot be read.
pub async fn current_user(
    session: &Session,
    pool: &SqlitePool,
) -> Result<Option<User>, AppError> {
    let Some(user_id) = session.get::<UserId>(session_keys::USER_ID).await? else {
        return Ok(None);
    };

    let user = UserRepository::new(pool).get_by_id(user_id).await?;
    if user.is_none() {
        tracing::info!(user_id = %user_id, "Session user no longer exists; logging out");
        session.remove::<UserId>(session_keys::USER_ID).await?;
    }

    Ok(user)
}

/// Mark `user` as the session principal.
///
/// The session ID is rotated first so an ID planted before login is useless
/// afterwards.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn login_user(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::USER_ID, user.id).await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(())
}

/// Clear the session principal.
///
/// The session itself survives (with a new ID) so that queued flash messages
/// still reach the next page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn logout_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    let previous = session.remove::<UserId>(session_keys::USER_ID).await?;
    session.cycle_id().await?;

    clear_sentry_user();
    if let Some(user_id) = previous {
        tracing::info!(user_id = %user_id, "User logged out");
    }
    Ok(())
}
