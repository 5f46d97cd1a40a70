//! Authentication route handlers.
//!
//! Registration, login and logout. Every POST answers with a `303` redirect;
//! the outcome is reported through a flash message on the next page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, login_user, logout_user, push_flash};
use crate::models::Flash;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Where a successful login or registration lands.
const AFTER_LOGIN_PATH: &str = "/products";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data. Missing fields deserialize as empty strings.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data. Missing fields deserialize as empty strings.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(page: PageContext) -> impl IntoResponse {
    RegisterTemplate { page }
}

/// Warning shown for a rejected registration, or `None` for system failures.
const fn registration_warning(err: &AuthError) -> Option<&'static str> {
    match err {
        AuthError::MissingFields => Some("All fields are required."),
        AuthError::UserAlreadyExists => Some("Email already registered."),
        _ => None,
    }
}

/// Handle registration form submission.
///
/// On success the new user is logged in immediately.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let result = AuthService::new(state.pool())
        .register(&form.name, &form.email, &form.password)
        .await;

    let user = match result {
        Ok(user) => user,
        Err(e) => {
            let Some(warning) = registration_warning(&e) else {
                return Err(e.into());
            };
            tracing::info!("Registration rejected: {e}");
            push_flash(&session, Flash::warning(warning)).await?;
            return Ok(Redirect::to("/register").into_response());
        }
    };

    login_user(&session, &user).await?;
    push_flash(
        &session,
        Flash::success(format!("Welcome to SafeHub, {}!", user.name)),
    )
    .await?;
    let user_id = user.id.to_string();
    add_breadcrumb("auth", "Registered", Some(&[("user_id", user_id.as_str())]));

    Ok(Redirect::to(AFTER_LOGIN_PATH).into_response())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(page: PageContext) -> impl IntoResponse {
    LoginTemplate { page }
}

/// Handle login form submission.
///
/// Unknown email and wrong password get the same message.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let result = AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await;

    let user = match result {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login rejected: invalid credentials");
            push_flash(&session, Flash::danger("Invalid credentials.")).await?;
            return Ok(Redirect::to("/login").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    login_user(&session, &user).await?;
    push_flash(&session, Flash::success("Signed in.")).await?;
    let user_id = user.id.to_string();
    add_breadcrumb("auth", "Signed in", Some(&[("user_id", user_id.as_str())]));

    Ok(Redirect::to(AFTER_LOGIN_PATH).into_response())
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Anonymous callers never get here: `RequireAuth` redirects them to `/login`.
#[instrument(skip_all)]
pub async fn logout(_user: RequireAuth, session: Session) -> Result<Response> {
    logout_user(&session).await?;
    push_flash(&session, Flash::info("Signed out.")).await?;

    Ok(Redirect::to("/").into_response())
}
