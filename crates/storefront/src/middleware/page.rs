//! Per-request context shared by every rendered page.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::{Flashes, OptionalAuth};
use crate::error::AppError;
use crate::models::{Flash, User};
use crate::state::AppState;

/// What the base layout needs: who is logged in and which flashes to show.
///
/// Extracting this consumes the pending flash messages.
#[derive(Debug, Default)]
pub struct PageContext {
    pub current_user: Option<User>,
    pub flashes: Vec<Flash>,
}

impl<S> FromRequestParts<S> for PageContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalAuth(current_user) = OptionalAuth::from_request_parts(parts, state).await?;
        let Ok(Flashes(flashes)) = Flashes::from_request_parts(parts, state).await;

        Ok(Self {
            current_user,
            flashes,
        })
    }
}
