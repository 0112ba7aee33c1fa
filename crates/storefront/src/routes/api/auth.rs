//! Session API routes.

use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::envelope::{ApiResponse, MessageData};
use crate::error::{AppError, Result, clear_sentry_user};
use crate::middleware::{SessionTokens, clear_session_cookies};
use crate::state::AppState;

/// End the client's session.
///
/// POST /api/auth/logout
///
/// Always answers with removal cookies for both session credentials, whether
/// or not the client presented them. Tokens are not revoked server-side; a
/// copied token stays valid until it expires.
///
/// # Errors
///
/// Returns a generic 500 if the removal cookies cannot be encoded.
#[instrument(skip(state, tokens), fields(authenticated = tokens.is_authenticated()))]
pub async fn logout(
    State(state): State<AppState>,
    tokens: SessionTokens,
) -> Result<impl IntoResponse> {
    let cookies = clear_session_cookies(&state.config().cookies)
        .map_err(|e| AppError::internal("An error occurred during logout", e))?;

    clear_sentry_user();
    tracing::info!("Session cleared");

    Ok((
        cookies,
        ApiResponse::success(MessageData::new("Logged out successfully")),
    ))
}
