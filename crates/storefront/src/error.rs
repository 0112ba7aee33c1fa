//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Errors are rendered as the failure form of the [`ApiResponse`] envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::envelope::ApiResponse;
use crate::validation::ValidationErrors;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Storage failed while reading data; `context` is shown to the client.
    #[error("{context}: {source}")]
    Retrieval {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unexpected fault; `context` is shown to the client.
    #[error("{context}: {detail}")]
    Internal { context: &'static str, detail: String },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

impl AppError {
    /// Wrap a repository error with the message clients should see.
    ///
    /// ```rust,ignore
    /// repo.list_approved().await.map_err(AppError::retrieval("Failed to fetch vendors"))?;
    /// ```
    pub fn retrieval(context: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| Self::Retrieval { context, source }
    }

    /// Build an unexpected fault with the message clients should see.
    pub fn internal(context: &'static str, detail: impl ToString) -> Self {
        Self::Internal {
            context,
            detail: detail.to_string(),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Retrieval { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Retrieval { .. } | Self::Internal { .. }) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match self {
            Self::Validation(errors) => {
                ApiResponse::failure("Validation failed").with_details(errors.into_errors())
            }
            Self::Retrieval { context, .. } | Self::Internal { context, .. } => {
                ApiResponse::failure(context)
            }
            Self::BadRequest(message) | Self::NotFound(message) => ApiResponse::failure(message),
            Self::RateLimited => ApiResponse::failure("Too many requests"),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Validated add to cart", Some(&[("product_id", "c...")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
