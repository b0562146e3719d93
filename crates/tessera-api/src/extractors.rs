// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::context::AuthContext;
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Reads the [`AuthContext`] the auth gate stored in the request extensions.
/// A handler using this extractor on an ungated route is a wiring bug, so a
/// missing context is an internal error rather than a 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(ctx): Auth) -> impl IntoResponse {
///     format!("Hello, {}", ctx.user_id)
/// }
/// ```
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| {
                ApiError::internal(format!(
                    "no auth context on {} {}; route is not behind the auth gate",
                    parts.method, parts.uri
                ))
            })
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// Extractor for JSON payloads.
///
/// Malformed bodies and wrong content types become a 400 in the standard
/// envelope instead of axum's plain-text rejection.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        id: String,
    }

    #[tokio::test]
    async fn test_auth_without_context_is_internal() {
        let (mut parts, _) = HttpRequest::builder()
            .uri("/api/users/_current")
            .body(())
            .unwrap()
            .into_parts();

        let err = Auth::from_request_parts(&mut parts, &()).await.err().unwrap();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_auth_with_context() {
        let (mut parts, _) = HttpRequest::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(AuthContext::new("Mousetri", "abc.def.ghi"));

        let Auth(ctx) = Auth::from_request_parts(&mut parts, &()).await.ok().unwrap();
        assert_eq!(ctx.user_id, "Mousetri");
    }

    #[tokio::test]
    async fn test_validated_json() {
        let req = HttpRequest::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"id":"Mousetri"}"#))
            .unwrap();
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .ok()
            .unwrap();
        assert_eq!(payload.id, "Mousetri");

        let req = HttpRequest::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let err = ValidatedJson::<Payload>::from_request(req, &()).await.err().unwrap();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
