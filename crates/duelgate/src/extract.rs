//! Extractors that speak the wire taxonomy.
//!
//! axum's stock `Json`/`Query` rejections answer with their own status
//! codes and plain-text bodies. The contract says malformed input is a
//! `Validation` error, HTTP 400, `{ code, error }` body, on every
//! endpoint, so these wrappers reshape the rejection.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use duelgate_protocol::GameError;
use serde::de::DeserializeOwned;

use crate::ApiError;

/// `Json` with `Validation`-shaped rejections.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                Err(ApiError(GameError::validation(rejection.body_text())))
            }
        }
    }
}

/// `Query` with `Validation`-shaped rejections.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, ApiError> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                Err(ApiError(GameError::validation(rejection.body_text())))
            }
        }
    }
}
