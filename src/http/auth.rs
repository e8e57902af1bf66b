//! Caller identity taken from the upstream authenticator.

use super::error::ApiError;
use crate::task::domain::UserId;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::str::FromStr;

/// Header carrying the authenticated user's identifier.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(ApiError::Unauthenticated("missing x-user-id header"))?;
        let text = header
            .to_str()
            .map_err(|_| ApiError::Unauthenticated("x-user-id header is not valid text"))?;
        UserId::from_str(text)
            .map(Self)
            .map_err(|_| ApiError::Unauthenticated("x-user-id header is not a valid user id"))
    }
}
