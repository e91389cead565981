// src/extractors/validated.rs

//! バリデーション付き Extractor
//!
//! ハンドラーには制約チェック済みの DTO だけが渡る。失敗時は `AppError` を返し、
//! そのまま `ErrorEnvelope` としてレンダリングされる。

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
};
use std::collections::HashMap;

use crate::error::{AppError, ErrorCode};
use crate::utils::validation::{self, BodyDto, ParamDto};

/// JSON ボディ → DTO
#[derive(Debug, Clone)]
pub struct ValidatedBody<D>(pub D);

impl<S, D> FromRequest<S> for ValidatedBody<D>
where
    S: Send + Sync,
    D: BodyDto,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            // DefaultBodyLimit 超過は 413
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::new(ErrorCode::PayloadTooLarge, "Request body is too large")
            } else {
                AppError::new(ErrorCode::JsonParseError, "Failed to read request body")
                    .with_detail("reason", rejection.body_text())
            }
        })?;

        validation::from_body(&bytes).map(ValidatedBody)
    }
}

/// パスパラメータ → DTO
#[derive(Debug, Clone)]
pub struct ValidatedPath<D>(pub D);

impl<S, D> FromRequestParts<S> for ValidatedPath<D>
where
    S: Send + Sync,
    D: ParamDto,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::new(ErrorCode::ValidationFailed, "Invalid path parameters")
                    .with_detail("reason", rejection.body_text())
            })?;

        validation::from_path(&params).map(ValidatedPath)
    }
}

/// クエリパラメータ → DTO
#[derive(Debug, Clone)]
pub struct ValidatedQuery<D>(pub D);

impl<S, D> FromRequestParts<S> for ValidatedQuery<D>
where
    S: Send + Sync,
    D: ParamDto,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::new(ErrorCode::InvalidQueryParameters, "Invalid query parameters")
                    .with_detail("reason", rejection.body_text())
            })?;

        validation::from_query(&params).map(ValidatedQuery)
    }
}
