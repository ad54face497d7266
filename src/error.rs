// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types for the wallet core and the HTTP layer.
//!
//! [`WalletError`] is the domain taxonomy: every failure the admission and
//! settlement pipeline can surface, detected synchronously and returned at
//! the point of detection. [`ApiError`] is the HTTP-facing shape; the
//! `From<WalletError>` impl fixes the status-code mapping in one place.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::LimitWindow;

/// Domain errors surfaced by the wallet core.
///
/// All variants are local validation failures; nothing here is retryable,
/// because each `submit` both debits the sender and mints a new transaction
/// id.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WalletError {
    #[error("Recipient address must not be empty")]
    InvalidAddress,

    #[error("Amount must be a positive number")]
    InvalidAmount,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Transaction exceeds your {window} limit. Complete KYC verification to increase limits.")]
    LimitExceeded { window: LimitWindow },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Transaction is already settled")]
    AlreadySettled,

    #[error("Unsupported currency: {0}")]
    CurrencyUnsupported(String),
}

impl WalletError {
    /// Stable machine-readable identifier for API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAddress => "invalid_address",
            Self::InvalidAmount => "invalid_amount",
            Self::InsufficientBalance => "insufficient_balance",
            Self::LimitExceeded { .. } => "limit_exceeded",
            Self::NotFound(_) => "not_found",
            Self::AlreadySettled => "already_settled",
            Self::CurrencyUnsupported(_) => "currency_unsupported",
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub kind: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            kind: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<WalletError> for ApiError {
    fn from(error: WalletError) -> Self {
        let status = match &error {
            WalletError::InvalidAddress
            | WalletError::InvalidAmount
            | WalletError::CurrencyUnsupported(_) => StatusCode::BAD_REQUEST,
            WalletError::InsufficientBalance | WalletError::LimitExceeded { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            WalletError::NotFound(_) => StatusCode::NOT_FOUND,
            WalletError::AlreadySettled => StatusCode::CONFLICT,
        };
        Self {
            status,
            kind: Some(error.kind()),
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            kind: self.kind,
        });
        (self.status, body).into_response()
    }
}
