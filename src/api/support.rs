// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ApiError, models::SupportTicket, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTicketRequest {
    pub account_id: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplyRequest {
    pub message: String,
    /// True when the reply comes from the support console rather than the
    /// ticket's owner.
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct TicketFilter {
    pub account_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketListResponse {
    pub tickets: Vec<SupportTicket>,
    pub total: usize,
}

/// Open a support ticket.
#[utoipa::path(
    post,
    path = "/v1/support/tickets",
    tag = "Support",
    request_body = CreateTicketRequest,
    responses(
        (status = 201, description = "Ticket opened", body = SupportTicket),
        (status = 400, description = "Missing subject or message"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<SupportTicket>), ApiError> {
    let subject = request.subject.trim().to_string();
    let message = request.message.trim().to_string();
    if subject.is_empty() || message.is_empty() {
        return Err(ApiError::bad_request("Subject and message are required"));
    }

    let ticket = {
        let mut guard = state.service.write().await;
        let svc = &mut *guard;
        if svc.ledger.account(&request.account_id).is_none() {
            return Err(ApiError::not_found("Account not found"));
        }
        let ticket_id = svc
            .support
            .create(request.account_id, subject, message, Utc::now());
        svc.support
            .get(&ticket_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("Created ticket vanished"))?
    };
    state.persist().await;

    tracing::info!(ticket_id = %ticket.id, "support ticket opened");
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// List tickets, optionally filtered to one account. Without a filter this
/// is the support console's view of every ticket.
#[utoipa::path(
    get,
    path = "/v1/support/tickets",
    tag = "Support",
    params(("account_id" = Option<String>, Query, description = "Restrict to one account")),
    responses(
        (status = 200, description = "Matching tickets", body = TicketListResponse)
    )
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(filter): Query<TicketFilter>,
) -> Json<TicketListResponse> {
    let guard = state.service.read().await;
    let tickets: Vec<SupportTicket> = match &filter.account_id {
        Some(account_id) => guard
            .support
            .tickets_for(account_id)
            .into_iter()
            .cloned()
            .collect(),
        None => guard.support.all().to_vec(),
    };
    Json(TicketListResponse {
        total: tickets.len(),
        tickets,
    })
}

/// Append a reply to a ticket.
///
/// An admin reply marks the ticket `replied`; a user reply reopens it.
/// A closed ticket still records the reply but stays closed.
#[utoipa::path(
    post,
    path = "/v1/support/tickets/{ticket_id}/replies",
    tag = "Support",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    request_body = ReplyRequest,
    responses(
        (status = 200, description = "Updated ticket", body = SupportTicket),
        (status = 404, description = "Ticket not found")
    )
)]
pub async fn reply_to_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<SupportTicket>, ApiError> {
    let ticket = {
        let mut guard = state.service.write().await;
        guard
            .support
            .reply(&ticket_id, request.message, request.is_admin, Utc::now())?
            .clone()
    };
    state.persist().await;

    Ok(Json(ticket))
}

/// Close a ticket. Closing is idempotent and final.
#[utoipa::path(
    post,
    path = "/v1/support/tickets/{ticket_id}/close",
    tag = "Support",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Closed ticket", body = SupportTicket),
        (status = 404, description = "Ticket not found")
    )
)]
pub async fn close_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<SupportTicket>, ApiError> {
    let ticket = {
        let mut guard = state.service.write().await;
        guard.support.close(&ticket_id)?.clone()
    };
    state.persist().await;

    tracing::info!(ticket_id = %ticket.id, "support ticket closed");
    Ok(Json(ticket))
}
