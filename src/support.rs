// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Support ticket workflows handled from the admin console.
//!
//! Tickets are a side channel next to the transaction queue: a user opens
//! a thread, admin and user reply in turn, and either side's state is
//! reflected in the ticket status (`open` ↔ `replied` → `closed`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WalletError;
use crate::identity;
use crate::models::{SupportTicket, TicketReply, TicketStatus};

/// Owns all support tickets.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SupportDesk {
    tickets: Vec<SupportTicket>,
}

impl SupportDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new ticket; returns its id.
    pub fn create(
        &mut self,
        account_id: String,
        subject: String,
        message: String,
        now: DateTime<Utc>,
    ) -> String {
        let ticket = SupportTicket {
            id: identity::generate_ticket_id(),
            account_id,
            subject,
            message,
            status: TicketStatus::Open,
            replies: Vec::new(),
            created_at: now,
        };
        let id = ticket.id.clone();
        self.tickets.push(ticket);
        id
    }

    /// Append a reply. An admin reply marks the ticket `replied`; a user
    /// reply reopens it. Closed tickets stay closed.
    pub fn reply(
        &mut self,
        ticket_id: &str,
        message: String,
        is_admin: bool,
        now: DateTime<Utc>,
    ) -> Result<&SupportTicket, WalletError> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or_else(|| WalletError::NotFound("Ticket".into()))?;

        ticket.replies.push(TicketReply {
            id: format!("reply_{}", Uuid::new_v4()),
            message,
            is_admin,
            created_at: now,
        });
        if ticket.status != TicketStatus::Closed {
            ticket.status = if is_admin {
                TicketStatus::Replied
            } else {
                TicketStatus::Open
            };
        }
        Ok(&*ticket)
    }

    pub fn close(&mut self, ticket_id: &str) -> Result<&SupportTicket, WalletError> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or_else(|| WalletError::NotFound("Ticket".into()))?;
        ticket.status = TicketStatus::Closed;
        Ok(&*ticket)
    }

    pub fn get(&self, ticket_id: &str) -> Option<&SupportTicket> {
        self.tickets.iter().find(|t| t.id == ticket_id)
    }

    pub fn tickets_for(&self, account_id: &str) -> Vec<&SupportTicket> {
        self.tickets
            .iter()
            .filter(|t| t.account_id == account_id)
            .collect()
    }

    /// Every ticket, for the admin console.
    pub fn all(&self) -> &[SupportTicket] {
        &self.tickets
    }
}
