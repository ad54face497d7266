// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    ledger::KycUpdate,
    models::{
        Account, KycData, KycTier, LimitWindow, SupportTicket, TicketReply, TicketStatus,
        TierLimits, Transaction, TxStatus, WalletAddress, WalletEntry,
    },
    state::AppState,
};

pub mod accounts;
pub mod admin;
pub mod health;
pub mod rates;
pub mod support;
pub mod transactions;
pub mod wallets;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/accounts", post(accounts::signup))
        .route("/accounts/{account_id}", get(accounts::get_account))
        .route("/accounts/{account_id}/kyc", put(accounts::update_kyc))
        .route("/accounts/{account_id}/limits", get(accounts::get_limits))
        .route("/accounts/{account_id}/balances", get(wallets::list_balances))
        .route(
            "/accounts/{account_id}/send",
            post(transactions::send_transaction),
        )
        .route(
            "/accounts/{account_id}/transactions",
            get(transactions::list_transactions),
        )
        .route("/rates", get(rates::list_rates))
        .route(
            "/admin/transactions/pending",
            get(admin::list_pending_transactions),
        )
        .route(
            "/admin/transactions/{tx_id}/approve",
            post(admin::approve_transaction),
        )
        .route(
            "/admin/transactions/{tx_id}/reject",
            post(admin::reject_transaction),
        )
        .route("/admin/rates/{currency_id}", put(admin::set_rate))
        .route("/admin/rates/reset", post(admin::reset_rates))
        .route(
            "/admin/accounts/{account_id}/balances/{currency_id}",
            put(admin::set_balance),
        )
        .route("/admin/accounts", get(admin::list_accounts))
        .route("/admin/stats", get(admin::system_stats))
        .route(
            "/support/tickets",
            get(support::list_tickets).post(support::create_ticket),
        )
        .route(
            "/support/tickets/{ticket_id}/replies",
            post(support::reply_to_ticket),
        )
        .route("/support/tickets/{ticket_id}/close", post(support::close_ticket))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        accounts::signup,
        accounts::get_account,
        accounts::update_kyc,
        accounts::get_limits,
        wallets::list_balances,
        transactions::send_transaction,
        transactions::list_transactions,
        rates::list_rates,
        admin::list_pending_transactions,
        admin::approve_transaction,
        admin::reject_transaction,
        admin::set_rate,
        admin::reset_rates,
        admin::set_balance,
        admin::list_accounts,
        admin::system_stats,
        support::create_ticket,
        support::list_tickets,
        support::reply_to_ticket,
        support::close_ticket
    ),
    components(
        schemas(
            Account,
            KycData,
            KycTier,
            KycUpdate,
            LimitWindow,
            TierLimits,
            Transaction,
            TxStatus,
            WalletAddress,
            WalletEntry,
            SupportTicket,
            TicketReply,
            TicketStatus,
            accounts::SignupRequest,
            accounts::LimitsResponse,
            wallets::BalancesResponse,
            transactions::SendTransactionRequest,
            transactions::SendTransactionResponse,
            transactions::TransactionListResponse,
            rates::RatesResponse,
            admin::PendingTransactionsResponse,
            admin::RejectTransactionRequest,
            admin::SetRateRequest,
            admin::SetBalanceRequest,
            admin::AccountListResponse,
            admin::SystemStatsResponse,
            support::CreateTicketRequest,
            support::ReplyRequest,
            support::TicketListResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness probes"),
        (name = "Accounts", description = "Signup, KYC, and spending limits"),
        (name = "Wallet", description = "Balances and receiving addresses"),
        (name = "Transactions", description = "Transfer submission and history"),
        (name = "Rates", description = "USD exchange rates"),
        (name = "Admin", description = "Approval queue, rates, and account management"),
        (name = "Support", description = "Support ticket threads")
    )
)]
struct ApiDoc;
