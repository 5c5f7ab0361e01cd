//! # REST Handlers
//!
//! Request/response types and axum handlers for the ledger workflows.
//!
//! Entities are returned as their serialized form; request bodies carry
//! only what the matching service call needs.

use crate::api::rest::error::ApiResult;
use crate::application::services::{
    BackOfficeService, BuybackReport, FeeQuote, FundAllocationService, SellQueueService,
    ShareTransferService,
};
use crate::domain::entities::{
    AllocationRule, Holding, Profile, SellOrder, Share, SubWallet, TransferRequest, Wallet,
};
use crate::domain::services::FundSplit;
use crate::domain::value_objects::{
    Currency, Money, Percentage, SellOrderId, ShareId, TransferId, UserId,
};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Services shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Share transfer workflow.
    pub transfers: ShareTransferService,
    /// Allocation rules and sub-wallets.
    pub allocations: FundAllocationService,
    /// FIFO sell queue.
    pub sell_queue: SellQueueService,
    /// Profiles, shares, lots and wallet deposits.
    pub back_office: BackOfficeService,
}

// ========== Health ==========

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the server answers.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ========== Transfers ==========

/// Body of `POST /transfers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransferRequest {
    /// Sending user.
    pub sender_id: UserId,
    /// Recipient email or phone number.
    pub recipient_contact: String,
    /// Share class to transfer.
    pub share_id: ShareId,
    /// Shares to transfer.
    pub quantity: u64,
}

/// Query of `GET /transfers/fee`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeQuery {
    /// Share class.
    pub share_id: ShareId,
    /// Shares to transfer.
    pub quantity: u64,
}

/// `POST /transfers`
///
/// Answers 201 with the stored request, whose status tells whether the
/// processor completed or rejected it.
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTransferRequest>,
) -> ApiResult<(StatusCode, Json<TransferRequest>)> {
    let request = state
        .transfers
        .request_transfer(
            body.sender_id,
            &body.recipient_contact,
            body.share_id,
            body.quantity,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// `GET /transfers/{id}`
pub async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TransferId>,
) -> ApiResult<Json<TransferRequest>> {
    Ok(Json(state.transfers.get_transfer(id).await?))
}

/// `GET /users/{id}/transfers`
pub async fn list_user_transfers(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<Vec<TransferRequest>>> {
    Ok(Json(state.transfers.transfers_for_user(user_id).await?))
}

/// `GET /transfers/fee`
pub async fn quote_transfer_fee(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeeQuery>,
) -> ApiResult<Json<FeeQuote>> {
    Ok(Json(
        state
            .transfers
            .quote_fee(query.share_id, query.quantity)
            .await?,
    ))
}

// ========== Sell orders ==========

/// Body of `POST /sell-orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceSellOrderRequest {
    /// Selling user.
    pub user_id: UserId,
    /// Share class.
    pub share_id: ShareId,
    /// Shares offered.
    pub quantity: u64,
}

/// Body of `PATCH /sell-orders/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifySellOrderRequest {
    /// Owner of the order.
    pub user_id: UserId,
    /// New, smaller quantity.
    pub quantity: u64,
}

/// Query identifying the acting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerQuery {
    /// Owner of the order.
    pub user_id: UserId,
}

/// Query of `GET /sell-orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueFilter {
    /// Restrict to one share class.
    pub share_id: Option<ShareId>,
}

/// Body of `POST /sell-orders/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessBuybacksRequest {
    /// Share class to buy back.
    pub share_id: ShareId,
    /// Currency of the buyback sub-wallet.
    pub currency: Currency,
}

/// `POST /sell-orders`
pub async fn place_sell_order(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PlaceSellOrderRequest>,
) -> ApiResult<(StatusCode, Json<SellOrder>)> {
    let order = state
        .sell_queue
        .place_order(body.user_id, body.share_id, body.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /sell-orders`
pub async fn list_sell_queue(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<QueueFilter>,
) -> ApiResult<Json<Vec<SellOrder>>> {
    Ok(Json(state.sell_queue.queue(filter.share_id).await?))
}

/// `PATCH /sell-orders/{id}`
pub async fn modify_sell_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SellOrderId>,
    Json(body): Json<ModifySellOrderRequest>,
) -> ApiResult<Json<SellOrder>> {
    Ok(Json(
        state
            .sell_queue
            .modify_quantity(id, body.user_id, body.quantity)
            .await?,
    ))
}

/// `DELETE /sell-orders/{id}`
pub async fn cancel_sell_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SellOrderId>,
    Query(owner): Query<OwnerQuery>,
) -> ApiResult<Json<SellOrder>> {
    Ok(Json(state.sell_queue.cancel(id, owner.user_id).await?))
}

/// `POST /sell-orders/process`
pub async fn process_buybacks(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProcessBuybacksRequest>,
) -> ApiResult<Json<BuybackReport>> {
    Ok(Json(
        state
            .sell_queue
            .process_buybacks(body.share_id, body.currency)
            .await?,
    ))
}

// ========== Allocation ==========

/// Body of `POST /allocation-rules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAllocationRuleRequest {
    /// Project funding percentage.
    pub project_funding: Percentage,
    /// Admin fund percentage.
    pub admin_fund: Percentage,
    /// Share buyback percentage.
    pub buyback: Percentage,
}

/// Body of `POST /allocations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateRequest {
    /// Completed share-sale amount.
    pub amount: Money,
    /// Currency of the sale.
    pub currency: Currency,
}

/// `GET /allocation-rules`, newest first.
pub async fn list_allocation_rules(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AllocationRule>>> {
    Ok(Json(state.allocations.rule_history().await?))
}

/// `POST /allocation-rules`
pub async fn save_allocation_rule(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveAllocationRuleRequest>,
) -> ApiResult<(StatusCode, Json<AllocationRule>)> {
    let rule = state
        .allocations
        .save_rule(body.project_funding, body.admin_fund, body.buyback)
        .await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// `POST /allocations`
pub async fn allocate_funds(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AllocateRequest>,
) -> ApiResult<Json<FundSplit>> {
    Ok(Json(
        state.allocations.allocate(body.amount, body.currency).await?,
    ))
}

/// `GET /sub-wallets`
pub async fn list_sub_wallets(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SubWallet>>> {
    Ok(Json(state.allocations.sub_wallets().await?))
}

// ========== Back office ==========

/// Body of `POST /profiles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterProfileRequest {
    /// Display name.
    pub full_name: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `POST /shares`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListShareRequest {
    /// Share class name.
    pub name: String,
    /// Price per share.
    pub price_per_share: Money,
    /// Currency of the price.
    pub currency: Currency,
}

/// Body of `PUT /shares/{id}/price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPriceRequest {
    /// New price per share.
    pub price_per_share: Money,
}

/// Body of `POST /holdings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSharesRequest {
    /// Receiving user.
    pub owner_id: UserId,
    /// Share class.
    pub share_id: ShareId,
    /// Shares in the new lot.
    pub quantity: u64,
}

/// Body of `POST /wallets/deposits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Wallet owner.
    pub user_id: UserId,
    /// Wallet currency.
    pub currency: Currency,
    /// Amount to credit.
    pub amount: Money,
    /// Gateway payment to wait for before crediting.
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// Answer of a payment-backed deposit, credited once the payment settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositAccepted {
    /// Gateway payment being polled.
    pub payment_reference: String,
    /// Always `awaiting_payment`.
    pub status: String,
}

/// `POST /profiles`
pub async fn register_profile(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterProfileRequest>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    let profile = state
        .back_office
        .register_profile(&body.full_name, body.email.as_deref(), body.phone.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /profiles/{id}`
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
) -> ApiResult<Json<Profile>> {
    Ok(Json(state.back_office.profile(id).await?))
}

/// `POST /shares`
pub async fn list_share(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ListShareRequest>,
) -> ApiResult<(StatusCode, Json<Share>)> {
    let share = state
        .back_office
        .list_share(&body.name, body.price_per_share, body.currency)
        .await?;
    Ok((StatusCode::CREATED, Json(share)))
}

/// `GET /shares/{id}`
pub async fn get_share(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ShareId>,
) -> ApiResult<Json<Share>> {
    Ok(Json(state.back_office.share(id).await?))
}

/// `PUT /shares/{id}/price`
pub async fn set_share_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ShareId>,
    Json(body): Json<SetPriceRequest>,
) -> ApiResult<Json<Share>> {
    Ok(Json(
        state
            .back_office
            .set_share_price(id, body.price_per_share)
            .await?,
    ))
}

/// `POST /holdings`
pub async fn issue_shares(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IssueSharesRequest>,
) -> ApiResult<(StatusCode, Json<Holding>)> {
    let lot = state
        .back_office
        .issue_shares(body.owner_id, body.share_id, body.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

/// `GET /users/{id}/holdings`
pub async fn list_user_holdings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<Vec<Holding>>> {
    Ok(Json(state.back_office.holdings_of(user_id).await?))
}

/// `GET /users/{id}/wallets/{currency}`
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Path((user_id, currency)): Path<(UserId, Currency)>,
) -> ApiResult<Json<Wallet>> {
    Ok(Json(state.back_office.wallet(user_id, currency).await?))
}

/// `POST /wallets/deposits`
///
/// Without a payment reference the wallet is credited at once (201). With
/// one, the request is checked, the payment is polled in the background and
/// the answer is 202; the wallet is credited when the payment succeeds.
pub async fn deposit_funds(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DepositRequest>,
) -> ApiResult<Response> {
    let DepositRequest {
        user_id,
        currency,
        amount,
        payment_reference,
    } = body;
    let Some(reference) = payment_reference else {
        let wallet = state.back_office.deposit(user_id, currency, amount).await?;
        return Ok((StatusCode::CREATED, Json(wallet)).into_response());
    };

    state
        .back_office
        .check_deposit(user_id, amount, Some(&reference))
        .await?;
    let office = state.back_office.clone();
    let polled = reference.clone();
    tokio::spawn(async move {
        if let Err(e) = office
            .deposit_on_payment(user_id, currency, amount, &polled)
            .await
        {
            warn!(payment_reference = %polled, error = %e, "payment deposit not credited");
        }
    });

    let accepted = DepositAccepted {
        payment_reference: reference,
        status: "awaiting_payment".to_string(),
    };
    Ok((StatusCode::ACCEPTED, Json(accepted)).into_response())
}
