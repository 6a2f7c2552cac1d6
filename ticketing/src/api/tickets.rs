//! Ticket endpoints:
//! - POST /api/tickets/purchase - Buy tickets (201)
//! - GET /api/tickets/:code - Look up a ticket
//! - POST /api/tickets/:code/cancel - Cancel an active ticket, returning its seats
//! - POST /api/tickets/:code/use - Check a ticket in at the door

use super::AppError;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticketing_core::{EventId, PurchaseRequest, Ticket, TicketCode, TicketStatus};
use uuid::Uuid;

/// Request to purchase tickets.
#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseTicketsRequest {
    /// Event to buy for
    pub event_id: Uuid,
    /// Buyer display name
    pub buyer_name: String,
    /// Buyer email; tickets are grouped by it
    pub buyer_email: String,
    /// Buyer phone
    #[serde(default)]
    pub buyer_phone: String,
    /// Number of tickets
    pub quantity: u32,
}

impl From<PurchaseTicketsRequest> for PurchaseRequest {
    fn from(request: PurchaseTicketsRequest) -> Self {
        Self {
            event_id: EventId::from_uuid(request.event_id),
            buyer_name: request.buyer_name,
            buyer_email: request.buyer_email,
            buyer_phone: request.buyer_phone,
            quantity: request.quantity,
        }
    }
}

/// Ticket details response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TicketResponse {
    /// Ticket code, presented at the door
    pub code: String,
    /// Event ID
    pub event_id: Uuid,
    /// Buyer ID
    pub buyer_id: Uuid,
    /// Admissions on this ticket
    pub quantity: u32,
    /// Price paid, formatted with two decimals
    pub total_price: String,
    /// Price paid in minor currency units
    pub total_price_minor_units: u64,
    /// Purchase time
    pub purchased_at: DateTime<Utc>,
    /// ACTIVE, USED or CANCELLED
    pub status: TicketStatus,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            event_id: *ticket.event_id.as_uuid(),
            buyer_id: *ticket.buyer_id.as_uuid(),
            quantity: ticket.quantity,
            total_price: ticket.total_price.to_string(),
            total_price_minor_units: ticket.total_price.minor_units(),
            purchased_at: ticket.purchased_at,
            status: ticket.status,
            code: ticket.code.to_string(),
        }
    }
}

/// Purchase tickets for an event.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/tickets/purchase \
///   -H "Content-Type: application/json" \
///   -d '{
///     "event_id": "550e8400-e29b-41d4-a716-446655440000",
///     "buyer_name": "Amina Wanjiru",
///     "buyer_email": "amina@example.com",
///     "buyer_phone": "+254700000000",
///     "quantity": 2
///   }'
/// ```
pub async fn purchase_tickets(
    State(state): State<AppState>,
    Json(request): Json<PurchaseTicketsRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), AppError> {
    let ticket = state.coordinator.purchase(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ticket.into())))
}

/// Get a ticket by code.
pub async fn get_ticket(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = state.coordinator.ticket(TicketCode::new(code)).await?;
    Ok(Json(ticket.into()))
}

/// Cancel an active ticket.
///
/// Returns 409 if the ticket was already used or cancelled.
pub async fn cancel_ticket(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = state.coordinator.cancel(TicketCode::new(code)).await?;
    Ok(Json(ticket.into()))
}

/// Mark an active ticket as used.
pub async fn use_ticket(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = state.coordinator.mark_used(TicketCode::new(code)).await?;
    Ok(Json(ticket.into()))
}
