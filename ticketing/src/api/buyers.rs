//! Buyer endpoints:
//! - GET /api/buyers/:email/tickets - All tickets bought with an email, newest first

use super::AppError;
use super::tickets::TicketResponse;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};

/// List a buyer's tickets.
///
/// An email that never purchased yields an empty list; a malformed one is a
/// validation error.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/buyers/amina@example.com/tickets
/// ```
pub async fn list_buyer_tickets(
    Path(email): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    let tickets = state.coordinator.tickets_for_buyer(&email).await?;
    Ok(Json(tickets.into_iter().map(TicketResponse::from).collect()))
}
